//! Shell command implementation.
//!
//! A line-oriented front end for a `Session`: each input line is one UI
//! event (next/prev variant, randomize, reset, toggle clip, save).

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::str::FromStr;

use clap::Args;

use crate::error::{AnigenError, Result};
use crate::output::{display_path, size, Printer};
use crate::render::Interpolation;
use crate::session::Session;
use crate::types::Layer;

use super::Project;

const HELP: &[(&str, &str)] = &[
    ("next", "<layer>   next variant of base, face or hair"),
    ("prev", "<layer>   previous variant"),
    ("random", "         random variant of every layer"),
    ("reset", "         first variant of every layer"),
    ("circle", "on|off    toggle the circle clip"),
    ("show", "         print the current selection"),
    ("save", "[file]    export the portrait as PNG"),
    ("quit", "         leave the shell"),
];

/// Step through variants interactively
#[derive(Args, Debug)]
pub struct ShellArgs {
    /// Preview and export size as WxH (default from manifest)
    #[arg(long)]
    pub size: Option<String>,

    /// Resampling filter
    #[arg(long, value_enum)]
    pub filter: Option<Interpolation>,
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Next(Layer),
    Prev(Layer),
    Random,
    Reset,
    Circle(bool),
    Show,
    Save(Option<PathBuf>),
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = AnigenError;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or("").to_ascii_lowercase();
        let rest: Vec<&str> = words.collect();

        let command = match (verb.as_str(), rest.as_slice()) {
            ("next" | ">", [layer]) => ShellCommand::Next(layer.parse()?),
            ("prev" | "<", [layer]) => ShellCommand::Prev(layer.parse()?),
            ("random", []) => ShellCommand::Random,
            ("reset", []) => ShellCommand::Reset,
            ("circle", ["on"]) => ShellCommand::Circle(true),
            ("circle", ["off"]) => ShellCommand::Circle(false),
            ("show", []) => ShellCommand::Show,
            ("save", []) => ShellCommand::Save(None),
            ("save", _) => ShellCommand::Save(Some(PathBuf::from(rest.join(" ")))),
            ("help" | "?", []) => ShellCommand::Help,
            ("quit" | "exit", []) => ShellCommand::Quit,
            _ => {
                return Err(AnigenError::Parse {
                    message: format!("Unknown command '{}'", line.trim()),
                    help: Some("Type 'help' for a list of commands".to_string()),
                })
            }
        };

        Ok(command)
    }
}

/// What a command did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    Unchanged,
    Quit,
}

/// Export defaults for a shell session.
#[derive(Debug, Clone)]
pub struct ShellSettings {
    pub width: u32,
    pub height: u32,
    pub output: PathBuf,
}

pub fn run(args: ShellArgs, project: &Project, printer: &Printer) -> Result<()> {
    let (width, height) = project.frame_size(args.size.as_deref())?;
    let settings = ShellSettings {
        width,
        height,
        output: project.manifest.output.clone(),
    };

    let mut session = project.open_session(args.filter, printer);
    let stdin = io::stdin();
    run_with(&mut session, stdin.lock(), &settings, printer)
}

/// Drive `session` from `input` until it ends or a `quit` line.
///
/// Bad lines and failed exports are reported and the loop continues.
pub fn run_with<R: BufRead>(
    session: &mut Session,
    input: R,
    settings: &ShellSettings,
    printer: &Printer,
) -> Result<()> {
    print_selection(session, printer);

    for line in input.lines() {
        // A line that is not UTF-8 has already been consumed; anything else
        // means the input itself is gone.
        let line = match line {
            Ok(line) => line,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                printer.error("Error", &e.to_string());
                continue;
            }
            Err(e) => {
                return Err(AnigenError::Io {
                    path: PathBuf::from("<stdin>"),
                    message: e.to_string(),
                })
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<ShellCommand>() {
            Ok(command) => command,
            Err(e) => {
                printer.error("Error", &e.to_string());
                continue;
            }
        };

        match apply(session, command, settings, printer) {
            Ok(Outcome::Changed) => print_selection(session, printer),
            Ok(Outcome::Unchanged) => {}
            Ok(Outcome::Quit) => break,
            Err(e) => printer.error("Failed", &e.to_string()),
        }
    }

    Ok(())
}

/// Apply one command to the session.
pub fn apply(
    session: &mut Session,
    command: ShellCommand,
    settings: &ShellSettings,
    printer: &Printer,
) -> Result<Outcome> {
    let outcome = match command {
        ShellCommand::Next(layer) => {
            session.on_next(layer);
            Outcome::Changed
        }
        ShellCommand::Prev(layer) => {
            session.on_prev(layer);
            Outcome::Changed
        }
        ShellCommand::Random => {
            session.on_randomize();
            Outcome::Changed
        }
        ShellCommand::Reset => {
            session.on_reset();
            Outcome::Changed
        }
        ShellCommand::Circle(enabled) => {
            session.on_toggle_circle_clip(enabled);
            Outcome::Changed
        }
        ShellCommand::Show => {
            print_selection(session, printer);
            Outcome::Unchanged
        }
        ShellCommand::Save(path) => {
            let path = path.unwrap_or_else(|| settings.output.clone());
            let (w, h) = session.export(&path, settings.width, settings.height)?;
            printer.success("Exported", &format!("{} ({})", display_path(&path), size(w, h)));
            Outcome::Unchanged
        }
        ShellCommand::Help => {
            for (verb, text) in HELP {
                printer.info(verb, text);
            }
            Outcome::Unchanged
        }
        ShellCommand::Quit => Outcome::Quit,
    };

    Ok(outcome)
}

fn print_selection(session: &Session, printer: &Printer) {
    let labels: Vec<String> = Layer::ALL.iter().map(|&l| session.label(l)).collect();
    let clip = if session.circle_clip() { "circle" } else { "full" };
    printer.info("Selected", &format!("{} {}", labels.join(", "), printer.dim(clip)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetLibrary, LoadOptions, MemorySource};
    use crate::render::Compositor;
    use image::RgbaImage;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn session() -> Session {
        let mut bundled = MemorySource::new("bundle");
        for name in ["p1.png", "p2.png", "p3.png", "hair1.png", "hair2.png"] {
            bundled.insert_image(name, &RgbaImage::new(6, 6)).unwrap();
        }
        let library = AssetLibrary::load_from(&bundled, None, &LoadOptions::default());
        Session::new(library, Compositor::default())
    }

    fn settings(output: PathBuf) -> ShellSettings {
        ShellSettings {
            width: 42,
            height: 42,
            output,
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("next base".parse::<ShellCommand>().unwrap(), ShellCommand::Next(Layer::Base));
        assert_eq!("< Hair".parse::<ShellCommand>().unwrap(), ShellCommand::Prev(Layer::Hair));
        assert_eq!("RANDOM".parse::<ShellCommand>().unwrap(), ShellCommand::Random);
        assert_eq!("circle off".parse::<ShellCommand>().unwrap(), ShellCommand::Circle(false));
        assert_eq!("save".parse::<ShellCommand>().unwrap(), ShellCommand::Save(None));
        assert_eq!(
            "save my portrait.png".parse::<ShellCommand>().unwrap(),
            ShellCommand::Save(Some(PathBuf::from("my portrait.png")))
        );
        assert_eq!("exit".parse::<ShellCommand>().unwrap(), ShellCommand::Quit);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("next".parse::<ShellCommand>().is_err());
        assert!("next hat".parse::<ShellCommand>().is_err());
        assert!("circle maybe".parse::<ShellCommand>().is_err());
        assert!("dance".parse::<ShellCommand>().is_err());
    }

    #[test]
    fn test_apply_updates_session() {
        let mut session = session();
        let settings = settings(PathBuf::from("unused.png"));
        let printer = Printer::plain();

        let outcome = apply(&mut session, ShellCommand::Prev(Layer::Base), &settings, &printer).unwrap();
        assert_eq!(outcome, Outcome::Changed);
        assert_eq!(session.current_selection(Layer::Base), 2);

        apply(&mut session, ShellCommand::Circle(false), &settings, &printer).unwrap();
        assert!(!session.circle_clip());

        apply(&mut session, ShellCommand::Reset, &settings, &printer).unwrap();
        assert_eq!(session.current_selection(Layer::Base), 0);

        let outcome = apply(&mut session, ShellCommand::Quit, &settings, &printer).unwrap();
        assert_eq!(outcome, Outcome::Quit);
    }

    #[test]
    fn test_run_with_script() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("anigen.png");
        let mut session = session();

        let script = "next hair\nbogus\n\nsave\nsave /nonexistent/dir/x.png\nnext base\nquit\nnext base\n";
        run_with(&mut session, Cursor::new(script), &settings(output.clone()), &Printer::plain()).unwrap();

        // lines after quit are ignored, failures do not stop the loop
        assert_eq!(session.current_selection(Layer::Hair), 1);
        assert_eq!(session.current_selection(Layer::Base), 1);

        let written = image::open(&output).unwrap().to_rgba8();
        assert_eq!(written.dimensions(), (42, 42));
    }

    #[test]
    fn test_run_with_skips_non_utf8_line() {
        let dir = tempdir().unwrap();
        let mut session = session();

        let input = Cursor::new(b"\xff\xfe\nnext base\n".to_vec());
        run_with(&mut session, input, &settings(dir.path().join("x.png")), &Printer::plain()).unwrap();

        assert_eq!(session.current_selection(Layer::Base), 1);
    }

    struct BrokenInput;

    impl io::Read for BrokenInput {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "input closed"))
        }
    }

    #[test]
    fn test_run_with_fails_on_broken_input() {
        let dir = tempdir().unwrap();
        let mut session = session();

        let input = io::BufReader::new(BrokenInput);
        let err = run_with(&mut session, input, &settings(dir.path().join("x.png")), &Printer::plain())
            .unwrap_err();

        assert!(matches!(err, AnigenError::Io { .. }));
        assert!(err.to_string().contains("input closed"));
    }
}
