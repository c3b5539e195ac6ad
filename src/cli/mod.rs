pub mod completions;
pub mod init;
pub mod list;
pub mod render;
pub mod shell;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::assets::{AssetLibrary, LoadOptions, Manifest};
use crate::error::{AnigenError, Result};
use crate::output::{display_path, plural, Printer};
use crate::render::{Compositor, Interpolation};
use crate::session::Session;
use crate::types::Layer;

/// anigen - Layered character portrait composer
#[derive(Parser, Debug)]
#[command(name = "anigen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to anigen.yaml (default: ./anigen.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compose a portrait and export it as PNG
    Render(render::RenderArgs),

    /// Show the resolved layer sets
    List(list::ListArgs),

    /// Step through variants interactively
    Shell(shell::ShellArgs),

    /// Generate an anigen.yaml manifest
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Manifest plus the directories it is resolved against.
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory relative manifest paths are resolved against.
    pub root: PathBuf,
    /// Directory the patch folder is looked up from.
    pub working_dir: PathBuf,
    pub manifest: Manifest,
    /// The manifest file, if one was read.
    pub manifest_path: Option<PathBuf>,
}

impl Project {
    /// Load an explicit manifest, or discover one in the working directory.
    pub fn load(config: Option<&Path>) -> Result<Self> {
        let working_dir = std::env::current_dir().map_err(|e| AnigenError::Io {
            path: PathBuf::from("."),
            message: e.to_string(),
        })?;
        Self::load_from(config, working_dir)
    }

    pub fn load_from(config: Option<&Path>, working_dir: PathBuf) -> Result<Self> {
        match config {
            Some(path) => {
                let root = match path.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                    _ => working_dir.clone(),
                };
                Ok(Self {
                    root,
                    working_dir,
                    manifest: Manifest::load(path)?,
                    manifest_path: Some(path.to_path_buf()),
                })
            }
            None => {
                let (manifest, found) = Manifest::discover(&working_dir)?;
                let manifest_path =
                    found.then(|| working_dir.join(crate::assets::MANIFEST_FILENAME));
                Ok(Self {
                    root: working_dir.clone(),
                    working_dir,
                    manifest,
                    manifest_path,
                })
            }
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        let mut options = LoadOptions::from_manifest(&self.manifest, &self.root);
        options.working_dir = self.working_dir.clone();
        options
    }

    /// Resolve the asset library, reporting what was found.
    pub fn load_library(&self, printer: &Printer) -> AssetLibrary {
        if let Some(path) = &self.manifest_path {
            printer.status("Using", &printer.cyan(&display_path(path)));
        }

        let options = self.load_options();
        printer.status("Loading", &display_path(&options.bundled_dir));
        let library = AssetLibrary::load(&options);

        for set in library.sets() {
            printer.info(
                set.layer().title(),
                &format!(
                    "{} {}",
                    plural(set.len(), "variant", "variants"),
                    printer.dim(&format!("({})", set.origin()))
                ),
            );
        }

        library
    }

    /// Load the library and open a session with manifest defaults applied.
    pub fn open_session(&self, filter: Option<Interpolation>, printer: &Printer) -> Session {
        let compositor = Compositor::new(filter.unwrap_or(self.manifest.filter));
        Session::new(self.load_library(printer), compositor).with_circle_clip(self.manifest.circle)
    }

    /// Frame size from a `WxH` override or the manifest.
    pub fn frame_size(&self, size: Option<&str>) -> Result<(u32, u32)> {
        match size {
            Some(s) => parse_dimensions(s),
            None => Ok((self.manifest.width, self.manifest.height)),
        }
    }
}

/// Parse a "WxH" dimension string into (width, height).
pub fn parse_dimensions(s: &str) -> Result<(u32, u32)> {
    let parts: Vec<&str> = s.splitn(2, |c| c == 'x' || c == 'X').collect();
    if parts.len() != 2 {
        return Err(AnigenError::Parse {
            message: format!("Invalid size '{}': expected WxH (e.g. 420x420)", s),
            help: Some("Use the format WxH, for example: 420x420, 640x480".to_string()),
        });
    }

    let w: u32 = parts[0].trim().parse().map_err(|_| AnigenError::Parse {
        message: format!("Invalid width '{}' in size '{}'", parts[0], s),
        help: Some("Width must be a positive integer".to_string()),
    })?;

    let h: u32 = parts[1].trim().parse().map_err(|_| AnigenError::Parse {
        message: format!("Invalid height '{}' in size '{}'", parts[1], s),
        help: Some("Height must be a positive integer".to_string()),
    })?;

    if w == 0 || h == 0 {
        return Err(AnigenError::Parse {
            message: format!("Size must be non-zero, got {}x{}", w, h),
            help: Some("Both width and height must be at least 1".to_string()),
        });
    }

    Ok((w, h))
}

/// Convert a 1-based variant number from the command line to an index.
pub fn variant_index(layer: Layer, number: usize) -> Result<usize> {
    number.checked_sub(1).ok_or_else(|| AnigenError::Parse {
        message: format!("Invalid {} variant 0", layer),
        help: Some("Variant numbers start at 1".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_dimensions() {
        assert_eq!(parse_dimensions("420x420").unwrap(), (420, 420));
        assert_eq!(parse_dimensions("640X480").unwrap(), (640, 480));
        assert!(parse_dimensions("420").is_err());
        assert!(parse_dimensions("0x10").is_err());
        assert!(parse_dimensions("axb").is_err());
    }

    #[test]
    fn test_variant_index() {
        assert_eq!(variant_index(Layer::Face, 1).unwrap(), 0);
        assert_eq!(variant_index(Layer::Face, 7).unwrap(), 6);

        let err = variant_index(Layer::Face, 0).unwrap_err();
        assert!(matches!(err, AnigenError::Parse { .. }));
        assert!(err.to_string().contains("face variant 0"));
    }

    #[test]
    fn test_project_without_manifest() {
        let dir = tempdir().unwrap();

        let project = Project::load_from(None, dir.path().to_path_buf()).unwrap();

        assert!(project.manifest_path.is_none());
        assert_eq!(project.frame_size(None).unwrap(), (420, 420));
        assert_eq!(project.load_options().bundled_dir, dir.path().join("assets"));
    }

    #[test]
    fn test_project_with_explicit_config() {
        let dir = tempdir().unwrap();
        let config_dir = dir.path().join("portraits");
        fs::create_dir_all(&config_dir).unwrap();
        let config = config_dir.join("custom.yaml");
        fs::write(&config, "assets: art\nwidth: 300\nheight: 200\n").unwrap();

        let project = Project::load_from(Some(&config), dir.path().to_path_buf()).unwrap();
        let options = project.load_options();

        assert_eq!(project.frame_size(None).unwrap(), (300, 200));
        assert_eq!(project.frame_size(Some("10x20")).unwrap(), (10, 20));
        assert_eq!(options.bundled_dir, config_dir.join("art"));
        assert_eq!(options.working_dir, dir.path());
    }

    #[test]
    fn test_cli_parses_render_flags() {
        let cli = Cli::try_parse_from([
            "anigen", "render", "--base", "2", "--random", "--seed", "9", "--no-circle", "-o", "out.png",
        ])
        .unwrap();

        let Commands::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.base, Some(2));
        assert!(args.random);
        assert_eq!(args.seed, Some(9));
        assert!(args.no_circle);
        assert_eq!(args.output, Some(PathBuf::from("out.png")));
    }
}
