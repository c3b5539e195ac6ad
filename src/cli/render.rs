//! Render command implementation.
//!
//! Composes one portrait from the selected variants and exports it as PNG.

use std::path::PathBuf;

use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::Result;
use crate::output::{display_path, size, Printer};
use crate::render::Interpolation;
use crate::session::Session;
use crate::types::Layer;

use super::{variant_index, Project};

/// Compose a portrait and export it as PNG
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Base variant number (1-based, wraps around)
    #[arg(long)]
    pub base: Option<usize>,

    /// Face variant number (1-based, wraps around)
    #[arg(long)]
    pub face: Option<usize>,

    /// Hair variant number (1-based, wraps around)
    #[arg(long)]
    pub hair: Option<usize>,

    /// Pick random variants for layers not chosen explicitly
    #[arg(long)]
    pub random: bool,

    /// Seed for --random
    #[arg(long, requires = "random")]
    pub seed: Option<u64>,

    /// Frame size as WxH (default from manifest, 420x420)
    #[arg(long)]
    pub size: Option<String>,

    /// Clip to the inscribed circle and crop to its bounding square
    #[arg(long, overrides_with = "no_circle")]
    pub circle: bool,

    /// Export the full rectangle without clipping
    #[arg(long, overrides_with = "circle")]
    pub no_circle: bool,

    /// Resampling filter
    #[arg(long, value_enum)]
    pub filter: Option<Interpolation>,

    /// Output file (default from manifest, anigen.png)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl RenderArgs {
    fn circle_override(&self) -> Option<bool> {
        match (self.circle, self.no_circle) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    fn picks(&self) -> [(Layer, Option<usize>); 3] {
        [
            (Layer::Base, self.base),
            (Layer::Face, self.face),
            (Layer::Hair, self.hair),
        ]
    }
}

pub fn run(args: RenderArgs, project: &Project, printer: &Printer) -> Result<()> {
    let (width, height) = project.frame_size(args.size.as_deref())?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| project.manifest.output.clone());

    let mut session = project.open_session(args.filter, printer);
    apply_selection(&mut session, &args)?;

    for layer in Layer::ALL {
        printer.info("Selected", &session.label(layer));
    }

    let (w, h) = session.export(&output, width, height)?;
    printer.success(
        "Exported",
        &format!("{} ({})", display_path(&output), size(w, h)),
    );

    Ok(())
}

/// Apply clip, random and explicit variant choices, in that order.
fn apply_selection(session: &mut Session, args: &RenderArgs) -> Result<()> {
    if let Some(circle) = args.circle_override() {
        session.on_toggle_circle_clip(circle);
    }

    if args.random {
        match args.seed {
            Some(seed) => session.randomize_with(&mut StdRng::seed_from_u64(seed)),
            None => session.on_randomize(),
        }
    }

    for (layer, pick) in args.picks() {
        if let Some(number) = pick {
            session.select(layer, variant_index(layer, number)?);
        }
    }

    Ok(())
}
