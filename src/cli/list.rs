//! List command implementation.
//!
//! Resolves the layer sets and prints an inventory.

use clap::Args;
use serde::Serialize;

use crate::assets::AssetLibrary;
use crate::error::{AnigenError, Result};
use crate::output::Printer;
use crate::types::{Layer, LayerOrigin};

use super::Project;

/// Show the resolved layer sets
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print the inventory as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// One row of the inventory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerEntry {
    pub layer: Layer,
    pub count: usize,
    pub origin: LayerOrigin,
    /// Native size of the first variant.
    pub width: u32,
    pub height: u32,
}

pub fn run(args: ListArgs, project: &Project, printer: &Printer) -> Result<()> {
    let library = project.load_library(printer);
    let entries = inventory(&library);

    if args.json {
        let json = serde_json::to_string_pretty(&entries).map_err(|e| AnigenError::Encode {
            message: format!("Failed to serialize inventory: {}", e),
        })?;
        println!("{}", json);
    } else {
        for entry in &entries {
            let set = library.layer_set(entry.layer);
            let sizes: Vec<String> = set
                .images()
                .iter()
                .enumerate()
                .map(|(i, img)| format!("{}:{}x{}", i + 1, img.width(), img.height()))
                .collect();
            printer.info(entry.layer.title(), &printer.dim(&sizes.join(" ")));
        }
    }

    Ok(())
}

/// Summarize every layer set in z-order.
pub fn inventory(library: &AssetLibrary) -> Vec<LayerEntry> {
    library
        .sets()
        .iter()
        .map(|set| {
            let (width, height) = set.first().dimensions();
            LayerEntry {
                layer: set.layer(),
                count: set.len(),
                origin: set.origin().clone(),
                width,
                height,
            }
        })
        .collect()
}
