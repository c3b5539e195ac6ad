//! Init command implementation.
//!
//! Generates an `anigen.yaml` manifest, pointing `assets` at the first
//! directory that holds layer images.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use walkdir::WalkDir;

use crate::assets::{sequence_file_name, Manifest, MANIFEST_FILENAME};
use crate::error::{AnigenError, Result};
use crate::output::{display_path, Printer};
use crate::types::Layer;

/// Directory depth searched for layer images.
const SEARCH_DEPTH: usize = 3;

/// Initialize an anigen project by generating anigen.yaml
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to scan (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing anigen.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let manifest_path = args.path.join(MANIFEST_FILENAME);

    if manifest_path.exists() && !args.force {
        return Err(AnigenError::Config {
            message: format!("{} already exists", MANIFEST_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    printer.status("Scanning", &display_path(&args.path));

    let mut manifest = Manifest::default();
    match find_asset_dir(&args.path, &manifest) {
        Some(dir) => {
            printer.info("Discovered", &dir.display().to_string());
            manifest.assets = dir;
        }
        None => printer.warning(
            "Missing",
            &format!("no layer images found, using {}/", manifest.assets.display()),
        ),
    }

    let yaml = manifest.to_yaml()?;
    fs::write(&manifest_path, yaml).map_err(|e| AnigenError::Io {
        path: manifest_path.clone(),
        message: format!("Failed to write manifest: {}", e),
    })?;

    printer.success("Created", &display_path(&manifest_path));

    Ok(())
}

/// First directory under `root` containing the first base or fallback image,
/// relative to `root`. Directories inside the patch folder are ignored.
fn find_asset_dir(root: &Path, manifest: &Manifest) -> Option<PathBuf> {
    let markers = [
        sequence_file_name(Layer::Base.prefix(), 1, &manifest.extension),
        sequence_file_name(&manifest.fallback_prefix, 1, &manifest.extension),
    ];

    WalkDir::new(root)
        .max_depth(SEARCH_DEPTH)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.file_name()
                .to_str()
                .is_some_and(|name| markers.iter().any(|m| m == name))
        })
        .filter_map(|e| {
            let relative = e.path().parent()?.strip_prefix(root).ok()?.to_path_buf();
            let in_patch = relative
                .components()
                .any(|c| c.as_os_str() == manifest.patch_folder.as_str());
            (!in_patch).then_some(relative)
        })
        .map(|relative| {
            if relative.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                relative
            }
        })
        .next()
}
