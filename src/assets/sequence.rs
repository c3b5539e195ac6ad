//! Numbered sequence scanning (`prefix1.ext`, `prefix2.ext`, ...).

use image::RgbaImage;
use tracing::{debug, warn};

use super::source::{AssetSource, Probe};

/// How a missing entry affects the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapPolicy {
    /// The first missing number ends the sequence.
    StopAtFirstGap,
    /// A missing number 1 is skipped; any later missing number ends the sequence.
    SkipLeadingGap,
}

/// One resolved entry of a numbered sequence.
#[derive(Debug, Clone)]
pub struct SequenceItem {
    /// The number in the file name (1-based).
    pub number: u32,
    pub image: RgbaImage,
}

/// File name for entry `number` of a sequence.
pub fn sequence_file_name(prefix: &str, number: u32, extension: &str) -> String {
    format!("{}{}.{}", prefix, number, extension)
}

/// Scan `prefix1.ext ..= prefix{max}.ext` in `source`.
///
/// Undecodable entries are skipped and the scan continues. Missing entries
/// are handled according to `policy`.
pub fn resolve_sequence<S>(
    source: &S,
    prefix: &str,
    extension: &str,
    max: u32,
    policy: GapPolicy,
) -> Vec<SequenceItem>
where
    S: AssetSource + ?Sized,
{
    let mut items = Vec::new();

    for number in 1..=max {
        let name = sequence_file_name(prefix, number, extension);
        match source.probe(&name) {
            Probe::Image(image) => items.push(SequenceItem { number, image }),
            Probe::Undecodable(reason) => {
                warn!(
                    source = %source.location().display(),
                    file = %name,
                    %reason,
                    "skipping undecodable image"
                );
            }
            Probe::Missing => {
                if number == 1 && policy == GapPolicy::SkipLeadingGap {
                    continue;
                }
                debug!(
                    source = %source.location().display(),
                    prefix,
                    found = items.len(),
                    "sequence ends at {}",
                    name
                );
                break;
            }
        }
    }

    items
}
