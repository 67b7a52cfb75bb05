//! Writes the three result images of a pipeline run side by side.

use field_engine::PipelineOutput;
use std::path::{Path, PathBuf};

use crate::error::PersistError;
use crate::services::image_io::write_png;

/// Files written by [`export_outputs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    /// Processed image.
    pub original: PathBuf,
    /// Reconstructed field, absent when there were no control points.
    pub reconstruction: Option<PathBuf>,
    /// Difference visualization (white when comparison was off).
    pub difference: PathBuf,
}

/// Write `<stem>_ori.png`, `<stem>_mhd.png` and `<stem>_dif.png` into `dir`.
pub fn export_outputs(
    dir: &Path,
    stem: &str,
    output: &PipelineOutput,
) -> Result<ExportPaths, PersistError> {
    let original = dir.join(format!("{stem}_ori.png"));
    write_png(&original, &output.processed)?;

    let reconstruction = match &output.field {
        Some(field) => {
            let path = dir.join(format!("{stem}_mhd.png"));
            write_png(&path, field)?;
            Some(path)
        }
        None => None,
    };

    let difference = dir.join(format!("{stem}_dif.png"));
    write_png(&difference, output.difference_or_disabled().visualization())?;

    tracing::info!(dir = %dir.display(), stem, "Exported images");
    Ok(ExportPaths {
        original,
        reconstruction,
        difference,
    })
}
