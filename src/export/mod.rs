//! Exporters: CSV and SRT writers invoked by the orchestrator's `finalize()`.

pub mod csv;
pub mod srt;

use crate::segmenter::Sentence;
use chrono::Local;
use std::path::PathBuf;
use tracing::warn;

/// File paths produced by `write_all`; both `None` when there was nothing to write.
#[derive(Debug, Clone, Default)]
pub struct ExportPaths {
    pub csv: Option<PathBuf>,
    pub srt: Option<PathBuf>,
}

const OUTPUT_DIR: &str = "output";

/// Writes both formats under `output/transcription_<YYYYMMDD_HHMMSS>.<ext>`.
/// Failures are logged and leave the corresponding path `None` rather than
/// failing the whole session finalisation.
pub fn write_all(sentences: &[Sentence]) -> ExportPaths {
    if let Err(e) = std::fs::create_dir_all(OUTPUT_DIR) {
        warn!(error = %e, "could not create output directory, skipping export");
        return ExportPaths::default();
    }

    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let csv_path = PathBuf::from(format!("{}/transcription_{}.csv", OUTPUT_DIR, stamp));
    let srt_path = PathBuf::from(format!("{}/transcription_{}.srt", OUTPUT_DIR, stamp));

    let csv = match csv::write(&csv_path, sentences) {
        Ok(()) => Some(csv_path),
        Err(e) => {
            warn!(error = %e, "CSV export failed");
            None
        }
    };
    let srt = match srt::write(&srt_path, sentences) {
        Ok(()) => Some(srt_path),
        Err(e) => {
            warn!(error = %e, "SRT export failed");
            None
        }
    };

    ExportPaths { csv, srt }
}
