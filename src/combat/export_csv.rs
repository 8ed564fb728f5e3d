//! Export simulator trace samples as CSV.
//!
//! Columns follow [TraceSample] field order with a header row:
//! `time,skill,damage,cumulative_damage,intent,sigils,charge_seeds,aspd`.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::combat::trace::TraceSample;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("flush failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("trace is empty; run the simulation with trace samples enabled")]
    EmptyTrace,
}

/// Serialize samples into any writer.
pub fn write_trace_csv<W: Write>(writer: W, samples: &[TraceSample]) -> Result<(), ExportError> {
    if samples.is_empty() {
        return Err(ExportError::EmptyTrace);
    }
    let mut csv_writer = csv::Writer::from_writer(writer);
    for sample in samples {
        csv_writer.serialize(sample)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn export_trace_csv(path: &Path, samples: &[TraceSample]) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    write_trace_csv(file, samples)?;
    tracing::debug!(path = %path.display(), rows = samples.len(), "wrote trace csv");
    Ok(())
}
