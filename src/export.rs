use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::info;

use crate::error::ExportError;
use crate::filter::FilterSelection;
use crate::pipeline::DerivedArtifacts;

/// Point-in-time copy of what the dashboard is showing.
#[derive(Serialize)]
pub struct Snapshot<'s, 'a> {
    pub generated_at: DateTime<Local>,
    pub selection: &'s FilterSelection,
    pub artifacts: &'s DerivedArtifacts<'a>,
}

impl<'s, 'a> Snapshot<'s, 'a> {
    pub fn new(selection: &'s FilterSelection, artifacts: &'s DerivedArtifacts<'a>) -> Self {
        Snapshot {
            generated_at: Local::now(),
            selection,
            artifacts,
        }
    }

    pub fn file_name(&self) -> String {
        format!("salary-snapshot-{}.json", self.generated_at.format("%Y%m%d-%H%M%S"))
    }

    /// Writes pretty JSON into `dir`, creating it if needed, and returns the path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(writer, self)?;
        info!(path = %path.display(), "snapshot exported");
        Ok(path)
    }
}
