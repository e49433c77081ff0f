use std::sync::Arc;
use std::time::Duration;

use crate::csv_reader::{read_data, DataSource, Record};
use crate::error::LoadError;

/// Immutable table of salary records, shared read-only between sessions.
#[derive(Debug, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Dataset { records }
    }

    pub fn load(source: &DataSource, timeout: Duration) -> Result<Arc<Dataset>, LoadError> {
        Ok(Arc::new(Dataset::new(read_data(source, timeout)?)))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
