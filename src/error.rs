use thiserror::Error;

/// Failure to produce a dataset. Fatal to the session.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The remote resource could not be fetched
    #[error("failed to fetch dataset: {0}")]
    Http(#[from] reqwest::Error),

    /// Local file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A row or field could not be parsed into a record
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Figment(#[from] figment::Error),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
