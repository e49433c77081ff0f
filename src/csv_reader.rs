use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::LoadError;

/// Header names the loader refuses to run without.
pub const REQUIRED_COLUMNS: &'static [&'static str] = &[
    "ano",
    "senioridade",
    "contrato",
    "tamanho_empresa",
    "cargo",
    "remoto",
    "residencia_iso3",
    "usd",
];

pub const DEFAULT_SOURCE: &'static str =
    "https://raw.githubusercontent.com/vqrca/dashboard_salarios_dados/refs/heads/main/dados-imersao-final.csv";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Record {
    #[serde(rename(deserialize = "ano"))]
    pub year: i32,
    #[serde(rename(deserialize = "senioridade"))]
    pub seniority: String,
    #[serde(rename(deserialize = "contrato"))]
    pub contract_type: String,
    #[serde(rename(deserialize = "tamanho_empresa"))]
    pub company_size: String,
    #[serde(rename(deserialize = "cargo"))]
    pub role: String,
    #[serde(rename(deserialize = "remoto"))]
    pub remote_mode: String,
    #[serde(rename(deserialize = "residencia_iso3"))]
    pub country_code: String,
    #[serde(rename(deserialize = "usd"))]
    pub salary_usd: f64,
}

/// Where the CSV comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Url(String),
    Path(PathBuf),
}

impl DataSource {
    /// Anything with an http(s) scheme is fetched, everything else is a local path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Url(location.to_string())
        } else {
            DataSource::Path(PathBuf::from(location))
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{}", url),
            DataSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

pub fn read_data(source: &DataSource, timeout: Duration) -> Result<Vec<Record>, LoadError> {
    info!(source = %source, "loading dataset");
    let records = match source {
        DataSource::Url(url) => {
            let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
            let body = client.get(url).send()?.error_for_status()?.bytes()?;
            debug!(bytes = body.len(), "dataset downloaded");
            parse_records(body.as_ref())?
        }
        DataSource::Path(path) => parse_records(File::open(path)?)?,
    };
    if records.is_empty() {
        warn!(source = %source, "dataset has a header but no rows");
    }
    info!(rows = records.len(), "dataset loaded");
    Ok(records)
}

/// Parses CSV with a header row into typed records. Extra columns are ignored.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<Record>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }

    let mut records = Vec::<Record>::new();
    for result in rdr.deserialize() {
        let record: Record = result?;
        records.push(record);
    }
    Ok(records)
}
