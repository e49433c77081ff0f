use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use salary_dashboard::csv_reader::DataSource;
use salary_dashboard::dataset::Dataset;
use salary_dashboard::error::LoadError;
use salary_dashboard::filter::{Dimension, FilterSelection};
use salary_dashboard::pipeline::{compute_pipeline, HISTOGRAM_BINS};
use salary_dashboard::session::{SelectionControl, Session};
use tempfile::NamedTempFile;

const CSV: &str = "\
ano,senioridade,contrato,tamanho_empresa,cargo,remoto,residencia_iso3,usd,moeda
2023,senior,integral,grande,Data Scientist,remoto,USA,150000,USD
2023,junior,integral,pequena,Analyst,presencial,BRA,40000,BRL
2024,pleno,freela,media,Data Engineer,hibrido,DEU,90000,EUR
2024,senior,integral,grande,Data Scientist,hibrido,USA,170000,USD
2022,executivo,temporario,grande,Head of Data,remoto,GBR,210000,GBP
2024,junior,integral,media,Data Scientist,presencial,BRA,30000,BRL
";

fn load(contents: &str) -> Result<Arc<Dataset>, LoadError> {
    let mut tmp = NamedTempFile::new().unwrap();
    write!(tmp, "{}", contents).unwrap();
    let source = DataSource::parse(tmp.path().to_str().unwrap());
    Dataset::load(&source, Duration::from_secs(1))
}

#[test]
fn loads_file_and_computes_default_dashboard() {
    let dataset = load(CSV).unwrap();
    assert_eq!(dataset.len(), 6);

    let session = Session::new(Arc::clone(&dataset));
    assert_eq!(session.catalog().labels(Dimension::Year), vec!["2022", "2023", "2024"]);

    let artifacts = session.artifacts();
    assert_eq!(artifacts.view.len(), 6);
    assert_eq!(artifacts.kpis.count, 6);
    assert_eq!(artifacts.kpis.max_salary, 210000.0);
    assert_eq!(artifacts.kpis.top_role, "Data Scientist");
    assert!((artifacts.kpis.mean_salary - 115000.0).abs() < 1e-9);

    let top = artifacts.top_roles.unwrap();
    assert_eq!(top.len(), 4);
    assert_eq!(top.last().unwrap().role, "Head of Data");

    let histogram = artifacts.histogram.unwrap();
    assert_eq!(histogram.len(), HISTOGRAM_BINS);
    assert_eq!(histogram.iter().map(|b| b.count).sum::<usize>(), 6);

    let modes = artifacts.work_modes.unwrap();
    assert_eq!(modes.iter().map(|m| m.count).sum::<usize>(), 6);

    let countries = artifacts.spotlight_by_country.unwrap();
    let codes: Vec<&str> = countries.iter().map(|c| c.country_code.as_str()).collect();
    assert_eq!(codes, vec!["BRA", "USA"]);
    assert_eq!(countries[1].mean_salary, 160000.0);
}

#[test]
fn filtering_by_contract_and_size() {
    let dataset = load(CSV).unwrap();
    let mut selection = FilterSelection::full(dataset.records());
    selection.contract_types = ["integral".to_string()].into_iter().collect();
    selection.company_sizes = ["grande".to_string(), "media".to_string()].into_iter().collect();

    let artifacts = compute_pipeline(&dataset, &selection);
    let salaries: Vec<f64> = artifacts.view.rows().iter().map(|r| r.salary_usd).collect();
    assert_eq!(salaries, vec![150000.0, 170000.0, 30000.0]);
    assert_eq!(artifacts.kpis.top_role, "Data Scientist");
}

#[test]
fn missing_columns_fail_the_load() {
    let err = load("ano,senioridade,usd\n2023,senior,1\n").unwrap_err();
    assert!(matches!(err, LoadError::MissingColumns(_)));
    assert!(err.to_string().contains("contrato"));
}

#[test]
fn unreachable_url_is_an_http_error() {
    let source = DataSource::parse("http://127.0.0.1:9/salaries.csv");
    assert!(matches!(source, DataSource::Url(_)));
    let err = Dataset::load(&source, Duration::from_secs(2)).unwrap_err();
    assert!(matches!(err, LoadError::Http(_)), "{:?}", err);
}

#[test]
fn unreadable_path_is_an_io_error() {
    let source = DataSource::parse("/definitely/not/here/salaries.csv");
    let err = Dataset::load(&source, Duration::from_secs(1)).unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}
