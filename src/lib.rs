//! Salary dashboard: loads the data-industry salary CSV, filters it by year,
//! seniority, contract type and company size, and derives the KPI scalars and
//! chart tables a terminal dashboard renders.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use salary_dashboard::csv_reader::DataSource;
//! use salary_dashboard::dataset::Dataset;
//! use salary_dashboard::filter::Dimension;
//! use salary_dashboard::session::{SelectionControl, Session};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dataset = Dataset::load(&DataSource::parse("data/salaries.csv"), Duration::from_secs(30))?;
//!     let mut session = Session::new(Arc::clone(&dataset));
//!     session.toggle(Dimension::Year, 0);
//!
//!     let artifacts = session.artifacts();
//!     println!("{} rows, mean {}", artifacts.kpis.count, artifacts.kpis.mean_salary);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod csv_reader;
pub mod dataset;
pub mod error;
pub mod export;
pub mod filter;
pub mod logging;
pub mod pipeline;
pub mod session;
pub mod ui;
