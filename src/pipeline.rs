//! Filter-and-aggregate pipeline.
//!
//! [`compute_pipeline`] is a pure function of the dataset and the current
//! selection. Every refresh recomputes everything from the full dataset; an
//! empty filtered view is a normal outcome where each chart artifact is `None`
//! and the KPI scalars are zero.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::csv_reader::Record;
use crate::dataset::Dataset;
use crate::filter::FilterSelection;

pub const TOP_ROLES: usize = 10;
pub const HISTOGRAM_BINS: usize = 30;
pub const SPOTLIGHT_ROLE: &'static str = "Data Scientist";

/// Rows of the dataset matching a selection, in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    rows: Vec<&'a Record>,
}

impl<'a> FilteredView<'a> {
    pub fn new(dataset: &'a Dataset, selection: &FilterSelection) -> Self {
        let rows = dataset
            .records()
            .iter()
            .filter(|record| selection.matches(record))
            .collect();
        FilteredView { rows }
    }

    pub fn rows(&self) -> &[&'a Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Kpis {
    pub mean_salary: f64,
    pub max_salary: f64,
    pub count: usize,
    /// Most frequent role; ties resolve to the lexically smallest name.
    pub top_role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleMean {
    pub role: String,
    pub mean_salary: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkModeCount {
    pub mode: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryMean {
    pub country_code: String,
    pub mean_salary: f64,
}

/// Everything the dashboard renders for one refresh.
#[derive(Debug, Clone, Serialize)]
pub struct DerivedArtifacts<'a> {
    #[serde(skip)]
    pub view: FilteredView<'a>,
    pub kpis: Kpis,
    pub top_roles: Option<Vec<RoleMean>>,
    pub histogram: Option<Vec<HistogramBin>>,
    pub work_modes: Option<Vec<WorkModeCount>>,
    pub spotlight_by_country: Option<Vec<CountryMean>>,
}

pub fn compute_pipeline<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> DerivedArtifacts<'a> {
    let view = FilteredView::new(dataset, selection);
    let rows = view.rows();
    DerivedArtifacts {
        kpis: kpis(rows),
        top_roles: top_roles_by_mean(rows, TOP_ROLES),
        histogram: salary_histogram(rows, HISTOGRAM_BINS),
        work_modes: work_mode_counts(rows),
        spotlight_by_country: role_mean_by_country(rows, SPOTLIGHT_ROLE),
        view,
    }
}

pub fn kpis(rows: &[&Record]) -> Kpis {
    if rows.is_empty() {
        return Kpis::default();
    }
    let total: f64 = rows.iter().map(|r| r.salary_usd).sum();
    let max_salary = rows
        .iter()
        .map(|r| r.salary_usd)
        .fold(f64::NEG_INFINITY, f64::max);

    let mut frequencies = BTreeMap::<&str, usize>::new();
    for record in rows {
        *frequencies.entry(record.role.as_str()).or_insert(0) += 1;
    }
    // max_by_key keeps the last maximum, so walk the ordered map backwards
    // to land on the lexically smallest role among ties.
    let top_role = frequencies
        .iter()
        .rev()
        .max_by_key(|(_, count)| **count)
        .map(|(role, _)| role.to_string())
        .unwrap_or_default();

    Kpis {
        mean_salary: total / rows.len() as f64,
        max_salary,
        count: rows.len(),
        top_role,
    }
}

/// Groups `rows` by `key` (ascending) and averages salary per group.
fn mean_by<'r, F>(rows: &[&'r Record], key: F) -> Vec<(&'r str, f64)>
where
    F: Fn(&'r Record) -> &'r str,
{
    let mut groups = BTreeMap::<&str, (f64, usize)>::new();
    for record in rows {
        let entry = groups.entry(key(*record)).or_insert((0.0, 0));
        entry.0 += record.salary_usd;
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(name, (sum, count))| (name, sum / count as f64))
        .collect()
}

/// The `limit` roles with the highest mean salary, returned ascending by mean
/// so the best paid role comes last. Ties on the mean favour the lexically
/// smaller role, both when choosing and when ordering.
pub fn top_roles_by_mean(rows: &[&Record], limit: usize) -> Option<Vec<RoleMean>> {
    if rows.is_empty() {
        return None;
    }
    let mut means = mean_by(rows, |r| r.role.as_str());
    // stable sorts preserve the lexical order of equal means
    means.sort_by(|a, b| b.1.total_cmp(&a.1));
    means.truncate(limit);
    means.sort_by(|a, b| a.1.total_cmp(&b.1));
    Some(
        means
            .into_iter()
            .map(|(role, mean_salary)| RoleMean {
                role: role.to_string(),
                mean_salary,
            })
            .collect(),
    )
}

/// Equal-width bins over `[min, max]`; the last bin is closed on the right.
pub fn salary_histogram(rows: &[&Record], bins: usize) -> Option<Vec<HistogramBin>> {
    if rows.is_empty() || bins == 0 {
        return None;
    }
    let (min, max) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
        (lo.min(r.salary_usd), hi.max(r.salary_usd))
    });
    let width = (max - min) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| min + width * i as f64).collect();
    edges.push(max);

    // bin i is [edges[i], edges[i + 1]), so a value's bin is the number of
    // interior edges at or below it
    let interior = &edges[1..bins];
    let mut counts = vec![0usize; bins];
    for record in rows {
        let index = if width > 0.0 {
            interior.partition_point(|&edge| edge <= record.salary_usd)
        } else {
            0
        };
        counts[index] += 1;
    }

    Some(
        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                lower: edges[i],
                upper: edges[i + 1],
                count,
            })
            .collect(),
    )
}

/// Row count per remote mode, most common first (ties by label).
pub fn work_mode_counts(rows: &[&Record]) -> Option<Vec<WorkModeCount>> {
    if rows.is_empty() {
        return None;
    }
    let mut counts = HashMap::<&str, usize>::new();
    for record in rows {
        *counts.entry(record.remote_mode.as_str()).or_insert(0) += 1;
    }
    let mut modes: Vec<WorkModeCount> = counts
        .into_iter()
        .map(|(mode, count)| WorkModeCount {
            mode: mode.to_string(),
            count,
        })
        .collect();
    modes.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.mode.cmp(&b.mode)));
    Some(modes)
}

/// Mean salary per country among rows holding exactly `role`, by country code.
pub fn role_mean_by_country(rows: &[&Record], role: &str) -> Option<Vec<CountryMean>> {
    let matching: Vec<&Record> = rows.iter().copied().filter(|r| r.role == role).collect();
    if matching.is_empty() {
        return None;
    }
    Some(
        mean_by(&matching, |r| r.country_code.as_str())
            .into_iter()
            .map(|(country_code, mean_salary)| CountryMean {
                country_code: country_code.to_string(),
                mean_salary,
            })
            .collect(),
    )
}
