use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::csv_reader::Record;

/// The four categorical fields the dashboard filters on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    Year,
    Seniority,
    ContractType,
    CompanySize,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Year,
        Dimension::Seniority,
        Dimension::ContractType,
        Dimension::CompanySize,
    ];

    pub fn next(self) -> Dimension {
        Dimension::ALL[(usize::from(self) + 1) % Dimension::ALL.len()]
    }

    pub fn previous(self) -> Dimension {
        Dimension::ALL[(usize::from(self) + Dimension::ALL.len() - 1) % Dimension::ALL.len()]
    }
}

impl From<Dimension> for usize {
    fn from(input: Dimension) -> usize {
        match input {
            Dimension::Year => 0,
            Dimension::Seniority => 1,
            Dimension::ContractType => 2,
            Dimension::CompanySize => 3,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Dimension::Year => write!(f, "Year"),
            Dimension::Seniority => write!(f, "Seniority"),
            Dimension::ContractType => write!(f, "Contract Type"),
            Dimension::CompanySize => write!(f, "Company Size"),
        }
    }
}

/// Allowed values per dimension. The same shape doubles as the catalog of
/// available values, built from the full dataset with [`FilterSelection::full`].
///
/// Sets are ordered, so iteration yields values ascending (years numerically).
/// An empty set matches nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub years: BTreeSet<i32>,
    pub seniorities: BTreeSet<String>,
    pub contract_types: BTreeSet<String>,
    pub company_sizes: BTreeSet<String>,
}

impl FilterSelection {
    /// Every distinct value present in `records`.
    pub fn full(records: &[Record]) -> Self {
        let mut selection = FilterSelection::default();
        for record in records {
            selection.years.insert(record.year);
            if !selection.seniorities.contains(&record.seniority) {
                selection.seniorities.insert(record.seniority.clone());
            }
            if !selection.contract_types.contains(&record.contract_type) {
                selection.contract_types.insert(record.contract_type.clone());
            }
            if !selection.company_sizes.contains(&record.company_size) {
                selection.company_sizes.insert(record.company_size.clone());
            }
        }
        selection
    }

    /// AND across dimensions, OR within one.
    pub fn matches(&self, record: &Record) -> bool {
        self.years.contains(&record.year)
            && self.seniorities.contains(&record.seniority)
            && self.contract_types.contains(&record.contract_type)
            && self.company_sizes.contains(&record.company_size)
    }

    pub fn count(&self, dimension: Dimension) -> usize {
        match dimension {
            Dimension::Year => self.years.len(),
            Dimension::Seniority => self.seniorities.len(),
            Dimension::ContractType => self.contract_types.len(),
            Dimension::CompanySize => self.company_sizes.len(),
        }
    }

    pub fn labels(&self, dimension: Dimension) -> Vec<String> {
        match dimension {
            Dimension::Year => self.years.iter().map(|y| y.to_string()).collect(),
            Dimension::Seniority => self.seniorities.iter().cloned().collect(),
            Dimension::ContractType => self.contract_types.iter().cloned().collect(),
            Dimension::CompanySize => self.company_sizes.iter().cloned().collect(),
        }
    }

    /// Whether the `index`-th value of `catalog` in `dimension` is selected here.
    pub fn is_selected(&self, catalog: &FilterSelection, dimension: Dimension, index: usize) -> bool {
        match dimension {
            Dimension::Year => nth_selected(&self.years, &catalog.years, index),
            Dimension::Seniority => nth_selected(&self.seniorities, &catalog.seniorities, index),
            Dimension::ContractType => {
                nth_selected(&self.contract_types, &catalog.contract_types, index)
            }
            Dimension::CompanySize => nth_selected(&self.company_sizes, &catalog.company_sizes, index),
        }
    }

    /// Flips the `index`-th value of `catalog` in `dimension`. Returns the new
    /// state, or `None` when `index` is out of range.
    pub fn toggle(&mut self, catalog: &FilterSelection, dimension: Dimension, index: usize) -> Option<bool> {
        match dimension {
            Dimension::Year => toggle_nth(&mut self.years, &catalog.years, index),
            Dimension::Seniority => toggle_nth(&mut self.seniorities, &catalog.seniorities, index),
            Dimension::ContractType => {
                toggle_nth(&mut self.contract_types, &catalog.contract_types, index)
            }
            Dimension::CompanySize => {
                toggle_nth(&mut self.company_sizes, &catalog.company_sizes, index)
            }
        }
    }

    pub fn select_all(&mut self, catalog: &FilterSelection, dimension: Dimension) {
        match dimension {
            Dimension::Year => self.years = catalog.years.clone(),
            Dimension::Seniority => self.seniorities = catalog.seniorities.clone(),
            Dimension::ContractType => self.contract_types = catalog.contract_types.clone(),
            Dimension::CompanySize => self.company_sizes = catalog.company_sizes.clone(),
        }
    }

    pub fn clear(&mut self, dimension: Dimension) {
        match dimension {
            Dimension::Year => self.years.clear(),
            Dimension::Seniority => self.seniorities.clear(),
            Dimension::ContractType => self.contract_types.clear(),
            Dimension::CompanySize => self.company_sizes.clear(),
        }
    }
}

fn nth_selected<T: Ord>(selected: &BTreeSet<T>, catalog: &BTreeSet<T>, index: usize) -> bool {
    catalog
        .iter()
        .nth(index)
        .map_or(false, |value| selected.contains(value))
}

fn toggle_nth<T: Ord + Clone>(selected: &mut BTreeSet<T>, catalog: &BTreeSet<T>, index: usize) -> Option<bool> {
    let value = catalog.iter().nth(index)?;
    if selected.remove(value) {
        Some(false)
    } else {
        selected.insert(value.clone());
        Some(true)
    }
}
