use std::sync::Arc;

use tracing::debug;

use crate::dataset::Dataset;
use crate::filter::{Dimension, FilterSelection};
use crate::pipeline::{compute_pipeline, DerivedArtifacts};

/// Per-user state: the shared dataset, the catalog of choices derived from it
/// once, and the mutable selection.
#[derive(Clone, Debug)]
pub struct Session {
    dataset: Arc<Dataset>,
    catalog: FilterSelection,
    selection: FilterSelection,
}

pub trait SelectionControl {
    fn new(dataset: Arc<Dataset>) -> Self;
    fn toggle(&mut self, dimension: Dimension, index: usize);
    fn select_all(&mut self, dimension: Dimension);
    fn clear(&mut self, dimension: Dimension);
    fn reset(&mut self);
}

impl Session {
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Distinct values of the full dataset, independent of the selection.
    pub fn catalog(&self) -> &FilterSelection {
        &self.catalog
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn is_selected(&self, dimension: Dimension, index: usize) -> bool {
        self.selection.is_selected(&self.catalog, dimension, index)
    }

    pub fn artifacts(&self) -> DerivedArtifacts<'_> {
        compute_pipeline(&self.dataset, &self.selection)
    }
}

impl SelectionControl for Session {
    fn new(dataset: Arc<Dataset>) -> Self {
        let catalog = FilterSelection::full(dataset.records());
        Session {
            selection: catalog.clone(),
            catalog,
            dataset,
        }
    }

    fn toggle(&mut self, dimension: Dimension, index: usize) {
        if let Some(selected) = self.selection.toggle(&self.catalog, dimension, index) {
            debug!(%dimension, index, selected, "selection toggled");
        }
    }

    fn select_all(&mut self, dimension: Dimension) {
        debug!(%dimension, "selecting all values");
        self.selection.select_all(&self.catalog, dimension);
    }

    fn clear(&mut self, dimension: Dimension) {
        debug!(%dimension, "clearing selection");
        self.selection.clear(dimension);
    }

    fn reset(&mut self) {
        debug!("selection reset to defaults");
        self.selection = self.catalog.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_reader::Record;

    fn dataset() -> Arc<Dataset> {
        let rows = [(2021, "junior", 10.0), (2022, "senior", 30.0), (2021, "senior", 50.0)]
            .into_iter()
            .map(|(year, seniority, salary)| Record {
                year,
                seniority: seniority.to_string(),
                contract_type: "integral".to_string(),
                company_size: "media".to_string(),
                role: "Analyst".to_string(),
                remote_mode: "remoto".to_string(),
                country_code: "BRA".to_string(),
                salary_usd: salary,
            })
            .collect();
        Arc::new(Dataset::new(rows))
    }

    #[test]
    fn starts_with_everything_selected() {
        let session = Session::new(dataset());
        assert_eq!(session.selection(), session.catalog());
        assert_eq!(session.artifacts().kpis.count, 3);
    }

    #[test]
    fn toggling_recomputes_from_full_dataset() {
        let mut session = Session::new(dataset());
        session.toggle(Dimension::Year, 0);
        assert_eq!(session.artifacts().kpis.count, 1);
        assert!(!session.is_selected(Dimension::Year, 0));

        session.toggle(Dimension::Year, 0);
        assert_eq!(session.artifacts().kpis.count, 3);
    }

    #[test]
    fn catalog_does_not_follow_the_filter() {
        let mut session = Session::new(dataset());
        session.clear(Dimension::Seniority);
        assert_eq!(session.artifacts().kpis.count, 0);
        assert_eq!(session.catalog().labels(Dimension::Seniority), vec!["junior", "senior"]);

        session.select_all(Dimension::Seniority);
        assert_eq!(session.artifacts().kpis.count, 3);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut session = Session::new(dataset());
        session.clear(Dimension::Year);
        session.toggle(Dimension::Seniority, 1);
        session.reset();
        assert_eq!(session.selection(), session.catalog());
    }

    #[test]
    fn sessions_share_the_dataset_but_not_selections() {
        let shared = dataset();
        let mut first = Session::new(Arc::clone(&shared));
        let second = Session::new(Arc::clone(&shared));
        first.clear(Dimension::Year);

        assert_eq!(first.artifacts().kpis.count, 0);
        assert_eq!(second.artifacts().kpis.count, 3);
        assert_eq!(Arc::strong_count(&shared), 3);
    }
}
