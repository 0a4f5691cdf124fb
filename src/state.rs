use std::path::Path;
use std::sync::Arc;

use crate::data::filter::{apply_category_filter, distinct_identifiers, select_product};
use crate::data::loader::load_file;
use crate::data::model::{ProductView, SalesTable, VendorSet};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Kpis,
    TimeSeries,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded table (None until a file is loaded). Never mutated.
    pub dataset: Option<Arc<SalesTable>>,

    /// Vendor codes counted as the house company.
    pub vendors: VendorSet,

    /// "Only PepsiCo Products" checkbox.
    pub only_known_vendors: bool,

    /// UPCs offered by the product selector (cached).
    pub product_options: Vec<String>,

    /// Currently selected UPC.
    pub selected_upc: Option<String>,

    /// Header and series for the selected UPC (cached).
    pub view: Option<ProductView>,

    pub active_tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            vendors: VendorSet::default(),
            only_known_vendors: false,
            product_options: Vec::new(),
            selected_upc: None,
            view: None,
            active_tab: Tab::default(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Load a file and ingest it, reporting failures in the status bar.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(table) => {
                log::info!(
                    "Loaded {} rows ({} products) from {}",
                    table.len(),
                    distinct_identifiers(&table).len(),
                    path.display()
                );
                self.set_dataset(table);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded table and select its first product.
    pub fn set_dataset(&mut self, table: SalesTable) {
        self.dataset = Some(Arc::new(table));
        self.selected_upc = None;
        self.status_message = None;
        self.refilter();
    }

    /// Toggle the known-vendor filter and rebuild the selection.
    pub fn set_only_known_vendors(&mut self, only: bool) {
        if self.only_known_vendors != only {
            self.only_known_vendors = only;
            self.refilter();
        }
    }

    /// Select a product and rebuild the cached view.
    pub fn select_upc(&mut self, upc: &str) {
        self.selected_upc = Some(upc.to_string());
        self.rebuild_view();
    }

    /// Recompute the product options after a filter change. A selection that
    /// is no longer offered falls back to the first option.
    pub fn refilter(&mut self) {
        let Some(table) = &self.dataset else {
            return;
        };
        let candidates = apply_category_filter(table, self.only_known_vendors, &self.vendors);
        self.product_options = distinct_identifiers(&candidates);
        log::debug!(
            "{} candidate rows, {} products",
            candidates.len(),
            self.product_options.len()
        );

        let still_offered = self
            .selected_upc
            .as_ref()
            .is_some_and(|upc| self.product_options.contains(upc));
        if !still_offered {
            self.selected_upc = self.product_options.first().cloned();
        }
        self.rebuild_view();
    }

    fn rebuild_view(&mut self) {
        self.view = None;
        let (Some(table), Some(upc)) = (&self.dataset, &self.selected_upc) else {
            return;
        };
        match select_product(table, self.only_known_vendors, &self.vendors, upc) {
            Ok(view) => {
                self.view = Some(view);
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("{e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::row;

    fn state_with_table() -> AppState {
        let table = SalesTable::new(vec![
            row("B", 99999, 1, 10.0),
            row("A", 28400, 1, 100.0),
            row("A", 28400, 2, 200.0),
        ])
        .unwrap();
        let mut state = AppState::default();
        state.set_dataset(table);
        state
    }

    #[test]
    fn new_dataset_selects_first_product() {
        let state = state_with_table();
        assert_eq!(state.product_options, vec!["B", "A"]);
        assert_eq!(state.selected_upc.as_deref(), Some("B"));
        let view = state.view.as_ref().unwrap();
        assert_eq!(view.header.parent_company, "PARENT 99999");
    }

    #[test]
    fn vendor_filter_drops_unoffered_selection() {
        let mut state = state_with_table();
        state.set_only_known_vendors(true);
        assert_eq!(state.product_options, vec!["A"]);
        assert_eq!(state.selected_upc.as_deref(), Some("A"));
        let view = state.view.as_ref().unwrap();
        assert_eq!(view.header.parent_company, "PEPSICO INC");
        assert_eq!(view.series.len(), 2);
    }

    #[test]
    fn vendor_filter_keeps_offered_selection() {
        let mut state = state_with_table();
        state.select_upc("A");
        state.set_only_known_vendors(true);
        state.set_only_known_vendors(false);
        assert_eq!(state.selected_upc.as_deref(), Some("A"));
    }

    #[test]
    fn unknown_selection_reports_status_instead_of_panicking() {
        let mut state = state_with_table();
        state.select_upc("NOPE");
        assert!(state.view.is_none());
        assert!(state.status_message.as_deref().unwrap().contains("NOPE"));
    }

    #[test]
    fn missing_file_sets_status_message() {
        let mut state = AppState::default();
        state.load_path(Path::new("does/not/exist.csv"));
        assert!(state.dataset.is_none());
        assert!(state.status_message.is_some());
    }
}
