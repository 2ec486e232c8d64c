use std::path::{Path, PathBuf};
use std::sync::Arc;

use laptop_trends::config::{
    LoaderConfig, DEFAULT_BRAND_SELECTION, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MIN_PAGE_SIZE,
};
use laptop_trends::data::aggregate::{brand_share, summary, trends};
use laptop_trends::data::export::write_csv_to_path;
use laptop_trends::data::filter::{filter, FilterCriteria};
use laptop_trends::data::loader::load;
use laptop_trends::data::model::{BrandCount, Laptop, LaptopTable, Summary, TrendPoint};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Catalog,
    BrandShare,
    Trends,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub loader_config: LoaderConfig,

    /// File the current table came from.
    pub source: Option<PathBuf>,

    /// Loaded catalog (None until a file with usable data is loaded).
    pub table: Option<Arc<LaptopTable>>,

    /// Current filter selection.
    pub criteria: FilterCriteria,

    /// Raw text of the search box.
    pub search_text: String,

    /// Rows passing the current filters, plus what is derived from them.
    pub filtered: LaptopTable,
    pub summary: Summary,
    pub brand_share: Vec<BrandCount>,
    pub brand_colors: ColorMap,

    /// Trend over the full, unfiltered table.
    pub trends: Vec<TrendPoint>,

    pub tab: Tab,

    /// 1-based catalog page.
    pub page: usize,
    pub page_size: usize,

    /// Index into `filtered` of the card whose details are shown.
    pub expanded: Option<usize>,

    /// Rescale every trend series to [0, 1] before plotting.
    pub minmax_scaling: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

impl AppState {
    pub fn new(loader_config: LoaderConfig) -> Self {
        Self {
            loader_config,
            source: None,
            table: None,
            criteria: FilterCriteria::default(),
            search_text: String::new(),
            filtered: LaptopTable::default(),
            summary: Summary::default(),
            brand_share: Vec::new(),
            brand_colors: ColorMap::new(std::iter::empty()),
            trends: Vec::new(),
            tab: Tab::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            expanded: None,
            minmax_scaling: false,
            status_message: None,
        }
    }

    /// Load `path` and make it the current catalog.
    pub fn open(&mut self, path: &Path) {
        let table = load(path, &self.loader_config);
        self.source = Some(path.to_path_buf());
        self.set_table(table);
    }

    /// Ingest a newly loaded table, initialise filters and derived views.
    ///
    /// An empty table means the load failed; nothing is derived from it.
    pub fn set_table(&mut self, table: LaptopTable) {
        if table.is_empty() {
            self.table = None;
            self.filtered = LaptopTable::default();
            self.summary = Summary::default();
            self.brand_share.clear();
            self.trends.clear();
            self.status_message = Some("No data loaded, or the CSV file is empty.".to_string());
            return;
        }

        let mut criteria = FilterCriteria::spanning(&table);
        criteria.brands = table
            .brands()
            .into_iter()
            .take(DEFAULT_BRAND_SELECTION)
            .collect();
        self.criteria = criteria;
        self.search_text.clear();
        self.trends = trends(&table);
        self.table = Some(Arc::new(table));
        self.page = 1;
        self.expanded = None;
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the filtered table and its aggregates after a filter change.
    pub fn refilter(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        self.criteria.search = Some(self.search_text.clone());
        self.filtered = filter(table, &self.criteria);
        self.summary = summary(&self.filtered);
        self.brand_share = brand_share(&self.filtered);
        self.brand_colors = ColorMap::new(self.brand_share.iter().map(|b| b.brand.as_str()));
        self.expanded = None;
        self.page = self.page.clamp(1, self.total_pages());
    }

    // -- Brand selection --

    pub fn toggle_brand(&mut self, brand: &str) {
        if !self.criteria.brands.remove(brand) {
            self.criteria.brands.insert(brand.to_string());
        }
        self.refilter();
    }

    pub fn select_all_brands(&mut self) {
        if let Some(table) = &self.table {
            self.criteria.brands = table.brands().into_iter().collect();
            self.refilter();
        }
    }

    /// Clearing the selection removes the brand constraint altogether.
    pub fn select_no_brands(&mut self) {
        self.criteria.brands.clear();
        self.refilter();
    }

    // -- Catalog paging --

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
        self.page = self.page.clamp(1, self.total_pages());
    }

    pub fn total_pages(&self) -> usize {
        self.filtered.len().div_ceil(self.page_size).max(1)
    }

    pub fn next_page(&mut self) {
        if self.page < self.total_pages() {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    pub fn jump_to(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages());
    }

    /// Indices into `filtered`, cheapest first.
    pub fn catalog_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.filtered.len()).collect();
        order.sort_by(|&a, &b| {
            self.filtered.laptops[a]
                .price_usd
                .total_cmp(&self.filtered.laptops[b].price_usd)
        });
        order
    }

    /// Indices into `filtered` shown on the current page.
    pub fn page_indices(&self) -> Vec<usize> {
        let start = (self.page - 1) * self.page_size;
        self.catalog_order()
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect()
    }

    pub fn laptop(&self, idx: usize) -> Option<&Laptop> {
        self.filtered.laptops.get(idx)
    }

    pub fn toggle_details(&mut self, idx: usize) {
        self.expanded = if self.expanded == Some(idx) {
            None
        } else {
            Some(idx)
        };
    }

    // -- Export --

    pub fn export(&mut self, path: &Path) {
        match write_csv_to_path(&self.filtered, path) {
            Ok(()) => {
                self.status_message = Some(format!(
                    "Exported {} laptops to {}",
                    self.filtered.len(),
                    path.display()
                ));
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.status_message = Some(format!("Export failed: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use laptop_trends::data::loader::load_reader;

    fn state_with(rows: usize) -> AppState {
        let mut csv = String::from("brand,model,price_usd\n");
        for i in 0..rows {
            csv.push_str(&format!("Brand{},M{i},{}\n", i % 7, 1000 - i));
        }
        let mut state = AppState::default();
        state.set_table(load_reader(csv.as_bytes(), &LoaderConfig::default()));
        state.select_no_brands();
        state
    }

    #[test]
    fn empty_table_is_reported_not_filtered() {
        let mut state = AppState::default();
        state.set_table(LaptopTable::default());
        assert!(state.table.is_none());
        assert!(state.status_message.is_some());
        assert!(state.brand_share.is_empty());
    }

    #[test]
    fn first_brands_are_preselected() {
        let mut state = AppState::default();
        let csv = "brand,price_usd\nF,1\nE,1\nD,1\nC,1\nB,1\nA,1\n";
        state.set_table(load_reader(csv.as_bytes(), &LoaderConfig::default()));
        let selected: Vec<&str> = state.criteria.brands.iter().map(String::as_str).collect();
        assert_eq!(selected, vec!["A", "B", "C", "D", "E"]);
        assert_eq!(state.filtered.len(), 5);
        assert_eq!(state.trends.len(), 3);
    }

    #[test]
    fn paging_stays_in_bounds() {
        let mut state = state_with(30);
        assert_eq!(state.total_pages(), 3);
        state.prev_page();
        assert_eq!(state.page, 1);
        state.jump_to(99);
        assert_eq!(state.page, 3);
        state.next_page();
        assert_eq!(state.page, 3);
        assert_eq!(state.page_indices().len(), 6);

        state.set_page_size(60);
        assert_eq!(state.total_pages(), 1);
        assert_eq!(state.page, 1);
    }

    #[test]
    fn catalog_is_sorted_by_price() {
        let state = state_with(5);
        let prices: Vec<f64> = state
            .page_indices()
            .into_iter()
            .filter_map(|i| state.laptop(i))
            .map(|l| l.price_usd)
            .collect();
        assert_eq!(prices, vec![996.0, 997.0, 998.0, 999.0, 1000.0]);
    }

    #[test]
    fn search_box_narrows_the_catalog() {
        let mut state = state_with(10);
        state.search_text = "m3".to_string();
        state.refilter();
        assert_eq!(state.filtered.len(), 1);
        assert_eq!(state.summary.count, 1);
    }

    #[test]
    fn details_toggle_on_and_off() {
        let mut state = state_with(3);
        state.toggle_details(1);
        assert_eq!(state.expanded, Some(1));
        state.toggle_details(1);
        assert_eq!(state.expanded, None);
    }
}
