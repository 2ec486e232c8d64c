//! Defaults shared by the loader, the viewer and the command-line tools.

// ---------------------------------------------------------------------------
// Column fallbacks
// ---------------------------------------------------------------------------

/// Screen diagonal used when `screen_size_in` is missing or unparseable.
pub const DEFAULT_SCREEN_SIZE_IN: f64 = 13.3;

/// Battery capacity used when the `battery_wh` column is absent altogether
/// (or present but without a single valid value).
pub const DEFAULT_BATTERY_WH: f64 = 50.0;

/// Release year used when `release_year` is missing or unparseable.
pub const DEFAULT_RELEASE_YEAR: i32 = 2025;

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// Where bare image filenames (`laptop1.png`) are served from.
pub const DEFAULT_IMAGE_BASE_URL: &str =
    "https://raw.githubusercontent.com/laptop-trends/laptop-trends/main/data/images/";

/// Shown by the viewer when a record has no usable thumbnail.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/600x600?text=No+image";

// ---------------------------------------------------------------------------
// Viewer
// ---------------------------------------------------------------------------

pub const DEFAULT_PAGE_SIZE: usize = 12;
pub const MIN_PAGE_SIZE: usize = 3;
pub const MAX_PAGE_SIZE: usize = 60;

/// Number of brands pre-selected after a file is loaded.
pub const DEFAULT_BRAND_SELECTION: usize = 5;

pub const CARDS_PER_ROW: usize = 4;

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

pub const ENV_DATA_PATH: &str = "LAPTOP_TRENDS_DATA";
pub const ENV_IMAGE_BASE: &str = "LAPTOP_TRENDS_IMAGE_BASE";

/// Options that influence how a CSV is turned into a [`LaptopTable`].
///
/// [`LaptopTable`]: crate::data::model::LaptopTable
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    /// Prefix for bare image filenames.
    pub image_base_url: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
        }
    }
}

impl LoaderConfig {
    pub fn with_image_base(base: impl Into<String>) -> Self {
        Self {
            image_base_url: base.into(),
        }
    }
}
