use std::fmt;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const COL_BRAND: &str = "brand";
pub const COL_MODEL: &str = "model";
pub const COL_PRICE: &str = "price_usd";
pub const COL_SCREEN: &str = "screen_size_in";
pub const COL_BATTERY: &str = "battery_wh";
pub const COL_YEAR: &str = "release_year";
pub const COL_CPU: &str = "cpu";
pub const COL_DISPLAY: &str = "display_type";
pub const COL_IMAGE_LIST: &str = "image_list";
pub const COL_THUMBNAIL: &str = "thumbnail";
pub const COL_AI_CPU: &str = "is_ai_cpu";
pub const COL_OLED: &str = "is_oled";

/// Columns every loaded table carries, in export order.
pub const CANONICAL_COLUMNS: [&str; 12] = [
    COL_BRAND,
    COL_MODEL,
    COL_PRICE,
    COL_SCREEN,
    COL_BATTERY,
    COL_YEAR,
    COL_CPU,
    COL_DISPLAY,
    COL_IMAGE_LIST,
    COL_THUMBNAIL,
    COL_AI_CPU,
    COL_OLED,
];

// ---------------------------------------------------------------------------
// Laptop – one row of the catalog
// ---------------------------------------------------------------------------

/// A single normalized laptop listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Laptop {
    /// Trimmed, title-cased brand.
    pub brand: String,
    pub model: String,
    /// Always finite and non-negative after loading.
    pub price_usd: f64,
    pub screen_size_in: f64,
    pub battery_wh: f64,
    pub release_year: i32,
    pub cpu: String,
    pub display_type: String,
    pub is_ai_cpu: bool,
    pub is_oled: bool,
    /// Image references in source order, trimmed, without empty fragments.
    pub image_list: Vec<String>,
    /// Directly fetchable URL, or empty when no image resolved.
    pub thumbnail: String,
    /// Values of the table's passthrough columns, aligned with
    /// [`LaptopTable::extra_columns`].
    pub extra: Vec<String>,
}

impl Laptop {
    /// `"Brand Model"`, as shown on catalog cards and matched by search.
    pub fn display_name(&self) -> String {
        if self.model.is_empty() {
            self.brand.clone()
        } else {
            format!("{} {}", self.brand, self.model)
        }
    }

    pub fn has_thumbnail(&self) -> bool {
        !self.thumbnail.is_empty()
    }
}

// ---------------------------------------------------------------------------
// LaptopTable – the loaded (or filtered) catalog
// ---------------------------------------------------------------------------

/// An ordered collection of laptops with a fixed schema.
///
/// A table coming out of the loader is never mutated; filtering builds a new
/// table that shares the same `extra_columns`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaptopTable {
    pub laptops: Vec<Laptop>,
    /// Input columns outside [`CANONICAL_COLUMNS`], in input order. Source
    /// image columns (`image_urls`, `image_path`, ...) land here too.
    pub extra_columns: Vec<String>,
}

impl LaptopTable {
    pub fn new(laptops: Vec<Laptop>, extra_columns: Vec<String>) -> Self {
        Self {
            laptops,
            extra_columns,
        }
    }

    /// Number of laptops.
    pub fn len(&self) -> usize {
        self.laptops.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.laptops.is_empty()
    }

    /// Canonical columns followed by passthrough columns.
    pub fn column_names(&self) -> Vec<String> {
        CANONICAL_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.extra_columns.iter().cloned())
            .collect()
    }

    /// Sorted distinct brands.
    pub fn brands(&self) -> Vec<String> {
        let mut brands: Vec<String> = self.laptops.iter().map(|l| l.brand.clone()).collect();
        brands.sort();
        brands.dedup();
        brands
    }

    /// `(min, max)` of `price_usd`, `None` for an empty table.
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        bounds(self.laptops.iter().map(|l| l.price_usd))
    }

    /// `(min, max)` of `screen_size_in`, `None` for an empty table.
    pub fn screen_bounds(&self) -> Option<(f64, f64)> {
        bounds(self.laptops.iter().map(|l| l.screen_size_in))
    }

    /// Passthrough value for `column` on `laptop`, if that column exists.
    pub fn extra_value<'a>(&self, laptop: &'a Laptop, column: &str) -> Option<&'a str> {
        let idx = self.extra_columns.iter().position(|c| c == column)?;
        laptop.extra.get(idx).map(String::as_str)
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

// ---------------------------------------------------------------------------
// Filter vocabulary
// ---------------------------------------------------------------------------

/// How the AI-capable CPU flag constrains a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiCpuMode {
    #[default]
    Any,
    AiOnly,
    NonAiOnly,
}

impl AiCpuMode {
    pub const ALL: [AiCpuMode; 3] = [AiCpuMode::Any, AiCpuMode::AiOnly, AiCpuMode::NonAiOnly];

    pub fn accepts(self, is_ai_cpu: bool) -> bool {
        match self {
            AiCpuMode::Any => true,
            AiCpuMode::AiOnly => is_ai_cpu,
            AiCpuMode::NonAiOnly => !is_ai_cpu,
        }
    }
}

impl fmt::Display for AiCpuMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiCpuMode::Any => write!(f, "All"),
            AiCpuMode::AiOnly => write!(f, "With AI"),
            AiCpuMode::NonAiOnly => write!(f, "Without AI"),
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregate rows
// ---------------------------------------------------------------------------

/// One row of the brand-share table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandCount {
    pub brand: String,
    pub count: usize,
}

/// The three per-year series of the trend table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TrendMetric {
    AvgPrice,
    AvgBattery,
    PctOled,
}

impl TrendMetric {
    pub const ALL: [TrendMetric; 3] = [
        TrendMetric::AvgPrice,
        TrendMetric::AvgBattery,
        TrendMetric::PctOled,
    ];

    /// Machine name, as written in the `metric` column.
    pub fn key(self) -> &'static str {
        match self {
            TrendMetric::AvgPrice => "avg_price",
            TrendMetric::AvgBattery => "avg_battery",
            TrendMetric::PctOled => "pct_oled",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrendMetric::AvgPrice => "Average price (USD)",
            TrendMetric::AvgBattery => "Average battery (Wh)",
            TrendMetric::PctOled => "OLED share",
        }
    }
}

impl fmt::Display for TrendMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.key())
    }
}

/// One `(year, metric, value)` row of the long-format trend table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub year: i32,
    pub metric: TrendMetric,
    pub value: f64,
}

/// Headline numbers shown above the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub count: usize,
    /// `None` for an empty table.
    pub mean_price: Option<f64>,
    pub mean_battery: Option<f64>,
}
