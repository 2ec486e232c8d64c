use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use thiserror::Error;

use super::images::{split_image_list, ImageUrlNormalizer};
use super::model::{
    Laptop, LaptopTable, CANONICAL_COLUMNS, COL_BATTERY, COL_BRAND, COL_CPU, COL_DISPLAY,
    COL_IMAGE_LIST, COL_MODEL, COL_PRICE, COL_SCREEN, COL_YEAR,
};
use crate::config::{
    LoaderConfig, DEFAULT_BATTERY_WH, DEFAULT_RELEASE_YEAR, DEFAULT_SCREEN_SIZE_IN,
};

/// Image-reference columns, most preferred first. Values are `;`-separated;
/// each row reads the first of them that is not blank.
const IMAGE_LIST_COLUMNS: [&str; 3] = ["image_urls", "image_url", COL_IMAGE_LIST];

/// Single-image columns consulted when the image list yields nothing.
const ALT_IMAGE_COLUMNS: [&str; 2] = ["image_path", "image"];

/// Substrings (lower-case) that mark a CPU as AI-capable.
const AI_CPU_KEYWORDS: [&str; 3] = ["ultra", "ai", "ryzen ai"];

const OLED_KEYWORD: &str = "oled";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a catalog file could not produce a usable table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("opening {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV missing required '{0}' column")]
    MissingColumn(&'static str),

    #[error("none of the {rows} rows has a valid '{col}' value", col = COL_PRICE)]
    NoPriceData { rows: usize },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a laptop catalog from a CSV file.
///
/// Never fails: any problem with the source is logged and collapsed to an
/// empty table, which callers must treat as "no usable data".
pub fn load(path: &Path, config: &LoaderConfig) -> LaptopTable {
    fail_soft(try_load(path, config), &path.display().to_string())
}

/// Like [`load`] but for an already open CSV stream.
pub fn load_reader<R: Read>(reader: R, config: &LoaderConfig) -> LaptopTable {
    fail_soft(try_load_reader(reader, config), "<reader>")
}

/// Load a laptop catalog from a CSV file, reporting why it failed.
pub fn try_load(path: &Path, config: &LoaderConfig) -> Result<LaptopTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    try_load_reader(file, config)
}

/// Parse and normalize CSV data from any reader.
///
/// A header-only input is not an error: it yields an empty table.
pub fn try_load_reader<R: Read>(reader: R, config: &LoaderConfig) -> Result<LaptopTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let columns = Columns::locate(&headers)?;

    let mut records = Vec::new();
    let mut blank_brands = 0usize;
    for result in reader.records() {
        let record = result?;
        if cell(&record, Some(columns.brand)).is_empty() {
            blank_brands += 1;
            continue;
        }
        records.push(record);
    }
    if blank_brands > 0 {
        log::debug!("Dropped {blank_brands} rows with a blank brand");
    }

    let extra_columns: Vec<String> = columns.extras.iter().map(|(_, name)| name.clone()).collect();
    if records.is_empty() {
        return Ok(LaptopTable::new(Vec::new(), extra_columns));
    }

    let table = normalize_records(&records, &columns, config)?;
    Ok(LaptopTable::new(table, extra_columns))
}

fn fail_soft(result: Result<LaptopTable, LoadError>, source: &str) -> LaptopTable {
    match result {
        Ok(table) => {
            log::info!(
                "Loaded {} laptops from {source} ({} passthrough columns)",
                table.len(),
                table.extra_columns.len()
            );
            table
        }
        Err(e) => {
            log::warn!("Failed to load {source}: {e}");
            LaptopTable::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Column lookup
// ---------------------------------------------------------------------------

/// Header positions of every column the loader understands.
struct Columns {
    brand: usize,
    price: usize,
    model: Option<usize>,
    screen: Option<usize>,
    battery: Option<usize>,
    year: Option<usize>,
    cpu: Option<usize>,
    display: Option<usize>,
    /// Present image-list columns, in preference order.
    images: Vec<usize>,
    alt_images: Vec<usize>,
    /// Columns outside the canonical set, source image columns included:
    /// (position, name).
    extras: Vec<(usize, String)>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, LoadError> {
        let find = |name: &str| position(headers, name);

        let mut extras: Vec<(usize, String)> = Vec::new();
        for (i, h) in headers.iter().enumerate() {
            if h.is_empty()
                || CANONICAL_COLUMNS.iter().any(|c| *c == h)
                || extras.iter().any(|(_, e)| e == h)
            {
                continue;
            }
            extras.push((i, h.to_string()));
        }

        Ok(Self {
            brand: find(COL_BRAND).ok_or(LoadError::MissingColumn(COL_BRAND))?,
            price: find(COL_PRICE).ok_or(LoadError::MissingColumn(COL_PRICE))?,
            model: find(COL_MODEL),
            screen: find(COL_SCREEN),
            battery: find(COL_BATTERY),
            year: find(COL_YEAR),
            cpu: find(COL_CPU),
            display: find(COL_DISPLAY),
            images: positions(headers, &IMAGE_LIST_COLUMNS),
            alt_images: positions(headers, &ALT_IMAGE_COLUMNS),
            extras,
        })
    }
}

fn position(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

/// Positions of those `names` present in the header row, in `names` order.
fn positions(headers: &StringRecord, names: &[&str]) -> Vec<usize> {
    names.iter().filter_map(|n| position(headers, n)).collect()
}

/// Trimmed cell text; absent columns and short rows read as `""`.
fn cell(record: &StringRecord, idx: Option<usize>) -> &str {
    idx.and_then(|i| record.get(i)).unwrap_or("").trim()
}

/// First non-blank cell among `columns`, or `""`.
fn first_filled<'r>(record: &'r StringRecord, columns: &[usize]) -> &'r str {
    columns
        .iter()
        .map(|&i| cell(record, Some(i)))
        .find(|c| !c.is_empty())
        .unwrap_or("")
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// How many cells fell back to a default, per column.
#[derive(Debug, Default)]
struct Fallbacks {
    price: usize,
    screen: usize,
    battery: usize,
    year: usize,
}

fn normalize_records(
    records: &[StringRecord],
    columns: &Columns,
    config: &LoaderConfig,
) -> Result<Vec<Laptop>, LoadError> {
    let normalizer = ImageUrlNormalizer::new(&config.image_base_url);

    let prices: Vec<Option<f64>> = records
        .iter()
        .map(|r| parse_number(cell(r, Some(columns.price))).filter(|p| *p >= 0.0))
        .collect();
    let price_fill = median(prices.iter().flatten().copied()).ok_or(LoadError::NoPriceData {
        rows: records.len(),
    })?;

    let batteries: Vec<Option<f64>> = records
        .iter()
        .map(|r| parse_number(cell(r, columns.battery)))
        .collect();
    let battery_fill = match columns.battery {
        Some(_) => median(batteries.iter().flatten().copied()).unwrap_or(DEFAULT_BATTERY_WH),
        None => DEFAULT_BATTERY_WH,
    };

    let mut fallbacks = Fallbacks::default();
    let laptops = records
        .iter()
        .zip(prices)
        .zip(batteries)
        .map(|((record, price), battery)| {
            let brand = title_case(cell(record, Some(columns.brand)));

            let price_usd = price.unwrap_or_else(|| {
                fallbacks.price += 1;
                price_fill
            });
            let screen_size_in = parse_number(cell(record, columns.screen)).unwrap_or_else(|| {
                fallbacks.screen += 1;
                DEFAULT_SCREEN_SIZE_IN
            });
            let battery_wh = battery.unwrap_or_else(|| {
                fallbacks.battery += 1;
                battery_fill
            });
            let release_year = parse_number(cell(record, columns.year))
                .map(|y| y.trunc() as i32)
                .unwrap_or_else(|| {
                    fallbacks.year += 1;
                    DEFAULT_RELEASE_YEAR
                });

            let image_list = split_image_list(first_filled(record, &columns.images));
            let thumbnail =
                thumbnail_for(&image_list, first_filled(record, &columns.alt_images), &normalizer);

            let cpu = cell(record, columns.cpu).to_string();
            let display_type = cell(record, columns.display).to_string();
            let is_ai_cpu = is_ai_cpu(&cpu);
            let is_oled = is_oled(&display_type);

            let extra = columns
                .extras
                .iter()
                .map(|(i, _)| record.get(*i).unwrap_or("").to_string())
                .collect();

            Laptop {
                brand,
                model: cell(record, columns.model).to_string(),
                price_usd,
                screen_size_in,
                battery_wh,
                release_year,
                cpu,
                display_type,
                is_ai_cpu,
                is_oled,
                image_list,
                thumbnail,
                extra,
            }
        })
        .collect();

    log::debug!(
        "Fallbacks applied: price={} (median {price_fill}), screen={}, battery={} ({battery_fill}), year={}",
        fallbacks.price,
        fallbacks.screen,
        fallbacks.battery,
        fallbacks.year
    );
    Ok(laptops)
}

/// Finite number or `None`; `nan`/`inf` count as unparseable.
fn parse_number(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn median(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut values: Vec<f64> = values.collect();
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Upper-case the first letter of every run of letters, lower-case the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

pub fn is_ai_cpu(cpu: &str) -> bool {
    let cpu = cpu.to_lowercase();
    AI_CPU_KEYWORDS.iter().any(|k| cpu.contains(k))
}

pub fn is_oled(display_type: &str) -> bool {
    display_type.to_lowercase().contains(OLED_KEYWORD)
}

/// First image of the list, else the alternate single-image column.
fn thumbnail_for(images: &[String], alternate: &str, normalizer: &ImageUrlNormalizer) -> String {
    let first = images
        .first()
        .map(|r| normalizer.normalize(r))
        .unwrap_or_default();
    if first.is_empty() {
        normalizer.normalize(alternate)
    } else {
        first
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_IMAGE_BASE_URL;

    fn load_str(csv: &str) -> LaptopTable {
        load_reader(csv.as_bytes(), &LoaderConfig::default())
    }

    #[test]
    fn normalizes_the_two_row_example() {
        let table = load_str(
            "brand,price_usd,cpu,display_type,release_year\n\
             \" dell \",999,Intel i7,OLED,2024\n\
             HP,abc,Snapdragon X AI,IPS,2024\n",
        );
        assert_eq!(table.len(), 2);

        let dell = &table.laptops[0];
        assert_eq!(dell.brand, "Dell");
        assert_eq!(dell.price_usd, 999.0);
        assert!(!dell.is_ai_cpu);
        assert!(dell.is_oled);

        let hp = &table.laptops[1];
        assert_eq!(hp.brand, "Hp");
        assert_eq!(hp.price_usd, 999.0);
        assert!(hp.is_ai_cpu);
        assert!(!hp.is_oled);
    }

    #[test]
    fn missing_optional_columns_use_defaults() {
        let table = load_str("brand,price_usd\nAsus,1200\n");
        let laptop = &table.laptops[0];
        assert_eq!(laptop.screen_size_in, DEFAULT_SCREEN_SIZE_IN);
        assert_eq!(laptop.battery_wh, DEFAULT_BATTERY_WH);
        assert_eq!(laptop.release_year, DEFAULT_RELEASE_YEAR);
        assert_eq!(laptop.model, "");
        assert!(!laptop.is_ai_cpu);
        assert!(!laptop.is_oled);
        assert!(laptop.image_list.is_empty());
        assert_eq!(laptop.thumbnail, "");
    }

    #[test]
    fn battery_gaps_use_the_column_median() {
        let table = load_str(
            "brand,price_usd,battery_wh,screen_size_in,release_year\n\
             A,100,40,14,2023.0\n\
             B,200,,x,\n\
             C,300,72,15.6,2024\n",
        );
        let b = &table.laptops[1];
        assert_eq!(b.battery_wh, 56.0);
        assert_ne!(b.battery_wh, DEFAULT_BATTERY_WH);
        assert_eq!(b.screen_size_in, DEFAULT_SCREEN_SIZE_IN);
        assert_eq!(b.release_year, DEFAULT_RELEASE_YEAR);
        assert_eq!(table.laptops[0].release_year, 2023);
    }

    #[test]
    fn price_median_ignores_invalid_and_negative_values() {
        let table = load_str("brand,price_usd\nA,100\nB,-5\nC,nan\nD,300\n");
        let prices: Vec<f64> = table.laptops.iter().map(|l| l.price_usd).collect();
        assert_eq!(prices, vec![100.0, 200.0, 200.0, 300.0]);
    }

    #[test]
    fn unusable_sources_collapse_to_an_empty_table() {
        assert!(load_str("brand,price_usd\nA,abc\nB,\n").is_empty());
        assert!(load_str("model,price_usd\nX,100\n").is_empty());
        assert!(load_str("").is_empty());
        assert!(load(Path::new("/definitely/not/here.csv"), &LoaderConfig::default()).is_empty());
    }

    #[test]
    fn typed_errors_explain_the_failure() {
        let cfg = LoaderConfig::default();
        assert!(matches!(
            try_load_reader("brand,price_usd\nA,abc\n".as_bytes(), &cfg),
            Err(LoadError::NoPriceData { rows: 1 })
        ));
        assert!(matches!(
            try_load_reader("brand\nA\n".as_bytes(), &cfg),
            Err(LoadError::MissingColumn(COL_PRICE))
        ));
        assert!(matches!(
            try_load(Path::new("/definitely/not/here.csv"), &cfg),
            Err(LoadError::Open { .. })
        ));
    }

    #[test]
    fn header_only_file_is_an_empty_table_not_an_error() {
        let table = try_load_reader("brand,price_usd,sku\n".as_bytes(), &LoaderConfig::default())
            .unwrap();
        assert!(table.is_empty());
        assert_eq!(table.extra_columns, vec!["sku".to_string()]);
    }

    #[test]
    fn blank_brands_are_dropped() {
        let table = load_str("brand,price_usd\n  ,100\nLenovo,200\n");
        assert_eq!(table.len(), 1);
        assert_eq!(table.laptops[0].brand, "Lenovo");
    }

    #[test]
    fn images_resolve_to_a_thumbnail() {
        let table = load_str(
            "brand,price_usd,image_urls,image_path\n\
             A,1,\"a.png; b.png\",\n\
             B,1,\"not an image;b.png\",alt.jpg\n\
             C,1,,\n",
        );
        let a = &table.laptops[0];
        assert_eq!(a.image_list, vec!["a.png".to_string(), "b.png".to_string()]);
        assert_eq!(a.thumbnail, format!("{DEFAULT_IMAGE_BASE_URL}a.png"));

        let b = &table.laptops[1];
        assert_eq!(b.thumbnail, format!("{DEFAULT_IMAGE_BASE_URL}alt.jpg"));

        assert_eq!(table.laptops[2].thumbnail, "");
    }

    #[test]
    fn each_row_reads_the_first_filled_image_column() {
        let table = load_str(
            "brand,price_usd,image_urls,image_url\n\
             A,1,,single.png\n\
             B,1,x.png;y.png,ignored.png\n",
        );
        let a = &table.laptops[0];
        assert_eq!(a.image_list, vec!["single.png".to_string()]);
        assert_eq!(a.thumbnail, format!("{DEFAULT_IMAGE_BASE_URL}single.png"));
        assert_eq!(table.laptops[1].image_list, vec!["x.png".to_string(), "y.png".to_string()]);
    }

    #[test]
    fn singular_image_url_and_image_columns_are_read() {
        let table = load_str(
            "brand,price_usd,image_url,image\n\
             A,1,https://cdn.example.com/a.jpg,\n\
             B,1,,b.gif\n",
        );
        assert_eq!(table.laptops[0].thumbnail, "https://cdn.example.com/a.jpg");
        let b = &table.laptops[1];
        assert!(b.image_list.is_empty());
        assert_eq!(b.thumbnail, format!("{DEFAULT_IMAGE_BASE_URL}b.gif"));
    }

    #[test]
    fn source_image_columns_are_kept_for_export() {
        let table = load_str("brand,price_usd,image_path,image_list,image_url\nA,1,alt.jpg,,\n");
        assert_eq!(
            table.extra_columns,
            vec!["image_path".to_string(), "image_url".to_string()]
        );
        assert_eq!(table.extra_value(&table.laptops[0], "image_path"), Some("alt.jpg"));
    }

    #[test]
    fn unknown_columns_pass_through() {
        let table = load_str("sku,brand,price_usd,is_oled\nX-1,acer,500,true\n");
        assert_eq!(table.extra_columns, vec!["sku".to_string()]);
        let acer = &table.laptops[0];
        assert_eq!(table.extra_value(acer, "sku"), Some("X-1"));
        // Derived columns are recomputed from display_type, not read back.
        assert!(!acer.is_oled);
    }

    #[test]
    fn short_rows_read_as_missing() {
        let table = load_str("brand,price_usd,screen_size_in\nA,100\nB,200,16\n");
        assert_eq!(table.laptops[0].screen_size_in, DEFAULT_SCREEN_SIZE_IN);
        assert_eq!(table.laptops[1].screen_size_in, 16.0);
    }

    #[test]
    fn title_case_matches_word_boundaries() {
        assert_eq!(title_case("dell"), "Dell");
        assert_eq!(title_case("ASUS ROG"), "Asus Rog");
        assert_eq!(title_case("hp"), "Hp");
        assert_eq!(title_case("msi-pro"), "Msi-Pro");
        assert_eq!(title_case("3m"), "3M");
    }

    #[test]
    fn feature_flags_are_case_insensitive() {
        assert!(is_ai_cpu("Intel Core Ultra 7"));
        assert!(is_ai_cpu("AMD Ryzen AI 9 HX"));
        assert!(!is_ai_cpu("Intel Core i5-1335U"));
        assert!(!is_ai_cpu(""));
        assert!(is_oled("2.8K oled"));
        assert!(!is_oled("IPS"));
    }

    #[test]
    fn median_of_even_and_odd_counts() {
        assert_eq!(median([3.0, 1.0, 2.0].into_iter()), Some(2.0));
        assert_eq!(median([4.0, 1.0, 2.0, 3.0].into_iter()), Some(2.5));
        assert_eq!(median(std::iter::empty()), None);
    }
}
