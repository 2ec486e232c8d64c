use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};

use laptop_trends::config::{LoaderConfig, DEFAULT_IMAGE_BASE_URL, ENV_DATA_PATH, ENV_IMAGE_BASE};
use laptop_trends::data::aggregate::{brand_share, summary, trends};
use laptop_trends::data::export::write_csv_to_path;
use laptop_trends::data::filter::{filter, FilterCriteria};
use laptop_trends::data::loader::try_load;
use laptop_trends::data::model::AiCpuMode;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AiArg {
    Any,
    Ai,
    NonAi,
}

impl From<AiArg> for AiCpuMode {
    fn from(arg: AiArg) -> Self {
        match arg {
            AiArg::Any => AiCpuMode::Any,
            AiArg::Ai => AiCpuMode::AiOnly,
            AiArg::NonAi => AiCpuMode::NonAiOnly,
        }
    }
}

/// Print summary, brand share and trends for a laptop catalog.
#[derive(Debug, Parser)]
#[command(name = "report", version, about)]
struct Cli {
    /// CSV catalog to read
    #[arg(env = ENV_DATA_PATH)]
    data: PathBuf,

    /// Keep only these brands (repeatable, as normalized: "Dell", "Hp")
    #[arg(long = "brand")]
    brands: Vec<String>,

    #[arg(long)]
    price_min: Option<f64>,
    #[arg(long)]
    price_max: Option<f64>,

    #[arg(long)]
    screen_min: Option<f64>,
    #[arg(long)]
    screen_max: Option<f64>,

    /// AI-capable CPU constraint
    #[arg(long, value_enum, default_value_t = AiArg::Any)]
    ai: AiArg,

    /// Case-insensitive substring of "brand model"
    #[arg(long)]
    search: Option<String>,

    /// Write the filtered rows to this CSV file
    #[arg(long)]
    export: Option<PathBuf>,

    /// Base URL that bare image filenames are resolved against
    #[arg(long, env = ENV_IMAGE_BASE, default_value = DEFAULT_IMAGE_BASE_URL)]
    image_base: String,
}

impl Cli {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            brands: self.brands.iter().cloned().collect(),
            price_range: range(self.price_min, self.price_max),
            screen_range: range(self.screen_min, self.screen_max),
            ai_cpu: self.ai.into(),
            search: self.search.clone(),
        }
    }
}

/// An open-ended bound becomes infinite; no bounds at all means no range.
fn range(min: Option<f64>, max: Option<f64>) -> Option<(f64, f64)> {
    match (min, max) {
        (None, None) => None,
        (min, max) => Some((min.unwrap_or(f64::NEG_INFINITY), max.unwrap_or(f64::INFINITY))),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = LoaderConfig::with_image_base(cli.image_base.clone());
    let table = match try_load(&cli.data, &config) {
        Ok(table) if !table.is_empty() => table,
        Ok(_) => bail!("{} holds no laptops", cli.data.display()),
        Err(e) => bail!("no usable data in {}: {e}", cli.data.display()),
    };

    let filtered = filter(&table, &cli.criteria());
    let stats = summary(&filtered);

    println!("Laptops: {} loaded, {} after filters", table.len(), stats.count);
    match (stats.mean_price, stats.mean_battery) {
        (Some(price), Some(battery)) => {
            println!("Average price: ${price:.0}  Average battery: {battery:.0} Wh")
        }
        _ => println!("Average price: —  Average battery: —"),
    }

    println!();
    println!("Brand share");
    for share in brand_share(&filtered) {
        println!("  {:<16} {:>5}", share.brand, share.count);
    }

    println!();
    println!("Trends (all laptops)");
    for point in trends(&table) {
        println!("  {}  {:<12} {:>10.3}", point.year, point.metric, point.value);
    }

    if let Some(path) = &cli.export {
        write_csv_to_path(&filtered, path)?;
        println!();
        println!("Wrote {} rows to {}", filtered.len(), path.display());
    }
    Ok(())
}
