use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

/// One row of the synthetic catalog, written with the loader's column names.
#[derive(Debug, Serialize)]
struct SampleRow {
    brand: String,
    model: String,
    price_usd: String,
    screen_size_in: f64,
    battery_wh: String,
    release_year: i32,
    cpu: String,
    display_type: String,
    image_urls: String,
    sku: String,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

const BRANDS: [(&str, &[&str]); 6] = [
    ("Dell", &["XPS 13", "XPS 15", "Inspiron 14", "Latitude 7450"]),
    ("HP", &["Spectre x360", "Envy 16", "EliteBook 840", "OmniBook X"]),
    ("Lenovo", &["ThinkPad X1 Carbon", "Yoga Slim 7", "IdeaPad 5"]),
    ("Asus", &["Zenbook 14", "ROG Zephyrus G14", "Vivobook S15"]),
    ("Apple", &["MacBook Air 13", "MacBook Pro 14"]),
    ("Acer", &["Swift Go 14", "Aspire 5"]),
];

const CPUS: [&str; 7] = [
    "Intel Core i5-1335U",
    "Intel Core i7-1360P",
    "Intel Core Ultra 7 155H",
    "AMD Ryzen 7 7840U",
    "AMD Ryzen AI 9 HX 370",
    "Snapdragon X Elite",
    "Apple M3",
];

const DISPLAYS: [&str; 4] = ["IPS", "OLED", "Mini-LED", "IPS 120Hz"];

const SCREENS: [f64; 5] = [13.3, 13.6, 14.0, 15.6, 16.0];

fn main() -> Result<()> {
    env_logger::init();

    let output_path: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/generated_laptops.csv"));

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let mut rng = SimpleRng::new(42);
    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;

    let mut rows = 0usize;
    for year in 2021..=2025 {
        // OLED and AI CPUs become more common every year.
        let progress = (year - 2021) as f64 / 4.0;

        for (brand, models) in BRANDS {
            for _ in 0..3 {
                let model = rng.pick(models).to_string();
                let cpu = if rng.chance(0.15 + 0.6 * progress) {
                    rng.pick(&CPUS[2..5]).to_string()
                } else {
                    rng.pick(&CPUS).to_string()
                };
                let display_type = if rng.chance(0.1 + 0.5 * progress) {
                    "OLED".to_string()
                } else {
                    rng.pick(&DISPLAYS).to_string()
                };

                let price = 650.0 + 900.0 * rng.next_f64() + 60.0 * (year - 2021) as f64;
                let battery = 45.0 + 35.0 * rng.next_f64();

                // A few messy cells so the loader's fallbacks have work to do.
                let price_usd = if rng.chance(0.03) {
                    "n/a".to_string()
                } else {
                    format!("{price:.0}")
                };
                let battery_wh = if rng.chance(0.05) {
                    String::new()
                } else {
                    format!("{battery:.1}")
                };
                let brand = if rng.chance(0.1) {
                    format!(" {} ", brand.to_lowercase())
                } else {
                    brand.to_string()
                };

                let slug = model.to_lowercase().replace(' ', "_");
                let image_urls = format!("{slug}.png;{slug}_side.jpg");

                writer
                    .serialize(SampleRow {
                        brand,
                        model,
                        price_usd,
                        screen_size_in: *rng.pick(&SCREENS),
                        battery_wh,
                        release_year: year,
                        cpu,
                        display_type,
                        image_urls,
                        sku: format!("LT-{year}-{rows:04}"),
                    })
                    .with_context(|| format!("writing row {rows}"))?;
                rows += 1;
            }
        }
    }
    writer.flush().context("flushing CSV output")?;

    println!("Wrote {rows} laptops to {}", output_path.display());
    Ok(())
}
