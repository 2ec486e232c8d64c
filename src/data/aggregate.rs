use std::collections::{BTreeMap, HashMap};

use super::model::{BrandCount, LaptopTable, Summary, TrendMetric, TrendPoint};

// ---------------------------------------------------------------------------
// Brand share
// ---------------------------------------------------------------------------

/// Count laptops per brand, most common brand first (ties by name).
pub fn brand_share(table: &LaptopTable) -> Vec<BrandCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for laptop in &table.laptops {
        *counts.entry(laptop.brand.as_str()).or_default() += 1;
    }

    let mut share: Vec<BrandCount> = counts
        .into_iter()
        .map(|(brand, count)| BrandCount {
            brand: brand.to_string(),
            count,
        })
        .collect();
    share.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.brand.cmp(&b.brand)));
    share
}

// ---------------------------------------------------------------------------
// Trends
// ---------------------------------------------------------------------------

#[derive(Default)]
struct YearAccumulator {
    count: usize,
    price: f64,
    battery: f64,
    oled: usize,
}

/// Per-year averages in long format: every `avg_price` row, then every
/// `avg_battery` row, then every `pct_oled` row, each in ascending year.
///
/// Values are left on their own scales; `pct_oled` is a fraction in
/// `[0, 1]` next to dollar and watt-hour averages.
pub fn trends(table: &LaptopTable) -> Vec<TrendPoint> {
    let mut years: BTreeMap<i32, YearAccumulator> = BTreeMap::new();
    for laptop in &table.laptops {
        let acc = years.entry(laptop.release_year).or_default();
        acc.count += 1;
        acc.price += laptop.price_usd;
        acc.battery += laptop.battery_wh;
        if laptop.is_oled {
            acc.oled += 1;
        }
    }

    TrendMetric::ALL
        .iter()
        .flat_map(|&metric| {
            years.iter().map(move |(&year, acc)| {
                let n = acc.count as f64;
                let value = match metric {
                    TrendMetric::AvgPrice => acc.price / n,
                    TrendMetric::AvgBattery => acc.battery / n,
                    TrendMetric::PctOled => acc.oled as f64 / n,
                };
                TrendPoint {
                    year,
                    metric,
                    value,
                }
            })
        })
        .collect()
}

/// Points of a single metric as `[year, value]` pairs, ready for plotting.
pub fn series(points: &[TrendPoint], metric: TrendMetric) -> Vec<[f64; 2]> {
    points
        .iter()
        .filter(|p| p.metric == metric)
        .map(|p| [p.year as f64, p.value])
        .collect()
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

pub fn summary(table: &LaptopTable) -> Summary {
    if table.is_empty() {
        return Summary::default();
    }
    let n = table.len() as f64;
    let price: f64 = table.laptops.iter().map(|l| l.price_usd).sum();
    let battery: f64 = table.laptops.iter().map(|l| l.battery_wh).sum();
    Summary {
        count: table.len(),
        mean_price: Some(price / n),
        mean_battery: Some(battery / n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoaderConfig;
    use crate::data::loader::load_reader;

    fn catalog() -> LaptopTable {
        load_reader(
            "brand,price_usd,battery_wh,display_type,release_year\n\
             Dell,1000,60,OLED,2023\n\
             HP,600,40,IPS,2023\n\
             Dell,1400,70,OLED,2024\n\
             Asus,800,50,IPS,2024\n\
             Dell,900,55,IPS,2024\n"
                .as_bytes(),
            &LoaderConfig::default(),
        )
    }

    #[test]
    fn brand_share_counts_every_row() {
        let table = catalog();
        let share = brand_share(&table);
        assert_eq!(
            share,
            vec![
                BrandCount {
                    brand: "Dell".into(),
                    count: 3
                },
                BrandCount {
                    brand: "Asus".into(),
                    count: 1
                },
                BrandCount {
                    brand: "Hp".into(),
                    count: 1
                },
            ]
        );
        assert_eq!(share.iter().map(|b| b.count).sum::<usize>(), table.len());
    }

    #[test]
    fn trends_are_long_format_per_year() {
        let points = trends(&catalog());
        assert_eq!(points.len(), 6);

        assert_eq!(
            series(&points, TrendMetric::AvgPrice),
            vec![[2023.0, 800.0], [2024.0, 3100.0 / 3.0]]
        );
        assert_eq!(
            series(&points, TrendMetric::AvgBattery),
            vec![[2023.0, 50.0], [2024.0, 175.0 / 3.0]]
        );
        assert_eq!(
            series(&points, TrendMetric::PctOled),
            vec![[2023.0, 0.5], [2024.0, 1.0 / 3.0]]
        );

        let metrics: Vec<TrendMetric> = points.iter().map(|p| p.metric).collect();
        assert_eq!(
            metrics,
            vec![
                TrendMetric::AvgPrice,
                TrendMetric::AvgPrice,
                TrendMetric::AvgBattery,
                TrendMetric::AvgBattery,
                TrendMetric::PctOled,
                TrendMetric::PctOled,
            ]
        );
    }

    #[test]
    fn empty_input_gives_empty_aggregates() {
        let empty = LaptopTable::default();
        assert!(brand_share(&empty).is_empty());
        assert!(trends(&empty).is_empty());
        assert_eq!(summary(&empty), Summary::default());
    }

    #[test]
    fn summary_averages_price_and_battery() {
        let s = summary(&catalog());
        assert_eq!(s.count, 5);
        assert_eq!(s.mean_price, Some(940.0));
        assert_eq!(s.mean_battery, Some(55.0));
    }
}
