use std::collections::BTreeSet;

use super::model::{AiCpuMode, Laptop, LaptopTable};

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// The user's current selection. Every criterion is optional and they all
/// combine with AND; `FilterCriteria::default()` keeps every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Brands to keep. Empty means "no brand constraint".
    pub brands: BTreeSet<String>,
    /// Inclusive `(min, max)` on `price_usd`.
    pub price_range: Option<(f64, f64)>,
    /// Inclusive `(min, max)` on `screen_size_in`.
    pub screen_range: Option<(f64, f64)>,
    pub ai_cpu: AiCpuMode,
    /// Case-insensitive substring of `"brand model"`. Blank means no constraint.
    pub search: Option<String>,
}

impl FilterCriteria {
    /// Criteria spanning the whole table: full price and screen ranges,
    /// every brand, any CPU.
    pub fn spanning(table: &LaptopTable) -> Self {
        Self {
            brands: table.brands().into_iter().collect(),
            price_range: table.price_bounds(),
            screen_range: table.screen_bounds(),
            ai_cpu: AiCpuMode::Any,
            search: None,
        }
    }

    /// Lower-cased, trimmed search needle, `None` when blank.
    fn needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// Whether a single laptop passes every active criterion.
    pub fn matches(&self, laptop: &Laptop) -> bool {
        self.matches_with(laptop, self.needle().as_deref())
    }

    fn matches_with(&self, laptop: &Laptop, needle: Option<&str>) -> bool {
        if !self.brands.is_empty() && !self.brands.contains(&laptop.brand) {
            return false;
        }
        if let Some(range) = self.price_range {
            if !within(laptop.price_usd, range) {
                return false;
            }
        }
        if let Some(range) = self.screen_range {
            if !within(laptop.screen_size_in, range) {
                return false;
            }
        }
        if !self.ai_cpu.accepts(laptop.is_ai_cpu) {
            return false;
        }
        match needle {
            Some(needle) => laptop.display_name().to_lowercase().contains(needle),
            None => true,
        }
    }
}

fn within(value: f64, (min, max): (f64, f64)) -> bool {
    min <= value && value <= max
}

/// Return indices of laptops that pass all active criteria.
pub fn filtered_indices(table: &LaptopTable, criteria: &FilterCriteria) -> Vec<usize> {
    let needle = criteria.needle();
    table
        .laptops
        .iter()
        .enumerate()
        .filter(|(_, laptop)| criteria.matches_with(laptop, needle.as_deref()))
        .map(|(i, _)| i)
        .collect()
}

/// Build a new table holding only the matching laptops, in source order.
///
/// The input is left untouched. An empty result simply means nothing
/// matched; it is not a load failure.
pub fn filter(table: &LaptopTable, criteria: &FilterCriteria) -> LaptopTable {
    let laptops = filtered_indices(table, criteria)
        .into_iter()
        .map(|i| table.laptops[i].clone())
        .collect();
    LaptopTable::new(laptops, table.extra_columns.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoaderConfig;
    use crate::data::loader::load_reader;

    fn catalog() -> LaptopTable {
        load_reader(
            "brand,model,price_usd,screen_size_in,cpu\n\
             Dell,XPS 13,999,13.4,Intel Core Ultra 7\n\
             HP,Envy,650,15.6,Intel i5\n\
             Asus,Zenbook,1200,14,Ryzen AI 9\n\
             Dell,Latitude,800,14,Intel i7\n"
                .as_bytes(),
            &LoaderConfig::default(),
        )
    }

    #[test]
    fn no_criteria_keeps_everything() {
        let table = catalog();
        assert_eq!(filter(&table, &FilterCriteria::default()), table);
        assert_eq!(filter(&table, &FilterCriteria::spanning(&table)), table);
    }

    #[test]
    fn ranges_are_inclusive() {
        let table = catalog();
        let criteria = FilterCriteria {
            price_range: Some((800.0, 999.0)),
            ..Default::default()
        };
        let models: Vec<String> = filter(&table, &criteria)
            .laptops
            .into_iter()
            .map(|l| l.model)
            .collect();
        assert_eq!(models, vec!["XPS 13".to_string(), "Latitude".to_string()]);

        let criteria = FilterCriteria {
            screen_range: Some((14.0, 14.0)),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&table, &criteria), vec![2, 3]);
    }

    #[test]
    fn criteria_combine_with_and() {
        let table = catalog();
        let criteria = FilterCriteria {
            brands: ["Dell".to_string()].into_iter().collect(),
            ai_cpu: AiCpuMode::NonAiOnly,
            ..Default::default()
        };
        assert_eq!(filtered_indices(&table, &criteria), vec![3]);

        let criteria = FilterCriteria {
            ai_cpu: AiCpuMode::AiOnly,
            ..Default::default()
        };
        assert_eq!(filtered_indices(&table, &criteria), vec![0, 2]);
    }

    #[test]
    fn brand_match_is_exact_after_normalization() {
        let table = catalog();
        let criteria = FilterCriteria {
            brands: ["HP".to_string()].into_iter().collect(),
            ..Default::default()
        };
        assert!(filter(&table, &criteria).is_empty());

        let criteria = FilterCriteria {
            brands: ["Hp".to_string()].into_iter().collect(),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&table, &criteria), vec![1]);
    }

    #[test]
    fn search_matches_brand_and_model() {
        let table = catalog();
        let criteria = FilterCriteria {
            search: Some("  dell lat ".to_string()),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&table, &criteria), vec![3]);

        let criteria = FilterCriteria {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&table, &criteria).len(), table.len());
    }

    #[test]
    fn filtering_to_zero_keeps_the_schema() {
        let table = load_reader(
            "brand,price_usd,sku\nDell,100,A\n".as_bytes(),
            &LoaderConfig::default(),
        );
        let criteria = FilterCriteria {
            price_range: Some((500.0, 600.0)),
            ..Default::default()
        };
        let filtered = filter(&table, &criteria);
        assert!(filtered.is_empty());
        assert_eq!(filtered.extra_columns, table.extra_columns);
        assert_eq!(table.len(), 1);
    }
}
