use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::{Laptop, LaptopTable};

/// Write `table` as CSV: one header row (canonical columns then passthrough
/// columns) and one line per laptop, without an index column.
pub fn write_csv<W: Write>(table: &LaptopTable, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer
        .write_record(table.column_names())
        .context("writing CSV header")?;

    for (row_no, laptop) in table.laptops.iter().enumerate() {
        writer
            .write_record(record_fields(laptop))
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

/// The filtered snapshot as UTF-8 CSV bytes, ready to hand to a download.
pub fn to_csv_bytes(table: &LaptopTable) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    Ok(buf)
}

pub fn write_csv_to_path(table: &LaptopTable, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(table, file).with_context(|| format!("exporting to {}", path.display()))?;
    log::info!("Exported {} laptops to {}", table.len(), path.display());
    Ok(())
}

fn record_fields(laptop: &Laptop) -> Vec<String> {
    let mut fields = vec![
        laptop.brand.clone(),
        laptop.model.clone(),
        laptop.price_usd.to_string(),
        laptop.screen_size_in.to_string(),
        laptop.battery_wh.to_string(),
        laptop.release_year.to_string(),
        laptop.cpu.clone(),
        laptop.display_type.clone(),
        laptop.image_list.join(";"),
        laptop.thumbnail.clone(),
        laptop.is_ai_cpu.to_string(),
        laptop.is_oled.to_string(),
    ];
    fields.extend(laptop.extra.iter().cloned());
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoaderConfig;
    use crate::data::loader::load_reader;
    use crate::data::model::CANONICAL_COLUMNS;

    #[test]
    fn header_matches_table_columns() {
        let table = load_reader(
            "brand,price_usd,sku\nDell,999.5,X1\n".as_bytes(),
            &LoaderConfig::default(),
        );
        let text = String::from_utf8(to_csv_bytes(&table).unwrap()).unwrap();
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert_eq!(header, format!("{},sku", CANONICAL_COLUMNS.join(",")));
        assert_eq!(
            lines.next().unwrap(),
            "Dell,,999.5,13.3,50,2025,,,,,false,false,X1"
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_table_still_writes_a_header() {
        let text = String::from_utf8(to_csv_bytes(&LaptopTable::default()).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
