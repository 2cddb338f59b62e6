use std::path::Path;

use anyhow::{Context, Result};

use super::aggregate::GroupMedian;
use super::model::columns;

/// File names offered by the download buttons.
pub const MAGNITUDE_FILE: &str = "Magnitude.csv";
pub const DEPTH_FILE: &str = "Depth.csv";

/// Serialise a per-continent table as UTF-8 CSV with header
/// `continent,<value_column>`.
///
/// Values use Rust's shortest round-trip float formatting, so parsing the
/// output back yields identical numbers.
pub fn to_csv(table: &[GroupMedian], value_column: &str) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([columns::CONTINENT, value_column])
        .context("writing CSV header")?;
    for row in table {
        let value = row.value.to_string();
        writer
            .write_record([row.continent.as_str(), value.as_str()])
            .with_context(|| format!("writing row for {}", row.continent))?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV buffer: {}", e.error()))
}

/// Write a per-continent table to `path`.
pub fn save_table(path: &Path, table: &[GroupMedian], value_column: &str) -> Result<()> {
    let bytes = to_csv(table, value_column)?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} rows to {}", table.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::median_by_continent;
    use crate::data::error::DataError;
    use crate::data::model::fixtures::sample_dataset;

    /// Parse a table written by [`to_csv`].
    fn from_csv(bytes: &[u8], value_column: &str) -> Result<Vec<GroupMedian>> {
        let mut reader = csv::Reader::from_reader(bytes);
        let headers = reader.headers().context("reading CSV header")?.clone();

        let position = |name: &str| headers.iter().position(|h| h == name);
        let (continent_idx, value_idx) =
            match (position(columns::CONTINENT), position(value_column)) {
                (Some(c), Some(v)) => (c, v),
                (c, v) => {
                    let missing = [(c, columns::CONTINENT), (v, value_column)]
                        .into_iter()
                        .filter(|(idx, _)| idx.is_none())
                        .map(|(_, name)| name.to_string())
                        .collect();
                    return Err(DataError::MissingColumns(missing).into());
                }
            };

        let mut table = Vec::new();
        for (i, result) in reader.records().enumerate() {
            let row = i + 1;
            let record = result.with_context(|| format!("reading row {row}"))?;
            let continent = record.get(continent_idx).unwrap_or_default().to_string();
            let raw = record.get(value_idx).unwrap_or_default();
            let value = raw.parse::<f64>().map_err(|_| DataError::InvalidNumber {
                row,
                column: value_column.to_string(),
                value: raw.to_string(),
            })?;
            table.push(GroupMedian { continent, value });
        }
        Ok(table)
    }

    #[test]
    fn writes_expected_layout() {
        let table = vec![
            GroupMedian {
                continent: "Asia".to_string(),
                value: 6.35,
            },
            GroupMedian {
                continent: "Europe".to_string(),
                value: 4.8,
            },
        ];
        let bytes = to_csv(&table, columns::MAGNITUDE).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "continent,mag\nAsia,6.35\nEurope,4.8\n"
        );
    }

    #[test]
    fn export_then_parse_preserves_pairs() {
        let ds = sample_dataset();
        for (column, table) in [
            (columns::MAGNITUDE, median_by_continent(&ds.events, |e| e.magnitude)),
            (columns::DEPTH, median_by_continent(&ds.events, |e| e.depth)),
        ] {
            let bytes = to_csv(&table, column).unwrap();
            let parsed = from_csv(&bytes, column).unwrap();
            assert_eq!(parsed, table);
        }
    }

    #[test]
    fn utf8_names_survive_export() {
        let table = vec![GroupMedian {
            continent: "Océanie".to_string(),
            value: 1.0 / 3.0,
        }];
        let parsed = from_csv(&to_csv(&table, "depth").unwrap(), "depth").unwrap();
        assert_eq!(parsed, table);
    }

    #[test]
    fn parse_reports_missing_value_column() {
        let err = from_csv(b"continent,mag\nAsia,1\n", "depth").unwrap_err();
        assert_eq!(
            err.downcast_ref::<DataError>(),
            Some(&DataError::MissingColumns(vec!["depth".to_string()]))
        );
    }

    #[test]
    fn save_table_writes_file() {
        let path =
            std::env::temp_dir().join(format!("quakeview-{}-{DEPTH_FILE}", std::process::id()));
        let table = vec![GroupMedian {
            continent: "Africa".to_string(),
            value: 10.0,
        }];
        save_table(&path, &table, columns::DEPTH).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(text, "continent,depth\nAfrica,10\n");
    }
}
