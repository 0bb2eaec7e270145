use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::{
    catalog::CatalogSource,
    error::{AppError, AppResult},
    models::{cheese::NAME_COLUMN, CheeseRecord},
};

/// Catalog source backed by a CSV file with a header row
///
/// The `cheese` column names each record; every other column becomes an
/// attribute, empty cells included.
#[derive(Debug, Clone)]
pub struct CsvCatalogSource {
    path: PathBuf,
}

impl CsvCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl CatalogSource for CsvCatalogSource {
    async fn load(&self) -> AppResult<Vec<CheeseRecord>> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to read catalog file");
            e
        })?;

        let records = parse_catalog(bytes.as_slice())?;

        tracing::debug!(
            path = %self.path.display(),
            rows = records.len(),
            "Parsed catalog CSV"
        );

        Ok(records)
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}

/// Parses CSV content into raw (not yet normalized) records
pub fn parse_catalog<R: std::io::Read>(reader: R) -> AppResult<Vec<CheeseRecord>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();

    let name_index = headers
        .iter()
        .position(|header| header == NAME_COLUMN)
        .ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Catalog is missing the '{}' column (found: {})",
                NAME_COLUMN,
                headers.join(", ")
            ))
        })?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;

        let mut attributes = BTreeMap::new();
        let mut name = String::new();
        for (idx, header) in headers.iter().enumerate() {
            let value = row.get(idx).unwrap_or_default().to_string();
            if idx == name_index {
                name = value;
            } else {
                attributes.insert(header.clone(), value);
            }
        }

        records.push(CheeseRecord {
            name,
            attributes,
            features: String::new(),
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
cheese,milk,type,texture,flavor,vegetarian
Brie,cow,soft,\"creamy, soft\",mild,TRUE
Feta,\"goat, sheep\",NA,crumbly,salty,FALSE
";

    #[test]
    fn test_parse_catalog_reads_rows_and_quoted_values() {
        let records = parse_catalog(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Brie");
        assert_eq!(records[0].get("texture"), Some("creamy, soft"));
        assert_eq!(records[1].get("milk"), Some("goat, sheep"));
        // Placeholders are left for the normalizer
        assert_eq!(records[1].get("type"), Some("NA"));
        assert!(records[0].features.is_empty());
    }

    #[test]
    fn test_parse_catalog_pads_short_rows() {
        let records = parse_catalog("cheese,milk,rind\nHalloumi,goat\n".as_bytes()).unwrap();
        assert_eq!(records[0].get("rind"), Some(""));
    }

    #[test]
    fn test_parse_catalog_requires_name_column() {
        let result = parse_catalog("name,milk\nBrie,cow\n".as_bytes());
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let source = CsvCatalogSource::new(file.path());
        let records = source.load().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(source.name(), "csv");
    }

    #[tokio::test]
    async fn test_load_missing_file_is_io_error() {
        let source = CsvCatalogSource::new("/definitely/not/here/cheeses.csv");
        let result = source.load().await;
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
