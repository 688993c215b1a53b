use crate::error::IngestError;
use std::fs;
use std::path::Path;

/// Columns the normalized catalog always carries, in this order. Sources
/// missing a column get an empty value rather than failing the export.
pub const CATALOG_COLUMNS: [&str; 6] = [
    "Title",
    "Author",
    "Year",
    "DOI",
    "Publication Title",
    "Item Type",
];

/// Rewrites a raw Zotero CSV export into the fixed catalog layout. Extra
/// columns are dropped, values are trimmed. Returns the number of rows
/// written, headers excluded.
pub fn normalize_catalog(input: &Path, output: &Path) -> Result<usize, IngestError> {
    if !input.is_file() {
        return Err(IngestError::MissingInput(format!(
            "no Zotero export at {}; export your library as CSV from Zotero and point --input at it",
            input.display()
        )));
    }

    let mut reader = csv::Reader::from_path(input)?;
    let headers = reader.headers()?.clone();
    let indices: Vec<Option<usize>> = CATALOG_COLUMNS
        .iter()
        .map(|column| headers.iter().position(|header| header == *column))
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Vec<String> = indices
            .iter()
            .map(|index| {
                index
                    .and_then(|index| record.get(index))
                    .unwrap_or("")
                    .trim()
                    .to_string()
            })
            .collect();
        rows.push(row);
    }

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(output)?;
    writer.write_record(CATALOG_COLUMNS)?;
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::{normalize_catalog, CATALOG_COLUMNS};
    use crate::error::IngestError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn values_are_trimmed_and_extra_columns_dropped() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let input = dir.path().join("export.csv");
        let output = dir.path().join("catalog.csv");

        fs::write(
            &input,
            "Title,Author,Year,DOI,Publication Title,Item Type,Notes\n\
             \"  Soil Acidity  \",\"Reyes, Ana\",2019,10.1000/xyz,Geoderma,journalArticle,private\n",
        )?;

        let rows = normalize_catalog(&input, &output)?;
        assert_eq!(rows, 1);

        let mut reader = csv::Reader::from_path(&output)?;
        assert_eq!(
            reader.headers()?.iter().collect::<Vec<_>>(),
            CATALOG_COLUMNS.to_vec()
        );

        let record = reader.records().next().unwrap()?;
        assert_eq!(record.get(0), Some("Soil Acidity"));
        assert_eq!(record.get(1), Some("Reyes, Ana"));
        assert_eq!(record.len(), CATALOG_COLUMNS.len());
        Ok(())
    }

    #[test]
    fn missing_columns_become_empty_values() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let input = dir.path().join("export.csv");
        let output = dir.path().join("catalog.csv");

        fs::write(&input, "Title,Year\nDeep Soil,2021\n")?;

        let rows = normalize_catalog(&input, &output)?;
        assert_eq!(rows, 1);

        let mut reader = csv::Reader::from_path(&output)?;
        let record = reader.records().next().unwrap()?;
        assert_eq!(record.get(0), Some("Deep Soil"));
        assert_eq!(record.get(2), Some("2021"));
        assert_eq!(record.get(3), Some(""));
        assert_eq!(record.get(5), Some(""));
        Ok(())
    }

    #[test]
    fn a_missing_export_is_reported_with_a_remedy() {
        let result = normalize_catalog(
            std::path::Path::new("/nowhere/export.csv"),
            std::path::Path::new("/tmp/catalog.csv"),
        );

        match result {
            Err(IngestError::MissingInput(message)) => {
                assert!(message.contains("/nowhere/export.csv"));
            }
            other => panic!("expected MissingInput, got {other:?}"),
        }
    }

    #[test]
    fn output_parent_directories_are_created() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let input = dir.path().join("export.csv");
        let output = dir.path().join("deep").join("nested").join("catalog.csv");

        fs::write(&input, "Title,Year\nDeep Soil,2021\n")?;

        normalize_catalog(&input, &output)?;
        assert!(output.is_file());
        Ok(())
    }
}
