//! Course record loaders for CSV and JSON files.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::engine::types::CourseRecord;

/// Reads records from CSV with the header
/// `id,name,credits,grade_symbol,category,is_prerequisite,sequence_index`.
///
/// # Errors
///
/// Returns an error if a row cannot be deserialized into a [`CourseRecord`].
pub fn parse_records_csv<R: Read>(reader: R) -> Result<Vec<CourseRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (row, result) in rdr.deserialize().enumerate() {
        let record: CourseRecord = result.with_context(|| format!("invalid CSV row {}", row + 1))?;
        records.push(record);
    }

    Ok(records)
}

/// Reads records from a JSON array.
pub fn parse_records_json(bytes: &[u8]) -> Result<Vec<CourseRecord>> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Loads records from `path`, choosing the parser from the file extension.
pub fn load_records(path: &str) -> Result<Vec<CourseRecord>> {
    let extension = Path::new(path).extension().and_then(|e| e.to_str());

    let records = match extension {
        Some("csv") => {
            let file = File::open(path).with_context(|| format!("failed to open '{path}'"))?;
            parse_records_csv(file)?
        }
        Some("json") => {
            let bytes = std::fs::read(path).with_context(|| format!("failed to read '{path}'"))?;
            parse_records_json(&bytes)?
        }
        _ => bail!("unsupported record file '{path}', expected .csv or .json"),
    };

    debug!(path, count = records.len(), "Records loaded");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_csv() {
        let csv = "\
id,name,credits,grade_symbol,category,is_prerequisite,sequence_index
bio1,Biology I,4,A,science,true,1
eng1,Composition, 3.5 ,B+,humanities,false,2
";
        let records = parse_records_csv(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Biology I");
        assert!(records[0].is_prerequisite);
        assert_eq!(records[1].credits, dec!(3.5));
        assert_eq!(records[1].sequence_index, 2);
    }

    #[test]
    fn test_parse_csv_bad_credits() {
        let csv = "\
id,name,credits,grade_symbol,category,is_prerequisite,sequence_index
bio1,Biology I,four,A,science,true,1
";
        let err = parse_records_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_parse_json_defaults() {
        let json = br#"[{"id": "1", "credits": 3, "grade_symbol": "A", "sequence_index": 7}]"#;
        let records = parse_records_json(json).unwrap();
        assert_eq!(records[0], CourseRecord::new("1", dec!(3), "A").at(7));
    }

    #[test]
    fn test_parse_json_requires_sequence_index() {
        let json = br#"[{"id": "1", "credits": 3, "grade_symbol": "A"}]"#;
        let err = parse_records_json(json).unwrap_err();
        assert!(err.to_string().contains("sequence_index"));
    }

    #[test]
    fn test_parse_csv_requires_sequence_index() {
        let csv = "\
id,name,credits,grade_symbol,category,is_prerequisite
bio1,Biology I,4,A,science,true
";
        assert!(parse_records_csv(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_parse_json_invalid() {
        assert!(parse_records_json(b"{not json").is_err());
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        assert!(load_records("transcript.xlsx").is_err());
    }
}
