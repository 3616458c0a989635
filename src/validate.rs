//! Batch validation of course records.
//!
//! [`validate`] reports every problem across the whole batch in one pass so a
//! caller can surface them all at once. It never mutates or drops records.

use std::collections::HashSet;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::types::CourseRecord;
use crate::error::ConfigError;
use crate::scale::GradeScale;

/// Allowed credit range and optional name limit, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBounds")]
pub struct CreditBounds {
    min_credits: Decimal,
    max_credits: Decimal,
    max_name_len: Option<usize>,
}

#[derive(Deserialize)]
struct RawBounds {
    min_credits: Decimal,
    max_credits: Decimal,
    #[serde(default)]
    max_name_len: Option<usize>,
}

impl TryFrom<RawBounds> for CreditBounds {
    type Error = ConfigError;

    fn try_from(raw: RawBounds) -> Result<Self, Self::Error> {
        CreditBounds::new(raw.min_credits, raw.max_credits, raw.max_name_len)
    }
}

impl CreditBounds {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBounds`] unless `0 < min <= max`.
    pub fn new(
        min_credits: Decimal,
        max_credits: Decimal,
        max_name_len: Option<usize>,
    ) -> Result<Self, ConfigError> {
        if min_credits <= Decimal::ZERO || min_credits > max_credits {
            return Err(ConfigError::InvalidBounds {
                min: min_credits,
                max: max_credits,
            });
        }
        Ok(Self {
            min_credits,
            max_credits,
            max_name_len,
        })
    }

    pub fn min_credits(&self) -> Decimal {
        self.min_credits
    }

    pub fn max_credits(&self) -> Decimal {
        self.max_credits
    }

    pub fn max_name_len(&self) -> Option<usize> {
        self.max_name_len
    }
}

impl Default for CreditBounds {
    /// 0.5 to 20 credits, names up to 100 characters.
    fn default() -> Self {
        Self {
            min_credits: Decimal::new(5, 1),
            max_credits: Decimal::from(20),
            max_name_len: Some(100),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Id,
    Name,
    Credits,
    GradeSymbol,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Id => "id",
            Field::Name => "name",
            Field::Credits => "credits",
            Field::GradeSymbol => "grade_symbol",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    OutOfBoundsCredits,
    UnknownGradeSymbol,
    NameTooLong,
    DuplicateId,
}

/// One field-level problem with one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub record_id: String,
    pub field: Field,
    pub kind: ViolationKind,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.record_id, self.field, self.message)
    }
}

/// Checks every record against `scale` and `bounds`.
///
/// Returns an empty list when the batch is valid.
pub fn validate(
    records: &[CourseRecord],
    scale: &GradeScale,
    bounds: &CreditBounds,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut seen_ids = HashSet::new();

    for record in records {
        if !seen_ids.insert(record.id.as_str()) {
            violations.push(Violation {
                record_id: record.id.clone(),
                field: Field::Id,
                kind: ViolationKind::DuplicateId,
                message: format!("id '{}' appears more than once", record.id),
            });
        }

        if record.credits < bounds.min_credits || record.credits > bounds.max_credits {
            violations.push(Violation {
                record_id: record.id.clone(),
                field: Field::Credits,
                kind: ViolationKind::OutOfBoundsCredits,
                message: format!(
                    "credits {} outside [{}, {}]",
                    record.credits, bounds.min_credits, bounds.max_credits
                ),
            });
        }

        if !scale.contains(&record.grade_symbol) {
            violations.push(Violation {
                record_id: record.id.clone(),
                field: Field::GradeSymbol,
                kind: ViolationKind::UnknownGradeSymbol,
                message: format!("unknown grade symbol '{}'", record.grade_symbol),
            });
        }

        if let Some(max) = bounds.max_name_len {
            let len = record.name.chars().count();
            if len > max {
                violations.push(Violation {
                    record_id: record.id.clone(),
                    field: Field::Name,
                    kind: ViolationKind::NameTooLong,
                    message: format!("name is {len} characters, limit is {max}"),
                });
            }
        }
    }

    violations
}

/// Records without any violation that is attributable to them.
///
/// Duplicate-id violations exclude only the later occurrences; the first
/// record with a given id is kept.
pub fn valid_subset(records: &[CourseRecord], violations: &[Violation]) -> Vec<CourseRecord> {
    let rejected: HashSet<&str> = violations
        .iter()
        .filter(|v| v.kind != ViolationKind::DuplicateId)
        .map(|v| v.record_id.as_str())
        .collect();

    let mut seen_ids = HashSet::new();
    records
        .iter()
        .filter(|r| !rejected.contains(r.id.as_str()))
        .filter(|r| seen_ids.insert(r.id.clone()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::Preset;
    use rust_decimal_macros::dec;

    fn scale() -> GradeScale {
        GradeScale::preset(Preset::Standard)
    }

    #[test]
    fn test_valid_batch_is_empty() {
        let records = vec![
            CourseRecord::new("1", dec!(0.5), "A"),
            CourseRecord::new("2", dec!(20), "P"),
        ];
        assert!(validate(&records, &scale(), &CreditBounds::default()).is_empty());
    }

    #[test]
    fn test_accumulates_all_violations() {
        let records = vec![
            CourseRecord::new("1", dec!(0), "Z"),
            CourseRecord::new("2", dec!(21), "A"),
            CourseRecord::new("3", dec!(3), "A")
                .with_name("x".repeat(101)),
        ];
        let v = validate(&records, &scale(), &CreditBounds::default());
        let kinds: Vec<_> = v.iter().map(|v| (v.record_id.as_str(), v.kind)).collect();
        assert_eq!(
            kinds,
            [
                ("1", ViolationKind::OutOfBoundsCredits),
                ("1", ViolationKind::UnknownGradeSymbol),
                ("2", ViolationKind::OutOfBoundsCredits),
                ("3", ViolationKind::NameTooLong),
            ]
        );
    }

    #[test]
    fn test_name_length_counts_chars() {
        let bounds = CreditBounds::new(dec!(0.5), dec!(8), Some(3)).unwrap();
        let records = vec![CourseRecord::new("1", dec!(3), "A").with_name("ÉÉÉ")];
        assert!(validate(&records, &scale(), &bounds).is_empty());
    }

    #[test]
    fn test_no_name_limit() {
        let bounds = CreditBounds::new(dec!(0.5), dec!(8), None).unwrap();
        let long_name = "x".repeat(1000);
        let records = vec![CourseRecord::new("1", dec!(3), "A").with_name(long_name)];
        assert!(validate(&records, &scale(), &bounds).is_empty());
    }

    #[test]
    fn test_duplicate_id_flags_later_occurrence() {
        let records = vec![
            CourseRecord::new("1", dec!(3), "A"),
            CourseRecord::new("1", dec!(3), "B"),
        ];
        let v = validate(&records, &scale(), &CreditBounds::default());
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].kind, ViolationKind::DuplicateId);
        assert_eq!(v[0].field, Field::Id);

        let kept = valid_subset(&records, &v);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].grade_symbol, "A");
    }

    #[test]
    fn test_valid_subset_drops_invalid_records() {
        let records = vec![
            CourseRecord::new("1", dec!(3), "A"),
            CourseRecord::new("2", dec!(3), "Z"),
            CourseRecord::new("3", dec!(99), "B"),
        ];
        let v = validate(&records, &scale(), &CreditBounds::default());
        let kept = valid_subset(&records, &v);
        let ids: Vec<_> = kept.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1"]);
    }

    #[test]
    fn test_bounds_rejected() {
        assert!(CreditBounds::new(dec!(0), dec!(8), None).is_err());
        assert!(CreditBounds::new(dec!(9), dec!(8), None).is_err());
        assert!(CreditBounds::new(dec!(1), dec!(1), None).is_ok());
    }

    #[test]
    fn test_bounds_from_json_are_checked() {
        let ok: CreditBounds =
            serde_json::from_str(r#"{"min_credits": 0.5, "max_credits": 8}"#).unwrap();
        assert_eq!(ok.min_credits(), dec!(0.5));
        assert_eq!(ok.max_credits(), dec!(8));
        assert_eq!(ok.max_name_len(), None);
        let inverted: Result<CreditBounds, _> =
            serde_json::from_str(r#"{"min_credits": 5, "max_credits": 1}"#);
        assert!(inverted.is_err());
    }

    #[test]
    fn test_violation_display() {
        let records = vec![CourseRecord::new("bio-1", dec!(3), "Z")];
        let v = validate(&records, &scale(), &CreditBounds::default());
        assert_eq!(v[0].to_string(), "bio-1 [grade_symbol]: unknown grade symbol 'Z'");
    }
}
