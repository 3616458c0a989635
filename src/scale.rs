//! Grade scale registry.
//!
//! A [`GradeScale`] maps a grade symbol to its quality-point value and marks
//! symbols that are GPA-neutral (pass/fail style). Scales are immutable once
//! built; one scale is used per aggregation call.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, GpaError};

/// Quality-point value of a single grade symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeValue {
    pub quality_point: Decimal,
    #[serde(default = "counts_by_default")]
    pub counts_toward_gpa: bool,
}

fn counts_by_default() -> bool {
    true
}

impl GradeValue {
    pub fn counting(quality_point: Decimal) -> Self {
        Self {
            quality_point,
            counts_toward_gpa: true,
        }
    }

    pub fn neutral() -> Self {
        Self {
            quality_point: Decimal::ZERO,
            counts_toward_gpa: false,
        }
    }
}

/// Immutable symbol → value mapping.
///
/// Symbols are matched exactly (case-sensitive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, GradeValue>",
    into = "BTreeMap<String, GradeValue>"
)]
pub struct GradeScale {
    grades: BTreeMap<String, GradeValue>,
}

impl GradeScale {
    pub fn builder() -> GradeScaleBuilder {
        GradeScaleBuilder::default()
    }

    /// Builds one of the bundled institution scales.
    pub fn preset(preset: Preset) -> Self {
        let mut builder = Self::builder();
        for &(symbol, tenths) in preset.table() {
            builder = builder.grade(symbol, Decimal::new(tenths, 1));
        }
        for &symbol in NEUTRAL_SYMBOLS {
            builder = builder.neutral(symbol);
        }
        Self {
            grades: builder.grades,
        }
    }

    /// Looks up `symbol`.
    ///
    /// # Errors
    ///
    /// Returns [`GpaError::UnknownGradeSymbol`] if the symbol is not part of
    /// this scale.
    pub fn resolve(&self, symbol: &str) -> Result<GradeValue, GpaError> {
        self.grades
            .get(symbol)
            .copied()
            .ok_or_else(|| GpaError::UnknownGradeSymbol {
                symbol: symbol.to_string(),
            })
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.grades.contains_key(symbol)
    }

    /// Iterates `(symbol, value)` pairs in symbol order.
    pub fn symbols(&self) -> impl Iterator<Item = (&str, &GradeValue)> {
        self.grades.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.grades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }
}

impl Default for GradeScale {
    fn default() -> Self {
        Self::preset(Preset::Standard)
    }
}

impl TryFrom<BTreeMap<String, GradeValue>> for GradeScale {
    type Error = ConfigError;

    fn try_from(grades: BTreeMap<String, GradeValue>) -> Result<Self, Self::Error> {
        if grades.is_empty() {
            return Err(ConfigError::EmptyScale);
        }
        Ok(Self { grades })
    }
}

impl From<GradeScale> for BTreeMap<String, GradeValue> {
    fn from(scale: GradeScale) -> Self {
        scale.grades
    }
}

/// Incrementally assembles a [`GradeScale`]. A later entry for the same
/// symbol replaces the earlier one.
#[derive(Debug, Default)]
pub struct GradeScaleBuilder {
    grades: BTreeMap<String, GradeValue>,
}

impl GradeScaleBuilder {
    pub fn grade(mut self, symbol: impl Into<String>, quality_point: Decimal) -> Self {
        self.grades.insert(symbol.into(), GradeValue::counting(quality_point));
        self
    }

    pub fn neutral(mut self, symbol: impl Into<String>) -> Self {
        self.grades.insert(symbol.into(), GradeValue::neutral());
        self
    }

    pub fn build(self) -> Result<GradeScale, ConfigError> {
        GradeScale::try_from(self.grades)
    }
}

/// Bundled scales.
///
/// | Symbol | standard | plus_weighted | unweighted |
/// |--------|----------|---------------|------------|
/// | A+     | 4.0      | 4.3           | -          |
/// | A      | 4.0      | 4.0           | 4.0        |
/// | A-     | 3.7      | 3.7           | -          |
/// | B+     | 3.3      | 3.3           | -          |
/// | B      | 3.0      | 3.0           | 3.0        |
/// | ...    |          |               |            |
/// | F      | 0.0      | 0.0           | 0.0        |
///
/// Every preset treats `P`, `S`, `CR` and `W` as neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Preset {
    Standard,
    PlusWeighted,
    Unweighted,
}

static STANDARD: &[(&str, i64)] = &[
    ("A+", 40),
    ("A", 40),
    ("A-", 37),
    ("B+", 33),
    ("B", 30),
    ("B-", 27),
    ("C+", 23),
    ("C", 20),
    ("C-", 17),
    ("D+", 13),
    ("D", 10),
    ("D-", 7),
    ("F", 0),
    ("WF", 0),
];

static PLUS_WEIGHTED: &[(&str, i64)] = &[
    ("A+", 43),
    ("A", 40),
    ("A-", 37),
    ("B+", 33),
    ("B", 30),
    ("B-", 27),
    ("C+", 23),
    ("C", 20),
    ("C-", 17),
    ("D+", 13),
    ("D", 10),
    ("D-", 7),
    ("F", 0),
    ("WF", 0),
];

static UNWEIGHTED: &[(&str, i64)] = &[("A", 40), ("B", 30), ("C", 20), ("D", 10), ("F", 0)];

static NEUTRAL_SYMBOLS: &[&str] = &["P", "S", "CR", "W"];

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Standard, Preset::PlusWeighted, Preset::Unweighted];

    fn table(self) -> &'static [(&'static str, i64)] {
        match self {
            Preset::Standard => STANDARD,
            Preset::PlusWeighted => PLUS_WEIGHTED,
            Preset::Unweighted => UNWEIGHTED,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Standard => "standard",
            Preset::PlusWeighted => "plus_weighted",
            Preset::Unweighted => "unweighted",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_standard_boundaries() {
        let scale = GradeScale::preset(Preset::Standard);
        assert_eq!(scale.resolve("A+").unwrap().quality_point, dec!(4.0));
        assert_eq!(scale.resolve("A-").unwrap().quality_point, dec!(3.7));
        assert_eq!(scale.resolve("B+").unwrap().quality_point, dec!(3.3));
        assert_eq!(scale.resolve("D-").unwrap().quality_point, dec!(0.7));
        assert_eq!(scale.resolve("F").unwrap().quality_point, dec!(0.0));
    }

    #[test]
    fn test_plus_weighted_a_plus() {
        let scale = GradeScale::preset(Preset::PlusWeighted);
        assert_eq!(scale.resolve("A+").unwrap().quality_point, dec!(4.3));
    }

    #[test]
    fn test_neutral_symbols_do_not_count() {
        for preset in Preset::ALL {
            let scale = GradeScale::preset(preset);
            for symbol in ["P", "S", "CR", "W"] {
                let value = scale.resolve(symbol).unwrap();
                assert!(!value.counts_toward_gpa, "{preset} {symbol}");
            }
        }
    }

    #[test]
    fn test_unknown_symbol() {
        let scale = GradeScale::preset(Preset::Unweighted);
        assert_eq!(
            scale.resolve("A-"),
            Err(GpaError::UnknownGradeSymbol {
                symbol: "A-".to_string()
            })
        );
    }

    #[test]
    fn test_symbols_are_case_sensitive() {
        let scale = GradeScale::default();
        assert!(scale.contains("A"));
        assert!(!scale.contains("a"));
    }

    #[test]
    fn test_builder_rejects_empty_scale() {
        assert_eq!(GradeScale::builder().build(), Err(ConfigError::EmptyScale));
    }

    #[test]
    fn test_builder_later_entry_wins() {
        let scale = GradeScale::builder()
            .grade("H", dec!(4.0))
            .neutral("H")
            .build()
            .unwrap();
        assert_eq!(scale.len(), 1);
        assert!(!scale.resolve("H").unwrap().counts_toward_gpa);
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("plus_weighted".parse::<Preset>(), Ok(Preset::PlusWeighted));
        assert_eq!(
            "ivy".parse::<Preset>(),
            Err(ConfigError::UnknownPreset("ivy".to_string()))
        );
    }

    #[test]
    fn test_cli_names_match_config_names() {
        for preset in Preset::ALL {
            assert_eq!(<Preset as ValueEnum>::from_str(preset.name(), false), Ok(preset));
        }
        assert!(<Preset as ValueEnum>::from_str("plus-weighted", false).is_err());
    }

    #[test]
    fn test_deserialize_defaults_counts_toward_gpa() {
        let json = r#"{
            "A": {"quality_point": 4.0},
            "P": {"quality_point": 0, "counts_toward_gpa": false}
        }"#;
        let scale: GradeScale = serde_json::from_str(json).unwrap();
        assert!(scale.resolve("A").unwrap().counts_toward_gpa);
        assert!(!scale.resolve("P").unwrap().counts_toward_gpa);
    }

    #[test]
    fn test_deserialize_rejects_empty_map() {
        assert!(serde_json::from_str::<GradeScale>("{}").is_err());
    }
}
