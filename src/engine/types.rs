//! Data types used by the aggregation pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One course/grade entry as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub credits: Decimal,
    pub grade_symbol: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub is_prerequisite: bool,
    /// Chronological order key; higher is more recent. Required on input.
    pub sequence_index: u64,
}

impl CourseRecord {
    pub fn new(id: impl Into<String>, credits: Decimal, grade_symbol: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            credits,
            grade_symbol: grade_symbol.into(),
            category: String::new(),
            is_prerequisite: false,
            sequence_index: 0,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn prerequisite(mut self) -> Self {
        self.is_prerequisite = true;
        self
    }

    pub fn at(mut self, sequence_index: u64) -> Self {
        self.sequence_index = sequence_index;
        self
    }
}

/// Serializable record predicate used by [`AggregationView`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RecordFilter {
    #[default]
    Everything,
    Category(String),
    NotCategory(String),
    AnyOf(Vec<String>),
    Prerequisite,
    AllOf(Vec<RecordFilter>),
}

impl RecordFilter {
    pub fn matches(&self, record: &CourseRecord) -> bool {
        match self {
            RecordFilter::Everything => true,
            RecordFilter::Category(c) => record.category == *c,
            RecordFilter::NotCategory(c) => record.category != *c,
            RecordFilter::AnyOf(cs) => cs.iter().any(|c| record.category == *c),
            RecordFilter::Prerequisite => record.is_prerequisite,
            RecordFilter::AllOf(fs) => fs.iter().all(|f| f.matches(record)),
        }
    }
}

/// A named computation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationView {
    pub name: String,
    #[serde(default)]
    pub filter: RecordFilter,
    /// Restrict the view to the most recent `window_credits` credit-hours.
    #[serde(default)]
    pub window_credits: Option<Decimal>,
}

impl AggregationView {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filter: RecordFilter::Everything,
            window_credits: None,
        }
    }

    pub fn filtered(mut self, filter: RecordFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn windowed(mut self, credits: Decimal) -> Self {
        self.window_credits = Some(credits);
        self
    }

    /// The view set used by veterinary-school applications: overall,
    /// science, non-science, last 45 credits, and prerequisites.
    pub fn veterinary_defaults(science_category: &str) -> Vec<Self> {
        vec![
            Self::new("overall"),
            Self::new("science")
                .filtered(RecordFilter::Category(science_category.to_string())),
            Self::new("non_science")
                .filtered(RecordFilter::NotCategory(science_category.to_string())),
            Self::new("last_45").windowed(Decimal::from(45)),
            Self::new("prerequisite").filtered(RecordFilter::Prerequisite),
        ]
    }
}

/// Outcome of a single view.
///
/// `value` is `None` when no GPA-affecting credits matched, which is
/// distinct from a `0.0` GPA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewResult {
    pub value: Option<Decimal>,
    pub credits_used: Decimal,
    /// Unrounded numerator.
    pub quality_points: Decimal,
    pub courses: usize,
}
