use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Bug,
    Security,
    Style,
    Design,
    Performance,
    Testing,
    Docs,
}

impl Category {
    /// Parse an already lower-cased, trimmed label. Unknown labels are the
    /// caller's problem (the normalizer falls back to `Bug`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bug" => Some(Self::Bug),
            "security" => Some(Self::Security),
            "style" => Some(Self::Style),
            "design" => Some(Self::Design),
            "performance" => Some(Self::Performance),
            "testing" => Some(Self::Testing),
            "docs" => Some(Self::Docs),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bug => "bug",
            Self::Security => "security",
            Self::Style => "style",
            Self::Design => "design",
            Self::Performance => "performance",
            Self::Testing => "testing",
            Self::Docs => "docs",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Deduction applied to a merged score for the worst finding present.
    pub fn penalty(self) -> i64 {
        match self {
            Self::Low => 5,
            Self::Medium => 15,
            Self::High => 30,
            Self::Critical => 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub category: Category,
    pub severity: Severity,
    pub title: String,
    pub details: String,
    pub line_start: i64,
    pub line_end: i64,
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewReport {
    pub path: String,
    pub language: String,
    pub summary: String,
    pub score: u8,
    pub findings: Vec<Finding>,
}

impl ReviewReport {
    /// Placeholder substituted by callers when a file's review fails, so one
    /// bad file does not abort a batch.
    pub fn degraded(path: &str, error: &str) -> Self {
        Self {
            path: path.to_string(),
            language: "unknown".to_string(),
            summary: format!("Review failed: {error}"),
            score: 0,
            findings: Vec::new(),
        }
    }
}

/// Validate a normalized JSON value against the typed report shape.
///
/// The normalizer already guarantees this shape, so a failure here means the
/// normalizer and the schema disagree and must fail loudly.
pub fn validate_report(value: serde_json::Value) -> Result<ReviewReport> {
    let report: ReviewReport =
        serde_json::from_value(value).map_err(|e| Error::Schema(e.to_string()))?;
    if report.score > 100 {
        return Err(Error::Schema(format!(
            "score {} out of range 0-100",
            report.score
        )));
    }
    Ok(report)
}
