//! Expense claims ("rendiciones") submitted by supervisors.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::CoreError;

/// Number of rows returned by the history view when the caller gives no limit.
pub const DEFAULT_HISTORY_LIMIT: i64 = 20;

/// Deserialized through [`FromStr`], so Spanish names and any casing work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum Category {
    Transport,
    Food,
    Materials,
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Transport,
        Category::Food,
        Category::Materials,
        Category::Other,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Transport => "TRANSPORT",
            Category::Food => "FOOD",
            Category::Materials => "MATERIALS",
            Category::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TRANSPORT" | "TRANSPORTE" => Ok(Category::Transport),
            "FOOD" | "ALIMENTACION" | "ALIMENTACIÓN" => Ok(Category::Food),
            "MATERIALS" | "MATERIALES" => Ok(Category::Materials),
            "OTHER" | "OTROS" => Ok(Category::Other),
            _ => Err(CoreError::InvalidCategory {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Category {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A validated claim ready to be appended to the ledger.
///
/// The id is generated at construction, so submitting the same arguments
/// twice yields two distinct records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewReimbursement {
    pub id: Uuid,
    pub supervisor_id: String,
    pub date: NaiveDate,
    pub amount: i64,
    pub category: Category,
    pub comment: Option<String>,
}

impl NewReimbursement {
    /// Validates the submission and assigns a fresh id.
    ///
    /// A blank comment is stored as no comment.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidAmount`] if `amount` is not positive, or
    /// [`CoreError::InvalidCategory`] if `category` is not a known category.
    pub fn new(
        supervisor_id: impl Into<String>,
        date: NaiveDate,
        amount: i64,
        category: &str,
        comment: Option<&str>,
    ) -> Result<Self, CoreError> {
        if amount <= 0 {
            return Err(CoreError::InvalidAmount { amount });
        }
        let category = category.parse::<Category>()?;
        let comment = comment
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(ToOwned::to_owned);

        Ok(Self {
            id: Uuid::new_v4(),
            supervisor_id: supervisor_id.into(),
            date,
            amount,
            category,
            comment,
        })
    }
}

/// A claim as stored in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reimbursement {
    pub id: Uuid,
    pub supervisor_id: String,
    pub date: NaiveDate,
    pub amount: i64,
    pub category: Category,
    pub comment: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Totals shown above a supervisor's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReimbursementSummary {
    /// Wider than a single amount so that many large claims cannot overflow.
    pub total: i128,
    /// Mean amount rounded half-up to the smallest currency unit.
    pub mean: Option<i64>,
    pub count: usize,
}

impl ReimbursementSummary {
    #[must_use]
    pub fn from_records(records: &[Reimbursement]) -> Self {
        let total: i128 = records.iter().map(|r| i128::from(r.amount)).sum();
        let count = records.len();
        let mean = i128::try_from(count)
            .ok()
            .filter(|&n| n > 0)
            .and_then(|n| i64::try_from((2 * total + n) / (2 * n)).ok());
        Self { total, mean, count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 3).unwrap()
    }

    fn record(amount: i64) -> Reimbursement {
        Reimbursement {
            id: Uuid::new_v4(),
            supervisor_id: "s41861921".to_string(),
            date: date(),
            amount,
            category: Category::Transport,
            comment: None,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn zero_amount_is_rejected() {
        let err = NewReimbursement::new("s1", date(), 0, "TRANSPORT", None).unwrap_err();
        assert_eq!(err, CoreError::InvalidAmount { amount: 0 });
        assert_eq!(err.field(), "amount");
    }

    #[test]
    fn negative_amount_is_rejected() {
        let err = NewReimbursement::new("s1", date(), -500, "FOOD", None).unwrap_err();
        assert_eq!(err, CoreError::InvalidAmount { amount: -500 });
    }

    #[test]
    fn amount_of_one_is_accepted() {
        let claim = NewReimbursement::new("s1", date(), 1, "OTHER", None).unwrap();
        assert_eq!(claim.amount, 1);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = NewReimbursement::new("s1", date(), 1500, "UNKNOWN", None).unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidCategory {
                value: "UNKNOWN".to_string()
            }
        );
    }

    #[test]
    fn spanish_category_names_are_accepted() {
        let claim = NewReimbursement::new("s1", date(), 15_000, "TRANSPORTE", None).unwrap();
        assert_eq!(claim.category, Category::Transport);
        assert_eq!("alimentacion".parse::<Category>().unwrap(), Category::Food);
        assert_eq!("Materiales".parse::<Category>().unwrap(), Category::Materials);
        assert_eq!("OTROS".parse::<Category>().unwrap(), Category::Other);
    }

    #[test]
    fn amount_is_checked_before_category() {
        let err = NewReimbursement::new("s1", date(), 0, "UNKNOWN", None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidAmount { .. }));
    }

    #[test]
    fn identical_submissions_get_distinct_ids() {
        let a = NewReimbursement::new("s1", date(), 8_500, "FOOD", Some("Almuerzo")).unwrap();
        let b = NewReimbursement::new("s1", date(), 8_500, "FOOD", Some("Almuerzo")).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn blank_comment_becomes_none() {
        let claim = NewReimbursement::new("s1", date(), 100, "OTHER", Some("   ")).unwrap();
        assert!(claim.comment.is_none());
        let claim = NewReimbursement::new("s1", date(), 100, "OTHER", Some(" Peajes ")).unwrap();
        assert_eq!(claim.comment.as_deref(), Some("Peajes"));
    }

    #[test]
    fn category_serializes_in_english() {
        let json = serde_json::to_string(&Category::Materials).unwrap();
        assert_eq!(json, "\"MATERIALS\"");
        let parsed: Category = serde_json::from_str("\"OTROS\"").unwrap();
        assert_eq!(parsed, Category::Other);
        let parsed: Category = serde_json::from_str("\"alimentación\"").unwrap();
        assert_eq!(parsed, Category::Food);
    }

    #[test]
    fn summary_of_history() {
        let summary =
            ReimbursementSummary::from_records(&[record(15_000), record(8_500), record(22_000)]);
        assert_eq!(summary.total, 45_500);
        assert_eq!(summary.count, 3);
        // 45_500 / 3 = 15_166.67
        assert_eq!(summary.mean, Some(15_167));
    }

    #[test]
    fn summary_of_amounts_near_the_integer_limit() {
        let big = i64::MAX / 2 + 1;
        let summary = ReimbursementSummary::from_records(&[record(big)]);
        assert_eq!(summary.total, i128::from(big));
        assert_eq!(summary.mean, Some(big));

        let summary = ReimbursementSummary::from_records(&[record(i64::MAX), record(i64::MAX)]);
        assert_eq!(summary.total, 2 * i128::from(i64::MAX));
        assert_eq!(summary.mean, Some(i64::MAX));

        let summary = ReimbursementSummary::from_records(&[record(i64::MAX), record(1)]);
        // (i64::MAX + 1) / 2 is exact
        assert_eq!(summary.mean, Some(i64::MAX / 2 + 1));
    }

    #[test]
    fn summary_of_empty_history() {
        let summary = ReimbursementSummary::from_records(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean, None);
    }
}
