use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::{
        category::Category,
        common::{Amounted, Displayable, Identifiable},
    },
    errors::{Result, TrackerError},
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A recorded expense. Immutable once created; only removal is allowed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    pub amount: f64,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
}

impl Expense {
    pub(crate) fn from_draft(id: Uuid, draft: NewExpense) -> Self {
        Self {
            id,
            amount: draft.amount,
            category: draft.category,
            description: draft.description,
            date: draft.date,
        }
    }

    /// Structural checks applied to records coming back from storage.
    pub(crate) fn is_well_formed(&self) -> bool {
        validate_amount(self.amount).is_ok()
    }
}

impl Identifiable for Expense {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Displayable for Expense {
    fn display_label(&self) -> String {
        format!("{} {} {:.2} {}", self.date, self.category, self.amount, self.description)
    }
}

/// Expense fields supplied by the user before an identity is assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub amount: f64,
    pub category: Category,
    pub description: String,
    pub date: NaiveDate,
}

impl NewExpense {
    pub fn new(
        amount: f64,
        category: Category,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            amount,
            category,
            description: description.into(),
            date,
        }
    }

    /// Builds a draft from raw form input, rejecting anything outside the model.
    pub fn parse(amount: &str, category: &str, description: &str, date: &str) -> Result<Self> {
        let amount = parse_amount(amount)?;
        let category = category.parse::<Category>()?;
        let date = parse_date(date)?;
        Ok(Self::new(amount, category, description.trim(), date))
    }
}

/// Parses a non-negative, finite amount.
pub fn parse_amount(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| TrackerError::InvalidAmount(trimmed.to_string()))?;
    validate_amount(value)
}

/// Accepts finite values greater than or equal to zero.
pub fn validate_amount(value: f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(TrackerError::InvalidAmount(value.to_string()));
    }
    // folds -0.0 into 0.0
    Ok(value.abs())
}

/// Parses an ISO `YYYY-MM-DD` calendar date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| TrackerError::InvalidDate(trimmed.to_string()))
}
