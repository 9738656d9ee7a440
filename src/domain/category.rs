//! The closed set of spending categories.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::TrackerError;

/// Spending category. The set is closed; every record and budget carries one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Food,
    Tuition,
    Social,
    Books,
    Rent,
    Transport,
    Misc,
}

/// Canonical category order, also used for budget initialization.
pub const CATEGORIES: [Category; 7] = [
    Category::Food,
    Category::Tuition,
    Category::Social,
    Category::Books,
    Category::Rent,
    Category::Transport,
    Category::Misc,
];

const HOUSING_DEFAULT_LIMIT: f64 = 15_000.0;
const STANDARD_DEFAULT_LIMIT: f64 = 2_000.0;

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Tuition => "Tuition",
            Category::Social => "Social",
            Category::Books => "Books",
            Category::Rent => "Rent",
            Category::Transport => "Transport",
            Category::Misc => "Misc",
        }
    }

    /// Limit assigned when budgets are first initialized.
    pub fn default_limit(self) -> f64 {
        match self {
            Category::Rent => HOUSING_DEFAULT_LIMIT,
            _ => STANDARD_DEFAULT_LIMIT,
        }
    }
}

impl FromStr for Category {
    type Err = TrackerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        CATEGORIES
            .iter()
            .copied()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| TrackerError::InvalidCategory(trimmed.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
