use serde::{Deserialize, Serialize};

use crate::domain::{
    category::{Category, CATEGORIES},
    common::Displayable,
};

/// A spending limit for one category. The category acts as the key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub category: Category,
    pub limit: f64,
}

impl Budget {
    pub fn new(category: Category, limit: f64) -> Self {
        Self { category, limit }
    }

    /// Budget carrying the category's initial limit.
    pub fn default_for(category: Category) -> Self {
        Self::new(category, category.default_limit())
    }
}

impl Displayable for Budget {
    fn display_label(&self) -> String {
        format!("{} ({:.2})", self.category, self.limit)
    }
}

/// One budget per category, in canonical order.
pub fn default_budgets() -> Vec<Budget> {
    CATEGORIES.iter().copied().map(Budget::default_for).collect()
}
