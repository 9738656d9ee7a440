//! Owner of per-category spending limits.

use std::collections::HashSet;

use crate::{
    domain::{default_budgets, parse_amount, validate_amount, Budget, Category, CATEGORIES},
    errors::{Result, TrackerError},
};

/// Mapping from category to limit. Categories are fixed after initialization;
/// only limits change.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStore {
    budgets: Vec<Budget>,
}

impl BudgetStore {
    /// Creates one budget per distinct category with its default limit.
    pub fn initialize(categories: &[Category]) -> Self {
        let mut seen = HashSet::new();
        let budgets = categories
            .iter()
            .copied()
            .filter(|category| seen.insert(*category))
            .map(Budget::default_for)
            .collect();
        Self { budgets }
    }

    /// Rebuilds the store from persisted budgets, repairing it so that every
    /// category in [`CATEGORIES`] appears exactly once, in canonical order.
    /// The first valid entry for a category wins; missing or invalid ones
    /// fall back to the category default.
    pub fn new(persisted: Vec<Budget>) -> Self {
        let budgets = CATEGORIES
            .iter()
            .map(|&category| {
                persisted
                    .iter()
                    .find(|budget| budget.category == category && validate_amount(budget.limit).is_ok())
                    .cloned()
                    .unwrap_or_else(|| {
                        tracing::debug!(%category, "filling budget with default limit");
                        Budget::default_for(category)
                    })
            })
            .collect();
        Self { budgets }
    }

    /// Replaces the limit for an existing category.
    pub fn set_limit(&mut self, category: Category, limit: f64) -> Result<()> {
        let limit = validate_amount(limit)?;
        let budget = self
            .budgets
            .iter_mut()
            .find(|budget| budget.category == category)
            .ok_or_else(|| TrackerError::InvalidCategory(category.to_string()))?;
        budget.limit = limit;
        Ok(())
    }

    /// Same as [`BudgetStore::set_limit`] but from raw form input.
    pub fn set_limit_from_input(&mut self, category: &str, limit: &str) -> Result<()> {
        let category = category.parse::<Category>()?;
        let limit = parse_amount(limit)?;
        self.set_limit(category, limit)
    }

    pub fn get(&self, category: Category) -> Option<&Budget> {
        self.budgets.iter().find(|budget| budget.category == category)
    }

    pub fn all(&self) -> Vec<Budget> {
        self.budgets.clone()
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }
}

impl Default for BudgetStore {
    fn default() -> Self {
        Self {
            budgets: default_budgets(),
        }
    }
}
