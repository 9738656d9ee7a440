//! Aggregation helpers deriving statistics from record and budget snapshots.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike;
use serde::Serialize;

use crate::domain::{Amounted, Budget, Category, Expense, Period, CATEGORIES};

/// Utilization above this percentage is flagged on budget views.
pub const ALERT_THRESHOLD_PERCENT: f64 = 90.0;

/// Spend against a single budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub category: Category,
    pub limit: f64,
    pub spent: f64,
    /// `limit - spent`; negative once the budget is exceeded.
    pub remaining: f64,
    pub utilization: f64,
    pub alert: bool,
}

/// Per-category spend within one reporting period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReport {
    pub period: Period,
    pub total: f64,
    pub by_category: BTreeMap<Category, f64>,
    pub total_budget: f64,
}

/// Stateless aggregation over [`Expense`] and [`Budget`] snapshots.
///
/// Every function is pure: the same inputs always give the same output, and
/// the order of the input records never changes a result.
pub struct AggregationEngine;

impl AggregationEngine {
    /// Sum of all amounts; zero for an empty slice.
    pub fn total_spent<T: Amounted>(records: &[T]) -> f64 {
        order_independent_sum(records.iter().map(Amounted::amount))
    }

    /// Sum of amounts recorded against `category`.
    pub fn spent_by_category(records: &[Expense], category: Category) -> f64 {
        order_independent_sum(
            records
                .iter()
                .filter(|expense| expense.category == category)
                .map(|expense| expense.amount),
        )
    }

    /// Totals for every category, including those with no spend.
    pub fn category_totals(records: &[Expense]) -> BTreeMap<Category, f64> {
        CATEGORIES
            .iter()
            .map(|&category| (category, Self::spent_by_category(records, category)))
            .collect()
    }

    /// Category with the highest spend. Ties go to the earlier category in
    /// canonical order; `None` when nothing has been spent.
    pub fn top_category(records: &[Expense]) -> Option<(Category, f64)> {
        Self::category_totals(records)
            .into_iter()
            .filter(|(_, spent)| *spent > 0.0)
            .fold(None, |best, (category, spent)| match best {
                Some((_, best_spent)) if best_spent >= spent => best,
                _ => Some((category, spent)),
            })
    }

    /// Percentage of the budget consumed, clamped to `[0, 100]`.
    pub fn utilization(records: &[Expense], budget: &Budget) -> f64 {
        let spent = Self::spent_by_category(records, budget.category);
        utilization_percent(spent, budget.limit)
    }

    pub fn budget_status(records: &[Expense], budget: &Budget) -> BudgetStatus {
        let spent = Self::spent_by_category(records, budget.category);
        let utilization = utilization_percent(spent, budget.limit);
        BudgetStatus {
            category: budget.category,
            limit: budget.limit,
            spent,
            remaining: budget.limit - spent,
            utilization,
            alert: utilization > ALERT_THRESHOLD_PERCENT,
        }
    }

    /// One status per budget, in budget order.
    pub fn budget_statuses(records: &[Expense], budgets: &[Budget]) -> Vec<BudgetStatus> {
        budgets
            .iter()
            .map(|budget| Self::budget_status(records, budget))
            .collect()
    }

    /// Per-category totals for records dated inside `period`. Categories
    /// without records in the period are omitted.
    pub fn monthly_breakdown(records: &[Expense], period: &Period) -> BTreeMap<Category, f64> {
        let mut grouped: BTreeMap<Category, Vec<f64>> = BTreeMap::new();
        for expense in records.iter().filter(|expense| period.contains(expense.date)) {
            grouped.entry(expense.category).or_default().push(expense.amount);
        }
        grouped
            .into_iter()
            .map(|(category, amounts)| (category, order_independent_sum(amounts)))
            .collect()
    }

    /// Distinct `(year, month)` pairs that have at least one record, newest first.
    pub fn months_with_activity(records: &[Expense]) -> Vec<(i32, u32)> {
        let months: BTreeSet<(i32, u32)> = records
            .iter()
            .map(|expense| (expense.date.year(), expense.date.month()))
            .collect();
        months.into_iter().rev().collect()
    }

    pub fn monthly_report(records: &[Expense], budgets: &[Budget], period: Period) -> MonthlyReport {
        let by_category = Self::monthly_breakdown(records, &period);
        let total = order_independent_sum(by_category.values().copied());
        MonthlyReport {
            period,
            total,
            by_category,
            total_budget: Self::total_spent(budgets),
        }
    }
}

impl Amounted for Budget {
    fn amount(&self) -> f64 {
        self.limit
    }
}

/// Maps spend against a limit to a percentage in `[0, 100]`. A zero limit
/// reads as fully used once anything is spent.
pub fn utilization_percent(spent: f64, limit: f64) -> f64 {
    if limit <= 0.0 {
        return if spent > 0.0 { 100.0 } else { 0.0 };
    }
    (spent / limit * 100.0).clamp(0.0, 100.0)
}

/// Floating point addition is not associative, so amounts are summed in
/// sorted order.
fn order_independent_sum(amounts: impl IntoIterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = amounts.into_iter().collect();
    values.sort_by(f64::total_cmp);
    values.into_iter().fold(0.0, |acc, value| acc + value)
}
