#![doc(test(attr(deny(warnings))))]

//! Smarty Core keeps expense records and per-category budgets consistent
//! with durable storage and derives every spending statistic from them.
//!
//! [`Tracker`] is the entry point: it rehydrates state through a
//! [`storage::KeyValueStore`], mirrors each mutation before committing it,
//! and coordinates requests to an external [`InsightGateway`].

pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

pub use crate::config::{Config, ConfigManager};
pub use crate::core::{
    services::{
        AggregationEngine, BudgetStatus, GatewayError, InsightGateway, InsightStatus,
        MockGateway, MonthlyReport, RefreshOutcome,
    },
    Dashboard, Tracker,
};
pub use crate::domain::{
    Budget, Category, Currency, Expense, Insight, Language, NewExpense, Period, Settings, User,
    CATEGORIES,
};
pub use crate::errors::{Result, TrackerError};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Smarty Core tracing initialized.");
    });
}
