pub mod aggregation;
pub mod insight_service;

pub use aggregation::{
    utilization_percent, AggregationEngine, BudgetStatus, MonthlyReport, ALERT_THRESHOLD_PERCENT,
};
pub use insight_service::{
    GatewayError, InsightCoordinator, InsightGateway, InsightStatus, MockGateway, RefreshOutcome,
};
