mod common;

use std::{sync::Arc, time::Duration};

use common::{date, expense, open_tracker_with, sample_insight, setup_test_env};
use smarty_core::{Category, InsightStatus, MockGateway, RefreshOutcome};

#[tokio::test(start_paused = true)]
async fn mutation_during_refresh_discards_the_stale_response() {
    let base = setup_test_env();
    let gateway = Arc::new(MockGateway::ready(sample_insight()).with_delay(Duration::from_secs(2)));
    let mut tracker = open_tracker_with(&base, gateway.clone());
    tracker.login("student@example.com", "Student").unwrap();
    tracker
        .add_expense(expense(80.0, Category::Food, date(2024, 3, 1)))
        .unwrap();

    let pending = tracker.refresh_insights().unwrap();
    let (outcome, ()) = tokio::join!(pending, async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(tracker.insight_status().is_loading());
        tracker
            .add_expense(expense(20.0, Category::Books, date(2024, 3, 2)))
            .unwrap();
    });

    assert_eq!(outcome, RefreshOutcome::Superseded);
    assert_eq!(tracker.insight_status(), InsightStatus::Idle);

    let outcome = tracker.refresh_insights().unwrap().await;
    assert_eq!(outcome, RefreshOutcome::Applied(sample_insight()));
    assert_eq!(gateway.calls(), 2);
}

#[tokio::test]
async fn gateway_failure_is_surfaced_and_retryable() {
    let base = setup_test_env();
    let mut tracker = open_tracker_with(&base, Arc::new(MockGateway::failing("quota exceeded")));
    tracker.login("student@example.com", "Student").unwrap();
    tracker
        .add_expense(expense(15.0, Category::Social, date(2024, 3, 1)))
        .unwrap();

    for _ in 0..2 {
        let outcome = tracker.refresh_insights().unwrap().await;
        assert!(matches!(outcome, RefreshOutcome::Failed(ref reason) if reason.contains("quota")));
        let status = tracker.insight_status();
        assert!(!status.is_loading());
        assert!(matches!(status, InsightStatus::Unavailable(_)));
    }
}

#[tokio::test(start_paused = true)]
async fn unresponsive_gateway_times_out() {
    let base = setup_test_env();
    let manager = smarty_core::ConfigManager::with_base_dir(base.clone()).unwrap();
    let mut config = manager.load().unwrap();
    config.insight_timeout_secs = 1;
    manager.save(&config).unwrap();

    let gateway = MockGateway::ready(sample_insight()).with_delay(Duration::from_secs(60));
    let mut tracker = open_tracker_with(&base, Arc::new(gateway));
    tracker.login("student@example.com", "Student").unwrap();
    tracker
        .add_expense(expense(15.0, Category::Misc, date(2024, 3, 1)))
        .unwrap();

    let outcome = tracker.refresh_insights().unwrap().await;
    assert!(matches!(outcome, RefreshOutcome::Failed(_)));
    assert!(matches!(tracker.insight_status(), InsightStatus::Unavailable(_)));
}

#[tokio::test]
async fn insights_are_never_persisted() {
    let base = setup_test_env();
    let mut tracker = open_tracker_with(&base, Arc::new(MockGateway::ready(sample_insight())));
    tracker.login("student@example.com", "Student").unwrap();
    tracker
        .add_expense(expense(15.0, Category::Food, date(2024, 3, 1)))
        .unwrap();
    tracker.refresh_insights().unwrap().await;
    assert!(tracker.insight_status().insight().is_some());

    let reopened = common::open_tracker(&base);
    assert_eq!(reopened.insight_status(), InsightStatus::Idle);
}
