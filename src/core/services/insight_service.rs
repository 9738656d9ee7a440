//! Coordination of requests to the external insight gateway.
//!
//! The gateway is the only suspending collaborator in the crate. Responses
//! are committed under a last-request-wins rule: every refresh takes a ticket
//! from a monotonically increasing sequence, and a response is dropped if a
//! newer ticket was issued (by another refresh or by an invalidation) while
//! it was in flight.

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    time::Duration,
};

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Budget, Expense, Insight};

const CANCELLED_REASON: &str = "insight request was cancelled";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    #[error("insight request failed: {0}")]
    Failed(String),
    #[error("insight request timed out after {0:?}")]
    Timeout(Duration),
}

/// External producer of qualitative spending insights.
#[async_trait]
pub trait InsightGateway: Send + Sync {
    async fn generate(
        &self,
        expenses: &[Expense],
        budgets: &[Budget],
    ) -> Result<Insight, GatewayError>;
}

/// What the insight panel should currently show.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InsightStatus {
    #[default]
    Idle,
    Loading,
    Ready(Insight),
    /// The last request failed; the user may retry.
    Unavailable(String),
}

impl InsightStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, InsightStatus::Loading)
    }

    pub fn insight(&self) -> Option<&Insight> {
        match self {
            InsightStatus::Ready(insight) => Some(insight),
            _ => None,
        }
    }
}

/// Result of a single refresh call.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Applied(Insight),
    Failed(String),
    /// No records to analyse; the gateway was not called.
    Skipped,
    /// A newer request or an invalidation overtook this one.
    Superseded,
}

#[derive(Debug, Default)]
struct InsightState {
    sequence: u64,
    status: InsightStatus,
}

/// Cloneable handle over the shared insight cache.
#[derive(Clone)]
pub struct InsightCoordinator {
    gateway: Arc<dyn InsightGateway>,
    state: Arc<Mutex<InsightState>>,
    timeout: Duration,
}

impl InsightCoordinator {
    pub fn new(gateway: Arc<dyn InsightGateway>, timeout: Duration) -> Self {
        Self {
            gateway,
            state: Arc::new(Mutex::new(InsightState::default())),
            timeout,
        }
    }

    pub fn status(&self) -> InsightStatus {
        self.lock().status.clone()
    }

    pub fn current(&self) -> Option<Insight> {
        self.lock().status.insight().cloned()
    }

    /// Drops the cached insight and orphans any request in flight.
    pub fn invalidate(&self) {
        let mut state = self.lock();
        state.sequence += 1;
        state.status = InsightStatus::Idle;
    }

    /// Requests a fresh insight for the snapshot.
    pub async fn refresh(&self, expenses: Vec<Expense>, budgets: Vec<Budget>) -> RefreshOutcome {
        if expenses.is_empty() {
            return RefreshOutcome::Skipped;
        }
        let ticket = self.begin();
        let _pending = PendingRefresh {
            state: Arc::clone(&self.state),
            ticket,
        };
        let response =
            match tokio::time::timeout(self.timeout, self.gateway.generate(&expenses, &budgets))
                .await
            {
                Ok(response) => response,
                Err(_) => Err(GatewayError::Timeout(self.timeout)),
            };
        self.commit(ticket, response)
    }

    fn begin(&self) -> u64 {
        let mut state = self.lock();
        state.sequence += 1;
        state.status = InsightStatus::Loading;
        state.sequence
    }

    fn commit(&self, ticket: u64, response: Result<Insight, GatewayError>) -> RefreshOutcome {
        let mut state = self.lock();
        if state.sequence != ticket {
            tracing::debug!(ticket, latest = state.sequence, "discarding stale insight response");
            return RefreshOutcome::Superseded;
        }
        match response {
            Ok(insight) => {
                tracing::info!(score = insight.score, "insight refreshed");
                state.status = InsightStatus::Ready(insight.clone());
                RefreshOutcome::Applied(insight)
            }
            Err(err) => {
                tracing::warn!(error = %err, "insight unavailable");
                let reason = err.to_string();
                state.status = InsightStatus::Unavailable(reason.clone());
                RefreshOutcome::Failed(reason)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, InsightState> {
        lock_state(&self.state)
    }
}

fn lock_state(state: &Mutex<InsightState>) -> MutexGuard<'_, InsightState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears `Loading` when a refresh is dropped before it commits, so an
/// abandoned request leaves a retryable state behind.
struct PendingRefresh {
    state: Arc<Mutex<InsightState>>,
    ticket: u64,
}

impl Drop for PendingRefresh {
    fn drop(&mut self) {
        let mut state = lock_state(&self.state);
        if state.sequence == self.ticket && state.status.is_loading() {
            tracing::warn!(ticket = self.ticket, "insight request abandoned before completion");
            state.status = InsightStatus::Unavailable(CANCELLED_REASON.into());
        }
    }
}

/// Gateway returning a predictable response, for tests and offline use.
#[derive(Debug)]
pub struct MockGateway {
    response: Result<Insight, GatewayError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockGateway {
    pub fn ready(insight: Insight) -> Self {
        Self {
            response: Ok(insight),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Err(GatewayError::Failed(message.into())),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Delays every response; useful for exercising timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InsightGateway for MockGateway {
    async fn generate(
        &self,
        _expenses: &[Expense],
        _budgets: &[Budget],
    ) -> Result<Insight, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn insight(score: f64) -> Insight {
        Insight {
            score,
            summary: format!("score {score}"),
            tips: vec!["cook at home".into()],
        }
    }

    fn snapshot() -> Vec<Expense> {
        vec![Expense {
            id: Uuid::new_v4(),
            amount: 12.0,
            category: Category::Food,
            description: "lunch".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        }]
    }

    /// Answers the n-th call with the n-th scripted `(delay, insight)` pair.
    struct ScriptedGateway {
        script: Vec<(Duration, Insight)>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl InsightGateway for ScriptedGateway {
        async fn generate(
            &self,
            _expenses: &[Expense],
            _budgets: &[Budget],
        ) -> Result<Insight, GatewayError> {
            let index = self.calls.fetch_add(1, Ordering::SeqCst);
            let (delay, insight) = self.script[index].clone();
            tokio::time::sleep(delay).await;
            Ok(insight)
        }
    }

    #[tokio::test]
    async fn empty_snapshot_skips_the_gateway() {
        let gateway = Arc::new(MockGateway::ready(insight(80.0)));
        let coordinator = InsightCoordinator::new(gateway.clone(), Duration::from_secs(5));

        let outcome = coordinator.refresh(Vec::new(), Vec::new()).await;

        assert_eq!(outcome, RefreshOutcome::Skipped);
        assert_eq!(gateway.calls(), 0);
        assert_eq!(coordinator.status(), InsightStatus::Idle);
    }

    #[tokio::test]
    async fn success_is_cached() {
        let coordinator = InsightCoordinator::new(
            Arc::new(MockGateway::ready(insight(72.0))),
            Duration::from_secs(5),
        );

        let outcome = coordinator.refresh(snapshot(), Vec::new()).await;

        assert_eq!(outcome, RefreshOutcome::Applied(insight(72.0)));
        assert_eq!(coordinator.current(), Some(insight(72.0)));
    }

    #[tokio::test]
    async fn failure_clears_loading_and_surfaces_retry_state() {
        let coordinator = InsightCoordinator::new(
            Arc::new(MockGateway::failing("quota exceeded")),
            Duration::from_secs(5),
        );

        let outcome = coordinator.refresh(snapshot(), Vec::new()).await;

        assert!(matches!(outcome, RefreshOutcome::Failed(ref reason) if reason.contains("quota")));
        let status = coordinator.status();
        assert!(!status.is_loading());
        assert!(matches!(status, InsightStatus::Unavailable(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn unresponsive_gateway_times_out() {
        let gateway = MockGateway::ready(insight(50.0)).with_delay(Duration::from_secs(600));
        let coordinator = InsightCoordinator::new(Arc::new(gateway), Duration::from_secs(30));

        let outcome = coordinator.refresh(snapshot(), Vec::new()).await;

        assert!(matches!(outcome, RefreshOutcome::Failed(ref reason) if reason.contains("timed out")));
        assert!(matches!(coordinator.status(), InsightStatus::Unavailable(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn late_response_does_not_overwrite_newer_one() {
        let gateway = ScriptedGateway {
            script: vec![
                (Duration::from_secs(10), insight(10.0)),
                (Duration::from_secs(1), insight(90.0)),
            ],
            calls: AtomicUsize::new(0),
        };
        let coordinator = InsightCoordinator::new(Arc::new(gateway), Duration::from_secs(60));

        let (first, second) = tokio::join!(
            coordinator.refresh(snapshot(), Vec::new()),
            coordinator.refresh(snapshot(), Vec::new()),
        );

        assert_eq!(first, RefreshOutcome::Superseded);
        assert_eq!(second, RefreshOutcome::Applied(insight(90.0)));
        assert_eq!(coordinator.current(), Some(insight(90.0)));
    }

    #[tokio::test(start_paused = true)]
    async fn invalidation_orphans_in_flight_request() {
        let gateway = MockGateway::ready(insight(40.0)).with_delay(Duration::from_secs(5));
        let coordinator = InsightCoordinator::new(Arc::new(gateway), Duration::from_secs(60));
        let handle = coordinator.clone();

        let (outcome, ()) = tokio::join!(coordinator.refresh(snapshot(), Vec::new()), async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            handle.invalidate();
        });

        assert_eq!(outcome, RefreshOutcome::Superseded);
        assert_eq!(coordinator.status(), InsightStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_refresh_does_not_stay_loading() {
        let gateway = MockGateway::ready(insight(60.0)).with_delay(Duration::from_secs(10));
        let coordinator = InsightCoordinator::new(Arc::new(gateway), Duration::from_secs(60));

        let cut_short = tokio::time::timeout(
            Duration::from_secs(1),
            coordinator.refresh(snapshot(), Vec::new()),
        )
        .await;
        assert!(cut_short.is_err());

        tokio::time::sleep(Duration::from_secs(120)).await;
        let status = coordinator.status();
        assert!(!status.is_loading());
        assert_eq!(status, InsightStatus::Unavailable(CANCELLED_REASON.into()));

        let retry = coordinator.refresh(snapshot(), Vec::new()).await;
        assert_eq!(retry, RefreshOutcome::Applied(insight(60.0)));
    }

    #[tokio::test(start_paused = true)]
    async fn abandoning_a_superseded_refresh_keeps_the_newer_state() {
        let gateway = MockGateway::ready(insight(20.0)).with_delay(Duration::from_secs(10));
        let coordinator = InsightCoordinator::new(Arc::new(gateway), Duration::from_secs(60));

        let stale = tokio::time::timeout(
            Duration::from_secs(1),
            coordinator.refresh(snapshot(), Vec::new()),
        );
        let (cut_short, ()) = tokio::join!(stale, async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            coordinator.invalidate();
        });

        assert!(cut_short.is_err());
        assert_eq!(coordinator.status(), InsightStatus::Idle);
    }
}
