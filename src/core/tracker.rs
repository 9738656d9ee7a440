//! Application facade: one method per user action, one accessor per view.
//!
//! Every mutation is applied to a copy of the affected state, mirrored to
//! storage, and only then committed, so a failed write leaves memory and
//! disk on the same previous state.

use std::{collections::BTreeMap, future::Future, sync::Arc};

use uuid::Uuid;

use crate::{
    config::Config,
    core::{
        budget_store::BudgetStore,
        record_store::RecordStore,
        services::{
            AggregationEngine, BudgetStatus, InsightCoordinator, InsightGateway, InsightStatus,
            MonthlyReport, RefreshOutcome,
        },
        session::Session,
    },
    currency,
    domain::{
        Budget, Category, Currency, Displayable, Expense, Language, NewExpense, Period, Settings,
        User,
    },
    errors::{Result, TrackerError},
    storage::{JsonFileStore, KeyValueStore, PersistenceSync},
};

/// Budget statuses shown in the dashboard goals panel.
const DASHBOARD_GOALS: usize = 3;

/// Headline figures for the dashboard view.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub total_spent: f64,
    pub expense_count: usize,
    pub category_totals: BTreeMap<Category, f64>,
    pub top_category: Option<(Category, f64)>,
    pub goals: Vec<BudgetStatus>,
    pub insight: InsightStatus,
}

/// Owns the stores, settings, session and insight cache of one tracker.
///
/// Mutations, derived views (`dashboard`, `budget_statuses`,
/// `monthly_report`, `months_with_activity`) and insight refreshes fail with
/// [`TrackerError::NotAuthenticated`] outside a session. Raw snapshots
/// (`expenses`, `history`, `budgets`, `settings`) stay readable so a host can
/// render state before sign-in.
pub struct Tracker {
    sync: PersistenceSync,
    records: RecordStore,
    budgets: BudgetStore,
    settings: Settings,
    session: Session,
    insights: InsightCoordinator,
}

impl Tracker {
    /// Rehydrates all state from `store`. Unusable stored data is replaced by
    /// defaults, so opening never fails.
    pub fn open(
        store: Arc<dyn KeyValueStore>,
        gateway: Arc<dyn InsightGateway>,
        config: &Config,
    ) -> Self {
        let sync = PersistenceSync::new(store).with_pretty_json(config.pretty_json);
        let state = sync.load();
        Self {
            records: RecordStore::new(state.expenses),
            budgets: BudgetStore::new(state.budgets),
            settings: state.settings,
            session: Session::from_persisted(state.user),
            insights: InsightCoordinator::new(gateway, config.insight_timeout()),
            sync,
        }
    }

    /// Opens the JSON file store under the configured data directory.
    pub fn open_on_disk(config: &Config, gateway: Arc<dyn InsightGateway>) -> Result<Self> {
        let store = JsonFileStore::new(Some(config.data_dir()))?;
        tracing::info!(root = %store.root().display(), "opening tracker store");
        Ok(Self::open(Arc::new(store), gateway, config))
    }

    pub fn login(&mut self, email: &str, name: &str) -> Result<User> {
        if self.session.is_authenticated() {
            return Err(TrackerError::Validation(
                "a session is already active".into(),
            ));
        }
        let user = User::new(email, name)?;
        self.sync.save_user(&user)?;
        self.session.login(user.clone())?;
        tracing::info!(email = %user.email, "signed in");
        Ok(user)
    }

    /// Forgets the signed-in identity. Records, budgets and settings stay.
    pub fn logout(&mut self) -> Result<Option<User>> {
        if !self.session.is_authenticated() {
            return Ok(None);
        }
        self.sync.clear_user()?;
        let user = self.session.logout();
        tracing::info!("signed out");
        Ok(user)
    }

    pub fn add_expense(&mut self, draft: NewExpense) -> Result<Expense> {
        self.session.require_user()?;
        let mut records = self.records.clone();
        let expense = records.add(draft)?;
        self.sync.save_expenses(records.records())?;
        self.records = records;
        self.insights.invalidate();
        tracing::info!(id = %expense.id, expense = %expense.display_label(), "expense recorded");
        Ok(expense)
    }

    /// Removing an unknown identity is a no-op and returns `None`.
    pub fn remove_expense(&mut self, id: Uuid) -> Result<Option<Expense>> {
        self.session.require_user()?;
        let mut records = self.records.clone();
        let Some(removed) = records.remove(id) else {
            tracing::debug!(%id, "remove ignored, no such expense");
            return Ok(None);
        };
        self.sync.save_expenses(records.records())?;
        self.records = records;
        self.insights.invalidate();
        tracing::info!(%id, expense = %removed.display_label(), "expense removed");
        Ok(Some(removed))
    }

    pub fn set_budget_limit(&mut self, category: Category, limit: f64) -> Result<()> {
        self.session.require_user()?;
        let mut budgets = self.budgets.clone();
        budgets.set_limit(category, limit)?;
        self.commit_budgets(budgets)
    }

    /// Same as [`Tracker::set_budget_limit`] for raw form input.
    pub fn set_budget_limit_from_input(&mut self, category: &str, limit: &str) -> Result<()> {
        self.session.require_user()?;
        let mut budgets = self.budgets.clone();
        budgets.set_limit_from_input(category, limit)?;
        self.commit_budgets(budgets)
    }

    pub fn set_currency(&mut self, code: &str) -> Result<&Currency> {
        self.session.require_user()?;
        let currency = Currency::from_code(code)
            .ok_or_else(|| TrackerError::Validation(format!("unknown currency `{}`", code.trim())))?;
        let settings = Settings {
            currency,
            ..self.settings.clone()
        };
        self.commit_settings(settings)?;
        Ok(&self.settings.currency)
    }

    pub fn set_language(&mut self, language: Language) -> Result<()> {
        self.session.require_user()?;
        let settings = Settings {
            language,
            ..self.settings.clone()
        };
        self.commit_settings(settings)
    }

    /// Starts an insight refresh over the current snapshot.
    ///
    /// The returned future owns its snapshot, so the tracker may keep being
    /// mutated while it runs; a mutation makes its eventual response stale.
    pub fn refresh_insights(
        &self,
    ) -> Result<impl Future<Output = RefreshOutcome> + Send + 'static> {
        self.session.require_user()?;
        let coordinator = self.insights.clone();
        let expenses = self.records.all();
        let budgets = self.budgets.all();
        Ok(async move { coordinator.refresh(expenses, budgets).await })
    }

    pub fn dashboard(&self) -> Result<Dashboard> {
        self.session.require_user()?;
        let records = self.records.records();
        let mut goals = AggregationEngine::budget_statuses(records, self.budgets.budgets());
        goals.truncate(DASHBOARD_GOALS);
        Ok(Dashboard {
            total_spent: AggregationEngine::total_spent(records),
            expense_count: records.len(),
            category_totals: AggregationEngine::category_totals(records),
            top_category: AggregationEngine::top_category(records),
            goals,
            insight: self.insights.status(),
        })
    }

    /// Most recent first.
    pub fn history(&self) -> Vec<Expense> {
        self.records.all()
    }

    pub fn expenses(&self) -> &[Expense] {
        self.records.records()
    }

    pub fn budgets(&self) -> &[Budget] {
        self.budgets.budgets()
    }

    pub fn budget_statuses(&self) -> Result<Vec<BudgetStatus>> {
        self.session.require_user()?;
        Ok(AggregationEngine::budget_statuses(
            self.records.records(),
            self.budgets.budgets(),
        ))
    }

    pub fn monthly_report(&self, period: Period) -> Result<MonthlyReport> {
        self.session.require_user()?;
        Ok(AggregationEngine::monthly_report(
            self.records.records(),
            self.budgets.budgets(),
            period,
        ))
    }

    pub fn months_with_activity(&self) -> Result<Vec<(i32, u32)>> {
        self.session.require_user()?;
        Ok(AggregationEngine::months_with_activity(self.records.records()))
    }

    pub fn insight_status(&self) -> InsightStatus {
        self.insights.status()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Formats `amount` in the selected display currency.
    pub fn format_amount(&self, amount: f64) -> String {
        currency::format_amount(&self.settings.currency, amount)
    }

    fn commit_budgets(&mut self, budgets: BudgetStore) -> Result<()> {
        if budgets == self.budgets {
            return Ok(());
        }
        self.sync.save_budgets(budgets.budgets())?;
        for budget in budgets
            .budgets()
            .iter()
            .filter(|budget| !self.budgets.budgets().contains(budget))
        {
            tracing::info!(budget = %budget.display_label(), "budget limit updated");
        }
        self.budgets = budgets;
        self.insights.invalidate();
        Ok(())
    }

    fn commit_settings(&mut self, settings: Settings) -> Result<()> {
        self.sync.save_settings(&settings)?;
        tracing::info!(
            currency = %settings.currency.display_label(),
            language = settings.language.code(),
            "settings updated"
        );
        self.settings = settings;
        Ok(())
    }
}
