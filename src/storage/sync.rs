//! Mirrors in-memory tracker state to a [`KeyValueStore`] and rehydrates it.
//!
//! Stored payloads are never trusted: each key is decoded on its own, and
//! within a key every field or element is validated separately, so one bad
//! entry costs only that entry. Nothing read back from storage can fail a
//! load; unusable data is logged and replaced by its default.
//!
//! When a readable payload had to be repaired (entries dropped, budgets
//! filled in), the repaired form is written back so disk and memory agree
//! from the start. Payloads that do not parse at all are left on disk.

use std::{collections::HashSet, sync::Arc};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    core::budget_store::BudgetStore,
    domain::{Budget, Currency, Expense, Language, Settings, User},
    errors::Result,
};

use super::{KeyValueStore, StorageKey};

/// Everything rehydrated at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedState {
    pub user: Option<User>,
    pub settings: Settings,
    pub expenses: Vec<Expense>,
    pub budgets: Vec<Budget>,
}

#[derive(Clone)]
pub struct PersistenceSync {
    store: Arc<dyn KeyValueStore>,
    pretty: bool,
}

impl PersistenceSync {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            pretty: true,
        }
    }

    /// Chooses between indented and compact JSON.
    pub fn with_pretty_json(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn load(&self) -> LoadedState {
        let user = self.read(StorageKey::User).and_then(|raw| decode_user(&raw));
        let settings = self
            .read(StorageKey::Settings)
            .map(|raw| decode_settings(&raw))
            .unwrap_or_default();
        let (expenses, expenses_repaired) = self
            .read(StorageKey::Expenses)
            .map(|raw| decode_expenses(&raw))
            .unwrap_or_default();
        if expenses_repaired {
            self.write_back(StorageKey::Expenses, &expenses);
        }
        let budgets = match self.read(StorageKey::Budgets).and_then(|raw| decode_budgets(&raw)) {
            Some(stored) => {
                let repaired = BudgetStore::new(stored.clone()).all();
                if repaired != stored {
                    self.write_back(StorageKey::Budgets, &repaired);
                }
                repaired
            }
            None => BudgetStore::default().all(),
        };
        tracing::info!(
            authenticated = user.is_some(),
            expenses = expenses.len(),
            budgets = budgets.len(),
            "tracker state loaded"
        );
        LoadedState {
            user,
            settings,
            expenses,
            budgets,
        }
    }

    /// Serializes `value` and writes it under `key`.
    pub fn save<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) -> Result<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        self.store.set(key.as_str(), &json)?;
        tracing::debug!(%key, bytes = json.len(), "state mirrored");
        Ok(())
    }

    pub fn save_user(&self, user: &User) -> Result<()> {
        self.save(StorageKey::User, user)
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.save(StorageKey::Settings, settings)
    }

    pub fn save_expenses(&self, expenses: &[Expense]) -> Result<()> {
        self.save(StorageKey::Expenses, expenses)
    }

    pub fn save_budgets(&self, budgets: &[Budget]) -> Result<()> {
        self.save(StorageKey::Budgets, budgets)
    }

    /// Removes only the user identity; settings, expenses and budgets stay.
    pub fn clear_user(&self) -> Result<()> {
        self.store.remove(StorageKey::User.as_str())
    }

    fn write_back<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) {
        match self.save(key, value) {
            Ok(()) => tracing::info!(%key, "repaired stored state written back"),
            Err(err) => tracing::warn!(%key, error = %err, "could not write back repaired state"),
        }
    }

    fn read(&self, key: StorageKey) -> Option<String> {
        match self.store.get(key.as_str()) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(%key, error = %err, "unreadable stored state, using defaults");
                None
            }
        }
    }
}

fn parse_value(key: StorageKey, raw: &str) -> Option<Value> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(%key, error = %err, "malformed stored JSON, using defaults");
            None
        }
    }
}

fn decode_user(raw: &str) -> Option<User> {
    let value = parse_value(StorageKey::User, raw)?;
    if value.is_null() {
        return None;
    }
    match serde_json::from_value::<User>(value) {
        Ok(user) if user.is_well_formed() => Some(user),
        Ok(_) => {
            tracing::warn!("stored user has blank fields, starting signed out");
            None
        }
        Err(err) => {
            tracing::warn!(error = %err, "stored user has the wrong shape, starting signed out");
            None
        }
    }
}

fn decode_settings(raw: &str) -> Settings {
    let Some(Value::Object(fields)) = parse_value(StorageKey::Settings, raw) else {
        return Settings::default();
    };
    Settings {
        currency: decode_currency(&fields).unwrap_or_default(),
        language: decode_language(&fields).unwrap_or_default(),
    }
}

/// Accepts `{code, ...}` or a bare code; the canonical triple for the code is
/// used so stale symbols or names are corrected.
fn decode_currency(fields: &Map<String, Value>) -> Option<Currency> {
    let code = match fields.get("currency")? {
        Value::Object(currency) => currency.get("code")?.as_str()?,
        Value::String(code) => code.as_str(),
        _ => return None,
    };
    let currency = Currency::from_code(code);
    if currency.is_none() {
        tracing::warn!(code, "unknown stored currency, using default");
    }
    currency
}

fn decode_language(fields: &Map<String, Value>) -> Option<Language> {
    let code = fields.get("language")?.as_str()?;
    code.parse().ok()
}

/// Returns the usable expenses and whether any stored entry was dropped.
/// Later duplicates of an identity are dropped along with malformed entries.
fn decode_expenses(raw: &str) -> (Vec<Expense>, bool) {
    let Some(Value::Array(items)) = parse_value(StorageKey::Expenses, raw) else {
        return (Vec::new(), false);
    };
    let total = items.len();
    let mut seen = HashSet::with_capacity(total);
    let expenses: Vec<Expense> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<Expense>(item).ok())
        .filter(Expense::is_well_formed)
        .filter(|expense| seen.insert(expense.id))
        .collect();
    let dropped = total - expenses.len();
    if dropped > 0 {
        tracing::warn!(dropped, "skipped malformed or duplicate stored expenses");
    }
    (expenses, dropped > 0)
}

fn decode_budgets(raw: &str) -> Option<Vec<Budget>> {
    let Some(Value::Array(items)) = parse_value(StorageKey::Budgets, raw) else {
        return None;
    };
    Some(
        items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<Budget>(item).ok())
            .collect(),
    )
}
