//! Owner of expense records and their identities.

use std::collections::HashSet;

use uuid::Uuid;

use crate::{
    domain::{validate_amount, Expense, Identifiable, NewExpense},
    errors::Result,
};

/// Ordered, most-recent-first collection of expenses.
///
/// Identities handed out by a store are never handed out again, even after
/// the record carrying them has been removed.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Expense>,
    issued: HashSet<Uuid>,
}

impl RecordStore {
    /// Builds a store from previously persisted records. Later duplicates of an
    /// identity are dropped.
    pub fn new(initial: Vec<Expense>) -> Self {
        let mut issued = HashSet::with_capacity(initial.len());
        let mut records = Vec::with_capacity(initial.len());
        for expense in initial {
            if issued.insert(expense.id()) {
                records.push(expense);
            } else {
                tracing::warn!(id = %expense.id, "dropping expense with duplicate identity");
            }
        }
        Self { records, issued }
    }

    /// Validates the draft, assigns a fresh identity and prepends the record.
    pub fn add(&mut self, mut draft: NewExpense) -> Result<Expense> {
        draft.amount = validate_amount(draft.amount)?;
        let id = self.fresh_id();
        let expense = Expense::from_draft(id, draft);
        self.records.insert(0, expense.clone());
        Ok(expense)
    }

    /// Removes the record with the given identity. Unknown identities are ignored.
    pub fn remove(&mut self, id: Uuid) -> Option<Expense> {
        let index = self.records.iter().position(|expense| expense.id() == id)?;
        Some(self.records.remove(index))
    }

    /// Point-in-time copy of the records.
    pub fn all(&self) -> Vec<Expense> {
        self.records.clone()
    }

    pub fn records(&self) -> &[Expense] {
        &self.records
    }

    pub fn get(&self, id: Uuid) -> Option<&Expense> {
        self.records.iter().find(|expense| expense.id() == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn fresh_id(&mut self) -> Uuid {
        loop {
            let candidate = Uuid::new_v4();
            if self.issued.insert(candidate) {
                return candidate;
            }
        }
    }
}
