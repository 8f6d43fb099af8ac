use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::breakdown::{compute_breakdown, compute_location_breakdown, Breakdown};
use crate::exchange::{Settlement, SettlementStrategy};
use crate::receipt::{ReceiptDraft, ReceiptError};
use crate::schemas::Expense;

/// A named group of expenses. Receipts are not stored on their own, they
/// are the expenses sharing a `location`.
///
/// Every change builds a new expense list and swaps it in whole, so the
/// breakdown and settlement always run on a complete list.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Trip {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl Trip {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            expenses: Vec::new(),
        }
    }

    /// Distinct receipt locations, in the order they were added.
    pub fn locations(&self) -> Vec<&str> {
        self.expenses
            .iter()
            .map(|expense| expense.location.as_str())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn receipt<'a>(&'a self, location: &'a str) -> impl Iterator<Item = &'a Expense> + 'a {
        self.expenses
            .iter()
            .filter(move |expense| expense.location == location)
    }

    /// Replaces every line of the receipt at `location` with `lines`.
    pub fn replace_receipt(&mut self, location: &str, lines: Vec<Expense>) {
        let expenses = self
            .expenses
            .iter()
            .filter(|expense| expense.location != location)
            .cloned()
            .chain(lines)
            .collect();
        self.expenses = expenses;
    }

    /// Adds the lines of `draft` to the trip. When `replacing` names an
    /// existing line, that line is dropped first (it is being edited).
    ///
    /// Returns the ids of the new lines.
    pub fn save_receipt(
        &mut self,
        draft: ReceiptDraft,
        replacing: Option<&str>,
    ) -> Result<Vec<String>, ReceiptError> {
        let lines = draft.into_expenses()?;
        let ids = lines.iter().map(|line| line.id.clone()).collect();

        let expenses = self
            .expenses
            .iter()
            .filter(|expense| Some(expense.id.as_str()) != replacing)
            .cloned()
            .chain(lines)
            .collect();
        self.expenses = expenses;
        tracing::debug!(trip = %self.id, lines = self.expenses.len(), "saved receipt");
        Ok(ids)
    }

    pub fn remove_expense(&mut self, id: &str) -> Option<Expense> {
        let position = self.expenses.iter().position(|expense| expense.id == id)?;
        let mut expenses = self.expenses.clone();
        let removed = expenses.remove(position);
        self.expenses = expenses;
        Some(removed)
    }

    pub fn breakdown(&self) -> Breakdown {
        compute_breakdown(&self.expenses)
    }

    pub fn receipt_breakdown(&self, location: &str) -> Breakdown {
        compute_location_breakdown(&self.expenses, location)
    }

    pub fn settlement(&self, strategy: SettlementStrategy) -> Settlement {
        strategy.settle(&self.expenses)
    }
}
