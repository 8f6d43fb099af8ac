use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::allocation::allocate;
use crate::schemas::{Expense, UserNick};

/// Per-person ledgers, in the order people first show up.
pub type Breakdown = IndexMap<UserNick, PersonLedger>;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LedgerItem {
    pub label: String,
    pub location: String,
    /// The person's part of the item price, before tax and tip.
    pub cost: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonLedger {
    pub items: Vec<LedgerItem>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub tip: Decimal,
    pub grand_total: Decimal,
}

impl PersonLedger {
    /// Tax and tip together.
    pub fn extras(&self) -> Decimal {
        self.tax + self.tip
    }
}

/// Builds what every consumer owes for their part of `expenses`,
/// regardless of who paid.
pub fn compute_breakdown(expenses: &[Expense]) -> Breakdown {
    let mut breakdown = Breakdown::new();

    for expense in expenses {
        if let Err(err) = expense.validate() {
            tracing::warn!(id = %expense.id, "skipping expense in breakdown: {err}");
            continue;
        }
        let Ok(share) = allocate(expense) else {
            continue;
        };

        for person in &expense.involved {
            let ledger = breakdown.entry(person.clone()).or_default();
            ledger.items.push(LedgerItem {
                label: expense.label.clone(),
                location: expense.location.clone(),
                cost: share.subtotal,
            });
            ledger.subtotal += share.subtotal;
            ledger.tax += share.tax;
            ledger.tip += share.tip;
            ledger.grand_total += share.total;
        }
    }

    tracing::debug!(people = breakdown.len(), "computed breakdown");
    breakdown
}

/// Same as [`compute_breakdown`] but only for the lines of one receipt.
pub fn compute_location_breakdown(expenses: &[Expense], location: &str) -> Breakdown {
    let lines: Vec<Expense> = expenses
        .iter()
        .filter(|expense| expense.location == location)
        .cloned()
        .collect();
    compute_breakdown(&lines)
}
