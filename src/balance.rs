use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::schemas::{Expense, UserNick};

/// Net balance per person: what they paid minus what they consumed.
/// Positive means the group owes them money.
pub type Balances = IndexMap<UserNick, Decimal>;

pub fn compute_balances(expenses: &[Expense]) -> Balances {
    let mut balance = Balances::new();
    for expense in expenses {
        if let Err(err) = expense.validate() {
            tracing::warn!(id = %expense.id, "skipping expense in balances: {err}");
            continue;
        }
        let amount = expense.amount;
        *balance.entry(expense.payer.clone()).or_default() += amount;

        let amount_per_receiver = amount / Decimal::from(expense.involved.len());
        for receiver in &expense.involved {
            *balance.entry(receiver.clone()).or_default() -= amount_per_receiver;
        }
    }
    balance
}
