use rust_decimal::Decimal;
use serde::Serialize;

use crate::schemas::{Expense, ExpenseError};

/// What each consumer of an expense is charged for it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Share {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub tip: Decimal,
    pub total: Decimal,
}

/// Splits an expense evenly between everyone in `involved`.
///
/// Nothing is rounded here, amounts are only rounded when displayed.
pub fn allocate(expense: &Expense) -> Result<Share, ExpenseError> {
    if expense.involved.is_empty() {
        return Err(ExpenseError::NoConsumers);
    }
    let consumers = Decimal::from(expense.involved.len());

    Ok(Share {
        subtotal: expense.original_price / consumers,
        tax: expense.tax_share / consumers,
        tip: expense.tip_share / consumers,
        total: expense.amount / consumers,
    })
}
