use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::money::MAX_AMOUNT;
use crate::schemas::{Expense, UserNick};

/// Tax or tip, either as a fixed amount or as a percentage of the subtotal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum Charge {
    Amount(Decimal),
    Percent(Decimal),
}

impl Default for Charge {
    fn default() -> Self {
        Charge::Amount(Decimal::ZERO)
    }
}

impl Charge {
    /// `None` when a percentage of `subtotal` doesn't fit in a `Decimal`.
    pub fn resolve(self, subtotal: Decimal) -> Option<Decimal> {
        match self {
            Charge::Amount(amount) => Some(amount),
            Charge::Percent(percent) => subtotal
                .checked_mul(percent)
                .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptItem {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub consumers: Vec<UserNick>,
}

impl ReceiptItem {
    pub fn total_price(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(self.quantity)
    }
}

/// A receipt being filled in, before it is turned into trip expenses.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptDraft {
    pub location: String,
    pub payer: UserNick,
    pub items: Vec<ReceiptItem>,
    #[serde(default)]
    pub tax: Charge,
    #[serde(default)]
    pub tip: Charge,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReceiptError {
    #[error("receipt has no location")]
    MissingLocation,
    #[error("receipt has no payer")]
    MissingPayer,
    #[error("receipt has no items")]
    NoItems,
    #[error("item {0} has no name")]
    UnnamedItem(usize),
    #[error("nobody shares item {0:?}")]
    NoConsumers(String),
    #[error("item {0:?} has a negative price or quantity")]
    NegativePrice(String),
    #[error("tax and tip can't be negative")]
    NegativeCharge,
    #[error("receipt total is too large")]
    AmountTooLarge,
}

fn default_quantity() -> Decimal {
    Decimal::ONE
}

impl ReceiptDraft {
    pub fn subtotal(&self) -> Option<Decimal> {
        self.items.iter().try_fold(Decimal::ZERO, |subtotal, item| {
            subtotal.checked_add(item.total_price()?)
        })
    }

    fn validate(&self) -> Result<(), ReceiptError> {
        if self.location.trim().is_empty() {
            return Err(ReceiptError::MissingLocation);
        }
        if self.payer.trim().is_empty() {
            return Err(ReceiptError::MissingPayer);
        }
        if self.items.is_empty() {
            return Err(ReceiptError::NoItems);
        }
        for (index, item) in self.items.iter().enumerate() {
            if item.name.trim().is_empty() {
                return Err(ReceiptError::UnnamedItem(index));
            }
            if item.consumers.iter().all(|name| name.trim().is_empty()) {
                return Err(ReceiptError::NoConsumers(item.name.clone()));
            }
            if item.unit_price.is_sign_negative() || item.quantity.is_sign_negative() {
                return Err(ReceiptError::NegativePrice(item.name.clone()));
            }
        }
        Ok(())
    }

    /// Turns every item into an expense, spreading tax and tip over the
    /// items in proportion to their price.
    pub fn into_expenses(self) -> Result<Vec<Expense>, ReceiptError> {
        self.validate()?;

        let subtotal = self.subtotal().ok_or(ReceiptError::AmountTooLarge)?;
        let tax_total = self.tax.resolve(subtotal).ok_or(ReceiptError::AmountTooLarge)?;
        let tip_total = self.tip.resolve(subtotal).ok_or(ReceiptError::AmountTooLarge)?;
        if tax_total.is_sign_negative() || tip_total.is_sign_negative() {
            return Err(ReceiptError::NegativeCharge);
        }
        // Every item and share is bounded by the total once it fits.
        let total = subtotal
            .checked_add(tax_total)
            .and_then(|total| total.checked_add(tip_total))
            .filter(|total| *total <= MAX_AMOUNT)
            .ok_or(ReceiptError::AmountTooLarge)?;

        let (tax_rate, tip_rate) = if subtotal.is_zero() {
            (Decimal::ZERO, Decimal::ZERO)
        } else {
            (tax_total / subtotal, tip_total / subtotal)
        };
        tracing::debug!(
            location = %self.location,
            items = self.items.len(),
            %subtotal,
            %tax_total,
            %tip_total,
            %total,
            "building receipt lines"
        );

        let expenses = self
            .items
            .into_iter()
            .map(|item| {
                let original_price = item.unit_price * item.quantity;
                let tax_share = original_price * tax_rate;
                let tip_share = original_price * tip_rate;
                let involved = item
                    .consumers
                    .into_iter()
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty())
                    .collect();

                Expense {
                    id: Uuid::new_v4().to_string(),
                    label: format!("{}x {}", item.quantity.normalize(), item.name),
                    location: self.location.clone(),
                    payer: self.payer.clone(),
                    amount: original_price + tax_share + tip_share,
                    involved,
                    raw_name: item.name,
                    raw_quantity: item.quantity,
                    raw_unit_price: item.unit_price,
                    original_price,
                    tax_share,
                    tip_share,
                }
            })
            .collect();
        Ok(expenses)
    }

    /// Rebuilds a one item draft from a saved line so it can be edited.
    /// The line's tax and tip come back as fixed amounts.
    pub fn from_expense(expense: &Expense) -> Self {
        let quantity = if expense.raw_quantity.is_zero() {
            Decimal::ONE
        } else {
            expense.raw_quantity
        };
        let name = if expense.raw_name.is_empty() {
            strip_quantity_prefix(&expense.label).to_string()
        } else {
            expense.raw_name.clone()
        };
        let unit_price = if expense.raw_unit_price.is_zero() {
            expense.original_price / quantity
        } else {
            expense.raw_unit_price
        };

        Self {
            location: expense.location.clone(),
            payer: expense.payer.clone(),
            items: vec![ReceiptItem {
                name,
                quantity,
                unit_price,
                consumers: expense.involved.clone(),
            }],
            tax: Charge::Amount(expense.tax_share),
            tip: Charge::Amount(expense.tip_share),
        }
    }
}

// "2x Burger" -> "Burger"
fn strip_quantity_prefix(label: &str) -> &str {
    match label.split_once("x ") {
        Some((quantity, name)) if !quantity.is_empty() && quantity.parse::<Decimal>().is_ok() => name,
        _ => label,
    }
}
