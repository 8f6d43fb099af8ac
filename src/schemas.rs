use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::money::{MAX_AMOUNT, SETTLEMENT_TOLERANCE};

pub type UserNick = String;

/// One line of a receipt, with its share of the receipt's tax and tip
/// already folded into `amount`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(default, deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default, alias = "item")]
    pub label: String,
    #[serde(default)]
    pub location: String,
    pub payer: UserNick,
    pub amount: Decimal,
    pub involved: Vec<UserNick>,
    #[serde(default)]
    pub raw_name: String,
    #[serde(default = "default_quantity", alias = "rawQty")]
    pub raw_quantity: Decimal,
    #[serde(default)]
    pub raw_unit_price: Decimal,
    #[serde(default)]
    pub original_price: Decimal,
    #[serde(default)]
    pub tax_share: Decimal,
    #[serde(default)]
    pub tip_share: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ExpenseError {
    #[error("expense has no payer")]
    MissingPayer,
    #[error("expense is not shared by anyone")]
    NoConsumers,
    #[error("expense amount {0} is negative")]
    NegativeAmount(Decimal),
    #[error("expense amount {0} is too large")]
    AmountTooLarge(Decimal),
}

impl Expense {
    /// A bare expense carrying only what the settlement needs. The whole
    /// amount is treated as the item price.
    pub fn new(payer: impl Into<UserNick>, amount: Decimal, involved: Vec<UserNick>) -> Self {
        Self {
            id: String::new(),
            label: String::new(),
            location: String::new(),
            payer: payer.into(),
            amount,
            involved,
            raw_name: String::new(),
            raw_quantity: Decimal::ONE,
            raw_unit_price: amount,
            original_price: amount,
            tax_share: Decimal::ZERO,
            tip_share: Decimal::ZERO,
        }
    }

    pub fn validate(&self) -> Result<(), ExpenseError> {
        if self.payer.trim().is_empty() {
            return Err(ExpenseError::MissingPayer);
        }
        if self.involved.is_empty() {
            return Err(ExpenseError::NoConsumers);
        }
        if self.amount.is_sign_negative() && !self.amount.is_zero() {
            return Err(ExpenseError::NegativeAmount(self.amount));
        }
        let parts = [self.amount, self.original_price, self.tax_share, self.tip_share];
        if let Some(too_large) = parts.into_iter().find(|part| part.abs() > MAX_AMOUNT) {
            return Err(ExpenseError::AmountTooLarge(too_large));
        }
        Ok(())
    }

    /// Whether `amount` still matches the item price plus tax and tip.
    pub fn is_consistent(&self) -> bool {
        self.original_price
            .checked_add(self.tax_share)
            .and_then(|parts| parts.checked_add(self.tip_share))
            .and_then(|parts| self.amount.checked_sub(parts))
            .is_some_and(|difference| difference.abs() <= SETTLEMENT_TOLERANCE)
    }
}

fn default_quantity() -> Decimal {
    Decimal::ONE
}

// Older clients generated numeric ids, newer ones send strings
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(id) => Ok(id),
        serde_json::Value::Number(id) => Ok(id.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number id, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn accepts_minimal_backend_shape() {
        let expense: Expense =
            serde_json::from_str(r#"{"payer": "Alice", "amount": 90, "involved": ["Alice", "Bob"]}"#)
                .unwrap();
        assert_eq!(expense.payer, "Alice");
        assert_eq!(expense.amount, dec!(90));
        assert_eq!(expense.involved, vec!["Alice", "Bob"]);
        assert_eq!(expense.raw_quantity, Decimal::ONE);
        assert!(expense.id.is_empty());
    }

    #[test]
    fn accepts_full_trip_line() {
        let expense: Expense = serde_json::from_str(
            r#"{
                "id": 1712345678901.25,
                "item": "2x Burger",
                "location": "Diner",
                "payer": "Bob",
                "amount": 23,
                "involved": ["Alice", "Bob"],
                "rawName": "Burger",
                "rawQty": 2,
                "rawUnitPrice": 10,
                "originalPrice": 20,
                "taxShare": 1.5,
                "tipShare": 1.5
            }"#,
        )
        .unwrap();
        assert_eq!(expense.id, "1712345678901.25");
        assert_eq!(expense.label, "2x Burger");
        assert_eq!(expense.raw_quantity, dec!(2));
        assert_eq!(expense.tax_share, dec!(1.5));
        assert!(expense.is_consistent());
    }

    #[test]
    fn missing_amount_is_a_parse_error() {
        let result: Result<Expense, _> =
            serde_json::from_str(r#"{"payer": "Alice", "involved": ["Alice"]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_malformed_records() {
        let mut expense = Expense::new("Alice", dec!(10), vec!["Bob".to_string()]);
        assert_eq!(expense.validate(), Ok(()));

        expense.involved.clear();
        assert_eq!(expense.validate(), Err(ExpenseError::NoConsumers));

        expense.involved.push("Bob".to_string());
        expense.payer = "  ".to_string();
        assert_eq!(expense.validate(), Err(ExpenseError::MissingPayer));

        expense.payer = "Alice".to_string();
        expense.amount = dec!(-1);
        assert_eq!(expense.validate(), Err(ExpenseError::NegativeAmount(dec!(-1))));
    }

    #[test]
    fn validate_rejects_amounts_that_could_overflow() {
        let huge: Decimal = "50000000000000000000000000000".parse().unwrap();
        let expense = Expense::new("A", huge, vec!["B".to_string()]);
        assert_eq!(expense.validate(), Err(ExpenseError::AmountTooLarge(huge)));

        let mut expense = Expense::new("A", MAX_AMOUNT, vec!["B".to_string()]);
        assert_eq!(expense.validate(), Ok(()));

        expense.tax_share = -huge;
        assert_eq!(expense.validate(), Err(ExpenseError::AmountTooLarge(-huge)));
    }

    #[test]
    fn payer_does_not_have_to_consume() {
        let expense = Expense::new("Alice", dec!(10), vec!["Bob".to_string()]);
        assert!(expense.validate().is_ok());
    }
}
