use std::fmt;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::balance::compute_balances;
use crate::money::{format_currency, is_settled, SETTLEMENT_TOLERANCE};
use crate::schemas::{Expense, UserNick};

pub const NO_DEBTS: &str = "No debts found!";

#[derive(Clone, Debug)]
pub struct PersonalBalance {
    pub id: UserNick,
    /// Magnitude of what is still owed, or still to be received.
    pub balance: Decimal,
}

/// Ordered pair, `debtor` owes `creditor`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct UserPair {
    pub debtor: UserNick,
    pub creditor: UserNick,
}

impl UserPair {
    fn reversed(&self) -> Self {
        Self {
            debtor: self.creditor.clone(),
            creditor: self.debtor.clone(),
        }
    }
}

/// A single "X owes Y" instruction. `amount` keeps full precision, it is
/// only rounded when displayed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Exchange {
    pub debtor: UserNick,
    pub creditor: UserNick,
    pub amount: Decimal,
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} owes {} {}",
            self.debtor,
            self.creditor,
            format_currency(self.amount)
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Settlement {
    /// Never empty.
    Exchanges(Vec<Exchange>),
    NoDebts,
}

impl Settlement {
    fn from_exchanges(exchanges: Vec<Exchange>) -> Self {
        if exchanges.is_empty() {
            Settlement::NoDebts
        } else {
            Settlement::Exchanges(exchanges)
        }
    }

    pub fn exchanges(&self) -> &[Exchange] {
        match self {
            Settlement::Exchanges(exchanges) => exchanges,
            Settlement::NoDebts => &[],
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, Settlement::NoDebts)
    }

    /// Human readable instructions, or the single no-debts message.
    pub fn descriptions(&self) -> Vec<String> {
        match self {
            Settlement::Exchanges(exchanges) => {
                exchanges.iter().map(Exchange::to_string).collect()
            }
            Settlement::NoDebts => vec![NO_DEBTS.to_string()],
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStrategy {
    /// Match the largest debtors with the largest creditors. Fewest
    /// exchanges, but people may be asked to pay someone they never shared
    /// an expense with.
    #[default]
    NetBalance,
    /// Net what each pair of people owes each other. Every exchange maps to
    /// expenses the two actually shared.
    Pairwise,
}

impl SettlementStrategy {
    pub fn settle(self, expenses: &[Expense]) -> Settlement {
        let exchanges = match self {
            SettlementStrategy::NetBalance => get_simplified_exchanges(expenses),
            SettlementStrategy::Pairwise => get_pairwise_exchanges(expenses),
        };
        tracing::debug!(strategy = ?self, exchanges = exchanges.len(), "computed settlement");
        Settlement::from_exchanges(exchanges)
    }
}

impl fmt::Display for SettlementStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettlementStrategy::NetBalance => f.write_str("net_balance"),
            SettlementStrategy::Pairwise => f.write_str("pairwise"),
        }
    }
}

pub fn compute_settlement(expenses: &[Expense]) -> Settlement {
    SettlementStrategy::NetBalance.settle(expenses)
}

fn get_simplified_exchanges(expenses: &[Expense]) -> Vec<Exchange> {
    // Divide people into debtors and creditors, anyone within a cent of
    // zero is already settled
    let mut debtors = Vec::new();
    let mut creditors = Vec::new();

    for (id, balance) in compute_balances(expenses) {
        if is_settled(balance) {
            continue;
        }
        let person = PersonalBalance {
            id,
            balance: balance.abs(),
        };
        if balance.is_sign_negative() {
            debtors.push(person);
        } else {
            creditors.push(person);
        }
    }

    // Largest first. The sorts are stable so ties keep the order people
    // were first seen in.
    debtors.sort_by(|a, b| b.balance.cmp(&a.balance));
    creditors.sort_by(|a, b| b.balance.cmp(&a.balance));

    let mut exchanges = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < debtors.len() && j < creditors.len() {
        let debtor = &mut debtors[i];
        let creditor = &mut creditors[j];

        let amount = debtor.balance.min(creditor.balance);
        debtor.balance -= amount;
        creditor.balance -= amount;
        exchanges.push(Exchange {
            debtor: debtor.id.clone(),
            creditor: creditor.id.clone(),
            amount,
        });

        if is_settled(debtor.balance) {
            i += 1;
        }
        if is_settled(creditor.balance) {
            j += 1;
        }
    }
    exchanges
}

fn get_pairwise_exchanges(expenses: &[Expense]) -> Vec<Exchange> {
    let mut debts: IndexMap<UserPair, Decimal> = IndexMap::new();

    for expense in expenses {
        if let Err(err) = expense.validate() {
            tracing::warn!(id = %expense.id, "skipping expense in settlement: {err}");
            continue;
        }
        let amount = expense.amount / Decimal::from(expense.involved.len());
        for person in &expense.involved {
            if *person == expense.payer {
                continue;
            }
            let pair = UserPair {
                debtor: person.clone(),
                creditor: expense.payer.clone(),
            };
            add_debt(&mut debts, pair, amount);
        }
    }

    debts
        .into_iter()
        .filter(|(_, amount)| *amount > SETTLEMENT_TOLERANCE)
        .map(|(pair, amount)| Exchange {
            debtor: pair.debtor,
            creditor: pair.creditor,
            amount,
        })
        .collect()
}

// A new debt first cancels out whatever runs the other way between the
// same two people
fn add_debt(debts: &mut IndexMap<UserPair, Decimal>, pair: UserPair, amount: Decimal) {
    let reverse = pair.reversed();
    let Some(existing) = debts.get_mut(&reverse) else {
        *debts.entry(pair).or_default() += amount;
        return;
    };

    *existing -= amount;
    let remaining = *existing;
    if remaining.is_zero() {
        debts.shift_remove(&reverse);
    } else if remaining.is_sign_negative() {
        debts.shift_remove(&reverse);
        debts.insert(pair, -remaining);
    }
}
