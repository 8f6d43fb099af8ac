//! Splits trip expenses between the people who shared them and works out
//! who has to pay whom.

pub mod allocation;
pub mod balance;
pub mod breakdown;
pub mod error;
pub mod exchange;
pub mod money;
pub mod receipt;
pub mod routes;
pub mod schemas;
pub mod settings;
pub mod trip;

pub use allocation::{allocate, Share};
pub use balance::{compute_balances, Balances};
pub use breakdown::{compute_breakdown, compute_location_breakdown, Breakdown, LedgerItem, PersonLedger};
pub use exchange::{compute_settlement, Exchange, Settlement, SettlementStrategy, NO_DEBTS};
pub use receipt::{Charge, ReceiptDraft, ReceiptError, ReceiptItem};
pub use schemas::{Expense, ExpenseError, UserNick};
pub use trip::Trip;
