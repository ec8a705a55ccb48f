//! The transaction ledger: the models for income and expense events and the
//! store that reads and writes them in the remote `transactions` table.

mod postgrest;
mod stats;
mod store;
mod table;
mod transaction;

#[cfg(test)]
pub(crate) mod memory;

pub use postgrest::PostgrestTable;
pub use stats::LedgerStats;
pub use store::{LedgerStore, TRANSACTIONS_TABLE};
pub use table::{Filter, Operator, Order, Row, TableQuery, TableService};
pub use transaction::{
    DEFAULT_COMMISSION_PERCENT, NewTransaction, Transaction, TransactionBuilder, TransactionId,
    TransactionPatch, TransactionType, commission_amount, treasury_impact,
};
