//! The ledger and balance-reconciliation engine.
//!
//! Tracks money movement across bank accounts, the single shared
//! cash-in-hand ledger, and per-depot pool balances, and reconciles them
//! against trip receivables with oldest-first allocation. All writes go
//! through [`Engine`]; every business action is one unit of work.

pub use accounts::Account;
pub use allocator::{Allocation, allocate};
pub use client_trips::ClientTrip;
pub use commands::{
    ExpenseCmd, FundingSource, PaymentToDepotCmd, RecoveryCmd, TxMeta, VehicleExpenseCmd,
    VehicleRentCmd,
};
pub use depots::Depot;
pub use error::EngineError;
pub use expenses::{Expense, ExpenseKind};
pub use ledger::{CASH_OWNER_ID, LedgerEntry, LedgerKind};
pub use money::Money;
pub use ops::{Engine, EngineBuilder, RecordOutcome};
pub use payments::Payment;
pub use receivables::OpenReceivable;
pub use recoveries::Recovery;
pub use transactions::{Transaction, TransactionPurpose};
pub use trip_depos::TripDepo;
pub use trips::{Trip, TripStatus};

mod accounts;
mod allocator;
mod client_trips;
mod commands;
mod depots;
mod error;
mod expenses;
mod ledger;
mod money;
mod ops;
mod payments;
mod receivables;
mod recoveries;
mod transactions;
mod trip_depos;
mod trips;

pub type ResultEngine<T> = Result<T, EngineError>;
