//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`Validation`] thrown on a missing or invalid required field.
//! - [`NotFound`] thrown when a referenced account/depot/trip/receivable is
//!   absent or inactive.
//! - [`InsufficientFunds`] thrown when a funding source cannot cover an
//!   outgoing movement; carries the available and required amounts so callers
//!   can display an actionable message without re-querying.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`NotFound`]: EngineError::NotFound
//!  [`InsufficientFunds`]: EngineError::InsufficientFunds
use sea_orm::DbErr;
use thiserror::Error;

use crate::Money;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("Insufficient funds: available {available}, required {required}")]
    InsufficientFunds { available: Money, required: Money },
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),
    #[error(transparent)]
    Database(DbErr),
}

impl From<DbErr> for EngineError {
    /// Classifies storage errors: a missing table/column is surfaced as
    /// [`EngineError::SchemaMismatch`] so read paths can degrade to empty
    /// results while write paths fail hard.
    fn from(err: DbErr) -> Self {
        let message = err.to_string();
        if message.contains("no such table") || message.contains("no such column") {
            Self::SchemaMismatch(message)
        } else {
            Self::Database(err)
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (
                Self::InsufficientFunds {
                    available: a1,
                    required: r1,
                },
                Self::InsufficientFunds {
                    available: a2,
                    required: r2,
                },
            ) => a1 == a2 && r1 == r2,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::SchemaMismatch(a), Self::SchemaMismatch(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
