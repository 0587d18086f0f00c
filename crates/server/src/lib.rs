use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use server::{run, run_with_listener, spawn_with_listener};

mod accounts;
mod cash;
mod depots;
mod expenses;
mod payments;
mod recoveries;
mod server;
mod transactions;
mod trips;

pub mod types {
    pub mod account {
        pub use api_types::account::{AccountNew, AccountView};
    }

    pub mod depot {
        pub use api_types::depot::{DepotNew, DepotView};
    }

    pub mod trip {
        pub use api_types::trip::{
            ClientTripNew, FuelSold, ReceivableView, TripDepotNew, TripNew, TripView,
        };
    }

    pub mod movement {
        pub use api_types::movement::{
            ExpenseNew, MovementCreated, PaymentNew, RecoveryNew, VehicleMovementNew,
        };
    }

    pub mod ledger {
        pub use api_types::ledger::{LedgerEntryView, LedgerView};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

fn funding_source(funding: api_types::Funding) -> engine::FundingSource {
    match funding {
        api_types::Funding::Bank(id) => engine::FundingSource::Bank(id),
        api_types::Funding::Cash => engine::FundingSource::Cash,
        api_types::Funding::Depot(id) => engine::FundingSource::Depot(id),
    }
}

fn ledger_view(
    owner_id: String,
    balance: engine::Money,
    entries: Vec<engine::LedgerEntry>,
) -> api_types::ledger::LedgerView {
    api_types::ledger::LedgerView {
        owner_id,
        balance: balance.minor(),
        entries: entries
            .into_iter()
            .map(|entry| api_types::ledger::LedgerEntryView {
                id: entry.id,
                debit: entry.debit.minor(),
                credit: entry.credit.minor(),
                running_balance: entry.running_balance.minor(),
                occurred_at: entry.occurred_at,
                note: entry.note,
            })
            .collect(),
    }
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) | EngineError::InsufficientFunds { .. } => {
            StatusCode::BAD_REQUEST
        }
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Conflict(_) => StatusCode::CONFLICT,
        EngineError::SchemaMismatch(_) | EngineError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::SchemaMismatch(detail) => {
            tracing::error!("schema mismatch on write path: {detail}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        let body = api_types::Failure {
            message: "request failed".to_string(),
            error,
        };
        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::Money;

    #[test]
    fn engine_validation_maps_to_400() {
        let res =
            ServerError::from(EngineError::Validation("bad amount".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn engine_insufficient_funds_maps_to_400() {
        let res = ServerError::from(EngineError::InsufficientFunds {
            available: Money::new(40),
            required: Money::new(100),
        })
        .into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::NotFound("depot".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::Conflict("duplicate".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_schema_mismatch_maps_to_500() {
        let res = ServerError::from(EngineError::SchemaMismatch("no such table".to_string()))
            .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
