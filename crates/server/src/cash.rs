//! Cash ledger and maintenance API endpoints.

use api_types::{Acknowledged, ledger::LedgerView};
use axum::{Json, extract::State};
use engine::CASH_OWNER_ID;

use crate::{ServerError, ledger_view, server::ServerState};

pub async fn ledger(State(state): State<ServerState>) -> Result<Json<LedgerView>, ServerError> {
    let balance = state.engine.cash_balance().await?;
    let entries = state.engine.cash_ledger().await?;

    Ok(Json(ledger_view(
        CASH_OWNER_ID.to_string(),
        balance,
        entries,
    )))
}

/// Rebuilds every ledger from its active entries and refreshes the cached
/// account and depot balances.
pub async fn recalculate_all(
    State(state): State<ServerState>,
) -> Result<Json<Acknowledged>, ServerError> {
    state.engine.recalculate_all().await?;

    Ok(Json(Acknowledged {
        message: "ledgers recalculated".to_string(),
    }))
}
