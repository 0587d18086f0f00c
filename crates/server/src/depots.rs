//! Depot API endpoints.

use api_types::{
    Created,
    depot::{DepotNew, DepotView},
    ledger::LedgerView,
    trip::ReceivableView,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{LedgerKind, Money};
use uuid::Uuid;

use crate::{ServerError, ledger_view, server::ServerState};

pub async fn depot_new(
    State(state): State<ServerState>,
    Json(payload): Json<DepotNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let seed = Money::new(payload.seed_balance.unwrap_or(0));
    let id = state.engine.new_depot(&payload.name, seed).await?;

    Ok((
        StatusCode::CREATED,
        Json(Created {
            message: "depot created".to_string(),
            id,
        }),
    ))
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<DepotView>>, ServerError> {
    let depots = state.engine.depots().await?;
    let views = depots
        .into_iter()
        .map(|depot| DepotView {
            id: depot.id,
            name: depot.name,
            balance: depot.balance.minor(),
        })
        .collect();

    Ok(Json(views))
}

pub async fn ledger(
    State(state): State<ServerState>,
    Path(depot_id): Path<Uuid>,
) -> Result<Json<LedgerView>, ServerError> {
    let depot = state.engine.depot(depot_id).await?;
    let entries = state
        .engine
        .ledger_entries(LedgerKind::Pool, &depot_id.to_string())
        .await?;

    Ok(Json(ledger_view(
        depot_id.to_string(),
        depot.balance,
        entries,
    )))
}

pub async fn receivables(
    State(state): State<ServerState>,
    Path(depot_id): Path<Uuid>,
) -> Result<Json<Vec<ReceivableView>>, ServerError> {
    let open = state.engine.open_depot_receivables(depot_id).await?;
    let views = open
        .into_iter()
        .map(|receivable| ReceivableView {
            id: receivable.id,
            trip_id: receivable.trip_id,
            payable: receivable.payable.minor(),
            paid: receivable.paid.minor(),
            remaining: receivable.remaining().minor(),
        })
        .collect();

    Ok(Json(views))
}
