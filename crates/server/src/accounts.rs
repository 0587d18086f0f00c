//! Bank account API endpoints.

use api_types::{
    Created,
    account::{AccountNew, AccountView},
    ledger::LedgerView,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{LedgerKind, Money};
use uuid::Uuid;

use crate::{ServerError, ledger_view, server::ServerState};

pub async fn account_new(
    State(state): State<ServerState>,
    Json(payload): Json<AccountNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let opening = Money::new(payload.opening_balance.unwrap_or(0));
    let id = state.engine.new_account(&payload.name, opening).await?;

    Ok((
        StatusCode::CREATED,
        Json(Created {
            message: "account created".to_string(),
            id,
        }),
    ))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<AccountView>>, ServerError> {
    let accounts = state.engine.accounts().await?;
    let views = accounts
        .into_iter()
        .map(|account| AccountView {
            id: account.id,
            name: account.name,
            balance: account.balance.minor(),
        })
        .collect();

    Ok(Json(views))
}

pub async fn ledger(
    State(state): State<ServerState>,
    Path(account_id): Path<Uuid>,
) -> Result<Json<LedgerView>, ServerError> {
    let account = state.engine.account(account_id).await?;
    let entries = state
        .engine
        .ledger_entries(LedgerKind::Bank, &account_id.to_string())
        .await?;

    Ok(Json(ledger_view(
        account_id.to_string(),
        account.balance,
        entries,
    )))
}
