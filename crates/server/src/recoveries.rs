//! Client recovery API endpoints.

use api_types::{
    Acknowledged,
    movement::{MovementCreated, RecoveryNew},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{Money, RecoveryCmd};
use uuid::Uuid;

use crate::{ServerError, funding_source, server::ServerState};

pub async fn recovery_new(
    State(state): State<ServerState>,
    Json(payload): Json<RecoveryNew>,
) -> Result<(StatusCode, Json<MovementCreated>), ServerError> {
    let occurred_at = payload.occurred_at.unwrap_or_else(Utc::now);
    let mut cmd = RecoveryCmd::new(
        funding_source(payload.funding),
        payload.client_ref,
        Money::new(payload.amount),
        occurred_at,
    );
    if let Some(mode) = payload.payment_mode {
        cmd = cmd.payment_mode(mode);
    }
    if let Some(reference) = payload.reference_no {
        cmd = cmd.reference_no(reference);
    }
    if let Some(note) = payload.note {
        cmd = cmd.note(note);
    }

    let outcome = state.engine.record_recovery(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(MovementCreated {
            message: "recovery recorded".to_string(),
            id: outcome.source_id,
            transaction_ids: outcome.transaction_ids,
            ledger_entry_ids: outcome.ledger_entry_ids,
        }),
    ))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(recovery_id): Path<Uuid>,
) -> Result<Json<Acknowledged>, ServerError> {
    state.engine.reverse_recovery(recovery_id).await?;

    Ok(Json(Acknowledged {
        message: "recovery reversed".to_string(),
    }))
}
