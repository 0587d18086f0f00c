//! Depot payment API endpoints.

use api_types::{
    Acknowledged,
    movement::{MovementCreated, PaymentNew},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{Money, PaymentToDepotCmd};
use uuid::Uuid;

use crate::{ServerError, funding_source, server::ServerState};

pub async fn payment_new(
    State(state): State<ServerState>,
    Json(payload): Json<PaymentNew>,
) -> Result<(StatusCode, Json<MovementCreated>), ServerError> {
    let occurred_at = payload.occurred_at.unwrap_or_else(Utc::now);
    let mut cmd = PaymentToDepotCmd::new(
        funding_source(payload.funding),
        payload.depot_id,
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

    let outcome = state.engine.record_payment_to_depot(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(MovementCreated {
            message: "payment recorded".to_string(),
            id: outcome.source_id,
            transaction_ids: outcome.transaction_ids,
            ledger_entry_ids: outcome.ledger_entry_ids,
        }),
    ))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(payment_id): Path<Uuid>,
) -> Result<Json<Acknowledged>, ServerError> {
    state.engine.reverse_payment(payment_id).await?;

    Ok(Json(Acknowledged {
        message: "payment reversed".to_string(),
    }))
}
