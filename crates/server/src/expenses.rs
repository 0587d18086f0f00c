//! Expense and vehicle-movement API endpoints.

use api_types::{
    Acknowledged,
    movement::{ExpenseNew, MovementCreated, VehicleMovementNew},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{ExpenseCmd, Money, RecordOutcome, VehicleExpenseCmd, VehicleRentCmd};
use uuid::Uuid;

use crate::{ServerError, funding_source, server::ServerState};

fn movement_created(message: &str, outcome: RecordOutcome) -> MovementCreated {
    MovementCreated {
        message: message.to_string(),
        id: outcome.source_id,
        transaction_ids: outcome.transaction_ids,
        ledger_entry_ids: outcome.ledger_entry_ids,
    }
}

pub async fn expense_new(
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<MovementCreated>), ServerError> {
    let occurred_at = payload.occurred_at.unwrap_or_else(Utc::now);
    let mut cmd = ExpenseCmd::new(
        funding_source(payload.funding),
        Money::new(payload.amount),
        occurred_at,
    );
    if let Some(category) = payload.category {
        cmd = cmd.category(category);
    }
    if let Some(depot_id) = payload.depot_id {
        cmd = cmd.depot_id(depot_id);
    }
    if let Some(trip_id) = payload.trip_id {
        cmd = cmd.trip_id(trip_id);
    }
    if let Some(note) = payload.note {
        cmd = cmd.note(note);
    }

    let outcome = state.engine.record_expense(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(movement_created("expense recorded", outcome)),
    ))
}

pub async fn vehicle_rent_new(
    State(state): State<ServerState>,
    Json(payload): Json<VehicleMovementNew>,
) -> Result<(StatusCode, Json<MovementCreated>), ServerError> {
    let occurred_at = payload.occurred_at.unwrap_or_else(Utc::now);
    let mut cmd = VehicleRentCmd::new(
        funding_source(payload.funding),
        payload.vehicle_ref,
        Money::new(payload.amount),
        occurred_at,
    );
    if let Some(trip_id) = payload.trip_id {
        cmd = cmd.trip_id(trip_id);
    }
    if let Some(note) = payload.note {
        cmd = cmd.note(note);
    }

    let outcome = state.engine.record_vehicle_rent(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(movement_created("vehicle rent recorded", outcome)),
    ))
}

pub async fn vehicle_expense_new(
    State(state): State<ServerState>,
    Json(payload): Json<VehicleMovementNew>,
) -> Result<(StatusCode, Json<MovementCreated>), ServerError> {
    let occurred_at = payload.occurred_at.unwrap_or_else(Utc::now);
    let mut cmd = VehicleExpenseCmd::new(
        funding_source(payload.funding),
        payload.vehicle_ref,
        Money::new(payload.amount),
        occurred_at,
    );
    if let Some(category) = payload.category {
        cmd = cmd.category(category);
    }
    if let Some(trip_id) = payload.trip_id {
        cmd = cmd.trip_id(trip_id);
    }
    if let Some(note) = payload.note {
        cmd = cmd.note(note);
    }

    let outcome = state.engine.record_vehicle_expense(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(movement_created("vehicle expense recorded", outcome)),
    ))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
) -> Result<Json<Acknowledged>, ServerError> {
    state.engine.reverse_expense(expense_id).await?;

    Ok(Json(Acknowledged {
        message: "expense reversed".to_string(),
    }))
}
