//! Trip API endpoints.

use api_types::{
    Acknowledged, Created,
    trip::{ClientTripNew, FuelSold, TripDepotNew, TripNew, TripView},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Money, Trip};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn trip_view(trip: Trip) -> TripView {
    TripView {
        id: trip.id,
        start_date: trip.start_date,
        status: trip.status.as_str().to_string(),
        paid: trip.paid.minor(),
        amount_collected: trip.amount_collected.minor(),
        fuel_assigned: trip.fuel_assigned,
        fuel_sold: trip.fuel_sold,
        completed_at: trip.completed_at,
    }
}

pub async fn trip_new(
    State(state): State<ServerState>,
    Json(payload): Json<TripNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let id = state
        .engine
        .new_trip(payload.start_date, payload.fuel_assigned.unwrap_or(0))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Created {
            message: "trip created".to_string(),
            id,
        }),
    ))
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<TripView>>, ServerError> {
    let trips = state.engine.trips().await?;
    Ok(Json(trips.into_iter().map(trip_view).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<TripView>, ServerError> {
    let trip = state.engine.trip(trip_id).await?;
    Ok(Json(trip_view(trip)))
}

pub async fn trip_depot_new(
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
    Json(payload): Json<TripDepotNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let id = state
        .engine
        .add_trip_depot(trip_id, payload.depot_id, Money::new(payload.payable_amount))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Created {
            message: "trip receivable created".to_string(),
            id,
        }),
    ))
}

pub async fn client_trip_new(
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
    Json(payload): Json<ClientTripNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let id = state
        .engine
        .add_client_trip(
            trip_id,
            &payload.client_ref,
            Money::new(payload.total_amount),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Created {
            message: "client receivable created".to_string(),
            id,
        }),
    ))
}

pub async fn fuel_sold(
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
    Json(payload): Json<FuelSold>,
) -> Result<Json<Acknowledged>, ServerError> {
    state.engine.set_fuel_sold(trip_id, payload.fuel_sold).await?;

    Ok(Json(Acknowledged {
        message: "fuel sold updated".to_string(),
    }))
}
