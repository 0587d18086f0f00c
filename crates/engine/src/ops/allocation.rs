//! Loading open receivables and applying allocation results.

use std::collections::HashMap;

use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    ClientTrip, EngineError, Money, ResultEngine, Trip, TripDepo, TripStatus, client_trips,
    receivables::{OpenReceivable, sort_fifo},
    trip_depos, trips,
};

/// Loads the trips backing a set of receivables, dropping receivables whose
/// trip is inactive or cancelled.
async fn trips_for(
    db_tx: &DatabaseTransaction,
    trip_ids: impl Iterator<Item = Uuid>,
) -> ResultEngine<HashMap<Uuid, Trip>> {
    let ids: Vec<String> = trip_ids.map(|id| id.to_string()).collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let models = trips::Entity::find()
        .filter(trips::Column::Id.is_in(ids))
        .filter(trips::Column::Active.eq(true))
        .all(db_tx)
        .await?;
    let mut out = HashMap::new();
    for model in models {
        let trip = Trip::try_from(model)?;
        if trip.status != TripStatus::Cancelled {
            out.insert(trip.id, trip);
        }
    }
    Ok(out)
}

/// Open trip×depot receivables for one depot, in FIFO settlement order.
pub(super) async fn open_depot_receivables(
    db_tx: &DatabaseTransaction,
    depot_id: Uuid,
) -> ResultEngine<Vec<OpenReceivable>> {
    let models = trip_depos::Entity::find()
        .filter(trip_depos::Column::DepotId.eq(depot_id.to_string()))
        .filter(trip_depos::Column::Active.eq(true))
        .all(db_tx)
        .await?;
    let rows: Vec<TripDepo> = models
        .into_iter()
        .map(TripDepo::try_from)
        .collect::<Result<_, _>>()?;

    let trips = trips_for(db_tx, rows.iter().map(|r| r.trip_id)).await?;
    let mut open = Vec::new();
    for row in rows {
        let Some(trip) = trips.get(&row.trip_id) else {
            continue;
        };
        if row.remaining().is_positive() {
            open.push(OpenReceivable {
                id: row.id,
                trip_id: row.trip_id,
                start_date: trip.start_date,
                payable: row.payable_amount,
                paid: row.paid_amount,
            });
        }
    }
    sort_fifo(&mut open);
    Ok(open)
}

/// Open trip×client receivables for one client, in FIFO settlement order.
pub(super) async fn open_client_receivables(
    db_tx: &DatabaseTransaction,
    client_ref: &str,
) -> ResultEngine<Vec<OpenReceivable>> {
    let models = client_trips::Entity::find()
        .filter(client_trips::Column::ClientRef.eq(client_ref))
        .filter(client_trips::Column::Active.eq(true))
        .all(db_tx)
        .await?;
    let rows: Vec<ClientTrip> = models
        .into_iter()
        .map(ClientTrip::try_from)
        .collect::<Result<_, _>>()?;

    let trips = trips_for(db_tx, rows.iter().map(|r| r.trip_id)).await?;
    let mut open = Vec::new();
    for row in rows {
        let Some(trip) = trips.get(&row.trip_id) else {
            continue;
        };
        if row.remaining().is_positive() {
            open.push(OpenReceivable {
                id: row.id,
                trip_id: row.trip_id,
                start_date: trip.start_date,
                payable: row.total_amount,
                paid: row.amount_collected,
            });
        }
    }
    sort_fifo(&mut open);
    Ok(open)
}

/// Moves one trip×depot receivable's paid amount by `delta` (positive when
/// settling, negative when reversing), clamping at the valid range.
pub(super) async fn shift_trip_depo_paid(
    db_tx: &DatabaseTransaction,
    receivable_id: Uuid,
    delta: Money,
) -> ResultEngine<TripDepo> {
    let model = trip_depos::Entity::find_by_id(receivable_id.to_string())
        .one(db_tx)
        .await?
        .ok_or_else(|| EngineError::NotFound("trip depot".to_string()))?;
    let mut row = TripDepo::try_from(model)?;
    let updated = (row.paid_amount + delta)
        .min(row.payable_amount)
        .max(Money::ZERO);
    row.paid_amount = updated;
    let patch = trip_depos::ActiveModel {
        id: ActiveValue::Set(row.id.to_string()),
        paid_amount: ActiveValue::Set(updated.minor()),
        ..Default::default()
    };
    patch.update(db_tx).await?;
    Ok(row)
}

/// Moves one trip×client receivable's collected amount by `delta`.
pub(super) async fn shift_client_trip_collected(
    db_tx: &DatabaseTransaction,
    receivable_id: Uuid,
    delta: Money,
) -> ResultEngine<ClientTrip> {
    let model = client_trips::Entity::find_by_id(receivable_id.to_string())
        .one(db_tx)
        .await?
        .ok_or_else(|| EngineError::NotFound("client trip".to_string()))?;
    let mut row = ClientTrip::try_from(model)?;
    let updated = (row.amount_collected + delta)
        .min(row.total_amount)
        .max(Money::ZERO);
    row.amount_collected = updated;
    let patch = client_trips::ActiveModel {
        id: ActiveValue::Set(row.id.to_string()),
        amount_collected: ActiveValue::Set(updated.minor()),
        ..Default::default()
    };
    patch.update(db_tx).await?;
    Ok(row)
}

/// Recomputes a trip's aggregated `paid` / `amount_collected` from the sum
/// of its own active receivables and persists them.
pub(super) async fn refresh_trip_totals(
    db_tx: &DatabaseTransaction,
    trip_id: Uuid,
) -> ResultEngine<()> {
    let depo_models = trip_depos::Entity::find()
        .filter(trip_depos::Column::TripId.eq(trip_id.to_string()))
        .filter(trip_depos::Column::Active.eq(true))
        .all(db_tx)
        .await?;
    let paid: Money = depo_models
        .into_iter()
        .map(|m| Money::new(m.paid_amount))
        .sum();

    let client_models = client_trips::Entity::find()
        .filter(client_trips::Column::TripId.eq(trip_id.to_string()))
        .filter(client_trips::Column::Active.eq(true))
        .all(db_tx)
        .await?;
    let collected: Money = client_models
        .into_iter()
        .map(|m| Money::new(m.amount_collected))
        .sum();

    let patch = trips::ActiveModel {
        id: ActiveValue::Set(trip_id.to_string()),
        paid: ActiveValue::Set(paid.minor()),
        amount_collected: ActiveValue::Set(collected.minor()),
        ..Default::default()
    };
    patch.update(db_tx).await?;
    Ok(())
}
