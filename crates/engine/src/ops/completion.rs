//! Trip completion monitoring.

use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{ResultEngine, Trip, TripDepo, TripStatus, trip_depos, trips};

use super::{Engine, with_tx};

async fn all_depot_receivables_paid(
    db_tx: &DatabaseTransaction,
    trip_id: Uuid,
) -> ResultEngine<bool> {
    let models = trip_depos::Entity::find()
        .filter(trip_depos::Column::TripId.eq(trip_id.to_string()))
        .filter(trip_depos::Column::Active.eq(true))
        .all(db_tx)
        .await?;
    for model in models {
        let row = TripDepo::try_from(model)?;
        if row.remaining().is_positive() {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Marks a trip Completed when every active trip×depot receivable is fully
/// paid and its fuel is settled. Idempotent; never touches a Completed or
/// Cancelled trip. Returns whether the trip transitioned.
pub(super) async fn maybe_complete_trip(
    db_tx: &DatabaseTransaction,
    trip_id: Uuid,
) -> ResultEngine<bool> {
    let trip = super::require_trip(db_tx, trip_id).await?;
    if trip.status != TripStatus::Open {
        return Ok(false);
    }
    if !all_depot_receivables_paid(db_tx, trip_id).await? || !trip.fuel_settled() {
        return Ok(false);
    }

    let patch = trips::ActiveModel {
        id: ActiveValue::Set(trip_id.to_string()),
        status: ActiveValue::Set(TripStatus::Completed.as_str().to_string()),
        completed_at: ActiveValue::Set(Some(Utc::now())),
        ..Default::default()
    };
    patch.update(db_tx).await?;
    Ok(true)
}

/// Best-effort completion check: a missed completion is not fatal to the
/// operation that triggered it, so failures are logged and swallowed.
pub(super) async fn try_complete_trip(db_tx: &DatabaseTransaction, trip_id: Uuid) {
    if let Err(err) = maybe_complete_trip(db_tx, trip_id).await {
        tracing::warn!(%trip_id, error = %err, "trip completion check failed");
    }
}

/// Reopens a Completed trip whose receivables are no longer fully paid,
/// e.g. after a reversal restored an outstanding balance.
pub(super) async fn maybe_reopen_trip(
    db_tx: &DatabaseTransaction,
    trip_id: Uuid,
) -> ResultEngine<bool> {
    let trip: Trip = super::require_trip(db_tx, trip_id).await?;
    if trip.status != TripStatus::Completed {
        return Ok(false);
    }
    if all_depot_receivables_paid(db_tx, trip_id).await? {
        return Ok(false);
    }

    let patch = trips::ActiveModel {
        id: ActiveValue::Set(trip_id.to_string()),
        status: ActiveValue::Set(TripStatus::Open.as_str().to_string()),
        completed_at: ActiveValue::Set(None),
        ..Default::default()
    };
    patch.update(db_tx).await?;
    Ok(true)
}

impl Engine {
    /// Runs the completion check for one trip outside any other operation.
    pub async fn complete_trip_if_settled(&self, trip_id: Uuid) -> ResultEngine<bool> {
        with_tx!(self, |db_tx| {
            maybe_complete_trip(&db_tx, trip_id).await
        })
    }
}
