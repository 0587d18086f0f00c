//! Trip primitives.
//!
//! A trip carries fuel from the company to one or more depots; its
//! receivables (trip×depot and trip×client) are settled over time. The
//! `paid` / `amount_collected` columns are aggregates recomputed from the
//! trip's own receivables after every allocation or reversal.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Open,
    Completed,
    Cancelled,
}

impl TripStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<&str> for TripStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "open" => Ok(Self::Open),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(EngineError::Validation(format!(
                "invalid trip status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trip {
    pub id: Uuid,
    pub start_date: DateTime<Utc>,
    pub status: TripStatus,
    /// Sum of `paid_amount` over the trip's active trip×depot receivables.
    pub paid: Money,
    /// Sum of `amount_collected` over the trip's active trip×client
    /// receivables.
    pub amount_collected: Money,
    /// Fuel loaded for this trip, in litres. 0 means no fuel assigned.
    pub fuel_assigned: i64,
    /// Fuel sold so far, in litres.
    pub fuel_sold: i64,
    pub completed_at: Option<DateTime<Utc>>,
    pub active: bool,
}

impl Trip {
    pub fn new(start_date: DateTime<Utc>, fuel_assigned: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_date,
            status: TripStatus::Open,
            paid: Money::ZERO,
            amount_collected: Money::ZERO,
            fuel_assigned,
            fuel_sold: 0,
            completed_at: None,
            active: true,
        }
    }

    /// `true` when the trip either carries no fuel or all assigned fuel has
    /// a matching sold quantity.
    #[must_use]
    pub fn fuel_settled(&self) -> bool {
        self.fuel_assigned == 0 || self.fuel_sold >= self.fuel_assigned
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub start_date: DateTimeUtc,
    pub status: String,
    pub paid: i64,
    pub amount_collected: i64,
    pub fuel_assigned: i64,
    pub fuel_sold: i64,
    pub completed_at: Option<DateTimeUtc>,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::trip_depos::Entity")]
    TripDepos,
    #[sea_orm(has_many = "super::client_trips::Entity")]
    ClientTrips,
}

impl Related<super::trip_depos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TripDepos.def()
    }
}

impl Related<super::client_trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClientTrips.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Trip> for ActiveModel {
    fn from(trip: &Trip) -> Self {
        Self {
            id: ActiveValue::Set(trip.id.to_string()),
            start_date: ActiveValue::Set(trip.start_date),
            status: ActiveValue::Set(trip.status.as_str().to_string()),
            paid: ActiveValue::Set(trip.paid.minor()),
            amount_collected: ActiveValue::Set(trip.amount_collected.minor()),
            fuel_assigned: ActiveValue::Set(trip.fuel_assigned),
            fuel_sold: ActiveValue::Set(trip.fuel_sold),
            completed_at: ActiveValue::Set(trip.completed_at),
            active: ActiveValue::Set(trip.active),
        }
    }
}

impl TryFrom<Model> for Trip {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("trip".to_string()))?,
            start_date: model.start_date,
            status: TripStatus::try_from(model.status.as_str())?,
            paid: Money::new(model.paid),
            amount_collected: Money::new(model.amount_collected),
            fuel_assigned: model.fuel_assigned,
            fuel_sold: model.fuel_sold,
            completed_at: model.completed_at,
            active: model.active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuel_settled_when_no_fuel_assigned() {
        let trip = Trip::new(Utc::now(), 0);
        assert!(trip.fuel_settled());
    }

    #[test]
    fn fuel_settled_requires_sold_to_cover_assigned() {
        let mut trip = Trip::new(Utc::now(), 1000);
        assert!(!trip.fuel_settled());
        trip.fuel_sold = 999;
        assert!(!trip.fuel_settled());
        trip.fuel_sold = 1000;
        assert!(trip.fuel_settled());
    }
}
