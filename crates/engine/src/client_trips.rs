//! Trip×client receivables.

use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

/// What a client owes the company for fuel delivered on one trip.
///
/// Clients are external parties identified by a free-form reference, not a
/// managed entity, so `client_ref` is a plain string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientTrip {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub client_ref: String,
    pub total_amount: Money,
    pub amount_collected: Money,
    pub active: bool,
}

impl ClientTrip {
    pub fn new(trip_id: Uuid, client_ref: String, total_amount: Money) -> ResultEngine<Self> {
        if client_ref.trim().is_empty() {
            return Err(EngineError::Validation(
                "client reference must not be empty".to_string(),
            ));
        }
        if total_amount.is_negative() {
            return Err(EngineError::Validation(
                "total amount must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            trip_id,
            client_ref,
            total_amount,
            amount_collected: Money::ZERO,
            active: true,
        })
    }

    #[must_use]
    pub fn remaining(&self) -> Money {
        self.total_amount - self.amount_collected
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "client_trips")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub trip_id: String,
    pub client_ref: String,
    pub total_amount: i64,
    pub amount_collected: i64,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::trips::Entity",
        from = "Column::TripId",
        to = "super::trips::Column::Id"
    )]
    Trip,
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trip.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&ClientTrip> for ActiveModel {
    fn from(ct: &ClientTrip) -> Self {
        Self {
            id: ActiveValue::Set(ct.id.to_string()),
            trip_id: ActiveValue::Set(ct.trip_id.to_string()),
            client_ref: ActiveValue::Set(ct.client_ref.clone()),
            total_amount: ActiveValue::Set(ct.total_amount.minor()),
            amount_collected: ActiveValue::Set(ct.amount_collected.minor()),
            active: ActiveValue::Set(ct.active),
        }
    }
}

impl TryFrom<Model> for ClientTrip {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("client trip".to_string()))?,
            trip_id: Uuid::parse_str(&model.trip_id)
                .map_err(|_| EngineError::NotFound("trip".to_string()))?,
            client_ref: model.client_ref,
            total_amount: Money::new(model.total_amount),
            amount_collected: Money::new(model.amount_collected),
            active: model.active,
        })
    }
}
