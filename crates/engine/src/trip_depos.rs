//! Trip×depot receivables.

use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

/// What a depot owes the company for one trip's delivery.
///
/// `paid_amount` only ever grows through FIFO allocation of recoveries and
/// shrinks through their reversal; it is never edited directly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TripDepo {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub depot_id: Uuid,
    pub payable_amount: Money,
    pub paid_amount: Money,
    pub active: bool,
}

impl TripDepo {
    pub fn new(trip_id: Uuid, depot_id: Uuid, payable_amount: Money) -> ResultEngine<Self> {
        if payable_amount.is_negative() {
            return Err(EngineError::Validation(
                "payable amount must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            trip_id,
            depot_id,
            payable_amount,
            paid_amount: Money::ZERO,
            active: true,
        })
    }

    #[must_use]
    pub fn remaining(&self) -> Money {
        self.payable_amount - self.paid_amount
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trip_depos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub trip_id: String,
    pub depot_id: String,
    pub payable_amount: i64,
    pub paid_amount: i64,
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

impl From<&TripDepo> for ActiveModel {
    fn from(td: &TripDepo) -> Self {
        Self {
            id: ActiveValue::Set(td.id.to_string()),
            trip_id: ActiveValue::Set(td.trip_id.to_string()),
            depot_id: ActiveValue::Set(td.depot_id.to_string()),
            payable_amount: ActiveValue::Set(td.payable_amount.minor()),
            paid_amount: ActiveValue::Set(td.paid_amount.minor()),
            active: ActiveValue::Set(td.active),
        }
    }
}

impl TryFrom<Model> for TripDepo {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("trip depot".to_string()))?,
            trip_id: Uuid::parse_str(&model.trip_id)
                .map_err(|_| EngineError::NotFound("trip".to_string()))?,
            depot_id: Uuid::parse_str(&model.depot_id)
                .map_err(|_| EngineError::NotFound("depot".to_string()))?,
            payable_amount: Money::new(model.payable_amount),
            paid_amount: Money::new(model.paid_amount),
            active: model.active,
        })
    }
}
