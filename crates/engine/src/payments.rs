//! Payments made to depots, the trigger for FIFO receivable settlement.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payment {
    pub id: Uuid,
    pub depot_id: Uuid,
    pub amount: Money,
    pub payment_mode: Option<String>,
    pub reference_no: Option<String>,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub active: bool,
}

impl Payment {
    pub fn new(depot_id: Uuid, amount: Money, occurred_at: DateTime<Utc>) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::Validation(
                "payment amount must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            depot_id,
            amount,
            payment_mode: None,
            reference_no: None,
            note: None,
            occurred_at,
            active: true,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub depot_id: String,
    pub amount: i64,
    pub payment_mode: Option<String>,
    pub reference_no: Option<String>,
    pub note: Option<String>,
    pub occurred_at: DateTimeUtc,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::depots::Entity",
        from = "Column::DepotId",
        to = "super::depots::Column::Id"
    )]
    Depot,
}

impl Related<super::depots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Depot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Payment> for ActiveModel {
    fn from(payment: &Payment) -> Self {
        Self {
            id: ActiveValue::Set(payment.id.to_string()),
            depot_id: ActiveValue::Set(payment.depot_id.to_string()),
            amount: ActiveValue::Set(payment.amount.minor()),
            payment_mode: ActiveValue::Set(payment.payment_mode.clone()),
            reference_no: ActiveValue::Set(payment.reference_no.clone()),
            note: ActiveValue::Set(payment.note.clone()),
            occurred_at: ActiveValue::Set(payment.occurred_at),
            active: ActiveValue::Set(payment.active),
        }
    }
}

impl TryFrom<Model> for Payment {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("payment".to_string()))?,
            depot_id: Uuid::parse_str(&model.depot_id)
                .map_err(|_| EngineError::NotFound("depot".to_string()))?,
            amount: Money::new(model.amount),
            payment_mode: model.payment_mode,
            reference_no: model.reference_no,
            note: model.note,
            occurred_at: model.occurred_at,
            active: model.active,
        })
    }
}
