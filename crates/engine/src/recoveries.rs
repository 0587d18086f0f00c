//! Recoveries: money coming back from clients, the trigger for FIFO
//! settlement of client receivables.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

/// Money recovered from a client.
///
/// When `depot_id` is set the client paid the depot directly: the amount is
/// recorded on the depot's pool ledger and never enters bank or cash, so no
/// transaction row exists for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recovery {
    pub id: Uuid,
    pub client_ref: String,
    pub amount: Money,
    pub depot_id: Option<Uuid>,
    pub payment_mode: Option<String>,
    pub reference_no: Option<String>,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub active: bool,
}

impl Recovery {
    pub fn new(client_ref: String, amount: Money, occurred_at: DateTime<Utc>) -> ResultEngine<Self> {
        if client_ref.trim().is_empty() {
            return Err(EngineError::Validation(
                "client reference must not be empty".to_string(),
            ));
        }
        if !amount.is_positive() {
            return Err(EngineError::Validation(
                "recovery amount must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            client_ref,
            amount,
            depot_id: None,
            payment_mode: None,
            reference_no: None,
            note: None,
            occurred_at,
            active: true,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recoveries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub client_ref: String,
    pub amount: i64,
    pub depot_id: Option<String>,
    pub payment_mode: Option<String>,
    pub reference_no: Option<String>,
    pub note: Option<String>,
    pub occurred_at: DateTimeUtc,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Recovery> for ActiveModel {
    fn from(recovery: &Recovery) -> Self {
        Self {
            id: ActiveValue::Set(recovery.id.to_string()),
            client_ref: ActiveValue::Set(recovery.client_ref.clone()),
            amount: ActiveValue::Set(recovery.amount.minor()),
            depot_id: ActiveValue::Set(recovery.depot_id.map(|id| id.to_string())),
            payment_mode: ActiveValue::Set(recovery.payment_mode.clone()),
            reference_no: ActiveValue::Set(recovery.reference_no.clone()),
            note: ActiveValue::Set(recovery.note.clone()),
            occurred_at: ActiveValue::Set(recovery.occurred_at),
            active: ActiveValue::Set(recovery.active),
        }
    }
}

impl TryFrom<Model> for Recovery {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("recovery".to_string()))?,
            client_ref: model.client_ref,
            amount: Money::new(model.amount),
            depot_id: model.depot_id.and_then(|s| Uuid::parse_str(&s).ok()),
            payment_mode: model.payment_mode,
            reference_no: model.reference_no,
            note: model.note,
            occurred_at: model.occurred_at,
            active: model.active,
        })
    }
}
