//! The module contains the `Depot` struct and its implementation.

use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, Money};

/// A fuel depot.
///
/// `balance` is a cached projection of the depot's POOL ledger (the latest
/// running balance of its pool rows). Every pool mutation refreshes it,
/// including depot-direct recoveries, so the column and the ledger never
/// diverge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Depot {
    pub id: Uuid,
    pub name: String,
    pub balance: Money,
    pub active: bool,
}

impl Depot {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            balance: Money::ZERO,
            active: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "depots")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub balance: i64,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Depot> for ActiveModel {
    fn from(depot: &Depot) -> Self {
        Self {
            id: ActiveValue::Set(depot.id.to_string()),
            name: ActiveValue::Set(depot.name.clone()),
            balance: ActiveValue::Set(depot.balance.minor()),
            active: ActiveValue::Set(depot.active),
        }
    }
}

impl TryFrom<Model> for Depot {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("depot".to_string()))?,
            name: model.name,
            balance: Money::new(model.balance),
            active: model.active,
        })
    }
}
