//! The module contains the `Account` struct and its implementation.

use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, Money};

/// A bank account.
///
/// `balance` is a cached projection of the account's BANK ledger: it is
/// rewritten from the ledger's latest running balance after every append or
/// recalculation and must never be adjusted by direct arithmetic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub balance: Money,
    pub active: bool,
}

impl Account {
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
#[sea_orm(table_name = "accounts")]
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

impl From<&Account> for ActiveModel {
    fn from(account: &Account) -> Self {
        Self {
            id: ActiveValue::Set(account.id.to_string()),
            name: ActiveValue::Set(account.name.clone()),
            balance: ActiveValue::Set(account.balance.minor()),
            active: ActiveValue::Set(account.active),
        }
    }
}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("account".to_string()))?,
            name: model.name,
            balance: Money::new(model.balance),
            active: model.active,
        })
    }
}
