use sea_orm::{DatabaseConnection, DatabaseTransaction, prelude::*};
use uuid::Uuid;

use crate::{Account, Depot, EngineError, ResultEngine, Trip, accounts, depots, trips};

mod allocation;
mod balances;
mod completion;
mod ledger;
mod record;
mod reversal;
mod stores;

pub use record::RecordOutcome;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Loads an account that exists and is active, or fails with `NotFound`.
async fn require_account(db_tx: &DatabaseTransaction, id: Uuid) -> ResultEngine<Account> {
    accounts::Entity::find_by_id(id.to_string())
        .filter(accounts::Column::Active.eq(true))
        .one(db_tx)
        .await?
        .ok_or_else(|| EngineError::NotFound("account".to_string()))?
        .try_into()
}

async fn require_depot(db_tx: &DatabaseTransaction, id: Uuid) -> ResultEngine<Depot> {
    depots::Entity::find_by_id(id.to_string())
        .filter(depots::Column::Active.eq(true))
        .one(db_tx)
        .await?
        .ok_or_else(|| EngineError::NotFound("depot".to_string()))?
        .try_into()
}

async fn require_trip(db_tx: &DatabaseTransaction, id: Uuid) -> ResultEngine<Trip> {
    trips::Entity::find_by_id(id.to_string())
        .filter(trips::Column::Active.eq(true))
        .one(db_tx)
        .await?
        .ok_or_else(|| EngineError::NotFound("trip".to_string()))?
        .try_into()
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
