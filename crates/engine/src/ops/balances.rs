//! Balance recalculation and the cached balance projections.

use sea_orm::{ActiveValue, DatabaseTransaction, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    LedgerKind, Money, ResultEngine, accounts, depots,
    ledger::CASH_OWNER_ID,
};

use super::{Engine, ledger, with_tx};

/// Rebuilds one ledger from history and refreshes the owning row's cached
/// balance column (bank accounts and depot pools carry one; cash does not).
pub(super) async fn recalculate_in(
    db_tx: &DatabaseTransaction,
    kind: LedgerKind,
    owner_id: &str,
) -> ResultEngine<Money> {
    let balance = ledger::rebuild(db_tx, kind, owner_id).await?;
    refresh_projection(db_tx, kind, owner_id, balance).await?;
    Ok(balance)
}

/// Writes a ledger's latest balance back into the cached column of its
/// owning row. The ledger is the source of truth; the column is only ever
/// rewritten wholesale, never adjusted by arithmetic.
pub(super) async fn refresh_projection(
    db_tx: &DatabaseTransaction,
    kind: LedgerKind,
    owner_id: &str,
    balance: Money,
) -> ResultEngine<()> {
    match kind {
        LedgerKind::Bank => {
            let patch = accounts::ActiveModel {
                id: ActiveValue::Set(owner_id.to_string()),
                balance: ActiveValue::Set(balance.minor()),
                ..Default::default()
            };
            patch.update(db_tx).await?;
        }
        LedgerKind::Pool => {
            let patch = depots::ActiveModel {
                id: ActiveValue::Set(owner_id.to_string()),
                balance: ActiveValue::Set(balance.minor()),
                ..Default::default()
            };
            patch.update(db_tx).await?;
        }
        LedgerKind::Cash => {}
    }
    Ok(())
}

impl Engine {
    /// Rebuilds one ledger's running balances from its full active history
    /// and refreshes the cached projection. Returns the final balance.
    pub async fn recalculate(&self, kind: LedgerKind, owner_id: &str) -> ResultEngine<Money> {
        with_tx!(self, |db_tx| {
            recalculate_in(&db_tx, kind, owner_id).await
        })
    }

    /// Current balance of a bank account's ledger.
    pub async fn account_balance(&self, account_id: Uuid) -> ResultEngine<Money> {
        with_tx!(self, |db_tx| {
            super::require_account(&db_tx, account_id).await?;
            ledger::current_balance(&db_tx, LedgerKind::Bank, &account_id.to_string()).await
        })
    }

    /// Current balance of the shared cash-in-hand ledger.
    pub async fn cash_balance(&self) -> ResultEngine<Money> {
        with_tx!(self, |db_tx| {
            ledger::current_balance(&db_tx, LedgerKind::Cash, CASH_OWNER_ID).await
        })
    }

    /// Current balance of a depot's pool ledger.
    pub async fn depot_balance(&self, depot_id: Uuid) -> ResultEngine<Money> {
        with_tx!(self, |db_tx| {
            super::require_depot(&db_tx, depot_id).await?;
            ledger::current_balance(&db_tx, LedgerKind::Pool, &depot_id.to_string()).await
        })
    }
}
