//! Reversal of recorded movements.
//!
//! Reversal is the only deletion mode: the source row, its transactions and
//! its ledger entries are flagged inactive, receivable paid/collected
//! amounts are restored, and every touched ledger is rebuilt from history.
//! A trip completed by the reversed movement is reopened.

use std::collections::BTreeSet;

use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, LedgerEntry, LedgerKind, Payment, Recovery, ResultEngine, Transaction,
    client_trips, expenses, ledger, payments, recoveries, transactions, trip_depos,
};

use super::{Engine, allocation, balances, completion, with_tx};

/// Flags matching active ledger entries inactive and returns them.
async fn deactivate_entries(
    db_tx: &DatabaseTransaction,
    condition: sea_orm::Condition,
) -> ResultEngine<Vec<LedgerEntry>> {
    let models = ledger::Entity::find()
        .filter(ledger::Column::Active.eq(true))
        .filter(condition)
        .all(db_tx)
        .await?;
    let mut entries = Vec::new();
    for model in models {
        let entry = LedgerEntry::try_from(model)?;
        let patch = ledger::ActiveModel {
            id: ActiveValue::Set(entry.id.to_string()),
            active: ActiveValue::Set(false),
            ..Default::default()
        };
        patch.update(db_tx).await?;
        entries.push(entry);
    }
    Ok(entries)
}

/// Rebuilds every distinct ledger the deactivated entries belonged to,
/// refreshing cached balance projections along the way.
async fn rebuild_touched(
    db_tx: &DatabaseTransaction,
    entries: &[LedgerEntry],
) -> ResultEngine<()> {
    let mut touched: BTreeSet<(String, String)> = BTreeSet::new();
    for entry in entries {
        touched.insert((entry.kind.as_str().to_string(), entry.owner_id.clone()));
    }
    for (kind, owner_id) in touched {
        let kind = LedgerKind::try_from(kind.as_str())?;
        balances::recalculate_in(db_tx, kind, &owner_id).await?;
    }
    Ok(())
}

async fn active_transactions_for_source(
    db_tx: &DatabaseTransaction,
    source_id: Uuid,
) -> ResultEngine<Vec<Transaction>> {
    let models = transactions::Entity::find()
        .filter(transactions::Column::SourceId.eq(source_id.to_string()))
        .filter(transactions::Column::Active.eq(true))
        .all(db_tx)
        .await?;
    models.into_iter().map(Transaction::try_from).collect()
}

async fn deactivate_transaction(db_tx: &DatabaseTransaction, id: Uuid) -> ResultEngine<()> {
    let patch = transactions::ActiveModel {
        id: ActiveValue::Set(id.to_string()),
        active: ActiveValue::Set(false),
        ..Default::default()
    };
    patch.update(db_tx).await?;
    Ok(())
}

/// Restores the trips a reversal touched: re-aggregates their totals and
/// reopens any trip whose receivables are no longer fully settled.
async fn restore_trips(
    db_tx: &DatabaseTransaction,
    trip_ids: impl IntoIterator<Item = Uuid>,
) -> ResultEngine<()> {
    let unique: BTreeSet<Uuid> = trip_ids.into_iter().collect();
    for trip_id in unique {
        allocation::refresh_trip_totals(db_tx, trip_id).await?;
        completion::maybe_reopen_trip(db_tx, trip_id).await?;
    }
    Ok(())
}

impl Engine {
    /// Reverses an expense: the expense, its transaction, and its funding
    /// and pool entries go inactive, then the touched ledgers are rebuilt.
    pub async fn reverse_expense(&self, expense_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = expenses::Entity::find_by_id(expense_id.to_string())
                .filter(expenses::Column::Active.eq(true))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("expense".to_string()))?;
            let patch = expenses::ActiveModel {
                id: ActiveValue::Set(model.id),
                active: ActiveValue::Set(false),
                ..Default::default()
            };
            patch.update(&db_tx).await?;

            let txs = active_transactions_for_source(&db_tx, expense_id).await?;
            let mut tx_ids = Vec::new();
            for tx in &txs {
                deactivate_transaction(&db_tx, tx.id).await?;
                tx_ids.push(tx.id.to_string());
            }
            if !tx_ids.is_empty() {
                let entries = deactivate_entries(
                    &db_tx,
                    sea_orm::Condition::any().add(ledger::Column::TransactionId.is_in(tx_ids)),
                )
                .await?;
                rebuild_touched(&db_tx, &entries).await?;
            }
            Ok(())
        })
    }

    /// Reverses a depot payment, restoring every receivable it settled.
    pub async fn reverse_payment(&self, payment_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = payments::Entity::find_by_id(payment_id.to_string())
                .filter(payments::Column::Active.eq(true))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("payment".to_string()))?;
            let payment = Payment::try_from(model)?;
            let patch = payments::ActiveModel {
                id: ActiveValue::Set(payment.id.to_string()),
                active: ActiveValue::Set(false),
                ..Default::default()
            };
            patch.update(&db_tx).await?;

            // Each transaction carries the amount applied to one trip's
            // receivable; walk them to give the paid amounts back.
            let txs = active_transactions_for_source(&db_tx, payment_id).await?;
            let mut touched_trips = Vec::new();
            for tx in &txs {
                deactivate_transaction(&db_tx, tx.id).await?;
                let Some(trip_id) = tx.trip_id else {
                    continue;
                };
                let receivable = trip_depos::Entity::find()
                    .filter(trip_depos::Column::TripId.eq(trip_id.to_string()))
                    .filter(trip_depos::Column::DepotId.eq(payment.depot_id.to_string()))
                    .filter(trip_depos::Column::Active.eq(true))
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| EngineError::NotFound("trip depot".to_string()))?;
                let receivable_id = Uuid::parse_str(&receivable.id)
                    .map_err(|_| EngineError::NotFound("trip depot".to_string()))?;
                allocation::shift_trip_depo_paid(&db_tx, receivable_id, -tx.debit).await?;
                touched_trips.push(trip_id);
            }

            let entries = deactivate_entries(
                &db_tx,
                sea_orm::Condition::any()
                    .add(ledger::Column::PaymentId.eq(payment_id.to_string())),
            )
            .await?;
            rebuild_touched(&db_tx, &entries).await?;
            restore_trips(&db_tx, touched_trips).await?;
            Ok(())
        })
    }

    /// Reverses a recovery, restoring the client receivables it settled.
    ///
    /// Bank- and cash-funded recoveries are undone from their
    /// per-receivable transactions; depot-direct recoveries from their
    /// trip-tagged pool rows. Either way only the amounts this recovery
    /// actually applied are given back.
    pub async fn reverse_recovery(&self, recovery_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = recoveries::Entity::find_by_id(recovery_id.to_string())
                .filter(recoveries::Column::Active.eq(true))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("recovery".to_string()))?;
            let recovery = Recovery::try_from(model)?;
            let patch = recoveries::ActiveModel {
                id: ActiveValue::Set(recovery.id.to_string()),
                active: ActiveValue::Set(false),
                ..Default::default()
            };
            patch.update(&db_tx).await?;

            let txs = active_transactions_for_source(&db_tx, recovery_id).await?;
            let entries = deactivate_entries(
                &db_tx,
                sea_orm::Condition::any()
                    .add(ledger::Column::RecoveryId.eq(recovery_id.to_string())),
            )
            .await?;

            let mut touched_trips = Vec::new();
            if txs.is_empty() {
                for entry in &entries {
                    let Some(trip_id) = entry.trip_id else {
                        continue;
                    };
                    let receivable_id =
                        find_client_receivable(&db_tx, trip_id, &recovery.client_ref).await?;
                    allocation::shift_client_trip_collected(&db_tx, receivable_id, -entry.debit)
                        .await?;
                    touched_trips.push(trip_id);
                }
            } else {
                for tx in &txs {
                    deactivate_transaction(&db_tx, tx.id).await?;
                    let Some(trip_id) = tx.trip_id else {
                        continue;
                    };
                    let receivable_id =
                        find_client_receivable(&db_tx, trip_id, &recovery.client_ref).await?;
                    allocation::shift_client_trip_collected(&db_tx, receivable_id, -tx.credit)
                        .await?;
                    touched_trips.push(trip_id);
                }
            }

            rebuild_touched(&db_tx, &entries).await?;
            restore_trips(&db_tx, touched_trips).await?;
            Ok(())
        })
    }

    /// Reverses whichever movement produced a transaction.
    pub async fn reverse_transaction(&self, transaction_id: Uuid) -> ResultEngine<()> {
        let source = {
            let model = transactions::Entity::find_by_id(transaction_id.to_string())
                .filter(transactions::Column::Active.eq(true))
                .one(&self.database)
                .await?
                .ok_or_else(|| EngineError::NotFound("transaction".to_string()))?;
            let tx = Transaction::try_from(model)?;
            let source_id = tx.source_id.ok_or_else(|| {
                EngineError::Validation(
                    "transaction is not tied to a reversible source".to_string(),
                )
            })?;
            (tx.purpose, source_id)
        };

        use crate::TransactionPurpose::*;
        match source {
            (Expense | VehicleRent | VehicleExpense, source_id) => {
                self.reverse_expense(source_id).await
            }
            (PaymentToDepot, source_id) => self.reverse_payment(source_id).await,
            (RecoveryFromClient, source_id) => self.reverse_recovery(source_id).await,
        }
    }
}

/// Looks up one client's active receivable row for a trip.
async fn find_client_receivable(
    db_tx: &DatabaseTransaction,
    trip_id: Uuid,
    client_ref: &str,
) -> ResultEngine<Uuid> {
    let receivable = client_trips::Entity::find()
        .filter(client_trips::Column::TripId.eq(trip_id.to_string()))
        .filter(client_trips::Column::ClientRef.eq(client_ref))
        .filter(client_trips::Column::Active.eq(true))
        .one(db_tx)
        .await?
        .ok_or_else(|| EngineError::NotFound("client trip".to_string()))?;
    Uuid::parse_str(&receivable.id).map_err(|_| EngineError::NotFound("client trip".to_string()))
}
