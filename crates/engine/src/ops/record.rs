//! Recording money movements.
//!
//! Every operation here runs as one unit of work with the same side-effect
//! ordering: funding-source mutation, then allocation against receivables
//! (pool and transaction rows per receivable touched), then the source
//! entity insert. A failure at any step rolls the whole unit back.

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseTransaction, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Expense, ExpenseCmd, ExpenseKind, FundingSource, LedgerEntry, LedgerKind, Money,
    Payment, PaymentToDepotCmd, Recovery, RecoveryCmd, ResultEngine, Transaction,
    TransactionPurpose, VehicleExpenseCmd, VehicleRentCmd, expenses,
    ledger::CASH_OWNER_ID,
    payments, recoveries, transactions,
};

use super::{Engine, allocation, balances, completion, ledger, with_tx};

/// Ids produced by one recorded movement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordOutcome {
    /// Id of the source row (expense, payment, or recovery).
    pub source_id: Uuid,
    pub transaction_ids: Vec<Uuid>,
    pub ledger_entry_ids: Vec<Uuid>,
}

/// The bank-or-cash ledger a movement is funded from (or lands in).
#[derive(Clone, Copy, Debug)]
enum FundingLedger {
    Bank(Uuid),
    Cash,
}

impl FundingLedger {
    fn kind(self) -> LedgerKind {
        match self {
            Self::Bank(_) => LedgerKind::Bank,
            Self::Cash => LedgerKind::Cash,
        }
    }

    fn owner_id(self) -> String {
        match self {
            Self::Bank(id) => id.to_string(),
            Self::Cash => CASH_OWNER_ID.to_string(),
        }
    }
}

/// Validates an outgoing movement's funding source: the owner must exist,
/// the cash day boundary must be seeded, and the balance must cover the
/// amount. Nothing is written to the funding ledger yet.
async fn resolve_outgoing(
    db_tx: &DatabaseTransaction,
    source: FundingSource,
    amount: Money,
    occurred_at: DateTime<Utc>,
) -> ResultEngine<FundingLedger> {
    let funding = match source {
        FundingSource::Bank(account_id) => {
            super::require_account(db_tx, account_id).await?;
            FundingLedger::Bank(account_id)
        }
        FundingSource::Cash => {
            ledger::ensure_cash_day_open(db_tx, occurred_at).await?;
            FundingLedger::Cash
        }
        FundingSource::Depot(_) => {
            return Err(EngineError::Validation(
                "only recoveries may go directly to a depot".to_string(),
            ));
        }
    };

    let available = ledger::current_balance(db_tx, funding.kind(), &funding.owner_id()).await?;
    if available < amount {
        return Err(EngineError::InsufficientFunds {
            available,
            required: amount,
        });
    }
    Ok(funding)
}

/// Resolves where an incoming movement lands; no balance check applies.
async fn resolve_incoming(
    db_tx: &DatabaseTransaction,
    destination: FundingSource,
    occurred_at: DateTime<Utc>,
) -> ResultEngine<FundingLedger> {
    match destination {
        FundingSource::Bank(account_id) => {
            super::require_account(db_tx, account_id).await?;
            Ok(FundingLedger::Bank(account_id))
        }
        FundingSource::Cash => {
            ledger::ensure_cash_day_open(db_tx, occurred_at).await?;
            Ok(FundingLedger::Cash)
        }
        FundingSource::Depot(_) => Err(EngineError::Validation(
            "depot-direct recoveries do not touch a funding ledger".to_string(),
        )),
    }
}

/// Appends one entry to a funding ledger and refreshes its cached balance
/// projection.
async fn append_funding_entry(
    db_tx: &DatabaseTransaction,
    funding: FundingLedger,
    mut entry: LedgerEntry,
) -> ResultEngine<LedgerEntry> {
    entry.kind = funding.kind();
    entry.owner_id = funding.owner_id();
    let entry = ledger::append(db_tx, entry).await?;
    balances::refresh_projection(db_tx, entry.kind, &entry.owner_id, entry.running_balance)
        .await?;
    Ok(entry)
}

/// Appends one pool row and refreshes the depot's cached balance.
async fn append_pool_entry(
    db_tx: &DatabaseTransaction,
    depot_id: Uuid,
    mut entry: LedgerEntry,
) -> ResultEngine<LedgerEntry> {
    entry.kind = LedgerKind::Pool;
    entry.owner_id = depot_id.to_string();
    let entry = ledger::append(db_tx, entry).await?;
    balances::refresh_projection(db_tx, LedgerKind::Pool, &entry.owner_id, entry.running_balance)
        .await?;
    Ok(entry)
}

fn funded_transaction(
    purpose: TransactionPurpose,
    funding: FundingLedger,
    funding_entry: &LedgerEntry,
    debit: Money,
    credit: Money,
    occurred_at: DateTime<Utc>,
) -> ResultEngine<Transaction> {
    let mut tx = Transaction::new(purpose, debit, credit, occurred_at)?;
    match funding {
        FundingLedger::Bank(account_id) => tx.account_id = Some(account_id),
        FundingLedger::Cash => tx.cash_entry_id = Some(funding_entry.id),
    }
    tx.validate_funding()?;
    Ok(tx)
}

impl Engine {
    /// Records a general expense funded from a bank account or cash.
    ///
    /// When the expense is tied to a depot it also writes a pool row, so the
    /// depot's pool balance reflects money spent on its behalf.
    pub async fn record_expense(&self, cmd: ExpenseCmd) -> ResultEngine<RecordOutcome> {
        self.record_expense_kind(cmd, ExpenseKind::General, TransactionPurpose::Expense, None)
            .await
    }

    /// Records rent paid for a hired vehicle.
    pub async fn record_vehicle_rent(&self, cmd: VehicleRentCmd) -> ResultEngine<RecordOutcome> {
        let mut expense_cmd = ExpenseCmd::new(cmd.source, cmd.amount, cmd.meta.occurred_at);
        expense_cmd.trip_id = cmd.trip_id;
        expense_cmd.meta = cmd.meta;
        self.record_expense_kind(
            expense_cmd,
            ExpenseKind::VehicleRent,
            TransactionPurpose::VehicleRent,
            Some(cmd.vehicle_ref),
        )
        .await
    }

    /// Records a vehicle running cost (fuel, maintenance, tolls).
    pub async fn record_vehicle_expense(
        &self,
        cmd: VehicleExpenseCmd,
    ) -> ResultEngine<RecordOutcome> {
        let mut expense_cmd = ExpenseCmd::new(cmd.source, cmd.amount, cmd.meta.occurred_at);
        expense_cmd.category = cmd.category;
        expense_cmd.trip_id = cmd.trip_id;
        expense_cmd.meta = cmd.meta;
        self.record_expense_kind(
            expense_cmd,
            ExpenseKind::VehicleExpense,
            TransactionPurpose::VehicleExpense,
            Some(cmd.vehicle_ref),
        )
        .await
    }

    async fn record_expense_kind(
        &self,
        cmd: ExpenseCmd,
        kind: ExpenseKind,
        purpose: TransactionPurpose,
        vehicle_ref: Option<String>,
    ) -> ResultEngine<RecordOutcome> {
        with_tx!(self, |db_tx| {
            let occurred_at = cmd.meta.occurred_at;
            let funding =
                resolve_outgoing(&db_tx, cmd.source, cmd.amount, occurred_at).await?;
            if let Some(depot_id) = cmd.depot_id {
                super::require_depot(&db_tx, depot_id).await?;
            }

            let mut expense = Expense::new(kind, cmd.amount, occurred_at)?;
            expense.category = cmd.category.clone();
            expense.depot_id = cmd.depot_id;
            expense.trip_id = cmd.trip_id;
            expense.vehicle_ref = vehicle_ref;
            expense.note = cmd.meta.note.clone();

            let mut tx = Transaction::new(purpose, cmd.amount, Money::ZERO, occurred_at)?;
            tx.source_id = Some(expense.id);
            tx.trip_id = cmd.trip_id;
            tx.payment_mode = cmd.meta.payment_mode.clone();
            tx.reference_no = cmd.meta.reference_no.clone();
            tx.note = cmd.meta.note.clone();

            let mut funding_entry = LedgerEntry::new(
                funding.kind(),
                funding.owner_id(),
                cmd.amount,
                Money::ZERO,
                occurred_at,
            )?;
            funding_entry.transaction_id = Some(tx.id);
            funding_entry.note = cmd.meta.note.clone();
            let funding_entry = append_funding_entry(&db_tx, funding, funding_entry).await?;

            match funding {
                FundingLedger::Bank(account_id) => tx.account_id = Some(account_id),
                FundingLedger::Cash => tx.cash_entry_id = Some(funding_entry.id),
            }
            tx.validate_funding()?;

            let mut ledger_entry_ids = vec![funding_entry.id];
            if let Some(depot_id) = cmd.depot_id {
                let mut pool_entry = LedgerEntry::new(
                    LedgerKind::Pool,
                    depot_id.to_string(),
                    cmd.amount,
                    Money::ZERO,
                    occurred_at,
                )?;
                pool_entry.transaction_id = Some(tx.id);
                pool_entry.trip_id = cmd.trip_id;
                let pool_entry = append_pool_entry(&db_tx, depot_id, pool_entry).await?;
                ledger_entry_ids.push(pool_entry.id);
            }

            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            expenses::ActiveModel::from(&expense).insert(&db_tx).await?;

            Ok(RecordOutcome {
                source_id: expense.id,
                transaction_ids: vec![tx.id],
                ledger_entry_ids,
            })
        })
    }

    /// Pays a depot, settling its open trip receivables oldest-first.
    ///
    /// The funding ledger records the full payment; each receivable touched
    /// gets its own transaction and pool row so allocation history stays
    /// auditable per trip. Any amount beyond all open receivables is
    /// accepted but not tracked against a receivable.
    pub async fn record_payment_to_depot(
        &self,
        cmd: PaymentToDepotCmd,
    ) -> ResultEngine<RecordOutcome> {
        with_tx!(self, |db_tx| {
            let occurred_at = cmd.meta.occurred_at;
            let funding =
                resolve_outgoing(&db_tx, cmd.source, cmd.amount, occurred_at).await?;
            super::require_depot(&db_tx, cmd.depot_id).await?;

            let mut payment = Payment::new(cmd.depot_id, cmd.amount, occurred_at)?;
            payment.payment_mode = cmd.meta.payment_mode.clone();
            payment.reference_no = cmd.meta.reference_no.clone();
            payment.note = cmd.meta.note.clone();

            let mut funding_entry = LedgerEntry::new(
                funding.kind(),
                funding.owner_id(),
                cmd.amount,
                Money::ZERO,
                occurred_at,
            )?;
            funding_entry.payment_id = Some(payment.id);
            funding_entry.note = cmd.meta.note.clone();
            let funding_entry = append_funding_entry(&db_tx, funding, funding_entry).await?;
            let mut ledger_entry_ids = vec![funding_entry.id];
            let mut transaction_ids = Vec::new();

            let open = allocation::open_depot_receivables(&db_tx, cmd.depot_id).await?;
            let allocations = crate::allocator::allocate(cmd.amount, &open);
            for alloc in &allocations {
                allocation::shift_trip_depo_paid(&db_tx, alloc.receivable_id, alloc.amount)
                    .await?;

                let mut tx = funded_transaction(
                    TransactionPurpose::PaymentToDepot,
                    funding,
                    &funding_entry,
                    alloc.amount,
                    Money::ZERO,
                    occurred_at,
                )?;
                tx.source_id = Some(payment.id);
                tx.trip_id = Some(alloc.trip_id);
                tx.payment_mode = cmd.meta.payment_mode.clone();
                tx.reference_no = cmd.meta.reference_no.clone();
                transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
                transaction_ids.push(tx.id);

                let mut pool_entry = LedgerEntry::new(
                    LedgerKind::Pool,
                    cmd.depot_id.to_string(),
                    alloc.amount,
                    Money::ZERO,
                    occurred_at,
                )?;
                pool_entry.transaction_id = Some(tx.id);
                pool_entry.payment_id = Some(payment.id);
                let pool_entry = append_pool_entry(&db_tx, cmd.depot_id, pool_entry).await?;
                ledger_entry_ids.push(pool_entry.id);

                allocation::refresh_trip_totals(&db_tx, alloc.trip_id).await?;
                completion::try_complete_trip(&db_tx, alloc.trip_id).await;
            }

            payments::ActiveModel::from(&payment).insert(&db_tx).await?;

            Ok(RecordOutcome {
                source_id: payment.id,
                transaction_ids,
                ledger_entry_ids,
            })
        })
    }

    /// Records money recovered from a client, settling the client's open
    /// trip receivables oldest-first.
    ///
    /// A recovery landing in a bank account or cash writes a funding entry
    /// plus one transaction per receivable touched. A depot-direct recovery
    /// writes no transaction; it records one pool row per receivable touched
    /// (trip-tagged) plus a remainder row, so the pool still carries the
    /// full amount and a later reversal can restore exactly what was
    /// applied.
    pub async fn record_recovery(&self, cmd: RecoveryCmd) -> ResultEngine<RecordOutcome> {
        with_tx!(self, |db_tx| {
            let occurred_at = cmd.meta.occurred_at;
            let mut recovery =
                Recovery::new(cmd.client_ref.clone(), cmd.amount, occurred_at)?;
            recovery.payment_mode = cmd.meta.payment_mode.clone();
            recovery.reference_no = cmd.meta.reference_no.clone();
            recovery.note = cmd.meta.note.clone();

            let mut ledger_entry_ids = Vec::new();
            let mut transaction_ids = Vec::new();

            let (pool_destination, funding) = match cmd.destination {
                FundingSource::Depot(depot_id) => {
                    super::require_depot(&db_tx, depot_id).await?;
                    recovery.depot_id = Some(depot_id);
                    (Some(depot_id), None)
                }
                destination => {
                    let funding =
                        resolve_incoming(&db_tx, destination, occurred_at).await?;
                    let mut funding_entry = LedgerEntry::new(
                        funding.kind(),
                        funding.owner_id(),
                        Money::ZERO,
                        cmd.amount,
                        occurred_at,
                    )?;
                    funding_entry.recovery_id = Some(recovery.id);
                    funding_entry.note = cmd.meta.note.clone();
                    let funding_entry =
                        append_funding_entry(&db_tx, funding, funding_entry).await?;
                    ledger_entry_ids.push(funding_entry.id);
                    (None, Some((funding, funding_entry)))
                }
            };

            let open = allocation::open_client_receivables(&db_tx, &cmd.client_ref).await?;
            let allocations = crate::allocator::allocate(cmd.amount, &open);
            let mut applied_total = Money::ZERO;
            for alloc in &allocations {
                allocation::shift_client_trip_collected(
                    &db_tx,
                    alloc.receivable_id,
                    alloc.amount,
                )
                .await?;
                applied_total += alloc.amount;

                if let Some(depot_id) = pool_destination {
                    let mut pool_entry = LedgerEntry::new(
                        LedgerKind::Pool,
                        depot_id.to_string(),
                        alloc.amount,
                        Money::ZERO,
                        occurred_at,
                    )?;
                    pool_entry.recovery_id = Some(recovery.id);
                    pool_entry.trip_id = Some(alloc.trip_id);
                    let pool_entry = append_pool_entry(&db_tx, depot_id, pool_entry).await?;
                    ledger_entry_ids.push(pool_entry.id);
                }

                if let Some((funding, funding_entry)) = &funding {
                    let mut tx = funded_transaction(
                        TransactionPurpose::RecoveryFromClient,
                        *funding,
                        funding_entry,
                        Money::ZERO,
                        alloc.amount,
                        occurred_at,
                    )?;
                    tx.source_id = Some(recovery.id);
                    tx.trip_id = Some(alloc.trip_id);
                    tx.payment_mode = cmd.meta.payment_mode.clone();
                    tx.reference_no = cmd.meta.reference_no.clone();
                    transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
                    transaction_ids.push(tx.id);
                }

                allocation::refresh_trip_totals(&db_tx, alloc.trip_id).await?;
                completion::try_complete_trip(&db_tx, alloc.trip_id).await;
            }

            if let Some(depot_id) = pool_destination {
                let remainder = cmd.amount - applied_total;
                if remainder.is_positive() {
                    let mut pool_entry = LedgerEntry::new(
                        LedgerKind::Pool,
                        depot_id.to_string(),
                        remainder,
                        Money::ZERO,
                        occurred_at,
                    )?;
                    pool_entry.recovery_id = Some(recovery.id);
                    pool_entry.note = cmd.meta.note.clone();
                    let pool_entry = append_pool_entry(&db_tx, depot_id, pool_entry).await?;
                    ledger_entry_ids.push(pool_entry.id);
                }
            }

            recoveries::ActiveModel::from(&recovery).insert(&db_tx).await?;

            Ok(RecordOutcome {
                source_id: recovery.id,
                transaction_ids,
                ledger_entry_ids,
            })
        })
    }
}
