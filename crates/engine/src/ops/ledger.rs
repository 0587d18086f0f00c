//! Append and rebuild operations on the running-balance ledgers.

use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};

use crate::{
    EngineError, LedgerEntry, LedgerKind, Money, ResultEngine,
    ledger::{self, CASH_OWNER_ID},
};

/// Most recent active entry for one ledger owner, by `(occurred_at, id)`.
pub(super) async fn latest_active(
    db_tx: &DatabaseTransaction,
    kind: LedgerKind,
    owner_id: &str,
) -> ResultEngine<Option<LedgerEntry>> {
    let model = ledger::Entity::find()
        .filter(ledger::Column::Kind.eq(kind.as_str()))
        .filter(ledger::Column::OwnerId.eq(owner_id))
        .filter(ledger::Column::Active.eq(true))
        .order_by_desc(ledger::Column::OccurredAt)
        .order_by_desc(ledger::Column::Id)
        .one(db_tx)
        .await?;
    model.map(LedgerEntry::try_from).transpose()
}

/// Current balance of one ledger owner: the latest active entry's running
/// balance, or zero for an empty ledger.
pub(super) async fn current_balance(
    db_tx: &DatabaseTransaction,
    kind: LedgerKind,
    owner_id: &str,
) -> ResultEngine<Money> {
    Ok(latest_active(db_tx, kind, owner_id)
        .await?
        .map(|entry| entry.running_balance)
        .unwrap_or(Money::ZERO))
}

/// Appends an entry, filling in its running balance.
///
/// The common case is O(1): the new entry is chronologically last, so its
/// running balance is the previous latest plus its own signed delta. A
/// backdated entry breaks the append-only assumption; it is inserted as-is
/// and the whole ledger is rebuilt.
///
/// "Last" means strictly after the latest entry's `(occurred_at, id)` pair.
/// Ids are random, so an entry sharing the latest `occurred_at` may sort
/// before it; only a strict win on the pair keeps the O(1) path sound.
pub(super) async fn append(
    db_tx: &DatabaseTransaction,
    mut entry: LedgerEntry,
) -> ResultEngine<LedgerEntry> {
    entry.validate_tags()?;
    let latest = latest_active(db_tx, entry.kind, &entry.owner_id).await?;

    let in_order = latest.as_ref().is_none_or(|last| {
        // Ids compare as stored: text columns, so string order.
        entry.occurred_at > last.occurred_at
            || (entry.occurred_at == last.occurred_at
                && entry.id.to_string() > last.id.to_string())
    });

    if in_order {
        let previous = latest.map(|last| last.running_balance).unwrap_or(Money::ZERO);
        entry.running_balance = previous + entry.signed_delta();
        ledger::ActiveModel::from(&entry).insert(db_tx).await?;
        Ok(entry)
    } else {
        ledger::ActiveModel::from(&entry).insert(db_tx).await?;
        rebuild(db_tx, entry.kind, &entry.owner_id).await?;
        let model = ledger::Entity::find_by_id(entry.id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::NotFound("ledger entry".to_string()))?;
        LedgerEntry::try_from(model)
    }
}

/// Replays all active entries of one ledger owner in `(occurred_at, id)`
/// order, rewriting every stored running balance. Returns the final balance.
pub(super) async fn rebuild(
    db_tx: &DatabaseTransaction,
    kind: LedgerKind,
    owner_id: &str,
) -> ResultEngine<Money> {
    let models = ledger::Entity::find()
        .filter(ledger::Column::Kind.eq(kind.as_str()))
        .filter(ledger::Column::OwnerId.eq(owner_id))
        .filter(ledger::Column::Active.eq(true))
        .order_by_asc(ledger::Column::OccurredAt)
        .order_by_asc(ledger::Column::Id)
        .all(db_tx)
        .await?;

    let mut running = Money::ZERO;
    for model in models {
        let entry = LedgerEntry::try_from(model)?;
        running += entry.signed_delta();
        if entry.running_balance != running {
            let patch = ledger::ActiveModel {
                id: ActiveValue::Set(entry.id.to_string()),
                running_balance: ActiveValue::Set(running.minor()),
                ..Default::default()
            };
            patch.update(db_tx).await?;
        }
    }
    Ok(running)
}

/// Makes sure the cash ledger has an "Opening Balance" row for the calendar
/// day of `occurred_at`, carrying the last known balance forward at
/// day-start. Idempotent; called before every cash movement so day-scoped
/// balance queries never see a gap.
pub(super) async fn ensure_cash_day_open(
    db_tx: &DatabaseTransaction,
    occurred_at: DateTime<Utc>,
) -> ResultEngine<()> {
    let day_start = Utc.from_utc_datetime(
        &occurred_at
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .unwrap_or_else(|| occurred_at.naive_utc()),
    );
    let day_end = day_start + chrono::Duration::days(1);

    let existing = ledger::Entity::find()
        .filter(ledger::Column::Kind.eq(LedgerKind::Cash.as_str()))
        .filter(ledger::Column::OwnerId.eq(CASH_OWNER_ID))
        .filter(ledger::Column::Active.eq(true))
        .filter(ledger::Column::OccurredAt.gte(day_start))
        .filter(ledger::Column::OccurredAt.lt(day_end))
        .one(db_tx)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let carried = current_balance(db_tx, LedgerKind::Cash, CASH_OWNER_ID).await?;
    let mut opening = LedgerEntry::new(
        LedgerKind::Cash,
        CASH_OWNER_ID.to_string(),
        Money::ZERO,
        Money::ZERO,
        day_start,
    )?;
    opening.running_balance = carried;
    opening.note = Some("Opening Balance".to_string());
    ledger::ActiveModel::from(&opening).insert(db_tx).await?;
    Ok(())
}
