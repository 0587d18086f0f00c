use chrono::{TimeZone, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    Engine, EngineError, ExpenseCmd, FundingSource, LedgerKind, Money, PaymentToDepotCmd,
    RecoveryCmd, TripStatus,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn rs(units: i64) -> Money {
    Money::new(units * 100)
}

/// A trip with one depot receivable, started on the given day of 2026-07.
async fn trip_with_depot_receivable(
    engine: &Engine,
    depot_id: Uuid,
    day: u32,
    payable: Money,
) -> Uuid {
    let start = Utc.with_ymd_and_hms(2026, 7, day, 8, 0, 0).unwrap();
    let trip_id = engine.new_trip(start, 0).await.unwrap();
    engine
        .add_trip_depot(trip_id, depot_id, payable)
        .await
        .unwrap();
    trip_id
}

#[tokio::test]
async fn account_opens_with_seeded_ledger() {
    let (engine, _db) = engine_with_db().await;

    let account_id = engine.new_account("Meezan", rs(1000)).await.unwrap();

    assert_eq!(engine.account_balance(account_id).await.unwrap(), rs(1000));
    let entries = engine
        .ledger_entries(LedgerKind::Bank, &account_id.to_string())
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].running_balance, rs(1000));
}

#[tokio::test]
async fn expense_moves_bank_balance_and_links_transaction() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Meezan", rs(1000)).await.unwrap();

    let outcome = engine
        .record_expense(
            ExpenseCmd::new(FundingSource::Bank(account_id), rs(150), Utc::now())
                .category("office")
                .note("stationery"),
        )
        .await
        .unwrap();

    assert_eq!(outcome.transaction_ids.len(), 1);
    assert_eq!(outcome.ledger_entry_ids.len(), 1);
    assert_eq!(engine.account_balance(account_id).await.unwrap(), rs(850));
    let account = engine.account(account_id).await.unwrap();
    assert_eq!(account.balance, rs(850));
}

#[tokio::test]
async fn outgoing_movement_exceeding_balance_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Meezan", rs(40)).await.unwrap();

    let err = engine
        .record_expense(ExpenseCmd::new(
            FundingSource::Bank(account_id),
            rs(100),
            Utc::now(),
        ))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::InsufficientFunds {
            available: rs(40),
            required: rs(100),
        }
    );
    assert_eq!(engine.account_balance(account_id).await.unwrap(), rs(40));
    let entries = engine
        .ledger_entries(LedgerKind::Bank, &account_id.to_string())
        .await
        .unwrap();
    assert_eq!(entries.len(), 1, "no partial write on rejection");
}

#[tokio::test]
async fn cash_day_gets_one_opening_row() {
    let (engine, _db) = engine_with_db().await;
    let trip_id = engine.new_trip(Utc::now(), 0).await.unwrap();
    engine
        .add_client_trip(trip_id, "K&N Traders", rs(1000))
        .await
        .unwrap();

    engine
        .record_recovery(RecoveryCmd::new(
            FundingSource::Cash,
            "K&N Traders",
            rs(300),
            Utc::now(),
        ))
        .await
        .unwrap();
    engine
        .record_recovery(RecoveryCmd::new(
            FundingSource::Cash,
            "K&N Traders",
            rs(200),
            Utc::now(),
        ))
        .await
        .unwrap();

    let entries = engine.cash_ledger().await.unwrap();
    let openings: Vec<_> = entries
        .iter()
        .filter(|e| e.note.as_deref() == Some("Opening Balance"))
        .collect();
    assert_eq!(openings.len(), 1);
    assert!(openings[0].debit.is_zero() && openings[0].credit.is_zero());
    assert_eq!(engine.cash_balance().await.unwrap(), rs(500));
}

#[tokio::test]
async fn cash_expense_reversal_restores_running_balance() {
    let (engine, _db) = engine_with_db().await;
    let trip_id = engine.new_trip(Utc::now(), 0).await.unwrap();
    engine
        .add_client_trip(trip_id, "K&N Traders", rs(1000))
        .await
        .unwrap();
    engine
        .record_recovery(RecoveryCmd::new(
            FundingSource::Cash,
            "K&N Traders",
            rs(500),
            Utc::now(),
        ))
        .await
        .unwrap();

    let outcome = engine
        .record_expense(ExpenseCmd::new(FundingSource::Cash, rs(75), Utc::now()))
        .await
        .unwrap();
    assert_eq!(engine.cash_balance().await.unwrap(), rs(425));

    engine.reverse_expense(outcome.source_id).await.unwrap();

    assert_eq!(engine.cash_balance().await.unwrap(), rs(500));
    // Full recalculation agrees with the stored running balances.
    assert_eq!(
        engine
            .recalculate(LedgerKind::Cash, engine::CASH_OWNER_ID)
            .await
            .unwrap(),
        rs(500)
    );
}

#[tokio::test]
async fn payment_settles_depot_receivables_oldest_first() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Meezan", rs(1000)).await.unwrap();
    let depot_id = engine.new_depot("Machike", Money::ZERO).await.unwrap();
    let trip_a = trip_with_depot_receivable(&engine, depot_id, 1, rs(300)).await;
    let trip_b = trip_with_depot_receivable(&engine, depot_id, 5, rs(250)).await;

    let outcome = engine
        .record_payment_to_depot(PaymentToDepotCmd::new(
            FundingSource::Bank(account_id),
            depot_id,
            rs(500),
            Utc::now(),
        ))
        .await
        .unwrap();

    // Two receivables touched: one transaction and one pool row each.
    assert_eq!(outcome.transaction_ids.len(), 2);

    let depos_a = engine.trip_depots(trip_a).await.unwrap();
    assert_eq!(depos_a[0].paid_amount, rs(300));
    assert_eq!(depos_a[0].remaining(), Money::ZERO);
    let depos_b = engine.trip_depots(trip_b).await.unwrap();
    assert_eq!(depos_b[0].paid_amount, rs(200));
    assert_eq!(depos_b[0].remaining(), rs(50));

    // Pool ledger: seed 0, then 300, then 500.
    let pool = engine
        .ledger_entries(LedgerKind::Pool, &depot_id.to_string())
        .await
        .unwrap();
    let balances: Vec<Money> = pool.iter().map(|e| e.running_balance).collect();
    assert_eq!(balances, vec![Money::ZERO, rs(300), rs(500)]);

    assert_eq!(engine.depot_balance(depot_id).await.unwrap(), rs(500));
    let depot = engine.depot(depot_id).await.unwrap();
    assert_eq!(depot.balance, rs(500));
    assert_eq!(engine.account_balance(account_id).await.unwrap(), rs(500));
}

#[tokio::test]
async fn overpayment_beyond_receivables_is_accepted_but_untracked() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Meezan", rs(1000)).await.unwrap();
    let depot_id = engine.new_depot("Machike", Money::ZERO).await.unwrap();
    let trip_id = trip_with_depot_receivable(&engine, depot_id, 1, rs(300)).await;

    engine
        .record_payment_to_depot(PaymentToDepotCmd::new(
            FundingSource::Bank(account_id),
            depot_id,
            rs(450),
            Utc::now(),
        ))
        .await
        .unwrap();

    let depos = engine.trip_depots(trip_id).await.unwrap();
    assert_eq!(depos[0].paid_amount, rs(300), "no overflow receivable");
    // The funding side still records the full amount paid out.
    assert_eq!(engine.account_balance(account_id).await.unwrap(), rs(550));
}

#[tokio::test]
async fn full_payment_completes_trip_idempotently() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Meezan", rs(1000)).await.unwrap();
    let depot_id = engine.new_depot("Machike", Money::ZERO).await.unwrap();
    let trip_id = trip_with_depot_receivable(&engine, depot_id, 1, rs(300)).await;

    engine
        .record_payment_to_depot(PaymentToDepotCmd::new(
            FundingSource::Bank(account_id),
            depot_id,
            rs(300),
            Utc::now(),
        ))
        .await
        .unwrap();

    let trip = engine.trip(trip_id).await.unwrap();
    assert_eq!(trip.status, TripStatus::Completed);
    assert_eq!(trip.paid, rs(300));
    let completed_at = trip.completed_at;
    assert!(completed_at.is_some());

    // Re-running the monitor must not move anything.
    let transitioned = engine.complete_trip_if_settled(trip_id).await.unwrap();
    assert!(!transitioned);
    let trip = engine.trip(trip_id).await.unwrap();
    assert_eq!(trip.status, TripStatus::Completed);
    assert_eq!(trip.completed_at, completed_at);
}

#[tokio::test]
async fn unsold_fuel_blocks_completion() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Meezan", rs(1000)).await.unwrap();
    let depot_id = engine.new_depot("Machike", Money::ZERO).await.unwrap();
    let start = Utc.with_ymd_and_hms(2026, 7, 1, 8, 0, 0).unwrap();
    let trip_id = engine.new_trip(start, 20_000).await.unwrap();
    engine
        .add_trip_depot(trip_id, depot_id, rs(300))
        .await
        .unwrap();

    engine
        .record_payment_to_depot(PaymentToDepotCmd::new(
            FundingSource::Bank(account_id),
            depot_id,
            rs(300),
            Utc::now(),
        ))
        .await
        .unwrap();
    assert_eq!(
        engine.trip(trip_id).await.unwrap().status,
        TripStatus::Open
    );

    engine.set_fuel_sold(trip_id, 20_000).await.unwrap();
    assert_eq!(
        engine.trip(trip_id).await.unwrap().status,
        TripStatus::Completed
    );
}

#[tokio::test]
async fn payment_reversal_restores_receivables_and_reopens_trip() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Meezan", rs(1000)).await.unwrap();
    let depot_id = engine.new_depot("Machike", Money::ZERO).await.unwrap();
    let trip_id = trip_with_depot_receivable(&engine, depot_id, 1, rs(300)).await;

    let outcome = engine
        .record_payment_to_depot(PaymentToDepotCmd::new(
            FundingSource::Bank(account_id),
            depot_id,
            rs(300),
            Utc::now(),
        ))
        .await
        .unwrap();
    assert_eq!(
        engine.trip(trip_id).await.unwrap().status,
        TripStatus::Completed
    );

    engine.reverse_payment(outcome.source_id).await.unwrap();

    let depos = engine.trip_depots(trip_id).await.unwrap();
    assert_eq!(depos[0].paid_amount, Money::ZERO);
    let trip = engine.trip(trip_id).await.unwrap();
    assert_eq!(trip.status, TripStatus::Open);
    assert_eq!(trip.completed_at, None);
    assert_eq!(trip.paid, Money::ZERO);
    assert_eq!(engine.account_balance(account_id).await.unwrap(), rs(1000));
    assert_eq!(engine.depot_balance(depot_id).await.unwrap(), Money::ZERO);
}

#[tokio::test]
async fn recovery_reversal_restores_client_receivable() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Meezan", rs(100)).await.unwrap();
    let trip_id = engine.new_trip(Utc::now(), 0).await.unwrap();
    engine
        .add_client_trip(trip_id, "K&N Traders", rs(800))
        .await
        .unwrap();

    let outcome = engine
        .record_recovery(RecoveryCmd::new(
            FundingSource::Bank(account_id),
            "K&N Traders",
            rs(500),
            Utc::now(),
        ))
        .await
        .unwrap();
    assert_eq!(engine.account_balance(account_id).await.unwrap(), rs(600));
    let clients = engine.client_trips(trip_id).await.unwrap();
    assert_eq!(clients[0].amount_collected, rs(500));

    engine.reverse_recovery(outcome.source_id).await.unwrap();

    let clients = engine.client_trips(trip_id).await.unwrap();
    assert_eq!(clients[0].amount_collected, Money::ZERO);
    assert_eq!(clients[0].remaining(), rs(800));
    assert_eq!(engine.account_balance(account_id).await.unwrap(), rs(100));
}

#[tokio::test]
async fn depot_direct_recovery_touches_only_the_pool() {
    let (engine, _db) = engine_with_db().await;
    let depot_id = engine.new_depot("Machike", Money::ZERO).await.unwrap();
    let trip_id = engine.new_trip(Utc::now(), 0).await.unwrap();
    engine
        .add_client_trip(trip_id, "K&N Traders", rs(800))
        .await
        .unwrap();

    let outcome = engine
        .record_recovery(RecoveryCmd::new(
            FundingSource::Depot(depot_id),
            "K&N Traders",
            rs(400),
            Utc::now(),
        ))
        .await
        .unwrap();

    assert!(outcome.transaction_ids.is_empty(), "no transaction row");
    assert_eq!(engine.depot_balance(depot_id).await.unwrap(), rs(400));
    let depot = engine.depot(depot_id).await.unwrap();
    assert_eq!(depot.balance, rs(400));
    let clients = engine.client_trips(trip_id).await.unwrap();
    assert_eq!(clients[0].amount_collected, rs(400));

    engine.reverse_recovery(outcome.source_id).await.unwrap();
    assert_eq!(engine.depot_balance(depot_id).await.unwrap(), Money::ZERO);
    let clients = engine.client_trips(trip_id).await.unwrap();
    assert_eq!(clients[0].amount_collected, Money::ZERO);
}

#[tokio::test]
async fn reverse_transaction_dispatches_to_its_source() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Meezan", rs(1000)).await.unwrap();

    let outcome = engine
        .record_expense(ExpenseCmd::new(
            FundingSource::Bank(account_id),
            rs(150),
            Utc::now(),
        ))
        .await
        .unwrap();

    engine
        .reverse_transaction(outcome.transaction_ids[0])
        .await
        .unwrap();
    assert_eq!(engine.account_balance(account_id).await.unwrap(), rs(1000));
}

#[tokio::test]
async fn replaying_active_entries_reproduces_every_running_balance() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Meezan", rs(1000)).await.unwrap();
    let depot_id = engine.new_depot("Machike", Money::ZERO).await.unwrap();
    trip_with_depot_receivable(&engine, depot_id, 1, rs(300)).await;

    let first = engine
        .record_expense(ExpenseCmd::new(
            FundingSource::Bank(account_id),
            rs(100),
            Utc::now(),
        ))
        .await
        .unwrap();
    engine
        .record_payment_to_depot(PaymentToDepotCmd::new(
            FundingSource::Bank(account_id),
            depot_id,
            rs(300),
            Utc::now(),
        ))
        .await
        .unwrap();
    engine.reverse_expense(first.source_id).await.unwrap();

    for (kind, owner) in [
        (LedgerKind::Bank, account_id.to_string()),
        (LedgerKind::Pool, depot_id.to_string()),
    ] {
        let entries = engine.ledger_entries(kind, &owner).await.unwrap();
        let mut running = Money::ZERO;
        for entry in &entries {
            running += entry.signed_delta();
            assert_eq!(
                entry.running_balance, running,
                "stored running balance diverged for {kind:?} ledger"
            );
        }
    }
}

#[tokio::test]
async fn missing_table_degrades_reads_to_empty() {
    let (engine, db) = engine_with_db().await;
    engine.new_account("Meezan", rs(10)).await.unwrap();

    let backend = db.get_database_backend();
    db.execute(Statement::from_string(backend, "DROP TABLE accounts"))
        .await
        .unwrap();

    let accounts = engine.accounts().await.unwrap();
    assert!(accounts.is_empty());

    // Writes against the missing table stay hard failures.
    let err = engine.new_account("Allied", rs(10)).await.unwrap_err();
    assert!(matches!(err, EngineError::SchemaMismatch(_)));
}

#[tokio::test]
async fn same_timestamp_movements_keep_every_delta() {
    let (engine, _db) = engine_with_db().await;
    let account_id = engine.new_account("Meezan", rs(1000)).await.unwrap();

    // Two movements posted with one client-supplied timestamp; their ids
    // decide the order, and neither delta may be lost.
    let posted_at = Utc::now() + chrono::Duration::hours(1);
    engine
        .record_expense(ExpenseCmd::new(
            FundingSource::Bank(account_id),
            rs(100),
            posted_at,
        ))
        .await
        .unwrap();
    engine
        .record_expense(ExpenseCmd::new(
            FundingSource::Bank(account_id),
            rs(50),
            posted_at,
        ))
        .await
        .unwrap();

    assert_eq!(engine.account_balance(account_id).await.unwrap(), rs(850));

    let entries = engine
        .ledger_entries(LedgerKind::Bank, &account_id.to_string())
        .await
        .unwrap();
    let mut running = Money::ZERO;
    for entry in &entries {
        running += entry.signed_delta();
        assert_eq!(entry.running_balance, running);
    }
}

#[tokio::test]
async fn reversing_unallocated_depot_recovery_keeps_earlier_settlement() {
    let (engine, _db) = engine_with_db().await;
    let depot_id = engine.new_depot("Machike", Money::ZERO).await.unwrap();
    let trip_id = engine.new_trip(Utc::now(), 0).await.unwrap();
    engine
        .add_client_trip(trip_id, "K&N Traders", rs(100))
        .await
        .unwrap();

    engine
        .record_recovery(RecoveryCmd::new(
            FundingSource::Depot(depot_id),
            "K&N Traders",
            rs(100),
            Utc::now(),
        ))
        .await
        .unwrap();
    let clients = engine.client_trips(trip_id).await.unwrap();
    assert_eq!(clients[0].amount_collected, rs(100));

    // Nothing left to allocate; the pool still records the full amount.
    let second = engine
        .record_recovery(RecoveryCmd::new(
            FundingSource::Depot(depot_id),
            "K&N Traders",
            rs(100),
            Utc::now(),
        ))
        .await
        .unwrap();
    assert!(second.transaction_ids.is_empty());
    assert_eq!(engine.depot_balance(depot_id).await.unwrap(), rs(200));

    engine.reverse_recovery(second.source_id).await.unwrap();

    let clients = engine.client_trips(trip_id).await.unwrap();
    assert_eq!(
        clients[0].amount_collected,
        rs(100),
        "the first recovery's settlement stays in place"
    );
    assert_eq!(engine.depot_balance(depot_id).await.unwrap(), rs(100));
}
