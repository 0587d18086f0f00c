pub use sea_orm_migration::prelude::*;

mod m20260810_000001_accounts;
mod m20260810_000002_depots;
mod m20260811_000001_trips;
mod m20260812_000001_transactions;
mod m20260813_000001_ledger_entries;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260810_000001_accounts::Migration),
            Box::new(m20260810_000002_depots::Migration),
            Box::new(m20260811_000001_trips::Migration),
            Box::new(m20260812_000001_transactions::Migration),
            Box::new(m20260813_000001_ledger_entries::Migration),
        ]
    }
}
