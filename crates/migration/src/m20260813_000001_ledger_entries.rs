use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum LedgerEntries {
    Table,
    Id,
    Kind,
    OwnerId,
    Debit,
    Credit,
    RunningBalance,
    OccurredAt,
    CreatedAt,
    Active,
    TransactionId,
    TripId,
    PaymentId,
    RecoveryId,
    Note,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LedgerEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LedgerEntries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LedgerEntries::Kind).string().not_null())
                    .col(ColumnDef::new(LedgerEntries::OwnerId).string().not_null())
                    .col(
                        ColumnDef::new(LedgerEntries::Debit)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::Credit)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::RunningBalance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::OccurredAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(LedgerEntries::TransactionId).string())
                    .col(ColumnDef::new(LedgerEntries::TripId).string())
                    .col(ColumnDef::new(LedgerEntries::PaymentId).string())
                    .col(ColumnDef::new(LedgerEntries::RecoveryId).string())
                    .col(ColumnDef::new(LedgerEntries::Note).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger_entries-kind-owner_id-occurred_at")
                    .table(LedgerEntries::Table)
                    .col(LedgerEntries::Kind)
                    .col(LedgerEntries::OwnerId)
                    .col(LedgerEntries::OccurredAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger_entries-transaction_id")
                    .table(LedgerEntries::Table)
                    .col(LedgerEntries::TransactionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger_entries-payment_id")
                    .table(LedgerEntries::Table)
                    .col(LedgerEntries::PaymentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger_entries-recovery_id")
                    .table(LedgerEntries::Table)
                    .col(LedgerEntries::RecoveryId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LedgerEntries::Table).to_owned())
            .await
    }
}
