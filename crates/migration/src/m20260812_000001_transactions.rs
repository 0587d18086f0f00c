use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    Purpose,
    AccountId,
    CashEntryId,
    Debit,
    Credit,
    SourceId,
    TripId,
    PaymentMode,
    ReferenceNo,
    Note,
    OccurredAt,
    CreatedAt,
    Active,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    Kind,
    Amount,
    Category,
    DepotId,
    TripId,
    VehicleRef,
    Note,
    OccurredAt,
    Active,
}

#[derive(Iden)]
enum Payments {
    Table,
    Id,
    DepotId,
    Amount,
    PaymentMode,
    ReferenceNo,
    Note,
    OccurredAt,
    Active,
}

#[derive(Iden)]
enum Recoveries {
    Table,
    Id,
    ClientRef,
    Amount,
    DepotId,
    PaymentMode,
    ReferenceNo,
    Note,
    OccurredAt,
    Active,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::Purpose).string().not_null())
                    .col(ColumnDef::new(Transactions::AccountId).string())
                    .col(ColumnDef::new(Transactions::CashEntryId).string())
                    .col(ColumnDef::new(Transactions::Debit).big_integer().not_null())
                    .col(
                        ColumnDef::new(Transactions::Credit)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::SourceId).string())
                    .col(ColumnDef::new(Transactions::TripId).string())
                    .col(ColumnDef::new(Transactions::PaymentMode).string())
                    .col(ColumnDef::new(Transactions::ReferenceNo).string())
                    .col(ColumnDef::new(Transactions::Note).string())
                    .col(
                        ColumnDef::new(Transactions::OccurredAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-source_id")
                    .table(Transactions::Table)
                    .col(Transactions::SourceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::Kind).string().not_null())
                    .col(ColumnDef::new(Expenses::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Expenses::Category).string())
                    .col(ColumnDef::new(Expenses::DepotId).string())
                    .col(ColumnDef::new(Expenses::TripId).string())
                    .col(ColumnDef::new(Expenses::VehicleRef).string())
                    .col(ColumnDef::new(Expenses::Note).string())
                    .col(ColumnDef::new(Expenses::OccurredAt).timestamp().not_null())
                    .col(
                        ColumnDef::new(Expenses::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payments::DepotId).string().not_null())
                    .col(ColumnDef::new(Payments::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Payments::PaymentMode).string())
                    .col(ColumnDef::new(Payments::ReferenceNo).string())
                    .col(ColumnDef::new(Payments::Note).string())
                    .col(ColumnDef::new(Payments::OccurredAt).timestamp().not_null())
                    .col(
                        ColumnDef::new(Payments::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Recoveries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Recoveries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Recoveries::ClientRef).string().not_null())
                    .col(ColumnDef::new(Recoveries::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Recoveries::DepotId).string())
                    .col(ColumnDef::new(Recoveries::PaymentMode).string())
                    .col(ColumnDef::new(Recoveries::ReferenceNo).string())
                    .col(ColumnDef::new(Recoveries::Note).string())
                    .col(
                        ColumnDef::new(Recoveries::OccurredAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Recoveries::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Recoveries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await
    }
}
