use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Trips {
    Table,
    Id,
    StartDate,
    Status,
    Paid,
    AmountCollected,
    FuelAssigned,
    FuelSold,
    CompletedAt,
    Active,
}

#[derive(Iden)]
enum TripDepos {
    Table,
    Id,
    TripId,
    DepotId,
    PayableAmount,
    PaidAmount,
    Active,
}

#[derive(Iden)]
enum ClientTrips {
    Table,
    Id,
    TripId,
    ClientRef,
    TotalAmount,
    AmountCollected,
    Active,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Trips::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Trips::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Trips::StartDate).timestamp().not_null())
                    .col(ColumnDef::new(Trips::Status).string().not_null())
                    .col(
                        ColumnDef::new(Trips::Paid)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Trips::AmountCollected)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Trips::FuelAssigned)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Trips::FuelSold)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Trips::CompletedAt).timestamp())
                    .col(
                        ColumnDef::new(Trips::Active)
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
                    .table(TripDepos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TripDepos::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TripDepos::TripId).string().not_null())
                    .col(ColumnDef::new(TripDepos::DepotId).string().not_null())
                    .col(
                        ColumnDef::new(TripDepos::PayableAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TripDepos::PaidAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TripDepos::Active)
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
                    .name("idx-trip_depos-trip_id")
                    .table(TripDepos::Table)
                    .col(TripDepos::TripId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-trip_depos-depot_id")
                    .table(TripDepos::Table)
                    .col(TripDepos::DepotId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ClientTrips::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClientTrips::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ClientTrips::TripId).string().not_null())
                    .col(ColumnDef::new(ClientTrips::ClientRef).string().not_null())
                    .col(
                        ColumnDef::new(ClientTrips::TotalAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClientTrips::AmountCollected)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ClientTrips::Active)
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
                    .name("idx-client_trips-client_ref")
                    .table(ClientTrips::Table)
                    .col(ClientTrips::ClientRef)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ClientTrips::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TripDepos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Trips::Table).to_owned())
            .await
    }
}
