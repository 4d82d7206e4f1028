//! Migration: parcels

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Parcels::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Parcels::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Parcels::FromCity).string().not_null())
                    .col(ColumnDef::new(Parcels::ToCity).string().not_null())
                    .col(ColumnDef::new(Parcels::SenderName).string().not_null())
                    .col(ColumnDef::new(Parcels::RecipientName).string().not_null())
                    .col(ColumnDef::new(Parcels::SenderEmail).string().not_null())
                    .col(ColumnDef::new(Parcels::RecipientEmail).string().not_null())
                    .col(ColumnDef::new(Parcels::Weight).double().not_null())
                    .col(ColumnDef::new(Parcels::Cost).double().not_null().default(0.0))
                    .col(ColumnDef::new(Parcels::Note).text().null())
                    .col(ColumnDef::new(Parcels::Date).string().not_null())
                    .col(
                        ColumnDef::new(Parcels::Status)
                            .small_integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Parcels::OriginBranch).uuid().null())
                    .col(ColumnDef::new(Parcels::DestinationBranch).uuid().null())
                    .col(
                        ColumnDef::new(Parcels::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Parcels::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_parcels_sender_email")
                    .table(Parcels::Table)
                    .col(Parcels::SenderEmail)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_parcels_status")
                    .table(Parcels::Table)
                    .col(Parcels::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Parcels::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Parcels {
    Table,
    Id,
    FromCity,
    ToCity,
    SenderName,
    RecipientName,
    SenderEmail,
    RecipientEmail,
    Weight,
    Cost,
    Note,
    Date,
    Status,
    OriginBranch,
    DestinationBranch,
    CreatedAt,
    UpdatedAt,
}
