//! Migration: orders

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Orders::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Orders::RequestId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Orders::SenderName).string().not_null())
                    .col(ColumnDef::new(Orders::SenderEmail).string().not_null())
                    .col(ColumnDef::new(Orders::SenderPhone).string().not_null())
                    .col(ColumnDef::new(Orders::SenderCity).string().not_null())
                    .col(ColumnDef::new(Orders::RecipientName).string().not_null())
                    .col(ColumnDef::new(Orders::RecipientEmail).string().not_null())
                    .col(ColumnDef::new(Orders::RecipientPhone).string().not_null())
                    .col(ColumnDef::new(Orders::RecipientCity).string().not_null())
                    .col(ColumnDef::new(Orders::Weight).double().not_null())
                    .col(ColumnDef::new(Orders::Note).text().null())
                    .col(ColumnDef::new(Orders::PickupCity).string().not_null())
                    .col(ColumnDef::new(Orders::DeliveryCity).string().not_null())
                    .col(ColumnDef::new(Orders::OriginBranch).uuid().not_null())
                    .col(ColumnDef::new(Orders::DestinationBranch).uuid().not_null())
                    .col(
                        ColumnDef::new(Orders::Status)
                            .string_len(20)
                            .not_null()
                            .default("Pending"),
                    )
                    .col(
                        ColumnDef::new(Orders::RequestDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Orders::UpdatedAt)
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
                    .name("idx_orders_created_at")
                    .table(Orders::Table)
                    .col(Orders::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await
    }
}

// Branch ids are plain references: deleting a branch leaves its orders
// pointing at an id that simply no longer populates.
#[derive(Iden)]
enum Orders {
    Table,
    Id,
    RequestId,
    SenderName,
    SenderEmail,
    SenderPhone,
    SenderCity,
    RecipientName,
    RecipientEmail,
    RecipientPhone,
    RecipientCity,
    Weight,
    Note,
    PickupCity,
    DeliveryCity,
    OriginBranch,
    DestinationBranch,
    Status,
    RequestDate,
    CreatedAt,
    UpdatedAt,
}
