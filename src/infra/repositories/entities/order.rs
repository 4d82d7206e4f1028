//! Order database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Order, OrderStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub request_id: String,
    pub sender_name: String,
    pub sender_email: String,
    pub sender_phone: String,
    pub sender_city: String,
    pub recipient_name: String,
    pub recipient_email: String,
    pub recipient_phone: String,
    pub recipient_city: String,
    pub weight: f64,
    pub note: Option<String>,
    pub pickup_city: String,
    pub delivery_city: String,
    pub origin_branch: Uuid,
    pub destination_branch: Uuid,
    pub status: String,
    pub request_date: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Order {
    fn from(model: Model) -> Self {
        let status = model.status.parse().unwrap_or_else(|_| {
            tracing::warn!(order_id = %model.id, status = %model.status, "Unknown order status, reading as Pending");
            OrderStatus::Pending
        });

        Order {
            id: model.id,
            request_id: model.request_id,
            sender_name: model.sender_name,
            sender_email: model.sender_email,
            sender_phone: model.sender_phone,
            sender_city: model.sender_city,
            recipient_name: model.recipient_name,
            recipient_email: model.recipient_email,
            recipient_phone: model.recipient_phone,
            recipient_city: model.recipient_city,
            weight: model.weight,
            note: model.note,
            pickup_city: model.pickup_city,
            delivery_city: model.delivery_city,
            origin_branch: model.origin_branch,
            destination_branch: model.destination_branch,
            status,
            request_date: model.request_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
