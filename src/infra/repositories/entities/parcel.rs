//! Parcel database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Parcel, ParcelStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "parcels")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub from_city: String,
    pub to_city: String,
    pub sender_name: String,
    pub recipient_name: String,
    pub sender_email: String,
    pub recipient_email: String,
    pub weight: f64,
    pub cost: f64,
    pub note: Option<String>,
    pub date: String,
    pub status: i16,
    pub origin_branch: Option<Uuid>,
    pub destination_branch: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Parcel {
    fn from(model: Model) -> Self {
        let status = ParcelStatus::from_code(model.status).unwrap_or_else(|| {
            tracing::warn!(parcel_id = %model.id, status = model.status, "Unknown parcel status, reading as Pending");
            ParcelStatus::Pending
        });

        Parcel {
            id: model.id,
            from: model.from_city,
            to: model.to_city,
            sendername: model.sender_name,
            recipientname: model.recipient_name,
            senderemail: model.sender_email,
            recipientemail: model.recipient_email,
            weight: model.weight,
            cost: model.cost,
            note: model.note,
            date: model.date,
            status,
            origin_branch: model.origin_branch,
            destination_branch: model.destination_branch,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
