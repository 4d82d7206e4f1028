//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{AccountStatus, User, UserRole};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
    pub password_hash: String,
    pub age: Option<i32>,
    pub country: Option<String>,
    pub address: Option<String>,
    pub role: String,
    pub status: i16,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            fullname: model.fullname,
            email: model.email,
            password_hash: model.password_hash,
            age: model.age,
            country: model.country,
            address: model.address,
            role: UserRole::from(model.role.as_str()),
            status: AccountStatus::from_code(model.status),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
