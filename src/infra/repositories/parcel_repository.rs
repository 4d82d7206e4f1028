//! Parcel repository.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::parcel::{self, ActiveModel, Entity as ParcelEntity};
use crate::domain::{NewParcel, Parcel, ParcelChanges, ParcelStatus};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ParcelRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Parcel>>;

    async fn create(&self, parcel: NewParcel) -> AppResult<Parcel>;

    async fn update(&self, id: Uuid, changes: ParcelChanges) -> AppResult<Parcel>;

    /// Hard delete. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// All parcels, newest first.
    async fn list(&self) -> AppResult<Vec<Parcel>>;

    /// Parcels sent from `email`, newest first.
    async fn list_by_sender_email(&self, email: &str) -> AppResult<Vec<Parcel>>;

    /// Parcels currently at `status`, oldest first.
    async fn list_by_status(&self, status: ParcelStatus) -> AppResult<Vec<Parcel>>;

    async fn count_by_status(&self, status: ParcelStatus) -> AppResult<u64>;
}

pub struct ParcelStore {
    db: DatabaseConnection,
}

impl ParcelStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ParcelRepository for ParcelStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Parcel>> {
        let result = ParcelEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Parcel::from))
    }

    async fn create(&self, parcel: NewParcel) -> AppResult<Parcel> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            from_city: Set(parcel.from),
            to_city: Set(parcel.to),
            sender_name: Set(parcel.sendername),
            recipient_name: Set(parcel.recipientname),
            sender_email: Set(parcel.senderemail),
            recipient_email: Set(parcel.recipientemail),
            weight: Set(parcel.weight),
            cost: Set(parcel.cost),
            note: Set(parcel.note),
            date: Set(parcel.date),
            status: Set(parcel.status.code()),
            origin_branch: Set(parcel.origin_branch),
            destination_branch: Set(parcel.destination_branch),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Parcel::from(model))
    }

    async fn update(&self, id: Uuid, changes: ParcelChanges) -> AppResult<Parcel> {
        let parcel = ParcelEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Parcel")?;

        let mut active: ActiveModel = parcel.into();
        if let Some(from) = changes.from {
            active.from_city = Set(from);
        }
        if let Some(to) = changes.to {
            active.to_city = Set(to);
        }
        if let Some(name) = changes.sendername {
            active.sender_name = Set(name);
        }
        if let Some(name) = changes.recipientname {
            active.recipient_name = Set(name);
        }
        if let Some(email) = changes.senderemail {
            active.sender_email = Set(email);
        }
        if let Some(email) = changes.recipientemail {
            active.recipient_email = Set(email);
        }
        if let Some(weight) = changes.weight {
            active.weight = Set(weight);
        }
        if let Some(cost) = changes.cost {
            active.cost = Set(cost);
        }
        if let Some(note) = changes.note {
            active.note = Set(Some(note));
        }
        if let Some(date) = changes.date {
            active.date = Set(date);
        }
        if let Some(status) = changes.status {
            active.status = Set(status.code());
        }
        if let Some(branch) = changes.origin_branch {
            active.origin_branch = Set(Some(branch));
        }
        if let Some(branch) = changes.destination_branch {
            active.destination_branch = Set(Some(branch));
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Parcel::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = ParcelEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn list(&self) -> AppResult<Vec<Parcel>> {
        let models = ParcelEntity::find()
            .order_by_desc(parcel::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Parcel::from).collect())
    }

    async fn list_by_sender_email(&self, email: &str) -> AppResult<Vec<Parcel>> {
        let models = ParcelEntity::find()
            // Rows written before intake normalization may carry mixed case.
            .filter(
                Expr::expr(Func::lower(Expr::col(parcel::Column::SenderEmail)))
                    .eq(email.trim().to_lowercase()),
            )
            .order_by_desc(parcel::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Parcel::from).collect())
    }

    async fn list_by_status(&self, status: ParcelStatus) -> AppResult<Vec<Parcel>> {
        let models = ParcelEntity::find()
            .filter(parcel::Column::Status.eq(status.code()))
            .order_by_asc(parcel::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Parcel::from).collect())
    }

    async fn count_by_status(&self, status: ParcelStatus) -> AppResult<u64> {
        ParcelEntity::find()
            .filter(parcel::Column::Status.eq(status.code()))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}
