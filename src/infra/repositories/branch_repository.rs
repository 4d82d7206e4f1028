//! Branch repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::branch::{self, ActiveModel, Entity as BranchEntity};
use crate::domain::{Branch, BranchChanges, NewBranch};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BranchRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Branch>>;

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Branch>>;

    /// Fetch every branch whose id is in `ids`; unknown ids are skipped.
    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Branch>>;

    async fn create(&self, branch: NewBranch) -> AppResult<Branch>;

    async fn update(&self, id: Uuid, changes: BranchChanges) -> AppResult<Branch>;

    /// Hard delete. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// All branches, newest first.
    async fn list(&self) -> AppResult<Vec<Branch>>;
}

pub struct BranchStore {
    db: DatabaseConnection,
}

impl BranchStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BranchRepository for BranchStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Branch>> {
        let result = BranchEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Branch::from))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Branch>> {
        let result = BranchEntity::find()
            .filter(branch::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(result.map(Branch::from))
    }

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Branch>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = BranchEntity::find()
            .filter(branch::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Branch::from).collect())
    }

    async fn create(&self, branch: NewBranch) -> AppResult<Branch> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(branch.name),
            city: Set(branch.city),
            state: Set(branch.state),
            address: Set(branch.address),
            phone: Set(branch.phone),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Branch::from(model))
    }

    async fn update(&self, id: Uuid, changes: BranchChanges) -> AppResult<Branch> {
        let branch = BranchEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Branch")?;

        let mut active: ActiveModel = branch.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(city) = changes.city {
            active.city = Set(city);
        }
        if let Some(state) = changes.state {
            active.state = Set(state);
        }
        if let Some(address) = changes.address {
            active.address = Set(address);
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(phone);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Branch::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = BranchEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn list(&self) -> AppResult<Vec<Branch>> {
        let models = BranchEntity::find()
            .order_by_desc(branch::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Branch::from).collect())
    }
}
