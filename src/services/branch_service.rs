//! Branch directory service.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Branch, BranchChanges, NewBranch};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait BranchService: Send + Sync {
    /// Names are unique; a duplicate is a conflict.
    async fn create_branch(&self, branch: NewBranch) -> AppResult<Branch>;

    /// Newest first.
    async fn list_branches(&self) -> AppResult<Vec<Branch>>;

    async fn get_branch(&self, id: Uuid) -> AppResult<Branch>;

    async fn update_branch(&self, id: Uuid, changes: BranchChanges) -> AppResult<Branch>;

    /// Deleting an unknown id is not an error.
    async fn delete_branch(&self, id: Uuid) -> AppResult<()>;
}

pub struct BranchManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> BranchManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn ensure_name_free(&self, name: &str, except: Option<Uuid>) -> AppResult<()> {
        match self.uow.branches().find_by_name(name).await? {
            Some(existing) if Some(existing.id) != except => Err(AppError::conflict("Branch")),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> BranchService for BranchManager<U> {
    async fn create_branch(&self, branch: NewBranch) -> AppResult<Branch> {
        self.ensure_name_free(&branch.name, None).await?;
        let branch = self.uow.branches().create(branch).await?;
        tracing::info!(branch_id = %branch.id, name = %branch.name, "Branch created");
        Ok(branch)
    }

    async fn list_branches(&self) -> AppResult<Vec<Branch>> {
        self.uow.branches().list().await
    }

    async fn get_branch(&self, id: Uuid) -> AppResult<Branch> {
        self.uow
            .branches()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Branch")
    }

    async fn update_branch(&self, id: Uuid, changes: BranchChanges) -> AppResult<Branch> {
        if let Some(name) = changes.name.as_deref() {
            self.ensure_name_free(name, Some(id)).await?;
        }
        self.uow.branches().update(id, changes).await
    }

    async fn delete_branch(&self, id: Uuid) -> AppResult<()> {
        let removed = self.uow.branches().delete(id).await?;
        tracing::info!(branch_id = %id, removed, "Branch delete");
        Ok(())
    }
}
