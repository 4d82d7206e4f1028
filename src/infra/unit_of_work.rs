//! Unit of Work: one place that hands out every repository.
//!
//! Services depend on this trait rather than on individual stores, so a
//! single `Persistence` value wires the whole data layer. Writes are issued
//! one statement at a time; nothing here opens a multi-row transaction.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{
    BranchRepository, BranchStore, OrderRepository, OrderStore, ParcelRepository, ParcelStore,
    UserRepository, UserStore,
};

pub trait UnitOfWork: Send + Sync {
    fn branches(&self) -> Arc<dyn BranchRepository>;

    fn users(&self) -> Arc<dyn UserRepository>;

    fn orders(&self) -> Arc<dyn OrderRepository>;

    fn parcels(&self) -> Arc<dyn ParcelRepository>;
}

/// SeaORM-backed Unit of Work.
pub struct Persistence {
    branch_repo: Arc<BranchStore>,
    user_repo: Arc<UserStore>,
    order_repo: Arc<OrderStore>,
    parcel_repo: Arc<ParcelStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            branch_repo: Arc::new(BranchStore::new(db.clone())),
            user_repo: Arc::new(UserStore::new(db.clone())),
            order_repo: Arc::new(OrderStore::new(db.clone())),
            parcel_repo: Arc::new(ParcelStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn branches(&self) -> Arc<dyn BranchRepository> {
        self.branch_repo.clone()
    }

    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.order_repo.clone()
    }

    fn parcels(&self) -> Arc<dyn ParcelRepository> {
        self.parcel_repo.clone()
    }
}

/// Unit of Work over arbitrary repository handles, for tests.
#[cfg(any(test, feature = "test-utils"))]
pub struct StaticUnitOfWork {
    pub branches: Arc<dyn BranchRepository>,
    pub users: Arc<dyn UserRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub parcels: Arc<dyn ParcelRepository>,
}

#[cfg(any(test, feature = "test-utils"))]
impl UnitOfWork for StaticUnitOfWork {
    fn branches(&self) -> Arc<dyn BranchRepository> {
        self.branches.clone()
    }

    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.orders.clone()
    }

    fn parcels(&self) -> Arc<dyn ParcelRepository> {
        self.parcels.clone()
    }
}
