//! Shared handler state: the service trait objects plus optional backends.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database, Notifier};
use crate::services::{
    ApprovalService, AuthService, BranchService, OrderService, ParcelService, ServiceContainer,
    Services, UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub branch_service: Arc<dyn BranchService>,
    pub order_service: Arc<dyn OrderService>,
    pub parcel_service: Arc<dyn ParcelService>,
    pub approval_service: Arc<dyn ApprovalService>,
    /// Redis, when configured. Without it auth throttling is off.
    pub cache: Option<Arc<Cache>>,
    /// Reported by `/health`; absent when the state wraps in-memory services.
    pub database: Option<Arc<Database>>,
}

impl AppState {
    /// Production wiring: SeaORM stores behind every service.
    pub fn from_config(
        database: Arc<Database>,
        cache: Option<Arc<Cache>>,
        config: Config,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let services = Services::from_connection(database.get_connection(), config, notifier);

        Self {
            database: Some(database),
            cache,
            ..Self::from_services(&services)
        }
    }

    /// State over any service container, with no backends attached.
    pub fn from_services(services: &dyn ServiceContainer) -> Self {
        Self {
            auth_service: services.auth(),
            user_service: services.users(),
            branch_service: services.branches(),
            order_service: services.orders(),
            parcel_service: services.parcels(),
            approval_service: services.approvals(),
            cache: None,
            database: None,
        }
    }
}
