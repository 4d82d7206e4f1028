//! Parcel records, status updates and public tracking.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::container::parallel;
use crate::domain::{normalize_email, NewParcel, Parcel, ParcelChanges, ParcelStats, TrackingView};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait ParcelService: Send + Sync {
    async fn create_parcel(&self, parcel: NewParcel) -> AppResult<Parcel>;

    /// Newest first.
    async fn list_parcels(&self) -> AppResult<Vec<Parcel>>;

    async fn get_parcel(&self, id: Uuid) -> AppResult<Parcel>;

    /// Partial update. Status changes may jump to any delivery state.
    async fn update_parcel(&self, id: Uuid, changes: ParcelChanges) -> AppResult<Parcel>;

    /// Hard delete; unknown ids are not an error.
    async fn delete_parcel(&self, id: Uuid) -> AppResult<()>;

    /// Public lookup by tracking id (the parcel's own id).
    async fn track(&self, tracking_id: &str) -> AppResult<TrackingView>;

    async fn stats(&self) -> AppResult<ParcelStats>;

    /// Parcels sent by `email`, newest first.
    async fn parcels_sent_by(&self, email: &str) -> AppResult<Vec<Parcel>>;
}

pub struct ParcelManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ParcelManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> ParcelService for ParcelManager<U> {
    async fn create_parcel(&self, parcel: NewParcel) -> AppResult<Parcel> {
        let parcel = self.uow.parcels().create(parcel).await?;
        tracing::info!(parcel_id = %parcel.id, status = parcel.status.code(), "Parcel created");
        Ok(parcel)
    }

    async fn list_parcels(&self) -> AppResult<Vec<Parcel>> {
        self.uow.parcels().list().await
    }

    async fn get_parcel(&self, id: Uuid) -> AppResult<Parcel> {
        self.uow
            .parcels()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Parcel")
    }

    async fn update_parcel(&self, id: Uuid, changes: ParcelChanges) -> AppResult<Parcel> {
        if let Some(status) = changes.status {
            if !status.is_delivery_state() {
                return Err(AppError::validation(
                    "Invalid parcel status 0: expected a value between 1 and 5",
                ));
            }
        }

        let parcel = self.uow.parcels().update(id, changes).await?;
        tracing::info!(parcel_id = %id, status = parcel.status.code(), "Parcel updated");
        Ok(parcel)
    }

    async fn delete_parcel(&self, id: Uuid) -> AppResult<()> {
        let removed = self.uow.parcels().delete(id).await?;
        tracing::info!(parcel_id = %id, removed, "Parcel delete");
        Ok(())
    }

    async fn track(&self, tracking_id: &str) -> AppResult<TrackingView> {
        let id = Uuid::parse_str(tracking_id.trim())
            .map_err(|_| AppError::bad_request("Invalid tracking ID format"))?;

        let parcel = self
            .uow
            .parcels()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Tracking ID")?;

        Ok(TrackingView::from(parcel))
    }

    async fn stats(&self) -> AppResult<ParcelStats> {
        let parcels = self.uow.parcels();
        let (delivered, pending) = parallel::join2(
            parcels.count_by_status(ParcelStats::DELIVERED_STATUS),
            parcels.count_by_status(ParcelStats::PENDING_STATUS),
        )
        .await?;

        Ok(ParcelStats { delivered, pending })
    }

    async fn parcels_sent_by(&self, email: &str) -> AppResult<Vec<Parcel>> {
        self.uow
            .parcels()
            .list_by_sender_email(&normalize_email(email))
            .await
    }
}
