//! Picks up records left at status 0 by the provisioning approval flow.
//!
//! A parcel at status 0 owes its sender and recipient a "parcel pending"
//! email. As soon as one of them is queued it moves to status 1, so a later
//! sweep never repeats an email that already went out. A user at status 0
//! got their credentials in the approval email already, so they are simply
//! activated.
//!
//! Store failures on one record are logged and counted; the sweep carries on
//! with the rest.

use std::sync::Arc;

use uuid::Uuid;

use super::{parcel_pending_subject, render_parcel_pending, EmailJob, PartyRole};
use crate::domain::{AccountStatus, Parcel, ParcelChanges, ParcelStatus, UserChanges};
use crate::errors::AppResult;
use crate::infra::{Notifier, UnitOfWork};
use crate::services::parallel;

/// Counts from one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub parcels_notified: usize,
    pub emails_queued: usize,
    pub users_activated: usize,
    /// Parcels left at status 0 for the next sweep.
    pub parcels_deferred: usize,
    /// Parcel or user writes that failed and were skipped.
    pub write_failures: usize,
}

/// Outcome of queueing the pending notices for one parcel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Notices {
    queued: usize,
    missed: usize,
}

pub struct NotificationSweep<U: UnitOfWork> {
    uow: Arc<U>,
    notifier: Arc<dyn Notifier>,
}

impl<U: UnitOfWork> NotificationSweep<U> {
    pub fn new(uow: Arc<U>, notifier: Arc<dyn Notifier>) -> Self {
        Self { uow, notifier }
    }

    pub async fn run_once(&self) -> AppResult<SweepReport> {
        let mut report = SweepReport::default();

        let parcels = self
            .uow
            .parcels()
            .list_by_status(ParcelStatus::NotifyPending)
            .await?;

        for parcel in parcels {
            let notices = self.notify_parties(&parcel).await;
            report.emails_queued += notices.queued;

            if notices.queued == 0 && notices.missed > 0 {
                tracing::warn!(parcel_id = %parcel.id, "Deferring parcel notification");
                report.parcels_deferred += 1;
                continue;
            }
            if notices.missed > 0 {
                tracing::warn!(
                    parcel_id = %parcel.id,
                    missed = notices.missed,
                    "Parcel promoted with a notice missing"
                );
            }

            match self
                .uow
                .parcels()
                .update(parcel.id, ParcelChanges::status(ParcelStatus::Pending))
                .await
            {
                Ok(_) => report.parcels_notified += 1,
                Err(e) => {
                    tracing::error!(
                        parcel_id = %parcel.id,
                        error = %e,
                        "Notices queued but parcel could not be promoted"
                    );
                    report.write_failures += 1;
                }
            }
        }

        let users = self
            .uow
            .users()
            .list_by_status(AccountStatus::NotifyPending)
            .await?;
        let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();

        let store = self.uow.users();
        let results = parallel::settle_all(ids.iter().map(|id| {
            store.update(
                *id,
                UserChanges {
                    status: Some(AccountStatus::Active),
                    ..Default::default()
                },
            )
        }))
        .await;

        for (id, result) in ids.iter().zip(results) {
            match result {
                Ok(_) => report.users_activated += 1,
                Err(e) => {
                    tracing::error!(user_id = %id, error = %e, "Could not activate user");
                    report.write_failures += 1;
                }
            }
        }

        tracing::info!(
            parcels = report.parcels_notified,
            emails = report.emails_queued,
            users = report.users_activated,
            deferred = report.parcels_deferred,
            failures = report.write_failures,
            "Notification sweep finished"
        );
        Ok(report)
    }

    /// Build every notice first, then queue each one on its own.
    async fn notify_parties(&self, parcel: &Parcel) -> Notices {
        let subject = parcel_pending_subject(parcel);
        let jobs: Vec<EmailJob> = [
            (&parcel.senderemail, PartyRole::Sender),
            (&parcel.recipientemail, PartyRole::Recipient),
        ]
        .into_iter()
        .filter(|(to, _)| !to.trim().is_empty())
        .map(|(to, role)| {
            EmailJob::new(to.clone(), subject.clone(), render_parcel_pending(parcel, role))
        })
        .collect();

        let mut notices = Notices::default();
        for job in jobs {
            let to = job.to.clone();
            match self.notifier.enqueue_email(job).await {
                Ok(()) => notices.queued += 1,
                Err(e) => {
                    tracing::warn!(
                        parcel_id = %parcel.id,
                        to = %to,
                        error = %e,
                        "Could not queue parcel notice"
                    );
                    notices.missed += 1;
                }
            }
        }
        notices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    use crate::domain::{User, UserRole};
    use crate::errors::AppError;
    use crate::infra::unit_of_work::StaticUnitOfWork;
    use crate::infra::{
        MockBranchRepository, MockNotifier, MockOrderRepository, MockParcelRepository,
        MockUserRepository,
    };

    fn sweep(
        parcels: MockParcelRepository,
        users: MockUserRepository,
        notifier: MockNotifier,
    ) -> NotificationSweep<StaticUnitOfWork> {
        let uow = Arc::new(StaticUnitOfWork {
            branches: Arc::new(MockBranchRepository::new()),
            users: Arc::new(users),
            orders: Arc::new(MockOrderRepository::new()),
            parcels: Arc::new(parcels),
        });
        NotificationSweep::new(uow, Arc::new(notifier))
    }

    fn parcel(status: ParcelStatus) -> Parcel {
        let now = Utc::now();
        Parcel {
            id: Uuid::new_v4(),
            from: "Nairobi".to_string(),
            to: "Mombasa".to_string(),
            sendername: "Alice".to_string(),
            recipientname: "Bob".to_string(),
            senderemail: "alice@example.com".to_string(),
            recipientemail: "bob@example.com".to_string(),
            weight: 1.0,
            cost: 100.0,
            note: None,
            date: now.to_rfc3339(),
            status,
            origin_branch: None,
            destination_branch: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn pending_user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            fullname: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "hash".to_string(),
            age: None,
            country: None,
            address: None,
            role: UserRole::User,
            status: AccountStatus::NotifyPending,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_sweep_notifies_both_parties_and_promotes_parcel() {
        let mut parcels = MockParcelRepository::new();
        parcels
            .expect_list_by_status()
            .returning(|_| Ok(vec![parcel(ParcelStatus::NotifyPending)]));
        parcels
            .expect_update()
            .withf(|_, changes| changes.status == Some(ParcelStatus::Pending))
            .times(1)
            .returning(|id, _| {
                let mut p = parcel(ParcelStatus::Pending);
                p.id = id;
                Ok(p)
            });

        let mut users = MockUserRepository::new();
        users
            .expect_list_by_status()
            .returning(|_| Ok(vec![pending_user()]));
        users
            .expect_update()
            .withf(|_, changes| changes.status == Some(AccountStatus::Active))
            .times(1)
            .returning(|_, _| {
                let mut u = pending_user();
                u.status = AccountStatus::Active;
                Ok(u)
            });

        let mut notifier = MockNotifier::new();
        notifier
            .expect_enqueue_email()
            .withf(|job| job.subject.ends_with("is pending"))
            .times(2)
            .returning(|_| Ok(()));

        let report = sweep(parcels, users, notifier).run_once().await.unwrap();
        assert_eq!(
            report,
            SweepReport {
                parcels_notified: 1,
                emails_queued: 2,
                users_activated: 1,
                parcels_deferred: 0,
                write_failures: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_queue_failure_leaves_parcel_for_next_sweep() {
        let mut parcels = MockParcelRepository::new();
        parcels
            .expect_list_by_status()
            .returning(|_| Ok(vec![parcel(ParcelStatus::NotifyPending)]));
        parcels.expect_update().never();

        let mut users = MockUserRepository::new();
        users.expect_list_by_status().returning(|_| Ok(vec![]));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_enqueue_email()
            .returning(|_| Err(AppError::queue("down")));

        let report = sweep(parcels, users, notifier).run_once().await.unwrap();
        assert_eq!(report.parcels_deferred, 1);
        assert_eq!(report.parcels_notified, 0);
    }

    #[tokio::test]
    async fn test_recipient_failure_promotes_without_resending_sender() {
        let mut parcels = MockParcelRepository::new();
        parcels
            .expect_list_by_status()
            .returning(|_| Ok(vec![parcel(ParcelStatus::NotifyPending)]));
        parcels
            .expect_update()
            .withf(|_, changes| changes.status == Some(ParcelStatus::Pending))
            .times(1)
            .returning(|id, _| {
                let mut p = parcel(ParcelStatus::Pending);
                p.id = id;
                Ok(p)
            });

        let mut users = MockUserRepository::new();
        users.expect_list_by_status().returning(|_| Ok(vec![]));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_enqueue_email()
            .withf(|job| job.to == "alice@example.com")
            .times(1)
            .returning(|_| Ok(()));
        notifier
            .expect_enqueue_email()
            .withf(|job| job.to == "bob@example.com")
            .times(1)
            .returning(|_| Err(AppError::queue("down")));

        let report = sweep(parcels, users, notifier).run_once().await.unwrap();
        assert_eq!(report.parcels_notified, 1);
        assert_eq!(report.emails_queued, 1);
        assert_eq!(report.parcels_deferred, 0);
    }

    #[tokio::test]
    async fn test_write_failures_do_not_stop_the_sweep() {
        let first = parcel(ParcelStatus::NotifyPending);
        let second = parcel(ParcelStatus::NotifyPending);
        let first_id = first.id;
        let failing_user = pending_user();
        let failing_user_id = failing_user.id;

        let mut parcels = MockParcelRepository::new();
        parcels
            .expect_list_by_status()
            .returning(move |_| Ok(vec![first.clone(), second.clone()]));
        parcels.expect_update().times(2).returning(move |id, _| {
            if id == first_id {
                Err(AppError::internal("connection reset"))
            } else {
                let mut p = parcel(ParcelStatus::Pending);
                p.id = id;
                Ok(p)
            }
        });

        let mut users = MockUserRepository::new();
        users
            .expect_list_by_status()
            .returning(move |_| Ok(vec![failing_user.clone(), pending_user()]));
        users.expect_update().times(2).returning(move |id, _| {
            if id == failing_user_id {
                Err(AppError::internal("connection reset"))
            } else {
                let mut u = pending_user();
                u.id = id;
                u.status = AccountStatus::Active;
                Ok(u)
            }
        });

        let mut notifier = MockNotifier::new();
        notifier.expect_enqueue_email().times(4).returning(|_| Ok(()));

        let report = sweep(parcels, users, notifier).run_once().await.unwrap();
        assert_eq!(
            report,
            SweepReport {
                parcels_notified: 1,
                emails_queued: 4,
                users_activated: 1,
                parcels_deferred: 0,
                write_failures: 2,
            }
        );
    }
}
