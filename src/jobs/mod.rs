//! Background work: the email outbox worker and the status-0 notifier sweep.

mod email_job;
mod notifier;
mod templates;

pub use email_job::{email_job_handler, EmailJob, Mailer};
pub use notifier::{NotificationSweep, SweepReport};
pub use templates::{
    escape_html, parcel_pending_subject, render_parcel_pending, ApprovalEmail, PartyRole,
};
