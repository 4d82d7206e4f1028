//! Email background job.
//!
//! Emails are queued by the API and delivered by the `jobs work` worker.
//! Without `SMTP_HOST` the worker logs each email instead of sending it.

use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::{Deserialize, Serialize};

use crate::config::SmtpSettings;
use crate::errors::{AppError, AppResult};

/// Email job payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailJob {
    /// Recipient email address
    pub to: String,
    pub subject: String,
    /// HTML body
    pub body: String,
    /// Optional sender override (defaults to SMTP_FROM)
    #[serde(default)]
    pub from: Option<String>,
}

impl EmailJob {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            from: None,
        }
    }
}

/// SMTP sender. `transport` is `None` when SMTP is not configured.
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
}

impl Mailer {
    pub fn from_settings(settings: &SmtpSettings) -> AppResult<Self> {
        let Some(host) = settings.host.as_deref() else {
            return Ok(Self {
                transport: None,
                from: settings.from.clone(),
            });
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| AppError::internal(format!("Invalid SMTP host {}: {}", host, e)))?
            .port(settings.port);

        if let (Some(user), Some(pass)) = (settings.user.as_deref(), settings.password()) {
            builder = builder.credentials(Credentials::new(user.to_string(), pass.to_string()));
        }

        Ok(Self {
            transport: Some(builder.build()),
            from: settings.from.clone(),
        })
    }

    pub fn is_live(&self) -> bool {
        self.transport.is_some()
    }

    pub async fn send(&self, job: &EmailJob) -> AppResult<()> {
        let from = job.from.as_deref().unwrap_or(&self.from);

        let Some(transport) = &self.transport else {
            tracing::warn!("SMTP not configured - logging email instead of sending");
            tracing::info!(
                "=== EMAIL (not sent) ===\n\
                 From: {}\n\
                 To: {}\n\
                 Subject: {}\n\
                 Body:\n{}\n\
                 ========================",
                from,
                job.to,
                job.subject,
                job.body
            );
            return Ok(());
        };

        let message = build_message(from, job)?;
        transport
            .send(message)
            .await
            .map_err(|e| AppError::internal(format!("Failed to send email: {}", e)))?;
        Ok(())
    }
}

fn build_message(from: &str, job: &EmailJob) -> AppResult<Message> {
    Message::builder()
        .from(
            from.parse()
                .map_err(|e| AppError::internal(format!("Invalid from address: {}", e)))?,
        )
        .to(job
            .to
            .parse()
            .map_err(|e| AppError::validation(format!("Invalid to address: {}", e)))?)
        .subject(job.subject.clone())
        .header(ContentType::TEXT_HTML)
        .body(job.body.clone())
        .map_err(|e| AppError::internal(format!("Failed to build email: {}", e)))
}

/// Email job handler - processes email sending jobs
pub async fn email_job_handler(job: EmailJob) -> Result<(), AppError> {
    let mailer = Mailer::from_settings(&SmtpSettings::from_env())?;

    tracing::info!(
        to = %job.to,
        subject = %job.subject,
        live = mailer.is_live(),
        "Processing email job"
    );

    mailer.send(&job).await?;

    tracing::info!(to = %job.to, "Email processed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_mailer_logs_instead_of_sending() {
        let mailer = Mailer::from_settings(&SmtpSettings::default()).unwrap();
        assert!(!mailer.is_live());

        let job = EmailJob::new("jane@example.com", "Hello", "<p>Hi</p>");
        assert!(mailer.send(&job).await.is_ok());
    }

    #[test]
    fn test_message_rejects_bad_recipient() {
        let job = EmailJob::new("not an address", "Hello", "<p>Hi</p>");
        let err = build_message("noreply@sendit.example.com", &job).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_job_payload_round_trips_through_queue_encoding() {
        let job = EmailJob {
            from: Some("ops@sendit.example.com".to_string()),
            ..EmailJob::new("a@x.com", "S", "B")
        };
        let json = serde_json::to_string(&job).unwrap();
        let back: EmailJob = serde_json::from_str(&json).unwrap();
        assert_eq!(back, job);
    }
}
