//! JSON body extractor that runs `validator` rules before the handler.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;

/// `Json<T>` plus `T::validate()`. Malformed bodies and rule violations
/// both answer 400.
///
/// ```rust,ignore
/// async fn create_order(ValidatedJson(body): ValidatedJson<CreateOrderRequest>) { .. }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(format!("Invalid request body: {}", e.body_text())))?;

        value
            .validate()
            .map_err(|e| AppError::validation(describe(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// One message per failed rule, ordered by field name.
fn describe(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Validate)]
    struct Sample {
        #[validate(email(message = "senderEmail must be a valid email"))]
        sender_email: Option<String>,
        #[validate(range(exclusive_min = 0.0))]
        weight: Option<f64>,
    }

    #[test]
    fn test_describe_lists_rules_in_field_order() {
        let sample = Sample {
            sender_email: Some("nope".to_string()),
            weight: Some(0.0),
        };
        let errors = sample.validate().unwrap_err();
        assert_eq!(
            describe(&errors),
            "senderEmail must be a valid email, weight is invalid"
        );
    }

    #[test]
    fn test_absent_optional_fields_pass() {
        let sample = Sample {
            sender_email: None,
            weight: None,
        };
        assert!(sample.validate().is_ok());
    }
}
