//! Collects every missing field of a request before failing, so the client
//! sees the whole list in one 400.

use crate::errors::{AppError, AppResult};

#[derive(Debug, Default)]
pub struct RequiredFields {
    missing: Vec<&'static str>,
}

impl RequiredFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a text field; absent or blank counts as missing.
    pub fn text(&mut self, name: &'static str, value: Option<String>) -> String {
        match value {
            Some(v) if !v.trim().is_empty() => v,
            _ => {
                self.missing.push(name);
                String::new()
            }
        }
    }

    /// Take any other field; only absence counts as missing.
    pub fn value<T: Default>(&mut self, name: &'static str, value: Option<T>) -> T {
        match value {
            Some(v) => v,
            None => {
                self.missing.push(name);
                T::default()
            }
        }
    }

    pub fn missing(&self) -> &[&'static str] {
        &self.missing
    }

    pub fn finish(self) -> AppResult<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::missing_fields(&self.missing))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_all_missing_fields() {
        let mut required = RequiredFields::new();
        let name = required.text("name", Some("Hub".to_string()));
        let city = required.text("city", Some("   ".to_string()));
        let weight: f64 = required.value("weight", None);

        assert_eq!(name, "Hub");
        assert!(city.is_empty());
        assert_eq!(weight, 0.0);
        assert_eq!(required.missing(), &["city", "weight"]);
        assert_eq!(
            required.finish().unwrap_err().to_string(),
            "Missing required fields: city, weight"
        );
    }

    #[test]
    fn test_complete_request_passes() {
        let mut required = RequiredFields::new();
        required.text("name", Some("Hub".to_string()));
        required.value("cost", Some(10.0_f64));
        assert!(required.finish().is_ok());
    }
}
