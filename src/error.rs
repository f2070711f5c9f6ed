use thiserror::Error;

/// Startup configuration problems. These are fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} not found. Set it in your .env file or environment, or pass --api-key")]
    MissingCredential(&'static str),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
    #[error("Failed to read advisor profile {path}: {reason}")]
    AdvisorProfile { path: String, reason: String },
}

/// Failure of a call to one of the external AI services.
///
/// The request that triggered it produces no result; nothing is retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Quota exceeded: {0}")]
    Quota(String),
    #[error("Response blocked by safety filters: {0}")]
    SafetyBlocked(String),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("API request failed: Status {status}, Body: {body}")]
    Api { status: u16, body: String },
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ServiceError::MalformedResponse(e.to_string())
        } else {
            ServiceError::Network(e.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum NutritionError {
    #[error("Please complete the following required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),
    #[error("Error loading or processing image: {0}")]
    InvalidImage(String),
    #[error("Unsupported image type: {0}")]
    UnsupportedImageType(String),
    #[error("No image uploaded. Upload a meal photo first.")]
    NoImage,
    #[error("No analysis available. Analyze a meal photo first.")]
    NoAnalysis,
    #[error("An error occurred while contacting the AI service: {0}")]
    Service(#[from] ServiceError),
}

impl NutritionError {
    /// Input problems the user can fix, as opposed to service failures.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, NutritionError::Service(_))
    }
}

impl From<validator::ValidationErrors> for NutritionError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let detail = errs
                    .iter()
                    .map(|e| match (e.params.get("min"), e.params.get("max")) {
                        (Some(min), Some(max)) => format!("must be between {} and {}", min, max),
                        _ => e
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string()),
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{} {}", field, detail)
            })
            .collect();
        fields.sort();
        NutritionError::InvalidProfile(fields.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::UserProfile;
    use validator::Validate;

    #[test]
    fn test_missing_fields_message_lists_all() {
        let err = NutritionError::MissingFields(vec![
            "Please enter your name".into(),
            "Please enter your age".into(),
        ]);
        assert_eq!(
            err.to_string(),
            "Please complete the following required fields: Please enter your name, Please enter your age"
        );
        assert!(err.is_input_error());
    }

    #[test]
    fn test_service_error_is_not_input_error() {
        let err: NutritionError = ServiceError::Quota("429".into()).into();
        assert!(!err.is_input_error());
        assert!(err.to_string().contains("Quota exceeded"));
    }

    #[test]
    fn test_validation_errors_name_fields() {
        let profile = UserProfile { age: Some(5), weight_kg: Some(500.0), ..Default::default() };
        let err: NutritionError = profile.validate().unwrap_err().into();
        let message = err.to_string();
        assert!(message.contains("age must be between"), "{}", message);
        assert!(message.contains("weight_kg"), "{}", message);
    }

    #[test]
    fn test_non_finite_weight_is_explained() {
        let profile = UserProfile { weight_kg: Some(f64::NAN), ..Default::default() };
        let err: NutritionError = profile.validate().unwrap_err().into();
        assert_eq!(err.to_string(), "Invalid profile: weight_kg must be a finite number");
    }
}
