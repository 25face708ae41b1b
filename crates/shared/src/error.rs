//! Flat error taxonomy surfaced to the user.
//!
//! Every variant is terminal for the single operation that raised it and maps
//! to one localized message key. Nothing here is retried.

/// User-facing failure of one operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcoError {
    #[error("no text or image was provided")]
    MissingInput,

    #[error("no location is available")]
    MissingLocation,

    /// Any gateway failure: network, quota, bad status or malformed response.
    /// The detail is for logs only.
    #[error("AI service unavailable: {detail}")]
    ServiceUnavailable { detail: String },

    #[error("location permission was denied")]
    GeolocationDenied,

    #[error("geolocation is not supported on this device")]
    GeolocationUnsupported,

    /// Scoped to one enrichable item; never fails the surrounding result.
    #[error("image generation failed: {detail}")]
    ImageGeneration { detail: String },
}

impl EcoError {
    pub fn service(detail: impl Into<String>) -> Self {
        EcoError::ServiceUnavailable {
            detail: detail.into(),
        }
    }

    pub fn image(detail: impl Into<String>) -> Self {
        EcoError::ImageGeneration {
            detail: detail.into(),
        }
    }

    /// Translation key for the generic message of this category.
    pub fn message_key(&self) -> &'static str {
        match self {
            EcoError::MissingInput => "error_no_input",
            EcoError::MissingLocation => "error_no_location",
            EcoError::ServiceUnavailable { .. } => "error_ai_busy",
            EcoError::GeolocationDenied => "location_error_enable",
            EcoError::GeolocationUnsupported => "location_error_unsupported",
            EcoError::ImageGeneration { .. } => "image_error",
        }
    }

    /// Whether the error belongs to input validation (no gateway call made).
    pub fn is_validation(&self) -> bool {
        matches!(self, EcoError::MissingInput | EcoError::MissingLocation)
    }
}
