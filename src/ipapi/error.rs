//! Lookup failure type.

use std::fmt;

/// Why a geolocation lookup failed.
///
/// `Clone` so one failed request can be handed to every caller waiting on it.
/// The `Display` text is shown to the user as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// HTTP 429 from the service.
    RateLimited,
    /// Transport failure or non-success HTTP status.
    Network,
    /// The service answered with `error: true`.
    Provider(String),
    /// The body could not be read as a location.
    InvalidResponse(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "Rate limit reached. Please wait a bit and try again."),
            Self::Network => write!(f, "Network error"),
            Self::Provider(reason) => write!(f, "{reason}"),
            Self::InvalidResponse(detail) => write!(f, "Invalid response from lookup service: {detail}"),
        }
    }
}

impl std::error::Error for LookupError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            LookupError::RateLimited.to_string(),
            "Rate limit reached. Please wait a bit and try again."
        );
        assert_eq!(LookupError::Network.to_string(), "Network error");
        assert_eq!(
            LookupError::Provider("Reserved IP Address".to_string()).to_string(),
            "Reserved IP Address"
        );
    }
}
