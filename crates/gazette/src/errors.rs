//! Error types for Gazette.
use std::fmt::{self, Debug, Formatter};
use std::path::PathBuf;
use thiserror::Error;

macro_rules! impl_debug_for_error {
    ($($t:ty),*) => {
        $(
            impl Debug for $t {
                fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                    // Errors returned from main are shown with Debug, thiserror only derives Display.
                    write!(f, "{}", self)
                }
            }
        )*
    };
}

/// Classification of a failed API call, mirroring the status codes the blog API can answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    ServerError,
    NetworkError,
    DecodeError,
    UnknownError,
}

impl ApiErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiErrorCode::BadRequest => "BAD_REQUEST",
            ApiErrorCode::Unauthorized => "UNAUTHORIZED",
            ApiErrorCode::Forbidden => "FORBIDDEN",
            ApiErrorCode::NotFound => "NOT_FOUND",
            ApiErrorCode::ServerError => "SERVER_ERROR",
            ApiErrorCode::NetworkError => "NETWORK_ERROR",
            ApiErrorCode::DecodeError => "DECODE_ERROR",
            ApiErrorCode::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

#[derive(Error, Clone)]
#[error("{message}")]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    /// Maps an HTTP status returned by the API to a user-facing error.
    pub fn from_status(status: u16) -> Self {
        let (code, message) = match status {
            400 => (
                ApiErrorCode::BadRequest,
                "Bad request. Please check your input.".to_string(),
            ),
            401 => (
                ApiErrorCode::Unauthorized,
                "Unauthorized. Please log in again.".to_string(),
            ),
            403 => (ApiErrorCode::Forbidden, "Access denied.".to_string()),
            404 => (ApiErrorCode::NotFound, "Resource not found.".to_string()),
            500 => (
                ApiErrorCode::ServerError,
                "Server error. Please try again later.".to_string(),
            ),
            other => (
                ApiErrorCode::UnknownError,
                format!("HTTP error! status: {}", other),
            ),
        };

        Self {
            code,
            status: Some(status),
            message,
        }
    }

    pub fn network() -> Self {
        Self {
            code: ApiErrorCode::NetworkError,
            status: None,
            message: "Network error. Please check your connection.".to_string(),
        }
    }

    pub fn decode(details: impl fmt::Display) -> Self {
        Self {
            code: ApiErrorCode::DecodeError,
            status: None,
            message: format!("Failed to decode API response: {}", details),
        }
    }

    pub fn not_found() -> Self {
        Self::from_status(404)
    }

    pub fn is_not_found(&self) -> bool {
        self.code == ApiErrorCode::NotFound
    }
}

#[derive(Error, Clone, PartialEq, Eq)]
#[error("Unknown category `{0}`")]
pub struct UnknownCategory(pub String);

#[derive(Error)]
pub enum StoreError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Category(#[from] UnknownCategory),
}

impl StoreError {
    /// Whether the error should be presented as a missing page rather than a failure.
    pub fn is_not_found(&self) -> bool {
        match self {
            StoreError::Api(err) => err.is_not_found(),
            StoreError::Category(_) => true,
        }
    }
}

#[derive(Error)]
pub enum BuildError {
    #[error("Failed to write page {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to load fixtures from {path}")]
    FixturesFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid fixtures in {path}: {details}")]
    InvalidFixtures { path: PathBuf, details: String },
}

#[derive(Error, Debug)]
pub enum GazetteError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl_debug_for_error!(ApiError, UnknownCategory, StoreError, BuildError);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::from_status(400).code, ApiErrorCode::BadRequest);
        assert_eq!(ApiError::from_status(401).code, ApiErrorCode::Unauthorized);
        assert_eq!(ApiError::from_status(403).message, "Access denied.");
        assert!(ApiError::from_status(404).is_not_found());
        assert_eq!(
            ApiError::from_status(500).message,
            "Server error. Please try again later."
        );

        let teapot = ApiError::from_status(418);
        assert_eq!(teapot.code, ApiErrorCode::UnknownError);
        assert_eq!(teapot.message, "HTTP error! status: 418");
        assert_eq!(teapot.status, Some(418));
    }

    #[test]
    fn test_debug_uses_display() {
        let err = ApiError::network();
        assert_eq!(
            format!("{:?}", err),
            "Network error. Please check your connection."
        );
        assert_eq!(err.code.as_str(), "NETWORK_ERROR");
    }

    #[test]
    fn test_store_error_not_found() {
        assert!(StoreError::from(UnknownCategory("sports".into())).is_not_found());
        assert!(StoreError::from(ApiError::not_found()).is_not_found());
        assert!(!StoreError::from(ApiError::network()).is_not_found());
    }
}
