//! Error type shared by every service, with its HTTP mapping.

use actix_web::{HttpResponse, http::StatusCode};
use thiserror::Error;

use crate::dto::api::ErrorResponse;
use crate::geocode::GeocodeError;
use crate::repository::errors::RepositoryError;

/// Failure modes a service surfaces to a route handler.
///
/// Each variant carries the exact message sent to the client. The
/// [`actix_web::ResponseError`] impl renders it inside the JSON error
/// envelope, so handlers bubble these with `?`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    BadGateway(String),
    /// Message is logged server side, the client only sees `Server Error`.
    #[error("{0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("Resource not found".into()),
            RepositoryError::ValidationError(message) => Self::Validation(message),
            RepositoryError::ConstraintViolation(_) => {
                Self::Conflict("Duplicate field value entered".into())
            }
            RepositoryError::DatabaseError(message)
            | RepositoryError::ConnectionError(message)
            | RepositoryError::Unexpected(message) => Self::Internal(message),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("Invalid value for field {field}"),
                })
            })
            .collect();
        // Field order in ValidationErrors is a hash map's, sort for stable output.
        messages.sort();

        Self::Validation(messages.join(", "))
    }
}

impl From<GeocodeError> for ServiceError {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::NoMatch(query) => {
                Self::Validation(format!("Could not geocode location `{query}`"))
            }
            GeocodeError::Http(_) | GeocodeError::Malformed => {
                Self::BadGateway("Geocoding service is unavailable".into())
            }
        }
    }
}

impl actix_web::ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            // Duplicate keys answer 400 like any other bad payload.
            Self::Validation(_) | Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            Self::Internal(detail) => {
                log::error!("request failed: {detail}");
                "Server Error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse::new(message))
    }
}
