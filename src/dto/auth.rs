//! DTOs for the authentication endpoints.

use serde::Serialize;

/// Body returned by every endpoint that issues a JWT.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

impl TokenResponse {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self {
            success: true,
            token,
        }
    }
}
