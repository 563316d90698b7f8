//! Request bodies accepted by the authentication endpoints.

use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Body for `POST /api/v1/auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1, message = "Please add a name"))]
    pub name: String,
    #[validate(email(message = "Please add a valid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Please add a password with 6 or more characters"))]
    pub password: String,
    /// Defaults to `user` when absent. `admin` cannot be self-assigned.
    #[validate(custom(function = "validate_public_role"))]
    pub role: Option<String>,
}

/// Body for `POST /api/v1/auth/login`.
///
/// Presence is checked by the service so that a missing email and a missing
/// password produce the same single message.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Body for `PUT /api/v1/auth/updatedetails`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateDetailsForm {
    #[validate(length(min = 1, message = "Please add a name"))]
    pub name: Option<String>,
    #[validate(email(message = "Please add a valid email"))]
    pub email: Option<String>,
}

/// Body for `PUT /api/v1/auth/updatepassword`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordForm {
    pub current_password: String,
    #[validate(length(min = 6, message = "Please add a password with 6 or more characters"))]
    pub new_password: String,
}

/// Body for `POST /api/v1/auth/forgotpassword`.
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordForm {
    #[validate(email(message = "Please add a valid email"))]
    pub email: String,
}

/// Body for `PUT /api/v1/auth/resetpassword/{token}`.
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordForm {
    #[validate(length(min = 6, message = "Please add a password with 6 or more characters"))]
    pub password: String,
}

/// Roles a caller may pick for themselves or grant through the admin CRUD.
pub(crate) fn validate_public_role(role: &str) -> Result<(), ValidationError> {
    if matches!(role, "user" | "publisher") {
        Ok(())
    } else {
        let mut error = ValidationError::new("role");
        error.message = Some("Role must be either user or publisher".into());
        Err(error)
    }
}
