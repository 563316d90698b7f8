//! Request bodies accepted by the admin user endpoints.

use serde::Deserialize;
use validator::Validate;

use crate::domain::user::{UpdateUser, UserRole};
use crate::forms::auth::validate_public_role;

/// Body for `POST /api/v1/users`.
///
/// Admins create accounts through the same role gate as self-registration;
/// even they cannot mint another admin over the API.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserForm {
    #[validate(length(min = 1, message = "Please add a name"))]
    pub name: String,
    #[validate(email(message = "Please add a valid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Please add a password with 6 or more characters"))]
    pub password: String,
    #[validate(custom(function = "validate_public_role"))]
    pub role: Option<String>,
}

/// Body for `PUT /api/v1/users/{id}`. Absent fields stay untouched.
///
/// Passwords are deliberately absent, they only change through the
/// password endpoints, which hash them.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserForm {
    #[validate(length(min = 1, message = "Please add a name"))]
    pub name: Option<String>,
    #[validate(email(message = "Please add a valid email"))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_public_role"))]
    pub role: Option<String>,
}

impl From<&UpdateUserForm> for UpdateUser {
    fn from(form: &UpdateUserForm) -> Self {
        UpdateUser::new(
            form.name.clone(),
            form.email.clone(),
            form.role.as_deref().map(UserRole::from),
        )
    }
}
