//! Business logic between the routes and the repositories.

use crate::auth::AuthenticatedUser;
use crate::domain::user::UserRole;

pub mod auth;
pub mod bootcamps;
pub mod courses;
pub mod errors;
pub mod reviews;
pub mod users;

pub use errors::{ServiceError, ServiceResult};

/// The caller's numeric id. A token minted by this crate always carries one,
/// so a failure here means the token was forged.
pub(crate) fn current_user_id(user: &AuthenticatedUser) -> ServiceResult<i32> {
    user.user_id()
        .ok_or_else(|| ServiceError::Unauthorized("Not authorized to access this route".into()))
}

/// Admins may act on anything, everyone else only on rows they own.
pub(crate) fn is_owner_or_admin(user: &AuthenticatedUser, owner_id: i32) -> bool {
    user.role == UserRole::Admin || user.user_id() == Some(owner_id)
}
