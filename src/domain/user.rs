use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Access level attached to every account.
///
/// Publishers own bootcamps and their courses; admins bypass ownership
/// checks everywhere. Self-registration only ever produces `User` or
/// `Publisher`, admins are created by other admins or by the seeder.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Publisher,
    Admin,
}

impl Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::User => write!(f, "user"),
            UserRole::Publisher => write!(f, "publisher"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            "publisher" => UserRole::Publisher,
            "admin" => UserRole::Admin,
            // Unknown roles degrade to the least privileged one.
            _ => UserRole::User,
        }
    }
}

impl From<String> for UserRole {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

/// An account. Credential fields never serialize into API responses.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    #[serde(skip_serializing, default)]
    pub reset_password_token: Option<String>,
    #[serde(skip_serializing, default)]
    pub reset_password_expire: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

impl NewUser {
    #[must_use]
    pub fn new(name: &str, email: &str, role: UserRole, password_hash: String) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
            role,
            password_hash,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

/// Profile fields an update may touch; `None` leaves a field unchanged.
#[derive(Clone, Debug, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
}

impl UpdateUser {
    #[must_use]
    pub fn new(name: Option<String>, email: Option<String>, role: Option<UserRole>) -> Self {
        Self {
            name: name.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            email: email.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty()),
            role,
        }
    }

    /// True when the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.role.is_none()
    }
}
