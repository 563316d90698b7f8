//! HTTP handlers grouped by resource.
//!
//! Handlers stay thin: extract, call the service, wrap the result in a
//! response envelope. Every error path goes through
//! [`crate::services::ServiceError`].

pub mod auth;
pub mod bootcamps;
pub mod courses;
pub mod reviews;
pub mod users;
