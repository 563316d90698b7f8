//! Database models backing the repository layer.

pub mod bootcamp;
pub mod config;
pub mod course;
pub mod review;
pub mod user;
