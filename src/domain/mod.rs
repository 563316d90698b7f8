//! Domain aggregates exposed by the service layer.

pub mod bootcamp;
pub mod course;
pub mod review;
pub mod user;
