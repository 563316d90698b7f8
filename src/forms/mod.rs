//! Form definitions backing the API routes.
//!
//! Every body is validated with `validator` before it is converted into a
//! domain type; the messages on the rules are what the client sees.

pub mod auth;
pub mod bootcamp;
pub mod course;
pub mod review;
pub mod user;
