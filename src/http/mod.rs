//! HTTP surface of the registry service

pub mod error;
pub mod routes;

pub use error::AppError;
pub use routes::build_router;
