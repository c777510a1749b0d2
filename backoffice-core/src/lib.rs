//! backoffice-core: shared infrastructure for the accounts back office.
pub mod error;
pub mod middleware;
pub mod observability;

pub use axum;
pub use tracing;
pub use validator;
