//! Axum integration: bearer extraction, the operation gate, and error
//! responses.

pub mod auth;
pub mod error;
pub mod gate;

pub use auth::{AuthState, BearerAuth};
pub use gate::{OperationPolicy, PolicyTable};
