//! Storage traits for users and sessions.
//!
//! Backends implement these traits and are injected into
//! [`crate::service::AuthService`] at construction time. The in-memory
//! backends here back development and tests; PostgreSQL backends live
//! in the `komik-auth-postgres` crate.

mod memory;
mod session;
mod user;

pub use memory::{MemorySessionStorage, MemoryUserStorage};
pub use session::SessionStorage;
pub use user::UserStorage;
