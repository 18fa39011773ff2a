//! Core domain types for authentication and sessions.

mod principal;
mod role;
mod session;
mod user;

pub use principal::Principal;
pub use role::Role;
pub use session::{Session, SessionInfo};
pub use user::{PublicUser, User};
