//! Authentication and session-lifecycle core for the Komik backend.
//!
//! This crate implements credential registration and verification,
//! access/refresh token issuance, refresh-token rotation with
//! hashed-at-rest storage, per-device session tracking, and role-based
//! authorization gating. The surrounding content service consumes only
//! the authenticated [`types::Principal`] and the operation gate in
//! [`middleware::gate`].
//!
//! # Architecture
//!
//! - [`storage`]: repository traits for users and sessions, plus the
//!   in-memory backends used in development and tests. PostgreSQL
//!   backends live in the `komik-auth-postgres` crate.
//! - [`token`]: stateless signing and verification of access and
//!   refresh tokens, each with its own symmetric secret and TTL.
//! - [`password`]: Argon2id hashing for passwords and for refresh
//!   tokens at rest.
//! - [`service`]: the orchestrator composing the above into the
//!   register/login/refresh/logout flows and the rotation protocol.
//! - [`middleware`]: axum integration, covering the bearer-token
//!   extractor, the operation-policy gate, and error responses.

pub mod config;
pub mod error;
pub mod middleware;
pub mod password;
pub mod service;
pub mod storage;
pub mod token;
pub mod types;

pub use config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use service::AuthService;
pub use token::TokenService;
