//! Shared session and credential foundation for Ramble crates.
//!
//! This crate owns the single source of truth for the current session:
//! the [`auth::TokenStore`] holding the access/refresh token pair, the
//! [`auth::CredentialStorage`] seam for durable refresh-token
//! persistence, and the [`auth::SessionHooks`] seam through which the
//! rest of the application observes "tokens replaced" and "logged out"
//! transitions.
//!
//! Nothing in here performs network I/O; the request pipeline in
//! `ramble-api` consumes these capabilities.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;
pub mod error;
pub mod testing;

pub use auth::{
    CredentialStorage, NoopSessionHooks, RefreshResponse, SessionHooks, TokenPair, TokenStore,
};
pub use error::SessionError;
