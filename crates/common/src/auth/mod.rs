//! Session token state and the seams around it
//!
//! The token pair is owned by [`TokenStore`] and mutated from exactly
//! three places: explicit login, explicit logout, and the refresh path
//! of the request pipeline. Everything else reads.
//!
//! # Module Organization
//!
//! - **[`types`]**: `TokenPair` and the `/users/refresh` wire response
//! - **[`traits`]**: `CredentialStorage` and `SessionHooks` seams
//! - **[`store`]**: the `TokenStore` single source of truth

pub mod store;
pub mod traits;
pub mod types;

pub use store::TokenStore;
pub use traits::{CredentialStorage, NoopSessionHooks, SessionHooks};
pub use types::{RefreshResponse, TokenPair};
