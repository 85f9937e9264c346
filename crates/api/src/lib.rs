//! # Ramble API client
//!
//! Authenticated request pipeline for the Ramble events & activities
//! backend.
//!
//! # Architecture
//!
//! ```text
//! caller
//!   └──► RetryDriver          (bounded retries + backoff)
//!          └──► ReauthCoordinator   (single-flight 401 refresh)
//!                 └──► RequestExecutor   (one request, headers attached)
//!                        └──► network
//! ```
//!
//! The [`ApiClient`] facade composes the three layers over a shared
//! [`ramble_common::TokenStore`]. Feature code only sees terminal
//! results; token refresh, replay, and retry all happen inside.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ramble_api::{ApiClient, ApiConfig};
//! use ramble_common::testing::MemoryCredentialStorage;
//!
//! # #[derive(serde::Deserialize)]
//! # struct Event { title: String }
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::builder()
//!         .config(ApiConfig::new("https://api.ramble.example/v1").with_locale("fr"))
//!         .storage(Arc::new(MemoryCredentialStorage::default()))
//!         .build()
//!         .await?;
//!
//!     let events: Vec<Event> = client.get("/events").await?;
//!     println!("{} upcoming events", events.len());
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod client;
pub mod config;
pub mod errors;
pub mod executor;
pub mod reauth;
pub mod request;
pub mod retry;

pub use client::{ApiClient, ApiClientBuilder};
pub use config::ApiConfig;
pub use errors::{ApiError, ApiErrorCategory};
pub use executor::RequestExecutor;
pub use reauth::ReauthCoordinator;
pub use request::RequestDescriptor;
pub use retry::RetryDriver;
