//! Authenticated HTTP client and exhaustive pagination for the
//! Basecamp API.
//!
//! This crate is the transport half of the Basecamp connector:
//!
//! - [`BasecampClient`] issues account-scoped JSON requests with bearer
//!   credentials supplied by a [`CredentialProvider`], translating every
//!   failure into a single [`BasecampError`].
//! - [`pagination`] exhaustively walks the API's two pagination
//!   contracts: `Link`-header cursors and implicit 50-item pages.
//!
//! OAuth2 token issuance, request-rate backoff, and id caching are
//! deliberately out of scope; those belong to the embedding host.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use basecamp_client::{BasecampClient, BasecampConfig, StaticToken};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = BasecampClient::new(
//!     BasecampConfig::default(),
//!     Arc::new(StaticToken::new("host-managed-token")),
//! )?;
//! let projects =
//!     basecamp_client::pagination::collect_by_link(&client, "/projects.json", "9999").await?;
//! # Ok(())
//! # }
//! ```

mod auth;
mod client;
mod config;
mod error;
pub mod pagination;

pub use auth::{CredentialProvider, RefreshingToken, StaticToken};
pub use client::BasecampClient;
pub use config::{
    BasecampConfig, DEFAULT_API_ORIGIN, DEFAULT_LAUNCHPAD_ORIGIN, DEFAULT_USER_AGENT,
};
pub use error::{BasecampError, BasecampResult};
pub use pagination::{PaginationContract, PAGE_SIZE};
