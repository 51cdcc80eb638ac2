//! Basecamp connector layer — resource resolution, dropdown option
//! builders, and operation dispatch.
//!
//! Built on [`basecamp_client`], this crate adds the Basecamp-aware
//! pieces a workflow-automation host needs:
//!
//! - [`dock`]: locating a project's enabled tools (to-do set, message
//!   board, chat, vault, schedule, questionnaire, card table) by
//!   scanning its dock, including the bucket/todoset id pair embedded
//!   in the todoset URL.
//! - [`options`]: one builder per selectable resource kind, composing
//!   dock resolution with an exhaustive pagination walk into the
//!   `{name, value}` pairs a dependent dropdown needs.
//! - [`operation`]: the closed (resource, action) dispatch table the
//!   execution path uses, which talks to the API directly and never
//!   through the dock.
//!
//! The host supplies chosen parameter values through
//! [`ParameterSource`]; nothing here depends on a particular host's
//! execution model.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use basecamp_client::{BasecampClient, BasecampConfig, StaticToken};
//! use basecamp_connector::{options, StaticParameters};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = BasecampClient::new(
//!     BasecampConfig::default(),
//!     Arc::new(StaticToken::new("host-managed-token")),
//! )?;
//! let ctx = StaticParameters::new()
//!     .with("accountId", "9999")
//!     .with("projectId", "123");
//! let todolists = options::list_todolists(&client, &ctx).await?;
//! # Ok(())
//! # }
//! ```

mod context;
pub mod dock;
mod error;
pub mod operation;
pub mod options;

pub use context::{ParameterSource, StaticParameters};
pub use dock::{DockEntry, DockTool, TodosetRef};
pub use error::{ConnectorError, ConnectorResult};
pub use operation::{execute, list_contract, Action, OperationRequest, Resource};
pub use options::OptionEntry;
