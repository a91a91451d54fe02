//! Shared building blocks for the Odoo timer client.
//!
//! - `types`: connection parameters, the session identity and work items
//! - `errors`: the failure taxonomy reported to callers
//! - `settings`: transport and query tuning loaded from YAML

pub mod errors;
pub mod settings;
pub mod types;

pub use errors::{RecordSkip, SessionError, SettingsError};
pub use settings::{ClientSettings, DEFAULT_TASK_LIMIT};
pub use types::{ConnectionConfig, SessionIdentity, WorkItem, JSONRPC_PATH};
