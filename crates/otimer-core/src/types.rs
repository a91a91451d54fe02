//! Value types shared between the session client and its front ends

use crate::errors::SessionError;
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Path of the JSON-RPC endpoint below the server base address.
pub const JSONRPC_PATH: &str = "jsonrpc";

/// Connection parameters entered by the user for one run.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub base_url: String,
    pub database: String,
    pub username: String,
    pub api_token: String,
}

impl ConnectionConfig {
    pub fn new(
        base_url: impl Into<String>,
        database: impl Into<String>,
        username: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            database: database.into(),
            username: username.into(),
            api_token: api_token.into(),
        }
    }

    /// Resolve `{base_url}/jsonrpc`.
    ///
    /// The base address must itself be an http or https URL with a host; the
    /// endpoint path is appended only after that check. A trailing slash on
    /// the base address is tolerated.
    pub fn endpoint(&self) -> Result<Url, SessionError> {
        let base = self.base_url.trim();
        let mut url = Url::parse(base)
            .map_err(|e| SessionError::MalformedEndpoint(format!("{}: {}", base, e)))?;

        let has_host = url.host_str().is_some_and(|host| !host.is_empty());
        if !matches!(url.scheme(), "http" | "https") || !has_host {
            return Err(SessionError::MalformedEndpoint(base.to_string()));
        }

        url.path_segments_mut()
            .map_err(|_| SessionError::MalformedEndpoint(base.to_string()))?
            .pop_if_empty()
            .push(JSONRPC_PATH);
        Ok(url)
    }
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("base_url", &self.base_url)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

/// Identity issued by the server on a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub user_id: i64,
    #[serde(default)]
    pub session_token: Option<String>,
}

impl SessionIdentity {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            session_token: None,
        }
    }
}

/// One task row as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: i64,
    pub name: String,
    pub project_name: String,
}

impl WorkItem {
    /// Label in the `"<project>: <task>"` form used by menus and listings.
    pub fn menu_label(&self) -> String {
        format!("{}: {}", self.project_name, self.name)
    }
}
