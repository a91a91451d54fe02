//! Remote session client
//!
//! `SessionClient` has two states: no session, or a session holding the user
//! id issued by the last successful login together with the connection
//! parameters that produced it. Only `login` moves between them, and a failed
//! login leaves an existing session untouched.

use otimer_core::{ClientSettings, ConnectionConfig, SessionError, SessionIdentity, WorkItem};
use reqwest::Url;
use serde_json::Value;
use std::sync::Arc;

use crate::rpc::{decode_login_result, RpcRequest, RpcResponse};
use crate::tasks::{decode_task_result, fetch_tasks_request};
use crate::transport::{HttpTransport, RpcTransport};

#[derive(Debug, Clone)]
struct ActiveSession {
    config: ConnectionConfig,
    endpoint: Url,
    identity: SessionIdentity,
}

pub struct SessionClient {
    transport: Arc<dyn RpcTransport>,
    settings: ClientSettings,
    session: Option<ActiveSession>,
}

impl SessionClient {
    pub fn new(transport: Arc<dyn RpcTransport>, settings: ClientSettings) -> Self {
        Self {
            transport,
            settings,
            session: None,
        }
    }

    /// Client talking HTTP with the given settings.
    pub fn http(settings: ClientSettings) -> Result<Self, SessionError> {
        let transport = HttpTransport::new(&settings)?;
        Ok(Self::new(Arc::new(transport), settings))
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn identity(&self) -> Option<&SessionIdentity> {
        self.session.as_ref().map(|s| &s.identity)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Authenticate with `config` and keep the issued user id.
    ///
    /// Anything that goes wrong after the endpoint is resolved is reported as
    /// `LoginFailed`; the underlying cause is only logged.
    pub async fn login(&mut self, config: ConnectionConfig) -> Result<SessionIdentity, SessionError> {
        log::info!(
            "Logging in to {}/{} as {}",
            config.base_url,
            config.database,
            config.username
        );
        let endpoint = config.endpoint()?;

        let outcome = self
            .exchange(&endpoint, &RpcRequest::login(&config))
            .await
            .and_then(|result| decode_login_result(&result));
        let user_id = match outcome {
            Ok(user_id) => user_id,
            Err(e) => {
                log::warn!("Login to {} failed: {}", endpoint, e);
                return Err(SessionError::LoginFailed);
            }
        };

        let identity = SessionIdentity::new(user_id);
        log::info!("Logged in as user id {}", user_id);
        self.session = Some(ActiveSession {
            config,
            endpoint,
            identity: identity.clone(),
        });
        Ok(identity)
    }

    /// List the tasks visible to the logged-in user, up to the configured
    /// limit. Rows that cannot be decoded are left out.
    pub async fn fetch_tasks(&self) -> Result<Vec<WorkItem>, SessionError> {
        let session = self.session.as_ref().ok_or(SessionError::NotAuthenticated)?;

        let request = fetch_tasks_request(
            &session.config,
            session.identity.user_id,
            self.settings.task_limit,
        )?;
        let result = self.exchange(&session.endpoint, &request).await?;
        let parsed = decode_task_result(&result)?;

        if !parsed.skipped.is_empty() {
            log::warn!(
                "Skipped {} task row(s) that could not be decoded",
                parsed.skipped.len()
            );
            for (index, reason) in &parsed.skipped {
                log::debug!("Task row {} skipped: {}", index, reason);
            }
        }
        log::info!("Fetched {} task(s)", parsed.items.len());
        Ok(parsed.items)
    }

    async fn exchange(&self, endpoint: &Url, request: &RpcRequest) -> Result<Value, SessionError> {
        log::debug!(
            "Calling {}.{} (id {})",
            request.params.service,
            request.params.method,
            request.id
        );
        let body = self.transport.post_json(endpoint, request.to_body()?).await?;
        RpcResponse::from_slice(&body)?.into_result()
    }
}

impl std::fmt::Debug for SessionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionClient")
            .field("transport", &"<dyn RpcTransport>")
            .field("settings", &self.settings)
            .field("identity", &self.identity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedTransport;
    use serde_json::json;

    fn config() -> ConnectionConfig {
        ConnectionConfig::new("https://erp.example.com", "prod", "alice", "tok")
    }

    fn client(transport: &Arc<ScriptedTransport>) -> SessionClient {
        SessionClient::new(transport.clone(), ClientSettings::default())
    }

    #[tokio::test]
    async fn test_login_stores_user_id() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(json!({"result": 7}))]));
        let mut client = client(&transport);

        let identity = client.login(config()).await.unwrap();
        assert_eq!(identity, SessionIdentity::new(7));
        assert_eq!(client.identity().map(|i| i.user_id), Some(7));

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "https://erp.example.com/jsonrpc");
        assert_eq!(sent[0].1["params"]["args"], json!(["prod", "alice", "tok"]));
    }

    #[tokio::test]
    async fn test_string_user_id_fails_login() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(json!({"result": "7"}))]));
        let mut client = client(&transport);

        assert_eq!(client.login(config()).await, Err(SessionError::LoginFailed));
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn test_transport_failure_is_generic_login_failure() {
        let transport = Arc::new(ScriptedTransport::new(vec![Err(SessionError::Transport(
            "connection refused".to_string(),
        ))]));
        let mut client = client(&transport);

        assert_eq!(client.login(config()).await, Err(SessionError::LoginFailed));
    }

    #[tokio::test]
    async fn test_malformed_endpoint_skips_network() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let mut client = client(&transport);

        let err = client
            .login(ConnectionConfig::new("not a url", "prod", "alice", "tok"))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::MalformedEndpoint(_)));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_base_without_host_skips_network() {
        for base in ["http://", "http:", "https:"] {
            let transport = Arc::new(ScriptedTransport::new(vec![Ok(json!({"result": 7}))]));
            let mut client = client(&transport);

            let err = client
                .login(ConnectionConfig::new(base, "prod", "alice", "tok"))
                .await
                .unwrap_err();
            assert!(
                matches!(err, SessionError::MalformedEndpoint(_)),
                "{:?} gave {:?}",
                base,
                err
            );
            assert_eq!(transport.call_count(), 0, "{:?} reached the transport", base);
        }
    }

    #[tokio::test]
    async fn test_login_fault_is_generic_login_failure() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": 200, "message": "Odoo Server Error",
                      "data": {"name": "odoo.exceptions.AccessDenied", "message": "Access Denied"}}
        }))]));
        let mut client = client(&transport);

        assert_eq!(client.login(config()).await, Err(SessionError::LoginFailed));
        assert!(!client.is_authenticated());
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_before_login_skips_network() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let client = client(&transport);

        assert_eq!(client.fetch_tasks().await, Err(SessionError::NotAuthenticated));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_relogin_keeps_previous_session() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(json!({"result": 7})),
            Ok(json!({"result": false})),
        ]));
        let mut client = client(&transport);

        client.login(config()).await.unwrap();
        let mut other = config();
        other.username = "mallory".to_string();
        assert_eq!(client.login(other).await, Err(SessionError::LoginFailed));
        assert_eq!(client.identity().map(|i| i.user_id), Some(7));
    }

    #[tokio::test]
    async fn test_fetch_uses_session_config_and_limit() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(json!({"result": 7})),
            Ok(json!({"result": [
                {"id": 5, "name": "Fix bug", "project_id": [3, "Website"]},
                {"id": 6, "project_id": [3, "Website"]}
            ]})),
        ]));
        let settings = ClientSettings {
            task_limit: 10,
            ..ClientSettings::default()
        };
        let mut client = SessionClient::new(transport.clone(), settings);

        client.login(config()).await.unwrap();
        let tasks = client.fetch_tasks().await.unwrap();
        assert_eq!(
            tasks,
            vec![WorkItem {
                id: 5,
                name: "Fix bug".to_string(),
                project_name: "Website".to_string(),
            }]
        );

        let sent = transport.requests();
        assert_eq!(sent[1].1["id"], json!(2));
        assert_eq!(sent[1].1["params"]["args"][1], json!(7));
        assert_eq!(sent[1].1["params"]["args"][6]["limit"], json!(10));
    }

    #[tokio::test]
    async fn test_fetch_surfaces_server_fault() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(json!({"result": 7})),
            Ok(json!({"error": {"code": 200, "message": "Odoo Server Error",
                                "data": {"message": "Access Denied"}}})),
        ]));
        let mut client = client(&transport);

        client.login(config()).await.unwrap();
        assert_eq!(
            client.fetch_tasks().await,
            Err(SessionError::Protocol("server fault: Access Denied (200)".to_string()))
        );
    }
}
