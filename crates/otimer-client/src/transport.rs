use async_trait::async_trait;
use otimer_core::{ClientSettings, SessionError};
use reqwest::{Client, Url};

/// Moves an encoded JSON-RPC request to the server and returns the raw body.
///
/// Decoding stays with the caller so every transport fails the same way on a
/// malformed response.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn post_json(&self, endpoint: &Url, body: Vec<u8>) -> Result<Vec<u8>, SessionError>;
}

/// HTTP transport backed by a shared reqwest client
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(settings: &ClientSettings) -> Result<Self, SessionError> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .user_agent(&settings.user_agent)
            .build()
            .map_err(|e| SessionError::Internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn post_json(&self, endpoint: &Url, body: Vec<u8>) -> Result<Vec<u8>, SessionError> {
        log::debug!("POST {} ({} bytes)", endpoint, body.len());

        let response = self
            .client
            .post(endpoint.clone())
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::Transport(format!(
                "{} answered with HTTP {}",
                endpoint, status
            )));
        }

        let bytes = response.bytes().await?;
        log::debug!("Received {} bytes from {}", bytes.len(), endpoint);
        Ok(bytes.to_vec())
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("client", &"<reqwest::Client>")
            .finish()
    }
}
