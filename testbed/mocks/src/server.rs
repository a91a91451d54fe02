use axum::{routing::post, Router};
use serde_json::Value;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use crate::fixtures::OdooFixture;
use crate::handlers::jsonrpc_handler;

#[derive(Clone)]
pub struct MockState {
    pub fixture: Arc<OdooFixture>,
    pub requests: Arc<Mutex<Vec<Value>>>,
    pub raw_responses: Arc<Mutex<VecDeque<String>>>,
}

pub struct MockOdooServer {
    addr: SocketAddr,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
    state: MockState,
}

impl MockOdooServer {
    pub async fn start(fixture: OdooFixture) -> anyhow::Result<Self> {
        let state = MockState {
            fixture: Arc::new(fixture),
            requests: Arc::new(Mutex::new(Vec::new())),
            raw_responses: Arc::new(Mutex::new(VecDeque::new())),
        };

        let app = Router::new()
            .route("/jsonrpc", post(jsonrpc_handler))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        log::info!("Mock Odoo server listening on {}", addr);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await;
            if let Err(e) = served {
                log::error!("Mock Odoo server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            shutdown_tx,
            state,
        })
    }

    /// Base address to put into a `ConnectionConfig`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Answer the next request with `body` verbatim instead of the fixture.
    pub fn queue_raw_response(&self, body: impl Into<String>) {
        self.state.raw_responses.lock().unwrap().push_back(body.into());
    }

    pub fn requests(&self) -> Vec<Value> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    pub async fn shutdown(self) {
        if self.shutdown_tx.send(()).is_err() {
            log::warn!("Mock Odoo server was already stopped");
        }
    }
}
