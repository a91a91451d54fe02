use async_trait::async_trait;
use otimer_core::SessionError;
use reqwest::Url;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::transport::RpcTransport;

/// Transport that replays canned response bodies and records what was sent.
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<Value, SessionError>>>,
    requests: Mutex<Vec<(String, Value)>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Result<Value, SessionError>>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from(responses)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl RpcTransport for ScriptedTransport {
    async fn post_json(&self, endpoint: &Url, body: Vec<u8>) -> Result<Vec<u8>, SessionError> {
        let sent: Value = serde_json::from_slice(&body).unwrap();
        self.requests
            .lock()
            .unwrap()
            .push((endpoint.to_string(), sent));

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(value)) => Ok(serde_json::to_vec(&value).unwrap()),
            Some(Err(e)) => Err(e),
            None => Err(SessionError::Transport("no scripted response left".to_string())),
        }
    }
}
