//! JSON-RPC envelope types for the Odoo `/jsonrpc` endpoint
//!
//! Requests are built from explicit records rather than ad-hoc maps so the
//! body shape is fixed at compile time. Responses go through `RpcResponse`,
//! which refuses anything that is not a JSON object carrying either `result`
//! or `error`.

use otimer_core::{ConnectionConfig, SessionError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const JSONRPC_VERSION: &str = "2.0";
/// Odoo tunnels every service call through the generic `call` method.
pub const CALL_METHOD: &str = "call";

pub const LOGIN_REQUEST_ID: u64 = 1;
pub const FETCH_TASKS_REQUEST_ID: u64 = 2;

pub const COMMON_SERVICE: &str = "common";
pub const OBJECT_SERVICE: &str = "object";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub id: u64,
    pub params: CallParams,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallParams {
    pub service: &'static str,
    pub method: &'static str,
    pub args: Vec<Value>,
}

/// Keyword arguments for a `search_read` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchReadOptions {
    pub fields: Vec<String>,
    pub limit: u32,
}

impl RpcRequest {
    fn call(id: u64, service: &'static str, method: &'static str, args: Vec<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method: CALL_METHOD,
            id,
            params: CallParams {
                service,
                method,
                args,
            },
        }
    }

    /// `common.login(db, username, token)`
    pub fn login(config: &ConnectionConfig) -> Self {
        Self::call(
            LOGIN_REQUEST_ID,
            COMMON_SERVICE,
            "login",
            vec![
                json!(config.database),
                json!(config.username),
                json!(config.api_token),
            ],
        )
    }

    /// `object.execute_kw(db, uid, token, model, method, args, kwargs)`
    pub fn execute_kw(
        id: u64,
        config: &ConnectionConfig,
        user_id: i64,
        model: &str,
        method: &str,
        args: Value,
        kwargs: Value,
    ) -> Self {
        Self::call(
            id,
            OBJECT_SERVICE,
            "execute_kw",
            vec![
                json!(config.database),
                json!(user_id),
                json!(config.api_token),
                json!(model),
                json!(method),
                args,
                kwargs,
            ],
        )
    }

    pub fn to_body(&self) -> Result<Vec<u8>, SessionError> {
        serde_json::to_vec(self)
            .map_err(|e| SessionError::Internal(format!("Failed to encode request: {}", e)))
    }
}

/// Error object returned by the server instead of a result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RpcFault {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<RpcFaultData>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RpcFaultData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl RpcFault {
    /// The most specific human-readable message the server gave.
    pub fn describe(&self) -> String {
        let detail = self
            .data
            .as_ref()
            .and_then(|d| d.message.as_deref())
            .filter(|m| !m.is_empty());
        match detail {
            Some(detail) => format!("{} ({})", detail, self.code),
            None => format!("{} ({})", self.message, self.code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcFault>,
}

impl RpcResponse {
    pub fn from_slice(body: &[u8]) -> Result<Self, SessionError> {
        let value: Value = serde_json::from_slice(body)?;
        if !value.is_object() {
            return Err(SessionError::Protocol(
                "response body is not a JSON object".to_string(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Take the `result` member, turning a server fault or an absent result
    /// into a protocol error.
    pub fn into_result(self) -> Result<Value, SessionError> {
        if let Some(fault) = self.error {
            return Err(SessionError::Protocol(format!(
                "server fault: {}",
                fault.describe()
            )));
        }
        self.result
            .ok_or_else(|| SessionError::Protocol("response has no result".to_string()))
    }
}

/// A login result is the numeric user id; anything else (Odoo answers
/// `false` for rejected credentials) is a failure.
pub fn decode_login_result(result: &Value) -> Result<i64, SessionError> {
    result.as_i64().ok_or_else(|| {
        SessionError::Protocol(format!("login result is not an integer user id: {}", result))
    })
}
