use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};

use crate::server::MockState;

fn reply(id: &Value, payload: Value) -> Response {
    let mut body = json!({"jsonrpc": "2.0", "id": id});
    if let (Some(body), Some(payload)) = (body.as_object_mut(), payload.as_object()) {
        body.extend(payload.clone());
    }
    (StatusCode::OK, [(header::CONTENT_TYPE, "application/json")], body.to_string()).into_response()
}

fn fault(id: &Value, name: &str, message: &str) -> Response {
    reply(
        id,
        json!({"error": {
            "code": 200,
            "message": "Odoo Server Error",
            "data": {"name": name, "message": message}
        }}),
    )
}

pub async fn jsonrpc_handler(State(state): State<MockState>, body: String) -> Response {
    let payload: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    log::debug!("Mock Odoo server received: {}", payload);
    state.requests.lock().unwrap().push(payload.clone());

    let queued = state.raw_responses.lock().unwrap().pop_front();
    if let Some(raw) = queued {
        log::debug!("Mock Odoo server replying with queued body");
        return (StatusCode::OK, raw).into_response();
    }

    let id = payload.get("id").cloned().unwrap_or(Value::Null);
    let params = &payload["params"];
    let args = params["args"].as_array().cloned().unwrap_or_default();
    let fixture = &state.fixture;

    match (params["service"].as_str(), params["method"].as_str()) {
        (Some("common"), Some("login")) => {
            let arg = |i: usize| args.get(i).and_then(Value::as_str).unwrap_or_default();
            if fixture.accepts_login(arg(0), arg(1), arg(2)) {
                reply(&id, json!({"result": fixture.user_id}))
            } else {
                reply(&id, json!({"result": false}))
            }
        }
        (Some("object"), Some("execute_kw")) => {
            let database = args.first().and_then(Value::as_str).unwrap_or_default();
            let user_id = args.get(1).and_then(Value::as_i64).unwrap_or_default();
            let api_token = args.get(2).and_then(Value::as_str).unwrap_or_default();
            if !fixture.accepts_call(database, user_id, api_token) {
                return fault(&id, "odoo.exceptions.AccessDenied", "Access Denied");
            }

            let model = args.get(3).and_then(Value::as_str);
            let method = args.get(4).and_then(Value::as_str);
            if model != Some("project.task") || method != Some("search_read") {
                return fault(&id, "builtins.KeyError", "Unsupported call");
            }

            let limit = args
                .get(6)
                .and_then(|kwargs| kwargs["limit"].as_u64())
                .map(|l| l as usize);
            reply(&id, json!({"result": fixture.search_read(limit)}))
        }
        _ => fault(&id, "builtins.KeyError", "Unknown service or method"),
    }
}
