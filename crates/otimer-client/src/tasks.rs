//! Task listing query and row decoding
//!
//! Rows that do not look like a task (no integer `id`, no string `name`, or a
//! `project_id` without a trailing display name) are left out of the listing.
//! Odoo sends `project_id: false` for tasks without a project, so those rows
//! are skipped as well.

use otimer_core::{ConnectionConfig, RecordSkip, SessionError, WorkItem};
use serde_json::Value;

use crate::rpc::{RpcRequest, SearchReadOptions, FETCH_TASKS_REQUEST_ID};

pub const TASK_MODEL: &str = "project.task";
pub const SEARCH_READ: &str = "search_read";
pub const TASK_FIELDS: [&str; 2] = ["name", "project_id"];

/// Outcome of decoding one `search_read` result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTasks {
    pub items: Vec<WorkItem>,
    pub skipped: Vec<(usize, RecordSkip)>,
}

pub fn fetch_tasks_request(
    config: &ConnectionConfig,
    user_id: i64,
    limit: u32,
) -> Result<RpcRequest, SessionError> {
    let options = SearchReadOptions {
        fields: TASK_FIELDS.iter().map(|f| f.to_string()).collect(),
        limit,
    };
    let kwargs = serde_json::to_value(options)
        .map_err(|e| SessionError::Internal(format!("Failed to encode query options: {}", e)))?;
    Ok(RpcRequest::execute_kw(
        FETCH_TASKS_REQUEST_ID,
        config,
        user_id,
        TASK_MODEL,
        SEARCH_READ,
        // empty domain: every task the user may read
        Value::Array(Vec::new()),
        kwargs,
    ))
}

pub fn parse_work_item(row: &Value) -> Result<WorkItem, RecordSkip> {
    let record = row.as_object().ok_or(RecordSkip::NotAnObject)?;

    let id = record
        .get("id")
        .and_then(Value::as_i64)
        .ok_or(RecordSkip::MissingId)?;
    let name = record
        .get("name")
        .and_then(Value::as_str)
        .ok_or(RecordSkip::MissingName)?;
    let project_name = record
        .get("project_id")
        .and_then(Value::as_array)
        .and_then(|pair| pair.last())
        .and_then(Value::as_str)
        .ok_or(RecordSkip::MissingProject)?;

    Ok(WorkItem {
        id,
        name: name.to_string(),
        project_name: project_name.to_string(),
    })
}

pub fn parse_work_items(rows: &[Value]) -> ParsedTasks {
    let mut parsed = ParsedTasks::default();
    for (index, row) in rows.iter().enumerate() {
        match parse_work_item(row) {
            Ok(item) => parsed.items.push(item),
            Err(reason) => parsed.skipped.push((index, reason)),
        }
    }
    parsed
}

/// Decode the `result` of a task listing. The result itself must be an
/// array; individual rows are filtered by `parse_work_items`.
pub fn decode_task_result(result: &Value) -> Result<ParsedTasks, SessionError> {
    let rows = result.as_array().ok_or_else(|| {
        SessionError::Protocol(format!("task result is not a list: {}", type_name(result)))
    })?;
    Ok(parse_work_items(rows))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
