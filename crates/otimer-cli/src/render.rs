use otimer_core::{SessionError, WorkItem};

/// Lines shown for a task listing: one per task, or a single error line.
pub fn listing_lines(outcome: &Result<Vec<WorkItem>, SessionError>) -> Vec<String> {
    match outcome {
        Ok(items) if items.is_empty() => vec!["No tasks assigned".to_string()],
        Ok(items) => items.iter().map(WorkItem::menu_label).collect(),
        Err(e) => vec![format!("Error: {}", e)],
    }
}
