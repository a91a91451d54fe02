use serde_json::{json, Value};

/// Account and task data served by the mock.
#[derive(Debug, Clone)]
pub struct OdooFixture {
    pub database: String,
    pub username: String,
    pub api_token: String,
    pub user_id: i64,
    pub tasks: Vec<Value>,
}

impl OdooFixture {
    pub fn new(database: &str, username: &str, api_token: &str, user_id: i64) -> Self {
        Self {
            database: database.to_string(),
            username: username.to_string(),
            api_token: api_token.to_string(),
            user_id,
            tasks: Vec::new(),
        }
    }

    pub fn with_tasks(mut self, tasks: Vec<Value>) -> Self {
        self.tasks = tasks;
        self
    }

    /// Two good task rows and one without a name.
    pub fn demo() -> Self {
        Self::new("demo", "admin", "demo-token", 2).with_tasks(vec![
            json!({"id": 5, "name": "Fix bug", "project_id": [3, "Website"]}),
            json!({"id": 6, "project_id": [3, "Website"]}),
            json!({"id": 7, "name": "Quarterly report", "project_id": [4, "Finance"]}),
        ])
    }

    pub fn accepts_login(&self, database: &str, username: &str, api_token: &str) -> bool {
        self.database == database && self.username == username && self.api_token == api_token
    }

    pub fn accepts_call(&self, database: &str, user_id: i64, api_token: &str) -> bool {
        self.database == database && self.user_id == user_id && self.api_token == api_token
    }

    pub fn search_read(&self, limit: Option<usize>) -> Vec<Value> {
        let limit = limit.unwrap_or(self.tasks.len());
        self.tasks.iter().take(limit).cloned().collect()
    }
}
