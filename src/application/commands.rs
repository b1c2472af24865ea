use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::todo::TodoId;

/// Create or replace a todo. A missing identifier creates a new record;
/// a present one replaces the stored record with that identifier.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveTodo {
    #[serde(default)]
    pub id: Option<TodoId>,
    pub name: String,
    pub email: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub done: bool,
}

#[derive(Debug, Clone)]
pub struct DeleteTodo {
    pub id: TodoId,
}
