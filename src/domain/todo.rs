use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entity::Entity;
use crate::error::AppError;

pub const NAME_MAX_LEN: usize = 100;
pub const EMAIL_MAX_LEN: usize = 255;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("invalid email pattern"));

/// Store identifier for a [`Todo`]. The nil UUID marks a record that has
/// not been persisted yet; the store assigns a real identifier on save.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TodoId(pub Uuid);

impl TodoId {
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::nil()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub name: String,
    pub email: String,
    pub date: DateTime<Utc>,
    pub done: bool,
}

impl Todo {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("name is required"));
        }
        if self.name.chars().count() > NAME_MAX_LEN {
            return Err(AppError::validation(format!(
                "name must be at most {NAME_MAX_LEN} characters"
            )));
        }
        validate_email(&self.email)
    }
}

pub fn validate_email(email: &str) -> Result<(), AppError> {
    if email.is_empty() {
        return Err(AppError::validation("email is required"));
    }
    if email.chars().count() > EMAIL_MAX_LEN {
        return Err(AppError::validation(format!(
            "email must be at most {EMAIL_MAX_LEN} characters"
        )));
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Err(AppError::validation("email is not a valid address"));
    }
    Ok(())
}

/// Predicates the store understands for [`Todo`] lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoFilter {
    All,
    ById(TodoId),
    ByEmail(String),
}

impl Entity for Todo {
    type Id = TodoId;
    type Filter = TodoFilter;

    const COLLECTION: &'static str = "todo";

    fn id(&self) -> &TodoId {
        &self.id
    }

    fn is_new(&self) -> bool {
        self.id.is_nil()
    }

    fn assign_fresh_id(&mut self) {
        self.id = TodoId(Uuid::new_v4());
    }

    fn by_id(id: TodoId) -> TodoFilter {
        TodoFilter::ById(id)
    }

    fn matches(&self, filter: &TodoFilter) -> bool {
        match filter {
            TodoFilter::All => true,
            TodoFilter::ById(id) => self.id == *id,
            TodoFilter::ByEmail(email) => self.email == *email,
        }
    }

    fn filter_id(filter: &TodoFilter) -> Option<&TodoId> {
        match filter {
            TodoFilter::ById(id) => Some(id),
            _ => None,
        }
    }

    fn group_key(&self) -> Option<String> {
        Some(format!("user_todos:{}", self.email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(name: &str, email: &str) -> Todo {
        Todo {
            id: TodoId::nil(),
            name: name.to_string(),
            email: email.to_string(),
            date: Utc::now(),
            done: false,
        }
    }

    #[test]
    fn valid_todo_passes() {
        assert!(todo("Buy milk", "a@b.com").validate().is_ok());
    }

    #[test]
    fn blank_name_rejected() {
        assert!(matches!(
            todo("  ", "a@b.com").validate(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn overlong_name_rejected() {
        let name = "x".repeat(NAME_MAX_LEN + 1);
        assert!(todo(&name, "a@b.com").validate().is_err());
    }

    #[test]
    fn malformed_email_rejected() {
        for email in ["", "plainaddress", "missing@tld", "a b@c.com"] {
            assert!(todo("task", email).validate().is_err(), "{email}");
        }
    }

    #[test]
    fn overlong_email_rejected() {
        let email = format!("{}@example.com", "x".repeat(EMAIL_MAX_LEN));
        assert!(todo("task", &email).validate().is_err());
    }

    #[test]
    fn nil_id_marks_new() {
        let mut t = todo("task", "a@b.com");
        assert!(t.is_new());
        t.assign_fresh_id();
        assert!(!t.is_new());
    }

    #[test]
    fn filters_match_expected_rows() {
        let mut t = todo("task", "a@b.com");
        t.assign_fresh_id();

        assert!(t.matches(&TodoFilter::All));
        assert!(t.matches(&TodoFilter::ById(t.id)));
        assert!(!t.matches(&TodoFilter::ById(TodoId(Uuid::new_v4()))));
        assert!(t.matches(&TodoFilter::ByEmail("a@b.com".into())));
        assert!(!t.matches(&TodoFilter::ByEmail("other@b.com".into())));
    }

    #[test]
    fn group_key_tracks_email() {
        let t = todo("task", "a@b.com");
        assert_eq!(t.group_key().as_deref(), Some("user_todos:a@b.com"));
    }
}
