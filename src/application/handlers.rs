use std::sync::Arc;

use crate::domain::repository::Repository;
use crate::domain::todo::{Todo, TodoFilter};
use crate::error::AppError;

use super::commands::{DeleteTodo, SaveTodo};
use super::queries::{GetTodoById, GetTodos};

/// Maps the command into a [`Todo`], validates it and upserts. Repository
/// errors are logged and propagate unmasked.
#[derive(Clone)]
pub struct SaveHandler {
    repo: Arc<dyn Repository<Todo>>,
}

impl SaveHandler {
    pub fn new(repo: Arc<dyn Repository<Todo>>) -> Self {
        Self { repo }
    }

    pub async fn handle(&self, command: SaveTodo) -> Result<Todo, AppError> {
        let todo = Todo {
            id: command.id.unwrap_or_default(),
            name: command.name,
            email: command.email,
            date: command.date,
            done: command.done,
        };
        todo.validate()?;

        tracing::info!(id = %todo.id, email = %todo.email, "saving todo");
        let saved = self.repo.save(todo).await.inspect_err(|e| {
            tracing::error!(error = %e, "failed to save todo");
        })?;
        tracing::info!(id = %saved.id, "saved todo");
        Ok(saved)
    }
}

/// Removes by identifier and returns whatever the repository returns,
/// including `None` for an unknown identifier.
#[derive(Clone)]
pub struct DeleteHandler {
    repo: Arc<dyn Repository<Todo>>,
}

impl DeleteHandler {
    pub fn new(repo: Arc<dyn Repository<Todo>>) -> Self {
        Self { repo }
    }

    pub async fn handle(&self, command: DeleteTodo) -> Result<Option<Todo>, AppError> {
        self.repo.delete(command.id).await
    }
}

#[derive(Clone)]
pub struct GetByIdHandler {
    repo: Arc<dyn Repository<Todo>>,
}

impl GetByIdHandler {
    pub fn new(repo: Arc<dyn Repository<Todo>>) -> Self {
        Self { repo }
    }

    pub async fn handle(&self, query: GetTodoById) -> Result<Todo, AppError> {
        self.repo
            .get_by_id(query.id)
            .await?
            .ok_or(AppError::NotFound)
    }
}

/// Lists todos, ordered by due date ascending. Ordering happens here, not
/// in the store.
#[derive(Clone)]
pub struct GetAllHandler {
    repo: Arc<dyn Repository<Todo>>,
}

impl GetAllHandler {
    pub fn new(repo: Arc<dyn Repository<Todo>>) -> Self {
        Self { repo }
    }

    pub async fn handle(&self, query: GetTodos) -> Result<Vec<Todo>, AppError> {
        let filter = match query.email {
            Some(email) => TodoFilter::ByEmail(email),
            None => TodoFilter::All,
        };
        let mut todos = self.repo.get(filter).await?;
        todos.sort_by_key(|t| t.date);
        Ok(todos)
    }
}
