use std::sync::Arc;

use axum::http::StatusCode;
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::application::commands::{DeleteTodo, SaveTodo};
use crate::application::mediator::{Mediator, Request, Response};
use crate::application::queries::{GetTodoById, GetTodos};
use crate::domain::todo::{Todo, TodoId, validate_email};
use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub mediator: Arc<Mediator>,
    pub api_key: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/todos/", post(create_todo))
        .route(
            "/api/todos/:id",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .route("/api/todos/user/:email", get(list_todos_for_user))
        .with_state(state)
}

async fn create_todo(
    State(state): State<AppState>,
    Json(mut command): Json<SaveTodo>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    // POST always creates; any identifier in the body is ignored.
    command.id = None;
    match state.mediator.send(Request::Save(command)).await? {
        Response::Todo(todo) => Ok((StatusCode::CREATED, Json(todo))),
        other => Err(unexpected(other)),
    }
}

async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut command): Json<SaveTodo>,
) -> Result<Json<Todo>, AppError> {
    let id = parse_id(&id)?;
    if let Some(body_id) = command.id {
        if body_id != id {
            return Err(AppError::validation(
                "ID in URL does not match ID in request body",
            ));
        }
    }
    command.id = Some(id);
    match state.mediator.send(Request::Save(command)).await? {
        Response::Todo(todo) => Ok(Json(todo)),
        other => Err(unexpected(other)),
    }
}

async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, AppError> {
    let id = parse_id(&id)?;
    match state.mediator.send(Request::GetById(GetTodoById { id })).await? {
        Response::Todo(todo) => Ok(Json(todo)),
        other => Err(unexpected(other)),
    }
}

async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, AppError> {
    let id = parse_id(&id)?;
    match state.mediator.send(Request::Delete(DeleteTodo { id })).await? {
        Response::MaybeTodo(Some(todo)) => Ok(Json(todo)),
        Response::MaybeTodo(None) => Err(AppError::NotFound),
        other => Err(unexpected(other)),
    }
}

async fn list_todos_for_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Todo>>, AppError> {
    validate_email(&email)?;
    let query = GetTodos { email: Some(email) };
    match state.mediator.send(Request::GetAll(query)).await? {
        Response::Todos(todos) => Ok(Json(todos)),
        other => Err(unexpected(other)),
    }
}

fn parse_id(raw: &str) -> Result<TodoId, AppError> {
    Uuid::parse_str(raw)
        .map(TodoId)
        .map_err(|_| AppError::validation("invalid todo id"))
}

fn unexpected(response: Response) -> AppError {
    AppError::internal(format!("unexpected mediator response: {response:?}"))
}
