use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::domain::repository::Repository;
use crate::domain::todo::Todo;
use crate::error::AppError;

use super::commands::{DeleteTodo, SaveTodo};
use super::handlers::{DeleteHandler, GetAllHandler, GetByIdHandler, SaveHandler};
use super::queries::{GetTodoById, GetTodos};

/// A typed request routed through the mediator.
#[derive(Debug)]
pub enum Request {
    Save(SaveTodo),
    Delete(DeleteTodo),
    GetById(GetTodoById),
    GetAll(GetTodos),
}

#[derive(Debug)]
pub enum Response {
    Todo(Todo),
    MaybeTodo(Option<Todo>),
    Todos(Vec<Todo>),
}

/// Registry tag for one request type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Save,
    Delete,
    GetById,
    GetAll,
}

impl RequestKind {
    pub const ALL: [RequestKind; 4] = [
        RequestKind::Save,
        RequestKind::Delete,
        RequestKind::GetById,
        RequestKind::GetAll,
    ];
}

impl Request {
    pub fn kind(&self) -> RequestKind {
        match self {
            Request::Save(_) => RequestKind::Save,
            Request::Delete(_) => RequestKind::Delete,
            Request::GetById(_) => RequestKind::GetById,
            Request::GetAll(_) => RequestKind::GetAll,
        }
    }
}

type HandlerFuture = Pin<Box<dyn Future<Output = Result<Response, AppError>> + Send>>;
type BoxHandler = Box<dyn Fn(Request) -> HandlerFuture + Send + Sync>;

/// Routes each request to exactly one handler registered for its kind.
/// No broadcast semantics: one kind, one handler, registered at startup.
pub struct Mediator {
    handlers: HashMap<RequestKind, BoxHandler>,
}

impl Mediator {
    pub fn builder() -> MediatorBuilder {
        MediatorBuilder::default()
    }

    pub async fn send(&self, request: Request) -> Result<Response, AppError> {
        let kind = request.kind();
        let handler = self.handlers.get(&kind).ok_or_else(|| {
            AppError::internal(format!("no handler registered for {kind:?}"))
        })?;
        handler(request).await
    }
}

#[derive(Default)]
pub struct MediatorBuilder {
    handlers: HashMap<RequestKind, BoxHandler>,
}

impl MediatorBuilder {
    /// Later registrations for the same kind replace earlier ones.
    pub fn register<F, Fut>(mut self, kind: RequestKind, handler: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, AppError>> + Send + 'static,
    {
        self.handlers
            .insert(kind, Box::new(move |request| Box::pin(handler(request))));
        self
    }

    /// Fails when any request kind lacks a handler; an incomplete registry
    /// is a configuration error, caught at startup rather than first use.
    pub fn build(self) -> Result<Mediator, AppError> {
        for kind in RequestKind::ALL {
            if !self.handlers.contains_key(&kind) {
                return Err(AppError::internal(format!(
                    "no handler registered for {kind:?}"
                )));
            }
        }
        Ok(Mediator {
            handlers: self.handlers,
        })
    }
}

fn mismatch(expected: RequestKind, got: &Request) -> AppError {
    AppError::internal(format!(
        "handler for {expected:?} received {:?} request",
        got.kind()
    ))
}

/// Wire the four todo handlers over one shared repository.
pub fn build_mediator(repo: Arc<dyn Repository<Todo>>) -> Result<Mediator, AppError> {
    let save = SaveHandler::new(repo.clone());
    let delete = DeleteHandler::new(repo.clone());
    let get_by_id = GetByIdHandler::new(repo.clone());
    let get_all = GetAllHandler::new(repo);

    Mediator::builder()
        .register(RequestKind::Save, move |request| {
            let handler = save.clone();
            async move {
                match request {
                    Request::Save(command) => handler.handle(command).await.map(Response::Todo),
                    other => Err(mismatch(RequestKind::Save, &other)),
                }
            }
        })
        .register(RequestKind::Delete, move |request| {
            let handler = delete.clone();
            async move {
                match request {
                    Request::Delete(command) => {
                        handler.handle(command).await.map(Response::MaybeTodo)
                    }
                    other => Err(mismatch(RequestKind::Delete, &other)),
                }
            }
        })
        .register(RequestKind::GetById, move |request| {
            let handler = get_by_id.clone();
            async move {
                match request {
                    Request::GetById(query) => handler.handle(query).await.map(Response::Todo),
                    other => Err(mismatch(RequestKind::GetById, &other)),
                }
            }
        })
        .register(RequestKind::GetAll, move |request| {
            let handler = get_all.clone();
            async move {
                match request {
                    Request::GetAll(query) => handler.handle(query).await.map(Response::Todos),
                    other => Err(mismatch(RequestKind::GetAll, &other)),
                }
            }
        })
        .build()
}
