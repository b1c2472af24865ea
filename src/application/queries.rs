use crate::domain::todo::TodoId;

#[derive(Debug, Clone)]
pub struct GetTodoById {
    pub id: TodoId,
}

/// List todos for one user, or every todo when `email` is `None`.
#[derive(Debug, Clone)]
pub struct GetTodos {
    pub email: Option<String>,
}
