#[cfg(test)]
mod tests {
    use super::super::commands::{DeleteTodo, SaveTodo};
    use super::super::handlers::{DeleteHandler, GetAllHandler, GetByIdHandler, SaveHandler};
    use super::super::mediator::{Mediator, Request, RequestKind, Response, build_mediator};
    use super::super::queries::{GetTodoById, GetTodos};
    use crate::domain::entity::Entity;
    use crate::domain::repository::Repository;
    use crate::domain::todo::{Todo, TodoFilter, TodoId};
    use crate::error::AppError;
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    #[derive(Default)]
    struct InMemoryRepo {
        items: Mutex<HashMap<TodoId, Todo>>,
    }

    #[async_trait]
    impl Repository<Todo> for InMemoryRepo {
        async fn get(&self, filter: TodoFilter) -> Result<Vec<Todo>, AppError> {
            let items = self.items.lock().unwrap();
            Ok(items.values().filter(|t| t.matches(&filter)).cloned().collect())
        }

        async fn save(&self, mut entity: Todo) -> Result<Todo, AppError> {
            let mut items = self.items.lock().unwrap();
            if entity.is_new() {
                entity.assign_fresh_id();
            } else if !items.contains_key(&entity.id) {
                return Err(AppError::NotFound);
            }
            items.insert(entity.id, entity.clone());
            Ok(entity)
        }

        async fn delete(&self, id: TodoId) -> Result<Option<Todo>, AppError> {
            Ok(self.items.lock().unwrap().remove(&id))
        }
    }

    fn repo() -> Arc<dyn Repository<Todo>> {
        Arc::new(InMemoryRepo::default())
    }

    fn save_command(email: &str, date: DateTime<Utc>) -> SaveTodo {
        SaveTodo {
            id: None,
            name: "task".to_string(),
            email: email.to_string(),
            date,
            done: false,
        }
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, d, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn save_assigns_identifier_to_new_todo() {
        let handler = SaveHandler::new(repo());
        let saved = handler.handle(save_command("a@b.com", day(1))).await.unwrap();
        assert!(!saved.id.is_nil());
        assert_eq!(saved.email, "a@b.com");
    }

    #[tokio::test]
    async fn save_rejects_invalid_input() {
        let handler = SaveHandler::new(repo());
        let mut command = save_command("not-an-email", day(1));
        let result = handler.handle(command.clone()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        command.email = "a@b.com".to_string();
        command.name = String::new();
        assert!(handler.handle(command).await.is_err());
    }

    #[tokio::test]
    async fn save_replaces_existing_todo() {
        let repo = repo();
        let handler = SaveHandler::new(repo.clone());
        let saved = handler.handle(save_command("a@b.com", day(1))).await.unwrap();

        let update = SaveTodo {
            id: Some(saved.id),
            name: "task".to_string(),
            email: "a@b.com".to_string(),
            date: day(1),
            done: true,
        };
        let updated = handler.handle(update).await.unwrap();
        assert_eq!(updated.id, saved.id);
        assert!(updated.done);

        let stored = repo.get_by_id(saved.id).await.unwrap().unwrap();
        assert!(stored.done);
    }

    #[tokio::test]
    async fn delete_unknown_id_returns_none_without_error() {
        let handler = DeleteHandler::new(repo());
        let result = handler
            .handle(DeleteTodo { id: TodoId(Uuid::new_v4()) })
            .await
            .unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn delete_returns_removed_todo() {
        let repo = repo();
        let saved = SaveHandler::new(repo.clone())
            .handle(save_command("a@b.com", day(1)))
            .await
            .unwrap();

        let deleted = DeleteHandler::new(repo)
            .handle(DeleteTodo { id: saved.id })
            .await
            .unwrap();
        assert_eq!(deleted, Some(saved));
    }

    #[tokio::test]
    async fn get_by_id_unknown_is_not_found() {
        let handler = GetByIdHandler::new(repo());
        let result = handler
            .handle(GetTodoById { id: TodoId(Uuid::new_v4()) })
            .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn get_all_filters_by_email_and_orders_by_date() {
        let repo = repo();
        let save = SaveHandler::new(repo.clone());
        save.handle(save_command("a@b.com", day(3))).await.unwrap();
        save.handle(save_command("a@b.com", day(1))).await.unwrap();
        save.handle(save_command("other@b.com", day(2))).await.unwrap();

        let todos = GetAllHandler::new(repo)
            .handle(GetTodos { email: Some("a@b.com".to_string()) })
            .await
            .unwrap();

        assert_eq!(todos.len(), 2);
        assert!(todos.iter().all(|t| t.email == "a@b.com"));
        assert_eq!(todos[0].date, day(1));
        assert_eq!(todos[1].date, day(3));
    }

    #[tokio::test]
    async fn get_all_without_email_returns_everything() {
        let repo = repo();
        let save = SaveHandler::new(repo.clone());
        save.handle(save_command("a@b.com", day(2))).await.unwrap();
        save.handle(save_command("other@b.com", day(1))).await.unwrap();

        let todos = GetAllHandler::new(repo)
            .handle(GetTodos { email: None })
            .await
            .unwrap();
        assert_eq!(todos.len(), 2);
        assert!(todos[0].date <= todos[1].date);
    }

    #[tokio::test]
    async fn get_all_unknown_email_returns_empty_vec() {
        let todos = GetAllHandler::new(repo())
            .handle(GetTodos { email: Some("nobody@b.com".to_string()) })
            .await
            .unwrap();
        assert!(todos.is_empty());
    }

    #[tokio::test]
    async fn mediator_routes_each_request_kind() {
        let mediator = build_mediator(repo()).unwrap();

        let response = mediator
            .send(Request::Save(save_command("a@b.com", day(1))))
            .await
            .unwrap();
        let Response::Todo(saved) = response else {
            panic!("save should return a todo");
        };

        let response = mediator
            .send(Request::GetById(GetTodoById { id: saved.id }))
            .await
            .unwrap();
        assert!(matches!(response, Response::Todo(_)));

        let response = mediator
            .send(Request::GetAll(GetTodos { email: Some("a@b.com".to_string()) }))
            .await
            .unwrap();
        let Response::Todos(todos) = response else {
            panic!("list should return todos");
        };
        assert_eq!(todos.len(), 1);

        let response = mediator
            .send(Request::Delete(DeleteTodo { id: saved.id }))
            .await
            .unwrap();
        assert!(matches!(response, Response::MaybeTodo(Some(_))));
    }

    #[tokio::test]
    async fn incomplete_registry_fails_at_build() {
        let result = Mediator::builder()
            .register(RequestKind::Save, |_| async {
                Err::<Response, _>(AppError::internal("unused"))
            })
            .build();
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
