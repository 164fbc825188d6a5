//! REST surface over the todo store.
//!
//! Handlers only parse, call one repository operation under the store lock,
//! and turn the outcome into a response.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::app::App;
use crate::domain::todo::{Todo, TodoId};
use crate::usecase::validation::TodoBody;

mod error;

pub use error::ApiError;

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: TodoId,
}

pub fn router(app: App) -> Router {
    Router::new()
        .route(
            "/todos",
            get(list_todos).post(create_todo).fallback(route_not_found),
        )
        .route(
            "/todos/:id",
            get(get_todo)
                .put(update_todo)
                .delete(delete_todo)
                .fallback(route_not_found),
        )
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}

/// Ids are positive integers; anything else can never match a record.
fn parse_id(raw: &str) -> Result<TodoId, ApiError> {
    raw.parse::<TodoId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::TodoNotFound(raw.to_string()))
}

async fn list_todos(State(app): State<App>) -> Json<Vec<Todo>> {
    Json(app.with_repo(|repo| repo.all()).await)
}

async fn get_todo(State(app): State<App>, Path(raw): Path<String>) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&raw)?;
    let todo = app.with_repo(|repo| repo.get(id)).await?;
    Ok(Json(todo))
}

async fn create_todo(
    State(app): State<App>,
    Json(body): Json<TodoBody>,
) -> Result<(StatusCode, Json<Created>), ApiError> {
    let fields = app.policy.apply(body).map_err(ApiError::BadRequest)?;
    let todo = app
        .with_repo(|repo| repo.add(fields.title, fields.description))
        .await?;
    tracing::info!(id = todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(Created { id: todo.id })))
}

async fn update_todo(
    State(app): State<App>,
    Path(raw): Path<String>,
    Json(body): Json<TodoBody>,
) -> Result<String, ApiError> {
    let id = parse_id(&raw)?;
    let fields = app.policy.apply(body).map_err(ApiError::BadRequest)?;
    let todo = app
        .with_repo(|repo| repo.update(id, fields.title, fields.description, fields.completed))
        .await?;
    tracing::info!(id = todo.id, completed = todo.completed, "todo updated");
    Ok(format!("TODO item with id {id} updated"))
}

async fn delete_todo(State(app): State<App>, Path(raw): Path<String>) -> Result<String, ApiError> {
    let id = parse_id(&raw)?;
    app.with_repo(|repo| repo.delete(id)).await?;
    tracing::info!(id, "todo deleted");
    Ok(format!("TODO item with id {id} deleted"))
}

async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::repo::json_file::JsonFileTodoRepo;
    use crate::repo::memory::InMemoryTodoRepo;
    use crate::usecase::validation::FieldPolicy;

    fn memory_router(policy: FieldPolicy) -> Router {
        router(App::new(Box::new(InMemoryTodoRepo::default()), policy))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, String) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                req = req.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn todo_lifecycle() {
        let app = memory_router(FieldPolicy::Permissive);

        let (status, body) = send(
            &app,
            Method::POST,
            "/todos",
            Some(json!({"title": "Buy groceries", "description": "I should buy groceries"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"id": 1}));

        let (status, body) = send(&app, Method::GET, "/todos/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::from_str::<Value>(&body).unwrap(),
            json!({
                "id": 1,
                "title": "Buy groceries",
                "description": "I should buy groceries",
                "completed": false
            })
        );

        let (status, body) = send(
            &app,
            Method::PUT,
            "/todos/1",
            Some(json!({"title": "Buy groceries", "description": "...", "completed": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "TODO item with id 1 updated");

        let (_, body) = send(&app, Method::GET, "/todos/1", None).await;
        let todo: Todo = serde_json::from_str(&body).unwrap();
        assert!(todo.completed);
        assert_eq!(todo.description, "...");

        let (status, body) = send(&app, Method::DELETE, "/todos/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "TODO item with id 1 deleted");

        let (status, body) = send(&app, Method::GET, "/todos/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "TODO item with id 1 not found");

        let (_, body) = send(&app, Method::POST, "/todos", Some(json!({"title": "Second", "description": ""}))).await;
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"id": 2}));
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let app = memory_router(FieldPolicy::Permissive);
        for title in ["a", "b", "c"] {
            send(&app, Method::POST, "/todos", Some(json!({"title": title, "description": ""}))).await;
        }
        send(&app, Method::DELETE, "/todos/2", None).await;

        let (status, body) = send(&app, Method::GET, "/todos", None).await;
        assert_eq!(status, StatusCode::OK);
        let todos: Vec<Todo> = serde_json::from_str(&body).unwrap();
        let ids: Vec<_> = todos.iter().map(|t| t.id).collect();
        assert_eq!(ids, [1, 3]);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let app = memory_router(FieldPolicy::Permissive);
        let update = json!({"title": "t", "description": "d", "completed": false});

        let (status, _) = send(&app, Method::PUT, "/todos/42", Some(update.clone())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, Method::DELETE, "/todos/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, body) = send(&app, Method::GET, "/todos/abc", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "TODO item with id abc not found");
        let (status, _) = send(&app, Method::PUT, "/todos/0", Some(update)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn undefined_routes_return_json_404() {
        let app = memory_router(FieldPolicy::Permissive);
        for (method, uri) in [
            (Method::GET, "/"),
            (Method::GET, "/todos/1/extra"),
            (Method::PATCH, "/todos/1"),
            (Method::DELETE, "/todos"),
        ] {
            let (status, body) = send(&app, method, uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(
                serde_json::from_str::<Value>(&body).unwrap(),
                json!({"error": "Route not found"})
            );
        }
    }

    #[tokio::test]
    async fn strict_policy_rejects_missing_fields() {
        let app = memory_router(FieldPolicy::Strict);

        let (status, body) = send(&app, Method::POST, "/todos", Some(json!({"title": "only"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            serde_json::from_str::<Value>(&body).unwrap(),
            json!({"error": "missing required field(s): description"})
        );

        let (_, body) = send(&app, Method::GET, "/todos", None).await;
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn permissive_policy_accepts_partial_bodies() {
        let app = memory_router(FieldPolicy::Permissive);

        let (status, _) = send(&app, Method::POST, "/todos", Some(json!({}))).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = send(
            &app,
            Method::PUT,
            "/todos/1",
            Some(json!({"title": "Buy groceries", "completed": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, Method::GET, "/todos/1", None).await;
        let todo: Todo = serde_json::from_str(&body).unwrap();
        assert_eq!(todo.title, "Buy groceries");
        assert_eq!(todo.description, "");
        assert!(todo.completed);
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let app = memory_router(FieldPolicy::Permissive);
        let req = Request::builder()
            .method(Method::POST)
            .uri("/todos")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert!(resp.status().is_client_error());

        let (_, body) = send(&app, Method::GET, "/todos", None).await;
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn body_without_json_content_type_is_rejected() {
        let app = memory_router(FieldPolicy::Permissive);
        let req = Request::builder()
            .method(Method::POST)
            .uri("/todos")
            .body(Body::from(r#"{"title":"a","description":"b"}"#))
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let (_, body) = send(&app, Method::GET, "/todos", None).await;
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn persistence_failure_is_500_and_not_committed() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("data");
        let repo = JsonFileTodoRepo::open(sub.join("todos.json")).unwrap();
        let app = router(App::new(Box::new(repo), FieldPolicy::Permissive));

        let (status, _) = send(&app, Method::POST, "/todos", Some(json!({"title": "a", "description": ""}))).await;
        assert_eq!(status, StatusCode::CREATED);

        std::fs::remove_dir_all(&sub).unwrap();
        let (status, body) = send(&app, Method::POST, "/todos", Some(json!({"title": "b", "description": ""}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(serde_json::from_str::<Value>(&body).unwrap()["error"].is_string());

        let (_, body) = send(&app, Method::GET, "/todos", None).await;
        let todos: Vec<Todo> = serde_json::from_str(&body).unwrap();
        assert_eq!(todos.len(), 1);
    }
}
