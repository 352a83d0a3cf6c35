use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::error::TodoError;
use crate::resource::{CreateTodoRequest, TodoResource};
use crate::service::TodoService;

#[derive(Clone)]
struct AppState {
    service: TodoService,
}

pub fn router(service: TodoService) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/:id",
            get(get_todo).put(finish_todo).delete(delete_todo),
        )
        .with_state(AppState { service })
}

/// Runs a service call on the blocking pool so SQLite lock waits never park
/// a runtime worker.
async fn run_blocking<T, F>(service: TodoService, call: F) -> Result<T, TodoError>
where
    T: Send + 'static,
    F: FnOnce(&TodoService) -> Result<T, TodoError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || call(&service)).await?
}

fn todo_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, TodoError> {
    let Path(id) = path.map_err(|rejection| TodoError::Validation(rejection.body_text()))?;
    Ok(id)
}

async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<TodoResource>>, TodoError> {
    let todos = run_blocking(state.service, TodoService::find_all).await?;
    Ok(Json(todos.into_iter().map(TodoResource::from).collect()))
}

async fn get_todo(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<TodoResource>, TodoError> {
    let id = todo_id(path)?;
    let todo = run_blocking(state.service, move |service| service.find_one(id)).await?;
    Ok(Json(todo.into()))
}

async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<impl IntoResponse, TodoError> {
    let Json(request) = payload.map_err(|rejection| TodoError::Validation(rejection.body_text()))?;
    let input = request.into_new_todo()?;

    let todo = run_blocking(state.service, move |service| service.create(input)).await?;
    Ok((StatusCode::CREATED, Json(TodoResource::from(todo))))
}

async fn finish_todo(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<TodoResource>, TodoError> {
    let id = todo_id(path)?;
    let todo = run_blocking(state.service, move |service| service.finish(id)).await?;
    Ok(Json(todo.into()))
}

async fn delete_todo(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, TodoError> {
    let id = todo_id(path)?;
    run_blocking(state.service, move |service| service.delete(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
