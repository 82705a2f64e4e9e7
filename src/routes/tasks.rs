use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{Task, TaskInput, TaskUpdate},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const TASK_COLUMNS: &str = "id, owner_id, title, description, priority, completed, created_at";

/// Creates a new task for the authenticated user.
///
/// The owner is always the authenticated identity; the payload cannot set it.
/// Priority defaults to 5 when omitted.
///
/// ## Request Body:
/// A JSON object matching `TaskInput`:
/// - `title`: The title of the task (required, non-empty).
/// - `description` (optional): A description of the task.
/// - `priority` (optional): Importance from 1 to 10.
///
/// ## Responses:
/// - `201 Created`: Returns the newly created `Task` object as JSON.
/// - `400 Bad Request`: If the input data is invalid (empty title,
///   out-of-range priority).
/// - `401 Unauthorized`: If the request lacks a valid session token.
/// - `500 Internal Server Error`: For database errors.
#[post("/create")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    task_data: web::Json<TaskInput>,
    owner: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    // Validate input
    task_data.validate()?;

    let task = Task::new(task_data.into_inner(), owner.0);

    let result = sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks (id, owner_id, title, description, priority, completed, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {TASK_COLUMNS}"
    ))
    .bind(task.id)
    .bind(task.owner_id)
    .bind(task.title)
    .bind(task.description)
    .bind(task.priority)
    .bind(task.completed)
    .bind(task.created_at)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(result))
}

/// Lists the authenticated user's tasks, newest first.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects; empty array when the user has
///   none.
/// - `401 Unauthorized`: If the request lacks a valid session token.
/// - `500 Internal Server Error`: For database errors.
#[get("/read")]
pub async fn list_tasks(
    pool: web::Data<PgPool>,
    owner: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let tasks = sqlx::query_as::<_, Task>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE owner_id = $1 ORDER BY created_at DESC"
    ))
    .bind(owner.0)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Applies a partial update to one of the authenticated user's tasks.
///
/// Fields omitted from the payload keep their stored values. The single
/// statement filters on `(id, owner_id)`, so a task owned by someone else
/// answers exactly like a task that does not exist.
///
/// ## Path Parameters:
/// - `id`: The UUID of the task to update.
///
/// ## Request Body:
/// A JSON object matching `TaskUpdate`; any of `title`, `description`,
/// `completed`, `priority`.
///
/// ## Responses:
/// - `200 OK`: Returns the updated `Task` object as JSON.
/// - `400 Bad Request`: If a supplied field fails validation.
/// - `401 Unauthorized`: If the request lacks a valid session token.
/// - `404 Not Found`: If no task with this id is owned by the caller.
/// - `500 Internal Server Error`: For database errors.
#[put("/update/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskUpdate>,
    owner: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let task_uuid = task_id.into_inner();
    let update = task_data.into_inner();

    let result = sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks \
         SET title = COALESCE($1, title), \
             description = COALESCE($2, description), \
             completed = COALESCE($3, completed), \
             priority = COALESCE($4, priority) \
         WHERE id = $5 AND owner_id = $6 \
         RETURNING {TASK_COLUMNS}"
    ))
    .bind(update.title)
    .bind(update.description)
    .bind(update.completed)
    .bind(update.priority)
    .bind(task_uuid)
    .bind(owner.0)
    .fetch_optional(&**pool)
    .await?;

    match result {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound("Task not found".into())),
    }
}

/// Deletes one of the authenticated user's tasks.
///
/// Same ownership condition as update: someone else's task is a 404.
///
/// ## Path Parameters:
/// - `id`: The UUID of the task to delete.
///
/// ## Responses:
/// - `200 OK`: Confirmation message.
/// - `401 Unauthorized`: If the request lacks a valid session token.
/// - `404 Not Found`: If no task with this id is owned by the caller.
/// - `500 Internal Server Error`: For database errors.
#[delete("/remove/{id}")]
pub async fn remove_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    owner: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let task_uuid = task_id.into_inner();

    let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_id = $2")
        .bind(task_uuid)
        .bind(owner.0)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted successfully" })))
}
