use crate::{
    auth::AuthSession,
    error::AppError,
    models::{Todo, TodoInput, TodoPatch},
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

/// Create a todo owned by the caller.
///
/// Responds 200 with the created todo; empty or whitespace-only text is a
/// 400.
#[post("")]
pub async fn create_todo(
    pool: web::Data<PgPool>,
    session: AuthSession,
    body: web::Json<TodoInput>,
) -> Result<impl Responder, AppError> {
    body.validate()?;

    let todo = Todo::create(&pool, &body.text, session.user.id).await?;

    Ok(HttpResponse::Ok().json(todo))
}

/// List the caller's todos, oldest first, wrapped as `{"todos": [...]}`.
/// Other users' todos are never present.
#[get("")]
pub async fn get_todos(
    pool: web::Data<PgPool>,
    session: AuthSession,
) -> Result<impl Responder, AppError> {
    let todos = Todo::find_all_for(&pool, session.user.id).await?;

    Ok(HttpResponse::Ok().json(json!({ "todos": todos })))
}

/// Fetch one of the caller's todos, wrapped as `{"todo": ...}`.
///
/// The id is taken as a raw string on purpose: a malformed id must report
/// 404 exactly like an absent or foreign one, not a parse error.
#[get("/{id}")]
pub async fn get_todo(
    pool: web::Data<PgPool>,
    session: AuthSession,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let todo = Todo::find_one_for(&pool, &id, session.user.id).await?;

    Ok(HttpResponse::Ok().json(json!({ "todo": todo })))
}

/// Patch one of the caller's todos and respond with the updated row.
///
/// `completed: true` stamps `completedAt`, `completed: false` clears it;
/// omitted fields are left as they are.
#[patch("/{id}")]
pub async fn update_todo(
    pool: web::Data<PgPool>,
    session: AuthSession,
    id: web::Path<String>,
    body: web::Json<TodoPatch>,
) -> Result<impl Responder, AppError> {
    let todo = Todo::update_for(&pool, &id, session.user.id, &body).await?;

    Ok(HttpResponse::Ok().json(todo))
}

/// Delete one of the caller's todos and respond with the deleted row.
#[delete("/{id}")]
pub async fn delete_todo(
    pool: web::Data<PgPool>,
    session: AuthSession,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let todo = Todo::delete_for(&pool, &id, session.user.id).await?;

    Ok(HttpResponse::Ok().json(todo))
}
