use crate::{
    auth::{token, AuthSession, Credentials, TokenPurpose},
    config::Config,
    error::AppError,
    models::User,
};
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Sign up
///
/// Creates a new user account and responds with the public user body; a
/// freshly issued auth token is persisted to the user's token list and
/// returned in the `x-auth` response header.
#[post("")]
pub async fn signup(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    body: web::Json<Credentials>,
) -> Result<impl Responder, AppError> {
    let credentials = Credentials {
        email: body.email.trim().to_string(),
        password: body.password.clone(),
    };
    credentials.validate()?;

    let user = User::create(&pool, &credentials.email, &credentials.password).await?;

    let token = token::issue(config.jwt_secret.as_bytes(), user.id, TokenPurpose::Auth)?;
    User::add_token(&pool, user.id, TokenPurpose::Auth, &token).await?;

    Ok(HttpResponse::Ok()
        .insert_header(("x-auth", token))
        .json(user.public()))
}

/// Log in
///
/// Checks the credentials and, like signup, issues and persists a new auth
/// token carried in the `x-auth` response header. Every credential failure
/// is a plain 400.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    body: web::Json<Credentials>,
) -> Result<impl Responder, AppError> {
    body.validate()?;

    let user = User::find_by_credentials(&pool, body.email.trim(), &body.password).await?;

    let token = token::issue(config.jwt_secret.as_bytes(), user.id, TokenPurpose::Auth)?;
    User::add_token(&pool, user.id, TokenPurpose::Auth, &token).await?;

    Ok(HttpResponse::Ok()
        .insert_header(("x-auth", token))
        .json(user.public()))
}

/// The authenticated caller's own account.
#[get("/me")]
pub async fn me(session: AuthSession) -> impl Responder {
    HttpResponse::Ok().json(session.user.public())
}

/// Log out
///
/// Revokes exactly the token this request authenticated with; other
/// sessions of the same user keep working.
#[delete("/me/token")]
pub async fn logout(
    pool: web::Data<PgPool>,
    session: AuthSession,
) -> Result<impl Responder, AppError> {
    User::remove_token(&pool, session.user.id, &session.token).await?;
    Ok(HttpResponse::Ok().finish())
}
