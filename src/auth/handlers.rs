use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::CookieJar;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest},
        extractors::CurrentUser,
        jwt::{removal_cookie, session_cookie, JwtKeys},
        password::{hash_password_blocking, verify_password_blocking},
        repo_types::PublicUser,
    },
    error::{AppError, AppResult},
    extractors::AppJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/user/profile", get(profile))
}

fn start_session(state: &AppState, jar: CookieJar, user_id: Uuid) -> AppResult<CookieJar> {
    let token = JwtKeys::from_ref(state).issue(user_id)?;
    Ok(jar.add(session_cookie(token)))
}

#[instrument(skip(state, jar, payload), fields(email = %payload.email))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, CookieJar, Json<AuthResponse>)> {
    if state.users.find_by_email(&payload.email).await?.is_some() {
        warn!("email already registered");
        return Err(AppError::DuplicateEmail);
    }

    let hash = hash_password_blocking(payload.password).await?;
    let user = state
        .users
        .create(&payload.name, &payload.email, &hash)
        .await?;

    let jar = start_session(&state, jar, user.id)?;
    info!(user_id = %user.id, "user registered");
    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse { user: user.into() }),
    ))
}

#[instrument(skip(state, jar, payload), fields(email = %payload.email))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<AuthResponse>)> {
    let Some(user) = state.users.find_by_email(&payload.email).await? else {
        warn!("login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password_blocking(payload.password, user.password_hash.clone()).await? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let jar = start_session(&state, jar, user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok((jar, Json(AuthResponse { user: user.into() })))
}

/// Clears the client cookie. Tokens are stateless, so an already-copied
/// token stays valid until it expires.
#[instrument(skip(jar))]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    (
        jar.add(removal_cookie()),
        Json(MessageResponse {
            message: "Logged out",
        }),
    )
}

#[instrument(skip(user), fields(user_id = %user.id))]
pub async fn profile(CurrentUser(user): CurrentUser) -> Json<PublicUser> {
    Json(user)
}
