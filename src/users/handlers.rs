use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::Value;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    error::AppError,
    state::AppState,
    users::{
        dto::RegisterRequest,
        extractors::{session_cookie, session_token},
        repo_types::NewUser,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users", post(register))
}

/// Registers a user and binds it to the caller's session token, minting and
/// setting a new cookie when the caller has no token of its own.
#[instrument(skip(state, jar, body))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, CookieJar), AppError> {
    let payload = RegisterRequest::parse(body)?;

    if state.users.find_by_email(&payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(AppError::DuplicateUser);
    }

    let session_cfg = &state.config.session;
    // A token already bound to another user is never shared.
    let reusable = match session_token(&jar, session_cfg) {
        Some(token) if state.users.find_by_session(&token).await?.is_none() => Some(token),
        _ => None,
    };
    let (session_id, jar) = match reusable {
        Some(token) => (token, jar),
        None => {
            let token = Uuid::new_v4().to_string();
            let jar = jar.add(session_cookie(session_cfg, token.clone()));
            (token, jar)
        }
    };

    let user = state
        .users
        .create(NewUser {
            email: payload.email,
            username: payload.username,
            session_id,
        })
        .await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, jar))
}
