use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{debug, warn};

use crate::{config::SessionConfig, error::AppError, state::AppState, users::repo_types::User};

/// Resolves the session cookie to the user it was issued to.
///
/// Rejects with `Unauthorized` when the cookie is missing or matches no user,
/// before the handler body (and so the meal store) is reached.
pub struct SessionUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = session_token(&jar, &state.config.session).ok_or_else(|| {
            debug!("missing session cookie");
            AppError::Unauthorized
        })?;

        match state.users.find_by_session(&token).await? {
            Some(user) => Ok(SessionUser(user)),
            None => {
                warn!("unknown session token");
                Err(AppError::Unauthorized)
            }
        }
    }
}

/// Non-empty session token carried by the request, if any.
pub fn session_token(jar: &CookieJar, config: &SessionConfig) -> Option<String> {
    jar.get(&config.cookie_name)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
}

/// Site-wide session cookie living for `ttl_days`.
pub fn session_cookie(config: &SessionConfig, token: String) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(config.ttl_days))
        .build()
}
