use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::CookieJar;
use tracing::warn;

use super::{
    jwt::{JwtKeys, TOKEN_COOKIE},
    repo_types::PublicUser,
};
use crate::{error::AppError, state::AppState};

/// Identity resolved from the session cookie.
///
/// Rejects with 401 when the cookie is missing, the token does not verify,
/// or the user it names no longer exists.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub PublicUser);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(TOKEN_COOKIE)
            .map(|c| c.value().to_owned())
            .ok_or(AppError::Unauthorized("Not authorized"))?;

        let claims = JwtKeys::from_ref(state).verify(&token)?;

        match state.users.find_profile(claims.sub).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => {
                warn!(user_id = %claims.sub, "valid token for missing user");
                Err(AppError::Unauthorized("User no longer exists"))
            }
        }
    }
}
