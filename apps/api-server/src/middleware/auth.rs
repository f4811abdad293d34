//! Authentication extractor.
//!
//! The gate runs in two steps: verify the bearer credential, then resolve
//! its subject against the store. A verification failure or a vanished
//! subject both end the request with 401; a store failure is an
//! infrastructure error and surfaces as 500 instead.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures::future::LocalBoxFuture;
use uuid::Uuid;

use agora_core::domain::{Role, User, is_allowed};
use agora_core::ports::{BaseRepository, TokenService};

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Authenticated acting identity, resolved from the store.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(auth: AuthUser) -> impl Responder {
///     format!("Hello, {}!", auth.user.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

impl AuthUser {
    pub fn id(&self) -> Uuid {
        self.user.id
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    /// Role gate: the acting role must be a member of `required`.
    pub fn require_role(&self, required: &[Role]) -> Result<(), AppError> {
        if is_allowed(self.user.role, required) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Result<String, AppError> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AppError::AuthenticationRequired)?;

    let value = header
        .to_str()
        .map_err(|_| AppError::AuthenticationRequired)?;

    value
        .strip_prefix("Bearer ")
        .map(str::to_owned)
        .ok_or(AppError::AuthenticationRequired)
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
                tracing::error!("AppState not found in app data");
                AppError::Internal("Server configuration error".to_string())
            })?;

            let token = bearer_token(&req)?;
            let claims = state.tokens.verify_access_token(&token)?;

            // The subject may have been deleted after the token was issued;
            // that is an authentication failure, not a 404.
            let user = state
                .users
                .find_by_id(claims.user_id)
                .await?
                .ok_or(AppError::AuthenticationRequired)?;

            Ok(AuthUser { user })
        })
    }
}
