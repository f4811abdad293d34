//! User administration and saved-items handlers.

use actix_web::{HttpResponse, web};

use agora_core::domain::{Role, SavedKind};
use agora_core::ports::UserRepository;
use agora_shared::ApiResponse;
use agora_shared::dto::{PublicUser, SavedItemQuery, SavedStatus, ToggleSavedRequest};

use crate::middleware::auth::AuthUser;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn parse_kind(kind: &str) -> AppResult<SavedKind> {
    match kind {
        "problem" => Ok(SavedKind::Problem),
        "post" => Ok(SavedKind::Post),
        _ => Err(AppError::BadRequest(
            "item_kind must be 'problem' or 'post'".to_string(),
        )),
    }
}

/// GET /api/users - admin only.
pub async fn list(state: web::Data<AppState>, auth: AuthUser) -> AppResult<HttpResponse> {
    auth.require_role(&[Role::Admin])?;

    let users: Vec<PublicUser> = state
        .users
        .list()
        .await?
        .iter()
        .map(|u| PublicUser {
            id: u.id,
            username: u.username.clone(),
            email: u.email.clone(),
            nickname: u.nickname.clone(),
            role: u.role.as_str().to_string(),
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(users)))
}

/// POST /api/users/saved-items/toggle
pub async fn toggle_saved(
    state: web::Data<AppState>,
    auth: AuthUser,
    body: web::Json<ToggleSavedRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let kind = parse_kind(&req.item_kind)?;

    let is_saved = state.saved.toggle(auth.id(), req.item_id, kind).await?;

    let message = if is_saved { "Item saved" } else { "Item unsaved" };
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(SavedStatus { is_saved }, message)))
}

/// GET /api/users/saved-items/check
pub async fn check_saved(
    state: web::Data<AppState>,
    auth: AuthUser,
    query: web::Query<SavedItemQuery>,
) -> AppResult<HttpResponse> {
    let kind = parse_kind(&query.item_kind)?;

    let is_saved = state.saved.is_saved(auth.id(), query.item_id, kind).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(SavedStatus { is_saved })))
}
