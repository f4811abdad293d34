//! Authentication handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use agora_core::domain::User;
use agora_core::ports::{BaseRepository, PasswordService, TokenService, UserRepository};
use agora_shared::ApiResponse;
use agora_shared::dto::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, PublicUser, RefreshTokenRequest,
    RegisterRequest, ResetPasswordRequest, ResetTokenIssued, UpdateDetailsRequest,
    UpdatePasswordRequest,
};

use crate::middleware::auth::AuthUser;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn public_user(user: &User) -> PublicUser {
    PublicUser {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        nickname: user.nickname.clone(),
        role: user.role.as_str().to_string(),
    }
}

/// Mint both credential kinds for `user` and wrap them with the public
/// fields. The refresh token is meant for the dedicated renewal path only.
fn token_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let token = state.tokens.mint_access_token(user.id, user.role)?;
    let refresh_token = state.tokens.mint_refresh_token(user.id)?;

    Ok(AuthResponse {
        success: true,
        token,
        refresh_token: Some(refresh_token),
        user: public_user(user),
    })
}

fn validate_username(username: &str) -> AppResult<()> {
    let len = username.chars().count();
    if !(3..=20).contains(&len) {
        return Err(AppError::BadRequest(
            "Username must be between 3 and 20 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> AppResult<()> {
    if !email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    Ok(())
}

fn validate_password(password: &str) -> AppResult<()> {
    if password.chars().count() < 6 {
        return Err(AppError::BadRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_nickname(nickname: &str) -> AppResult<()> {
    let len = nickname.chars().count();
    if len == 0 || len > 30 {
        return Err(AppError::BadRequest(
            "Nickname must be between 1 and 30 characters".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    validate_username(&req.username)?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;
    validate_nickname(&req.nickname)?;

    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::BadRequest("Email already registered".to_string()));
    }
    if state.users.find_by_username(&req.username).await?.is_some() {
        return Err(AppError::BadRequest("Username already taken".to_string()));
    }

    let password_hash = state.passwords.hash(&req.password)?;
    let user = User::new(req.username, req.email, req.nickname, password_hash);
    let saved_user = state.users.save(user).await?;

    Ok(HttpResponse::Created().json(token_response(&state, &saved_user)?))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.email.is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let user = state
        .users
        .find_by_email(&req.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let valid = state.passwords.verify(&req.password, &user.password_hash)?;
    if !valid {
        return Err(AppError::InvalidCredentials);
    }

    Ok(HttpResponse::Ok().json(token_response(&state, &user)?))
}

/// GET /api/auth/logout
///
/// Credentials are held client-side; this endpoint just acknowledges so the
/// client drops them.
pub async fn logout(_auth: AuthUser) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::message_only("Logged out")))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::ok(public_user(&auth.user))))
}

/// POST /api/auth/refresh
pub async fn refresh(
    state: web::Data<AppState>,
    body: web::Json<RefreshTokenRequest>,
) -> AppResult<HttpResponse> {
    let claims = state.tokens.verify_refresh_token(&body.refresh_token)?;

    // Role is re-read from the store, not trusted from the old token.
    let user = state
        .users
        .find_by_id(claims.user_id)
        .await?
        .ok_or(AppError::AuthenticationRequired)?;

    let token = state.tokens.mint_access_token(user.id, user.role)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        success: true,
        token,
        refresh_token: None,
        user: public_user(&user),
    }))
}

/// PUT /api/auth/updatedetails
///
/// Updates profile fields only; the credential hash and role are not
/// reachable from here.
pub async fn update_details(
    state: web::Data<AppState>,
    auth: AuthUser,
    body: web::Json<UpdateDetailsRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let mut user = auth.user;

    if let Some(username) = req.username {
        validate_username(&username)?;
        if username != user.username
            && state.users.find_by_username(&username).await?.is_some()
        {
            return Err(AppError::BadRequest("Username already taken".to_string()));
        }
        user.username = username;
    }

    if let Some(email) = req.email {
        validate_email(&email)?;
        if email != user.email && state.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::BadRequest("Email already registered".to_string()));
        }
        user.email = email;
    }

    if let Some(nickname) = req.nickname {
        validate_nickname(&nickname)?;
        user.nickname = nickname;
    }

    user.updated_at = Utc::now();
    let saved = state.users.save(user).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(public_user(&saved))))
}

/// PUT /api/auth/updatepassword
pub async fn update_password(
    state: web::Data<AppState>,
    auth: AuthUser,
    body: web::Json<UpdatePasswordRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let mut user = auth.user;

    let matches = state
        .passwords
        .verify(&req.current_password, &user.password_hash)?;
    if !matches {
        return Err(AppError::InvalidCredentials);
    }

    validate_password(&req.new_password)?;
    user.set_password(&req.new_password, state.passwords.as_ref())
        .map_err(AppError::from)?;
    let saved = state.users.save(user).await?;

    Ok(HttpResponse::Ok().json(token_response(&state, &saved)?))
}

/// POST /api/auth/forgotpassword
///
/// No delivery channel is wired up; the raw token is returned to the caller.
pub async fn forgot_password(
    state: web::Data<AppState>,
    body: web::Json<ForgotPasswordRequest>,
) -> AppResult<HttpResponse> {
    let raw = state.reset_vault.issue(&body.email).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(ResetTokenIssued { reset_token: raw })))
}

/// PUT /api/auth/resetpassword/{token}
pub async fn reset_password(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ResetPasswordRequest>,
) -> AppResult<HttpResponse> {
    let raw_token = path.into_inner();

    validate_password(&body.password)?;
    let user = state.reset_vault.redeem(&raw_token, &body.password).await?;

    Ok(HttpResponse::Ok().json(token_response(&state, &user)?))
}
