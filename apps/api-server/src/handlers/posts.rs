//! Post handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use agora_core::domain::Post;
use agora_core::ports::BaseRepository;
use agora_shared::ApiResponse;
use agora_shared::dto::{CreatePostRequest, LikeStatus, PostView, UpdatePostRequest};

use crate::middleware::auth::AuthUser;
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::guards::load_owned;
use crate::state::AppState;

fn post_view(post: &Post) -> PostView {
    PostView {
        id: post.id,
        author: post.author,
        title: post.title.clone(),
        content: post.content.clone(),
        likes: post.likes.clone(),
        like_count: post.like_count(),
        comments: post.comments.clone(),
        comment_count: post.comment_count(),
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

fn validate_title(title: &str) -> AppResult<()> {
    let len = title.trim().chars().count();
    if len == 0 || len > 100 {
        return Err(AppError::BadRequest(
            "Title must be between 1 and 100 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_content(content: &str) -> AppResult<()> {
    if content.trim().is_empty() {
        return Err(AppError::BadRequest("Content is required".to_string()));
    }
    Ok(())
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    auth: AuthUser,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    validate_title(&req.title)?;
    validate_content(&req.content)?;

    let post = Post::new(auth.id(), req.title.trim().to_string(), req.content);
    let saved = state.posts.save(post).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(post_view(&saved))))
}

/// GET /api/posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_view(&post))))
}

/// PUT /api/posts/{id} - owner or admin only.
pub async fn update(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let mut post = load_owned::<Post, _>(state.posts.as_ref(), path.into_inner(), &auth).await?;
    let req = body.into_inner();

    if let Some(title) = req.title {
        validate_title(&title)?;
        post.title = title.trim().to_string();
    }
    if let Some(content) = req.content {
        validate_content(&content)?;
        post.content = content;
    }

    post.updated_at = Utc::now();
    let saved = state.posts.save(post).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_view(&saved))))
}

/// PUT /api/posts/{id}/like
pub async fn toggle_like(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let liked = state.likes.toggle_post(path.into_inner(), auth.id()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(LikeStatus { liked })))
}
