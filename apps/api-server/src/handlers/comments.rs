//! Comment handlers.

use actix_web::{HttpResponse, web};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use uuid::Uuid;

use agora_core::domain::{Attachment, Comment, UserSummary};
use agora_core::service::{CommentDetail, CommentWithAuthor, NewAttachment};
use agora_shared::dto::{
    AttachmentPayload, AttachmentView, AuthorView, CommentView, CreateCommentRequest,
    CreateReplyRequest, LikeStatus, PageQuery, UpdateCommentRequest,
};
use agora_shared::{ApiResponse, PagedResponse};

use crate::middleware::auth::AuthUser;
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::guards::load_owned;
use crate::state::AppState;

fn decode_attachments(payloads: Vec<AttachmentPayload>) -> AppResult<Vec<NewAttachment>> {
    payloads
        .into_iter()
        .map(|p| {
            let data = BASE64
                .decode(p.data.as_bytes())
                .map_err(|_| AppError::BadRequest("Invalid attachment encoding".to_string()))?;
            Ok(NewAttachment {
                original_name: p.original_name,
                content_type: p.content_type,
                data,
            })
        })
        .collect()
}

fn attachment_view(a: &Attachment) -> AttachmentView {
    AttachmentView {
        filename: a.filename.clone(),
        original_name: a.original_name.clone(),
        path: a.path.clone(),
        content_type: a.content_type.clone(),
        size: a.size,
        uploaded_at: a.uploaded_at,
    }
}

fn author_view(author: &UserSummary) -> AuthorView {
    AuthorView {
        id: author.id,
        username: author.username.clone(),
        nickname: author.nickname.clone(),
    }
}

fn comment_view(comment: &Comment, author: Option<&UserSummary>) -> CommentView {
    CommentView {
        id: comment.id,
        content: comment.content().to_string(),
        author: author.map(author_view),
        post: comment.post,
        parent: comment.parent,
        attachments: comment.attachments().iter().map(attachment_view).collect(),
        likes: comment.likes.clone(),
        like_count: comment.like_count(),
        is_deleted: comment.is_deleted(),
        replies: None,
        created_at: comment.created_at,
        updated_at: comment.updated_at,
    }
}

fn created_view(created: &CommentWithAuthor) -> CommentView {
    comment_view(&created.comment, created.author.as_ref())
}

fn detail_view(detail: &CommentDetail) -> CommentView {
    let mut view = comment_view(&detail.comment, detail.author.as_ref());
    view.replies = Some(
        detail
            .replies
            .iter()
            .map(|r| comment_view(&r.comment, r.author.as_ref()))
            .collect(),
    );
    view
}

/// POST /api/comments
pub async fn create(
    state: web::Data<AppState>,
    auth: AuthUser,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let uploads = decode_attachments(req.attachments)?;

    let created = state
        .comment_service
        .create(req.post_id, auth.id(), req.content, uploads)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(created_view(&created))))
}

/// POST /api/comments/reply/{commentId}
///
/// The reply's post reference comes from the parent; a differing `post_id`
/// in the body has no effect.
pub async fn create_reply(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<CreateReplyRequest>,
) -> AppResult<HttpResponse> {
    let parent_id = path.into_inner();
    let req = body.into_inner();
    let uploads = decode_attachments(req.attachments)?;

    let created = state
        .comment_service
        .reply(parent_id, auth.id(), req.content, uploads)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(created_view(&created))))
}

/// GET /api/comments/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let detail = state.comment_service.get(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(detail_view(&detail))))
}

/// GET /api/comments/post/{postId}
pub async fn list_for_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let page = query.page.max(1);
    let limit = query.limit.clamp(1, 100);

    let (details, total) = state
        .comment_service
        .list_for_post(post_id, page, limit)
        .await?;

    let views: Vec<CommentView> = details.iter().map(detail_view).collect();
    Ok(HttpResponse::Ok().json(PagedResponse::new(views, page, limit, total)))
}

/// PUT /api/comments/{id} - owner or admin only.
pub async fn update(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCommentRequest>,
) -> AppResult<HttpResponse> {
    let comment =
        load_owned::<Comment, _>(state.comments.as_ref(), path.into_inner(), &auth).await?;

    let req = body.into_inner();
    let uploads = decode_attachments(req.attachments)?;

    let updated = state
        .comment_service
        .update(comment, req.content, uploads)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(comment_view(&updated, None))))
}

/// DELETE /api/comments/{id} - owner or admin only. Soft: replies survive.
pub async fn soft_delete(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comment =
        load_owned::<Comment, _>(state.comments.as_ref(), path.into_inner(), &auth).await?;

    state.comment_service.soft_delete(comment).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message_only("Comment deleted")))
}

/// PUT /api/comments/{id}/like
pub async fn toggle_like(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let liked = state
        .likes
        .toggle_comment(path.into_inner(), auth.id())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(LikeStatus { liked })))
}

/// DELETE /api/comments/{id}/attachments/{filename} - owner or admin only.
pub async fn remove_attachment(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<(Uuid, String)>,
) -> AppResult<HttpResponse> {
    let (comment_id, filename) = path.into_inner();
    let comment = load_owned::<Comment, _>(state.comments.as_ref(), comment_id, &auth).await?;

    let updated = state
        .comment_service
        .remove_attachment(comment, &filename)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(comment_view(&updated, None))))
}
