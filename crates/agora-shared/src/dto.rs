//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Auth

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub nickname: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Profile update. The credential and role fields deliberately have no slot
/// here; they travel through their own endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDetailsRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub nickname: Option<String>,
}

/// Password change for an authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Request a password-reset token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Redeem a password-reset token (the token itself rides in the path).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

/// Exchange a refresh token for a fresh access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Raw reset token handed back to the requester (no delivery channel).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetTokenIssued {
    pub reset_token: String,
}

/// Public user fields, safe for any response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub nickname: String,
    pub role: String,
}

/// Response carrying freshly minted credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub user: PublicUser,
}

// ---------------------------------------------------------------------------
// Posts

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    pub id: Uuid,
    pub author: Uuid,
    pub title: String,
    pub content: String,
    pub likes: Vec<Uuid>,
    pub like_count: usize,
    pub comments: Vec<Uuid>,
    pub comment_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Comments

/// An attachment riding along a comment mutation; `data` is base64-encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentPayload {
    pub original_name: String,
    pub content_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
    pub post_id: Uuid,
    #[serde(default)]
    pub attachments: Vec<AttachmentPayload>,
}

/// Reply creation. A `post_id` may be supplied but is ignored: the reply
/// always lands on its parent's post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReplyRequest {
    pub content: String,
    #[serde(default)]
    pub post_id: Option<Uuid>,
    #[serde(default)]
    pub attachments: Vec<AttachmentPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<AttachmentPayload>,
}

/// Author subset expanded onto comment views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorView {
    pub id: Uuid,
    pub username: String,
    pub nickname: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentView {
    pub filename: String,
    pub original_name: String,
    pub path: String,
    pub content_type: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: Uuid,
    pub content: String,
    pub author: Option<AuthorView>,
    pub post: Uuid,
    pub parent: Option<Uuid>,
    pub attachments: Vec<AttachmentView>,
    pub likes: Vec<Uuid>,
    pub like_count: usize,
    pub is_deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replies: Option<Vec<CommentView>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Membership outcome of a like toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeStatus {
    pub liked: bool,
}

// ---------------------------------------------------------------------------
// Saved items

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleSavedRequest {
    pub item_id: Uuid,
    pub item_kind: String,
}

/// Query string for the saved-item membership check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedItemQuery {
    pub item_id: Uuid,
    pub item_kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedStatus {
    pub is_saved: bool,
}

// ---------------------------------------------------------------------------
// Listing

/// Page selection for list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    20
}
