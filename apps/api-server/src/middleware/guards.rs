//! Ownership guard.
//!
//! Runs after authentication as an explicit pipeline stage: it loads the
//! target resource and either returns it, enriched into the handler's
//! context, or a typed authorization error. Handlers never re-fetch a
//! resource the guard already loaded.

use uuid::Uuid;

use agora_core::domain::{Comment, Post, Role};
use agora_core::ports::BaseRepository;

use crate::middleware::auth::AuthUser;
use crate::middleware::error::AppError;

/// Resources that record an owning identity.
pub trait Owned {
    const KIND: &'static str;

    fn owner(&self) -> Uuid;
}

impl Owned for Post {
    const KIND: &'static str = "post";

    fn owner(&self) -> Uuid {
        self.author
    }
}

impl Owned for Comment {
    const KIND: &'static str = "comment";

    fn owner(&self) -> Uuid {
        self.author
    }
}

/// Load `id` and check the actor may mutate it: admins pass unconditionally,
/// everyone else must be the recorded owner. Returns the loaded resource on
/// success.
pub async fn load_owned<T, R>(repo: &R, id: Uuid, actor: &AuthUser) -> Result<T, AppError>
where
    T: Owned,
    R: BaseRepository<T, Uuid> + ?Sized,
{
    let resource = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} not found", T::KIND)))?;

    if actor.role() == Role::Admin {
        return Ok(resource);
    }

    if resource.owner() != actor.id() {
        return Err(AppError::Forbidden);
    }

    Ok(resource)
}
