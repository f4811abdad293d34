use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::ports::auth::PasswordService;

/// User roles, in ascending order of privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::System => "system",
        }
    }
}

/// Pure role-membership check used by the authorization pipeline.
pub fn is_allowed(role: Role, required: &[Role]) -> bool {
    required.contains(&role)
}

/// The kinds of items a user can bookmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SavedKind {
    Problem,
    Post,
}

/// Per-user saved-item id sets, one per kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedItems {
    pub problems: Vec<Uuid>,
    pub posts: Vec<Uuid>,
}

impl SavedItems {
    pub fn ids(&self, kind: SavedKind) -> &[Uuid] {
        match kind {
            SavedKind::Problem => &self.problems,
            SavedKind::Post => &self.posts,
        }
    }

    pub fn ids_mut(&mut self, kind: SavedKind) -> &mut Vec<Uuid> {
        match kind {
            SavedKind::Problem => &mut self.problems,
            SavedKind::Post => &mut self.posts,
        }
    }

    pub fn contains(&self, kind: SavedKind, id: Uuid) -> bool {
        self.ids(kind).contains(&id)
    }
}

/// User entity.
///
/// The credential hash and the reset-token fields are never serialized:
/// default reads and every API response exclude them, so leaking them takes
/// an explicit field access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub nickname: String,
    pub role: Role,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    #[serde(skip_serializing, default)]
    pub reset_password_token: Option<String>,
    #[serde(skip_serializing, default)]
    pub reset_password_expire: Option<DateTime<Utc>>,
    #[serde(default)]
    pub saved: SavedItems,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps. Callers hand over
    /// the already-computed credential hash; the raw secret is never stored.
    pub fn new(username: String, email: String, nickname: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            nickname,
            role: Role::User,
            password_hash,
            reset_password_token: None,
            reset_password_expire: None,
            saved: SavedItems::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the secret. This is the only path that recomputes the hash;
    /// profile updates leave it untouched.
    pub fn set_password(
        &mut self,
        raw_password: &str,
        passwords: &dyn PasswordService,
    ) -> Result<(), DomainError> {
        self.password_hash = passwords
            .hash(raw_password)
            .map_err(|e| DomainError::Validation(e.to_string()))?;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            nickname: self.nickname.clone(),
        }
    }
}

/// The subset of user fields expanded onto referencing entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub nickname: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_membership() {
        assert!(is_allowed(Role::Admin, &[Role::Admin]));
        assert!(is_allowed(Role::User, &[Role::User, Role::Admin]));
        assert!(!is_allowed(Role::User, &[Role::Admin]));
        assert!(!is_allowed(Role::System, &[]));
    }

    #[test]
    fn saved_items_kinds_are_distinct() {
        let mut saved = SavedItems::default();
        let id = Uuid::new_v4();
        saved.ids_mut(SavedKind::Problem).push(id);

        assert!(saved.contains(SavedKind::Problem, id));
        assert!(!saved.contains(SavedKind::Post, id));
    }

    #[test]
    fn credential_fields_never_serialize() {
        let mut user = User::new(
            "tester".into(),
            "tester@example.com".into(),
            "Tester".into(),
            "a-credential-hash".into(),
        );
        user.reset_password_token = Some("a-digest".into());
        user.reset_password_expire = Some(Utc::now());

        let json = serde_json::to_value(&user).unwrap();
        let obj = json.as_object().unwrap();

        assert!(!obj.contains_key("password_hash"));
        assert!(!obj.contains_key("reset_password_token"));
        assert!(!obj.contains_key("reset_password_expire"));
        assert_eq!(obj["username"], "tester");
        assert_eq!(obj["role"], "user");
    }
}
