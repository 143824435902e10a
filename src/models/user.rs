use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Returns a new ObjectId as a hex string. This is used as the default for the `id` field.
fn default_id() -> String {
    ObjectId::new().to_hex()
}

fn default_true() -> bool {
    true
}

/// A user document as stored in the `users` collection.
///
/// Note:
/// - The `_id` field is renamed to `id` here, stored as a `String` (hex representation of ObjectId).
/// - `password` always holds the bcrypt hash, never the plain text.
/// - `is_deleted` is the soft-delete flag; reads filter on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", default = "default_id")]
    pub id: String,

    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,

    /// The user’s hashed password.
    pub password: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default)]
    pub is_deleted: bool,
}

/// The client-facing shape of a user: every field except the password hash.
///
/// Also used as the projection target when listing, so it must deserialize
/// from a document fetched with `{ password: 0 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_deleted: bool,
}

/// Login payload: the user plus a freshly signed token.
#[derive(Debug, Serialize)]
pub struct LoginView {
    #[serde(flatten)]
    pub user: UserView,
    pub token: String,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            mobile: user.mobile,
            name: user.name,
            role: user.role,
            project_id: user.project_id,
            is_active: user.is_active,
            is_deleted: user.is_deleted,
        }
    }
}

/// Filter for listing users. Deleted users are always excluded.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub id: Option<String>,
    pub role: Option<String>,
    pub project_id: Option<String>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        !user.is_deleted
            && self.id.as_ref().map_or(true, |id| *id == user.id)
            && self.role.as_ref().map_or(true, |r| user.role.as_ref() == Some(r))
            && self
                .project_id
                .as_ref()
                .map_or(true, |p| user.project_id.as_ref() == Some(p))
    }
}
