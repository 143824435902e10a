// src/services/user_store.rs

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    error::{ErrorKind, WriteFailure},
    options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument},
    Collection, IndexModel,
};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::user::{User, UserFilter, UserView};

/// Mongo's duplicate key error code.
const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("User with email '{0}' already exists")]
    Duplicate(String),

    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for the users collection.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Non-deleted users matching the filter, without password hashes.
    async fn find(&self, filter: &UserFilter) -> StoreResult<Vec<UserView>>;

    /// An active, non-deleted user whose email or mobile equals `login`.
    async fn find_active_by_login(&self, login: &str) -> StoreResult<Option<User>>;

    async fn insert(&self, user: User) -> StoreResult<User>;

    /// Replaces the password hash of an active, non-deleted user and returns the updated user.
    async fn set_password(&self, email: &str, password_hash: &str) -> StoreResult<Option<User>>;

    /// Physically removes every document with this email. Returns the removed count.
    async fn delete_by_email(&self, email: &str) -> StoreResult<u64>;
}

pub struct MongoUserStore {
    collection: Collection<User>,
}

impl MongoUserStore {
    pub fn new(collection: Collection<User>) -> Self {
        Self { collection }
    }

    /// Creates the unique index backing the one-account-per-email rule.
    pub async fn ensure_indexes(&self) -> mongodb::error::Result<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index, None).await?;
        Ok(())
    }
}

fn list_query(filter: &UserFilter) -> Document {
    let mut query = doc! { "isDeleted": false };
    if let Some(id) = &filter.id {
        query.insert("_id", id.as_str());
    }
    if let Some(role) = &filter.role {
        query.insert("role", role.as_str());
    }
    if let Some(project_id) = &filter.project_id {
        query.insert("projectId", project_id.as_str());
    }
    query
}

fn login_query(login: &str) -> Document {
    doc! {
        "$and": [
            { "isDeleted": false, "isActive": true },
            { "$or": [ { "email": login }, { "mobile": login } ] },
        ]
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        *err.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref e)) if e.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn find(&self, filter: &UserFilter) -> StoreResult<Vec<UserView>> {
        let options = FindOptions::builder()
            .projection(doc! { "password": 0 })
            .build();
        let cursor = self
            .collection
            .clone_with_type::<UserView>()
            .find(list_query(filter), options)
            .await?;
        let users: Vec<UserView> = cursor.try_collect().await?;
        Ok(users)
    }

    async fn find_active_by_login(&self, login: &str) -> StoreResult<Option<User>> {
        Ok(self.collection.find_one(login_query(login), None).await?)
    }

    async fn insert(&self, user: User) -> StoreResult<User> {
        match self.collection.insert_one(&user, None).await {
            Ok(_) => Ok(user),
            Err(e) if is_duplicate_key(&e) => Err(StoreError::Duplicate(user.email)),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_password(&self, email: &str, password_hash: &str) -> StoreResult<Option<User>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let user = self
            .collection
            .find_one_and_update(
                doc! { "email": email, "isDeleted": false, "isActive": true },
                doc! { "$set": { "password": password_hash } },
                options,
            )
            .await?;
        Ok(user)
    }

    async fn delete_by_email(&self, email: &str) -> StoreResult<u64> {
        let result = self.collection.delete_many(doc! { "email": email }, None).await?;
        Ok(result.deleted_count)
    }
}

/// In-process store with the same semantics as [`MongoUserStore`].
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find(&self, filter: &UserFilter) -> StoreResult<Vec<UserView>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|u| filter.matches(u))
            .cloned()
            .map(UserView::from)
            .collect())
    }

    async fn find_active_by_login(&self, login: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| {
                !u.is_deleted
                    && u.is_active
                    && (u.email == login || u.mobile.as_deref() == Some(login))
            })
            .cloned())
    }

    async fn insert(&self, user: User) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(user.email));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn set_password(&self, email: &str, password_hash: &str) -> StoreResult<Option<User>> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.email == email && !u.is_deleted && u.is_active);
        Ok(user.map(|u| {
            u.password = password_hash.to_string();
            u.clone()
        }))
    }

    async fn delete_by_email(&self, email: &str) -> StoreResult<u64> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.email != email);
        Ok((before - users.len()) as u64)
    }
}
