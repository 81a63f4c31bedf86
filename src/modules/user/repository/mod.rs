pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A user row exactly as one partition stores it. Legacy partitions leave
/// most columns empty, so nearly everything is optional. Credential columns
/// are never selected into this shape.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, sqlx::FromRow)]
pub struct UserDocument {
    pub id: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub profile_image_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub followers: Option<Vec<String>>,
    pub following: Option<Vec<String>>,
    pub approved: Option<bool>,
    pub blocked: Option<bool>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeField {
    Followers,
    Following,
}

impl EdgeField {
    pub fn column(&self) -> &'static str {
        match self {
            Self::Followers => "followers",
            Self::Following => "following",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PartitionError {
    /// The key cannot be represented by this partition's key type.
    #[error("key cannot be represented in this partition")]
    InvalidKey,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("partition unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, PartitionError>;

/// One storage collection holding user documents.
///
/// Set updates must be atomic per document and idempotent: adding a member
/// that is already present, or removing one that is absent, changes nothing
/// and is not an error. They return the number of documents changed.
///
/// Members are compared as users, not as strings: a stored member matches
/// `value` when both name the same user (surrounding whitespace ignored,
/// native ids in any case). Removal drops every matching spelling.
#[async_trait]
pub trait Partition: Send + Sync {
    fn name(&self) -> &str;

    async fn find_one(&self, key: &str) -> Result<Option<UserDocument>>;

    async fn find_many(&self, keys: &[String]) -> Result<Vec<UserDocument>>;

    async fn add_to_set(&self, keys: &[String], field: EdgeField, value: &str) -> Result<u64>;

    async fn remove_from_set(&self, keys: &[String], field: EdgeField, value: &str)
        -> Result<u64>;

    async fn update_profile(&self, keys: &[String], update: &ProfileUpdate) -> Result<u64>;
}

/// Partitions in priority order, most canonical first.
#[derive(Clone, Default)]
pub struct Partitions(Vec<Arc<dyn Partition>>);

impl Partitions {
    pub fn new() -> Self {
        Self(vec![])
    }

    /// Appends a partition below every partition already registered.
    pub fn with(mut self, partition: Arc<dyn Partition>) -> Self {
        self.0.push(partition);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Partition>> {
        self.0.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<dyn Partition>> {
        self.0.get(index)
    }
}
