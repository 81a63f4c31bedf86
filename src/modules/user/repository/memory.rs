use super::{EdgeField, Partition, PartitionError, ProfileUpdate, Result, UserDocument};
use crate::modules::user::identifier::same_user;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// In-process partition with the same contract as [`super::postgres::PgPartition`].
/// Documents keep insertion order. Writes can be switched to fail so that
/// partial-sync behaviour can be exercised.
pub struct MemoryPartition {
    name: String,
    documents: RwLock<Vec<UserDocument>>,
    failing: AtomicBool,
}

impl MemoryPartition {
    pub fn new(name: &str) -> Self {
        Self::with_documents(name, vec![])
    }

    pub fn with_documents(name: &str, documents: Vec<UserDocument>) -> Self {
        Self {
            name: name.to_string(),
            documents: RwLock::new(documents),
            failing: AtomicBool::new(false),
        }
    }

    pub async fn insert(&self, document: UserDocument) {
        self.documents.write().await.push(document);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        match self.failing.load(Ordering::SeqCst) {
            true => Err(PartitionError::Unavailable(format!(
                "{} is rejecting writes",
                self.name
            ))),
            false => Ok(()),
        }
    }
}

// Mirrors Postgres refusing NUL bytes in TEXT values.
fn check_key(key: &str) -> Result<()> {
    match key.contains('\0') {
        true => Err(PartitionError::InvalidKey),
        false => Ok(()),
    }
}

fn edges_mut(document: &mut UserDocument, field: EdgeField) -> &mut Option<Vec<String>> {
    match field {
        EdgeField::Followers => &mut document.followers,
        EdgeField::Following => &mut document.following,
    }
}

#[async_trait]
impl Partition for MemoryPartition {
    fn name(&self) -> &str {
        &self.name
    }

    async fn find_one(&self, key: &str) -> Result<Option<UserDocument>> {
        check_key(key)?;

        Ok(self
            .documents
            .read()
            .await
            .iter()
            .find(|document| document.id == key)
            .cloned())
    }

    async fn find_many(&self, keys: &[String]) -> Result<Vec<UserDocument>> {
        for key in keys {
            check_key(key)?;
        }

        Ok(self
            .documents
            .read()
            .await
            .iter()
            .filter(|document| keys.contains(&document.id))
            .cloned()
            .collect())
    }

    async fn add_to_set(&self, keys: &[String], field: EdgeField, value: &str) -> Result<u64> {
        self.check_writable()?;

        let mut changed = 0;
        for document in self.documents.write().await.iter_mut() {
            if !keys.contains(&document.id) {
                continue;
            }

            let edges = edges_mut(document, field).get_or_insert_with(Vec::new);
            if !edges.iter().any(|member| same_user(member, value)) {
                edges.push(value.to_string());
                changed += 1;
            }
        }

        Ok(changed)
    }

    async fn remove_from_set(
        &self,
        keys: &[String],
        field: EdgeField,
        value: &str,
    ) -> Result<u64> {
        self.check_writable()?;

        let mut changed = 0;
        for document in self.documents.write().await.iter_mut() {
            if !keys.contains(&document.id) {
                continue;
            }

            if let Some(edges) = edges_mut(document, field) {
                let before = edges.len();
                edges.retain(|member| !same_user(member, value));
                if edges.len() != before {
                    changed += 1;
                }
            }
        }

        Ok(changed)
    }

    async fn update_profile(&self, keys: &[String], update: &ProfileUpdate) -> Result<u64> {
        self.check_writable()?;

        let mut changed = 0;
        for document in self.documents.write().await.iter_mut() {
            if !keys.contains(&document.id) {
                continue;
            }

            if let Some(name) = &update.name {
                document.name = Some(name.clone());
            }
            if let Some(bio) = &update.bio {
                document.bio = Some(bio.clone());
            }
            if let Some(location) = &update.location {
                document.location = Some(location.clone());
            }
            if let Some(avatar) = &update.avatar {
                document.avatar = Some(avatar.clone());
            }
            changed += 1;
        }

        Ok(changed)
    }
}
