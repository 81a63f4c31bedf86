//! Follow/unfollow edges.
//!
//! A logical user may be materialized in several partitions, so every edge
//! change is written to every partition, keyed by the user's canonical id.
//! Only the write to the partition the user resolved from is authoritative;
//! failures elsewhere are logged as partial syncs and otherwise ignored.

use super::resolver::{self, ResolveError, Resolved};
use crate::modules::user::{
    identifier::{same_user, storage_keys},
    repository::{EdgeField, PartitionError, Partitions},
};
use futures::future::join_all;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Actor,
    Target,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actor => f.write_str("actor"),
            Self::Target => f.write_str("target"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("a user cannot follow themselves")]
    SelfFollow,
    #[error("{0} user not found")]
    UserNotFound(Side),
    #[error("failed to update partition {partition}: {source}")]
    MutationFailed {
        partition: String,
        #[source]
        source: PartitionError,
    },
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl GraphError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::SelfFollow => "SELF_FOLLOW",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::MutationFailed { .. } => "MUTATION_FAILED",
            Self::Resolve(err) => err.code(),
        }
    }

    /// Every edge operation is an idempotent set update, so storage failures
    /// can be retried as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::MutationFailed { .. } | Self::Resolve(_))
    }
}

/// A write to a non-authoritative partition that failed.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialSyncWarning {
    pub partition: String,
    pub user_id: String,
    pub field: EdgeField,
    pub cause: String,
}

#[derive(Debug, Default)]
pub struct EdgeOutcome {
    /// False when the edge was already in the requested state everywhere.
    pub changed: bool,
    pub warnings: Vec<PartialSyncWarning>,
}

#[derive(Clone, Copy, Debug)]
enum Operation {
    Add,
    Remove,
}

struct EdgeWrite<'a> {
    owner: &'a Resolved,
    field: EdgeField,
    member: &'a str,
}

pub async fn follow(
    partitions: &Partitions,
    actor_id: &str,
    target_id: &str,
) -> Result<EdgeOutcome, GraphError> {
    mutate(partitions, actor_id, target_id, Operation::Add).await
}

pub async fn unfollow(
    partitions: &Partitions,
    actor_id: &str,
    target_id: &str,
) -> Result<EdgeOutcome, GraphError> {
    mutate(partitions, actor_id, target_id, Operation::Remove).await
}

async fn mutate(
    partitions: &Partitions,
    actor_id: &str,
    target_id: &str,
    operation: Operation,
) -> Result<EdgeOutcome, GraphError> {
    if same_user(actor_id, target_id) {
        return Err(GraphError::SelfFollow);
    }

    let (actor, target) = futures::join!(
        resolver::resolve(partitions, actor_id),
        resolver::resolve(partitions, target_id)
    );
    let actor = actor?.ok_or(GraphError::UserNotFound(Side::Actor))?;
    let target = target?.ok_or(GraphError::UserNotFound(Side::Target))?;

    // Two spellings of the same user only show up after resolution.
    if actor.record.id == target.record.id {
        return Err(GraphError::SelfFollow);
    }

    let writes = [
        EdgeWrite {
            owner: &actor,
            field: EdgeField::Following,
            member: &target.record.id,
        },
        EdgeWrite {
            owner: &target,
            field: EdgeField::Followers,
            member: &actor.record.id,
        },
    ];

    let mut pending = vec![];
    for write in &writes {
        let keys = storage_keys(&write.owner.record.id);
        for (index, partition) in partitions.iter().enumerate() {
            let keys = keys.clone();
            pending.push(async move {
                let result = match operation {
                    Operation::Add => partition.add_to_set(&keys, write.field, write.member).await,
                    Operation::Remove => {
                        partition
                            .remove_from_set(&keys, write.field, write.member)
                            .await
                    }
                };
                (write, index, partition, result)
            });
        }
    }

    let mut outcome = EdgeOutcome::default();
    let mut failure = None;

    for (write, index, partition, result) in join_all(pending).await {
        match result {
            Ok(changed) => outcome.changed |= changed > 0,
            Err(source) if index == write.owner.partition => {
                tracing::error!(
                    "Failed to update {} of user {} in authoritative partition {}: {}",
                    write.field.column(),
                    write.owner.record.id,
                    partition.name(),
                    source
                );
                failure.get_or_insert(GraphError::MutationFailed {
                    partition: partition.name().to_string(),
                    source,
                });
            }
            Err(source) => {
                tracing::warn!(
                    partition = partition.name(),
                    user_id = write.owner.record.id.as_str(),
                    field = write.field.column(),
                    "Partial sync: {}",
                    source
                );
                outcome.warnings.push(PartialSyncWarning {
                    partition: partition.name().to_string(),
                    user_id: write.owner.record.id.clone(),
                    field: write.field,
                    cause: source.to_string(),
                });
            }
        }
    }

    if let Some(err) = failure {
        return Err(err);
    }

    if !outcome.changed {
        tracing::debug!(
            "Edge {} -> {} already in requested state ({:?})",
            actor.record.id,
            target.record.id,
            operation
        );
    }

    Ok(outcome)
}
