//! Locates a user across the prioritized partitions.
//!
//! Partitions are consulted in order and the first hit is authoritative;
//! lower-priority partitions are never merged into it. A miss is an ordinary
//! `Ok(None)`, including for identifiers a partition cannot even represent.

use crate::modules::user::{
    identifier::Identifier,
    record::UserRecord,
    repository::{Partition, PartitionError, Partitions, UserDocument},
};
use itertools::Itertools;
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("failed to read partition {partition}: {source}")]
    Partition {
        partition: String,
        #[source]
        source: PartitionError,
    },
}

impl ResolveError {
    pub fn code(&self) -> &'static str {
        "RESOLUTION_FAILED"
    }
}

#[derive(Clone, Debug)]
pub struct Resolved {
    pub record: UserRecord,
    /// Index of the authoritative partition in the priority list.
    pub partition: usize,
}

/// Records found by [`resolve_many`], keyed by canonical id.
#[derive(Clone, Debug, Default)]
pub struct Resolution {
    records: HashMap<String, UserRecord>,
}

impl Resolution {
    /// Looks a requested identifier up in whatever form it was requested.
    pub fn get(&self, raw: &str) -> Option<&UserRecord> {
        Identifier::parse(raw)?
            .lookup_keys()
            .iter()
            .find_map(|key| self.records.get(key))
    }

    fn contains(&self, identifier: &Identifier) -> bool {
        identifier
            .lookup_keys()
            .iter()
            .any(|key| self.records.contains_key(key))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn read_error(partition: &dyn Partition, source: PartitionError) -> ResolveError {
    ResolveError::Partition {
        partition: partition.name().to_string(),
        source,
    }
}

pub async fn resolve(partitions: &Partitions, raw: &str) -> Result<Option<Resolved>, ResolveError> {
    match Identifier::parse(raw) {
        Some(identifier) => resolve_identifier(partitions, &identifier).await,
        None => Ok(None),
    }
}

pub async fn resolve_identifier(
    partitions: &Partitions,
    identifier: &Identifier,
) -> Result<Option<Resolved>, ResolveError> {
    for (index, partition) in partitions.iter().enumerate() {
        for key in identifier.lookup_keys() {
            match partition.find_one(&key).await {
                Ok(Some(document)) => {
                    tracing::debug!("Resolved user {} in partition {}", key, partition.name());
                    return Ok(Some(Resolved {
                        record: document.into(),
                        partition: index,
                    }));
                }
                Ok(None) | Err(PartitionError::InvalidKey) => continue,
                Err(source) => return Err(read_error(partition.as_ref(), source)),
            }
        }
    }

    Ok(None)
}

/// One key at a time, so a single unrepresentable key only costs itself.
async fn find_each(
    partition: &dyn Partition,
    keys: &[String],
) -> Result<Vec<UserDocument>, ResolveError> {
    let mut documents = vec![];

    for key in keys {
        match partition.find_one(key).await {
            Ok(Some(document)) => documents.push(document),
            Ok(None) | Err(PartitionError::InvalidKey) => (),
            Err(source) => return Err(read_error(partition, source)),
        }
    }

    Ok(documents)
}

/// Batch lookup. Each partition is queried only for the identifiers no
/// higher-priority partition has satisfied, and scanning stops as soon as
/// every identifier is found.
pub async fn resolve_many(
    partitions: &Partitions,
    raw_ids: &[String],
) -> Result<Resolution, ResolveError> {
    let mut resolution = Resolution::default();
    let mut pending = raw_ids
        .iter()
        .filter_map(|raw| Identifier::parse(raw))
        .unique_by(|identifier| identifier.lookup_keys())
        .collect::<Vec<_>>();

    for partition in partitions.iter() {
        if pending.is_empty() {
            break;
        }

        let keys = pending
            .iter()
            .flat_map(|identifier| identifier.lookup_keys())
            .unique()
            .collect::<Vec<_>>();

        let documents = match partition.find_many(&keys).await {
            Ok(documents) => documents,
            Err(PartitionError::InvalidKey) => find_each(partition.as_ref(), &keys).await?,
            Err(source) => return Err(read_error(partition.as_ref(), source)),
        };

        for document in documents {
            if !pending.iter().any(|identifier| identifier.matches(&document.id)) {
                continue;
            }
            let record = UserRecord::from(document);
            resolution.records.entry(record.id.clone()).or_insert(record);
        }

        pending.retain(|identifier| !resolution.contains(identifier));

        tracing::debug!(
            "Partition {} left {} identifiers unresolved",
            partition.name(),
            pending.len()
        );
    }

    Ok(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::user::repository::memory::MemoryPartition;
    use std::sync::Arc;

    const NATIVE: &str = "01HZY3M7Q8V2K5TFX9C4WJD6NB";

    fn document(id: &str, name: &str) -> UserDocument {
        UserDocument {
            id: id.to_string(),
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn partitions(primary: Vec<UserDocument>, legacy: Vec<UserDocument>) -> Partitions {
        Partitions::new()
            .with(Arc::new(MemoryPartition::with_documents("users", primary)))
            .with(Arc::new(MemoryPartition::with_documents("users_info", legacy)))
    }

    #[tokio::test]
    async fn resolves_from_the_only_partition_holding_the_user() {
        let partitions = partitions(
            vec![document(NATIVE, "Primary")],
            vec![document("u1", "Legacy")],
        );

        let primary = resolve(&partitions, NATIVE).await.unwrap().unwrap();
        assert_eq!(primary.record.id, NATIVE);
        assert_eq!(primary.partition, 0);

        let legacy = resolve(&partitions, "u1").await.unwrap().unwrap();
        assert_eq!(legacy.record.id, "u1");
        assert_eq!(legacy.partition, 1);
    }

    #[tokio::test]
    async fn higher_priority_partition_wins() {
        let partitions = partitions(
            vec![document("u1", "Current")],
            vec![document("u1", "Stale")],
        );

        let resolved = resolve(&partitions, "u1").await.unwrap().unwrap();
        assert_eq!(resolved.record.display_name, "Current");
        assert_eq!(resolved.partition, 0);
    }

    #[tokio::test]
    async fn native_ids_match_in_any_case() {
        let partitions = partitions(vec![document(NATIVE, "Primary")], vec![]);

        let resolved = resolve(&partitions, &NATIVE.to_lowercase())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.record.id, NATIVE);
    }

    #[tokio::test]
    async fn misses_are_not_errors() {
        let partitions = partitions(vec![document("u1", "A")], vec![]);

        for raw in ["", "   ", "missing", "bad\0key", NATIVE, "ZZZZZZZZZZZZZZZZZZZZZZZZZZ"] {
            assert!(resolve(&partitions, raw).await.unwrap().is_none(), "{raw:?}");
        }
    }

    #[tokio::test]
    async fn overflowing_base32_does_not_alias_a_stored_native_id() {
        let partitions = partitions(vec![document("7ZZZZZZZZZZZZZZZZZZZZZZZZZ", "Other")], vec![]);

        let resolved = resolve(&partitions, "ZZZZZZZZZZZZZZZZZZZZZZZZZZ").await.unwrap();
        assert!(resolved.is_none());

        let ids = vec!["ZZZZZZZZZZZZZZZZZZZZZZZZZZ".to_string()];
        assert!(resolve_many(&partitions, &ids).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn padded_legacy_uid_is_found_under_its_literal_key() {
        let partitions = partitions(vec![], vec![document(" padded ", "Padded")]);

        let resolved = resolve(&partitions, " padded ").await.unwrap().unwrap();
        assert_eq!(resolved.record.display_name, "Padded");
        assert!(resolve(&partitions, "padded").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn batch_deduplicates_and_merges_across_partitions() {
        let partitions = partitions(
            vec![document(NATIVE, "Primary"), document("u2", "Current")],
            vec![document("u1", "Legacy"), document("u2", "Stale")],
        );

        let ids = vec![
            NATIVE.to_lowercase(),
            NATIVE.to_string(),
            "u1".to_string(),
            "u2".to_string(),
            "u2".to_string(),
            "ghost".to_string(),
        ];
        let resolution = resolve_many(&partitions, &ids).await.unwrap();

        assert_eq!(resolution.len(), 3);
        assert_eq!(resolution.get(&NATIVE.to_lowercase()).unwrap().id, NATIVE);
        assert_eq!(resolution.get("u1").unwrap().display_name, "Legacy");
        assert_eq!(resolution.get("u2").unwrap().display_name, "Current");
        assert!(resolution.get("ghost").is_none());
    }

    #[tokio::test]
    async fn batch_isolates_unrepresentable_keys() {
        let partitions = partitions(vec![document("u1", "A")], vec![]);

        let ids = vec!["u1".to_string(), "bad\0key".to_string()];
        let resolution = resolve_many(&partitions, &ids).await.unwrap();

        assert_eq!(resolution.len(), 1);
        assert!(resolution.get("u1").is_some());
    }

    #[tokio::test]
    async fn batch_with_nothing_requested_is_empty() {
        let partitions = partitions(vec![document("u1", "A")], vec![]);
        assert!(resolve_many(&partitions, &[]).await.unwrap().is_empty());
    }
}
