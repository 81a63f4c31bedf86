use super::resolver::{self, ResolveError};
use crate::{
    modules::user::{
        identifier::same_user,
        record::UserRecord,
        repository::{EdgeField, Partitions},
    },
    utils::pagination::{Paginated, Pagination},
};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Full single-profile view, edge arrays included.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub bio: String,
    pub location: String,
    pub approved: bool,
    pub blocked: bool,
    pub followers: Vec<String>,
    pub following: Vec<String>,
    pub followers_count: usize,
    pub following_count: usize,
    pub is_following: bool,
    pub created_at: Option<NaiveDateTime>,
}

/// List-entry view: counts only, so list responses stay small.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub followers_count: usize,
    pub following_count: usize,
    pub is_following: bool,
}

/// Whether `viewer_id` follows the record's owner. Nobody follows themselves.
pub fn is_following(record: &UserRecord, viewer_id: Option<&str>) -> bool {
    match viewer_id {
        Some(viewer_id) if !same_user(viewer_id, &record.id) => record.has_follower(viewer_id),
        _ => false,
    }
}

pub fn format(record: UserRecord, viewer_id: Option<&str>) -> ProfileView {
    let is_following = is_following(&record, viewer_id);

    ProfileView {
        followers_count: record.followers.len(),
        following_count: record.following.len(),
        is_following,
        id: record.id,
        name: record.display_name,
        avatar: record.avatar_url,
        bio: record.bio,
        location: record.location,
        approved: record.approved,
        blocked: record.blocked,
        followers: record.followers,
        following: record.following,
        created_at: record.created_at,
    }
}

pub fn summarize(record: &UserRecord, viewer_id: Option<&str>) -> ProfileSummary {
    ProfileSummary {
        id: record.id.clone(),
        name: record.display_name.clone(),
        avatar: record.avatar_url.clone(),
        followers_count: record.followers.len(),
        following_count: record.following.len(),
        is_following: is_following(record, viewer_id),
    }
}

/// One page of a user's followers or followings as summaries. `None` when
/// the user itself does not resolve. Members that no longer resolve are
/// skipped but still counted in `total`.
pub async fn list_connections(
    partitions: &Partitions,
    user_id: &str,
    field: EdgeField,
    viewer_id: Option<&str>,
    pagination: &Pagination,
) -> Result<Option<Paginated<ProfileSummary>>, ResolveError> {
    let Some(owner) = resolver::resolve(partitions, user_id).await? else {
        return Ok(None);
    };

    let edges = match field {
        EdgeField::Followers => owner.record.followers,
        EdgeField::Following => owner.record.following,
    };

    let page = edges
        .iter()
        .skip(pagination.offset())
        .take(pagination.per_page as usize)
        .cloned()
        .collect::<Vec<_>>();

    let resolution = resolver::resolve_many(partitions, &page).await?;

    let items = page
        .iter()
        .filter_map(|member| resolution.get(member))
        .map(|record| summarize(record, viewer_id))
        .collect::<Vec<_>>();

    Ok(Some(Paginated::new(
        items,
        edges.len() as u32,
        pagination.page,
        pagination.per_page,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::user::repository::{memory::MemoryPartition, UserDocument};
    use std::sync::Arc;

    fn record(id: &str, followers: &[&str]) -> UserRecord {
        UserRecord::from(UserDocument {
            id: id.to_string(),
            followers: Some(followers.iter().map(|f| f.to_string()).collect()),
            ..Default::default()
        })
    }

    #[test]
    fn is_following_depends_on_viewer() {
        let record = record("u1", &["u2", "u3"]);

        assert!(format(record.clone(), Some("u2")).is_following);
        assert!(!format(record.clone(), Some("u9")).is_following);
        assert!(!format(record.clone(), Some("u1")).is_following);
        assert!(!format(record, None).is_following);
    }

    #[test]
    fn counts_survive_missing_arrays() {
        let view = format(
            UserRecord::from(UserDocument {
                id: "u1".to_string(),
                ..Default::default()
            }),
            None,
        );

        assert_eq!(view.followers_count, 0);
        assert_eq!(view.following_count, 0);
    }

    #[test]
    fn summaries_omit_edge_arrays() {
        let summary = summarize(&record("u1", &["u2"]), Some("u2"));
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["followersCount"], 1);
        assert_eq!(json["isFollowing"], true);
        assert!(json.get("followers").is_none());
        assert!(json.get("following").is_none());
    }

    #[tokio::test]
    async fn connections_are_paginated_and_skip_dangling_members() {
        let owner = UserDocument {
            id: "owner".to_string(),
            followers: Some(vec![
                "f1".to_string(),
                "gone".to_string(),
                "f2".to_string(),
                "f3".to_string(),
            ]),
            ..Default::default()
        };
        let follower = |id: &str| UserDocument {
            id: id.to_string(),
            name: Some(id.to_uppercase()),
            followers: Some(vec!["viewer".to_string()]),
            ..Default::default()
        };
        let partitions = Partitions::new()
            .with(Arc::new(MemoryPartition::with_documents(
                "users",
                vec![owner, follower("f1"), follower("f2")],
            )))
            .with(Arc::new(MemoryPartition::with_documents(
                "users_info",
                vec![follower("f3")],
            )));

        let first = list_connections(
            &partitions,
            "owner",
            EdgeField::Followers,
            Some("viewer"),
            &Pagination { page: 1, per_page: 2 },
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(first.meta.total, 4);
        assert_eq!(first.items.len(), 1);
        assert_eq!(first.items[0].name, "F1");
        assert!(first.items[0].is_following);

        let second = list_connections(
            &partitions,
            "owner",
            EdgeField::Followers,
            None,
            &Pagination { page: 2, per_page: 2 },
        )
        .await
        .unwrap()
        .unwrap();

        let ids = second.items.iter().map(|s| s.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["f2", "f3"]);
        assert!(second.items.iter().all(|s| !s.is_following));
    }

    #[tokio::test]
    async fn connections_of_unknown_user_are_none() {
        let partitions = Partitions::new().with(Arc::new(MemoryPartition::new("users")));

        let listed = list_connections(
            &partitions,
            "ghost",
            EdgeField::Following,
            None,
            &Pagination { page: 1, per_page: 10 },
        )
        .await
        .unwrap();

        assert!(listed.is_none());
    }
}
