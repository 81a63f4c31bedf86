use super::{
    identifier::{normalize, same_user},
    repository::UserDocument,
};
use chrono::NaiveDateTime;
use itertools::Itertools;
use serde::Serialize;

/// The single in-memory shape every partition's document is reconciled into.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub display_name: String,
    pub avatar_url: String,
    pub bio: String,
    pub location: String,
    pub followers: Vec<String>,
    pub following: Vec<String>,
    pub approved: bool,
    pub blocked: bool,
    pub created_at: Option<NaiveDateTime>,
}

fn first_non_empty(candidates: &[&Option<String>]) -> String {
    candidates
        .iter()
        .filter_map(|candidate| candidate.as_deref())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Collapses legacy edge arrays into an ordered set of canonical ids: blanks
/// and self-edges are dropped, and spellings of the same user collapse into
/// the first occurrence.
fn edge_set(owner: &str, edges: Option<Vec<String>>) -> Vec<String> {
    edges
        .unwrap_or_default()
        .iter()
        .filter(|member| !member.trim().is_empty() && !same_user(member, owner))
        .map(|member| normalize(member))
        .unique()
        .collect()
}

impl From<UserDocument> for UserRecord {
    fn from(document: UserDocument) -> Self {
        let followers = edge_set(&document.id, document.followers);
        let following = edge_set(&document.id, document.following);

        Self {
            display_name: first_non_empty(&[&document.name]),
            avatar_url: first_non_empty(&[&document.avatar, &document.profile_image_url]),
            bio: document.bio.unwrap_or_default(),
            location: document.location.unwrap_or_default(),
            followers,
            following,
            approved: document.approved.unwrap_or(false),
            blocked: document.blocked.unwrap_or(false),
            created_at: document.created_at,
            id: document.id,
        }
    }
}

impl UserRecord {
    pub fn has_follower(&self, user_id: &str) -> bool {
        self.followers.iter().any(|member| same_user(member, user_id))
    }

    pub fn is_following(&self, user_id: &str) -> bool {
        self.following.iter().any(|member| same_user(member, user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(id: &str) -> UserDocument {
        UserDocument {
            id: id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn primary_avatar_wins_over_legacy_profile_image() {
        let record = UserRecord::from(UserDocument {
            avatar: Some("https://cdn.example/a.png".to_string()),
            profile_image_url: Some("https://cdn.example/legacy.png".to_string()),
            ..document("u1")
        });
        assert_eq!(record.avatar_url, "https://cdn.example/a.png");
    }

    #[test]
    fn blank_avatar_falls_back_to_legacy_profile_image() {
        let record = UserRecord::from(UserDocument {
            avatar: Some("  ".to_string()),
            profile_image_url: Some("https://cdn.example/legacy.png".to_string()),
            ..document("u1")
        });
        assert_eq!(record.avatar_url, "https://cdn.example/legacy.png");

        let record = UserRecord::from(document("u2"));
        assert_eq!(record.avatar_url, "");
    }

    #[test]
    fn missing_arrays_and_flags_default_to_empty() {
        let record = UserRecord::from(document("u1"));

        assert!(record.followers.is_empty());
        assert!(record.following.is_empty());
        assert!(!record.approved);
        assert!(!record.blocked);
        assert_eq!(record.display_name, "");
    }

    #[test]
    fn edges_are_deduplicated_and_never_contain_self() {
        let record = UserRecord::from(UserDocument {
            followers: Some(vec![
                "u2".to_string(),
                "u1".to_string(),
                "u3".to_string(),
                "u2".to_string(),
                "".to_string(),
            ]),
            following: Some(vec!["u1".to_string()]),
            ..document("u1")
        });

        assert_eq!(record.followers, vec!["u2", "u3"]);
        assert!(record.following.is_empty());
        assert!(record.has_follower("u3"));
        assert!(!record.is_following("u2"));
    }

    #[test]
    fn spellings_of_one_user_collapse_to_the_canonical_id() {
        let native = "01HZY3M7Q8V2K5TFX9C4WJD6NB";
        let record = UserRecord::from(UserDocument {
            followers: Some(vec![
                native.to_lowercase(),
                " u2 ".to_string(),
                native.to_string(),
                "u2".to_string(),
            ]),
            ..document("u1")
        });

        assert_eq!(record.followers, vec![native, "u2"]);
        assert!(record.has_follower(&native.to_lowercase()));
    }
}
