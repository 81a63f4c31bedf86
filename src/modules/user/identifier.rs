//! User identifiers as they arrive at the boundary.
//!
//! Two key schemes live side by side: ULIDs generated by this service and
//! opaque UIDs issued by the legacy auth provider. Any non-empty string is a
//! valid identifier; it is only ever *classified*, never rejected.

use itertools::Itertools;
use ulid::Ulid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Identifier {
    /// Decodes as a ULID. `literal` is kept exactly as given so it can be tried first.
    Native { literal: String, id: Ulid },
    /// Anything else, also kept exactly as given.
    External(String),
}

impl Identifier {
    /// Returns `None` for empty or whitespace-only input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        // 26 base32 characters can spell more than 128 bits and the decoder
        // wraps those, so only strings that round-trip are native.
        Some(match Ulid::from_string(trimmed) {
            Ok(id) if id.to_string().eq_ignore_ascii_case(trimmed) => Self::Native {
                literal: raw.to_string(),
                id,
            },
            _ => Self::External(raw.to_string()),
        })
    }

    fn literal(&self) -> &str {
        match self {
            Self::Native { literal, .. } => literal,
            Self::External(uid) => uid,
        }
    }

    /// Canonical string form, used for every comparison outside storage.
    pub fn normalized(&self) -> String {
        match self {
            Self::Native { id, .. } => id.to_string(),
            Self::External(uid) => uid.trim().to_string(),
        }
    }

    /// Uppercase ULID form, for native identifiers only.
    pub fn canonical_native(&self) -> Option<String> {
        match self {
            Self::Native { id, .. } => Some(id.to_string()),
            Self::External(_) => None,
        }
    }

    /// Keys to try against a partition: the literal as given, then trimmed,
    /// then the canonical form.
    pub fn lookup_keys(&self) -> Vec<String> {
        let literal = self.literal();

        [
            literal.to_string(),
            literal.trim().to_string(),
            self.normalized(),
        ]
        .into_iter()
        .unique()
        .collect()
    }

    pub fn matches(&self, key: &str) -> bool {
        self.lookup_keys().iter().any(|candidate| candidate == key)
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native { .. })
    }
}

/// True when both strings name the same user id, regardless of scheme or case
/// of a native id.
pub fn same_user(a: &str, b: &str) -> bool {
    match (Identifier::parse(a), Identifier::parse(b)) {
        (Some(a), Some(b)) => a.normalized() == b.normalized(),
        _ => false,
    }
}

/// Canonical form of a stored id, or the id itself when it is blank.
pub fn normalize(user_id: &str) -> String {
    Identifier::parse(user_id)
        .map(|identifier| identifier.normalized())
        .unwrap_or_else(|| user_id.to_string())
}

/// Keys under which a stored user id may appear in any partition.
pub fn storage_keys(user_id: &str) -> Vec<String> {
    Identifier::parse(user_id)
        .map(|identifier| identifier.lookup_keys())
        .unwrap_or_else(|| vec![user_id.to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;

    const NATIVE: &str = "01HZY3M7Q8V2K5TFX9C4WJD6NB";

    #[test]
    fn empty_input_is_not_an_identifier() {
        assert_eq!(Identifier::parse(""), None);
        assert_eq!(Identifier::parse("   "), None);
    }

    #[test]
    fn legacy_uids_are_external() {
        let id = Identifier::parse("Xk2pQ9wLmN3rT7vY1zA4bC6dE8f0").unwrap();
        assert!(!id.is_native());
        assert_eq!(id.lookup_keys(), vec!["Xk2pQ9wLmN3rT7vY1zA4bC6dE8f0"]);
    }

    #[test]
    fn malformed_strings_never_panic() {
        for raw in ["u1", "not a ulid", "ZZZZZZZZZZZZZZZZZZZZZZZZZZ", "\0\0", "💥"] {
            let id = Identifier::parse(raw).unwrap();
            assert_eq!(id.normalized(), raw);
        }
    }

    #[test]
    fn lowercase_native_id_tries_literal_then_canonical() {
        let lower = NATIVE.to_lowercase();
        let id = Identifier::parse(&lower).unwrap();

        assert!(id.is_native());
        assert_eq!(id.lookup_keys(), vec![lower.clone(), NATIVE.to_string()]);
        assert_eq!(id.normalized(), NATIVE);
        assert!(id.matches(NATIVE));
        assert!(id.matches(&lower));
    }

    #[test]
    fn canonical_native_id_has_a_single_key() {
        let id = Identifier::parse(NATIVE).unwrap();
        assert_eq!(id.lookup_keys(), vec![NATIVE.to_string()]);
    }

    #[test]
    fn overflowing_base32_is_not_native() {
        // Decodes, but only by wrapping to a different id.
        let id = Identifier::parse("ZZZZZZZZZZZZZZZZZZZZZZZZZZ").unwrap();
        assert!(!id.is_native());
        assert_eq!(id.lookup_keys(), vec!["ZZZZZZZZZZZZZZZZZZZZZZZZZZ"]);

        assert!(!same_user("8ZZZZZZZZZZZZZZZZZZZZZZZZZ", "0ZZZZZZZZZZZZZZZZZZZZZZZZZ"));
        assert!(!same_user("ZZZZZZZZZZZZZZZZZZZZZZZZZZ", "7ZZZZZZZZZZZZZZZZZZZZZZZZZ"));
    }

    #[test]
    fn padded_uid_is_tried_as_given_first() {
        let id = Identifier::parse(" legacy-uid ").unwrap();

        assert_eq!(id.lookup_keys(), vec![" legacy-uid ", "legacy-uid"]);
        assert_eq!(id.normalized(), "legacy-uid");
        assert_eq!(id.canonical_native(), None);
    }

    #[test]
    fn padded_native_id_falls_back_to_canonical() {
        let padded = format!(" {} ", NATIVE.to_lowercase());
        let id = Identifier::parse(&padded).unwrap();

        assert_eq!(
            id.lookup_keys(),
            vec![padded.clone(), NATIVE.to_lowercase(), NATIVE.to_string()]
        );
        assert_eq!(id.canonical_native().as_deref(), Some(NATIVE));
    }

    #[test]
    fn same_user_compares_normalized_forms() {
        assert!(same_user(NATIVE, &NATIVE.to_lowercase()));
        assert!(same_user("u1", " u1 "));
        assert!(!same_user("u1", "U1"));
        assert!(!same_user("", ""));
    }
}
