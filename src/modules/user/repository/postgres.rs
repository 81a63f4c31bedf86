use super::{EdgeField, Partition, PartitionError, ProfileUpdate, Result, UserDocument};
use crate::modules::user::identifier::Identifier;
use async_trait::async_trait;
use sqlx::PgPool;

const COLUMNS: &str = "
    id,
    name,
    avatar,
    profile_image_url,
    bio,
    location,
    followers,
    following,
    approved,
    blocked,
    created_at,
    updated_at
";

// Stored member `m` names the user whose trimmed form is $1, or whose
// canonical native id is $2 (NULL for external ids).
const MEMBER_MATCHES: &str = "(btrim(m) = $1 OR COALESCE(upper(btrim(m)) = $2, false))";

// character_not_in_repertoire, invalid_text_representation
const INVALID_KEY_CODES: [&str; 2] = ["22021", "22P02"];

fn member_forms(value: &str) -> (String, Option<String>) {
    match Identifier::parse(value) {
        Some(identifier) => (identifier.normalized(), identifier.canonical_native()),
        None => (value.to_string(), None),
    }
}

/// A user partition backed by one Postgres table with a `TEXT` primary key.
pub struct PgPartition {
    pool: PgPool,
    table: String,
}

impl PgPartition {
    /// `table` is interpolated into SQL and must already be validated.
    pub fn new(pool: PgPool, table: String) -> Self {
        Self { pool, table }
    }

    fn classify(&self, operation: &str, err: sqlx::Error) -> PartitionError {
        let invalid_key = err
            .as_database_error()
            .and_then(|db_err| db_err.code())
            .map(|code| INVALID_KEY_CODES.iter().any(|invalid| *invalid == code))
            .unwrap_or(false);

        if invalid_key {
            tracing::debug!("Key rejected by {} during {}: {}", self.table, operation, err);
            return PartitionError::InvalidKey;
        }

        tracing::error!(
            "Error occurred during {} on partition {}: {}",
            operation,
            self.table,
            err
        );
        PartitionError::Database(err)
    }
}

#[async_trait]
impl Partition for PgPartition {
    fn name(&self) -> &str {
        &self.table
    }

    async fn find_one(&self, key: &str) -> Result<Option<UserDocument>> {
        let sql = format!("SELECT {COLUMNS} FROM {} WHERE id = $1 LIMIT 1", self.table);

        sqlx::query_as::<_, UserDocument>(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| self.classify("find_one", err))
    }

    async fn find_many(&self, keys: &[String]) -> Result<Vec<UserDocument>> {
        if keys.is_empty() {
            return Ok(vec![]);
        }

        let sql = format!("SELECT {COLUMNS} FROM {} WHERE id = ANY($1)", self.table);

        sqlx::query_as::<_, UserDocument>(&sql)
            .bind(keys)
            .fetch_all(&self.pool)
            .await
            .map_err(|err| self.classify("find_many", err))
    }

    async fn add_to_set(&self, keys: &[String], field: EdgeField, value: &str) -> Result<u64> {
        let column = field.column();
        let (normalized, native) = member_forms(value);
        let sql = format!(
            "
            UPDATE {table} SET
                {column} = array_append(COALESCE({column}, ARRAY[]::TEXT[]), $3),
                updated_at = NOW()
            WHERE
                id = ANY($4)
                AND NOT EXISTS (
                    SELECT 1 FROM unnest({column}) AS m WHERE {MEMBER_MATCHES}
                )
            ",
            table = self.table,
        );

        sqlx::query(&sql)
            .bind(normalized)
            .bind(native)
            .bind(value)
            .bind(keys)
            .execute(&self.pool)
            .await
            .map(|result| result.rows_affected())
            .map_err(|err| self.classify("add_to_set", err))
    }

    async fn remove_from_set(
        &self,
        keys: &[String],
        field: EdgeField,
        value: &str,
    ) -> Result<u64> {
        let column = field.column();
        let (normalized, native) = member_forms(value);
        let sql = format!(
            "
            UPDATE {table} SET
                {column} = ARRAY(
                    SELECT m FROM unnest({column}) WITH ORDINALITY AS e(m, n)
                    WHERE NOT {MEMBER_MATCHES}
                    ORDER BY n
                ),
                updated_at = NOW()
            WHERE
                id = ANY($3)
                AND EXISTS (
                    SELECT 1 FROM unnest({column}) AS m WHERE {MEMBER_MATCHES}
                )
            ",
            table = self.table,
        );

        sqlx::query(&sql)
            .bind(normalized)
            .bind(native)
            .bind(keys)
            .execute(&self.pool)
            .await
            .map(|result| result.rows_affected())
            .map_err(|err| self.classify("remove_from_set", err))
    }

    async fn update_profile(&self, keys: &[String], update: &ProfileUpdate) -> Result<u64> {
        let sql = format!(
            "
            UPDATE {} SET
                name = COALESCE($1, name),
                bio = COALESCE($2, bio),
                location = COALESCE($3, location),
                avatar = COALESCE($4, avatar),
                updated_at = NOW()
            WHERE
                id = ANY($5)
            ",
            self.table
        );

        sqlx::query(&sql)
            .bind(update.name.as_deref())
            .bind(update.bio.as_deref())
            .bind(update.location.as_deref())
            .bind(update.avatar.as_deref())
            .bind(keys)
            .execute(&self.pool)
            .await
            .map(|result| result.rows_affected())
            .map_err(|err| self.classify("update_profile", err))
    }
}
