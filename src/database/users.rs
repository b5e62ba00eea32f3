use super::Database;
use crate::models::AttributeField;
use crate::models::UserRecord;
use crate::Result;

impl Database {
    /// Replace the users table contents with a freshly ingested set.
    ///
    /// Ingestion is a destructive reload: the previous rows are gone after
    /// the transaction commits, matching the offline rebuild semantics of
    /// the vector and graph stores.
    pub async fn replace_users(&self, records: &[UserRecord]) -> Result<usize> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM users").execute(&mut *tx).await?;

        for record in records {
            sqlx::query(
                r"
                INSERT INTO users (user_id, name, email, company, school, location, title, bio)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ",
            )
            .bind(&record.user_id)
            .bind(&record.name)
            .bind(&record.email)
            .bind(&record.company)
            .bind(&record.school)
            .bind(&record.location)
            .bind(&record.title)
            .bind(&record.bio)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!("Loaded {} user records", records.len());

        Ok(records.len())
    }

    /// Get a single user by id
    pub async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as("SELECT * FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(self.pool())
            .await?;

        Ok(user)
    }

    /// Get users by id set, used to hydrate recommendation cards.
    ///
    /// Rows come back in user_id order regardless of the requested order;
    /// callers that care about presentation order re-sort against their own
    /// id list.
    pub async fn get_users_by_ids(&self, user_ids: &[String]) -> Result<Vec<UserRecord>> {
        let users = sqlx::query_as(
            "SELECT * FROM users WHERE user_id = ANY($1) ORDER BY user_id ASC",
        )
        .bind(user_ids)
        .fetch_all(self.pool())
        .await?;

        Ok(users)
    }

    /// Exact-match name lookup, returning at most two ids.
    ///
    /// Names are assumed unique within the dataset; that is an assumption
    /// about the shipped data, not an invariant the schema enforces. The
    /// second id, when present, lets the resolver detect ambiguity.
    pub async fn get_user_ids_by_name(&self, name: &str) -> Result<Vec<String>> {
        let user_ids = sqlx::query_scalar(
            "SELECT user_id FROM users WHERE name = $1 ORDER BY user_id ASC LIMIT 2",
        )
        .bind(name)
        .fetch_all(self.pool())
        .await?;

        Ok(user_ids)
    }

    /// Equality filter on an allow-listed attribute column.
    ///
    /// The column name comes from [`AttributeField::column`], never from
    /// caller input; the value is always bound as a parameter.
    pub async fn find_users_by_attribute(
        &self,
        field: AttributeField,
        value: &str,
    ) -> Result<Vec<UserRecord>> {
        let query = format!(
            "SELECT * FROM users WHERE {} = $1 ORDER BY user_id ASC",
            field.column()
        );

        let users = sqlx::query_as(&query)
            .bind(value)
            .fetch_all(self.pool())
            .await?;

        Ok(users)
    }

    /// List all users, id order
    pub async fn list_users(&self, limit: i64) -> Result<Vec<UserRecord>> {
        let users = sqlx::query_as("SELECT * FROM users ORDER BY user_id ASC LIMIT $1")
            .bind(limit)
            .fetch_all(self.pool())
            .await?;

        Ok(users)
    }

    /// Count users in the relational store
    pub async fn count_users(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool())
            .await?;

        Ok(count.0)
    }
}
