use async_trait::async_trait;

use super::{ContactRequest, ContactStore, DbPool, NewContactRequest, StoreError};

/// Postgres-backed store over the `contact_requests` table.
#[derive(Clone)]
pub struct PgContactStore {
    pool: DbPool,
}

impl PgContactStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactStore for PgContactStore {
    async fn create(&self, record: NewContactRequest) -> Result<ContactRequest, StoreError> {
        let row = sqlx::query_as::<_, ContactRequest>(
            r#"
            INSERT INTO contact_requests (name, email, whatsapp, message)
            VALUES ($1, $2, $3, $4)
            RETURNING
                id,
                name,
                email,
                whatsapp,
                message,
                created_at,
                updated_at
            "#,
        )
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.whatsapp)
        .bind(&record.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM contact_requests")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn list_newest(&self, offset: i64, limit: i64) -> Result<Vec<ContactRequest>, StoreError> {
        let rows = sqlx::query_as::<_, ContactRequest>(
            r#"
            SELECT
                id,
                name,
                email,
                whatsapp,
                message,
                created_at,
                updated_at
            FROM contact_requests
            ORDER BY created_at DESC, seq DESC
            OFFSET $1
            LIMIT $2
            "#,
        )
        // $1 = rows to skip
        .bind(offset)
        // $2 = page size
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
