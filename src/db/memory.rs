use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ContactRequest, ContactStore, NewContactRequest, StoreError};

/// In-process store for local runs and tests. Records live in insertion order.
#[derive(Default)]
pub struct MemoryContactStore {
    records: RwLock<Vec<ContactRequest>>,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every stored record, oldest first.
    pub async fn snapshot(&self) -> Vec<ContactRequest> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn create(&self, record: NewContactRequest) -> Result<ContactRequest, StoreError> {
        let now = Utc::now();
        let stored = ContactRequest {
            id: Uuid::new_v4(),
            name: record.name,
            email: record.email,
            whatsapp: record.whatsapp,
            message: record.message,
            created_at: now,
            updated_at: now,
        };

        self.records.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.records.read().await.len() as i64)
    }

    async fn list_newest(&self, offset: i64, limit: i64) -> Result<Vec<ContactRequest>, StoreError> {
        let records = self.records.read().await;

        // Reverse first so the stable sort keeps later inserts ahead on ties.
        let mut newest: Vec<&ContactRequest> = records.iter().rev().collect();
        newest.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(newest
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}
