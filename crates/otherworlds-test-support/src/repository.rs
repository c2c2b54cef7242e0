//! Test repositories — in-memory and failing `Repository` implementations.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use otherworlds_core::error::DomainError;
use otherworlds_core::repository::{Repository, StorageRecord};
use uuid::Uuid;

/// A repository that keeps records in a map. Saves replace any record
/// stored under the same id, mirroring an upsert.
#[derive(Debug)]
pub struct InMemoryRepository<R> {
    records: Mutex<HashMap<Uuid, R>>,
}

impl<R: StorageRecord> InMemoryRepository<R> {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Create a repository pre-loaded with `records`.
    #[must_use]
    pub fn with_records(records: impl IntoIterator<Item = R>) -> Self {
        Self {
            records: Mutex::new(
                records
                    .into_iter()
                    .map(|record| (record.record_id(), record))
                    .collect(),
            ),
        }
    }

    /// Number of stored records.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Whether no record is stored.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }

    /// Returns a snapshot of the record stored under `id`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<R> {
        self.records.lock().unwrap().get(&id).cloned()
    }
}

impl<R: StorageRecord> Default for InMemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: StorageRecord> Repository<R> for InMemoryRepository<R> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<R>, DomainError> {
        Ok(self.records.lock().unwrap().get(&id).cloned())
    }

    async fn save(&self, record: &R) -> Result<(), DomainError> {
        self.records
            .lock()
            .unwrap()
            .insert(record.record_id(), record.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.records.lock().unwrap().remove(&id).is_some())
    }
}

/// A repository that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingRepository;

#[async_trait]
impl<R: StorageRecord> Repository<R> for FailingRepository {
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<R>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn save(&self, _record: &R) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn delete(&self, _id: Uuid) -> Result<bool, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: Uuid,
        text: &'static str,
    }

    impl StorageRecord for Note {
        fn record_id(&self) -> Uuid {
            self.id
        }
    }

    #[tokio::test]
    async fn test_save_replaces_record_with_same_id() {
        let repo = InMemoryRepository::new();
        let id = Uuid::new_v4();

        repo.save(&Note { id, text: "first" }).await.unwrap();
        repo.save(&Note { id, text: "second" }).await.unwrap();

        assert_eq!(repo.len(), 1);
        assert_eq!(repo.find_by_id(id).await.unwrap().unwrap().text, "second");
    }

    #[tokio::test]
    async fn test_delete_reports_whether_a_record_was_removed() {
        let id = Uuid::new_v4();
        let repo = InMemoryRepository::with_records([Note { id, text: "only" }]);

        assert!(repo.delete(id).await.unwrap());
        assert!(!repo.delete(id).await.unwrap());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_failing_repository_fails_every_call() {
        let repo = FailingRepository;

        let result = Repository::<Note>::find_by_id(&repo, Uuid::new_v4()).await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}
