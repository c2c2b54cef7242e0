//! Record repository abstraction.
//!
//! Bounded contexts persist their aggregates as flat storage records. The
//! repository only moves whole records in and out; mapping to and from the
//! domain model is the context's own business.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DomainError;

/// A flat, storage-shaped record addressed by a UUID.
pub trait StorageRecord: Clone + Send + Sync + 'static {
    /// Returns the identifier under which the record is stored.
    fn record_id(&self) -> Uuid;
}

/// Repository trait for loading and storing records of one kind.
///
/// Implementations own transactions, retries and cancellation. Callers are
/// handed fully-loaded records, nested sub-records included.
#[async_trait]
pub trait Repository<R: StorageRecord>: Send + Sync {
    /// Load a record by identifier. Returns `None` when no record exists.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<R>, DomainError>;

    /// Insert the record, or replace the record stored under the same id.
    async fn save(&self, record: &R) -> Result<(), DomainError>;

    /// Delete a record. Returns whether a record was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}
