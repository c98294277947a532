//! Record store abstraction.
//!
//! Workflows and views read and write records exclusively through [`RecordStore`],
//! so the backing technology can be swapped without touching business logic.
//! [`MemoryStore`] keeps records in insertion order behind a `tokio` lock;
//! [`super::database_store::DatabaseStore`] persists them with `SeaORM`.

use crate::{
    entities::{asset, change_request},
    errors::{Error, Result},
};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

/// A domain record addressable by a string identifier.
pub trait Record: Clone + Send + Sync + 'static {
    /// Record kind used in error messages, e.g. `"asset"`
    const KIND: &'static str;

    /// The identifier the record is keyed by in a store.
    fn record_id(&self) -> &str;
}

impl Record for change_request::Model {
    const KIND: &'static str = "change request";

    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Record for asset::Model {
    const KIND: &'static str = "asset";

    fn record_id(&self) -> &str {
        &self.asset_id
    }
}

/// Create/read/update access to an ordered collection of records.
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    /// All records in the store's stable order.
    async fn list(&self) -> Result<Vec<R>>;

    /// Looks up a record, `None` if absent.
    async fn get(&self, id: &str) -> Result<Option<R>>;

    /// Inserts a new record; fails with [`Error::AlreadyExists`] on a duplicate id.
    async fn create(&self, record: R) -> Result<R>;

    /// Replaces an existing record; fails with [`Error::NotFound`] if absent.
    async fn update(&self, record: R) -> Result<R>;

    /// Looks up a record, turning absence into [`Error::NotFound`].
    async fn require(&self, id: &str) -> Result<R> {
        self.get(id).await?.ok_or_else(|| Error::NotFound {
            kind: R::KIND,
            id: id.to_string(),
        })
    }
}

/// In-memory store preserving insertion order.
#[derive(Debug)]
pub struct MemoryStore<R> {
    records: RwLock<Vec<R>>,
}

impl<R> MemoryStore<R> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Creates a store pre-populated with `records`, kept in the given order.
    #[must_use]
    pub fn with_records(records: Vec<R>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

impl<R> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for MemoryStore<R> {
    async fn list(&self) -> Result<Vec<R>> {
        Ok(self.records.read().await.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<R>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|record| record.record_id() == id)
            .cloned())
    }

    async fn create(&self, record: R) -> Result<R> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.record_id() == record.record_id()) {
            return Err(Error::AlreadyExists {
                kind: R::KIND,
                id: record.record_id().to_string(),
            });
        }
        debug!("Storing {} '{}' in memory", R::KIND, record.record_id());
        records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, record: R) -> Result<R> {
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|r| r.record_id() == record.record_id())
            .ok_or_else(|| Error::NotFound {
                kind: R::KIND,
                id: record.record_id().to_string(),
            })?;
        *slot = record.clone();
        Ok(record)
    }
}
