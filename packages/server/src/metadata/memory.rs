use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use super::{MetadataError, MetadataStore};
use crate::entity::file_record;

/// In-memory metadata store.
///
/// Used by the test harness and suitable for ephemeral single-process
/// deployments where records may vanish on restart.
#[derive(Default)]
pub struct InMemoryMetadataStore {
    records: DashMap<Uuid, file_record::Model>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn insert(&self, record: file_record::Model) -> Result<(), MetadataError> {
        match self.records.entry(record.id) {
            Entry::Occupied(_) => Err(MetadataError::DuplicateId(record.id)),
            Entry::Vacant(vacant) => {
                vacant.insert(record);
                Ok(())
            }
        }
    }

    async fn find(&self, id: Uuid) -> Result<Option<file_record::Model>, MetadataError> {
        Ok(self.records.get(&id).map(|r| r.value().clone()))
    }
}
