// In-memory store for tests and single-process deployments
use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::StateStore;
use crate::primitives::{FieldElement, GroupId, Result};
use crate::registry::GroupRecord;

pub struct MemoryStore {
    groups: RwLock<HashMap<GroupId, GroupRecord>>,
    nullifiers: RwLock<HashSet<FieldElement>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            groups: RwLock::new(HashMap::new()),
            nullifiers: RwLock::new(HashSet::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn put_group(&self, record: &GroupRecord) -> Result<()> {
        self.groups.write().await.insert(record.id, record.clone());
        Ok(())
    }

    async fn get_group(&self, id: GroupId) -> Result<Option<GroupRecord>> {
        Ok(self.groups.read().await.get(&id).cloned())
    }

    async fn put_nullifier(&self, nullifier: &FieldElement) -> Result<()> {
        self.nullifiers.write().await.insert(*nullifier);
        Ok(())
    }

    async fn has_nullifier(&self, nullifier: &FieldElement) -> Result<bool> {
        Ok(self.nullifiers.read().await.contains(nullifier))
    }

    async fn sync(&self) -> Result<()> {
        Ok(())
    }
}
