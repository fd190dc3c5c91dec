// Sled-backed store with real persistence
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use sled::{Db, Tree};

use super::StateStore;
use crate::primitives::{FieldElement, GroupId, Result, SignalingError};
use crate::registry::GroupRecord;

/// Durable store: one tree for group records, one for the nullifier set.
/// Values are bincode-encoded; sled operations run on the blocking pool so
/// the async runtime is never stalled.
pub struct SledStore {
    db: Arc<Db>,
    groups_tree: Tree,
    nullifiers_tree: Tree,
}

impl SledStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .map_err(|e| SignalingError::Storage(format!("Failed to create directory: {}", e)))?;

        let db = sled::open(path)
            .map_err(|e| SignalingError::Storage(format!("Failed to open sled database: {}", e)))?;
        let db = Arc::new(db);

        let groups_tree = db
            .open_tree("groups")
            .map_err(|e| SignalingError::Storage(format!("Failed to open groups tree: {}", e)))?;
        let nullifiers_tree = db
            .open_tree("nullifiers")
            .map_err(|e| SignalingError::Storage(format!("Failed to open nullifiers tree: {}", e)))?;

        Ok(Self {
            db,
            groups_tree,
            nullifiers_tree,
        })
    }
}

#[async_trait]
impl StateStore for SledStore {
    async fn put_group(&self, record: &GroupRecord) -> Result<()> {
        let tree = self.groups_tree.clone();
        let key = record.id.to_be_bytes();
        let value = bincode::serialize(record)
            .map_err(|e| SignalingError::Serialization(format!("Group record encode: {}", e)))?;

        tokio::task::spawn_blocking(move || {
            tree.insert(key, value)
                .map_err(|e| SignalingError::Storage(format!("Failed to put group: {}", e)))?;
            Ok(())
        })
        .await
        .map_err(|e| SignalingError::Storage(format!("Task join error: {}", e)))?
    }

    async fn get_group(&self, id: GroupId) -> Result<Option<GroupRecord>> {
        let tree = self.groups_tree.clone();
        let key = id.to_be_bytes();

        let raw: Option<Vec<u8>> = tokio::task::spawn_blocking(move || {
            match tree.get(key) {
                Ok(Some(data)) => Ok(Some(data.to_vec())),
                Ok(None) => Ok(None),
                Err(e) => Err(SignalingError::Storage(format!("Failed to get group: {}", e))),
            }
        })
        .await
        .map_err(|e| SignalingError::Storage(format!("Task join error: {}", e)))??;

        match raw {
            Some(data) => {
                let record = bincode::deserialize(&data).map_err(|e| {
                    SignalingError::Serialization(format!("Group record decode: {}", e))
                })?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn put_nullifier(&self, nullifier: &FieldElement) -> Result<()> {
        let tree = self.nullifiers_tree.clone();
        let key = nullifier.0;

        tokio::task::spawn_blocking(move || {
            tree.insert(key, &[1u8][..])
                .map_err(|e| SignalingError::Storage(format!("Failed to put nullifier: {}", e)))?;
            Ok(())
        })
        .await
        .map_err(|e| SignalingError::Storage(format!("Task join error: {}", e)))?
    }

    async fn has_nullifier(&self, nullifier: &FieldElement) -> Result<bool> {
        let tree = self.nullifiers_tree.clone();
        let key = nullifier.0;

        tokio::task::spawn_blocking(move || {
            tree.contains_key(key)
                .map_err(|e| SignalingError::Storage(format!("Failed to read nullifier: {}", e)))
        })
        .await
        .map_err(|e| SignalingError::Storage(format!("Task join error: {}", e)))?
    }

    async fn sync(&self) -> Result<()> {
        let db = self.db.clone();

        tokio::task::spawn_blocking(move || {
            db.flush()
                .map_err(|e| SignalingError::Storage(format!("Failed to sync database: {}", e)))?;
            Ok(())
        })
        .await
        .map_err(|e| SignalingError::Storage(format!("Task join error: {}", e)))?
    }
}
