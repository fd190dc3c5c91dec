// Storage layer following the chain-store layering
pub mod memory_store;
pub mod sled_store;

pub use memory_store::MemoryStore;
pub use sled_store::SledStore;

use async_trait::async_trait;

use crate::primitives::{FieldElement, GroupId, Result};
use crate::registry::GroupRecord;

/// Durable keyed persistence for deployment state. Group records are keyed
/// by group id, nullifier records by nullifier value. The hosting substrate
/// decides which implementation backs a deployment.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn put_group(&self, record: &GroupRecord) -> Result<()>;
    async fn get_group(&self, id: GroupId) -> Result<Option<GroupRecord>>;

    async fn put_nullifier(&self, nullifier: &FieldElement) -> Result<()>;
    async fn has_nullifier(&self, nullifier: &FieldElement) -> Result<bool>;

    async fn sync(&self) -> Result<()>;
}
