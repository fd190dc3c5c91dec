// Global write-once nullifier ledger
use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::primitives::{FieldElement, Result, SignalingError};
use crate::storage::StateStore;

/// The deployment's sole global point of contention. A nullifier is unique
/// across the entire deployment regardless of which group or scope produced
/// it; correctness rests on the nullifier-deriving hash having sufficient
/// domain separation through the externally supplied scope value.
pub struct NullifierLedger {
    store: Arc<dyn StateStore>,
    used: Mutex<HashSet<FieldElement>>,
}

impl NullifierLedger {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self {
            store,
            used: Mutex::new(HashSet::new()),
        }
    }

    /// Atomic check-and-set. Exactly one of two concurrent calls for the
    /// same nullifier succeeds; once recorded the flag is never unset.
    pub async fn consume(&self, nullifier: &FieldElement) -> Result<()> {
        let mut used = self.used.lock().await;
        if used.contains(nullifier) {
            return Err(SignalingError::NullifierReused);
        }
        if self.store.has_nullifier(nullifier).await? {
            used.insert(*nullifier);
            return Err(SignalingError::NullifierReused);
        }

        // Persist before the in-memory commit: a failed write records nothing
        self.store.put_nullifier(nullifier).await?;
        used.insert(*nullifier);
        Ok(())
    }

    /// Read-only, no authorization required, no side effect.
    pub async fn is_used(&self, nullifier: &FieldElement) -> Result<bool> {
        if self.used.lock().await.contains(nullifier) {
            return Ok(true);
        }
        self.store.has_nullifier(nullifier).await
    }
}
