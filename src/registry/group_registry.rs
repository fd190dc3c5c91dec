// Group registry: per-group admin, member count, current root and the
// bounded history of recent roots
use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use crate::primitives::{
    Address, CallContext, FieldElement, GroupId, MemberIndex, Policy, Result, SignalingError,
    SignalingEvent,
};
use crate::signaling::EventBus;
use crate::storage::StateStore;

/// Bounded rolling window of recently valid roots. Pushing overwrites the
/// oldest slot and advances the cursor modulo capacity; zero slots are
/// empty and never match a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootHistory {
    slots: Vec<FieldElement>,
    cursor: usize,
}

impl RootHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![FieldElement::zero(); capacity],
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn push(&mut self, root: FieldElement) {
        self.slots[self.cursor] = root;
        self.cursor = (self.cursor + 1) % self.slots.len();
    }

    pub fn contains(&self, candidate: &FieldElement) -> bool {
        self.slots
            .iter()
            .any(|slot| !slot.is_zero() && slot == candidate)
    }
}

/// Persisted per-group state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: GroupId,
    pub admin: Address,
    pub pending_admin: Option<Address>,
    pub member_count: u64,
    pub current_root: FieldElement,
    pub history: RootHistory,
}

/// Registry of groups. Mutations on the same group serialize on that
/// group's lock; different groups proceed concurrently. Every mutation is
/// written through the store before the in-memory commit, so a failed
/// write leaves no partial state.
pub struct GroupRegistry {
    pub(crate) store: Arc<dyn StateStore>,
    pub(crate) events: EventBus,
    root_history_capacity: usize,
    groups: RwLock<HashMap<GroupId, Arc<Mutex<GroupRecord>>>>,
}

impl GroupRegistry {
    /// Ring-buffer capacity is fixed once per deployment; zero selects the
    /// default (100) and applies to every group created under it.
    pub fn new(store: Arc<dyn StateStore>, events: EventBus, root_history_capacity: usize) -> Self {
        let capacity = if root_history_capacity == 0 {
            Policy::DEFAULT_ROOT_HISTORY
        } else {
            root_history_capacity
        };
        Self {
            store,
            events,
            root_history_capacity: capacity,
            groups: RwLock::new(HashMap::new()),
        }
    }

    pub fn root_history_capacity(&self) -> usize {
        self.root_history_capacity
    }

    pub async fn create(&self, ctx: &CallContext, id: GroupId) -> Result<()> {
        let mut groups = self.groups.write().await;
        if groups.contains_key(&id) || self.store.get_group(id).await?.is_some() {
            return Err(SignalingError::AlreadyExists(id));
        }

        let record = GroupRecord {
            id,
            admin: ctx.caller,
            pending_admin: None,
            member_count: 0,
            current_root: FieldElement::zero(),
            history: RootHistory::new(self.root_history_capacity),
        };
        self.store.put_group(&record).await?;
        groups.insert(id, Arc::new(Mutex::new(record)));

        tracing::debug!(group = id, admin = %ctx.caller, "group created");
        self.events.emit(SignalingEvent::GroupCreated {
            id,
            admin: ctx.caller,
        });
        Ok(())
    }

    /// Fetch the per-group cell, faulting in a persisted record on cache
    /// miss so a registry can reopen an existing deployment.
    pub(crate) async fn group_cell(&self, id: GroupId) -> Result<Arc<Mutex<GroupRecord>>> {
        if let Some(cell) = self.groups.read().await.get(&id) {
            return Ok(cell.clone());
        }
        let record = self
            .store
            .get_group(id)
            .await?
            .ok_or(SignalingError::NotFound(id))?;
        let mut groups = self.groups.write().await;
        let cell = groups
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(record)))
            .clone();
        Ok(cell)
    }

    /// Returns the member's assigned index: the pre-increment count.
    pub async fn add_member(
        &self,
        ctx: &CallContext,
        id: GroupId,
        member_ref: FieldElement,
        new_root: FieldElement,
    ) -> Result<MemberIndex> {
        let cell = self.group_cell(id).await?;
        let mut group = cell.lock().await;
        if group.admin != ctx.caller {
            return Err(SignalingError::Unauthorized);
        }

        let mut updated = group.clone();
        updated.current_root = new_root;
        updated.history.push(new_root);
        let index = updated.member_count;
        updated.member_count += 1;

        self.store.put_group(&updated).await?;
        *group = updated;

        self.events.emit(SignalingEvent::MemberAdded {
            id,
            member_ref,
            index,
            root: new_root,
        });
        Ok(index)
    }

    pub async fn remove_member(
        &self,
        ctx: &CallContext,
        id: GroupId,
        member_ref: FieldElement,
        new_root: FieldElement,
    ) -> Result<()> {
        let cell = self.group_cell(id).await?;
        let mut group = cell.lock().await;
        if group.admin != ctx.caller {
            return Err(SignalingError::Unauthorized);
        }
        if group.member_count == 0 {
            return Err(SignalingError::InvalidState(
                "no members to remove".to_string(),
            ));
        }

        let mut updated = group.clone();
        updated.current_root = new_root;
        updated.history.push(new_root);
        updated.member_count -= 1;

        self.store.put_group(&updated).await?;
        *group = updated;

        self.events.emit(SignalingEvent::MemberRemoved {
            id,
            member_ref,
            root: new_root,
        });
        Ok(())
    }

    /// Liveness convenience, not a security boundary: a root evicted after
    /// `capacity` further mutations is silently and unrecoverably gone, and
    /// indistinguishable from a root that was never valid.
    pub async fn is_valid_root(&self, id: GroupId, candidate: &FieldElement) -> Result<bool> {
        let cell = self.group_cell(id).await?;
        let group = cell.lock().await;
        Ok(*candidate == group.current_root || group.history.contains(candidate))
    }

    pub async fn exists(&self, id: GroupId) -> bool {
        self.group_cell(id).await.is_ok()
    }

    /// Like `exists`, but storage failures propagate instead of reading as
    /// a missing group.
    pub async fn ensure_exists(&self, id: GroupId) -> Result<()> {
        self.group_cell(id).await.map(|_| ())
    }

    pub async fn member_count(&self, id: GroupId) -> Result<u64> {
        let cell = self.group_cell(id).await?;
        let group = cell.lock().await;
        Ok(group.member_count)
    }

    pub async fn current_root(&self, id: GroupId) -> Result<FieldElement> {
        let cell = self.group_cell(id).await?;
        let group = cell.lock().await;
        Ok(group.current_root)
    }

    pub async fn admin_of(&self, id: GroupId) -> Result<Address> {
        let cell = self.group_cell(id).await?;
        let group = cell.lock().await;
        Ok(group.admin)
    }
}
