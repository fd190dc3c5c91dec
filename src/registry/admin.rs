// Two-step admin transfer layered on the group registry
use std::sync::Arc;

use super::GroupRegistry;
use crate::primitives::{Address, CallContext, GroupId, Result, SignalingError, SignalingEvent};

/// Admin authority handshake. A single-step transfer to a mistyped address
/// would permanently strand the group; requiring the new admin to actively
/// claim the role makes that impossible.
pub struct AdminAuthority {
    registry: Arc<GroupRegistry>,
}

impl AdminAuthority {
    pub fn new(registry: Arc<GroupRegistry>) -> Self {
        Self { registry }
    }

    /// Admin-only. A new proposal silently overwrites any unaccepted one.
    pub async fn propose(&self, ctx: &CallContext, id: GroupId, candidate: Address) -> Result<()> {
        let cell = self.registry.group_cell(id).await?;
        let mut group = cell.lock().await;
        if group.admin != ctx.caller {
            return Err(SignalingError::Unauthorized);
        }

        let mut updated = group.clone();
        updated.pending_admin = Some(candidate);

        self.registry.store.put_group(&updated).await?;
        *group = updated;

        self.registry.events.emit(SignalingEvent::AdminTransferProposed {
            id,
            from: ctx.caller,
            to: candidate,
        });
        Ok(())
    }

    /// Succeeds only for the pending admin; sets the admin and clears the
    /// pending slot.
    pub async fn accept(&self, ctx: &CallContext, id: GroupId) -> Result<()> {
        let cell = self.registry.group_cell(id).await?;
        let mut group = cell.lock().await;

        match group.pending_admin {
            None => Err(SignalingError::InvalidState(
                "no pending admin transfer".to_string(),
            )),
            Some(pending) if pending != ctx.caller => Err(SignalingError::Unauthorized),
            Some(pending) => {
                let mut updated = group.clone();
                updated.admin = pending;
                updated.pending_admin = None;

                self.registry.store.put_group(&updated).await?;
                *group = updated;

                self.registry.events.emit(SignalingEvent::AdminTransferAccepted {
                    id,
                    new_admin: pending,
                });
                Ok(())
            }
        }
    }

    /// Returns `None` when no transfer is in flight.
    pub async fn pending_of(&self, id: GroupId) -> Result<Option<Address>> {
        let cell = self.registry.group_cell(id).await?;
        let group = cell.lock().await;
        Ok(group.pending_admin)
    }
}
