// Signal processing state machine
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::EventBus;
use crate::encoder::EncodedInput;
use crate::ledger::NullifierLedger;
use crate::primitives::{
    FieldElement, GroupId, Policy, Result, SignalingError, SignalingEvent,
};
use crate::registry::GroupRegistry;
use crate::verifier::ProofVerifier;

/// Outcome of an accepted signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalReceipt {
    pub group: GroupId,
    pub nullifier: FieldElement,
    pub message: FieldElement,
    pub scope: FieldElement,
}

/// Linear state machine over a submitted signal; no internal retries.
/// Verification holds no lock; the root check and nullifier consumption
/// run as one atomic commit step so no two concurrent signals for the
/// same nullifier can both succeed.
pub struct SignalProcessor {
    registry: Arc<GroupRegistry>,
    ledger: Arc<NullifierLedger>,
    verifier: Arc<dyn ProofVerifier>,
    events: EventBus,
    commit_lock: Mutex<()>,
}

impl SignalProcessor {
    pub fn new(
        registry: Arc<GroupRegistry>,
        ledger: Arc<NullifierLedger>,
        verifier: Arc<dyn ProofVerifier>,
        events: EventBus,
    ) -> Self {
        Self {
            registry,
            ledger,
            verifier,
            events,
            commit_lock: Mutex::new(()),
        }
    }

    pub async fn submit(&self, group: GroupId, input: &EncodedInput) -> Result<SignalReceipt> {
        self.registry.ensure_exists(group).await?;

        // A diagnostic export must never reach the verifier
        let calldata = match input {
            EncodedInput::Calldata(values) => values,
            EncodedInput::Diagnostic(_) => return Err(SignalingError::EncodingUnavailable),
        };

        // Verifier detail is collapsed; callers learn only that the proof
        // did not verify
        let outputs = self.verifier.verify(calldata).await.map_err(|error| {
            tracing::debug!(group, %error, "verifier rejected input");
            SignalingError::InvalidProof
        })?;

        if outputs.len() < Policy::PUBLIC_OUTPUTS {
            return Err(SignalingError::MalformedPublicInputs(format!(
                "expected at least {} public outputs, got {}",
                Policy::PUBLIC_OUTPUTS,
                outputs.len()
            )));
        }
        let (root, nullifier, message, scope) = (outputs[0], outputs[1], outputs[2], outputs[3]);

        // The nullifier is a function of (identity, scope) alone: once
        // consumed under any valid root, resubmission under a different
        // historically-valid root does not grant a second signal.
        {
            let _commit = self.commit_lock.lock().await;
            if !self.registry.is_valid_root(group, &root).await? {
                return Err(SignalingError::RootMismatch);
            }
            self.ledger.consume(&nullifier).await?;
        }

        self.events.emit(SignalingEvent::SignalAccepted {
            id: group,
            nullifier,
            message,
            scope,
        });
        tracing::info!(group, nullifier = %nullifier, "signal accepted");

        Ok(SignalReceipt {
            group,
            nullifier,
            message,
            scope,
        })
    }
}
