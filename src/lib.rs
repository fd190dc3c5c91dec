// Anonymous group signaling core
// Membership/replay state machine plus proof-to-verifier-input encoding

// Standard Rust module structure
pub mod encoder;
pub mod ledger;
pub mod primitives;
pub mod registry;
pub mod signaling;
pub mod storage;
pub mod tree;
pub mod verifier;

#[cfg(test)]
mod tests;

// Re-export key types for easy access
pub use primitives::{error::*, primitives::*};

pub use encoder::{
    EncodedInput, EncoderStrategy, EncodingWindow, ExternalEncoder, ExternalEncoderConfig,
    ManualExport, ManualExportEncoder, NativeEncoder, ProofEncoder, ProvingProfile,
    PublicOutputs, SignalProof,
};
pub use ledger::NullifierLedger;
pub use registry::{AdminAuthority, GroupRecord, GroupRegistry, RootHistory};
pub use signaling::{EventBus, SignalProcessor, SignalReceipt};
pub use storage::{MemoryStore, SledStore, StateStore};
pub use tree::{MembershipTree, SequentialTree};
pub use verifier::{Groth16InputVerifier, ProofVerifier, StaticVerifier};

use std::sync::Arc;

use tokio::sync::broadcast;

/// Composition root. One deployment owns the registry, the global
/// nullifier ledger, the verifier capability and the event stream; the
/// keyed stores are explicit and injected, never ambient globals.
pub struct SignalingDeployment {
    registry: Arc<GroupRegistry>,
    admin: AdminAuthority,
    ledger: Arc<NullifierLedger>,
    processor: SignalProcessor,
    events: EventBus,
}

impl SignalingDeployment {
    /// `root_history_capacity` is fixed here for every group created under
    /// this deployment; zero selects the default (100).
    pub fn new(
        store: Arc<dyn StateStore>,
        verifier: Arc<dyn ProofVerifier>,
        root_history_capacity: usize,
    ) -> Self {
        let events = EventBus::default();
        let registry = Arc::new(GroupRegistry::new(
            store.clone(),
            events.clone(),
            root_history_capacity,
        ));
        let ledger = Arc::new(NullifierLedger::new(store));
        let admin = AdminAuthority::new(registry.clone());
        let processor = SignalProcessor::new(
            registry.clone(),
            ledger.clone(),
            verifier,
            events.clone(),
        );

        Self {
            registry,
            admin,
            ledger,
            processor,
            events,
        }
    }

    pub fn registry(&self) -> &GroupRegistry {
        &self.registry
    }

    pub fn admin(&self) -> &AdminAuthority {
        &self.admin
    }

    pub fn ledger(&self) -> &NullifierLedger {
        &self.ledger
    }

    pub fn processor(&self) -> &SignalProcessor {
        &self.processor
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SignalingEvent> {
        self.events.subscribe()
    }
}
