// Error and event types for the signaling deployment
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::primitives::primitives::{Address, FieldElement, GroupId, MemberIndex};

pub type Result<T> = std::result::Result<T, SignalingError>;

#[derive(Error, Debug)]
pub enum SignalingError {
    #[error("Group not found: {0}")]
    NotFound(GroupId),

    #[error("Group already exists: {0}")]
    AlreadyExists(GroupId),

    #[error("Unauthorized caller")]
    Unauthorized,

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid proof")]
    InvalidProof,

    #[error("Root mismatch")]
    RootMismatch,

    #[error("Nullifier already used")]
    NullifierReused,

    #[error("Malformed public inputs: {0}")]
    MalformedPublicInputs(String),

    #[error("Encoded input length {0} outside plausible window")]
    OutOfRange(usize),

    #[error("All encoding strategies exhausted")]
    EncodingUnavailable,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for SignalingError {
    fn from(err: std::io::Error) -> Self {
        SignalingError::Storage(err.to_string())
    }
}

/// Deployment events. External indexers must be able to reconstruct the
/// full group, membership and signal history from this stream alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalingEvent {
    GroupCreated {
        id: GroupId,
        admin: Address,
    },
    MemberAdded {
        id: GroupId,
        member_ref: FieldElement,
        index: MemberIndex,
        root: FieldElement,
    },
    MemberRemoved {
        id: GroupId,
        member_ref: FieldElement,
        root: FieldElement,
    },
    SignalAccepted {
        id: GroupId,
        nullifier: FieldElement,
        message: FieldElement,
        scope: FieldElement,
    },
    AdminTransferProposed {
        id: GroupId,
        from: Address,
        to: Address,
    },
    AdminTransferAccepted {
        id: GroupId,
        new_admin: Address,
    },
}
