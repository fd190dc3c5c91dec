// Static verifier for tests and demos, no pairing arithmetic
use async_trait::async_trait;

use super::ProofVerifier;
use crate::primitives::{FieldElement, Policy, Result, SignalingError};

/// Trusts the calldata layout and echoes the public tail back as the
/// verifier outputs. Stands in for the real capability wherever no
/// circuit-generated proofs are available.
pub struct StaticVerifier {
    reject: bool,
}

impl StaticVerifier {
    pub fn accepting() -> Self {
        Self { reject: false }
    }

    pub fn rejecting() -> Self {
        Self { reject: true }
    }
}

#[async_trait]
impl ProofVerifier for StaticVerifier {
    async fn verify(&self, input: &[FieldElement]) -> Result<Vec<FieldElement>> {
        if self.reject {
            return Err(SignalingError::InvalidProof);
        }
        if input.len() < Policy::PROOF_COORDINATES {
            return Err(SignalingError::MalformedPublicInputs(format!(
                "expected at least {} proof coordinates, got {}",
                Policy::PROOF_COORDINATES,
                input.len()
            )));
        }
        Ok(input[Policy::PROOF_COORDINATES..].to_vec())
    }
}
