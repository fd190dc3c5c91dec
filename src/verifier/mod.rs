// Verifier capability: the trust anchor of the deployment
pub mod groth16;
pub mod static_verifier;

pub use groth16::Groth16InputVerifier;
pub use static_verifier::StaticVerifier;

use async_trait::async_trait;

use crate::primitives::{FieldElement, Result};

/// External verification capability. Accepts encoded calldata and returns
/// the public output values `[root, nullifier, message, scope]` (possibly
/// followed by profile-specific advice values), or an error. Trusted for
/// correctness, not merely availability.
#[async_trait]
pub trait ProofVerifier: Send + Sync {
    async fn verify(&self, input: &[FieldElement]) -> Result<Vec<FieldElement>>;
}
