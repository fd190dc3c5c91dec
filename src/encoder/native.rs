// In-process encoder, first strategy in the cascade
use async_trait::async_trait;

use super::reduction::reduced_publics;
use super::{EncodedInput, EncoderStrategy, SignalProof};
use crate::primitives::{Policy, Result, SignalingError};

pub struct NativeEncoder;

#[async_trait]
impl EncoderStrategy for NativeEncoder {
    fn name(&self) -> &'static str {
        "native"
    }

    async fn encode(&self, proof: &SignalProof) -> Result<EncodedInput> {
        if proof.points.len() != Policy::PROOF_COORDINATES {
            return Err(SignalingError::Serialization(format!(
                "expected {} proof coordinates, got {}",
                Policy::PROOF_COORDINATES,
                proof.points.len()
            )));
        }
        let mut values = proof.points.clone();
        values.extend_from_slice(&reduced_publics(&proof.public));
        Ok(EncodedInput::Calldata(values))
    }
}
