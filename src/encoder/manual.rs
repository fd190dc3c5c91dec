// Terminal fallback: never fails, yields a diagnostic export instead of
// usable verifier input
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::reduction::reduced_publics;
use super::{EncodedInput, EncoderStrategy, SignalProof};
use crate::primitives::{FieldElement, Result};

/// Sentinel-tagged payload for out-of-band submission. Carries everything
/// an operator needs to encode by hand; downstream components must check
/// the tag before treating it as verifier input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualExport {
    pub note: String,
    pub proof_json: String,
    pub reduced_publics: Vec<FieldElement>,
}

pub struct ManualExportEncoder;

#[async_trait]
impl EncoderStrategy for ManualExportEncoder {
    fn name(&self) -> &'static str {
        "manual-export"
    }

    async fn encode(&self, proof: &SignalProof) -> Result<EncodedInput> {
        let proof_json = serde_json::to_string_pretty(proof)
            .unwrap_or_else(|_| "<unserializable proof>".to_string());
        Ok(EncodedInput::Diagnostic(ManualExport {
            note: "automatic encoding unavailable; submit through an out-of-band channel"
                .to_string(),
            proof_json,
            reduced_publics: reduced_publics(&proof.public).to_vec(),
        }))
    }
}
