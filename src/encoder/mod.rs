// Proof-to-verifier-input encoding pipeline
pub mod external;
pub mod manual;
pub mod native;
pub mod proof;
pub mod reduction;

pub use external::{ExternalEncoder, ExternalEncoderConfig};
pub use manual::{ManualExport, ManualExportEncoder};
pub use native::NativeEncoder;
pub use proof::{PublicOutputs, SignalProof};
pub use reduction::{reduce_to_field, reduced_publics};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::primitives::{FieldElement, Policy, Result, SignalingError};

/// Encoder output. Callers must check the tag before submitting: only
/// `Calldata` is verifier input, `Diagnostic` is an export for manual
/// handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncodedInput {
    Calldata(Vec<FieldElement>),
    Diagnostic(ManualExport),
}

impl EncodedInput {
    pub fn is_usable(&self) -> bool {
        matches!(self, EncodedInput::Calldata(_))
    }

    pub fn calldata(&self) -> Option<&[FieldElement]> {
        match self {
            EncodedInput::Calldata(values) => Some(values),
            EncodedInput::Diagnostic(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    Bn254,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofSystem {
    Groth16,
}

/// Curve / proof-system / tree-depth combination a deployment encodes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvingProfile {
    pub curve: Curve,
    pub system: ProofSystem,
    pub tree_depth: u8,
}

/// Empirical bounds on plausible calldata length for a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingWindow {
    pub min: usize,
    pub max: usize,
}

impl ProvingProfile {
    pub fn bn254_groth16(tree_depth: u8) -> Self {
        Self {
            curve: Curve::Bn254,
            system: ProofSystem::Groth16,
            tree_depth,
        }
    }

    /// Groth16 proofs are constant-size, so the window is depth-invariant:
    /// eight coordinates plus four public outputs, with room for up to four
    /// exporter-appended advice values. Other systems would key this on
    /// tree depth.
    pub fn window(&self) -> EncodingWindow {
        match (self.curve, self.system) {
            (Curve::Bn254, ProofSystem::Groth16) => EncodingWindow {
                min: Policy::PROOF_COORDINATES + Policy::PUBLIC_OUTPUTS,
                max: Policy::PROOF_COORDINATES + 2 * Policy::PUBLIC_OUTPUTS,
            },
        }
    }
}

/// One encoding strategy in the cascade.
#[async_trait]
pub trait EncoderStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    async fn encode(&self, proof: &SignalProof) -> Result<EncodedInput>;
}

/// Ordered fallback cascade over encoding strategies. Failures cascade
/// silently from strategy to strategy; only total exhaustion is visible,
/// and the default cascade ends in a strategy that cannot fail.
pub struct ProofEncoder {
    profile: ProvingProfile,
    strategies: Vec<Box<dyn EncoderStrategy>>,
}

impl ProofEncoder {
    /// Default cascade: native, then external-process, then manual export.
    pub fn new(profile: ProvingProfile) -> Self {
        Self::with_strategies(
            profile,
            vec![
                Box::new(NativeEncoder),
                Box::new(ExternalEncoder::new(ExternalEncoderConfig::default())),
                Box::new(ManualExportEncoder),
            ],
        )
    }

    pub fn with_strategies(
        profile: ProvingProfile,
        strategies: Vec<Box<dyn EncoderStrategy>>,
    ) -> Self {
        Self {
            profile,
            strategies,
        }
    }

    pub fn profile(&self) -> ProvingProfile {
        self.profile
    }

    pub async fn encode(&self, proof: &SignalProof) -> Result<EncodedInput> {
        for strategy in &self.strategies {
            match strategy.encode(proof).await {
                Ok(EncodedInput::Calldata(values)) => match self.self_check(proof, &values) {
                    Ok(()) => return Ok(EncodedInput::Calldata(values)),
                    Err(error) => {
                        tracing::warn!(
                            strategy = strategy.name(),
                            %error,
                            "encoder output failed self-validation, falling through"
                        );
                    }
                },
                Ok(diagnostic @ EncodedInput::Diagnostic(_)) => return Ok(diagnostic),
                Err(error) => {
                    tracing::warn!(
                        strategy = strategy.name(),
                        %error,
                        "encoding strategy failed, falling through"
                    );
                }
            }
        }
        Err(SignalingError::EncodingUnavailable)
    }

    /// Cheap sanity gate before an expensive submission, not a correctness
    /// proof.
    pub fn validate_length(&self, values: &[FieldElement]) -> Result<()> {
        let window = self.profile.window();
        if values.len() < window.min || values.len() > window.max {
            return Err(SignalingError::OutOfRange(values.len()));
        }
        Ok(())
    }

    /// Strict self-validation applied to every strategy's output: the
    /// length must sit in the profile window and the public segment must
    /// equal the reduction of the proof's own outputs.
    fn self_check(&self, proof: &SignalProof, values: &[FieldElement]) -> Result<()> {
        self.validate_length(values)?;
        let expected = reduced_publics(&proof.public);
        let tail_start = Policy::PROOF_COORDINATES;
        let tail = &values[tail_start..tail_start + Policy::PUBLIC_OUTPUTS];
        if tail != &expected[..] {
            return Err(SignalingError::MalformedPublicInputs(
                "encoded public segment disagrees with proof outputs".into(),
            ));
        }
        Ok(())
    }
}
