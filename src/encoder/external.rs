// External-process encoder driven through a temp-file handoff
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use super::{EncodedInput, EncoderStrategy, SignalProof};
use crate::primitives::{FieldElement, Policy, Result, SignalingError};

#[derive(Debug, Clone)]
pub struct ExternalEncoderConfig {
    /// Calldata exporter invoked as `<command> [args..] <proof> <out>`.
    pub command: PathBuf,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl Default for ExternalEncoderConfig {
    fn default() -> Self {
        Self {
            command: PathBuf::from("groth16-calldata"),
            args: Vec::new(),
            timeout: Duration::from_secs(Policy::ENCODER_TIMEOUT_SECS),
        }
    }
}

/// Writes the proof to a temp file, runs the exporter under a bounded
/// timeout and parses the produced calldata back. A timeout is a distinct
/// failure that triggers fallback only after fully elapsing; there is no
/// earlier cancellation.
pub struct ExternalEncoder {
    config: ExternalEncoderConfig,
}

impl ExternalEncoder {
    pub fn new(config: ExternalEncoderConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl EncoderStrategy for ExternalEncoder {
    fn name(&self) -> &'static str {
        "external"
    }

    async fn encode(&self, proof: &SignalProof) -> Result<EncodedInput> {
        let dir = tempfile::tempdir()?;
        let proof_path = dir.path().join("proof.json");
        let out_path = dir.path().join("calldata.txt");

        let payload = serde_json::to_vec_pretty(proof)
            .map_err(|e| SignalingError::Serialization(format!("proof handoff encode: {}", e)))?;
        tokio::fs::write(&proof_path, payload).await?;

        let mut command = tokio::process::Command::new(&self.config.command);
        command
            .args(&self.config.args)
            .arg(&proof_path)
            .arg(&out_path)
            .kill_on_drop(true);

        let mut child = command.spawn()?;
        let status = match tokio::time::timeout(self.config.timeout, child.wait()).await {
            Ok(waited) => waited?,
            Err(_) => {
                let _ = child.kill().await;
                return Err(SignalingError::InvalidState(format!(
                    "external encoder timed out after {}s",
                    self.config.timeout.as_secs()
                )));
            }
        };
        if !status.success() {
            return Err(SignalingError::InvalidState(format!(
                "external encoder exited with {}",
                status
            )));
        }

        let raw = tokio::fs::read_to_string(&out_path).await?;
        let values = parse_calldata(&raw)?;
        Ok(EncodedInput::Calldata(values))
    }
}

/// Exporters emit hex or decimal values separated by commas, whitespace or
/// JSON-array punctuation; anything else is a handoff error.
fn parse_calldata(raw: &str) -> Result<Vec<FieldElement>> {
    let values: Vec<FieldElement> = raw
        .split(|c: char| c == ',' || c.is_whitespace() || c == '[' || c == ']' || c == '"')
        .filter(|token| !token.is_empty())
        .map(|token| {
            FieldElement::from_str_any(token).ok_or_else(|| {
                SignalingError::Serialization(format!("unparseable calldata value: {}", token))
            })
        })
        .collect::<Result<_>>()?;
    if values.is_empty() {
        return Err(SignalingError::Serialization(
            "external encoder produced no calldata".into(),
        ));
    }
    Ok(values)
}
