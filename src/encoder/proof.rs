// Proof interchange format handed over by the external proving system
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::primitives::{FieldElement, Policy, Result, SignalingError};

/// The four public outputs constrained by the proving side. Message and
/// scope are carried raw; every encoding strategy applies the identical
/// reduction before they reach a verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicOutputs {
    pub merkle_root: FieldElement,
    pub nullifier: FieldElement,
    pub message: FieldElement,
    pub scope: FieldElement,
}

/// Eagerly validated proof object: a fixed-size ordered list of affine
/// curve coordinates plus the public outputs. The core never inspects the
/// coordinates beyond ordering them for the verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalProof {
    /// Calldata coordinate order: a.x, a.y, b.x.c1, b.x.c0, b.y.c1,
    /// b.y.c0, c.x, c.y.
    pub points: Vec<FieldElement>,
    pub public: PublicOutputs,
}

impl SignalProof {
    /// Validate a loosely-typed proving-system object (`pi_a`/`pi_b`/`pi_c`
    /// plus `publicSignals`) into a tagged struct. All required fields are
    /// checked here, before any cryptographic work begins.
    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| SignalingError::Serialization("proof must be a JSON object".into()))?;

        let pi_a = coordinate_pair(obj.get("pi_a"), "pi_a")?;
        let pi_b = g2_coordinates(obj.get("pi_b"))?;
        let pi_c = coordinate_pair(obj.get("pi_c"), "pi_c")?;

        let signals = obj
            .get("publicSignals")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                SignalingError::Serialization("publicSignals must be an array".into())
            })?;
        if signals.len() < Policy::PUBLIC_OUTPUTS {
            return Err(SignalingError::MalformedPublicInputs(format!(
                "expected {} public signals, got {}",
                Policy::PUBLIC_OUTPUTS,
                signals.len()
            )));
        }
        let parsed: Vec<FieldElement> = signals
            .iter()
            .map(|s| parse_field(s, "publicSignals"))
            .collect::<Result<_>>()?;

        let mut points = Vec::with_capacity(Policy::PROOF_COORDINATES);
        points.extend_from_slice(&pi_a);
        points.extend_from_slice(&pi_b);
        points.extend_from_slice(&pi_c);

        Ok(Self {
            points,
            public: PublicOutputs {
                merkle_root: parsed[0],
                nullifier: parsed[1],
                message: parsed[2],
                scope: parsed[3],
            },
        })
    }
}

fn parse_field(value: &Value, field: &str) -> Result<FieldElement> {
    let parsed = match value {
        Value::String(s) => FieldElement::from_str_any(s),
        Value::Number(n) => n.as_u64().map(FieldElement::from_u64),
        _ => None,
    };
    parsed.ok_or_else(|| {
        SignalingError::Serialization(format!("{}: not a field-sized value: {}", field, value))
    })
}

/// G1 point as `[x, y]`; a trailing projective "1" is tolerated.
fn coordinate_pair(value: Option<&Value>, field: &str) -> Result<[FieldElement; 2]> {
    let arr = value.and_then(Value::as_array).ok_or_else(|| {
        SignalingError::Serialization(format!("{}: must be a coordinate array", field))
    })?;
    if arr.len() < 2 {
        return Err(SignalingError::Serialization(format!(
            "{}: expected 2 coordinates, got {}",
            field,
            arr.len()
        )));
    }
    Ok([parse_field(&arr[0], field)?, parse_field(&arr[1], field)?])
}

/// G2 point as `[[x_c0, x_c1], [y_c0, y_c1]]`, reordered into the
/// calldata convention `x.c1, x.c0, y.c1, y.c0`.
fn g2_coordinates(value: Option<&Value>) -> Result<[FieldElement; 4]> {
    let arr = value.and_then(Value::as_array).ok_or_else(|| {
        SignalingError::Serialization("pi_b: must be an array of coordinate pairs".into())
    })?;
    if arr.len() < 2 {
        return Err(SignalingError::Serialization(format!(
            "pi_b: expected 2 coordinate pairs, got {}",
            arr.len()
        )));
    }
    let x = coordinate_pair(Some(&arr[0]), "pi_b.x")?;
    let y = coordinate_pair(Some(&arr[1]), "pi_b.y")?;
    Ok([x[1], x[0], y[1], y[0]])
}
