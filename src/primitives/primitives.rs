// Core primitives for the anonymous group signaling deployment
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub type GroupId = u64;
pub type MemberIndex = u64;
pub type Timestamp = u64;

/// Field-sized value, 32 bytes big-endian. Roots, nullifiers, messages,
/// scopes and encoded verifier inputs are all carried in this form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldElement(pub [u8; 32]);

impl FieldElement {
    pub fn zero() -> Self {
        FieldElement([0u8; 32])
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        FieldElement(bytes)
    }

    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        FieldElement(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a hex string, with or without 0x prefix, up to 64 nibbles.
    pub fn from_hex(input: &str) -> Option<Self> {
        let stripped = input.trim().trim_start_matches("0x").trim_start_matches("0X");
        if stripped.is_empty() || stripped.len() > 64 {
            return None;
        }
        let padded = if stripped.len() % 2 == 0 {
            stripped.to_string()
        } else {
            format!("0{}", stripped)
        };
        let raw = hex::decode(&padded).ok()?;
        let mut bytes = [0u8; 32];
        bytes[32 - raw.len()..].copy_from_slice(&raw);
        Some(FieldElement(bytes))
    }

    /// Parse an unsigned decimal string into a 256-bit big-endian value.
    /// External encoders commonly hand values back in this form.
    pub fn from_decimal(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        let mut acc = [0u8; 32];
        for ch in trimmed.bytes() {
            if !ch.is_ascii_digit() {
                return None;
            }
            let mut carry = (ch - b'0') as u16;
            for byte in acc.iter_mut().rev() {
                let v = (*byte as u16) * 10 + carry;
                *byte = (v & 0xff) as u8;
                carry = v >> 8;
            }
            if carry != 0 {
                return None;
            }
        }
        Some(FieldElement(acc))
    }

    /// Parse either representation; hex requires the 0x prefix to avoid
    /// ambiguity with all-digit decimal strings.
    pub fn from_str_any(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
            Self::from_hex(trimmed)
        } else {
            Self::from_decimal(trimmed)
        }
    }
}

impl std::fmt::Display for FieldElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Caller principal as seen by the execution substrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    pub fn zero() -> Self {
        Address([0u8; 32])
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Address(bytes)
    }

    pub fn from_data(data: &[u8]) -> Self {
        Address(hash_data(data))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Call metadata handed in by the execution substrate for every mutating call.
#[derive(Debug, Clone, Copy)]
pub struct CallContext {
    pub caller: Address,
    pub timestamp: Timestamp,
}

impl CallContext {
    pub fn new(caller: Address, timestamp: Timestamp) -> Self {
        Self { caller, timestamp }
    }
}

/// Deployment-wide policy constants.
pub struct Policy;

impl Policy {
    /// Default root-history ring-buffer capacity when creation-time
    /// configuration passes zero.
    pub const DEFAULT_ROOT_HISTORY: usize = 100;

    /// Number of affine curve coordinates in an encoded Groth16 proof:
    /// G1 a (2), G2 b (4), G1 c (2).
    pub const PROOF_COORDINATES: usize = 8;

    /// Public outputs the verifier capability must return:
    /// root, nullifier, message digest, scope digest.
    pub const PUBLIC_OUTPUTS: usize = 4;

    /// Bound on the external encoder handoff before falling through.
    pub const ENCODER_TIMEOUT_SECS: u64 = 90;

    /// Right shift applied to the public-input reduction digest so it
    /// fits the BN254 scalar field.
    pub const REDUCTION_SHIFT_BITS: u32 = 8;
}

pub fn hash_data(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}
