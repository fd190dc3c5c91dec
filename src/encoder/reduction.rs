// Public-input reduction shared by every encoding strategy
use sha2::{Digest, Sha256};

use super::proof::PublicOutputs;
use crate::primitives::{FieldElement, Policy};

/// Hash over the 32-byte big-endian encoding, right-shifted so the digest
/// fits the target field. The proving side constrains the identical
/// function; any divergence between the two silently breaks verification
/// with no error raisable at encode time.
pub fn reduce_to_field(value: &FieldElement) -> FieldElement {
    let digest = Sha256::digest(value.as_bytes());
    let mut out = [0u8; 32];
    let shift = (Policy::REDUCTION_SHIFT_BITS / 8) as usize;
    out[shift..].copy_from_slice(&digest[..32 - shift]);
    FieldElement(out)
}

/// Verifier-visible public segment: root and nullifier pass through
/// unreduced, message and scope are reduced.
pub fn reduced_publics(public: &PublicOutputs) -> [FieldElement; Policy::PUBLIC_OUTPUTS] {
    [
        public.merkle_root,
        public.nullifier,
        reduce_to_field(&public.message),
        reduce_to_field(&public.scope),
    ]
}
