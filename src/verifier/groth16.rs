// Real Groth16 verification over BN254
use ark_bn254::{Bn254, Fq, Fq2, Fr, G1Affine, G2Affine};
use ark_ff::PrimeField;
use ark_groth16::{prepare_verifying_key, Groth16, PreparedVerifyingKey, Proof, VerifyingKey};
use ark_serialize::CanonicalDeserialize;
use ark_snark::SNARK;
use async_trait::async_trait;

use super::ProofVerifier;
use crate::primitives::{FieldElement, Policy, Result, SignalingError};

/// Groth16 verifier over calldata-ordered input. The leading eight values
/// are affine coordinates `[a.x, a.y, b.x.c1, b.x.c0, b.y.c1, b.y.c0,
/// c.x, c.y]`; everything after is treated as public input.
pub struct Groth16InputVerifier {
    vk: PreparedVerifyingKey<Bn254>,
}

impl Groth16InputVerifier {
    pub fn from_vk(vk: VerifyingKey<Bn254>) -> Self {
        Self {
            vk: prepare_verifying_key(&vk),
        }
    }

    pub fn from_vk_bytes(vk_bytes: &[u8]) -> Result<Self> {
        let vk = VerifyingKey::<Bn254>::deserialize_compressed(vk_bytes)
            .map_err(|_| SignalingError::InvalidProof)?;
        Ok(Self::from_vk(vk))
    }

    fn fq_from(value: &FieldElement) -> Fq {
        Fq::from_be_bytes_mod_order(value.as_bytes())
    }

    fn fr_from(value: &FieldElement) -> Fr {
        Fr::from_be_bytes_mod_order(value.as_bytes())
    }

    fn decode_proof(input: &[FieldElement]) -> Result<Proof<Bn254>> {
        let a = G1Affine::new_unchecked(Self::fq_from(&input[0]), Self::fq_from(&input[1]));
        let b = G2Affine::new_unchecked(
            Fq2::new(Self::fq_from(&input[3]), Self::fq_from(&input[2])),
            Fq2::new(Self::fq_from(&input[5]), Self::fq_from(&input[4])),
        );
        let c = G1Affine::new_unchecked(Self::fq_from(&input[6]), Self::fq_from(&input[7]));

        if !a.is_on_curve()
            || !a.is_in_correct_subgroup_assuming_on_curve()
            || !b.is_on_curve()
            || !b.is_in_correct_subgroup_assuming_on_curve()
            || !c.is_on_curve()
            || !c.is_in_correct_subgroup_assuming_on_curve()
        {
            return Err(SignalingError::InvalidProof);
        }

        Ok(Proof { a, b, c })
    }
}

#[async_trait]
impl ProofVerifier for Groth16InputVerifier {
    async fn verify(&self, input: &[FieldElement]) -> Result<Vec<FieldElement>> {
        if input.len() < Policy::PROOF_COORDINATES + Policy::PUBLIC_OUTPUTS {
            return Err(SignalingError::MalformedPublicInputs(format!(
                "expected at least {} values, got {}",
                Policy::PROOF_COORDINATES + Policy::PUBLIC_OUTPUTS,
                input.len()
            )));
        }

        let proof = Self::decode_proof(input)?;
        let publics: Vec<Fr> = input[Policy::PROOF_COORDINATES..]
            .iter()
            .map(Self::fr_from)
            .collect();

        let valid = Groth16::<Bn254>::verify_proof(&self.vk, &proof, &publics)
            .map_err(|_| SignalingError::InvalidProof)?;
        if !valid {
            return Err(SignalingError::InvalidProof);
        }

        Ok(input[Policy::PROOF_COORDINATES..].to_vec())
    }
}
