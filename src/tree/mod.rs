// Membership-tree collaborator interface. The core never recomputes tree
// hashing; it only compares roots it is handed.
use crate::primitives::{hash_data, FieldElement, MemberIndex, Result, SignalingError};

/// Off-chain membership tree: given member commitments it yields a root
/// and per-member inclusion witnesses, off the core's critical path.
pub trait MembershipTree: Send + Sync {
    fn root(&self) -> FieldElement;
    fn insert(&mut self, commitment: FieldElement) -> MemberIndex;
    /// Zeroes the leaf and returns the new root.
    fn remove(&mut self, index: MemberIndex) -> Result<FieldElement>;
    fn witness(&self, index: MemberIndex) -> Result<Vec<FieldElement>>;
}

/// Deterministic chained-hash stand-in for the real tree library, used by
/// tests and the demo binary. Not a Merkle structure; witnesses are the
/// leaf prefix the chain consumed.
pub struct SequentialTree {
    leaves: Vec<FieldElement>,
}

impl SequentialTree {
    pub fn new() -> Self {
        Self { leaves: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }
}

impl Default for SequentialTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MembershipTree for SequentialTree {
    fn root(&self) -> FieldElement {
        let mut acc = FieldElement::zero();
        for leaf in &self.leaves {
            let mut data = Vec::with_capacity(64);
            data.extend_from_slice(acc.as_bytes());
            data.extend_from_slice(leaf.as_bytes());
            acc = FieldElement(hash_data(&data));
        }
        acc
    }

    fn insert(&mut self, commitment: FieldElement) -> MemberIndex {
        self.leaves.push(commitment);
        (self.leaves.len() - 1) as MemberIndex
    }

    fn remove(&mut self, index: MemberIndex) -> Result<FieldElement> {
        let slot = self
            .leaves
            .get_mut(index as usize)
            .ok_or_else(|| SignalingError::InvalidState(format!("no leaf at index {}", index)))?;
        *slot = FieldElement::zero();
        Ok(self.root())
    }

    fn witness(&self, index: MemberIndex) -> Result<Vec<FieldElement>> {
        if index as usize >= self.leaves.len() {
            return Err(SignalingError::InvalidState(format!(
                "no leaf at index {}",
                index
            )));
        }
        Ok(self.leaves[..index as usize].to_vec())
    }
}
