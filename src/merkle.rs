use std::collections::HashMap;

use alloy::primitives::{keccak256, Address, B256, U256};

use crate::allocation::AllocationSet;
use crate::error::ClaimError;

/// One allocation entry as committed into the distributor's Merkle root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    /// Position in the allocation's ordered eligibility list.
    pub index: u64,
    /// The L2 identity entitled to this entry.
    pub address: Address,
    /// Token amount in base units.
    pub amount: U256,
    /// `keccak256(uint256(index) ‖ address ‖ uint256(amount))`, the packed
    /// encoding the distributor contract verifies against.
    pub hash: B256,
}

impl Leaf {
    fn new(index: u64, address: Address, amount: U256) -> Self {
        let mut buf = [0u8; 84];
        buf[..32].copy_from_slice(&U256::from(index).to_be_bytes::<32>());
        buf[32..52].copy_from_slice(address.as_slice());
        buf[52..].copy_from_slice(&amount.to_be_bytes::<32>());
        Self {
            index,
            address,
            amount,
            hash: keccak256(buf),
        }
    }
}

/// Canonical Merkle tree over one allocation set, with an address index for
/// O(1) leaf lookup.
///
/// The pairing rules are frozen by the deployed distributor contracts: nodes
/// are combined as `keccak256(min ‖ max)` (sorted pairs, so proofs carry no
/// direction flags) and an odd trailing node is carried to the next level
/// unpaired. Construction is deterministic: the same allocation set always
/// yields the same root and proofs.
#[derive(Debug, Clone)]
pub struct AllocationTree {
    distributor: Address,
    leaves: Vec<Leaf>,
    index_of: HashMap<Address, usize>,
    levels: Vec<Vec<B256>>,
}

impl AllocationTree {
    /// Builds the tree for an allocation set. Assumes addresses are unique
    /// within the set; on duplicates the last entry wins the index slot.
    pub fn build(set: &AllocationSet) -> Self {
        let leaves: Vec<Leaf> = set
            .all_eligible
            .iter()
            .enumerate()
            .map(|(i, (address, amount))| Leaf::new(i as u64, *address, *amount))
            .collect();

        let index_of = leaves
            .iter()
            .map(|leaf| (leaf.address, leaf.index as usize))
            .collect();

        let mut levels = vec![leaves.iter().map(|leaf| leaf.hash).collect::<Vec<_>>()];
        while levels.last().is_some_and(|level| level.len() > 1) {
            let level = &levels[levels.len() - 1];
            let mut next = Vec::with_capacity(level.len().div_ceil(2));
            for pair in level.chunks(2) {
                match pair {
                    [left, right] => next.push(hash_pair(*left, *right)),
                    [odd] => next.push(*odd),
                    _ => unreachable!("chunks(2) yields one or two nodes"),
                }
            }
            levels.push(next);
        }

        Self {
            distributor: set.distributor,
            leaves,
            index_of,
            levels,
        }
    }

    /// The distributor contract whose on-chain root this tree must match.
    pub fn distributor(&self) -> Address {
        self.distributor
    }

    pub fn root(&self) -> B256 {
        self.levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or(B256::ZERO)
    }

    /// Finds the leaf for an address. Comparison is on parsed 20-byte
    /// addresses, so any hex casing of the same address resolves identically.
    pub fn lookup(&self, address: Address) -> Option<&Leaf> {
        self.index_of.get(&address).map(|&i| &self.leaves[i])
    }

    /// Sibling hashes from leaf to root, in the combination order used during
    /// construction.
    pub fn proof(&self, leaf: &Leaf) -> Result<Vec<B256>, ClaimError> {
        let mut index = leaf.index as usize;
        if index >= self.leaves.len() {
            return Err(ClaimError::LookupInconsistency {
                index: leaf.index,
                leaves: self.leaves.len(),
            });
        }

        let mut proof = Vec::new();
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = index ^ 1;
            if sibling < level.len() {
                proof.push(level[sibling]);
            }
            index /= 2;
        }

        Ok(proof)
    }
}

/// Combines two nodes the way the distributor contract does.
pub fn hash_pair(a: B256, b: B256) -> B256 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(lo.as_slice());
    buf[32..].copy_from_slice(hi.as_slice());
    keccak256(buf)
}

/// Verifies a proof produced by [`AllocationTree::proof`] against a root.
pub fn verify(root: B256, leaf_hash: B256, proof: &[B256]) -> bool {
    proof
        .iter()
        .fold(leaf_hash, |acc, sibling| hash_pair(acc, *sibling))
        == root
}
