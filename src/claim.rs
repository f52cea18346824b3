use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::sol;
use alloy::sol_types::SolCall;
use serde::Serialize;

use crate::alias::undo_l1_to_l2_alias;
use crate::error::ClaimError;
use crate::merkle::AllocationTree;

sol! {
    /// Claim entry point of the L2 Merkle distributor.
    function claim(uint256 _index, uint256 _amount, bytes32[] calldata _merkleProof) external;
}

/// Parameters of a distributor `claim` call, as printed to the user.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimParams {
    pub index: u64,
    /// Decimal string, matching the distributor's base-unit accounting.
    pub amount: String,
    pub merkle_proof: Vec<B256>,
}

/// A single unsigned claim call against one distributor.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimInstruction {
    pub to: Address,
    pub function: String,
    pub params: ClaimParams,
    pub l2_raw_calldata: Bytes,
}

/// Everything a client needs to claim for one address, possibly spanning
/// several distributor deployments.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimBundle {
    pub address: Address,
    pub calls_to_claim: Vec<ClaimInstruction>,
}

/// Generates claim instructions for `address` across every allocation tree,
/// in configured distributor order.
///
/// `from_l1` marks that the caller's original identity lives on L1 (the
/// address passed in is then the aliased one); it affects only how the
/// address is reported when nothing is found.
pub fn build_direct_claim(
    trees: &[AllocationTree],
    address: Address,
    from_l1: bool,
) -> Result<ClaimBundle, ClaimError> {
    let mut calls_to_claim = Vec::new();

    for tree in trees {
        if let Some(leaf) = tree.lookup(address) {
            let proof = tree.proof(leaf)?;
            let calldata = claimCall {
                _index: U256::from(leaf.index),
                _amount: leaf.amount,
                _merkleProof: proof.clone(),
            }
            .abi_encode();

            calls_to_claim.push(ClaimInstruction {
                to: tree.distributor(),
                function: "claim".to_string(),
                params: ClaimParams {
                    index: leaf.index,
                    amount: leaf.amount.to_string(),
                    merkle_proof: proof,
                },
                l2_raw_calldata: calldata.into(),
            });
        }
    }

    if calls_to_claim.is_empty() {
        let reported = if from_l1 {
            undo_l1_to_l2_alias(address)
        } else {
            address
        };
        return Err(ClaimError::NotEligible(reported.to_string()));
    }

    Ok(ClaimBundle {
        address,
        calls_to_claim,
    })
}
