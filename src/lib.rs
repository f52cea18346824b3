//! Generates unsigned claim and bridge transactions for the ZK token
//! airdrop: Merkle proofs against the L2 distributor contracts, plus L1
//! bridge hub transactions that trigger the claim or a transfer from L1.
//! Nothing here signs or broadcasts anything.

#![forbid(unsafe_code)]

pub mod alias;
pub mod allocation;
pub mod bridge;
pub mod claim;
pub mod config;
pub mod error;
pub mod merkle;
pub mod transfer;

pub use alias::{apply_l1_to_l2_alias, undo_l1_to_l2_alias};
pub use allocation::{load_allocation_sets, AllocationSet};
pub use bridge::{
    build_bridge_transaction, build_bridged_claim, build_bridged_transfer, BaseCostQuery,
    BridgeHubClient, BridgeTransaction, BridgedClaimBundle,
};
pub use claim::{build_direct_claim, ClaimBundle, ClaimInstruction};
pub use config::{ClaimConfig, DistributorConfig};
pub use error::ClaimError;
pub use merkle::{verify, AllocationTree, Leaf};
pub use transfer::{build_transfer_instruction, TransferInstruction};
