use std::path::PathBuf;

use alloy::primitives::{address, Address, U256};

/// Gas limit for the L2 execution of a bridged call, used both for the
/// base-cost query and in the request itself.
pub const DEFAULT_L2_TX_GAS_LIMIT: u64 = 733_664;

/// Gas per byte of pubdata the L2 charges for L1->L2 transactions. Protocol
/// constant of the target chain.
pub const REQUIRED_L2_GAS_PRICE_PER_PUBDATA: u64 = 800;

/// One distributor deployment together with the allocation files backing it.
#[derive(Debug, Clone)]
pub struct DistributorConfig {
    /// L2 Merkle distributor contract holding this allocation's root.
    pub distributor: Address,
    /// CSV of `address,amount` rows: the full eligibility list, in the order
    /// the on-chain root was committed over.
    pub allocation_path: PathBuf,
    /// One address per line: the subset eligible for L1-initiated claims.
    pub l1_eligibility_path: PathBuf,
}

/// Immutable configuration threaded through every component. Contract
/// addresses and gas figures are frozen interface constants of the deployed
/// system, not tunables.
#[derive(Debug, Clone)]
pub struct ClaimConfig {
    /// L1 bridge hub contract (base-cost queries and `requestL2TransactionDirect`).
    pub bridge_hub: Address,
    /// Chain id of the L2 the bridged call executes on.
    pub l2_chain_id: u64,
    /// ZK token contract on the L2, target of transfer instructions.
    pub token: Address,
    /// Value forwarded with the L2 leg of every bridged call.
    pub l2_tx_value: U256,
    /// L2 gas limit for bridged calls.
    pub l2_gas_limit: u64,
    /// Gas per pubdata byte for bridged calls.
    pub gas_per_pubdata_limit: u64,
    /// Distributor deployments, in the order claim instructions are emitted.
    pub distributors: Vec<DistributorConfig>,
}

impl ClaimConfig {
    /// Mainnet deployment of the airdrop.
    pub fn mainnet() -> Self {
        Self {
            bridge_hub: address!("303a465b659cbb0ab36ee643ea362c509eeb5213"),
            l2_chain_id: 324,
            token: address!("5a7d6b2f92c77fad6ccabd7ee0624e64907eaf3e"),
            l2_tx_value: U256::ZERO,
            l2_gas_limit: DEFAULT_L2_TX_GAS_LIMIT,
            gas_per_pubdata_limit: REQUIRED_L2_GAS_PRICE_PER_PUBDATA,
            distributors: vec![DistributorConfig {
                distributor: address!("2d815240a61731c75fa01b2793e1d3ed09f289d0"),
                allocation_path: PathBuf::from("allocations/airdrop-allocations.csv"),
                l1_eligibility_path: PathBuf::from("allocations/l1-eligibility-list.csv"),
            }],
        }
    }
}
