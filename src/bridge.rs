//! Wraps L2 calls (claims or transfers) into L1 bridge hub transactions.
//!
//! The required L1 value is obtained from a live `l2TransactionBaseCost`
//! query against the bridge hub; failures of that query propagate verbatim
//! with no retry and no fallback price source.

use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::Provider;
use alloy::sol;
use alloy::sol_types::SolCall;
use futures::future::try_join_all;
use serde::Serialize;

use crate::alias::apply_l1_to_l2_alias;
use crate::claim::{self, ClaimInstruction};
use crate::config::ClaimConfig;
use crate::error::ClaimError;
use crate::merkle::AllocationTree;
use crate::transfer;

sol! {
    #[sol(rpc)]
    contract BridgeHub {
        struct L2TransactionRequestDirect {
            uint256 chainId;
            uint256 mintValue;
            address l2Contract;
            uint256 l2Value;
            bytes l2Calldata;
            uint256 l2GasLimit;
            uint256 l2GasPerPubdataByteLimit;
            bytes[] factoryDeps;
            address refundRecipient;
        }

        function l2TransactionBaseCost(
            uint256 _chainId,
            uint256 _gasPrice,
            uint256 _l2GasLimit,
            uint256 _l2GasPerPubdataByteLimit
        ) external view returns (uint256);

        function requestL2TransactionDirect(
            L2TransactionRequestDirect calldata _request
        ) external payable returns (bytes32 canonicalTxHash);
    }
}

/// Read-only base-cost oracle, seam for substituting the live bridge hub in
/// tests.
#[allow(async_fn_in_trait)]
pub trait BaseCostQuery {
    /// Cost in L1 wei of delivering an L2 transaction with the given gas
    /// parameters at `gas_price`.
    async fn l2_transaction_base_cost(
        &self,
        chain_id: u64,
        gas_price: U256,
        l2_gas_limit: u64,
        gas_per_pubdata_limit: u64,
    ) -> Result<U256, ClaimError>;
}

/// Live bridge hub client over an HTTP provider.
pub struct BridgeHubClient<P: Provider> {
    inner: BridgeHub::BridgeHubInstance<P>,
}

impl<P: Provider> BridgeHubClient<P> {
    pub fn new(bridge_hub: Address, provider: P) -> Self {
        Self {
            inner: BridgeHub::new(bridge_hub, provider),
        }
    }
}

impl<P: Provider> BaseCostQuery for BridgeHubClient<P> {
    async fn l2_transaction_base_cost(
        &self,
        chain_id: u64,
        gas_price: U256,
        l2_gas_limit: u64,
        gas_per_pubdata_limit: u64,
    ) -> Result<U256, ClaimError> {
        self.inner
            .l2TransactionBaseCost(
                U256::from(chain_id),
                gas_price,
                U256::from(l2_gas_limit),
                U256::from(gas_per_pubdata_limit),
            )
            .call()
            .await
            .map_err(|e| ClaimError::ExternalQueryFailure(e.to_string()))
    }
}

/// `requestL2TransactionDirect` parameters, as printed to the user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeTxParams {
    pub chain_id: u64,
    /// Decimal wei string; equals the queried base cost.
    pub mint_value: String,
    pub l2_contract: Address,
    /// Decimal wei string; fixed value forwarded with the L2 leg.
    pub l2_value: String,
    pub l2_calldata: Bytes,
    pub l2_gas_limit: u64,
    pub l2_gas_per_pubdata_byte_limit: u64,
    pub factory_deps: Vec<Bytes>,
    pub refund_recipient: Address,
}

/// An unsigned L1 transaction that triggers an L2 call through the bridge
/// hub. `value` is the ETH the client must attach.
#[derive(Debug, Clone, Serialize)]
pub struct BridgeTransaction {
    pub to: Address,
    pub function: String,
    pub params: BridgeTxParams,
    pub l1_raw_calldata: Bytes,
    /// Decimal wei string; equals `mintValue`.
    pub value: String,
}

/// Claim instructions for an L1 identity, each wrapped into a bridge
/// transaction.
#[derive(Debug, Clone, Serialize)]
pub struct BridgedClaimBundle {
    pub address: Address,
    pub calls_to_claim: Vec<BridgeTransaction>,
}

/// Wraps one L2 call into a bridge hub transaction, querying the base cost
/// for the configured gas figures at `gas_price`.
pub async fn build_bridge_transaction<Q: BaseCostQuery>(
    hub: &Q,
    cfg: &ClaimConfig,
    l2_contract: Address,
    l2_calldata: Bytes,
    refund_recipient: Address,
    gas_price: U256,
) -> Result<BridgeTransaction, ClaimError> {
    let base_cost = hub
        .l2_transaction_base_cost(
            cfg.l2_chain_id,
            gas_price,
            cfg.l2_gas_limit,
            cfg.gas_per_pubdata_limit,
        )
        .await?;

    let request = BridgeHub::L2TransactionRequestDirect {
        chainId: U256::from(cfg.l2_chain_id),
        mintValue: base_cost,
        l2Contract: l2_contract,
        l2Value: cfg.l2_tx_value,
        l2Calldata: l2_calldata.clone(),
        l2GasLimit: U256::from(cfg.l2_gas_limit),
        l2GasPerPubdataByteLimit: U256::from(cfg.gas_per_pubdata_limit),
        factoryDeps: Vec::new(),
        refundRecipient: refund_recipient,
    };
    let l1_calldata = BridgeHub::requestL2TransactionDirectCall { _request: request }.abi_encode();

    Ok(BridgeTransaction {
        to: cfg.bridge_hub,
        function: "requestL2TransactionDirect".to_string(),
        params: BridgeTxParams {
            chain_id: cfg.l2_chain_id,
            mint_value: base_cost.to_string(),
            l2_contract,
            l2_value: cfg.l2_tx_value.to_string(),
            l2_calldata,
            l2_gas_limit: cfg.l2_gas_limit,
            l2_gas_per_pubdata_byte_limit: cfg.gas_per_pubdata_limit,
            factory_deps: Vec::new(),
            refund_recipient,
        },
        l1_raw_calldata: l1_calldata.into(),
        value: base_cost.to_string(),
    })
}

/// Wraps each claim instruction into a bridge transaction. The base-cost
/// queries run concurrently; the output keeps the input order and the whole
/// operation fails on the first query failure.
pub async fn bridge_claim_instructions<Q: BaseCostQuery>(
    hub: &Q,
    cfg: &ClaimConfig,
    claims: &[ClaimInstruction],
    refund_recipient: Address,
    gas_price: U256,
) -> Result<Vec<BridgeTransaction>, ClaimError> {
    try_join_all(claims.iter().map(|call| {
        build_bridge_transaction(
            hub,
            cfg,
            call.to,
            call.l2_raw_calldata.clone(),
            refund_recipient,
            gas_price,
        )
    }))
    .await
}

/// Generates bridge transactions claiming on behalf of `l1_address`. The L2
/// distributor sees the aliased sender, so lookups use the aliased identity;
/// refunds go back to the original L1 address.
pub async fn build_bridged_claim<Q: BaseCostQuery>(
    hub: &Q,
    cfg: &ClaimConfig,
    trees: &[AllocationTree],
    l1_address: Address,
    gas_price: U256,
) -> Result<BridgedClaimBundle, ClaimError> {
    let aliased = apply_l1_to_l2_alias(l1_address);
    let bundle = claim::build_direct_claim(trees, aliased, true)?;
    let calls_to_claim =
        bridge_claim_instructions(hub, cfg, &bundle.calls_to_claim, l1_address, gas_price).await?;

    Ok(BridgedClaimBundle {
        address: l1_address,
        calls_to_claim,
    })
}

/// Generates one bridge transaction performing a token transfer on the L2.
/// Refunds go to the zero address.
pub async fn build_bridged_transfer<Q: BaseCostQuery>(
    hub: &Q,
    cfg: &ClaimConfig,
    to: Address,
    amount: U256,
    gas_price: U256,
) -> Result<BridgeTransaction, ClaimError> {
    let instruction = transfer::build_transfer_instruction(cfg.token, to, amount);
    build_bridge_transaction(
        hub,
        cfg,
        instruction.to,
        instruction.l2_raw_calldata,
        Address::ZERO,
        gas_price,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::AllocationSet;
    use crate::claim::ClaimParams;
    use alloy::primitives::address;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::time::Duration;

    const DISTRIBUTOR_A: Address = address!("2d815240a61731c75fa01b2793e1d3ed09f289d0");
    const DISTRIBUTOR_B: Address = address!("66fd4fc8fa52c9bec2aba368047a0b27e24ecfe4");

    /// Returns a fixed cost per call; the first call resolves last so that
    /// completion order differs from issue order.
    struct StaggeredHub {
        costs: Vec<u64>,
        calls: Mutex<usize>,
    }

    impl StaggeredHub {
        fn new(costs: Vec<u64>) -> Self {
            Self {
                costs,
                calls: Mutex::new(0),
            }
        }
    }

    impl BaseCostQuery for StaggeredHub {
        async fn l2_transaction_base_cost(
            &self,
            _chain_id: u64,
            _gas_price: U256,
            _l2_gas_limit: u64,
            _gas_per_pubdata_limit: u64,
        ) -> Result<U256, ClaimError> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                let current = *calls;
                *calls += 1;
                current
            };
            if call == 0 {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            Ok(U256::from(self.costs[call]))
        }
    }

    struct FailingHub;

    impl BaseCostQuery for FailingHub {
        async fn l2_transaction_base_cost(
            &self,
            _chain_id: u64,
            _gas_price: U256,
            _l2_gas_limit: u64,
            _gas_per_pubdata_limit: u64,
        ) -> Result<U256, ClaimError> {
            Err(ClaimError::ExternalQueryFailure(
                "connection refused".to_string(),
            ))
        }
    }

    struct FixedHub(u64);

    impl BaseCostQuery for FixedHub {
        async fn l2_transaction_base_cost(
            &self,
            _chain_id: u64,
            _gas_price: U256,
            _l2_gas_limit: u64,
            _gas_per_pubdata_limit: u64,
        ) -> Result<U256, ClaimError> {
            Ok(U256::from(self.0))
        }
    }

    fn test_config() -> ClaimConfig {
        ClaimConfig::mainnet()
    }

    fn claim_instruction(to: Address) -> ClaimInstruction {
        ClaimInstruction {
            to,
            function: "claim".to_string(),
            params: ClaimParams {
                index: 0,
                amount: "1".to_string(),
                merkle_proof: Vec::new(),
            },
            l2_raw_calldata: Bytes::from(vec![0xde, 0xad]),
        }
    }

    #[tokio::test]
    async fn test_bridge_transaction_fields() {
        let cfg = test_config();
        let hub = FixedHub(42_000);
        let refund = Address::repeat_byte(0xe5);
        let calldata = Bytes::from(vec![1, 2, 3]);

        let tx = build_bridge_transaction(
            &hub,
            &cfg,
            DISTRIBUTOR_A,
            calldata.clone(),
            refund,
            U256::from(30),
        )
        .await
        .unwrap();

        assert_eq!(tx.to, cfg.bridge_hub);
        assert_eq!(tx.function, "requestL2TransactionDirect");
        assert_eq!(tx.value, "42000");
        assert_eq!(tx.params.mint_value, "42000");
        assert_eq!(tx.params.chain_id, cfg.l2_chain_id);
        assert_eq!(tx.params.l2_contract, DISTRIBUTOR_A);
        assert_eq!(tx.params.l2_calldata, calldata);
        assert_eq!(tx.params.l2_gas_limit, cfg.l2_gas_limit);
        assert_eq!(
            tx.params.l2_gas_per_pubdata_byte_limit,
            cfg.gas_per_pubdata_limit
        );
        assert!(tx.params.factory_deps.is_empty());
        assert_eq!(tx.params.refund_recipient, refund);
    }

    #[tokio::test]
    async fn test_outer_calldata_round_trips() {
        let cfg = test_config();
        let hub = FixedHub(7);
        let inner = Bytes::from(vec![9, 9, 9]);

        let tx = build_bridge_transaction(
            &hub,
            &cfg,
            DISTRIBUTOR_A,
            inner.clone(),
            Address::repeat_byte(0xe5),
            U256::from(1),
        )
        .await
        .unwrap();

        let decoded =
            BridgeHub::requestL2TransactionDirectCall::abi_decode(&tx.l1_raw_calldata).unwrap();
        assert_eq!(decoded._request.chainId, U256::from(cfg.l2_chain_id));
        assert_eq!(decoded._request.mintValue, U256::from(7));
        assert_eq!(decoded._request.l2Contract, DISTRIBUTOR_A);
        assert_eq!(decoded._request.l2Calldata, inner);
        assert!(decoded._request.factoryDeps.is_empty());
    }

    #[tokio::test]
    async fn test_fan_out_preserves_input_order() {
        let cfg = test_config();
        let hub = StaggeredHub::new(vec![111, 222, 333]);
        let claims = vec![
            claim_instruction(DISTRIBUTOR_A),
            claim_instruction(DISTRIBUTOR_B),
            claim_instruction(Address::repeat_byte(0x33)),
        ];

        let txs = bridge_claim_instructions(
            &hub,
            &cfg,
            &claims,
            Address::repeat_byte(0xe5),
            U256::from(1),
        )
        .await
        .unwrap();

        // The first query finished last; output order still matches input.
        assert_eq!(txs.len(), 3);
        assert_eq!(txs[0].params.l2_contract, DISTRIBUTOR_A);
        assert_eq!(txs[0].params.mint_value, "111");
        assert_eq!(txs[1].params.l2_contract, DISTRIBUTOR_B);
        assert_eq!(txs[1].params.mint_value, "222");
        assert_eq!(txs[2].params.mint_value, "333");
    }

    #[tokio::test]
    async fn test_fan_out_fails_fast() {
        let cfg = test_config();
        let claims = vec![
            claim_instruction(DISTRIBUTOR_A),
            claim_instruction(DISTRIBUTOR_B),
        ];

        let result = bridge_claim_instructions(
            &FailingHub,
            &cfg,
            &claims,
            Address::repeat_byte(0xe5),
            U256::from(1),
        )
        .await;

        match result {
            Err(ClaimError::ExternalQueryFailure(msg)) => {
                assert_eq!(msg, "connection refused");
            }
            other => panic!("expected ExternalQueryFailure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bridged_claim_aliases_lookup_and_refunds_l1_address() {
        let cfg = test_config();
        let hub = FixedHub(5);
        let l1_address = Address::repeat_byte(0xc3);
        let aliased = apply_l1_to_l2_alias(l1_address);

        let tree = AllocationTree::build(&AllocationSet {
            distributor: DISTRIBUTOR_A,
            all_eligible: vec![(aliased, U256::from(500))],
            l1_eligible: HashSet::from([aliased]),
        });

        let bundle = build_bridged_claim(&hub, &cfg, &[tree], l1_address, U256::from(1))
            .await
            .unwrap();

        assert_eq!(bundle.address, l1_address);
        assert_eq!(bundle.calls_to_claim.len(), 1);
        let tx = &bundle.calls_to_claim[0];
        assert_eq!(tx.params.l2_contract, DISTRIBUTOR_A);
        assert_eq!(tx.params.refund_recipient, l1_address);
    }

    #[tokio::test]
    async fn test_bridged_transfer_refunds_zero_address() {
        let cfg = test_config();
        let hub = FixedHub(5);
        let to = Address::repeat_byte(0xd4);

        let tx = build_bridged_transfer(&hub, &cfg, to, U256::from(1_000u64), U256::from(1))
            .await
            .unwrap();

        assert_eq!(tx.params.l2_contract, cfg.token);
        assert_eq!(tx.params.refund_recipient, Address::ZERO);
        let decoded = crate::transfer::transferCall::abi_decode(&tx.params.l2_calldata).unwrap();
        assert_eq!(decoded._to, to);
        assert_eq!(decoded._amount, U256::from(1_000u64));
    }
}
