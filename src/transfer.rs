use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;
use serde::Serialize;

sol! {
    /// ERC-20 transfer on the L2 token contract.
    function transfer(address _to, uint256 _amount) external returns (bool);
}

#[derive(Debug, Clone, Serialize)]
pub struct TransferParams {
    pub to: Address,
    /// Decimal string in token base units.
    pub amount: String,
}

/// An unsigned `transfer` call against the token contract. No eligibility
/// check applies; this path moves already-claimed funds.
#[derive(Debug, Clone, Serialize)]
pub struct TransferInstruction {
    pub to: Address,
    pub function: String,
    pub params: TransferParams,
    pub l2_raw_calldata: Bytes,
}

/// Builds a transfer instruction against the fixed token contract.
pub fn build_transfer_instruction(token: Address, to: Address, amount: U256) -> TransferInstruction {
    let calldata = transferCall {
        _to: to,
        _amount: amount,
    }
    .abi_encode();

    TransferInstruction {
        to: token,
        function: "transfer".to_string(),
        params: TransferParams {
            to,
            amount: amount.to_string(),
        },
        l2_raw_calldata: calldata.into(),
    }
}
