use alloy::primitives::{address, Address, U160};

/// Offset added to an L1 address to obtain the sender the L2 observes when
/// the call arrives through the bridge. Fixed by the bridging protocol.
pub const L1_TO_L2_ALIAS_OFFSET: Address = address!("1111000000000000000000000000000000001111");

/// Computes the L2 sender address for a call initiated by `l1_address` on L1.
///
/// Addition wraps modulo 2^160, matching the on-chain aliasing rule.
pub fn apply_l1_to_l2_alias(l1_address: Address) -> Address {
    let sum = U160::from_be_bytes(l1_address.into_array())
        .wrapping_add(U160::from_be_bytes(L1_TO_L2_ALIAS_OFFSET.into_array()));
    Address::from(sum.to_be_bytes())
}

/// Inverse of [`apply_l1_to_l2_alias`]. Used only to report the identity the
/// caller actually controls in error messages.
pub fn undo_l1_to_l2_alias(l2_address: Address) -> Address {
    let diff = U160::from_be_bytes(l2_address.into_array())
        .wrapping_sub(U160::from_be_bytes(L1_TO_L2_ALIAS_OFFSET.into_array()));
    Address::from(diff.to_be_bytes())
}
