use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::str::FromStr;

use alloy::primitives::{Address, U256};
use anyhow::{Context, Result};

use crate::config::DistributorConfig;

/// Eligibility data for a single distributor deployment. Immutable once
/// loaded; addresses within `all_eligible` are unique per set (a loader
/// invariant this module assumes rather than enforces).
#[derive(Debug, Clone)]
pub struct AllocationSet {
    /// The L2 distributor contract this allocation belongs to.
    pub distributor: Address,
    /// Full eligibility list in leaf order: the order the on-chain Merkle
    /// root was committed over.
    pub all_eligible: Vec<(Address, U256)>,
    /// Entries additionally authorized to claim via an L1-initiated call.
    /// These rows already carry the aliased L2 identity in the allocation data.
    pub l1_eligible: HashSet<Address>,
}

/// Loads every configured allocation set, preserving distributor order.
pub fn load_allocation_sets(configs: &[DistributorConfig]) -> Result<Vec<AllocationSet>> {
    configs
        .iter()
        .map(|cfg| {
            let allocation_file = File::open(&cfg.allocation_path).with_context(|| {
                format!("Failed to open allocation file {:?}", cfg.allocation_path)
            })?;
            let all_eligible = parse_allocations(BufReader::new(allocation_file))
                .with_context(|| format!("Invalid allocation file {:?}", cfg.allocation_path))?;

            let l1_file = File::open(&cfg.l1_eligibility_path).with_context(|| {
                format!(
                    "Failed to open L1 eligibility file {:?}",
                    cfg.l1_eligibility_path
                )
            })?;
            let l1_eligible = parse_address_list(BufReader::new(l1_file)).with_context(|| {
                format!(
                    "Invalid L1 eligibility file {:?}",
                    cfg.l1_eligibility_path
                )
            })?;

            Ok(AllocationSet {
                distributor: cfg.distributor,
                all_eligible,
                l1_eligible,
            })
        })
        .collect()
}

fn parse_allocations<R: BufRead>(reader: R) -> Result<Vec<(Address, U256)>> {
    let mut entries = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read line")?;
        let trimmed = line.trim();
        if trimmed.is_empty() || is_header(trimmed) {
            continue;
        }

        let mut parts = trimmed.split(',');
        let (addr_str, amount_str) = match (parts.next(), parts.next(), parts.next()) {
            (Some(a), Some(b), None) => (a.trim(), b.trim()),
            _ => anyhow::bail!(
                "Invalid format at line {}: expected 'address,amount', got '{}'",
                line_num + 1,
                trimmed
            ),
        };

        let address = Address::from_str(addr_str)
            .with_context(|| format!("Invalid address at line {}", line_num + 1))?;
        let amount = U256::from_str_radix(amount_str, 10)
            .with_context(|| format!("Invalid amount at line {}", line_num + 1))?;
        entries.push((address, amount));
    }

    if entries.is_empty() {
        anyhow::bail!("Allocation file contains no entries");
    }

    Ok(entries)
}

fn parse_address_list<R: BufRead>(reader: R) -> Result<HashSet<Address>> {
    let mut addresses = HashSet::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read line")?;
        let trimmed = line.trim();
        if trimmed.is_empty() || is_header(trimmed) {
            continue;
        }

        let address = Address::from_str(trimmed)
            .with_context(|| format!("Invalid address at line {}", line_num + 1))?;
        addresses.insert(address);
    }

    Ok(addresses)
}

fn is_header(line: &str) -> bool {
    line.to_ascii_lowercase().starts_with("address")
}
