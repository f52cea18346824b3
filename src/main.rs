#![forbid(unsafe_code)]

use std::str::FromStr;

use alloy::primitives::utils::parse_units;
use alloy::primitives::{Address, U256};
use alloy::providers::ProviderBuilder;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use claim_instructions::{
    build_bridged_claim, build_bridged_transfer, build_direct_claim, load_allocation_sets,
    AllocationTree, BridgeHubClient, ClaimConfig,
};

#[derive(Parser)]
#[command(name = "claim-instructions")]
#[command(about = "Generate unsigned claim and bridge transactions for the ZK token airdrop", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate claim calldata to submit directly on the L2
    GenerateL2ClaimTx {
        /// Claimant L2 address
        #[arg(long)]
        address: String,
    },
    /// Generate L1 bridge transactions that trigger the claim on the L2
    GenerateL1ClaimTx {
        /// Claimant L1 address (the L2 sees its aliased form)
        #[arg(long)]
        address: String,
        #[command(flatten)]
        l1: L1Args,
    },
    /// Generate an L1 bridge transaction that transfers tokens on the L2
    GenerateL1TransferTx {
        /// Transfer recipient on the L2
        #[arg(long)]
        to: String,
        /// Amount in token base units (decimal)
        #[arg(long)]
        amount: String,
        #[command(flatten)]
        l1: L1Args,
    },
}

#[derive(Args)]
struct L1Args {
    /// L1 gas price in gwei, used for the base-cost query
    #[arg(long)]
    l1_gas_price: String,

    /// L1 JSON-RPC endpoint for the base-cost query
    #[arg(long, default_value = "https://cloudflare-eth.com")]
    l1_json_rpc: String,
}

impl L1Args {
    fn gas_price(&self) -> Result<U256> {
        Ok(parse_units(&self.l1_gas_price, "gwei")
            .context("Invalid --l1-gas-price")?
            .get_absolute())
    }
}

fn parse_addr(s: &str) -> Result<Address> {
    Address::from_str(s.trim()).with_context(|| format!("Invalid address '{s}'"))
}

fn load_trees(config: &ClaimConfig) -> Result<Vec<AllocationTree>> {
    let sets = load_allocation_sets(&config.distributors)?;
    Ok(sets.iter().map(AllocationTree::build).collect())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ClaimConfig::mainnet();

    let output = match cli.command {
        Commands::GenerateL2ClaimTx { address } => {
            let trees = load_trees(&config)?;
            let bundle = build_direct_claim(&trees, parse_addr(&address)?, false)?;
            serde_json::to_string_pretty(&bundle)?
        }
        Commands::GenerateL1ClaimTx { address, l1 } => {
            let trees = load_trees(&config)?;
            let provider = ProviderBuilder::new()
                .connect(&l1.l1_json_rpc)
                .await
                .context("Failed to connect to L1 JSON-RPC endpoint")?;
            let hub = BridgeHubClient::new(config.bridge_hub, provider);
            let bundle = build_bridged_claim(
                &hub,
                &config,
                &trees,
                parse_addr(&address)?,
                l1.gas_price()?,
            )
            .await?;
            serde_json::to_string_pretty(&bundle)?
        }
        Commands::GenerateL1TransferTx { to, amount, l1 } => {
            let amount = U256::from_str_radix(amount.trim(), 10)
                .context("Invalid --amount: expected a decimal integer")?;
            let provider = ProviderBuilder::new()
                .connect(&l1.l1_json_rpc)
                .await
                .context("Failed to connect to L1 JSON-RPC endpoint")?;
            let hub = BridgeHubClient::new(config.bridge_hub, provider);
            let tx =
                build_bridged_transfer(&hub, &config, parse_addr(&to)?, amount, l1.gas_price()?)
                    .await?;
            serde_json::to_string_pretty(&tx)?
        }
    };

    println!("{output}");
    Ok(())
}
