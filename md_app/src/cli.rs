use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

use crate::config_loader::DEFAULT_CONFIG_PATH;

#[derive(Parser, Debug, Clone)]
#[command(name = "md_feed", version, about = "Rate-limited CoinGecko market data feed")]
pub struct Cli {
    /// TOML config file, layered under MD_FEED_* environment variables
    #[arg(long, short, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Only log to the rolling file, not to stderr
    #[arg(long, short, global = true, default_value_t = false)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Poll a set of coins through the hub and print every message until Ctrl+C
    Watch {
        #[arg(long, value_delimiter = ',', required = true)]
        coins: Vec<String>,
        /// Quote currency, defaults to the configured one
        #[arg(long)]
        vs: Option<String>,
        #[arg(long)]
        interval_ms: Option<u64>,
        /// Channel key, defaults to the sorted coin list and currency
        #[arg(long)]
        channel: Option<String>,
    },
    /// Trending coins
    Trending,
    /// Top coins by market cap
    Markets {
        #[arg(long)]
        vs: Option<String>,
        #[arg(long, default_value_t = 20)]
        per_page: usize,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Detail for one coin
    Coin { id: String },
    /// Newest listings, cached for five minutes
    Recent {
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long, default_value_t = false)]
        refresh: bool,
    },
    /// NFT collections, cached for thirty minutes
    Nfts {
        #[arg(long, default_value_t = 100)]
        per_page: usize,
        #[arg(long, default_value_t = false)]
        refresh: bool,
    },
    /// Detail for one NFT collection
    Nft { id: String },
}
