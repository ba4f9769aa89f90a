use chrono::{DateTime, SecondsFormat, Utc};

// version

pub const GIT_COMMIT_HASH: &str = env!("GIT_COMMIT_HASH");
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "-", env!("GIT_COMMIT_HASH"));

// vote counter constants

pub const DEFAULT_GRAPHQL_ENDPOINT: &str = "https://api.minascan.io/node/devnet/v1/graphql";
pub const DEFAULT_DATABASE_DIR: &str = "./mina-vote-counter-db";
pub const DEFAULT_VOTE_COUNT_FILE: &str = "vote_counts.json";
pub const DEFAULT_STAKE_COUNT_FILE: &str = "stake_counts.json";

/// Number of most recent blocks never tallied
pub const DEFAULT_REORG_MARGIN: u32 = 15;

/// `maxLength` argument of the `bestChain` query
pub const BEST_CHAIN_MAX_LENGTH: u32 = 100_000;

/// Request timeout for the GraphQL endpoint
pub const GRAPHQL_TIMEOUT_SECS: u64 = 300;

// governance constants

pub const MAINNET_BURN_ADDRESS: &str = "B62qiburnzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzmp7r7UN6X";
pub const PAYMENT_KIND: &str = "PAYMENT";
pub const VOTE_YES: &str = "yes";
pub const VOTE_NO: &str = "no";

// mina constants

pub const MINA_SCALE: u32 = 9;
pub const USER_COMMAND_MEMO_VERSION: u8 = 0x14;
pub const MEMO_BYTES_TAG: u8 = 0x01;

pub fn millis_to_iso_date_string(millis: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(date_time) => date_time.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => format!("{millis}ms"),
    }
}
