//! Blocks of the GraphQL `bestChain`

use crate::{
    command::{Transaction, UserCommand},
    constants::millis_to_iso_date_string,
};
use serde::{Deserialize, Serialize};

/// A best chain block. Identity for deduplication is [Block::height].
///
/// (De)serializes in the shape returned by the `bestChain` query so raw
/// responses can be stored & replayed unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BestChainBlock", into = "BestChainBlock")]
pub struct Block {
    pub state_hash: String,
    pub height: u32,

    /// Block timestamp (millis)
    pub timestamp: i64,
    pub user_commands: Vec<UserCommand>,
}

impl Block {
    /// Transactions carrying every required field, annotated with this
    /// block's timestamp. Malformed commands are returned separately.
    pub fn transactions(&self) -> (Vec<Transaction>, Vec<crate::command::MalformedTransaction>) {
        let mut txns = Vec::with_capacity(self.user_commands.len());
        let mut malformed = vec![];

        for command in &self.user_commands {
            match Transaction::from_user_command(command, self.timestamp) {
                Ok(txn) => txns.push(txn),
                Err(e) => malformed.push(e),
            }
        }
        (txns, malformed)
    }

    pub fn summary(&self) -> BlockSummary {
        BlockSummary {
            height: self.height,
            timestamp: self.timestamp,
            state_hash: self.state_hash.clone(),
            num_user_commands: self.user_commands.len(),
        }
    }
}

/// Lightweight block description for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSummary {
    pub height: u32,
    pub timestamp: i64,
    pub state_hash: String,
    pub num_user_commands: usize,
}

impl std::fmt::Display for BlockSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "height {} ({}) date {} ({}), user commands: {}",
            self.height,
            self.state_hash,
            self.timestamp,
            millis_to_iso_date_string(self.timestamp),
            self.num_user_commands
        )
    }
}

///////////////////////
// GraphQL JSON form //
///////////////////////

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BestChainBlock {
    #[serde(default)]
    state_hash: String,
    protocol_state: ProtocolState,
    #[serde(default)]
    transactions: Transactions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProtocolState {
    blockchain_state: BlockchainState,
    consensus_state: ConsensusState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockchainState {
    #[serde(
        deserialize_with = "crate::utility::serde::from_str_or_num",
        serialize_with = "crate::utility::serde::to_str"
    )]
    date: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConsensusState {
    #[serde(
        deserialize_with = "crate::utility::serde::from_str_or_num",
        serialize_with = "crate::utility::serde::to_str"
    )]
    block_height: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Transactions {
    #[serde(default)]
    user_commands: Vec<UserCommand>,
}

impl From<BestChainBlock> for Block {
    fn from(value: BestChainBlock) -> Self {
        Self {
            state_hash: value.state_hash,
            height: value.protocol_state.consensus_state.block_height,
            timestamp: value.protocol_state.blockchain_state.date,
            user_commands: value.transactions.user_commands,
        }
    }
}

impl From<Block> for BestChainBlock {
    fn from(value: Block) -> Self {
        Self {
            state_hash: value.state_hash,
            protocol_state: ProtocolState {
                blockchain_state: BlockchainState {
                    date: value.timestamp,
                },
                consensus_state: ConsensusState {
                    block_height: value.height,
                },
            },
            transactions: Transactions {
                user_commands: value.user_commands,
            },
        }
    }
}
