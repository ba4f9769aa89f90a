//! Governance votes carried in payment memos

use crate::{
    base::{nonce::Nonce, project_id::ProjectId},
    command::{memo::decode_memo, Transaction},
    constants::{VOTE_NO, VOTE_YES},
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    Yes,
    No,
}

/// A vote decoded from a memo message: `"<yes|no> <project id>"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteMessage {
    pub choice: VoteChoice,
    pub project_id: ProjectId,
}

/// A vote cast by a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub project_id: ProjectId,
    pub voter: String,
    pub choice: VoteChoice,
    pub nonce: Nonce,

    /// Containing block timestamp (millis)
    pub timestamp: i64,
}

impl FromStr for VoteChoice {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            VOTE_YES => Ok(Self::Yes),
            VOTE_NO => Ok(Self::No),
            _ => anyhow::bail!("invalid vote choice {s:?}"),
        }
    }
}

impl std::fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yes => write!(f, "{VOTE_YES}"),
            Self::No => write!(f, "{VOTE_NO}"),
        }
    }
}

impl VoteMessage {
    /// Parse a decoded memo message.
    ///
    /// Valid iff it splits on whitespace into exactly two tokens, the first
    /// exactly `yes` or `no` & the second a non-negative integer.
    pub fn parse(message: &str) -> Option<Self> {
        let mut tokens = message.split_whitespace();
        let (choice, project_id) = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(choice), Some(project_id), None) => (choice, project_id),
            _ => return None,
        };

        Some(Self {
            choice: choice.parse().ok()?,
            project_id: project_id.parse().ok()?,
        })
    }

    /// Decode & parse a Base58Check memo
    pub fn from_memo(memo: &str) -> Option<Self> {
        Self::parse(&decode_memo(memo))
    }
}

impl std::fmt::Display for VoteMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.choice, self.project_id)
    }
}

impl Vote {
    /// The vote cast by `txn`, if its memo is a valid vote message
    pub fn from_transaction(txn: &Transaction) -> Option<Self> {
        let VoteMessage { choice, project_id } = VoteMessage::from_memo(&txn.memo)?;
        Some(Self {
            project_id,
            voter: txn.from.clone(),
            choice,
            nonce: txn.nonce,
            timestamp: txn.block_timestamp,
        })
    }
}
