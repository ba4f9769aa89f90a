//! User commands as returned by the GraphQL `bestChain` query

pub mod memo;

use crate::{
    base::{amount::Amount, nonce::Nonce},
    constants::PAYMENT_KIND,
};
use serde::{Deserialize, Serialize};

/// Fields a user command must carry to be considered at all
pub const REQUIRED_FIELDS: [&str; 8] = ["id", "to", "from", "amount", "fee", "memo", "nonce", "kind"];

/// A `UserCommandPayment` fragment exactly as received.
///
/// Every field is optional: commands that are not payments come back as empty
/// objects, and a partial response must not fail the whole block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCommand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Amount>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<Nonce>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// A user command carrying every required field, annotated with the
/// timestamp of its containing block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub from: String,
    pub to: String,
    pub amount: Amount,
    pub fee: Amount,
    pub nonce: Nonce,
    pub memo: String,
    pub kind: String,

    /// Containing block timestamp (millis)
    pub block_timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing field `{field}` in user command {}", .id.as_deref().unwrap_or("<no id>"))]
pub struct MalformedTransaction {
    pub id: Option<String>,
    pub field: &'static str,
}

impl Transaction {
    /// Validate the required fields of `command` & attach the block timestamp
    pub fn from_user_command(
        command: &UserCommand,
        block_timestamp: i64,
    ) -> Result<Self, MalformedTransaction> {
        let missing = |field| MalformedTransaction {
            id: command.id.clone(),
            field,
        };

        Ok(Self {
            id: command.id.clone().ok_or_else(|| missing("id"))?,
            to: command.to.clone().ok_or_else(|| missing("to"))?,
            from: command.from.clone().ok_or_else(|| missing("from"))?,
            amount: command.amount.ok_or_else(|| missing("amount"))?,
            fee: command.fee.ok_or_else(|| missing("fee"))?,
            memo: command.memo.clone().ok_or_else(|| missing("memo"))?,
            nonce: command.nonce.ok_or_else(|| missing("nonce"))?,
            kind: command.kind.clone().ok_or_else(|| missing("kind"))?,
            block_timestamp,
        })
    }

    pub fn is_payment(&self) -> bool {
        self.kind == PAYMENT_KIND
    }
}
