//! Blocking GraphQL client for a Mina node

use crate::{
    block::Block,
    constants::GRAPHQL_TIMEOUT_SECS,
    snapshot::{ChainQuery, Snapshot},
    stake::BalanceLookup,
};
use chrono::Utc;
use log::{debug, info};
use reqwest::blocking::Client;
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use std::{str::FromStr, time::Duration};

/// Best chain blocks, newest last
pub const BEST_CHAIN_QUERY: &str = r#"query GetTransactions($maxLength: Int!) {
  bestChain(maxLength: $maxLength) {
    stateHash
    protocolState {
      blockchainState {
        date
      }
      consensusState {
        blockHeight
      }
    }
    transactions {
      userCommands {
        ... on UserCommandPayment {
          id
          to
          from
          amount
          fee
          memo
          nonce
          kind
        }
      }
    }
  }
}"#;

pub const ACCOUNT_BALANCE_QUERY: &str = r#"query StakingInfo($publicKey: PublicKey!) {
  account(publicKey: $publicKey) {
    balance {
      total
    }
  }
}"#;

pub const TOTAL_CURRENCY_QUERY: &str = r#"query GetTotalCurrency {
  bestChain(maxLength: 1) {
    protocolState {
      consensusState {
        totalCurrency
      }
    }
  }
}"#;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("GraphQL request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GraphQL errors: {}", .0.join("; "))]
    GraphQL(Vec<String>),

    #[error("GraphQL response has no data")]
    MissingData,

    #[error("GraphQL response is missing {0}")]
    MissingField(&'static str),

    #[error("invalid {field} decimal {value:?}: {source}")]
    InvalidDecimal {
        field: &'static str,
        value: String,
        source: rust_decimal::Error,
    },
}

#[derive(Debug, Clone)]
pub struct GraphQLClient {
    endpoint: String,
    http: Client,
}

impl GraphQLClient {
    pub fn new(endpoint: impl Into<String>) -> anyhow::Result<Self> {
        Self::with_timeout(endpoint, Duration::from_secs(GRAPHQL_TIMEOUT_SECS))
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            endpoint: endpoint.into(),
            http: Client::builder().timeout(timeout).build()?,
        })
    }

    /// POST `query` with `variables`, returning the response's `data`
    pub fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, ClientError> {
        debug!(
            "Executing GraphQL query against {}: {}...",
            self.endpoint,
            query.lines().next().unwrap_or_default()
        );

        let response: GraphQLResponse<T> = self
            .http
            .post(&self.endpoint)
            .json(&GraphQLRequest { query, variables })
            .send()?
            .error_for_status()?
            .json()?;
        response.into_data()
    }
}

impl ChainQuery for GraphQLClient {
    fn fetch_best_chain(&self, max_length: u32) -> anyhow::Result<Snapshot> {
        info!("Fetching up to {max_length} best chain blocks from {}", self.endpoint);

        let data: BestChainData =
            self.execute(BEST_CHAIN_QUERY, json!({ "maxLength": max_length }))?;
        let blocks = data.best_chain.unwrap_or_default();
        let snapshot = Snapshot::new(&self.endpoint, Utc::now().timestamp_millis(), blocks);

        info!(
            "Retrieved {} blocks from {}",
            snapshot.blocks.len(),
            self.endpoint
        );
        Ok(snapshot)
    }
}

impl BalanceLookup for GraphQLClient {
    fn get_balance(&self, address: &str) -> anyhow::Result<Decimal> {
        let data: AccountData =
            self.execute(ACCOUNT_BALANCE_QUERY, json!({ "publicKey": address }))?;
        Ok(data.balance()?)
    }

    fn get_total_supply(&self) -> anyhow::Result<Decimal> {
        let data: TotalCurrencyData = self.execute(TOTAL_CURRENCY_QUERY, json!({}))?;
        Ok(data.total_currency()?)
    }
}

///////////////////
// wire formats //
///////////////////

#[derive(Debug, Serialize)]
struct GraphQLRequest<'a> {
    query: &'a str,
    variables: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,

    #[serde(default)]
    errors: Vec<GraphQLErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorMessage {
    message: String,
}

impl<T> GraphQLResponse<T> {
    fn into_data(self) -> Result<T, ClientError> {
        if !self.errors.is_empty() {
            return Err(ClientError::GraphQL(
                self.errors.into_iter().map(|e| e.message).collect(),
            ));
        }
        self.data.ok_or(ClientError::MissingData)
    }
}

#[derive(Debug, Deserialize)]
struct BestChainData {
    #[serde(rename = "bestChain")]
    best_chain: Option<Vec<Block>>,
}

#[derive(Debug, Deserialize)]
struct AccountData {
    account: Option<Account>,
}

#[derive(Debug, Deserialize)]
struct Account {
    balance: AccountBalance,
}

#[derive(Debug, Deserialize)]
struct AccountBalance {
    total: String,
}

impl AccountData {
    fn balance(self) -> Result<Decimal, ClientError> {
        let account = self.account.ok_or(ClientError::MissingField("account"))?;
        parse_decimal("balance.total", account.balance.total)
    }
}

#[derive(Debug, Deserialize)]
struct TotalCurrencyData {
    #[serde(rename = "bestChain")]
    best_chain: Option<Vec<TotalCurrencyBlock>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalCurrencyBlock {
    protocol_state: TotalCurrencyProtocolState,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalCurrencyProtocolState {
    consensus_state: TotalCurrencyConsensusState,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalCurrencyConsensusState {
    total_currency: String,
}

impl TotalCurrencyData {
    fn total_currency(self) -> Result<Decimal, ClientError> {
        let block = self
            .best_chain
            .and_then(|blocks| blocks.into_iter().next())
            .ok_or(ClientError::MissingField("bestChain[0]"))?;
        parse_decimal(
            "totalCurrency",
            block.protocol_state.consensus_state.total_currency,
        )
    }
}

fn parse_decimal(field: &'static str, value: String) -> Result<Decimal, ClientError> {
    Decimal::from_str(&value).map_err(|source| ClientError::InvalidDecimal {
        field,
        value,
        source,
    })
}
