//! Stake-weighting of vote tallies

use crate::{
    base::project_id::ProjectId,
    tally::{Tally, VoteSet},
};
use anyhow::Context;
use log::{debug, info};
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

/// Remote source of account balances
pub trait BalanceLookup {
    /// Total balance of `address`
    fn get_balance(&self, address: &str) -> anyhow::Result<Decimal>;

    /// Total currency in circulation
    fn get_total_supply(&self) -> anyhow::Result<Decimal>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StakeError {
    #[error("total supply is zero, stake percentages are undefined")]
    ZeroTotalSupply,

    #[error("decimal overflow computing the stake of {0}")]
    Overflow(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressStake {
    pub balance: Decimal,
    pub percent: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stake {
    pub addresses: BTreeMap<String, AddressStake>,
    pub total: Decimal,
    pub percent: Decimal,
}

/// A [VoteSet] with the stake behind it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeVoteSet {
    pub count: usize,
    pub addresses: Vec<String>,
    pub stake: Stake,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStake {
    pub yes_votes: StakeVoteSet,
    pub no_votes: StakeVoteSet,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StakeReport(pub BTreeMap<ProjectId, ProjectStake>);

/// Computes [StakeReport]s, fanning balance lookups out over a bounded pool
#[derive(Debug, Clone, Copy)]
pub struct StakeCounter {
    workers: usize,
}

impl StakeCounter {
    pub const DEFAULT_WORKERS: usize = 4;

    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Stake-weight every project & direction of `tally`.
    ///
    /// Each distinct voter's balance is looked up once.
    pub fn count_stakes<L>(&self, tally: &Tally, lookup: &L) -> anyhow::Result<StakeReport>
    where
        L: BalanceLookup + Sync,
    {
        let total_supply = lookup.get_total_supply()?;
        if total_supply.is_zero() {
            return Err(StakeError::ZeroTotalSupply.into());
        }
        info!("Total supply: {total_supply}");

        let balances = self.lookup_balances(tally, lookup)?;
        let report: BTreeMap<ProjectId, ProjectStake> = tally
            .iter()
            .map(|(project_id, project)| -> Result<_, StakeError> {
                let stake = ProjectStake {
                    yes_votes: stake_info(&project.yes_votes, &balances, total_supply)?,
                    no_votes: stake_info(&project.no_votes, &balances, total_supply)?,
                };
                Ok((project_id.clone(), stake))
            })
            .collect::<Result<_, StakeError>>()?;

        info!("Counted stake for {} projects", tally.len());
        Ok(StakeReport(report))
    }

    fn lookup_balances<L>(&self, tally: &Tally, lookup: &L) -> anyhow::Result<BTreeMap<String, Decimal>>
    where
        L: BalanceLookup + Sync,
    {
        let voters: Vec<&str> = tally.voters().into_iter().collect();
        info!(
            "Looking up {} balances with {} workers",
            voters.len(),
            self.workers
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .context("Failed to build the balance lookup pool")?;
        pool.install(|| {
            voters
                .par_iter()
                .map(|address| {
                    let balance = lookup
                        .get_balance(address)
                        .with_context(|| format!("Failed to get the balance of {address}"))?;
                    debug!("Balance of {address}: {balance}");
                    Ok::<_, anyhow::Error>((address.to_string(), balance))
                })
                .collect()
        })
    }
}

impl Default for StakeCounter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WORKERS)
    }
}

/// Percent of `total_supply` held by `balance`, `None` on overflow or a
/// zero supply
pub fn percent_of_supply(balance: Decimal, total_supply: Decimal) -> Option<Decimal> {
    balance
        .checked_div(total_supply)?
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|percent| percent.normalize())
}

fn stake_info(
    votes: &VoteSet,
    balances: &BTreeMap<String, Decimal>,
    total_supply: Decimal,
) -> Result<StakeVoteSet, StakeError> {
    let mut stake = Stake::default();

    for address in &votes.addresses {
        let balance = balances.get(address).copied().unwrap_or_default();
        let percent = percent_of_supply(balance, total_supply)
            .ok_or_else(|| StakeError::Overflow(address.clone()))?;
        stake
            .addresses
            .insert(address.clone(), AddressStake { balance, percent });
        stake.total = stake
            .total
            .checked_add(balance)
            .ok_or_else(|| StakeError::Overflow("the vote total".to_string()))?;
    }
    stake.percent = percent_of_supply(stake.total, total_supply)
        .ok_or_else(|| StakeError::Overflow("the vote total".to_string()))?;

    Ok(StakeVoteSet {
        count: votes.count,
        addresses: votes.addresses.clone(),
        stake,
    })
}

impl StakeReport {
    pub fn get(&self, project_id: &ProjectId) -> Option<&ProjectStake> {
        self.0.get(project_id)
    }

    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        let file = File::create(path).with_context(|| format!("Failed to create {path:#?}"))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .with_context(|| format!("Failed to write stake counts to {path:#?}"))?;
        writer.flush()?;

        info!("Stake information saved to {}", path.display());
        Ok(())
    }
}
