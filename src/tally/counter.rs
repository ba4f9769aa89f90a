//! Filter, sequence & count governance votes

use super::{ProjectTally, Tally, VoteSet};
use crate::{
    base::{project_id::ProjectId, time_window::TimeWindow},
    command::Transaction,
    observer::{PipelineEvent, PipelineObserver},
    vote::{Vote, VoteChoice},
};
use log::trace;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Votes cast by `transactions`: payments to `burn_address` in `window`
/// whose memo is a valid vote message
pub fn filter_votes(
    transactions: &[Transaction],
    window: &TimeWindow,
    burn_address: &str,
    observer: &dyn PipelineObserver,
) -> Vec<Vote> {
    let oldest_block_timestamp = transactions.iter().map(|t| t.block_timestamp).min();
    let newest_block_timestamp = transactions.iter().map(|t| t.block_timestamp).max();

    let votes: Vec<Vote> = transactions
        .iter()
        .filter(|txn| {
            txn.to == burn_address && txn.is_payment() && window.contains(txn.block_timestamp)
        })
        .filter_map(|txn| {
            let vote = Vote::from_transaction(txn);
            trace!(
                "Memo validity check for {} ({} MINA from {}): {}",
                txn.id,
                txn.amount,
                txn.from,
                vote.is_some()
            );
            vote
        })
        .collect();

    observer.observe(PipelineEvent::VotesFiltered {
        kept: votes.len(),
        total: transactions.len(),
        oldest_block_timestamp,
        newest_block_timestamp,
    });
    votes
}

/// Group votes by voter, in order of each voter's first appearance, & sort
/// each group by nonce. Votes with equal nonces keep their relative order.
pub fn sequence_votes(votes: Vec<Vote>, observer: &dyn PipelineObserver) -> Vec<Vote> {
    let count = votes.len();
    let mut group_index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<Vote>> = vec![];

    for vote in votes {
        let idx = *group_index.entry(vote.voter.clone()).or_insert_with(|| {
            groups.push(vec![]);
            groups.len() - 1
        });
        groups[idx].push(vote);
    }

    let senders = groups.len();
    let sequenced: Vec<Vote> = groups
        .into_iter()
        .flat_map(|mut group| {
            group.sort_by_key(|vote| vote.nonce);
            group
        })
        .collect();

    observer.observe(PipelineEvent::VotesSequenced { count, senders });
    sequenced
}

/// Count sequenced votes: each voter's last vote for a project supersedes
/// all earlier ones
pub fn count_votes(votes: &[Vote], observer: &dyn PipelineObserver) -> Tally {
    let mut latest_votes: BTreeMap<&ProjectId, HashMap<&str, VoteChoice>> = BTreeMap::new();

    for vote in votes {
        latest_votes
            .entry(&vote.project_id)
            .or_default()
            .insert(&vote.voter, vote.choice);
    }

    let tally: BTreeMap<ProjectId, ProjectTally> = latest_votes
        .into_iter()
        .map(|(project_id, voters)| {
            let (mut yes, mut no) = (BTreeSet::new(), BTreeSet::new());
            for (voter, choice) in voters {
                match choice {
                    VoteChoice::Yes => yes.insert(voter.to_string()),
                    VoteChoice::No => no.insert(voter.to_string()),
                };
            }
            (
                project_id.clone(),
                ProjectTally {
                    yes_votes: VoteSet::from_addresses(yes),
                    no_votes: VoteSet::from_addresses(no),
                },
            )
        })
        .collect();

    observer.observe(PipelineEvent::VotesTallied {
        projects: tally.len(),
    });
    Tally(tally)
}

/// Tally the governance votes among `transactions`.
///
/// A voter's standing for a project is their highest-nonce valid vote within
/// `window`.
pub fn tally(
    transactions: &[Transaction],
    window: &TimeWindow,
    burn_address: &str,
    observer: &dyn PipelineObserver,
) -> Tally {
    let votes = filter_votes(transactions, window, burn_address, observer);
    let votes = sequence_votes(votes, observer);
    count_votes(&votes, observer)
}
