use crate::generators::{block, snapshot, vote_payment, GenVote, TestGen};
use mina_vote_counter::{
    base::{project_id::ProjectId, time_window::TimeWindow},
    canonicity::reconcile,
    command::{Transaction, UserCommand},
    constants::MAINNET_BURN_ADDRESS,
    observer::NoopObserver,
    tally::{tally, Tally},
    vote::VoteChoice,
};
use pretty_assertions::assert_eq;
use quickcheck_macros::quickcheck;
use std::collections::HashMap;

fn transactions(commands: Vec<UserCommand>) -> Vec<Transaction> {
    let snapshots = vec![snapshot("node", 1, vec![block("A", 1, commands)])];
    reconcile(&snapshots, &TimeWindow::unbounded(), 0, &NoopObserver).expect("single block")
}

fn count(commands: Vec<UserCommand>) -> Tally {
    tally(
        &transactions(commands),
        &TimeWindow::unbounded(),
        MAINNET_BURN_ADDRESS,
        &NoopObserver,
    )
}

#[test]
fn latest_vote_wins() {
    let tally = count(vec![
        vote_payment("B62qAlice", "no 42", 2),
        vote_payment("B62qAlice", "yes 42", 1),
    ]);
    let project = tally.get(&ProjectId::from(42)).expect("project 42");

    assert_eq!(project.yes_votes.count, 0);
    assert_eq!(project.no_votes.addresses, vec!["B62qAlice".to_string()]);
}

#[test]
fn leading_zeros_name_the_same_project() {
    let tally = count(vec![
        vote_payment("B62qAlice", "yes 7", 1),
        vote_payment("B62qBob", "no 007", 1),
    ]);

    assert_eq!(tally.len(), 1);
    let project = tally.get(&ProjectId::from(7)).expect("project 7");
    assert_eq!(project.votes(VoteChoice::Yes).count, 1);
    assert_eq!(project.votes(VoteChoice::No).count, 1);
}

#[test]
fn invalid_messages_are_ignored() {
    let mut wrong_recipient = vote_payment("B62qCarol", "yes 1", 1);
    wrong_recipient.to = Some("B62qSomeoneElse".to_string());

    let mut not_a_payment = vote_payment("B62qDave", "yes 1", 1);
    not_a_payment.kind = Some("STAKE_DELEGATION".to_string());

    let tally = count(vec![
        vote_payment("B62qAlice", "maybe 1", 1),
        vote_payment("B62qAlice", "yes 1 extra", 2),
        vote_payment("B62qBob", "yes", 1),
        wrong_recipient,
        not_a_payment,
    ]);

    assert!(tally.is_empty());
}

#[test]
fn serialized_shape() -> anyhow::Result<()> {
    let tally = count(vec![
        vote_payment("B62qBob", "yes 1", 1),
        vote_payment("B62qAlice", "yes 1", 1),
    ]);

    assert_eq!(
        serde_json::to_value(&tally)?,
        serde_json::json!({
            "1": {
                "yes_votes": { "count": 2, "addresses": ["B62qAlice", "B62qBob"] },
                "no_votes": { "count": 0, "addresses": [] }
            }
        })
    );
    Ok(())
}

#[quickcheck]
fn tally_is_idempotent(votes: TestGen<Vec<GenVote>>) -> bool {
    let txns = transactions(votes.0.iter().map(GenVote::payment).collect());
    let window = TimeWindow::unbounded();

    tally(&txns, &window, MAINNET_BURN_ADDRESS, &NoopObserver)
        == tally(&txns, &window, MAINNET_BURN_ADDRESS, &NoopObserver)
}

#[quickcheck]
fn highest_nonce_decides(votes: TestGen<Vec<GenVote>>) -> bool {
    let tally = count(votes.0.iter().map(GenVote::payment).collect());

    // (project, voter) -> (nonce, yes)
    let mut expected: HashMap<(u8, &str), (u32, bool)> = HashMap::new();
    for vote in &votes.0 {
        let latest = expected
            .entry((vote.project, vote.voter.as_str()))
            .or_insert((vote.nonce, vote.yes));
        if vote.nonce > latest.0 {
            *latest = (vote.nonce, vote.yes);
        }
    }

    let num_votes: usize = tally
        .iter()
        .map(|(_, project)| project.yes_votes.count + project.no_votes.count)
        .sum();
    num_votes == expected.len()
        && expected.iter().all(|((project, voter), (_, yes))| {
            let choice = if *yes { VoteChoice::Yes } else { VoteChoice::No };
            tally
                .get(&ProjectId::from(*project as u64))
                .map(|p| p.votes(choice).addresses.iter().any(|a| a == voter))
                .unwrap_or(false)
        })
}
