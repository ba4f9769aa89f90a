use crate::{
    generators::{block, snapshot, timestamp, vote_payment, voting_chain},
    helpers::RecordingObserver,
};
use mina_vote_counter::{
    base::time_window::TimeWindow,
    canonicity::{canonical_blocks, reconcile, BlockDiscontinuityError},
    command::UserCommand,
    observer::{NoopObserver, PipelineEvent},
};
use pretty_assertions::assert_eq;

#[test]
fn overlapping_snapshots_reconcile() -> anyhow::Result<()> {
    let snapshots = vec![
        snapshot("node", 1_000, voting_chain("A", 100..=105, "B62qAlice")),
        snapshot("node", 2_000, voting_chain("B", 103..=108, "B62qAlice")),
    ];

    let blocks = canonical_blocks(&snapshots, &NoopObserver)?;
    let state_hashes: Vec<&str> = blocks.iter().map(|b| b.state_hash.as_str()).collect();
    assert_eq!(
        state_hashes,
        vec![
            "A-100", "A-101", "A-102", "B-103", "B-104", "B-105", "B-106", "B-107", "B-108"
        ]
    );

    let txns = reconcile(&snapshots, &TimeWindow::unbounded(), 2, &NoopObserver)?;
    let heights: Vec<i64> = txns.iter().map(|t| t.nonce.0 as i64).collect();
    assert_eq!(heights, (100..=106).collect::<Vec<i64>>());
    assert!(txns.iter().all(|t| t.block_timestamp == timestamp(t.nonce.0)));
    Ok(())
}

#[test]
fn later_snapshot_wins_regardless_of_input_order() -> anyhow::Result<()> {
    let snapshots = vec![
        snapshot("node", 2_000, voting_chain("B", 103..=108, "B62qAlice")),
        snapshot("node", 1_000, voting_chain("A", 100..=105, "B62qAlice")),
    ];
    let blocks = canonical_blocks(&snapshots, &NoopObserver)?;

    assert_eq!(blocks.len(), 9);
    assert_eq!(blocks[3].state_hash, "B-103");
    assert_eq!(blocks[2].state_hash, "A-102");
    Ok(())
}

#[test]
fn height_gap_is_fatal() {
    let snapshots = vec![
        snapshot("node", 1_000, voting_chain("A", 100..=102, "B62qAlice")),
        snapshot("node", 2_000, voting_chain("B", 104..=106, "B62qAlice")),
    ];

    assert_eq!(
        reconcile(&snapshots, &TimeWindow::unbounded(), 0, &NoopObserver).unwrap_err(),
        BlockDiscontinuityError {
            previous: 102,
            current: 104
        }
    );
}

#[test]
fn window_boundaries_are_inclusive() -> anyhow::Result<()> {
    let snapshots = vec![snapshot("node", 1, voting_chain("A", 1..=6, "B62qAlice"))];
    let window = TimeWindow::from_millis(timestamp(2), timestamp(4));
    let txns = reconcile(&snapshots, &window, 0, &NoopObserver)?;

    let nonces: Vec<u32> = txns.iter().map(|t| t.nonce.0).collect();
    assert_eq!(nonces, vec![2, 3, 4]);
    Ok(())
}

#[test]
fn margin_covering_the_chain_excludes_everything() -> anyhow::Result<()> {
    let snapshots = vec![snapshot("node", 1, voting_chain("A", 1..=3, "B62qAlice"))];

    assert!(reconcile(&snapshots, &TimeWindow::unbounded(), 3, &NoopObserver)?.is_empty());
    assert!(reconcile(&snapshots, &TimeWindow::unbounded(), 100, &NoopObserver)?.is_empty());
    assert_eq!(
        reconcile(&snapshots, &TimeWindow::unbounded(), 2, &NoopObserver)?.len(),
        1
    );
    Ok(())
}

#[test]
fn no_snapshots() -> anyhow::Result<()> {
    assert!(reconcile(&[], &TimeWindow::unbounded(), 15, &NoopObserver)?.is_empty());
    Ok(())
}

#[test]
fn malformed_commands_are_dropped_and_reported() -> anyhow::Result<()> {
    let mut missing_memo = vote_payment("B62qBob", "yes 1", 1);
    missing_memo.memo = None;

    let snapshots = vec![snapshot(
        "node",
        1,
        vec![block(
            "A",
            1,
            vec![
                UserCommand::default(),
                missing_memo,
                vote_payment("B62qAlice", "yes 1", 1),
            ],
        )],
    )];
    let observer = RecordingObserver::default();
    let txns = reconcile(&snapshots, &TimeWindow::unbounded(), 0, &observer)?;

    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].from, "B62qAlice");

    let dropped: Vec<&'static str> = observer
        .events()
        .into_iter()
        .filter_map(|event| match event {
            PipelineEvent::TransactionDropped(e) => Some(e.field),
            _ => None,
        })
        .collect();
    assert_eq!(dropped, vec!["id", "memo"]);
    Ok(())
}

#[test]
fn pipeline_events() -> anyhow::Result<()> {
    let snapshots = vec![
        snapshot("node", 1, voting_chain("A", 1..=3, "B62qAlice")),
        snapshot("node", 2, voting_chain("B", 3..=4, "B62qAlice")),
    ];
    let observer = RecordingObserver::default();
    reconcile(&snapshots, &TimeWindow::unbounded(), 1, &observer)?;

    let events = observer.events();
    assert_eq!(
        events[0],
        PipelineEvent::SnapshotsMerged {
            num_snapshots: 2,
            num_blocks: 4,
            num_superseded: 1
        }
    );
    assert!(events.contains(&PipelineEvent::ReorgMarginApplied {
        margin: 1,
        excluded: 1
    }));
    assert_eq!(
        events.last(),
        Some(&PipelineEvent::TransactionsCollected {
            count: 3,
            oldest_block_timestamp: Some(timestamp(1)),
            newest_block_timestamp: Some(timestamp(3)),
        })
    );
    Ok(())
}
