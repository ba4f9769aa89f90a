use crate::helpers::{setup_new_db_dir, RecordingObserver};
use mina_vote_counter::{
    base::time_window::{parse_utc_date, TimeWindow},
    constants::MAINNET_BURN_ADDRESS,
    observer::{NoopObserver, PipelineEvent},
    pipeline::{count_from_store, count_live, fetch_and_store, CountOptions},
    snapshot::{ChainQuery, Snapshot, SnapshotSource},
    store::SnapshotStore,
    tally::Tally,
};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

const SOURCE_ID: &str = "http://localhost:3085/graphql";

/// Serves the best chain fixture
struct FixtureQuery;

impl ChainQuery for FixtureQuery {
    fn fetch_best_chain(&self, max_length: u32) -> anyhow::Result<Snapshot> {
        let path = PathBuf::from("./tests/data/best_chain_snapshot.json");
        let mut snapshot: Snapshot = serde_json::from_str(&std::fs::read_to_string(path)?)?;

        let skip = snapshot.blocks.len().saturating_sub(max_length as usize);
        snapshot.blocks.drain(..skip);
        Ok(snapshot)
    }
}

fn options(start: &str, end: &str, reorg_margin: u32) -> anyhow::Result<CountOptions> {
    Ok(CountOptions {
        window: TimeWindow::new(parse_utc_date(start)?, parse_utc_date(end)?),
        reorg_margin,
        burn_address: MAINNET_BURN_ADDRESS.to_string(),
    })
}

fn expected(json: serde_json::Value) -> Tally {
    serde_json::from_value(json).expect("valid tally json")
}

#[test]
fn live_count() -> anyhow::Result<()> {
    let options = options("2024-06-01T00:00:00", "2024-06-01T00:10:00", 1)?;
    let observer = RecordingObserver::default();
    let tally = count_live(&FixtureQuery, 100_000, &options, &observer)?;

    assert_eq!(
        tally,
        expected(serde_json::json!({
            "7": {
                "yes_votes": { "count": 0, "addresses": [] },
                "no_votes": { "count": 1, "addresses": ["B62qBob"] }
            },
            "42": {
                "yes_votes": { "count": 0, "addresses": [] },
                "no_votes": { "count": 1, "addresses": ["B62qAlice"] }
            }
        }))
    );
    assert!(observer.events().contains(&PipelineEvent::VotesFiltered {
        kept: 4,
        total: 7,
        oldest_block_timestamp: Some(1717200000000),
        newest_block_timestamp: Some(1717200360000),
    }));
    Ok(())
}

#[test]
fn window_and_margin() -> anyhow::Result<()> {
    let all = count_live(
        &FixtureQuery,
        100_000,
        &options("2024-06-01", "2024-06-02", 0)?,
        &NoopObserver,
    )?;
    let project = all.get(&42.into()).expect("project 42");
    assert_eq!(project.yes_votes.addresses, vec!["B62qFrank".to_string()]);

    let early = count_live(
        &FixtureQuery,
        100_000,
        &options("2024-06-01T00:00:00", "2024-06-01T00:03:00", 0)?,
        &NoopObserver,
    )?;
    let project = early.get(&7.into()).expect("project 7");
    assert_eq!(project.yes_votes.addresses, vec!["B62qBob".to_string()]);
    assert_eq!(project.no_votes.count, 0);
    Ok(())
}

#[test]
fn fetch_store_and_count() -> anyhow::Result<()> {
    let store_dir = setup_new_db_dir("pipeline-store")?;
    let store = SnapshotStore::new(store_dir.path())?;

    // an older, shorter retrieval of the same chain
    let mut older = FixtureQuery.fetch_best_chain(2)?;
    older.retrieved_at -= 60_000;
    store.store_snapshot(&older)?;

    let snapshot = fetch_and_store(&FixtureQuery, &store, 100_000)?;
    assert_eq!(store.list_snapshots(SOURCE_ID)?.len(), 2);

    let options = options("2024-06-01T00:00:00", "2024-06-01T00:10:00", 1)?;
    let from_store = count_from_store(&store, SOURCE_ID, &options, &NoopObserver)?;
    let live = count_live(&FixtureQuery, 100_000, &options, &NoopObserver)?;

    assert_eq!(snapshot.blocks.len(), 4);
    assert_eq!(from_store, live);
    Ok(())
}

#[test]
fn vote_count_file() -> anyhow::Result<()> {
    let out_dir = setup_new_db_dir("vote-counts")?;
    let path = out_dir.path().join("vote_counts.json");
    let tally = count_live(
        &FixtureQuery,
        100_000,
        &options("2024-06-01", "2024-06-02", 0)?,
        &NoopObserver,
    )?;

    tally.write_json(&path)?;
    assert_eq!(Tally::read_json(&path)?, tally);
    Ok(())
}
