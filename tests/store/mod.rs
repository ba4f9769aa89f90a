use crate::{
    generators::{snapshot, timestamp, voting_chain},
    helpers::setup_new_db_dir,
};
use mina_vote_counter::{
    base::time_window::TimeWindow,
    snapshot::SnapshotSource,
    store::{
        version::{SnapshotStoreVersion, VersionStore},
        SnapshotStore,
    },
};
use pretty_assertions::assert_eq;

#[test]
fn snapshots_listed_in_retrieval_order() -> anyhow::Result<()> {
    let store_dir = setup_new_db_dir("snapshot-store-order")?;
    let store = SnapshotStore::new(store_dir.path())?;

    let later = snapshot("node", 2_000, voting_chain("B", 3..=4, "B62qAlice"));
    let earlier = snapshot("node", 1_000, voting_chain("A", 1..=3, "B62qAlice"));
    store.store_snapshot(&later)?;
    store.store_snapshot(&earlier)?;

    assert_eq!(store.list_snapshots("node")?, vec![earlier, later]);
    Ok(())
}

#[test]
fn sources_are_separate() -> anyhow::Result<()> {
    let store_dir = setup_new_db_dir("snapshot-store-sources")?;
    let store = SnapshotStore::new(store_dir.path())?;

    store.store_snapshot(&snapshot("node", 1, voting_chain("A", 1..=2, "B62qAlice")))?;
    store.store_snapshot(&snapshot("node2", 1, voting_chain("B", 1..=2, "B62qAlice")))?;

    let listed = store.list_snapshots("node")?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].blocks[0].state_hash, "A-1");
    assert!(store.list_snapshots("nod")?.is_empty());
    Ok(())
}

#[test]
fn window_listing() -> anyhow::Result<()> {
    let store_dir = setup_new_db_dir("snapshot-store-window")?;
    let store = SnapshotStore::new(store_dir.path())?;

    store.store_snapshot(&snapshot("node", 1, voting_chain("A", 1..=3, "B62qAlice")))?;
    store.store_snapshot(&snapshot("node", 2, voting_chain("B", 10..=12, "B62qAlice")))?;
    store.store_snapshot(&snapshot("node", 3, vec![]))?;

    let window = TimeWindow::from_millis(timestamp(3), timestamp(9));
    let listed = store.list_snapshots_in_window("node", &window)?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].retrieved_at, 1);

    let listed = store.list_snapshots_in_window("node", &TimeWindow::unbounded())?;
    let retrieved: Vec<i64> = listed.iter().map(|s| s.retrieved_at).collect();
    assert_eq!(retrieved, vec![1, 2]);
    Ok(())
}

#[test]
fn snapshots_are_immutable() -> anyhow::Result<()> {
    let store_dir = setup_new_db_dir("snapshot-store-immutable")?;
    let store = SnapshotStore::new(store_dir.path())?;

    let original = snapshot("node", 1, voting_chain("A", 1..=2, "B62qAlice"));
    store.store_snapshot(&original)?;
    store.store_snapshot(&snapshot("node", 1, voting_chain("B", 5..=6, "B62qAlice")))?;

    assert_eq!(store.list_snapshots("node")?, vec![original]);
    Ok(())
}

#[test]
fn snapshots_persist_across_reopen() -> anyhow::Result<()> {
    let store_dir = setup_new_db_dir("snapshot-store-reopen")?;
    let stored = snapshot("node", 1, voting_chain("A", 1..=2, "B62qAlice"));
    {
        let store = SnapshotStore::new(store_dir.path())?;
        store.store_snapshot(&stored)?;
    }

    let store = SnapshotStore::new(store_dir.path())?;
    assert_eq!(store.list_snapshots("node")?, vec![stored]);
    Ok(())
}

#[test]
fn store_version() -> anyhow::Result<()> {
    let store_dir = setup_new_db_dir("snapshot-store-version")?;
    let store = SnapshotStore::new(store_dir.path())?;

    assert_eq!(store.get_db_version()?, SnapshotStoreVersion::default());

    // an existing version is never overwritten
    store.set_db_version_with_git_commit(9, 9, 9)?;
    assert_eq!(store.get_db_version()?.major, SnapshotStoreVersion::MAJOR);
    Ok(())
}
