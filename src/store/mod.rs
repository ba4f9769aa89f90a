//! speedb-backed snapshot persistence

// traits
pub mod column_families;
pub mod fixed_keys;
pub mod version;

// impls
pub mod column_families_impl;
pub mod snapshot_store_impl;
pub mod version_store_impl;

use self::{
    fixed_keys::FixedKeys,
    version::{SnapshotStoreVersion, VersionStore},
};
use anyhow::{bail, Context};
use log::{debug, info};
use speedb::{ColumnFamilyDescriptor, DBCompressionType, DB};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct SnapshotStore {
    pub db_path: PathBuf,
    pub database: DB,
}

impl SnapshotStore {
    /// Add the corresponding CF helper to [column_families::ColumnFamilyHelpers]
    /// & bump [SnapshotStoreVersion] as needed!
    const COLUMN_FAMILIES: [&'static str; 2] = ["snapshots", "snapshot-block-range"];

    /// Opens (or creates) the store at `path`
    pub fn new(path: &Path) -> anyhow::Result<Self> {
        let mut cf_opts = speedb::Options::default();
        cf_opts.set_compression_type(DBCompressionType::Zstd);

        let mut database_opts = speedb::Options::default();
        database_opts.set_compression_type(DBCompressionType::Zstd);
        database_opts.create_missing_column_families(true);
        database_opts.create_if_missing(true);

        let column_families: Vec<ColumnFamilyDescriptor> = Self::COLUMN_FAMILIES
            .iter()
            .map(|cf| ColumnFamilyDescriptor::new(*cf, cf_opts.clone()))
            .collect();
        let store = Self {
            db_path: path.into(),
            database: DB::open_cf_descriptors(&database_opts, path, column_families)
                .with_context(|| format!("Failed to open snapshot store at {path:#?}"))?,
        };

        store.set_db_version_with_git_commit(
            SnapshotStoreVersion::MAJOR,
            SnapshotStoreVersion::MINOR,
            SnapshotStoreVersion::PATCH,
        )?;
        let version = store.migrate_db_version()?;

        info!("Opened snapshot store {version} at {}", path.display());
        debug!("Column families: {:?}", Self::COLUMN_FAMILIES);
        Ok(store)
    }
}

impl FixedKeys for SnapshotStore {}

/// Key format
/// ```text
/// {source_id}\0{retrieved_at}
/// - source_id:    UTF-8 bytes
/// - retrieved_at: 8 BE bytes (millis)
/// ```
pub fn snapshot_key(source_id: &str, retrieved_at: i64) -> Vec<u8> {
    let mut key = source_prefix(source_id);
    key.extend_from_slice(&retrieved_at.to_be_bytes());
    key
}

/// Prefix shared by all snapshot keys of `source_id`
pub fn source_prefix(source_id: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(source_id.len() + 1 + I64_LEN);
    prefix.extend_from_slice(source_id.as_bytes());
    prefix.push(0);
    prefix
}

pub const I64_LEN: usize = (i64::BITS / 8) as usize;

pub fn i64_from_be_bytes(bytes: &[u8]) -> anyhow::Result<i64> {
    if bytes.len() != I64_LEN {
        bail!("Invalid i64 bytes len: {}", bytes.len())
    }

    let mut be_bytes = [0; I64_LEN];
    be_bytes.copy_from_slice(bytes);
    Ok(i64::from_be_bytes(be_bytes))
}

/// Value format
/// ```text
/// {min_block_timestamp}{max_block_timestamp}
/// - both: 8 BE bytes (millis)
/// ```
pub fn block_range_value(min: i64, max: i64) -> [u8; 2 * I64_LEN] {
    let mut bytes = [0; 2 * I64_LEN];
    bytes[..I64_LEN].copy_from_slice(&min.to_be_bytes());
    bytes[I64_LEN..].copy_from_slice(&max.to_be_bytes());
    bytes
}

pub fn block_range_from_value(bytes: &[u8]) -> anyhow::Result<(i64, i64)> {
    if bytes.len() != 2 * I64_LEN {
        bail!("Invalid block range bytes len: {}", bytes.len())
    }
    Ok((
        i64_from_be_bytes(&bytes[..I64_LEN])?,
        i64_from_be_bytes(&bytes[I64_LEN..])?,
    ))
}
