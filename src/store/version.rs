use crate::constants::GIT_COMMIT_HASH;
use serde::{Deserialize, Serialize};

pub trait VersionStore {
    /// Set db version, unless one is already set
    fn set_db_version_with_git_commit(
        &self,
        major: u32,
        minor: u32,
        patch: u32,
    ) -> anyhow::Result<()>;

    /// Get db version
    fn get_db_version(&self) -> anyhow::Result<SnapshotStoreVersion>;

    /// Check the stored version against this build, recording the current
    /// version when an older compatible one is found
    fn migrate_db_version(&self) -> anyhow::Result<SnapshotStoreVersion>;
}

/// Store layout version. Minor bumps only add column families or keys, so an
/// older minor version opens as is; a newer one may hold data this build
/// cannot read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotStoreVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub git_commit_sha: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compatibility {
    /// Same major & minor version
    Current,

    /// Older minor version, readable after recording the current version
    Upgradable,

    /// Different major or newer minor version
    Incompatible,
}

impl SnapshotStoreVersion {
    pub const MAJOR: u32 = 0;
    pub const MINOR: u32 = 1;
    pub const PATCH: u32 = 0;

    /// Whether a store written at `self` can be opened by this build
    pub fn compatibility(&self) -> Compatibility {
        if self.major != Self::MAJOR || self.minor > Self::MINOR {
            Compatibility::Incompatible
        } else if self.minor < Self::MINOR {
            Compatibility::Upgradable
        } else {
            Compatibility::Current
        }
    }
}

impl Default for SnapshotStoreVersion {
    fn default() -> Self {
        Self {
            major: Self::MAJOR,
            minor: Self::MINOR,
            patch: Self::PATCH,
            git_commit_sha: GIT_COMMIT_HASH.to_string(),
        }
    }
}

impl std::fmt::Display for SnapshotStoreVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}.{}-{}",
            self.major, self.minor, self.patch, self.git_commit_sha
        )
    }
}
