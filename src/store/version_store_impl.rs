use super::{
    fixed_keys::FixedKeys,
    version::{Compatibility, SnapshotStoreVersion, VersionStore},
    SnapshotStore,
};
use anyhow::{bail, Context};
use log::{info, trace};

impl VersionStore for SnapshotStore {
    /// Set db version with env var `GIT_COMMIT_HASH`
    fn set_db_version_with_git_commit(
        &self,
        major: u32,
        minor: u32,
        patch: u32,
    ) -> anyhow::Result<()> {
        let version = SnapshotStoreVersion {
            major,
            minor,
            patch,
            ..Default::default()
        };
        if self
            .database
            .get(Self::SNAPSHOT_STORE_VERSION_KEY)?
            .is_none()
        {
            trace!("Setting database version: {version:#?}");
            self.put_db_version(&version)?;
        }
        Ok(())
    }

    fn get_db_version(&self) -> anyhow::Result<SnapshotStoreVersion> {
        trace!("Getting database version");
        let bytes = self
            .database
            .get(Self::SNAPSHOT_STORE_VERSION_KEY)?
            .context("snapshot store has no version")?;
        serde_json::from_slice(&bytes).context("invalid snapshot store version")
    }

    fn migrate_db_version(&self) -> anyhow::Result<SnapshotStoreVersion> {
        let stored = self.get_db_version()?;
        match stored.compatibility() {
            Compatibility::Current => Ok(stored),
            Compatibility::Upgradable => {
                let current = SnapshotStoreVersion::default();
                info!("Upgrading snapshot store from {stored} to {current}");
                self.put_db_version(&current)?;
                Ok(current)
            }
            Compatibility::Incompatible => bail!(
                "Incompatible snapshot store version {stored} at {:#?}, this build reads {}.{}.x",
                self.db_path,
                SnapshotStoreVersion::MAJOR,
                SnapshotStoreVersion::MINOR
            ),
        }
    }
}

impl SnapshotStore {
    fn put_db_version(&self, version: &SnapshotStoreVersion) -> anyhow::Result<()> {
        self.database
            .put(Self::SNAPSHOT_STORE_VERSION_KEY, serde_json::to_vec(version)?)?;
        Ok(())
    }
}
