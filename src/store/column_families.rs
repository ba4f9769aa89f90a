/// Snapshot store column family helper trait
use speedb::ColumnFamily;

pub trait ColumnFamilyHelpers {
    /// CF for storing snapshots
    fn snapshots_cf(&self) -> &ColumnFamily;

    /// CF for storing snapshot block timestamp ranges
    fn snapshot_block_range_cf(&self) -> &ColumnFamily;
}
