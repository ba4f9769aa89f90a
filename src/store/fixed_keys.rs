pub trait FixedKeys {
    const SNAPSHOT_STORE_VERSION_KEY: &'static [u8] = "vote_counter_store_version".as_bytes();
}
