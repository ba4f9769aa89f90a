//////////////////
// Test modules //
//////////////////

mod canonicity;
mod pipeline;
mod store;
mod tally;

//////////////////
// Test helpers //
//////////////////


pub mod helpers {
    use mina_vote_counter::observer::{PipelineEvent, PipelineObserver};
    use std::cell::RefCell;

    /// Sets up a new temp dir, deleted when it goes out of scope
    pub fn setup_new_db_dir(prefix: &str) -> anyhow::Result<tempfile::TempDir> {
        let store_dir = tempfile::TempDir::with_prefix(prefix)?;
        Ok(store_dir)
    }

    /// Keeps every observed event
    #[derive(Debug, Default)]
    pub struct RecordingObserver(pub RefCell<Vec<PipelineEvent>>);

    impl PipelineObserver for RecordingObserver {
        fn observe(&self, event: PipelineEvent) {
            self.0.borrow_mut().push(event);
        }
    }

    impl RecordingObserver {
        pub fn events(&self) -> Vec<PipelineEvent> {
            self.0.borrow().clone()
        }
    }
}
