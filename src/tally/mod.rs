//! Per-project vote tallies

pub mod counter;

pub use counter::{count_votes, filter_votes, sequence_votes, tally};

use crate::{base::project_id::ProjectId, vote::VoteChoice};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

/// Voters of one direction for one project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSet {
    pub count: usize,
    pub addresses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTally {
    pub yes_votes: VoteSet,
    pub no_votes: VoteSet,
}

/// Project id -> yes/no voter sets. A voter is in at most one set per
/// project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tally(pub BTreeMap<ProjectId, ProjectTally>);

impl VoteSet {
    /// Addresses are emitted sorted, the order is not significant
    pub fn from_addresses(addresses: BTreeSet<String>) -> Self {
        Self {
            count: addresses.len(),
            addresses: addresses.into_iter().collect(),
        }
    }
}

impl ProjectTally {
    pub fn votes(&self, choice: VoteChoice) -> &VoteSet {
        match choice {
            VoteChoice::Yes => &self.yes_votes,
            VoteChoice::No => &self.no_votes,
        }
    }
}

impl Tally {
    pub fn get(&self, project_id: &ProjectId) -> Option<&ProjectTally> {
        self.0.get(project_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProjectId, &ProjectTally)> {
        self.0.iter()
    }

    /// Every distinct voter across all projects & directions
    pub fn voters(&self) -> BTreeSet<&str> {
        self.0
            .values()
            .flat_map(|project| {
                project
                    .yes_votes
                    .addresses
                    .iter()
                    .chain(project.no_votes.addresses.iter())
            })
            .map(String::as_str)
            .collect()
    }

    pub fn read_json(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let file = File::open(path).with_context(|| format!("Failed to open {path:#?}"))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse vote counts in {path:#?}"))
    }

    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        use anyhow::Context;

        let file = File::create(path).with_context(|| format!("Failed to create {path:#?}"))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .with_context(|| format!("Failed to write vote counts to {path:#?}"))?;
        Ok(writer.flush()?)
    }
}
