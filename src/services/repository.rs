use std::future::Future;

use anyhow::Result;

use crate::models::MatchRecord;

/// Source of the historical match table, read in full at load time.
pub trait MatchRepository {
    /// Every stored match, in the order the repository recorded them.
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<MatchRecord>>> + Send;
}

/// Fixed set of matches held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    records: Vec<MatchRecord>,
}

impl InMemoryRepository {
    pub fn new(records: Vec<MatchRecord>) -> Self {
        Self { records }
    }
}

impl MatchRepository for InMemoryRepository {
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<MatchRecord>>> + Send {
        let records = self.records.clone();
        async move { Ok(records) }
    }
}
