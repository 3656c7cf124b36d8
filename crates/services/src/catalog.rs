//! # Thread Catalog
//!
//! Listing and filtering for the landing page: a status badge filter and a
//! case-insensitive tag search, applied over the full thread list.

use domains::{Result, Thread, ThreadStatus};

use crate::threads::Threads;

/// Filter selection. `status: None` means "All"; an empty or whitespace
/// tag query matches everything.
#[derive(Debug, Clone, Default)]
pub struct ThreadFilter {
    pub status: Option<ThreadStatus>,
    pub tag_query: Option<String>,
}

impl ThreadFilter {
    pub fn matches(&self, thread: &Thread) -> bool {
        if let Some(status) = self.status {
            if thread.status != Some(status) {
                return false;
            }
        }
        if let Some(query) = &self.tag_query {
            let query = query.trim().to_lowercase();
            if !query.is_empty()
                && !thread
                    .tags
                    .iter()
                    .any(|tag| tag.name.to_lowercase().contains(&query))
            {
                return false;
            }
        }
        true
    }
}

pub struct Catalog {
    threads: Threads,
}

impl Catalog {
    pub fn new(threads: Threads) -> Self {
        Self { threads }
    }

    /// All threads newest-first with the filter applied.
    pub async fn latest(&self, filter: &ThreadFilter) -> Result<Vec<Thread>> {
        Ok(self
            .threads
            .get_all()
            .await?
            .into_iter()
            .filter(|thread| filter.matches(thread))
            .collect())
    }
}
