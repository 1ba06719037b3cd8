//! Process-lifetime memoization of query results
//!
//! Keyed by the full `SqlQuery` (SQL text + bound parameters). Entries are
//! never evicted; a restart is the only invalidation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bolsactl_core::SqlQuery;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::result_set::ResultSet;

/// Shared result cache
#[derive(Debug)]
pub struct QueryCache {
    enabled: bool,
    entries: RwLock<HashMap<SqlQuery, Arc<ResultSet>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Snapshot reported by `/health`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub enabled: bool,
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl QueryCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Cached result for `query`, counting the hit or miss
    pub async fn get(&self, query: &SqlQuery) -> Option<Arc<ResultSet>> {
        if !self.enabled {
            return None;
        }
        let found = self.entries.read().await.get(query).cloned();
        match found {
            Some(rs) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(rs)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub async fn insert(&self, query: SqlQuery, result: Arc<ResultSet>) {
        if self.enabled {
            self.entries.write().await.insert(query, result);
        }
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            enabled: self.enabled,
            entries: self.entries.read().await.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
