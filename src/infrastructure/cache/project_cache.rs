use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};
use dashmap::DashMap;

use crate::entities::project::{Project, ProjectFilter};

#[derive(Debug)]
struct Entry {
    stored_at: Instant,
    generation: u64,
    projects: Arc<Vec<Project>>,
}

/// Public project listings keyed by filter. Any write clears every entry
/// and bumps the generation; lists read under an older generation are
/// never served.
#[derive(Clone)]
pub struct ProjectListCache {
    entries: Arc<DashMap<ProjectFilter, Entry>>,
    generation: Arc<AtomicU64>,
    ttl: Duration,
}

impl ProjectListCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            generation: Arc::new(AtomicU64::new(0)),
            ttl,
        }
    }

    /// Take this before reading from the repository and hand it to `insert`.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn get(&self, filter: &ProjectFilter) -> Option<Arc<Vec<Project>>> {
        let entry = self.entries.get(filter)?;
        if entry.generation == self.generation() && entry.stored_at.elapsed() < self.ttl {
            Some(entry.projects.clone())
        } else {
            drop(entry);
            self.entries.remove(filter);
            None
        }
    }

    /// Stores a list read under `generation`. Nothing is stored when a
    /// write has invalidated the cache since.
    pub fn insert(&self, filter: ProjectFilter, projects: Vec<Project>, generation: u64) -> Arc<Vec<Project>> {
        let projects = Arc::new(projects);
        if !self.ttl.is_zero() && generation == self.generation() {
            self.entries.insert(filter, Entry {
                stored_at: Instant::now(),
                generation,
                projects: projects.clone(),
            });
        }
        projects
    }

    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        let current = self.generation();
        self.entries.retain(|_, e| e.generation == current && e.stored_at.elapsed() < ttl);
        before.saturating_sub(self.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalidate_clears_all_filters() {
        let cache = ProjectListCache::new(Duration::from_secs(60));
        let generation = cache.generation();
        cache.insert(ProjectFilter::default(), vec![], generation);
        cache.insert(ProjectFilter::featured_only(), vec![], generation);

        assert!(cache.get(&ProjectFilter::default()).is_some());
        cache.invalidate();
        assert!(cache.get(&ProjectFilter::default()).is_none());
        assert!(cache.get(&ProjectFilter::featured_only()).is_none());
    }

    #[test]
    fn zero_ttl_disables_caching() {
        let cache = ProjectListCache::new(Duration::ZERO);
        cache.insert(ProjectFilter::default(), vec![], cache.generation());
        assert!(cache.get(&ProjectFilter::default()).is_none());
    }

    #[test]
    fn list_read_before_invalidate_is_not_stored() {
        let cache = ProjectListCache::new(Duration::from_secs(60));
        let generation = cache.generation();

        cache.invalidate();
        cache.insert(ProjectFilter::default(), vec![], generation);

        assert!(cache.get(&ProjectFilter::default()).is_none());
        assert!(cache.is_empty());
    }
}
