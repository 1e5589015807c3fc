//! Memoized hierarchy view.

use super::view::{HierarchyView, build_view};
use crate::record::RecordStore;
use std::sync::Arc;

/// Caches the [`HierarchyView`] of a [`RecordStore`] keyed by its version.
///
/// The view is rebuilt only when the store version differs from the one the
/// cached view was built from.
#[derive(Debug, Default)]
pub struct ViewCache {
    cached: Option<(u64, Arc<HierarchyView>)>,
    builds: u64,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build(&mut self, store: &RecordStore) -> Arc<HierarchyView> {
        if let Some((version, view)) = &self.cached {
            if *version == store.version() {
                return view.clone();
            }
        }

        let view = Arc::new(build_view(store.records()));
        self.builds += 1;
        self.cached = Some((store.version(), view.clone()));
        view
    }

    /// Drops the cached view. Needed when the store instance is swapped.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// How many times the view has been computed.
    pub fn build_count(&self) -> u64 {
        self.builds
    }
}
