//! Sorted, partitioned view of the record hierarchy.

use super::nest::{compare_records, nest_records};
use crate::record::{ApiRecord, CollectionRecord, Record};
use serde::Serialize;

/// Top level of the record tree, split for rendering.
///
/// Collections come first, each level ordered by ascending creation time
/// with ties kept in input order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HierarchyView {
    /// Number of top-level entries (`collections.len() + requests.len()`)
    pub total_count: usize,
    pub collections: Vec<CollectionRecord>,
    pub requests: Vec<ApiRecord>,
}

impl HierarchyView {
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    /// Every record in the tree, depth-first, with `children` stripped.
    ///
    /// Feeding the result back into [`build_view`] yields an identical view.
    pub fn flatten(&self) -> Vec<Record> {
        let mut out = Vec::new();
        for collection in &self.collections {
            flatten_collection(collection, &mut out);
        }
        out.extend(self.requests.iter().cloned().map(Record::Api));
        out
    }
}

fn flatten_collection(collection: &CollectionRecord, out: &mut Vec<Record>) {
    out.push(Record::Collection(CollectionRecord {
        children: Vec::new(),
        ..collection.clone()
    }));
    for child in &collection.children {
        match child {
            Record::Collection(nested) => flatten_collection(nested, out),
            api => out.push(api.without_children()),
        }
    }
}

/// Builds the render view for `records`.
///
/// Pure and deterministic: the input is not mutated, and the sort is stable
/// so equal timestamps keep their relative input order.
pub fn build_view(records: &[Record]) -> HierarchyView {
    let mut top_level = nest_records(records);
    top_level.sort_by(compare_records);

    let mut collections = Vec::new();
    let mut requests = Vec::new();
    for record in top_level {
        match record {
            Record::Collection(c) => collections.push(c),
            Record::Api(r) => requests.push(r),
        }
    }

    HierarchyView {
        total_count: collections.len() + requests.len(),
        collections,
        requests,
    }
}
