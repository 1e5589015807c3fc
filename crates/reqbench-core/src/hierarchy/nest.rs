//! Flat-to-nested conversion of records.

use crate::record::Record;
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    OnPath,
    Done,
}

/// Sibling ordering: collections before requests, then ascending creation time.
pub fn compare_records(a: &Record, b: &Record) -> Ordering {
    match (a.is_collection(), b.is_collection()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.created_ts().cmp(&b.created_ts()),
    }
}

/// Converts flat records into a forest rooted at top-level records.
///
/// A record whose parent ID does not resolve to a collection (missing,
/// pointing at a request, or part of a parent cycle) is placed at root
/// level. Children attach to the first collection carrying the parent ID.
/// Every sibling list below the roots is sorted with [`compare_records`];
/// the roots keep input order.
pub fn nest_records(records: &[Record]) -> Vec<Record> {
    let parents = resolve_parents(records);

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    let mut roots = Vec::new();
    for (index, parent) in parents.iter().enumerate() {
        match parent {
            Some(parent) => children[*parent].push(index),
            None => roots.push(index),
        }
    }

    roots
        .into_iter()
        .map(|index| build_node(records, &children, index))
        .collect()
}

fn build_node(records: &[Record], children: &[Vec<usize>], index: usize) -> Record {
    match &records[index] {
        Record::Collection(collection) => {
            let mut nested: Vec<Record> = children[index]
                .iter()
                .map(|&child| build_node(records, children, child))
                .collect();
            nested.sort_by(compare_records);

            let mut node = collection.clone();
            node.children = nested;
            Record::Collection(node)
        }
        api => api.clone(),
    }
}

/// Index of the effective parent of every record, `None` for roots.
fn resolve_parents(records: &[Record]) -> Vec<Option<usize>> {
    let mut collection_index: HashMap<&str, usize> = HashMap::new();
    for (index, record) in records.iter().enumerate() {
        if record.is_collection() {
            collection_index.entry(record.id()).or_insert(index);
        }
    }

    let mut effective: Vec<Option<usize>> = records
        .iter()
        .map(|record| {
            let parent_id = record.parent_id()?;
            let parent = collection_index.get(parent_id).copied();
            if parent.is_none() {
                tracing::debug!(
                    record_id = record.id(),
                    parent_id,
                    "Parent collection not found, rendering record at root"
                );
            }
            parent
        })
        .collect();

    // Break parent cycles: every member of a cycle becomes a root.
    let mut state = vec![Visit::Unvisited; records.len()];
    for start in 0..records.len() {
        if state[start] == Visit::Done {
            continue;
        }

        let mut path: Vec<usize> = Vec::new();
        let mut current = Some(start);
        while let Some(node) = current {
            match state[node] {
                Visit::Done => break,
                Visit::OnPath => {
                    if let Some(pos) = path.iter().position(|&p| p == node) {
                        for &member in &path[pos..] {
                            tracing::debug!(
                                record_id = records[member].id(),
                                "Parent cycle detected, rendering record at root"
                            );
                            effective[member] = None;
                        }
                    }
                    break;
                }
                Visit::Unvisited => {
                    state[node] = Visit::OnPath;
                    path.push(node);
                    current = effective[node];
                }
            }
        }

        for node in path {
            state[node] = Visit::Done;
        }
    }

    effective
}
