use reqbench_core::entry::Entry;
use reqbench_core::hierarchy::{HierarchyView, build_view};
use reqbench_core::record::{ApiRecord, CollectionRecord, Record, RecordStore};

fn collection(id: &str, parent: Option<&str>, ts: i64) -> Record {
    Record::Collection(CollectionRecord {
        id: id.to_string(),
        name: format!("Collection {}", id),
        collection_id: parent.map(str::to_string),
        description: None,
        owner_id: None,
        created_ts: ts,
        updated_ts: ts,
        children: Vec::new(),
    })
}

fn api(id: &str, parent: Option<&str>, ts: i64) -> Record {
    Record::Api(ApiRecord {
        id: id.to_string(),
        name: format!("Request {}", id),
        collection_id: parent.map(str::to_string),
        owner_id: None,
        created_ts: ts,
        updated_ts: ts,
        data: Entry::empty(),
    })
}

fn mixed_flat_records() -> Vec<Record> {
    vec![
        api("r1", None, 40),
        collection("c1", None, 30),
        api("r2", None, 10),
        collection("c2", None, 5),
        api("r3", None, 10),
        collection("c3", None, 30),
        api("r4", None, -2),
    ]
}

fn top_level_ids(view: &HierarchyView) -> Vec<String> {
    view.collections
        .iter()
        .map(|c| c.id.clone())
        .chain(view.requests.iter().map(|r| r.id.clone()))
        .collect()
}

#[test]
fn test_flat_input_partitions_every_record() {
    let records = mixed_flat_records();

    let view = build_view(&records);

    assert_eq!(view.collections.len() + view.requests.len(), view.total_count);
    assert_eq!(view.total_count, records.len());
    let mut ids = top_level_ids(&view);
    ids.sort();
    let mut expected: Vec<String> = records.iter().map(|r| r.id().to_string()).collect();
    expected.sort();
    assert_eq!(ids, expected);
}

#[test]
fn test_collections_precede_requests_and_sort_by_timestamp() {
    let view = build_view(&mixed_flat_records());

    assert_eq!(
        top_level_ids(&view),
        vec!["c2", "c1", "c3", "r4", "r2", "r3", "r1"]
    );
    for pair in view.collections.windows(2) {
        assert!(pair[0].created_ts <= pair[1].created_ts);
    }
    for pair in view.requests.windows(2) {
        assert!(pair[0].created_ts <= pair[1].created_ts);
    }
}

#[test]
fn test_build_view_is_idempotent() {
    let mut records = mixed_flat_records();
    records.push(api("nested", Some("c1"), 1));
    records.push(collection("inner", Some("c3"), 0));
    records.push(api("deeper", Some("inner"), 3));

    let view = build_view(&records);
    let again = build_view(&records);
    let rebuilt = build_view(&view.flatten());

    assert_eq!(view, again);
    assert_eq!(view, rebuilt);
    assert_eq!(view.flatten().len(), records.len());
}

#[test]
fn test_sibling_collections_sorted_inside_parent() {
    let records = vec![
        collection("root", None, 0),
        collection("late", Some("root"), 9),
        api("req", Some("root"), 1),
        collection("early", Some("root"), 2),
    ];

    let view = build_view(&records);

    let children: Vec<&str> = view.collections[0]
        .children
        .iter()
        .map(|r| r.id())
        .collect();
    assert_eq!(children, vec!["early", "late", "req"]);
}

#[test]
fn test_view_follows_store_mutations() {
    let mut store = RecordStore::from_records(mixed_flat_records());

    store.remove_many(&["c1", "c2", "c3"]);
    store.upsert(collection("fresh", None, 100));

    let view = build_view(store.records());
    assert_eq!(view.collections.len(), 1);
    assert_eq!(view.collections[0].id, "fresh");
    assert_eq!(view.requests.len(), 4);
}
