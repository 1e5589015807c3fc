//! In-memory RecordRepository implementation.
//!
//! Stands in for the remote document store in development and tests:
//! assigns UUIDs and millisecond timestamps the way the backend does, scopes
//! records by owner and workspace, and can be told to fail upcoming calls.

use async_trait::async_trait;
use reqbench_core::entry::Entry;
use reqbench_core::error::{ClientError, Result};
use reqbench_core::record::{
    ApiRecord, CollectionRecord, Record, RecordDraft, RecordRepository, RecordType,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, RwLock};

#[derive(Debug, Clone)]
struct StoredRecord {
    owner_id: String,
    workspace_id: Option<String>,
    record: Record,
}

#[derive(Default)]
pub struct InMemoryRecordRepository {
    records: RwLock<Vec<StoredRecord>>,
    failures: Mutex<VecDeque<ClientError>>,
    calls: AtomicUsize,
}

impl InMemoryRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record owned by `uid` in `workspace_id`.
    pub async fn seed(&self, uid: &str, workspace_id: Option<&str>, record: Record) {
        self.records.write().await.push(StoredRecord {
            owner_id: uid.to_string(),
            workspace_id: workspace_id.map(str::to_string),
            record,
        });
    }

    /// Makes the next call fail with `error`. Queued failures apply in order.
    pub async fn fail_next(&self, error: ClientError) {
        self.failures.lock().await.push_back(error);
    }

    /// Number of repository calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every stored record regardless of owner, in insertion order.
    pub async fn all_records(&self) -> Vec<Record> {
        self.records
            .read()
            .await
            .iter()
            .map(|s| s.record.clone())
            .collect()
    }

    async fn enter(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failures.lock().await.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn new_record(id: String, uid: &str, draft: RecordDraft, now: i64) -> Record {
    match draft.record_type {
        RecordType::Api => Record::Api(ApiRecord {
            id,
            name: draft.name.unwrap_or_else(|| "Untitled request".to_string()),
            collection_id: draft.parent.apply(None),
            owner_id: Some(uid.to_string()),
            created_ts: now,
            updated_ts: now,
            data: draft.data.unwrap_or_else(Entry::empty),
        }),
        RecordType::Collection => Record::Collection(CollectionRecord {
            id,
            name: draft
                .name
                .unwrap_or_else(|| "Untitled collection".to_string()),
            collection_id: draft.parent.apply(None),
            description: draft.description,
            owner_id: Some(uid.to_string()),
            created_ts: now,
            updated_ts: now,
            children: Vec::new(),
        }),
    }
}

fn apply_draft(record: &mut Record, draft: RecordDraft, now: i64) -> Result<()> {
    if record.record_type() != draft.record_type {
        return Err(ClientError::data_access(format!(
            "Record '{}' cannot change type",
            record.id()
        )));
    }

    match record {
        Record::Api(r) => {
            if let Some(name) = draft.name {
                r.name = name;
            }
            if let Some(data) = draft.data {
                r.data = data;
            }
            r.collection_id = draft.parent.apply(r.collection_id.take());
            r.updated_ts = now;
        }
        Record::Collection(r) => {
            if let Some(name) = draft.name {
                r.name = name;
            }
            if draft.description.is_some() {
                r.description = draft.description;
            }
            r.collection_id = draft.parent.apply(r.collection_id.take());
            r.updated_ts = now;
        }
    }
    Ok(())
}

#[async_trait]
impl RecordRepository for InMemoryRecordRepository {
    async fn fetch_record(&self, record_id: &str) -> Result<Record> {
        self.enter().await?;
        self.records
            .read()
            .await
            .iter()
            .find(|s| s.record.id() == record_id)
            .map(|s| s.record.clone())
            .ok_or_else(|| ClientError::not_found("Record", record_id))
    }

    async fn fetch_records(&self, uid: &str, workspace_id: Option<&str>) -> Result<Vec<Record>> {
        self.enter().await?;
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|s| match workspace_id {
                Some(ws) => s.workspace_id.as_deref() == Some(ws),
                None => s.workspace_id.is_none() && s.owner_id == uid,
            })
            .map(|s| s.record.clone())
            .collect())
    }

    async fn upsert_record(
        &self,
        uid: &str,
        draft: RecordDraft,
        workspace_id: Option<&str>,
    ) -> Result<Record> {
        self.enter().await?;
        let now = now_millis();
        let mut records = self.records.write().await;

        if let Some(id) = draft.id.clone() {
            if let Some(stored) = records.iter_mut().find(|s| s.record.id() == id) {
                apply_draft(&mut stored.record, draft, now)?;
                tracing::debug!(record_id = %id, "Updated record");
                return Ok(stored.record.clone());
            }
        }

        let id = draft
            .id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let record = new_record(id, uid, draft, now);
        tracing::debug!(record_id = record.id(), "Created record");
        records.push(StoredRecord {
            owner_id: uid.to_string(),
            workspace_id: workspace_id.map(str::to_string),
            record: record.clone(),
        });
        Ok(record)
    }

    async fn delete_records(&self, record_ids: &[String]) -> Result<()> {
        self.enter().await?;
        self.records
            .write()
            .await
            .retain(|s| !record_ids.iter().any(|id| id == s.record.id()));
        Ok(())
    }
}
