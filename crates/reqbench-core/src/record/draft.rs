//! Partial record sent to the persistence service.

use super::model::{Record, RecordType};
use crate::entry::Entry;
use serde::{Deserialize, Serialize};

/// How an upsert treats the parent collection of a record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "action", content = "collection_id", rename_all = "snake_case")]
pub enum ParentChange {
    /// Leave the stored parent untouched; a new record lands at the root
    #[default]
    Keep,
    /// Move under this collection
    Set(String),
    /// Move to the root level
    Clear,
}

impl ParentChange {
    /// `Set` for `Some`, `Clear` for `None`.
    pub fn from_parent(parent_id: Option<String>) -> Self {
        match parent_id {
            Some(id) => Self::Set(id),
            None => Self::Clear,
        }
    }

    /// The parent id after applying this change to `current`.
    pub fn apply(self, current: Option<String>) -> Option<String> {
        match self {
            Self::Keep => current,
            Self::Set(id) => Some(id),
            Self::Clear => None,
        }
    }
}

/// A partial record for create-or-update calls.
///
/// `id == None` asks the backend to create a new record and assign an ID.
/// The backend answers with the canonical stored [`Record`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub parent: ParentChange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Entry>,
}

impl RecordDraft {
    /// Draft of an API record carrying `entry`.
    pub fn api(entry: Entry) -> Self {
        Self {
            id: None,
            record_type: RecordType::Api,
            name: None,
            parent: ParentChange::Keep,
            description: None,
            data: Some(entry),
        }
    }

    /// Draft of a new collection.
    pub fn collection(name: impl Into<String>, parent_id: Option<String>) -> Self {
        Self {
            id: None,
            record_type: RecordType::Collection,
            name: Some(name.into()),
            parent: ParentChange::from_parent(parent_id),
            description: None,
            data: None,
        }
    }

    /// Full draft of an existing record, used to persist local edits.
    pub fn from_record(record: &Record) -> Self {
        match record {
            Record::Api(r) => Self {
                id: Some(r.id.clone()),
                record_type: RecordType::Api,
                name: Some(r.name.clone()),
                parent: ParentChange::from_parent(r.collection_id.clone()),
                description: None,
                data: Some(r.data.clone()),
            },
            Record::Collection(r) => Self {
                id: Some(r.id.clone()),
                record_type: RecordType::Collection,
                name: Some(r.name.clone()),
                parent: ParentChange::from_parent(r.collection_id.clone()),
                description: r.description.clone(),
                data: None,
            },
        }
    }

    pub fn with_id(mut self, id: Option<String>) -> Self {
        self.id = id;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_parent(mut self, parent_id: Option<String>) -> Self {
        self.parent = ParentChange::from_parent(parent_id);
        self
    }

    pub fn with_data(mut self, entry: Entry) -> Self {
        self.data = Some(entry);
        self
    }
}
