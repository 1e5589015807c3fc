//! Record domain model.
//!
//! Records are stored flat: each one optionally references its parent
//! collection through `collection_id`. Nesting is reconstructed by the
//! hierarchy builder and lives only in `CollectionRecord::children`.

use crate::entry::Entry;
use serde::{Deserialize, Serialize};

/// Discriminant of a [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Api,
    Collection,
}

/// A named grouping node that can parent other records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionRecord {
    /// Unique record identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Parent collection ID, `None` for root-level collections
    #[serde(default)]
    pub collection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    /// Creation time (milliseconds since the Unix epoch)
    pub created_ts: i64,
    /// Last update time (milliseconds since the Unix epoch)
    #[serde(default)]
    pub updated_ts: i64,
    /// Nested records, filled in by the hierarchy builder only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Record>,
}

/// A persisted API request definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRecord {
    /// Unique record identifier
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Parent collection ID, `None` for root-level requests
    #[serde(default)]
    pub collection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    /// Creation time (milliseconds since the Unix epoch)
    pub created_ts: i64,
    /// Last update time (milliseconds since the Unix epoch)
    #[serde(default)]
    pub updated_ts: i64,
    /// The request/response payload
    pub data: Entry,
}

/// A stored entity: either a collection or an API request definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Record {
    Api(ApiRecord),
    Collection(CollectionRecord),
}

impl Record {
    pub fn id(&self) -> &str {
        match self {
            Record::Api(r) => &r.id,
            Record::Collection(r) => &r.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Record::Api(r) => &r.name,
            Record::Collection(r) => &r.name,
        }
    }

    /// The parent collection ID, if any.
    pub fn parent_id(&self) -> Option<&str> {
        match self {
            Record::Api(r) => r.collection_id.as_deref(),
            Record::Collection(r) => r.collection_id.as_deref(),
        }
    }

    pub fn created_ts(&self) -> i64 {
        match self {
            Record::Api(r) => r.created_ts,
            Record::Collection(r) => r.created_ts,
        }
    }

    pub fn record_type(&self) -> RecordType {
        match self {
            Record::Api(_) => RecordType::Api,
            Record::Collection(_) => RecordType::Collection,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Record::Collection(_))
    }

    pub fn is_api(&self) -> bool {
        matches!(self, Record::Api(_))
    }

    pub fn as_collection(&self) -> Option<&CollectionRecord> {
        match self {
            Record::Collection(r) => Some(r),
            Record::Api(_) => None,
        }
    }

    pub fn as_api(&self) -> Option<&ApiRecord> {
        match self {
            Record::Api(r) => Some(r),
            Record::Collection(_) => None,
        }
    }

    /// Shallow-merges `incoming` into `self`.
    ///
    /// Same variant: incoming fields win, except that absent optional
    /// metadata, a zero `created_ts` and an empty `children` list keep the
    /// stored values. Different variant: `self` is replaced.
    pub fn merge(&mut self, incoming: Record) {
        match (self, incoming) {
            (Record::Api(current), Record::Api(incoming)) => {
                let owner_id = incoming.owner_id.or_else(|| current.owner_id.take());
                let created_ts = if incoming.created_ts == 0 {
                    current.created_ts
                } else {
                    incoming.created_ts
                };
                *current = ApiRecord {
                    owner_id,
                    created_ts,
                    ..incoming
                };
            }
            (Record::Collection(current), Record::Collection(incoming)) => {
                let owner_id = incoming.owner_id.or_else(|| current.owner_id.take());
                let description = incoming.description.or_else(|| current.description.take());
                let created_ts = if incoming.created_ts == 0 {
                    current.created_ts
                } else {
                    incoming.created_ts
                };
                let children = if incoming.children.is_empty() {
                    std::mem::take(&mut current.children)
                } else {
                    incoming.children
                };
                *current = CollectionRecord {
                    owner_id,
                    description,
                    created_ts,
                    children,
                    ..incoming
                };
            }
            (current, incoming) => *current = incoming,
        }
    }

    /// Returns a copy without nested children.
    pub fn without_children(&self) -> Record {
        match self {
            Record::Collection(c) if !c.children.is_empty() => Record::Collection(CollectionRecord {
                children: Vec::new(),
                ..c.clone()
            }),
            other => other.clone(),
        }
    }
}

impl From<ApiRecord> for Record {
    fn from(record: ApiRecord) -> Self {
        Record::Api(record)
    }
}

impl From<CollectionRecord> for Record {
    fn from(record: CollectionRecord) -> Self {
        Record::Collection(record)
    }
}
