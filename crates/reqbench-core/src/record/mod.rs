//! Record domain module.
//!
//! # Module Structure
//!
//! - `model`: `Record` tagged union (`ApiRecord`, `CollectionRecord`)
//! - `draft`: partial record sent to the persistence service
//! - `store`: ordered in-memory `RecordStore`
//! - `mutation`: pending/committed/failed tracking for optimistic changes
//! - `repository`: persistence service trait

mod draft;
mod model;
mod mutation;
mod repository;
mod store;

pub use draft::{ParentChange, RecordDraft};
pub use model::{ApiRecord, CollectionRecord, Record, RecordType};
pub use mutation::{MutationStatus, PendingMutations, Rollback};
pub use repository::RecordRepository;
pub use store::{RecordStore, RemovedRecord};
