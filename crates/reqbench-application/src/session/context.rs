//! Session context for the API client.
//!
//! One `ApiClientSession` exists per authenticated identity. It loads that
//! identity's records, keeps the selection, history and modal state that the
//! presentation layer renders, and funnels every mutation through a single
//! `RwLock`. The lock is never held while the record repository is awaited.

use reqbench_core::entry::{Entry, Request};
use reqbench_core::error::{ClientError, Result};
use reqbench_core::hierarchy::{HierarchyView, ViewCache};
use reqbench_core::history::{HistoryLog, HistoryStore};
use reqbench_core::record::{
    ApiRecord, MutationStatus, PendingMutations, Record, RecordDraft, RecordRepository,
    RecordStore, RemovedRecord, Rollback,
};
use reqbench_core::session::{EntrySelection, Navigator, SelectionPhase, UserAuth};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Record id used by the presentation layer for an unsaved request.
pub const NEW_RECORD_ID: &str = "new";

/// Result of [`ApiClientSession::save_request`].
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// Nobody is logged in; nothing was sent.
    NotAuthenticated,
    Saved(ApiRecord),
    Failed(ClientError),
    /// A newer selection change happened while the save was in flight.
    Superseded,
}

/// Point-in-time copy of the session state for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub auth: UserAuth,
    pub workspace_id: Option<String>,
    pub records: Vec<Record>,
    pub is_loading_records: bool,
    pub is_loading: bool,
    pub selection_phase: SelectionPhase,
    pub selected_entry: Option<Entry>,
    pub selected_entry_details: Option<ApiRecord>,
    pub record_to_be_deleted: Option<Record>,
    pub is_delete_modal_open: bool,
    pub is_import_modal_open: bool,
    pub history_len: usize,
}

struct SessionState {
    auth: UserAuth,
    workspace_id: Option<String>,
    records: RecordStore,
    view_cache: ViewCache,
    history: HistoryLog,
    selection: EntrySelection,
    mutations: PendingMutations,
    /// Bumped by every bulk fetch, logout and dispose
    records_generation: u64,
    is_loading_records: bool,
    record_to_be_deleted: Option<Record>,
    is_delete_modal_open: bool,
    is_import_modal_open: bool,
    disposed: bool,
}

impl SessionState {
    fn new(history: HistoryLog) -> Self {
        Self {
            auth: UserAuth::anonymous(),
            workspace_id: None,
            records: RecordStore::new(),
            view_cache: ViewCache::new(),
            history,
            selection: EntrySelection::new(),
            mutations: PendingMutations::new(),
            records_generation: 0,
            is_loading_records: false,
            record_to_be_deleted: None,
            is_delete_modal_open: false,
            is_import_modal_open: false,
            disposed: false,
        }
    }

    fn require_uid(&self) -> Result<String> {
        self.auth
            .active_uid()
            .map(str::to_string)
            .ok_or(ClientError::NotAuthenticated)
    }

    /// Whether `uid` is still logged in on `workspace_id` in a live session.
    ///
    /// Results of repository calls started under another scope must not
    /// touch the store.
    fn in_scope(&self, uid: &str, workspace_id: &Option<String>) -> bool {
        !self.disposed
            && self.auth.active_uid() == Some(uid)
            && self.workspace_id == *workspace_id
    }

    fn apply_rollback(&mut self, rollback: Rollback) {
        match rollback {
            Rollback::Restore(previous) => {
                let removed = self.records.remove_many(&[previous.id()]);
                let index = removed
                    .first()
                    .map(|r| r.index)
                    .unwrap_or(self.records.len());
                self.records.restore(vec![RemovedRecord {
                    index,
                    record: previous,
                }]);
            }
            Rollback::Reinsert(removed) => self.records.restore(removed),
            Rollback::Nothing => {}
        }
    }
}

/// State and operations behind the API client screens.
pub struct ApiClientSession {
    repository: Arc<dyn RecordRepository>,
    navigator: Arc<dyn Navigator>,
    state: RwLock<SessionState>,
}

impl ApiClientSession {
    /// Creates a session with an empty history, without reading `history_store`.
    pub fn new(
        repository: Arc<dyn RecordRepository>,
        history_store: Arc<dyn HistoryStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            repository,
            navigator,
            state: RwLock::new(SessionState::new(HistoryLog::new(history_store))),
        }
    }

    /// Creates a session seeded with the persisted history.
    pub async fn open(
        repository: Arc<dyn RecordRepository>,
        history_store: Arc<dyn HistoryStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let history = HistoryLog::load(history_store).await;
        Self {
            repository,
            navigator,
            state: RwLock::new(SessionState::new(history)),
        }
    }

    // ============================================================================
    // Identity and bulk loading
    // ============================================================================

    /// Replaces the authenticated identity.
    ///
    /// A logged-out identity empties the in-memory records and discards any
    /// fetch still in flight. Persisted records are untouched.
    pub async fn set_auth(&self, auth: UserAuth) {
        let mut state = self.state.write().await;
        if !auth.logged_in {
            state.records_generation += 1;
            state.records.clear();
            state.is_loading_records = false;
        }
        state.auth = auth;
    }

    /// Switches the active workspace. Returns `true` if it changed.
    pub async fn set_workspace(&self, workspace_id: Option<String>) -> bool {
        let mut state = self.state.write().await;
        if state.workspace_id == workspace_id {
            return false;
        }
        state.workspace_id = workspace_id;
        true
    }

    pub async fn uid(&self) -> Option<String> {
        self.state.read().await.auth.active_uid().map(str::to_string)
    }

    /// Fetches every record of the current identity and workspace.
    ///
    /// Only the most recently started fetch is applied; a failure empties the
    /// store. Returns `true` if this call's result was applied.
    pub async fn load_records(&self) -> bool {
        let (uid, workspace_id, generation) = {
            let mut state = self.state.write().await;
            if state.disposed {
                return false;
            }
            let Some(uid) = state.auth.active_uid().map(str::to_string) else {
                state.records.clear();
                return false;
            };
            state.records_generation += 1;
            state.is_loading_records = true;
            (uid, state.workspace_id.clone(), state.records_generation)
        };

        let result = self
            .repository
            .fetch_records(&uid, workspace_id.as_deref())
            .await;

        let mut state = self.state.write().await;
        if state.records_generation != generation {
            tracing::debug!(generation, "Discarding stale record fetch");
            return false;
        }

        match result {
            Ok(records) => {
                tracing::debug!("Loaded {} records", records.len());
                state.records.replace_all(records);
            }
            Err(e) => {
                tracing::error!("Error loading api records: {}", e);
                state.records.clear();
            }
        }
        state.is_loading_records = false;
        true
    }

    /// Opens a persisted record in the editor.
    ///
    /// [`NEW_RECORD_ID`] is ignored. Otherwise the selected entry is cleared
    /// and the record's details fetched; a failed fetch leaves no details.
    pub async fn open_record(&self, record_id: &str) {
        if record_id == NEW_RECORD_ID {
            return;
        }

        let generation = {
            let mut state = self.state.write().await;
            if state.disposed {
                return;
            }
            state.selection.begin_loading(record_id)
        };

        let result = self.repository.fetch_record(record_id).await;
        if let Err(e) = &result {
            tracing::error!(record_id, "Error loading api record: {}", e);
        }

        let mut state = self.state.write().await;
        if !state.selection.complete_loading(generation, result) {
            tracing::debug!(record_id, "Discarding stale record details");
        }
    }

    // ============================================================================
    // In-memory record operations
    // ============================================================================

    pub async fn on_new_record(&self, record: Record) {
        self.state.write().await.records.insert(record);
    }

    pub async fn on_remove_record(&self, record_id: &str) {
        self.state.write().await.records.remove(record_id);
    }

    pub async fn on_update_record(&self, record: Record) {
        self.state.write().await.records.update(record);
    }

    /// Updates the record if its id is known, appends it otherwise.
    pub async fn on_save_record(&self, record: Record) {
        self.state.write().await.records.upsert(record);
    }

    pub async fn on_delete_records(&self, record_ids: &[String]) {
        self.state.write().await.records.remove_many(record_ids);
    }

    // ============================================================================
    // Persisted record operations
    // ============================================================================

    /// Persists a new record and adds the canonical copy to the store.
    pub async fn create_record(&self, draft: RecordDraft) -> Result<Record> {
        let (uid, workspace_id) = {
            let state = self.state.read().await;
            (state.require_uid()?, state.workspace_id.clone())
        };

        let record = self
            .repository
            .upsert_record(&uid, draft, workspace_id.as_deref())
            .await
            .map_err(|e| {
                tracing::error!("Error creating record: {}", e);
                e
            })?;

        let mut state = self.state.write().await;
        if state.in_scope(&uid, &workspace_id) {
            state.records.upsert(record.clone());
        } else {
            tracing::debug!(record_id = record.id(), "Scope changed, not adding created record");
        }
        Ok(record)
    }

    /// Applies `record` locally, then persists it.
    ///
    /// The record stays `Pending` until the backend answers. On success the
    /// canonical copy replaces the local one; on failure the previous copy is
    /// restored at its former position.
    pub async fn update_record(&self, record: Record) -> Result<Record> {
        let record_id = record.id().to_string();
        let (uid, workspace_id, draft, token) = {
            let mut state = self.state.write().await;
            let uid = state.require_uid()?;
            let previous = state
                .records
                .get(&record_id)
                .cloned()
                .ok_or_else(|| ClientError::not_found("Record", record_id.as_str()))?;

            state.records.update(record);
            let draft = match state.records.get(&record_id) {
                Some(merged) => RecordDraft::from_record(merged),
                None => return Err(ClientError::internal("updated record vanished")),
            };
            let token = state
                .mutations
                .begin(record_id.as_str(), Rollback::Restore(previous));
            (uid, state.workspace_id.clone(), draft, token)
        };

        let result = self
            .repository
            .upsert_record(&uid, draft, workspace_id.as_deref())
            .await;

        let mut state = self.state.write().await;
        if !state.in_scope(&uid, &workspace_id) {
            tracing::debug!(record_id = %record_id, "Scope changed, dropping update result");
            match &result {
                Ok(_) => {
                    state.mutations.commit(&record_id, token);
                }
                Err(e) => {
                    state.mutations.fail(&record_id, token, e.to_string());
                }
            }
            return result;
        }
        match result {
            Ok(canonical) => {
                if state.mutations.commit(&record_id, token) {
                    state.records.upsert(canonical.clone());
                } else {
                    tracing::debug!(record_id = %record_id, "Update superseded, keeping newer local state");
                }
                Ok(canonical)
            }
            Err(e) => {
                tracing::error!(record_id = %record_id, "Error updating record: {}", e);
                if let Some(rollback) = state.mutations.fail(&record_id, token, e.to_string()) {
                    state.apply_rollback(rollback);
                }
                Err(e)
            }
        }
    }

    /// Removes the records locally, then deletes them from the backend.
    ///
    /// On failure every removed record is put back where it was.
    pub async fn delete_records(&self, record_ids: &[String]) -> Result<()> {
        let (uid, workspace_id, tokens) = {
            let mut state = self.state.write().await;
            let uid = state.require_uid()?;
            let workspace_id = state.workspace_id.clone();
            let removed = state.records.remove_many(record_ids);
            let tokens = record_ids
                .iter()
                .map(|id| {
                    let own: Vec<RemovedRecord> = removed
                        .iter()
                        .filter(|r| r.record.id() == id)
                        .cloned()
                        .collect();
                    let token = state.mutations.begin(id.as_str(), Rollback::Reinsert(own));
                    (id.clone(), token)
                })
                .collect::<Vec<_>>();
            (uid, workspace_id, tokens)
        };

        let result = self.repository.delete_records(record_ids).await;

        let mut state = self.state.write().await;
        if !state.in_scope(&uid, &workspace_id) {
            tracing::debug!("Scope changed, dropping delete result");
            for (id, token) in &tokens {
                match &result {
                    Ok(()) => {
                        state.mutations.commit(id, *token);
                    }
                    Err(e) => {
                        state.mutations.fail(id, *token, e.to_string());
                    }
                }
            }
            return result;
        }
        match result {
            Ok(()) => {
                for (id, token) in &tokens {
                    state.mutations.commit(id, *token);
                }
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error deleting {} records: {}", record_ids.len(), e);
                let mut reinsert = Vec::new();
                for (id, token) in &tokens {
                    match state.mutations.fail(id, *token, e.to_string()) {
                        Some(Rollback::Reinsert(removed)) => reinsert.extend(removed),
                        Some(other) => state.apply_rollback(other),
                        None => {}
                    }
                }
                state.apply_rollback(Rollback::Reinsert(reinsert));
                Err(e)
            }
        }
    }

    pub async fn mutation_status(&self, record_id: &str) -> Option<MutationStatus> {
        self.state.read().await.mutations.status(record_id).cloned()
    }

    // ============================================================================
    // Delete confirmation
    // ============================================================================

    /// Stages the record the delete modal asks about.
    pub async fn update_record_to_be_deleted(&self, record: Option<Record>) {
        self.state.write().await.record_to_be_deleted = record;
    }

    pub async fn set_delete_modal_open(&self, open: bool) {
        self.state.write().await.is_delete_modal_open = open;
    }

    /// Closes the delete modal and clears the staged record.
    pub async fn on_delete_modal_close(&self) {
        let mut state = self.state.write().await;
        state.is_delete_modal_open = false;
        state.record_to_be_deleted = None;
    }

    // ============================================================================
    // History
    // ============================================================================

    pub async fn add_to_history(&self, entry: Entry) {
        self.state.write().await.history.append(entry).await;
    }

    pub async fn clear_history(&self) {
        self.state.write().await.history.clear().await;
        tracing::info!("History cleared");
    }

    pub async fn history(&self) -> Vec<Entry> {
        self.state.read().await.history.entries().to_vec()
    }

    /// Opens the history entry at `index` as an unsaved draft.
    ///
    /// # Errors
    ///
    /// `OutOfRange` if `index` is past the end; the selection is unchanged.
    pub async fn on_selection_from_history(&self, index: usize) -> Result<()> {
        let mut state = self.state.write().await;
        let entry = state.history.select_at(index)?.clone();
        state.selection.start_draft(entry);
        Ok(())
    }

    // ============================================================================
    // Saving and importing
    // ============================================================================

    /// Persists `entry` as an API record.
    ///
    /// Does nothing while logged out. When the selection is backed by a
    /// persisted record that record is updated in place, keeping its name
    /// and parent collection; otherwise a new one is created. A successful
    /// save lands in the store unless the identity or workspace changed in
    /// the meantime; the selection and redirect only follow if nothing newer
    /// was selected meanwhile.
    pub async fn save_request(&self, entry: Entry) -> SaveOutcome {
        let (uid, workspace_id, draft, generation) = {
            let mut state = self.state.write().await;
            let Some(uid) = state.auth.active_uid().map(str::to_string) else {
                tracing::debug!("Ignoring save while logged out");
                return SaveOutcome::NotAuthenticated;
            };
            let draft = match state.selection.details() {
                Some(details) => {
                    RecordDraft::from_record(&Record::Api(details.clone())).with_data(entry.clone())
                }
                None => RecordDraft::api(entry.clone()),
            };
            let generation = state.selection.begin_save(entry);
            (uid, state.workspace_id.clone(), draft, generation)
        };

        let result = match self
            .repository
            .upsert_record(&uid, draft, workspace_id.as_deref())
            .await
        {
            Ok(Record::Api(record)) => Ok(record),
            Ok(Record::Collection(c)) => Err(ClientError::data_access(format!(
                "Saved record '{}' is a collection",
                c.id
            ))),
            Err(e) => Err(e),
        };

        let mut state = self.state.write().await;
        if state.disposed {
            return SaveOutcome::Superseded;
        }
        if !state.in_scope(&uid, &workspace_id) {
            tracing::debug!("Scope changed, dropping save result");
            state.selection.complete_save(
                generation,
                Err(ClientError::internal("identity or workspace changed during save")),
            );
            return SaveOutcome::Superseded;
        }

        match result {
            Ok(record) => {
                state.records.upsert(Record::Api(record.clone()));
                if !state.selection.complete_save(generation, Ok(record.clone())) {
                    tracing::debug!(record_id = %record.id, "Save superseded, not redirecting");
                    return SaveOutcome::Superseded;
                }
                drop(state);
                self.navigator.redirect_to_record(&record.id);
                SaveOutcome::Saved(record)
            }
            Err(e) => {
                tracing::error!("Error saving request: {}", e);
                if state.selection.complete_save(generation, Err(e.clone())) {
                    SaveOutcome::Failed(e)
                } else {
                    SaveOutcome::Superseded
                }
            }
        }
    }

    /// Saves an imported request as a new record.
    ///
    /// The import modal is closed whatever the outcome.
    pub async fn handle_import_request(&self, request: Request) -> SaveOutcome {
        let entry = Entry::from_request(request);
        self.state
            .write()
            .await
            .selection
            .start_draft(entry.clone());

        let outcome = self.save_request(entry.clone()).await;

        let mut state = self.state.write().await;
        if outcome != SaveOutcome::Superseded {
            state.selection.set_entry(entry);
        }
        state.is_import_modal_open = false;
        outcome
    }

    pub async fn on_import_click(&self) {
        self.state.write().await.is_import_modal_open = true;
        tracing::info!("Import request clicked");
    }

    pub async fn on_import_request_modal_close(&self) {
        self.state.write().await.is_import_modal_open = false;
    }

    /// Opens an empty request; `source` names the control that was used.
    pub async fn on_new_click(&self, source: &str) {
        self.state
            .write()
            .await
            .selection
            .start_draft(Entry::empty());
        tracing::info!(source, "New request clicked");
    }

    // ============================================================================
    // Read side
    // ============================================================================

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read().await;
        let phase = state.selection.phase().clone();
        SessionSnapshot {
            auth: state.auth.clone(),
            workspace_id: state.workspace_id.clone(),
            records: state.records.records().to_vec(),
            is_loading_records: state.is_loading_records,
            is_loading: matches!(
                phase,
                SelectionPhase::LoadingDetails { .. } | SelectionPhase::Saving
            ),
            selection_phase: phase,
            selected_entry: state.selection.entry().cloned(),
            selected_entry_details: state.selection.details().cloned(),
            record_to_be_deleted: state.record_to_be_deleted.clone(),
            is_delete_modal_open: state.is_delete_modal_open,
            is_import_modal_open: state.is_import_modal_open,
            history_len: state.history.len(),
        }
    }

    /// The nested, sorted view of the records, rebuilt only after a change.
    pub async fn records_view(&self) -> Arc<HierarchyView> {
        let mut state = self.state.write().await;
        let SessionState {
            records,
            view_cache,
            ..
        } = &mut *state;
        view_cache.get_or_build(records)
    }

    pub async fn is_disposed(&self) -> bool {
        self.state.read().await.disposed
    }

    /// Drops in-memory records and selection and invalidates every operation
    /// still in flight.
    pub async fn dispose(&self) {
        let mut state = self.state.write().await;
        state.disposed = true;
        state.records_generation += 1;
        state.records.clear();
        state.view_cache.invalidate();
        state.selection.reset();
        state.mutations.clear();
        state.is_loading_records = false;
        state.record_to_be_deleted = None;
        state.is_delete_modal_open = false;
        state.is_import_modal_open = false;
        tracing::debug!("Session disposed");
    }
}
