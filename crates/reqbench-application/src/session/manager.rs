use super::context::ApiClientSession;
use reqbench_core::history::HistoryStore;
use reqbench_core::record::RecordRepository;
use reqbench_core::session::{Navigator, UserAuth};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Owns the session of the current identity.
///
/// `SessionManager` is responsible for:
/// - Creating a session when someone logs in
/// - Keeping it while the same identity stays logged in
/// - Disposing it on logout or when a different identity logs in
/// - Reloading records when the workspace changes
pub struct SessionManager {
    current: RwLock<Option<Arc<ApiClientSession>>>,
    repository: Arc<dyn RecordRepository>,
    history_store: Arc<dyn HistoryStore>,
    navigator: Arc<dyn Navigator>,
}

impl SessionManager {
    pub fn new(
        repository: Arc<dyn RecordRepository>,
        history_store: Arc<dyn HistoryStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            current: RwLock::new(None),
            repository,
            history_store,
            navigator,
        }
    }

    /// Reacts to a change of the authenticated identity.
    ///
    /// # Returns
    ///
    /// The session for `auth`, or `None` when logged out.
    pub async fn on_auth_changed(
        &self,
        auth: UserAuth,
        workspace_id: Option<String>,
    ) -> Option<Arc<ApiClientSession>> {
        let mut current = self.current.write().await;

        let Some(uid) = auth.active_uid().map(str::to_string) else {
            if let Some(session) = current.take() {
                session.dispose().await;
                tracing::info!("Logged out, session disposed");
            }
            return None;
        };

        if let Some(session) = current.as_ref() {
            if session.uid().await.as_deref() == Some(uid.as_str()) {
                let session = session.clone();
                drop(current);
                if session.set_workspace(workspace_id).await {
                    session.load_records().await;
                }
                return Some(session);
            }
        }

        if let Some(previous) = current.take() {
            previous.dispose().await;
            tracing::debug!("Identity changed, previous session disposed");
        }

        let session = Arc::new(
            ApiClientSession::open(
                self.repository.clone(),
                self.history_store.clone(),
                self.navigator.clone(),
            )
            .await,
        );
        session.set_auth(auth).await;
        session.set_workspace(workspace_id).await;
        *current = Some(session.clone());
        drop(current);

        tracing::info!(uid = %uid, "Session created");
        session.load_records().await;
        Some(session)
    }

    /// Switches the workspace of the current session and reloads its records.
    pub async fn on_workspace_changed(&self, workspace_id: Option<String>) {
        if let Some(session) = self.current().await {
            if session.set_workspace(workspace_id).await {
                session.load_records().await;
            }
        }
    }

    pub async fn current(&self) -> Option<Arc<ApiClientSession>> {
        self.current.read().await.clone()
    }

    pub async fn dispose(&self) {
        if let Some(session) = self.current.write().await.take() {
            session.dispose().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reqbench_core::entry::Entry;
    use reqbench_core::error::Result;
    use reqbench_core::record::{CollectionRecord, Record, RecordDraft};
    use reqbench_core::session::NoopNavigator;
    use std::sync::Mutex;

    // Mock RecordRepository that returns one collection per fetched workspace
    #[derive(Default)]
    struct MockRecordRepository {
        fetches: Mutex<Vec<(String, Option<String>)>>,
    }

    #[async_trait]
    impl RecordRepository for MockRecordRepository {
        async fn fetch_record(&self, record_id: &str) -> Result<Record> {
            Err(reqbench_core::ClientError::not_found("Record", record_id))
        }

        async fn fetch_records(&self, uid: &str, workspace_id: Option<&str>) -> Result<Vec<Record>> {
            self.fetches
                .lock()
                .unwrap()
                .push((uid.to_string(), workspace_id.map(str::to_string)));
            Ok(vec![Record::Collection(CollectionRecord {
                id: format!("{}-{}", uid, workspace_id.unwrap_or("private")),
                name: "folder".to_string(),
                collection_id: None,
                description: None,
                owner_id: Some(uid.to_string()),
                created_ts: 1,
                updated_ts: 1,
                children: Vec::new(),
            })])
        }

        async fn upsert_record(
            &self,
            _uid: &str,
            _draft: RecordDraft,
            _workspace_id: Option<&str>,
        ) -> Result<Record> {
            Err(reqbench_core::ClientError::network("read-only"))
        }

        async fn delete_records(&self, _record_ids: &[String]) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockHistoryStore;

    #[async_trait]
    impl HistoryStore for MockHistoryStore {
        async fn append_history(&self, _entry: &Entry) -> Result<()> {
            Ok(())
        }

        async fn clear_history(&self) -> Result<()> {
            Ok(())
        }

        async fn read_history(&self) -> Result<Vec<Entry>> {
            Ok(vec![Entry::empty()])
        }
    }

    fn manager(repository: Arc<MockRecordRepository>) -> SessionManager {
        SessionManager::new(repository, Arc::new(MockHistoryStore), Arc::new(NoopNavigator))
    }

    #[tokio::test]
    async fn test_login_creates_and_loads_session() {
        let repository = Arc::new(MockRecordRepository::default());
        let manager = manager(repository.clone());

        let session = manager
            .on_auth_changed(UserAuth::signed_in("u1"), None)
            .await
            .unwrap();

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.records.len(), 1);
        assert_eq!(snapshot.records[0].id(), "u1-private");
        assert_eq!(snapshot.history_len, 1);
    }

    #[tokio::test]
    async fn test_same_identity_keeps_session() {
        let repository = Arc::new(MockRecordRepository::default());
        let manager = manager(repository.clone());

        let first = manager
            .on_auth_changed(UserAuth::signed_in("u1"), None)
            .await
            .unwrap();
        let second = manager
            .on_auth_changed(UserAuth::signed_in("u1"), None)
            .await
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(repository.fetches.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_identity_change_disposes_previous() {
        let manager = manager(Arc::new(MockRecordRepository::default()));

        let first = manager
            .on_auth_changed(UserAuth::signed_in("u1"), None)
            .await
            .unwrap();
        let second = manager
            .on_auth_changed(UserAuth::signed_in("u2"), None)
            .await
            .unwrap();

        assert!(first.is_disposed().await);
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.uid().await.as_deref(), Some("u2"));
    }

    #[tokio::test]
    async fn test_logout_disposes_session() {
        let manager = manager(Arc::new(MockRecordRepository::default()));
        let session = manager
            .on_auth_changed(UserAuth::signed_in("u1"), None)
            .await
            .unwrap();

        let after = manager.on_auth_changed(UserAuth::anonymous(), None).await;

        assert!(after.is_none());
        assert!(manager.current().await.is_none());
        assert!(session.is_disposed().await);
        assert!(session.snapshot().await.records.is_empty());
    }

    #[tokio::test]
    async fn test_workspace_change_reloads_records() {
        let repository = Arc::new(MockRecordRepository::default());
        let manager = manager(repository.clone());
        let session = manager
            .on_auth_changed(UserAuth::signed_in("u1"), None)
            .await
            .unwrap();

        manager.on_workspace_changed(Some("team".to_string())).await;
        manager.on_workspace_changed(Some("team".to_string())).await;

        assert_eq!(session.snapshot().await.records[0].id(), "u1-team");
        assert_eq!(repository.fetches.lock().unwrap().len(), 2);
    }
}
