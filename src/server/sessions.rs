use crate::{
    Error, Result,
    controller::{NotificationLog, RequestController},
    flow::GenerationFlow,
};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// A browser tab's worth of state: one controller and its notifications.
pub struct Session {
    pub controller: Arc<RequestController>,
    pub notifications: Arc<NotificationLog>,
}

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, flow: GenerationFlow) -> (Uuid, Arc<Session>) {
        let notifications = Arc::new(NotificationLog::default());
        let session = Arc::new(Session {
            controller: Arc::new(RequestController::new(flow, notifications.clone())),
            notifications,
        });
        let id = Uuid::new_v4();

        self.sessions.write().await.insert(id, session.clone());
        info!("Created session {}", id);
        (id, session)
    }

    pub async fn get(&self, session_id: &str) -> Result<Arc<Session>> {
        let id = parse_id(session_id)?;

        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(session_id))
    }

    /// Drops the session together with its selected image. A generation
    /// still running for it finishes against the detached controller.
    pub async fn remove(&self, session_id: &str) -> Result<()> {
        let id = parse_id(session_id)?;

        self.sessions
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| not_found(session_id))?;
        info!("Removed session {}", id);
        Ok(())
    }
}

fn not_found(session_id: &str) -> Error {
    Error::SessionNotFound {
        session_id: session_id.to_string(),
    }
}

fn parse_id(session_id: &str) -> Result<Uuid> {
    Uuid::parse_str(session_id).map_err(|_| not_found(session_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ModelClient, ModelReply, ModelRequest};
    use async_trait::async_trait;

    struct UnusedModel;

    #[async_trait]
    impl ModelClient for UnusedModel {
        async fn generate(&self, _request: ModelRequest) -> Result<ModelReply> {
            Err(Error::model_unavailable("not used"))
        }
    }

    #[tokio::test]
    async fn test_removed_session_is_gone() {
        let store = SessionStore::new();
        let (id, _) = store
            .create(GenerationFlow::new(Arc::new(UnusedModel)))
            .await;
        let id = id.to_string();

        assert!(store.get(&id).await.is_ok());
        store.remove(&id).await.unwrap();

        assert!(matches!(
            store.get(&id).await,
            Err(Error::SessionNotFound { .. })
        ));
        assert!(matches!(
            store.remove(&id).await,
            Err(Error::SessionNotFound { .. })
        ));
        assert!(store.remove("not-a-uuid").await.is_err());
    }
}
