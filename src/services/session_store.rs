//! Session store implementation

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::AppResult;
use crate::traits::SessionStore;
use crate::types::{SessionData, SessionId};

/// In-memory session store with sliding expiry.
#[derive(Clone)]
pub struct RealSessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, SessionData>>>,
    ttl: Duration,
}

impl RealSessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }
}

#[async_trait::async_trait]
impl SessionStore for RealSessionStore {
    async fn create(&self) -> AppResult<(SessionId, SessionData)> {
        let id = SessionId::new();
        let data = SessionData::new(self.ttl);

        let mut sessions = self.sessions.write().await;
        sessions.insert(id.clone(), data.clone());
        debug!(%id, "session created");
        Ok((id, data))
    }

    async fn load(&self, id: &SessionId) -> AppResult<Option<SessionData>> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(id) {
            Some(data) if data.is_expired() => {
                sessions.remove(id);
                Ok(None)
            }
            Some(data) => Ok(Some(data.clone())),
            None => Ok(None),
        }
    }

    async fn save(&self, id: &SessionId, mut data: SessionData) -> AppResult<()> {
        data.extend(self.ttl);
        let mut sessions = self.sessions.write().await;
        sessions.insert(id.clone(), data);
        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> AppResult<()> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(id);
        Ok(())
    }

    async fn cleanup_expired(&self) -> AppResult<usize> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, data| !data.is_expired());
        let removed = before - sessions.len();

        if removed > 0 {
            debug!(removed, "expired sessions swept");
        }
        Ok(removed)
    }

    async fn active_sessions(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }
}
