use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::modules::session::model::{Session, TranscriptEntry};

/// In-memory sessions. A session lives until it is deleted, goes idle past
/// the sweep window (see [`SessionStore::remove_idle_since`]), or the process
/// exits. Nothing is persisted, so a restart drops every transcript.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Session {
        let session = Session::new();
        self.sessions.write().await.insert(session.id, session.clone());
        session
    }

    pub async fn find_by_id(&self, id: &Uuid) -> Option<Session> {
        self.sessions.read().await.get(id).cloned()
    }

    pub async fn exists(&self, id: &Uuid) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    /// Newest activity first.
    pub async fn find_all(&self, limit: usize) -> Vec<Session> {
        let mut sessions: Vec<Session> = self.sessions.read().await.values().cloned().collect();
        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        sessions.truncate(limit);
        sessions
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns `None` when the session no longer exists.
    pub async fn record_exchange(
        &self,
        id: &Uuid,
        prompt: String,
        reply: String,
    ) -> Option<(TranscriptEntry, TranscriptEntry)> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id)?;
        Some(session.record_exchange(prompt, reply))
    }

    pub async fn delete(&self, id: &Uuid) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Drops every session whose last activity is older than `cutoff` and
    /// returns how many were removed.
    pub async fn remove_idle_since(&self, cutoff: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.updated_at >= cutoff);
        before - sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_find_delete() {
        let store = SessionStore::new();
        let session = store.create().await;

        assert!(store.exists(&session.id).await);
        assert_eq!(store.count().await, 1);

        assert!(store.delete(&session.id).await);
        assert!(!store.delete(&session.id).await);
        assert!(store.find_by_id(&session.id).await.is_none());
    }

    #[tokio::test]
    async fn test_record_exchange_on_missing_session() {
        let store = SessionStore::new();
        let result = store
            .record_exchange(&Uuid::new_v4(), "a".to_string(), "b".to_string())
            .await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_find_all_orders_by_activity() {
        let store = SessionStore::new();
        let first = store.create().await;
        let second = store.create().await;

        store
            .record_exchange(&first.id, "Olá".to_string(), "Oi!".to_string())
            .await
            .unwrap();

        let sessions = store.find_all(10).await;
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, first.id);
        assert_eq!(sessions[1].id, second.id);
        assert_eq!(store.find_all(1).await.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_idle_since_keeps_recent_activity() {
        let store = SessionStore::new();
        let idle = store.create().await;
        let active = store.create().await;

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let cutoff = Utc::now();
        store
            .record_exchange(&active.id, "Olá".to_string(), "Oi!".to_string())
            .await
            .unwrap();

        assert_eq!(store.remove_idle_since(cutoff).await, 1);
        assert!(!store.exists(&idle.id).await);
        assert!(store.exists(&active.id).await);
        assert_eq!(store.remove_idle_since(cutoff).await, 0);
    }
}
