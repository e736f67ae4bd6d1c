//! In-memory letter-writing sessions.
//!
//! One session per open form. Sessions live in a moka cache and expire after
//! sitting idle for the configured time; nothing is persisted.

pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::letter::controller::LetterController;

pub type SharedController = Arc<Mutex<LetterController>>;

#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<Uuid, SharedController>,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration, capacity: u64) -> Self {
        let sessions = Cache::builder()
            .time_to_idle(idle_ttl)
            .max_capacity(capacity)
            .build();
        Self { sessions }
    }

    pub async fn create(&self) -> (Uuid, SharedController) {
        let id = Uuid::new_v4();
        let controller = Arc::new(Mutex::new(LetterController::new()));
        self.sessions.insert(id, controller.clone()).await;
        log::debug!("Session {} created", id);
        (id, controller)
    }

    pub async fn get(&self, id: &Uuid) -> Option<SharedController> {
        self.sessions.get(id).await
    }

    /// Returns whether the session existed.
    pub async fn remove(&self, id: &Uuid) -> bool {
        let removed = self.sessions.remove(id).await.is_some();
        if removed {
            log::debug!("Session {} removed", id);
        }
        removed
    }

    pub fn len(&self) -> u64 {
        self.sessions.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
