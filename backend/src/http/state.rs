//! Application state for the HTTP server.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::AnalyticsConfig;
use crate::io::Workbook;
use crate::services::DashboardSession;

/// Shared handle to one session; locked for the duration of a recomputation.
pub type SessionHandle = Arc<Mutex<DashboardSession>>;

/// In-memory dashboard sessions keyed by UUID.
///
/// Sessions never share data; dropping the server drops them all.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionHandle>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session for `workbook` and return its ID.
    pub fn create(&self, workbook: Workbook) -> String {
        let session_id = Uuid::new_v4().to_string();
        let session = Arc::new(Mutex::new(DashboardSession::new(workbook)));
        self.sessions.write().insert(session_id.clone(), session);
        session_id
    }

    pub fn get(&self, session_id: &str) -> Option<SessionHandle> {
        self.sessions.read().get(session_id).cloned()
    }

    /// Remove a session. Returns `false` if it did not exist.
    pub fn remove(&self, session_id: &str) -> bool {
        self.sessions.write().remove(session_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Defaults applied to every report; query parameters override per request
    pub config: Arc<AnalyticsConfig>,
}

impl AppState {
    /// Create a new application state with the given base configuration.
    pub fn new(config: AnalyticsConfig) -> Self {
        Self {
            sessions: SessionStore::new(),
            config: Arc::new(config),
        }
    }
}
