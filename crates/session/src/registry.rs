use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use grocer_core::{Clock, DomainResult, SessionId, SystemClock};

use crate::config::TrackerConfig;
use crate::context::GrocerySession;
use crate::error::SessionError;

/// Session-keyed store of isolated grocery sessions.
///
/// Sessions never share state. Each one sits behind its own mutex, so calls on
/// different sessions do not block each other beyond the map lookup.
pub struct SessionRegistry {
    config: TrackerConfig,
    clock: Arc<dyn Clock>,
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<GrocerySession>>>>,
}

impl core::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("config", &self.config)
            .field("sessions", &self.len())
            .finish_non_exhaustive()
    }
}

impl SessionRegistry {
    pub fn new(config: TrackerConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: TrackerConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a fresh session and return its key.
    pub fn open(&self) -> Result<SessionId, SessionError> {
        let id = SessionId::new();
        self.open_with_id(id)?;
        Ok(id)
    }

    /// Make sure a session exists under `id` (existing sessions are kept).
    pub fn open_with_id(&self, id: SessionId) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().map_err(|_| SessionError::Poisoned)?;
        sessions.entry(id).or_insert_with(|| {
            tracing::info!(session = %id, "session opened");
            Arc::new(Mutex::new(GrocerySession::with_clock(
                id,
                self.config.clone(),
                self.clock.clone(),
            )))
        });
        Ok(())
    }

    /// Run `f` against one session with exclusive access.
    pub fn with_session<R>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut GrocerySession) -> R,
    ) -> Result<R, SessionError> {
        let session = {
            let sessions = self.sessions.read().map_err(|_| SessionError::Poisoned)?;
            sessions
                .get(&id)
                .cloned()
                .ok_or(SessionError::UnknownSession(id))?
        };
        let mut guard = session.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(f(&mut *guard))
    }

    /// [`SessionRegistry::with_session`] for fallible operations.
    pub fn try_with_session<R>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut GrocerySession) -> DomainResult<R>,
    ) -> Result<R, SessionError> {
        Ok(self.with_session(id, f)??)
    }

    /// Drop a session. Returns whether it existed.
    pub fn close(&self, id: SessionId) -> Result<bool, SessionError> {
        let mut sessions = self.sessions.write().map_err(|_| SessionError::Poisoned)?;
        let existed = sessions.remove(&id).is_some();
        if existed {
            tracing::info!(session = %id, "session closed");
        }
        Ok(existed)
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions
            .read()
            .map(|sessions| sessions.contains_key(&id))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
