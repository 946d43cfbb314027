//! Session storage.
//!
//! The store is the single source of truth for live sessions. Reads hand out
//! copies; writes either replace wholesale ([`SessionStore::update`]) or go
//! through [`SessionStore::compare_and_swap`], which rejects a write based on
//! a stale revision.

use crate::session::{GameSession, SessionId};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("session {0} not found")]
    NotFound(SessionId),
    #[error("session {id} changed concurrently (expected revision {expected}, found {found})")]
    Conflict { id: SessionId, expected: u64, found: u64 },
}

/// Keyed storage for game sessions.
pub trait SessionStore: Send + Sync {
    /// Insert under `session.id`, silently replacing any existing session.
    fn create(&self, session: GameSession);

    /// A copy of the stored session, or `None` if the id is unknown.
    fn get(&self, id: &SessionId) -> Option<GameSession>;

    /// Replace the stored value outright. Last write wins.
    fn update(&self, id: &SessionId, session: GameSession);

    /// Store `session` only if the stored revision still equals `expected`.
    /// Returns the new revision.
    fn compare_and_swap(&self, id: &SessionId, expected: u64, session: GameSession) -> Result<u64, StoreError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local store backed by a concurrent hash map.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<SessionId, GameSession>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(&self, session: GameSession) {
        debug!(session = %session.id, "Creating session");
        self.sessions.insert(session.id.clone(), session);
    }

    fn get(&self, id: &SessionId) -> Option<GameSession> {
        let found = self.sessions.get(id).map(|s| s.value().clone());
        debug!(session = %id, found = found.is_some(), "Loading session");
        found
    }

    fn update(&self, id: &SessionId, mut session: GameSession) {
        match self.sessions.entry(id.clone()) {
            Entry::Occupied(mut slot) => {
                session.revision = slot.get().revision + 1;
                debug!(session = %id, revision = session.revision, "Replacing session");
                slot.insert(session);
            }
            Entry::Vacant(slot) => {
                debug!(session = %id, "Replacing missing session");
                slot.insert(session);
            }
        }
    }

    fn compare_and_swap(&self, id: &SessionId, expected: u64, mut session: GameSession) -> Result<u64, StoreError> {
        let mut slot = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let found = slot.revision;
        if found != expected {
            debug!(session = %id, expected, found, "Revision conflict");
            return Err(StoreError::Conflict {
                id: id.clone(),
                expected,
                found,
            });
        }

        session.revision = expected + 1;
        *slot = session;
        debug!(session = %id, revision = expected + 1, "Session committed");
        Ok(expected + 1)
    }

    fn len(&self) -> usize {
        self.sessions.len()
    }
}
