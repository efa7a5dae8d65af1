//! In-memory session store.
//!
//! Maps a session id to its [`SessionContext`]. Sessions are created on first contact, touched on
//! every load/save, and discarded explicitly with [`SessionStore::end`] or after sitting idle
//! past the configured lifetime ([`SessionStore::purge_idle`]).

use crate::ledger::SessionContext;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

/// Opaque session identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an id presented by a client; `None` if it is not a UUID.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

#[derive(Debug, Clone)]
struct StoredSession {
    context: SessionContext,
    last_seen: DateTime<Utc>,
}

/// Shared, cloneable handle to the session map.
#[derive(Clone, Debug, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, StoredSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new empty session and returns its id.
    pub fn create(&self, now: DateTime<Utc>) -> SessionId {
        let id = SessionId::generate();
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                id,
                StoredSession {
                    context: SessionContext::new(),
                    last_seen: now,
                },
            );
        id
    }

    /// Whether `id` names a live session.
    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&id)
    }

    /// Returns the session's context, or an empty one if the session is unknown.
    pub fn load(&self, id: SessionId, now: DateTime<Utc>) -> SessionContext {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        match sessions.get_mut(&id) {
            Some(stored) => {
                stored.last_seen = now;
                stored.context.clone()
            }
            None => SessionContext::new(),
        }
    }

    /// Stores `context` for `id`, creating the session if needed.
    pub fn save(&self, id: SessionId, context: SessionContext, now: DateTime<Utc>) {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                id,
                StoredSession {
                    context,
                    last_seen: now,
                },
            );
    }

    /// Discards a session. Returns whether it existed.
    pub fn end(&self, id: SessionId) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some()
    }

    /// Drops every session not seen within `max_idle` of `now`. Returns how many were dropped.
    pub fn purge_idle(&self, now: DateTime<Utc>, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, stored| now - stored.last_seen <= max_idle);
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
