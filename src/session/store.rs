//! In-process session store keyed by a random session id
//!
//! A session is only stored once a handler has something to keep in it, and
//! it is dropped after sitting unused for the idle timeout.

use crate::session::state::Session;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Cookie carrying the session id
pub const SESSION_COOKIE: &str = "tim_session";

struct Entry {
    session: Session,
    last_seen: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
    idle_timeout: Duration,
}

impl SessionStore {
    /// Create a store that drops sessions idle for longer than `idle_timeout` seconds
    pub fn new(idle_timeout: u64) -> Self {
        let seconds = i64::try_from(idle_timeout).unwrap_or(i64::MAX);
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout: Duration::try_seconds(seconds).unwrap_or(Duration::MAX),
        }
    }

    /// Snapshot of a live session, refreshing its idle clock
    pub async fn load(&self, id: Option<Uuid>) -> Option<(Uuid, Session)> {
        self.load_at(id?, Utc::now()).await
    }

    async fn load_at(&self, id: Uuid, now: DateTime<Utc>) -> Option<(Uuid, Session)> {
        let mut sessions = self.sessions.write().await;
        if self.is_idle(sessions.get(&id)?, now) {
            sessions.remove(&id);
            debug!("Session {} expired", id);
            return None;
        }
        let entry = sessions.get_mut(&id)?;
        entry.last_seen = now;
        Some((id, entry.session.clone()))
    }

    /// Store a new session under a fresh id
    pub async fn insert(&self, session: Session) -> Uuid {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let mut sessions = self.sessions.write().await;
        self.prune(&mut sessions, now);
        sessions.insert(
            id,
            Entry {
                session,
                last_seen: now,
            },
        );
        debug!("Started session {}", id);
        id
    }

    /// Write a session back after a handler has acted on it
    ///
    /// Ignored when the session was ended in the meantime.
    pub async fn save(&self, id: Uuid, session: Session) -> bool {
        self.update(id, |slot| *slot = session).await
    }

    /// Apply `f` to the stored session; returns false if it no longer exists
    pub async fn update(&self, id: Uuid, f: impl FnOnce(&mut Session)) -> bool {
        match self.sessions.write().await.get_mut(&id) {
            Some(entry) => {
                f(&mut entry.session);
                entry.last_seen = Utc::now();
                true
            }
            None => false,
        }
    }

    /// End a session; returns whether it existed
    pub async fn remove(&self, id: &Uuid) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            debug!("Ended session {}", id);
        }
        removed
    }

    /// Drop every session idle at `now`; returns how many went
    pub async fn prune_idle(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        self.prune(&mut sessions, now)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn prune(&self, sessions: &mut HashMap<Uuid, Entry>, now: DateTime<Utc>) -> usize {
        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_idle(entry, now));
        let pruned = before - sessions.len();
        if pruned > 0 {
            debug!("Pruned {} idle sessions", pruned);
        }
        pruned
    }

    fn is_idle(&self, entry: &Entry, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.last_seen) > self.idle_timeout
    }
}

/// Extract the session id from `Cookie` header values
pub fn session_id_from_cookies<'a>(cookies: impl IntoIterator<Item = &'a str>) -> Option<Uuid> {
    cookies
        .into_iter()
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
        .find_map(|value| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value for a session id
pub fn session_cookie(id: Uuid) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

/// `Set-Cookie` value that expires the session cookie
pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::state::SessionState;

    const HOUR: u64 = 3600;

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new(HOUR);
        let alice = store.insert(Session::new()).await;
        let bob = store.insert(Session::new()).await;
        assert_ne!(alice, bob);

        let (_, mut session_a) = store.load(Some(alice)).await.unwrap();
        session_a.set_credential("sk-alice");
        assert!(store.save(alice, session_a).await);

        let (_, session_a) = store.load(Some(alice)).await.unwrap();
        let (_, session_b) = store.load(Some(bob)).await.unwrap();
        assert_eq!(session_a.state(), SessionState::Ready);
        assert_eq!(session_b.state(), SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_unknown_or_missing_id_loads_nothing() {
        let store = SessionStore::new(HOUR);
        assert!(store.load(None).await.is_none());
        assert!(store.load(Some(Uuid::new_v4())).await.is_none());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_save_after_remove_is_ignored() {
        let store = SessionStore::new(HOUR);
        let id = store.insert(Session::new()).await;
        assert!(store.remove(&id).await);
        assert!(!store.save(id, Session::new()).await);
        assert_eq!(store.len().await, 0);
        assert!(!store.remove(&id).await);
    }

    #[tokio::test]
    async fn test_update_touches_only_the_given_fields() {
        let store = SessionStore::new(HOUR);
        let mut session = Session::new();
        session.set_credential("sk-test");
        session.input_text = "before".to_string();
        let id = store.insert(session).await;

        assert!(store.update(id, |s| s.fun_fact = Some("fact")).await);
        let (_, session) = store.load(Some(id)).await.unwrap();
        assert_eq!(session.fun_fact, Some("fact"));
        assert_eq!(session.input_text, "before");
        assert!(session.credential().is_some());
    }

    #[tokio::test]
    async fn test_idle_sessions_are_evicted() {
        let store = SessionStore::new(HOUR);
        let stale = store.insert(Session::new()).await;
        let later = Utc::now() + Duration::hours(2);

        assert!(store.load_at(stale, later).await.is_none());
        assert_eq!(store.len().await, 0);

        store.insert(Session::new()).await;
        store.insert(Session::new()).await;
        assert_eq!(store.prune_idle(Utc::now()).await, 0);
        assert_eq!(store.prune_idle(later).await, 2);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_active_session_survives_pruning() {
        let store = SessionStore::new(HOUR);
        let id = store.insert(Session::new()).await;
        let soon = Utc::now() + Duration::minutes(30);
        assert!(store.load_at(id, soon).await.is_some());

        // Idle clock restarted at `soon`.
        assert_eq!(store.prune_idle(soon + Duration::minutes(45)).await, 0);
        assert_eq!(store.len().await, 1);
    }

    #[test]
    fn test_cookie_parsing() {
        let id = Uuid::new_v4();
        let header = format!("theme=dark; {SESSION_COOKIE}={id}; other=1");
        assert_eq!(session_id_from_cookies([header.as_str()]), Some(id));
        assert_eq!(session_id_from_cookies(["tim_session=garbage"]), None);
        assert_eq!(session_id_from_cookies(["tim_session_old=1"]), None);
        assert!(session_cookie(id).starts_with(&format!("{SESSION_COOKIE}={id};")));
    }
}
