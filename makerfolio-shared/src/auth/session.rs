/// Server-side sessions bound to one authenticated creator
///
/// A session is an opaque, unguessable token mapped to a snapshot of the
/// creator's public profile. The mapping lives behind the [`SessionStore`]
/// trait so it can be backed by any keyed storage; the default backend is
/// process-local and lock-guarded.
///
/// State machine per session: created on login/register, resolvable until it
/// is destroyed (logout) or its expiry passes. `get` never hands back an
/// expired session.
///
/// # Example
///
/// ```
/// use makerfolio_shared::auth::session::{InMemorySessionStore, SessionIdentity, SessionStore};
/// use std::time::Duration;
/// use uuid::Uuid;
///
/// # async fn example() {
/// let store = InMemorySessionStore::new();
/// let identity = SessionIdentity {
///     id: Uuid::new_v4(),
///     email: "maker@example.com".into(),
///     username: "maker".into(),
///     name: "Maker".into(),
/// };
///
/// let session = store.create(identity, Duration::from_secs(86400)).await;
/// assert!(store.get(&session.token).await.is_some());
///
/// store.destroy(&session.token).await;
/// assert!(store.get(&session.token).await.is_none());
/// # }
/// ```

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Public profile subset carried by a session
///
/// This is the shape returned by login, register, and `/api/auth/me`. It never
/// includes the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    /// Creator id the session is bound to
    pub id: Uuid,

    /// Email at login time
    pub email: String,

    /// Username at login time
    pub username: String,

    /// Display name at login time
    pub name: String,
}

/// A live session record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque token, normally carried in a cookie
    pub token: String,

    /// Identity the session resolves to
    pub identity: SessionIdentity,

    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// When the session stops resolving
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session has passed its expiry
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Generates a fresh session token
///
/// 32 bytes from the OS RNG, hex-encoded (256 bits of entropy).
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Keyed session storage
///
/// Implementations must treat `destroy` as idempotent: destroying a missing
/// or already-destroyed token is not an error.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Creates a session for `identity` valid for `ttl`
    async fn create(&self, identity: SessionIdentity, ttl: Duration) -> Session;

    /// Resolves a token to its session, if present and not expired
    async fn get(&self, token: &str) -> Option<Session>;

    /// Removes a session; missing tokens are ignored
    async fn destroy(&self, token: &str);

    /// Extends a session's expiry by `ttl` from now
    ///
    /// Returns false if the token does not resolve to a live session.
    async fn touch(&self, token: &str, ttl: Duration) -> bool;
}

/// Process-local session store
///
/// Expired entries are purged lazily on lookup.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions currently held, including not-yet-purged expired ones
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

fn expiry_from_ttl(ttl: Duration) -> DateTime<Utc> {
    let ttl = ChronoDuration::from_std(ttl).unwrap_or_else(|_| ChronoDuration::hours(24));
    Utc::now() + ttl
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, identity: SessionIdentity, ttl: Duration) -> Session {
        let now = Utc::now();
        let session = Session {
            token: generate_token(),
            identity,
            created_at: now,
            expires_at: expiry_from_ttl(ttl),
        };

        let mut sessions = self.sessions.write().await;
        sessions.insert(session.token.clone(), session.clone());

        tracing::debug!(creator_id = %session.identity.id, "Session created");
        session
    }

    async fn get(&self, token: &str) -> Option<Session> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                Some(session) if !session.is_expired() => return Some(session.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Expired: drop the entry under a write lock
        let mut sessions = self.sessions.write().await;
        if sessions.get(token).map(Session::is_expired) == Some(true) {
            sessions.remove(token);
        }
        None
    }

    async fn destroy(&self, token: &str) {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(token).is_some() {
            tracing::debug!("Session destroyed");
        }
    }

    async fn touch(&self, token: &str, ttl: Duration) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(token) {
            Some(session) if !session.is_expired() => {
                session.expires_at = expiry_from_ttl(ttl);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> SessionIdentity {
        SessionIdentity {
            id: Uuid::new_v4(),
            email: "alice@example.com".to_string(),
            username: "alice".to_string(),
            name: "Alice".to_string(),
        }
    }

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    #[test]
    fn test_generate_token_length_and_uniqueness() {
        let a = generate_token();
        let b = generate_token();

        // 32 bytes hex-encoded
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = InMemorySessionStore::new();
        let id = identity();

        let session = store.create(id.clone(), DAY).await;
        assert_eq!(session.identity, id);
        assert!(session.expires_at > session.created_at);

        let resolved = store.get(&session.token).await.expect("session resolves");
        assert_eq!(resolved.identity, id);
    }

    #[tokio::test]
    async fn test_get_unknown_token() {
        let store = InMemorySessionStore::new();
        assert!(store.get("deadbeef").await.is_none());
    }

    #[tokio::test]
    async fn test_destroy_is_idempotent() {
        let store = InMemorySessionStore::new();
        let session = store.create(identity(), DAY).await;

        store.destroy(&session.token).await;
        assert!(store.get(&session.token).await.is_none());

        // Destroying again, or destroying an unknown token, is not an error
        store.destroy(&session.token).await;
        store.destroy("never-existed").await;
    }

    #[tokio::test]
    async fn test_expired_session_does_not_resolve() {
        let store = InMemorySessionStore::new();
        let session = store.create(identity(), Duration::from_secs(0)).await;

        assert!(store.get(&session.token).await.is_none());
        // Lazy purge removed the entry
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_touch_extends_expiry() {
        let store = InMemorySessionStore::new();
        let session = store.create(identity(), Duration::from_secs(60)).await;
        let original_expiry = session.expires_at;

        assert!(store.touch(&session.token, DAY).await);

        let refreshed = store.get(&session.token).await.expect("session resolves");
        assert!(refreshed.expires_at > original_expiry);
    }

    #[tokio::test]
    async fn test_touch_missing_or_expired() {
        let store = InMemorySessionStore::new();
        assert!(!store.touch("missing", DAY).await);

        let session = store.create(identity(), Duration::from_secs(0)).await;
        assert!(!store.touch(&session.token, DAY).await);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let store = InMemorySessionStore::new();
        let first = store.create(identity(), DAY).await;
        let second = store.create(identity(), DAY).await;

        store.destroy(&first.token).await;
        assert!(store.get(&first.token).await.is_none());
        assert!(store.get(&second.token).await.is_some());
    }
}
