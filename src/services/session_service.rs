use std::sync::Arc;

use chrono::{ Duration, Utc };
use uuid::Uuid;

use crate::crypto::SessionSigner;
use crate::db::{ session, SessionRepository };
use crate::error::Result;

pub const SESSION_COOKIE: &str = "sid";

/// Cookie-backed server-side sessions holding an optional user slot and an optional admin slot.
pub struct SessionService {
    repository: Arc<SessionRepository>,
    signer: SessionSigner,
    ttl_seconds: i64,
    secure_cookies: bool,
}

impl SessionService {
    pub fn new(
        repository: Arc<SessionRepository>,
        signer: SessionSigner,
        ttl_seconds: i64,
        secure_cookies: bool
    ) -> Self {
        Self {
            repository,
            signer,
            ttl_seconds,
            secure_cookies,
        }
    }

    pub async fn start(
        &self,
        user_id: Option<Uuid>,
        admin_id: Option<Uuid>
    ) -> Result<session::Model> {
        let id = self.signer.generate_id();
        let expires_at = Utc::now() + Duration::seconds(self.ttl_seconds);

        self.repository.create(id, user_id, admin_id, expires_at).await
    }

    /// Resolve a raw cookie value to a live session. Bad signatures and expired sessions are anonymous.
    pub async fn resolve(&self, cookie_value: &str) -> Result<Option<session::Model>> {
        let Some(session_id) = self.signer.verify(cookie_value) else {
            tracing::debug!("Ignoring session cookie with invalid signature");
            return Ok(None);
        };

        self.repository.find_live(session_id).await
    }

    /// Put an admin into the current session, or open a new one when there is none.
    pub async fn attach_admin(
        &self,
        current: Option<session::Model>,
        admin_id: Uuid
    ) -> Result<session::Model> {
        match current {
            Some(session) => {
                let user_id = session.user_id;
                self.repository.set_slots(session, user_id, Some(admin_id)).await
            }
            None => self.start(None, Some(admin_id)).await,
        }
    }

    /// Drop only the admin slot; a coexisting user login survives.
    pub async fn clear_admin(&self, session: session::Model) -> Result<session::Model> {
        let user_id = session.user_id;
        self.repository.set_slots(session, user_id, None).await
    }

    pub async fn destroy(&self, session_id: &str) -> Result<()> {
        self.repository.delete(session_id).await
    }

    pub async fn purge_expired(&self) -> Result<u64> {
        self.repository.delete_expired().await
    }

    pub fn set_cookie(&self, session: &session::Model) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            SESSION_COOKIE,
            self.signer.sign(&session.id),
            self.ttl_seconds
        );
        if self.secure_cookies {
            cookie.push_str("; Secure");
        }
        cookie
    }

    pub fn clear_cookie(&self) -> String {
        let mut cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE);
        if self.secure_cookies {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::memory_db;

    fn service(db: sea_orm::DatabaseConnection, ttl_seconds: i64) -> SessionService {
        SessionService::new(
            Arc::new(SessionRepository::new(db)),
            SessionSigner::new(b"test-secret-test-secret-test-secret").unwrap(),
            ttl_seconds,
            false
        )
    }

    fn cookie_value(header: &str) -> String {
        header
            .split(';')
            .next()
            .and_then(|pair| pair.split_once('='))
            .map(|(_, value)| value.to_string())
            .unwrap()
    }

    #[tokio::test]
    async fn test_cookie_resolves_to_session() {
        let sessions = service(memory_db().await, 3600);
        let user_id = Uuid::new_v4();

        let session = sessions.start(Some(user_id), None).await.unwrap();
        let header = sessions.set_cookie(&session);
        assert!(header.contains("HttpOnly"));
        assert!(!header.contains("Secure"));

        let resolved = sessions.resolve(&cookie_value(&header)).await.unwrap().unwrap();
        assert_eq!(resolved.user_id, Some(user_id));
        assert_eq!(resolved.admin_id, None);
    }

    #[tokio::test]
    async fn test_unsigned_cookie_is_anonymous() {
        let sessions = service(memory_db().await, 3600);
        let session = sessions.start(Some(Uuid::new_v4()), None).await.unwrap();

        assert!(sessions.resolve(&session.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_anonymous() {
        let sessions = service(memory_db().await, -10);
        let session = sessions.start(Some(Uuid::new_v4()), None).await.unwrap();
        let header = sessions.set_cookie(&session);

        assert!(sessions.resolve(&cookie_value(&header)).await.unwrap().is_none());
        assert_eq!(sessions.purge_expired().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_admin_slot_is_independent() {
        let sessions = service(memory_db().await, 3600);
        let user_id = Uuid::new_v4();
        let admin_id = Uuid::new_v4();

        let session = sessions.start(Some(user_id), None).await.unwrap();
        let session = sessions.attach_admin(Some(session), admin_id).await.unwrap();
        assert_eq!(session.user_id, Some(user_id));
        assert_eq!(session.admin_id, Some(admin_id));

        let session = sessions.clear_admin(session).await.unwrap();
        assert_eq!(session.user_id, Some(user_id));
        assert_eq!(session.admin_id, None);
    }
}
