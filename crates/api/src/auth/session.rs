//! Cookie-backed sessions.
//!
//! The browser holds a random opaque token; the database only ever sees its
//! SHA-256 hex digest. A session is valid while it is neither revoked nor
//! past `expires_at`.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use chrono::Utc;
use dreamboard_core::types::DbId;
use dreamboard_db::models::session::CreateSession;
use dreamboard_db::repositories::SessionRepo;
use dreamboard_db::DbPool;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::SessionConfig;

/// Generate a random session token.
///
/// Returns `(plaintext_token, sha256_hex_hash)`. The plaintext goes into the
/// cookie; only the hash is persisted.
pub fn generate_session_token() -> (String, String) {
    let plaintext = Uuid::new_v4().to_string();
    let hash = hash_session_token(&plaintext);
    (plaintext, hash)
}

/// SHA-256 hex digest of a session token.
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Find the value of cookie `name` in a `Cookie` request header value.
fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key.trim() == name).then(|| value.trim().trim_matches('"'))
    })
}

/// Issues, resolves and revokes sessions. Cheap to clone.
#[derive(Clone)]
pub struct SessionStore {
    pool: DbPool,
    config: SessionConfig,
}

impl SessionStore {
    pub fn new(pool: DbPool, config: SessionConfig) -> Self {
        Self { pool, config }
    }

    /// Open a new session for `user_id`, returning the plaintext token.
    pub async fn open(&self, user_id: DbId) -> Result<String, sqlx::Error> {
        let (token, token_hash) = generate_session_token();
        let input = CreateSession {
            user_id,
            token_hash,
            expires_at: Utc::now() + chrono::Duration::hours(self.config.ttl_hours),
        };
        let session = SessionRepo::create(&self.pool, &input).await?;
        tracing::debug!(user_id, session_id = session.id, "Session opened");
        Ok(token)
    }

    /// Resolve a token to its user, if the session is still active.
    pub async fn resolve(&self, token: &str) -> Result<Option<DbId>, sqlx::Error> {
        let session =
            SessionRepo::find_active_by_token_hash(&self.pool, &hash_session_token(token)).await?;
        Ok(session.map(|s| s.user_id))
    }

    /// Revoke the session behind `token`. Returns `true` if one was active.
    pub async fn close(&self, token: &str) -> Result<bool, sqlx::Error> {
        SessionRepo::revoke_by_token_hash(&self.pool, &hash_session_token(token)).await
    }

    /// Extract this store's session token from request headers.
    pub fn token_from_headers(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|header| find_cookie(header, &self.config.cookie_name))
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    }

    /// `Set-Cookie` value carrying a freshly opened session token.
    pub fn session_cookie(&self, token: &str) -> String {
        let max_age = self.config.ttl_hours * 3600;
        self.cookie(token, max_age)
    }

    /// `Set-Cookie` value that makes the browser drop the session cookie.
    pub fn clearing_cookie(&self) -> String {
        self.cookie("", 0)
    }

    fn cookie(&self, value: &str, max_age: i64) -> String {
        let mut cookie = format!(
            "{}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}",
            self.config.cookie_name
        );
        if self.config.cookie_secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}
