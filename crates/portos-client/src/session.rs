//! # Session Store
//!
//! The single owner of the auth token. Nothing else in the workspace reads
//! or writes the token directly.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Session Lifecycle                               │
//! │                                                                         │
//! │   load()  ── startup: read session.json, drop it if expired            │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │   begin(token, user) ── after POST /login: keep in memory + persist    │
//! │     │                    expires_at = now + ttl_days                    │
//! │     ▼                                                                   │
//! │   bearer() ── every protected request: "Bearer <token>"                │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │   end() ── logout or any 401: clear memory, delete file                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tokens are stored bare. A value that already carries a `Bearer ` prefix
//! is normalized on the way in so the header is never doubled.

use chrono::{DateTime, Duration, Utc};
use portos_core::User;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};

/// On-disk form of a session.
#[derive(Serialize, Deserialize)]
struct PersistedSession {
    token: String,
    #[serde(default)]
    user: Option<User>,
    expires_at: DateTime<Utc>,
}

struct ActiveSession {
    token: SecretString,
    user: Option<User>,
    expires_at: DateTime<Utc>,
}

impl ActiveSession {
    fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// What callers may know about the session. The token itself stays inside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub user: Option<User>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<ActiveSession>>>,
    path: Option<PathBuf>,
    ttl_days: i64,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("path", &self.path)
            .field("ttl_days", &self.ttl_days)
            .finish_non_exhaustive()
    }
}

/// Strips whitespace and any `Bearer ` prefix.
pub fn normalize_token(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim_start(),
        None if trimmed.eq_ignore_ascii_case("bearer") => "",
        _ => trimmed,
    }
}

impl SessionStore {
    /// A store persisted at `path`. `None` keeps the session in memory only.
    pub fn new(path: Option<PathBuf>, ttl_days: i64) -> Self {
        SessionStore {
            inner: Arc::new(RwLock::new(None)),
            path,
            ttl_days,
        }
    }

    pub fn in_memory(ttl_days: i64) -> Self {
        Self::new(None, ttl_days)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Restores a persisted session. Returns whether one is now active.
    ///
    /// An expired or unreadable file is deleted rather than reported, so a
    /// corrupt session never blocks the user from logging in again.
    pub async fn load(&self) -> ClientResult<bool> {
        let Some(path) = &self.path else {
            return Ok(false);
        };

        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(?path, "No saved session");
                return Ok(false);
            }
            Err(e) => return Err(ClientError::Session(format!("{}: {e}", path.display()))),
        };

        let persisted: PersistedSession = match serde_json::from_str(&contents) {
            Ok(p) => p,
            Err(e) => {
                warn!(?path, error = %e, "Discarding unreadable session file");
                self.remove_file().await?;
                return Ok(false);
            }
        };

        let session = ActiveSession {
            token: SecretString::from(persisted.token),
            user: persisted.user,
            expires_at: persisted.expires_at,
        };

        if session.is_expired() {
            info!(expired_at = %session.expires_at, "Saved session has expired");
            self.remove_file().await?;
            return Ok(false);
        }

        debug!(expires_at = %session.expires_at, "Session restored");
        *self.inner.write().await = Some(session);
        Ok(true)
    }

    /// Starts a session after a successful login.
    pub async fn begin(&self, token: &str, user: Option<User>) -> ClientResult<()> {
        let token = normalize_token(token);
        if token.is_empty() {
            return Err(ClientError::Session("server returned an empty token".into()));
        }

        let expires_at = Duration::try_days(self.ttl_days)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| {
                ClientError::Session(format!(
                    "session lifetime of {} days is out of range",
                    self.ttl_days
                ))
            })?;

        if let Some(path) = &self.path {
            let persisted = PersistedSession {
                token: token.to_string(),
                user: user.clone(),
                expires_at,
            };
            let json = serde_json::to_string_pretty(&persisted)
                .map_err(|e| ClientError::Session(e.to_string()))?;
            write_private(path, json.as_bytes()).await?;
        }

        *self.inner.write().await = Some(ActiveSession {
            token: SecretString::from(token.to_string()),
            user,
            expires_at,
        });
        info!(%expires_at, "Session started");
        Ok(())
    }

    /// Ends the session: clears memory and deletes the file.
    pub async fn end(&self) -> ClientResult<()> {
        let was_active = self.inner.write().await.take().is_some();
        self.remove_file().await?;
        if was_active {
            info!("Session ended");
        }
        Ok(())
    }

    /// `Authorization` header value, if a live session exists.
    pub async fn bearer(&self) -> Option<String> {
        let guard = self.inner.read().await;
        guard
            .as_ref()
            .filter(|s| !s.is_expired())
            .map(|s| format!("Bearer {}", s.token.expose_secret()))
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner
            .read()
            .await
            .as_ref()
            .is_some_and(|s| !s.is_expired())
    }

    pub async fn info(&self) -> Option<SessionInfo> {
        let guard = self.inner.read().await;
        guard
            .as_ref()
            .filter(|s| !s.is_expired())
            .map(|s| SessionInfo {
                user: s.user.clone(),
                expires_at: s.expires_at,
            })
    }

    async fn remove_file(&self) -> ClientResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Session(format!("{}: {e}", path.display()))),
        }
    }
}

/// Writes the session file readable by the owner only.
async fn write_private(path: &Path, contents: &[u8]) -> ClientResult<()> {
    let io_err = |e: std::io::Error| ClientError::Session(format!("{}: {e}", path.display()));

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    tokio::fs::write(path, contents).await.map_err(io_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .await
            .map_err(io_err)?;
    }
    Ok(())
}
