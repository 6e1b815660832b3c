use crate::persistence::{atomic_write, read_optional, remove_if_exists};
use anyhow::{Context, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The logged-in identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Option<String>,
    pub token: String,
    pub display_name: String,
}

impl Session {
    /// Build a session from a fresh access token. The user id is read from
    /// the token's `sub` claim when it can be decoded.
    pub fn from_token(token: String, display_name: impl Into<String>) -> Self {
        Self {
            user_id: token_subject(&token),
            token,
            display_name: display_name.into(),
        }
    }
}

/// Display name used when nothing better is known: the part of the email
/// before the `@`
pub fn default_display_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

fn token_subject(token: &str) -> Option<String> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    match &claims["sub"] {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// On-disk shape of the side-store: token, user name and the session
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    user_name: String,
    session: Session,
}

/// Holds the single active session in memory, mirrored to a durable file so
/// it survives restarts. Written only at login and logout.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    current: Option<Session>,
}

impl SessionStore {
    /// Open the store, restoring any saved session.
    ///
    /// An unreadable side-store is treated as logged out rather than an error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let current = match read_optional(&path)? {
            Some(content) => match serde_json::from_str::<StoredSession>(&content) {
                Ok(stored) => Some(stored.session),
                Err(err) => {
                    tracing::warn!(error = %err, path = %path.display(), "ignoring unreadable session file");
                    None
                }
            },
            None => None,
        };

        Ok(Self { path, current })
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    /// Replace the active session and persist it
    pub fn login(&mut self, session: Session) -> Result<()> {
        let stored = StoredSession {
            token: session.token.clone(),
            user_name: session.display_name.clone(),
            session: session.clone(),
        };
        let json = serde_json::to_string_pretty(&stored).context("Failed to serialize session")?;
        atomic_write(&self.path, &json)?;
        tracing::info!(user = %session.display_name, "session stored");
        self.current = Some(session);
        Ok(())
    }

    /// Drop the active session from memory and disk
    pub fn logout(&mut self) -> Result<()> {
        remove_if_exists(&self.path)?;
        if let Some(session) = self.current.take() {
            tracing::info!(user = %session.display_name, "session cleared");
        }
        Ok(())
    }
}
