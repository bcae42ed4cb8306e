//! # Identity
//!
//! The active username plus the login form that produces it.
//!
//! ```text
//! EnterName ──submit──▶ Checking ──ok──▶ Confirm ──enter──▶ Submitting ──ok──▶ (logged in)
//!     ▲                    │                │                    │
//!     └────── error ───────┘◀──── edit ─────┘◀────── error ──────┘
//! ```
//!
//! There are no tokens. The username is kept in memory and, unless disabled,
//! cached at `~/.mira/user.json` so the next start skips the login screen.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::api::UserCheck;
use crate::core::state::Notice;
use crate::core::validation::ValidationError;

/// Trims the input and rejects it if nothing is left.
pub fn normalize_username(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyUsername);
    }
    Ok(trimmed.to_string())
}

/// The logged-in user. `None` means every screen except login is gated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub username: Option<String>,
}

impl Identity {
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.username.is_some()
    }

    pub fn set(&mut self, username: String) {
        self.username = Some(username);
    }

    pub fn clear(&mut self) {
        self.username = None;
    }
}

// ============================================================================
// Login form
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoginStage {
    #[default]
    EnterName,
    /// `check-user` in flight.
    Checking { username: String },
    /// Lookup done; Enter confirms a login (existing) or a signup (new).
    Confirm { username: String, check: UserCheck },
    /// `login` or `signup` in flight.
    Submitting { username: String, check: UserCheck },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub stage: LoginStage,
    /// Inline message under the input.
    pub message: Option<Notice>,
}

impl LoginForm {
    pub fn is_busy(&self) -> bool {
        matches!(
            self.stage,
            LoginStage::Checking { .. } | LoginStage::Submitting { .. }
        )
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Prompt shown once the lookup finished.
pub fn confirm_prompt(username: &str, check: UserCheck) -> String {
    match check {
        UserCheck::Existing => format!("Welcome back, {username}! Press Enter to log in."),
        UserCheck::New => "Username available! Press Enter to sign up.".to_string(),
    }
}

// ============================================================================
// Username cache
// ============================================================================

#[derive(Serialize, Deserialize, Debug)]
struct CachedUser {
    username: String,
}

/// The single piece of durable client state: `{"username": "..."}`.
#[derive(Debug, Clone)]
pub struct UsernameCache {
    path: PathBuf,
}

impl UsernameCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `~/.mira/user.json`, or `None` without a home directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".mira").join("user.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the cached username. A missing, unreadable or blank file
    /// counts as no cache.
    pub fn load(&self) -> Option<String> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read {}: {}", self.path.display(), e);
                return None;
            }
        };
        match serde_json::from_str::<CachedUser>(&json) {
            Ok(cached) => {
                let username = normalize_username(&cached.username).ok();
                debug!("Username cache loaded: {:?}", username);
                username
            }
            Err(e) => {
                warn!("Ignoring malformed username cache: {}", e);
                None
            }
        }
    }

    /// Writes the cache via `.tmp` + rename.
    pub fn store(&self, username: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("tmp");
        let json = serde_json::to_string_pretty(&CachedUser {
            username: username.to_string(),
        })
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        info!("Username cached at {}", self.path.display());
        Ok(())
    }

    /// Removes the cache. Already gone is fine.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Username cache removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
