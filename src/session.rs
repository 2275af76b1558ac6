//! Local sign-in state.
//!
//! There is no authentication backend: logging in only checks that both
//! fields were filled and records the result in `session.toml` next to the
//! config file. Registration validates the form and nothing else.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Persisted sign-in state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    pub authenticated: bool,
    /// Only kept when "remember me" was set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// RFC 3339 timestamp of the last login
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logged_in_at: Option<String>,
}

impl Session {
    /// Sign in with any non-empty email and password.
    pub fn login(email: &str, password: &str, remember: bool) -> Result<Self, SessionError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(SessionError::MissingFields);
        }

        Ok(Self {
            authenticated: true,
            email: remember.then(|| email.to_string()),
            logged_in_at: Some(chrono::Utc::now().to_rfc3339()),
        })
    }
}

/// Sign-up form contents.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub agree_to_terms: bool,
}

impl RegistrationForm {
    /// Checks run in the order a user would fix them; the first failure wins.
    pub fn validate(&self) -> Result<(), SessionError> {
        let required = [&self.first_name, &self.last_name, &self.email, &self.password];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(SessionError::MissingFields);
        }
        if self.password != self.confirm_password {
            return Err(SessionError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(SessionError::PasswordTooShort);
        }
        if !self.agree_to_terms {
            return Err(SessionError::TermsNotAccepted);
        }
        Ok(())
    }
}

/// Rough password strength shown while typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    Empty,
    Weak,
    Fair,
    Good,
    Strong,
}

impl PasswordStrength {
    pub fn of(password: &str) -> Self {
        match password.chars().count() {
            0 => PasswordStrength::Empty,
            1..=5 => PasswordStrength::Weak,
            6..=7 => PasswordStrength::Fair,
            8..=11 => PasswordStrength::Good,
            _ => PasswordStrength::Strong,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PasswordStrength::Empty => "",
            PasswordStrength::Weak => "Weak",
            PasswordStrength::Fair => "Fair",
            PasswordStrength::Good => "Good",
            PasswordStrength::Strong => "Strong",
        }
    }
}

/// Reads and writes the session file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `session.toml` in the config directory.
    pub fn default_location() -> Option<Self> {
        crate::config::config_dir().map(|dir| Self::at(dir.join("session.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored session. Missing or unreadable files mean signed out.
    pub fn load(&self) -> Session {
        if !self.path.exists() {
            return Session::default();
        }

        match std::fs::read_to_string(&self.path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable session file {:?}: {}", self.path, e);
                Session::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read session file {:?}: {}", self.path, e);
                Session::default()
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| SessionError::Io(dir.to_path_buf(), e))?;
        }

        let contents = toml::to_string_pretty(session).map_err(SessionError::Serialize)?;
        let temp_path = self.path.with_extension("toml.tmp");
        std::fs::write(&temp_path, contents).map_err(|e| SessionError::Io(temp_path.clone(), e))?;
        std::fs::rename(&temp_path, &self.path)
            .map_err(|e| SessionError::Io(self.path.clone(), e))?;

        tracing::debug!("Saved session to {:?}", self.path);
        Ok(())
    }

    /// Remove the session file; already signed out is fine.
    pub fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Io(self.path.clone(), e)),
        }
    }
}

/// Session and form validation errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Please fill in all required fields.")]
    MissingFields,

    #[error("Passwords do not match. Please try again.")]
    PasswordMismatch,

    #[error("Password must be at least 8 characters long.")]
    PasswordTooShort,

    #[error("Please agree to the Terms of Service and Privacy Policy.")]
    TermsNotAccepted,

    #[error("Failed to access session file {0}: {1}")]
    Io(PathBuf, std::io::Error),

    #[error("Failed to serialize session: {0}")]
    Serialize(toml::ser::Error),
}

impl SessionError {
    /// Short headline for a notification.
    pub fn title(&self) -> &'static str {
        match self {
            SessionError::MissingFields => "Missing required fields",
            SessionError::PasswordMismatch => "Password mismatch",
            SessionError::PasswordTooShort => "Password too short",
            SessionError::TermsNotAccepted => "Terms agreement required",
            SessionError::Io(..) | SessionError::Serialize(_) => "Session error",
        }
    }
}
