//! Application context shared by every command.
//!
//! Holds what the dashboard would otherwise keep in globals: the loaded
//! configuration, one API client, the sign-in state and the notification
//! queue. Built once per process and torn down on exit.

use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{InsightsClient, Market};
use crate::config::{self, Config};
use crate::error::{Result, ResultExt};
use crate::notify::{Notifier, Toast};
use crate::session::{RegistrationForm, Session, SessionStore};

pub struct AppContext {
    pub config: Config,
    config_path: Option<PathBuf>,
    pub api: Arc<InsightsClient>,
    pub session: Session,
    sessions: Option<SessionStore>,
    pub notifier: Notifier,
}

impl AppContext {
    /// Load config and session from their default locations.
    ///
    /// `api_url` replaces the configured base URL for this process only;
    /// it is never written back.
    pub fn init(api_url: Option<&str>) -> Result<Self> {
        let config_path = config::config_path();
        let config = match &config_path {
            Some(path) => config::load_from(path),
            None => config::load(),
        };
        Self::from_parts(config, config_path, SessionStore::default_location(), api_url)
    }

    pub fn from_parts(
        config: Config,
        config_path: Option<PathBuf>,
        sessions: Option<SessionStore>,
        api_url: Option<&str>,
    ) -> Result<Self> {
        let mut api_config = config.api.clone();
        if let Some(url) = api_url.map(str::trim).filter(|u| !u.is_empty()) {
            api_config.base_url = url.to_string();
        }
        let api = InsightsClient::new(&api_config).with_context("creating API client")?;
        tracing::debug!("Using analytics API at {}", api.base_url());

        let session = sessions.as_ref().map(SessionStore::load).unwrap_or_default();

        Ok(Self {
            config,
            config_path,
            api: Arc::new(api),
            session,
            sessions,
            notifier: Notifier::new(),
        })
    }

    /// Configured default market, or `IN` if the setting is malformed.
    pub fn market(&self) -> Market {
        Market::parse(&self.config.api.default_market).unwrap_or_else(|e| {
            tracing::warn!("{}, using {}", e, Market::default());
            Market::default()
        })
    }

    /// Markets preselected for comparison; malformed entries are skipped.
    pub fn compare_markets(&self) -> Vec<Market> {
        self.config
            .ui
            .compare_markets
            .iter()
            .filter_map(|code| match Market::parse(code) {
                Ok(m) => Some(m),
                Err(e) => {
                    tracing::warn!("Skipping compare market: {}", e);
                    None
                }
            })
            .collect()
    }

    pub fn config_path(&self) -> Option<&PathBuf> {
        self.config_path.as_ref()
    }

    pub fn login(&mut self, email: &str, password: &str, remember: bool) -> Result<()> {
        let session = Session::login(email, password, remember)?;
        if let Some(store) = &self.sessions {
            store.save(&session).with_context("saving session")?;
        }
        self.session = session;
        self.notifier
            .success("Login successful!", "Welcome back to Music Insights Dashboard.");
        Ok(())
    }

    pub fn logout(&mut self) -> Result<()> {
        if let Some(store) = &self.sessions {
            store.clear().with_context("clearing session")?;
        }
        self.session = Session::default();
        Ok(())
    }

    /// Validate a sign-up form. Nothing is stored; there is no account backend.
    pub fn register(&self, form: &RegistrationForm) -> Result<()> {
        if let Err(e) = form.validate() {
            self.notifier.error(e.title(), e.to_string());
            return Err(e.into());
        }
        self.notifier.success(
            "Account created!",
            "Welcome to Music Insights Dashboard. Please sign in.",
        );
        Ok(())
    }

    /// Pending notifications, oldest first.
    pub fn drain_notifications(&self) -> Vec<Toast> {
        self.notifier.drain()
    }

    /// Persist the configuration and drop transient state.
    pub async fn teardown(self) -> Result<()> {
        let Self {
            config,
            config_path,
            notifier,
            ..
        } = self;

        let dropped = notifier.drain().len();
        if dropped > 0 {
            tracing::debug!(dropped, "Discarding undelivered notifications");
        }

        if let Some(path) = config_path {
            config::save_async(config, path).await?;
        }
        Ok(())
    }
}
