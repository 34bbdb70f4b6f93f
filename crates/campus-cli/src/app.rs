//! Wiring of configuration, persistence, session and HTTP client.

use anyhow::{Context, Result, bail};
use campus_application::AuthSessionService;
use campus_core::api::PortalApi;
use campus_core::config::PortalConfig;
use campus_core::session::{AuthUser, GuardDecision, Route};
use campus_infrastructure::{ConfigService, FileLocalStorage, PortalPaths};
use campus_interaction::HttpPortalClient;
use std::path::PathBuf;
use std::sync::Arc;

pub struct AppContext {
    paths: PortalPaths,
    config: PortalConfig,
    auth: Arc<AuthSessionService>,
    api: Arc<dyn PortalApi>,
}

impl AppContext {
    pub fn bootstrap(config_dir: Option<PathBuf>) -> Result<Self> {
        let paths = PortalPaths::new(config_dir);
        let config = ConfigService::new(paths.clone())
            .load()
            .context("Failed to load configuration")?;

        let storage_file = paths.local_storage_file()?;
        let auth = Arc::new(AuthSessionService::new(Arc::new(FileLocalStorage::new(
            storage_file,
        ))));
        let api: Arc<dyn PortalApi> =
            Arc::new(HttpPortalClient::new(config.clone(), auth.clone())?);

        Ok(Self {
            paths,
            config,
            auth,
            api,
        })
    }

    pub fn paths(&self) -> &PortalPaths {
        &self.paths
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    pub fn auth(&self) -> &AuthSessionService {
        &self.auth
    }

    pub fn api(&self) -> Arc<dyn PortalApi> {
        self.api.clone()
    }

    /// Runs the route guard, failing with a sign-in hint when redirected.
    pub fn require(&self, route: Route) -> Result<()> {
        match self.auth.guard(route) {
            GuardDecision::Allow => Ok(()),
            GuardDecision::RedirectTo(_) => bail!("Not signed in. Run `campus login` first."),
        }
    }

    /// Like [`require`](Self::require), and the account must be an admin.
    pub fn require_admin(&self) -> Result<AuthUser> {
        self.require(Route::AdminDashboard)?;
        match self.auth.current_user() {
            Some(user) if user.role.is_admin() => Ok(user),
            _ => bail!("This command needs an admin account."),
        }
    }
}
