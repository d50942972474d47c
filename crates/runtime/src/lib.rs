use std::sync::Arc;

use anyhow::{Context, Result};
use frontdesk_auth::{AuthController, GuardDecision, Navigator, Route, RouteGuard};
use frontdesk_config::AppConfig;
use frontdesk_gateway::ApiClient;
use frontdesk_session::{load, FileTokenStore, MemoryTokenStore, SessionStore, TokenStore};
use tracing::{debug, info};

pub mod telemetry {
    use anyhow::Result;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    /// Install the global subscriber. `RUST_LOG` wins over `default_directive`.
    pub fn init_tracing(default_directive: &str) -> Result<()> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive));

        let subscriber = SubscriberBuilder::default()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

/// Where the session token is kept between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenPersistence {
    /// The file named by `session.token_path`.
    #[default]
    File,
    /// Nothing survives the process.
    Ephemeral,
}

/// Everything a front end needs, wired once at startup.
#[derive(Clone)]
pub struct ClientServices {
    pub session: SessionStore,
    pub auth: Arc<AuthController>,
    pub navigator: Navigator,
}

impl ClientServices {
    pub fn initialise(config: &AppConfig, persistence: TokenPersistence) -> Result<Self> {
        match persistence {
            TokenPersistence::File => {
                let path = config.session.resolved_token_path();
                debug!(path = %path.display(), "using token file");
                Self::with_token_store(config, FileTokenStore::new(path))
            }
            TokenPersistence::Ephemeral => Self::with_token_store(config, MemoryTokenStore::default()),
        }
    }

    pub fn with_token_store<T: TokenStore>(config: &AppConfig, tokens: T) -> Result<Self> {
        let (session, writer) = load(tokens);
        let client = ApiClient::new(&config.api, session.clone())
            .context("failed to build api client")?;
        let navigator = Navigator::new(Route::Dashboard);
        let auth = Arc::new(AuthController::new(client, writer, navigator.clone()));

        info!(base_url = %config.api.base_url, status = ?session.status(), "client services ready");

        Ok(Self {
            session,
            auth,
            navigator,
        })
    }

    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(&self.session, self.navigator.clone())
    }

    /// Run startup verification and settle the guard for `route`.
    ///
    /// The guard holds at `Loading` until verification finishes, so the
    /// first decision already reflects the persisted token.
    pub async fn open(&self, route: Route) -> GuardDecision {
        let mut guard = self.guard();
        self.navigator.replace(route.clone());
        let (decision, _) = tokio::join!(guard.settle(&route), self.auth.verify_once());
        decision
    }
}
