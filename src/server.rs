//! Server runtime
//!
//! [`ServerHandle`] owns the full lifecycle: storage selection and
//! migrations, service wiring, the REST API listener, metrics and graceful
//! shutdown. The CLI binary is a thin wrapper around it.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::application::identity::{CredentialStore, UserService};
use crate::application::messaging::MessageService;
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::{JwtConfig, TokenService};
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{init_database, InMemoryStorage, SeaOrmRepositoryProvider};
use crate::interfaces::http::modules::health::HealthState;
use crate::interfaces::http::{create_api_router, ApiState};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// ── Options ────────────────────────────────────────────────────────

pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup.
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running server.
///
/// ```rust,no_run
/// use messagely::server::{ServerHandle, ServerOptions};
///
/// # async fn run() -> Result<(), messagely::server::BoxError> {
/// let handle = ServerHandle::start(ServerOptions::default()).await?;
/// handle.shutdown().await;
/// # Ok(())
/// # }
/// ```
pub struct ServerHandle {
    pub repos: Arc<dyn RepositoryProvider>,
    pub config: AppConfig,
    /// Address actually bound; differs from the config when port 0 is used.
    pub local_addr: std::net::SocketAddr,

    db: Option<DatabaseConnection>,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

/// The global metrics recorder can only be installed once per process.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();
    HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!(error = %e, "Metrics recorder unavailable; /metrics disabled");
                None
            }
        })
        .clone()
}

impl ServerHandle {
    /// Validate config, open storage, wire services and start listening.
    pub async fn start(opts: ServerOptions) -> Result<Self, BoxError> {
        let app_cfg = opts.config;
        app_cfg.validate()?;

        info!("Starting Messagely...");

        let metrics = prometheus_handle();

        // ── Storage ────────────────────────────────────────────
        let (repos, db): (Arc<dyn RepositoryProvider>, Option<DatabaseConnection>) =
            if app_cfg.database.is_memory() {
                info!("Using in-memory storage; data will not survive a restart");
                (Arc::new(InMemoryStorage::new()), None)
            } else {
                let db = init_database(&app_cfg.database.to_database_config()).await?;
                if opts.auto_migrate {
                    info!("Running database migrations...");
                    Migrator::up(&db, None).await?;
                    info!("Migrations completed");
                }
                (Arc::new(SeaOrmRepositoryProvider::new(db.clone())), Some(db))
            };

        // ── Services ───────────────────────────────────────────
        let jwt_config = JwtConfig {
            secret: app_cfg.security.secret_key.clone(),
        };
        let tokens = TokenService::from_config(&jwt_config);
        let credentials = Arc::new(CredentialStore::new(
            repos.clone(),
            app_cfg.security.bcrypt_work_factor,
        )?);
        info!(
            work_factor = credentials.work_factor(),
            "Password hashing configured"
        );

        let state = ApiState {
            user_service: Arc::new(UserService::new(
                repos.clone(),
                credentials,
                tokens.clone(),
            )),
            message_service: Arc::new(MessageService::new(repos.clone())),
            tokens,
            health: HealthState {
                db: db.clone(),
                started_at: Arc::new(Instant::now()),
            },
        };

        // ── REST API ───────────────────────────────────────────
        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let api_shutdown = shutdown.signal();

        let router = create_api_router(state, metrics);
        let listener = tokio::net::TcpListener::bind(app_cfg.api_address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_task = tokio::spawn(async move {
            let server = axum::serve(listener, router).with_graceful_shutdown(async move {
                api_shutdown.wait().await;
                info!("REST API received shutdown signal");
            });
            if let Err(e) = server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            repos,
            config: app_cfg,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Listen for SIGINT/SIGTERM and trigger shutdown when one arrives.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the API task to drain (bounded by `shutdown_timeout`), then
    /// close the database.
    pub async fn wait(self) {
        let Self {
            db,
            shutdown,
            api_task,
            ..
        } = self;

        shutdown
            .shutdown_with_cleanup(|| async move {
                match api_task.await {
                    Ok(()) => info!("REST API server stopped"),
                    Err(e) => error!("REST API task panicked: {}", e),
                }
            })
            .await;

        if let Some(db) = db {
            match db.close().await {
                Ok(()) => info!("Database connection closed"),
                Err(e) => warn!("Error closing database connection: {}", e),
            }
        }

        info!("Messagely shutdown complete");
    }

    pub async fn shutdown(self) {
        info!("Shutting down...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// Install the global tracing subscriber from the logging config.
///
/// `RUST_LOG` takes precedence over `logging.level`. Call once, before
/// [`ServerHandle::start`].
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if config.logging.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    if let Err(e) = result {
        eprintln!("tracing already initialised: {}", e);
    }
}
