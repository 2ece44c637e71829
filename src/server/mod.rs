//! Server initialization and routing

use crate::api;
use crate::browser;
use crate::config::Config;
use crate::crypto::EncryptionKey;
use crate::domain::StringUuid;
use crate::error::Result as AppResult;
use crate::middleware::cors_middleware;
use crate::migration;
use crate::openapi::ApiDoc;
use crate::repository::{TenantRegistryRepositoryImpl, UserRepositoryImpl};
use crate::service::UserService;
use crate::session::{self, MySqlSessionStore};
use crate::state::{HasServices, HasTenants};
use crate::tenancy::{MySqlTenantConnector, TenantConnections};
use anyhow::{Context, Result};
use axum::{
    http::StatusCode,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use sqlx::MySqlPool;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tower_sessions::service::PrivateCookie;
use tower_sessions::{SessionManagerLayer, SessionStore};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: MySqlPool,
    pub master_user_service: UserService<UserRepositoryImpl>,
    pub tenants: Arc<TenantConnections<TenantRegistryRepositoryImpl>>,
}

impl AppState {
    pub fn new(config: Config, db_pool: MySqlPool) -> Self {
        let registry = Arc::new(TenantRegistryRepositoryImpl::new(db_pool.clone()));
        let connector = Arc::new(MySqlTenantConnector::new(
            config.database.tenant_max_connections,
        ));

        Self {
            config: Arc::new(config),
            master_user_service: UserService::new(Arc::new(UserRepositoryImpl::master(
                db_pool.clone(),
            ))),
            tenants: Arc::new(TenantConnections::new(registry, connector)),
            db_pool,
        }
    }
}

impl HasServices for AppState {
    type MasterUserRepo = UserRepositoryImpl;

    fn config(&self) -> &Config {
        &self.config
    }

    fn master_user_service(&self) -> &UserService<Self::MasterUserRepo> {
        &self.master_user_service
    }

    async fn check_ready(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.db_pool).await.is_ok()
    }
}

impl HasTenants for AppState {
    type TenantUserRepo = UserRepositoryImpl;

    async fn tenant_user_service(
        &self,
        tenant_id: StringUuid,
    ) -> AppResult<UserService<Self::TenantUserRepo>> {
        let pool = self.tenants.pool_for(tenant_id).await?;
        Ok(UserService::new(Arc::new(UserRepositoryImpl::tenant(pool))))
    }
}

/// Bootstrap everything and serve until a shutdown signal arrives.
///
/// Any failure before the listener is bound (configuration, master
/// connection, migrations) is returned as an error.
pub async fn run(config: Config) -> Result<()> {
    let db_pool = migration::connect_master(&config).await?;
    info!("Connected to master database");

    migration::run_master_migrations(&db_pool).await?;

    let store = MySqlSessionStore::new(
        db_pool.clone(),
        EncryptionKey::derive_from_password(&config.session.password),
    )
    .with_table_name(&config.session.table_name)
    .map_err(anyhow::Error::msg)?;
    migration::prepare_session_table(&store, &config).await?;

    let report = migration::run_tenant_migrations(&db_pool, &config).await?;
    if !report.is_success() {
        warn!(
            failed = report.failed.len(),
            "Some tenant schemas could not be migrated"
        );
    }

    let cleanup = session::spawn_cleanup(store.clone(), config.session.cleanup_interval);

    let sessions = session::session_layer(store, &config.session, !config.is_development());
    let state = AppState::new(config.clone(), db_pool.clone());
    let tenants = state.tenants.clone();
    let app = build_router(state, sessions);

    let served = serve(&config, app).await;

    cleanup.stop().await;
    tenants.close_all().await;
    db_pool.close().await;
    info!("Server stopped");
    served
}

async fn serve(config: &Config, app: Router) -> Result<()> {
    let http_addr = config.http_addr();
    let listener = TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("Failed to bind {}", http_addr))?;
    info!("HTTP server started on {}", http_addr);

    if config.is_development() && config.show_swagger {
        let url = config.swagger_url();
        match browser::open(&url) {
            Ok(()) => info!(url = %url, "Opened Swagger UI"),
            Err(e) => warn!(url = %url, error = %e, "Could not open browser"),
        }
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

/// Build the HTTP router.
///
/// CORS is the outermost layer and sits outside the fallback, so `OPTIONS`
/// is answered for every path. Swagger UI is mounted in development only.
pub fn build_router<S, St>(state: S, sessions: SessionManagerLayer<St, PrivateCookie>) -> Router
where
    S: HasServices + HasTenants,
    St: SessionStore + Clone,
{
    let development = state.config().is_development();

    let mut router = Router::new()
        // Health endpoints
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready::<S>))
        // Master users
        .route(
            "/api/v1/master-users",
            get(api::master_user::list::<S>).post(api::master_user::create::<S>),
        )
        .route(
            "/api/v1/master-users/{id}",
            get(api::master_user::get::<S>)
                .put(api::master_user::update::<S>)
                .delete(api::master_user::delete::<S>),
        )
        // Tenant users
        .route(
            "/api/v1/tenants/{tenant_id}/users",
            get(api::tenant_user::list::<S>).post(api::tenant_user::create::<S>),
        )
        .route(
            "/api/v1/tenants/{tenant_id}/users/{id}",
            get(api::tenant_user::get::<S>)
                .put(api::tenant_user::update::<S>)
                .delete(api::tenant_user::delete::<S>),
        )
        // Sessions
        .route("/api/v1/sessions/host", post(api::session::host_login::<S>))
        .route(
            "/api/v1/tenants/{tenant_id}/sessions",
            post(api::session::client_login::<S>),
        )
        .route("/api/v1/sessions/me", get(api::session::me))
        .route("/api/v1/sessions", axum::routing::delete(api::session::logout))
        .with_state(state);

    if development {
        router = router.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
    }

    router
        .fallback(|| async { StatusCode::NOT_FOUND })
        .layer(sessions)
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(cors_middleware))
}
