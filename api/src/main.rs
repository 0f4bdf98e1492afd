//! BizDesk API Server
//!
//! Back office for a menu and print business: customers on subscriptions,
//! income and expenses, employees, and a dashboard over all of it.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod extract;
mod handlers;
mod migration;

#[cfg(test)]
mod test_utils;


use adapters::uploads::UPLOADS_URL_PREFIX;
use adapters::{
    LocalReceiptStore, PostgresActivityRepository, PostgresCustomerRepository,
    PostgresEmployeeRepository, PostgresExpenseRepository, PostgresIncomeRepository,
    PostgresSessionRepository, PostgresStatsRepository, PostgresUserRepository,
};
use app::{
    CustomerService, DashboardService, EmployeeService, LedgerService, ReportService, UserService,
};
use config::Config;
use domain::ports::{
    ActivityRepository, CustomerRepository, EmployeeRepository, ExpenseRepository,
    IncomeRepository, ReceiptStore, SessionRepository, StatsRepository, UserRepository,
};
use migration::Migrator;

/// Multipart framing on top of the receipt itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub type SharedUserService = UserService<dyn UserRepository, dyn SessionRepository>;
pub type SharedLedgerService = LedgerService<
    dyn IncomeRepository,
    dyn ExpenseRepository,
    dyn CustomerRepository,
    dyn ReceiptStore,
>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<SharedUserService>,
    pub customer_service: Arc<CustomerService<dyn CustomerRepository>>,
    pub ledger_service: Arc<SharedLedgerService>,
    pub employee_service: Arc<EmployeeService<dyn EmployeeRepository>>,
    pub dashboard_service: Arc<DashboardService<dyn StatsRepository, dyn ActivityRepository>>,
    pub report_service: Arc<ReportService<dyn StatsRepository>>,
    pub config: Config,
}

/// The storage handles services are built from
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub customers: Arc<dyn CustomerRepository>,
    pub income: Arc<dyn IncomeRepository>,
    pub expenses: Arc<dyn ExpenseRepository>,
    pub employees: Arc<dyn EmployeeRepository>,
    pub activities: Arc<dyn ActivityRepository>,
    pub stats: Arc<dyn StatsRepository>,
    pub receipts: Arc<dyn ReceiptStore>,
}

impl Repositories {
    /// PostgreSQL-backed repositories sharing one connection pool
    pub fn postgres(db: DatabaseConnection, receipts: Arc<dyn ReceiptStore>) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            sessions: Arc::new(PostgresSessionRepository::new(db.clone())),
            customers: Arc::new(PostgresCustomerRepository::new(db.clone())),
            income: Arc::new(PostgresIncomeRepository::new(db.clone())),
            expenses: Arc::new(PostgresExpenseRepository::new(db.clone())),
            employees: Arc::new(PostgresEmployeeRepository::new(db.clone())),
            activities: Arc::new(PostgresActivityRepository::new(db.clone())),
            stats: Arc::new(PostgresStatsRepository::new(db)),
            receipts,
        }
    }
}

impl AppState {
    pub fn from_parts(repos: Repositories, config: Config) -> Self {
        Self {
            user_service: Arc::new(UserService::new(
                repos.users,
                repos.sessions,
                config.session_ttl(),
            )),
            customer_service: Arc::new(CustomerService::new(repos.customers.clone())),
            ledger_service: Arc::new(LedgerService::new(
                repos.income,
                repos.expenses,
                repos.customers,
                repos.receipts,
                config.max_upload_bytes,
            )),
            employee_service: Arc::new(EmployeeService::new(repos.employees)),
            dashboard_service: Arc::new(DashboardService::new(
                repos.stats.clone(),
                repos.activities,
            )),
            report_service: Arc::new(ReportService::new(repos.stats)),
            config,
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the HTTP router over `state`
pub fn router(state: AppState) -> Router {
    let mut login_routes = Router::new().route("/login", post(handlers::login));

    if state.config.login_rate_limit {
        // 2 req/sec sustained, burst of 5, keyed on the peer socket address
        match GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(2)
            .burst_size(5)
            .finish()
        {
            Some(governor_config) => {
                login_routes = login_routes.layer(GovernorLayer {
                    config: Arc::new(governor_config),
                });
            }
            None => tracing::warn!("Invalid rate limit settings, login is not rate limited"),
        }
    }

    // Every route here requires a session
    let protected_routes = Router::new()
        .route("/auth/user", get(handlers::current_user))
        .route("/auth/user/profile", put(handlers::update_profile))
        .route("/dashboard/stats", get(handlers::dashboard_stats))
        .route("/activities", get(handlers::recent_activities))
        .route(
            "/customers",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route("/customers/:id/renew", patch(handlers::renew_customer))
        .route(
            "/customers/expiring/:days",
            get(handlers::expiring_customers),
        )
        .route(
            "/income",
            get(handlers::list_income).post(handlers::create_income),
        )
        .route("/income/prints", get(handlers::list_prints))
        .route(
            "/expenses",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route(
            "/employees",
            get(handlers::list_employees).post(handlers::create_employee),
        )
        .route("/employees/:id", delete(handlers::delete_employee))
        .route("/reports/generate", post(handlers::generate_report))
        .route(
            "/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::session_middleware,
        ));

    let api_routes = Router::new()
        .route("/logout", post(handlers::logout))
        .merge(login_routes)
        .merge(protected_routes);

    Router::new()
        // Health check (no auth)
        .route("/health", get(health))
        .nest("/api", api_routes)
        .nest_service(UPLOADS_URL_PREFIX, ServeDir::new(&state.config.upload_dir))
        .layer(DefaultBodyLimit::max(
            state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES,
        ))
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Credentialed CORS for the configured front-end origin, permissive otherwise
fn cors_layer(config: &Config) -> CorsLayer {
    let permissive = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let Some(origin) = &config.cors_origin else {
        return permissive;
    };

    match origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_headers([header::CONTENT_TYPE]),
        Err(e) => {
            tracing::warn!(origin = %origin, error = %e, "Invalid CORS_ORIGIN, allowing any origin");
            permissive
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,bizdesk_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting BizDesk API...");

    // Load configuration
    let config = Config::from_env()?;

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    Migrator::up(&db, None)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Migrations applied");

    let receipts = LocalReceiptStore::new(config.upload_dir.clone())
        .await
        .context("Failed to prepare upload directory")?;
    tracing::info!(dir = %receipts.dir().display(), "Receipt uploads ready");

    let state = AppState::from_parts(
        Repositories::postgres(db, Arc::new(receipts)),
        config.clone(),
    );

    if let Some(admin) = &config.bootstrap_admin {
        let created = state
            .user_service
            .ensure_bootstrap_admin(&admin.username, &admin.password)
            .await
            .context("Failed to create bootstrap admin")?;
        if created {
            tracing::info!(username = %admin.username, "Created bootstrap admin");
        }
    }

    let app = router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
