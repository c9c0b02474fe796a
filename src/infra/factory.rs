use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;
use argon2::{password_hash::SaltString, Argon2, PasswordHasher};

use crate::config::Config;
use crate::state::AppState;
use crate::domain::models::user::User;
use crate::domain::ports::UserRepository;
use crate::domain::services::auth_service::AuthService;
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_brand_repo::PostgresBrandRepo,
    postgres_product_repo::PostgresProductRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_brand_repo::SqliteBrandRepo,
    sqlite_product_repo::SqliteProductRepo, sqlite_user_repo::SqliteUserRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let auth_service = Arc::new(AuthService::new(config.clone()));

    let state = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        AppState {
            config: config.clone(),
            user_repo: Arc::new(PostgresUserRepo::new(pool.clone())),
            brand_repo: Arc::new(PostgresBrandRepo::new(pool.clone())),
            product_repo: Arc::new(PostgresProductRepo::new(pool.clone())),
            booking_repo: Arc::new(PostgresBookingRepo::new(pool.clone())),
            auth_service,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        AppState {
            config: config.clone(),
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            brand_repo: Arc::new(SqliteBrandRepo::new(pool.clone())),
            product_repo: Arc::new(SqliteProductRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            auth_service,
        }
    };

    seed_admin(&state).await;
    state
}

/// Creates the bootstrap admin account on first start when ADMIN_USERNAME
/// and ADMIN_PASSWORD are configured.
async fn seed_admin(state: &AppState) {
    let (Some(username), Some(password)) = (
        state.config.admin_username.clone(),
        state.config.admin_password.clone(),
    ) else {
        return;
    };

    let existing = state.user_repo.find_by_username(&username).await
        .expect("Failed to look up admin user");
    if existing.is_some() {
        return;
    }

    let salt = SaltString::generate(&mut rand::thread_rng());
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .expect("Failed to hash admin password")
        .to_string();

    let admin = User::new(username.clone(), password_hash, "ADMIN".to_string());
    state.user_repo.create(&admin).await.expect("Failed to create admin user");
    info!("Bootstrap admin created: {}", username);
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
