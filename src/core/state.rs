//! Application State - the context injected into every handler
//!
//! Holds one repository per resource (all in-memory or all PostgreSQL, chosen
//! once by [`AppState::bootstrap`]), the realtime hub and the configuration.

use crate::core::{Config, CurrentUser};
use crate::entities::{
    Activity, Client, MaterialSpec, Notification, ProcurementItem, Project, ProjectUpdate,
    ShopDrawing, Task, TeamMember, User,
};
use crate::repositories::{Store, fixtures};
use crate::ws::Hub;
use serde::Serialize;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::{Duration, Instant};
use strum_macros::Display;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DataMode {
    Demo,
    Production,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("DATABASE_URL is not configured")]
    NotConfigured,
    #[error("database connection timed out after {0}s")]
    Timeout(u64),
    #[error("database connection failed: {0}")]
    Connect(#[from] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

pub struct AppState {
    pub mode: DataMode,
    pub config: Config,

    pub users: Store<User>,
    pub projects: Store<Project>,
    pub tasks: Store<Task>,
    pub clients: Store<Client>,
    pub team_members: Store<TeamMember>,
    pub notifications: Store<Notification>,
    pub shop_drawings: Store<ShopDrawing>,
    pub material_specs: Store<MaterialSpec>,
    pub activities: Store<Activity>,
    pub updates: Store<ProjectUpdate>,
    pub procurement: Store<ProcurementItem>,

    /// Realtime connection registry and rooms
    pub hub: Hub,

    /// Identity injected into every request
    pub demo_user: CurrentUser,

    pub started_at: Instant,

    pool: Option<PgPool>,
}

impl AppState {
    /// Demo mode: every repository is an in-memory collection seeded with fixtures
    pub fn demo(config: Config) -> Self {
        let seed = fixtures::DemoData::generate();
        Self {
            mode: DataMode::Demo,
            config,
            users: Store::memory(seed.users),
            projects: Store::memory(seed.projects),
            tasks: Store::memory(seed.tasks),
            clients: Store::memory(seed.clients),
            team_members: Store::memory(seed.team_members),
            notifications: Store::memory(seed.notifications),
            shop_drawings: Store::memory(seed.shop_drawings),
            material_specs: Store::memory(seed.material_specs),
            activities: Store::memory(seed.activities),
            updates: Store::memory(seed.updates),
            procurement: Store::memory(seed.procurement),
            hub: Hub::new(),
            demo_user: CurrentUser::demo(),
            started_at: Instant::now(),
            pool: None,
        }
    }

    /// Production mode: every repository shares the given connection pool
    pub fn production(pool: PgPool, config: Config) -> Self {
        Self {
            mode: DataMode::Production,
            config,
            users: Store::postgres(pool.clone()),
            projects: Store::postgres(pool.clone()),
            tasks: Store::postgres(pool.clone()),
            clients: Store::postgres(pool.clone()),
            team_members: Store::postgres(pool.clone()),
            notifications: Store::postgres(pool.clone()),
            shop_drawings: Store::postgres(pool.clone()),
            material_specs: Store::postgres(pool.clone()),
            activities: Store::postgres(pool.clone()),
            updates: Store::postgres(pool.clone()),
            procurement: Store::postgres(pool.clone()),
            hub: Hub::new(),
            demo_user: CurrentUser::demo(),
            started_at: Instant::now(),
            pool: Some(pool),
        }
    }

    /// Decides the data mode once for the whole process lifetime.
    /// A failed database handshake is not fatal: it is logged and the server
    /// keeps serving demo data, without ever retrying.
    #[instrument(skip(config))]
    pub async fn bootstrap(config: Config) -> Self {
        match connect_database(&config).await {
            Ok(pool) => {
                info!("Database connected, running in production mode");
                Self::production(pool, config)
            }
            Err(e) => {
                warn!("Database unavailable ({}), running in demo mode", e);
                Self::demo(config)
            }
        }
    }

    pub fn is_demo(&self) -> bool {
        self.mode == DataMode::Demo
    }

    pub fn database_connected(&self) -> bool {
        self.pool.is_some()
    }

    /// REST mutations fan out to realtime clients in production mode, and in
    /// demo mode only when explicitly enabled
    pub fn broadcasts_enabled(&self) -> bool {
        !self.is_demo() || self.config.demo_broadcasts
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub async fn shutdown(&self) {
        if let Some(pool) = &self.pool {
            info!("Closing database pool");
            pool.close().await;
        }
    }
}

/// Connects, performs a `SELECT 1` handshake and applies the embedded migrations
async fn connect_database(config: &Config) -> Result<PgPool, BootstrapError> {
    let url = config
        .database_url
        .as_deref()
        .ok_or(BootstrapError::NotConfigured)?;
    let timeout = Duration::from_secs(config.db_connect_timeout_secs);

    let pool = tokio::time::timeout(
        timeout,
        PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(timeout)
            .connect(url),
    )
    .await
    .map_err(|_| BootstrapError::Timeout(config.db_connect_timeout_secs))??;

    sqlx::query("SELECT 1").execute(&pool).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
