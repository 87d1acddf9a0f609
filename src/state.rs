//! Shared application state

use sqlx::PgPool;

use crate::auth::session::SessionStore;
use crate::config::Config;
use crate::uploads::UploadStore;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state, cheap to clone
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// In-process session store
    pub sessions: SessionStore,
    /// Product image storage
    pub uploads: UploadStore,
}

impl AppState {
    /// Connect the pool, run migrations and build the state
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let uploads = UploadStore::new(&config.upload_dir)?;

        Ok(Self {
            pool,
            sessions: SessionStore::new(),
            uploads,
        })
    }
}
