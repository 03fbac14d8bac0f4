//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    clock::{Clock, SystemClock},
    config::AdmissionsConfig,
    database::{self, Db},
    domain::{
        admissions::{AdmissionController, AdmissionsService},
        classes::{CatalogService, ClassCatalog},
        studios::{PgStudiosService, StudiosService},
        waitlist::{WaitlistManager, WaitlistService},
    },
    roster::PgRosterStore,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// Services wired to a shared Postgres pool.
#[derive(Clone)]
pub struct AppContext {
    pub studios: Arc<dyn StudiosService>,
    pub catalog: Arc<dyn CatalogService>,
    pub admissions: Arc<dyn AdmissionsService>,
    pub waitlist: Arc<dyn WaitlistService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        config: AdmissionsConfig,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let store = PgRosterStore::new(Db::new(pool.clone()));

        Ok(Self {
            studios: Arc::new(PgStudiosService::new(pool)),
            catalog: Arc::new(ClassCatalog::new(store.clone(), clock.clone(), config)),
            admissions: Arc::new(AdmissionController::new(
                store.clone(),
                clock.clone(),
                config,
            )),
            waitlist: Arc::new(WaitlistManager::new(store, clock, config)),
        })
    }
}
