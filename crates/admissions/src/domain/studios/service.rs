//! Studios service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;
use tracing::info;

use crate::domain::studios::{
    data::NewStudio,
    errors::StudiosServiceError,
    records::{StudioRecord, StudioUuid},
    repository::PgStudiosRepository,
};

#[derive(Debug, Clone)]
pub struct PgStudiosService {
    repository: PgStudiosRepository,
}

impl PgStudiosService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgStudiosRepository::new(pool),
        }
    }
}

#[async_trait]
impl StudiosService for PgStudiosService {
    #[tracing::instrument(
        name = "studios.service.create_studio",
        skip(self, studio),
        fields(studio_uuid = %studio.uuid),
        err
    )]
    async fn create_studio(&self, studio: NewStudio) -> Result<StudioRecord, StudiosServiceError> {
        if studio.name.trim().is_empty() {
            return Err(StudiosServiceError::MissingRequiredData);
        }

        let record = self.repository.create_studio(studio).await?;

        info!(studio_uuid = %record.uuid, "created studio");

        Ok(record)
    }

    async fn get_studio(&self, studio: StudioUuid) -> Result<StudioRecord, StudiosServiceError> {
        self.repository
            .get_studio(studio)
            .await
            .map_err(Into::into)
    }
}

#[automock]
#[async_trait]
/// Studio registration.
pub trait StudiosService: Send + Sync {
    /// Registers a new studio.
    async fn create_studio(&self, studio: NewStudio) -> Result<StudioRecord, StudiosServiceError>;

    /// Retrieves a studio that has not been deleted.
    async fn get_studio(&self, studio: StudioUuid) -> Result<StudioRecord, StudiosServiceError>;
}
