//! Studios Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as};

use crate::domain::studios::{
    data::NewStudio,
    records::{StudioRecord, StudioUuid},
};

const CREATE_STUDIO_SQL: &str = include_str!("sql/create_studio.sql");
const GET_STUDIO_SQL: &str = include_str!("sql/get_studio.sql");

/// PostgreSQL-backed studios repository.
///
/// Studios sit above the row-level-security boundary, so this repository
/// works against the pool directly rather than a studio-scoped transaction.
#[derive(Debug, Clone)]
pub(crate) struct PgStudiosRepository {
    pool: PgPool,
}

impl PgStudiosRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn create_studio(
        &self,
        studio: NewStudio,
    ) -> Result<StudioRecord, sqlx::Error> {
        query_as::<Postgres, StudioRecord>(CREATE_STUDIO_SQL)
            .bind(studio.uuid.into_uuid())
            .bind(studio.name)
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn get_studio(&self, studio: StudioUuid) -> Result<StudioRecord, sqlx::Error> {
        query_as::<Postgres, StudioRecord>(GET_STUDIO_SQL)
            .bind(studio.into_uuid())
            .fetch_one(&self.pool)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for StudioRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: StudioUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
