//! Studio Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Studio UUID
pub type StudioUuid = TypedUuid<StudioRecord>;

/// Studio Record
#[derive(Debug, Clone)]
pub struct StudioRecord {
    /// Unique studio identifier.
    pub uuid: StudioUuid,

    /// Human-readable studio name.
    pub name: String,

    /// Studio creation timestamp.
    pub created_at: Timestamp,

    /// Last update timestamp.
    pub updated_at: Timestamp,

    /// Soft-delete timestamp when deleted.
    pub deleted_at: Option<Timestamp>,
}
