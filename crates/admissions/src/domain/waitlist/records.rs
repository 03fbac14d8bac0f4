//! Waitlist Records

use jiff::Timestamp;

use crate::{
    domain::{admissions::records::StudentUuid, classes::records::ClassUuid},
    uuids::TypedUuid,
};

/// Waitlist Entry UUID
pub type WaitlistEntryUuid = TypedUuid<WaitlistEntryRecord>;

/// Waitlist Entry Record
#[derive(Debug, Clone, PartialEq)]
pub struct WaitlistEntryRecord {
    pub uuid: WaitlistEntryUuid,
    pub class_uuid: ClassUuid,
    pub student_uuid: StudentUuid,

    /// Issue-order position. Unique within the class and never renumbered, so
    /// positions may have gaps after removals.
    pub position: u64,

    pub notifications_enabled: bool,
    pub created_at: Timestamp,
}
