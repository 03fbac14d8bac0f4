//! Waitlist Data

use crate::domain::{
    admissions::records::StudentUuid, classes::records::ClassUuid,
    waitlist::records::WaitlistEntryUuid,
};

/// New Waitlist Entry Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewWaitlistEntry {
    pub uuid: WaitlistEntryUuid,
    pub class_uuid: ClassUuid,
    pub student_uuid: StudentUuid,
    pub notifications_enabled: bool,
}
