//! Studio Data

use crate::domain::studios::records::StudioUuid;

/// New Studio Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudio {
    /// UUID to assign to the studio row.
    pub uuid: StudioUuid,

    /// Studio display name.
    pub name: String,
}
