//! Class Rosters
//!
//! A roster is the aggregate that admission decisions are made against: a
//! class offering together with its pricing tiers, discount codes,
//! enrollments and waitlist. Stores hand out a roster together with a
//! transaction that holds the class lock, so every check made against the
//! roster still holds when the resulting changes commit.

use async_trait::async_trait;

use crate::domain::{
    admissions::records::{EnrollmentRecord, EnrollmentUuid, StudentUuid},
    classes::records::{ClassOfferingRecord, ClassUuid, PricingTierRecord, PricingTierUuid},
    discounts::records::DiscountCodeRecord,
    studios::records::StudioUuid,
    waitlist::records::{WaitlistEntryRecord, WaitlistEntryUuid},
};

mod changes;
mod errors;
pub(crate) mod executor;
pub mod memory;
pub mod postgres;

pub use changes::RosterChange;
pub use errors::StoreError;
pub use memory::MemoryRosterStore;
pub use postgres::PgRosterStore;

/// Class Roster
#[derive(Debug, Clone, PartialEq)]
pub struct ClassRoster {
    pub class: ClassOfferingRecord,
    pub tiers: Vec<PricingTierRecord>,
    pub discount_codes: Vec<DiscountCodeRecord>,
    pub enrollments: Vec<EnrollmentRecord>,
    pub waitlist: Vec<WaitlistEntryRecord>,
}

impl ClassRoster {
    #[must_use]
    pub fn new(class: ClassOfferingRecord) -> Self {
        Self {
            class,
            tiers: Vec::new(),
            discount_codes: Vec::new(),
            enrollments: Vec::new(),
            waitlist: Vec::new(),
        }
    }

    #[must_use]
    pub fn tier(&self, tier: PricingTierUuid) -> Option<&PricingTierRecord> {
        self.tiers.iter().find(|record| record.uuid == tier)
    }

    #[must_use]
    pub fn default_tier(&self) -> Option<&PricingTierRecord> {
        self.tiers.iter().find(|record| record.is_default)
    }

    #[must_use]
    pub fn enrollment(&self, enrollment: EnrollmentUuid) -> Option<&EnrollmentRecord> {
        self.enrollments
            .iter()
            .find(|record| record.uuid == enrollment)
    }

    #[must_use]
    pub fn enrollment_for(&self, student: StudentUuid) -> Option<&EnrollmentRecord> {
        self.enrollments
            .iter()
            .find(|record| record.student_uuid == student)
    }

    #[must_use]
    pub fn waitlist_entry(&self, entry: WaitlistEntryUuid) -> Option<&WaitlistEntryRecord> {
        self.waitlist.iter().find(|record| record.uuid == entry)
    }

    #[must_use]
    pub fn waitlist_entry_for(&self, student: StudentUuid) -> Option<&WaitlistEntryRecord> {
        self.waitlist
            .iter()
            .find(|record| record.student_uuid == student)
    }

    /// Waitlist entries by ascending position.
    #[must_use]
    pub fn ordered_waitlist(&self) -> Vec<&WaitlistEntryRecord> {
        let mut entries: Vec<&WaitlistEntryRecord> = self.waitlist.iter().collect();

        entries.sort_by_key(|entry| entry.position);

        entries
    }

    /// Position the next waitlist entry receives: one past the current highest.
    #[must_use]
    pub fn next_waitlist_position(&self) -> u64 {
        self.waitlist
            .iter()
            .map(|entry| entry.position)
            .max()
            .map_or(1, |position| position.saturating_add(1))
    }
}

/// Persistence for class rosters.
#[async_trait]
pub trait RosterStore: Send + Sync {
    type Transaction: RosterTransaction;

    /// Insert a new class offering.
    async fn create_class(
        &self,
        studio: StudioUuid,
        class: ClassOfferingRecord,
    ) -> Result<ClassOfferingRecord, StoreError>;

    /// Read a roster without locking it.
    async fn load_roster(
        &self,
        studio: StudioUuid,
        class: ClassUuid,
    ) -> Result<ClassRoster, StoreError>;

    /// Lock a class and read its roster.
    ///
    /// The lock is held until the returned transaction is committed or dropped.
    /// Dropping the transaction discards every applied change.
    async fn lock_roster(
        &self,
        studio: StudioUuid,
        class: ClassUuid,
    ) -> Result<(Self::Transaction, ClassRoster), StoreError>;

    /// Find the class an enrollment belongs to.
    async fn locate_enrollment(
        &self,
        studio: StudioUuid,
        enrollment: EnrollmentUuid,
    ) -> Result<ClassUuid, StoreError>;

    /// Find the class a waitlist entry belongs to.
    async fn locate_waitlist_entry(
        &self,
        studio: StudioUuid,
        entry: WaitlistEntryUuid,
    ) -> Result<ClassUuid, StoreError>;
}

/// An open unit of work against a locked roster.
#[async_trait]
pub trait RosterTransaction: Send {
    async fn apply(&mut self, change: RosterChange) -> Result<(), StoreError>;

    async fn commit(self) -> Result<(), StoreError>;
}
