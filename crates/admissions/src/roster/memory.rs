//! In-memory roster store.
//!
//! Each class lives behind its own async mutex, which plays the part of the
//! row lock in the PostgreSQL store. Changes are staged on the transaction
//! and applied to a copy of the roster at commit time; the copy only replaces
//! the stored roster once every change has applied cleanly.

use std::sync::Arc;

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::{
    domain::{
        admissions::records::EnrollmentUuid,
        classes::records::{ClassOfferingRecord, ClassUuid},
        studios::records::StudioUuid,
        waitlist::records::WaitlistEntryUuid,
    },
    roster::{ClassRoster, RosterChange, RosterStore, RosterTransaction, StoreError},
};

#[derive(Debug)]
struct StoredClass {
    studio: StudioUuid,
    roster: ClassRoster,
}

#[derive(Debug, Default)]
struct Indexes {
    enrollments: FxHashMap<EnrollmentUuid, ClassUuid>,
    waitlist: FxHashMap<WaitlistEntryUuid, ClassUuid>,
}

#[derive(Debug, Default)]
struct State {
    classes: RwLock<FxHashMap<ClassUuid, Arc<Mutex<StoredClass>>>>,
    indexes: RwLock<Indexes>,
}

/// Roster store backed by process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRosterStore {
    state: Arc<State>,
}

impl MemoryRosterStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn class_slot(&self, class: ClassUuid) -> Result<Arc<Mutex<StoredClass>>, StoreError> {
        self.state
            .classes
            .read()
            .await
            .get(&class)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl RosterStore for MemoryRosterStore {
    type Transaction = MemoryRosterTransaction;

    async fn create_class(
        &self,
        studio: StudioUuid,
        class: ClassOfferingRecord,
    ) -> Result<ClassOfferingRecord, StoreError> {
        if class.capacity == 0 || class.enrolled_count > class.capacity {
            return Err(StoreError::InvalidData);
        }

        let mut classes = self.state.classes.write().await;

        if classes.contains_key(&class.uuid) {
            return Err(StoreError::AlreadyExists);
        }

        let mut record = class;
        record.studio_uuid = studio;

        classes.insert(
            record.uuid,
            Arc::new(Mutex::new(StoredClass {
                studio,
                roster: ClassRoster::new(record.clone()),
            })),
        );

        Ok(record)
    }

    async fn load_roster(
        &self,
        studio: StudioUuid,
        class: ClassUuid,
    ) -> Result<ClassRoster, StoreError> {
        let slot = self.class_slot(class).await?;
        let stored = slot.lock().await;

        if stored.studio != studio {
            return Err(StoreError::NotFound);
        }

        Ok(stored.roster.clone())
    }

    async fn lock_roster(
        &self,
        studio: StudioUuid,
        class: ClassUuid,
    ) -> Result<(Self::Transaction, ClassRoster), StoreError> {
        let slot = self.class_slot(class).await?;
        let guard = slot.lock_owned().await;

        if guard.studio != studio {
            return Err(StoreError::NotFound);
        }

        let roster = guard.roster.clone();

        let tx = MemoryRosterTransaction {
            guard,
            state: Arc::clone(&self.state),
            staged: Vec::new(),
        };

        Ok((tx, roster))
    }

    async fn locate_enrollment(
        &self,
        studio: StudioUuid,
        enrollment: EnrollmentUuid,
    ) -> Result<ClassUuid, StoreError> {
        let class = self
            .state
            .indexes
            .read()
            .await
            .enrollments
            .get(&enrollment)
            .copied()
            .ok_or(StoreError::NotFound)?;

        self.owned_by(studio, class).await
    }

    async fn locate_waitlist_entry(
        &self,
        studio: StudioUuid,
        entry: WaitlistEntryUuid,
    ) -> Result<ClassUuid, StoreError> {
        let class = self
            .state
            .indexes
            .read()
            .await
            .waitlist
            .get(&entry)
            .copied()
            .ok_or(StoreError::NotFound)?;

        self.owned_by(studio, class).await
    }
}

impl MemoryRosterStore {
    async fn owned_by(&self, studio: StudioUuid, class: ClassUuid) -> Result<ClassUuid, StoreError> {
        let slot = self.class_slot(class).await?;

        if slot.lock().await.studio == studio {
            Ok(class)
        } else {
            Err(StoreError::NotFound)
        }
    }
}

/// Transaction holding the lock on one in-memory class.
#[derive(Debug)]
pub struct MemoryRosterTransaction {
    guard: OwnedMutexGuard<StoredClass>,
    state: Arc<State>,
    staged: Vec<RosterChange>,
}

#[async_trait]
impl RosterTransaction for MemoryRosterTransaction {
    async fn apply(&mut self, change: RosterChange) -> Result<(), StoreError> {
        self.staged.push(change);

        Ok(())
    }

    async fn commit(self) -> Result<(), StoreError> {
        let Self {
            mut guard,
            state,
            staged,
        } = self;

        let mut roster = guard.roster.clone();
        let mut index_changes = Vec::with_capacity(staged.len());

        for change in staged {
            if let Some(index_change) = apply_change(&mut roster, change)? {
                index_changes.push(index_change);
            }
        }

        let mut indexes = state.indexes.write().await;
        let class = roster.class.uuid;

        for index_change in index_changes {
            match index_change {
                IndexChange::EnrollmentAdded(uuid) => {
                    indexes.enrollments.insert(uuid, class);
                }
                IndexChange::EnrollmentRemoved(uuid) => {
                    indexes.enrollments.remove(&uuid);
                }
                IndexChange::WaitlistAdded(uuid) => {
                    indexes.waitlist.insert(uuid, class);
                }
                IndexChange::WaitlistRemoved(uuid) => {
                    indexes.waitlist.remove(&uuid);
                }
            }
        }

        guard.roster = roster;

        Ok(())
    }
}

enum IndexChange {
    EnrollmentAdded(EnrollmentUuid),
    EnrollmentRemoved(EnrollmentUuid),
    WaitlistAdded(WaitlistEntryUuid),
    WaitlistRemoved(WaitlistEntryUuid),
}

/// Apply one change, enforcing the same constraints as the database schema.
fn apply_change(
    roster: &mut ClassRoster,
    change: RosterChange,
) -> Result<Option<IndexChange>, StoreError> {
    match change {
        RosterChange::InsertEnrollment(enrollment) => {
            if roster.enrollment(enrollment.uuid).is_some()
                || roster.enrollment_for(enrollment.student_uuid).is_some()
            {
                return Err(StoreError::AlreadyExists);
            }

            let uuid = enrollment.uuid;
            roster.enrollments.push(enrollment);

            Ok(Some(IndexChange::EnrollmentAdded(uuid)))
        }
        RosterChange::DeleteEnrollment(uuid) => {
            let before = roster.enrollments.len();
            roster.enrollments.retain(|record| record.uuid != uuid);

            if roster.enrollments.len() == before {
                return Err(StoreError::NotFound);
            }

            Ok(Some(IndexChange::EnrollmentRemoved(uuid)))
        }
        RosterChange::InsertWaitlistEntry(entry) => {
            if roster.waitlist_entry(entry.uuid).is_some()
                || roster.waitlist_entry_for(entry.student_uuid).is_some()
                || roster
                    .waitlist
                    .iter()
                    .any(|record| record.position == entry.position)
            {
                return Err(StoreError::AlreadyExists);
            }

            if entry.position == 0 {
                return Err(StoreError::InvalidData);
            }

            let uuid = entry.uuid;
            roster.waitlist.push(entry);

            Ok(Some(IndexChange::WaitlistAdded(uuid)))
        }
        RosterChange::DeleteWaitlistEntry(uuid) => {
            let before = roster.waitlist.len();
            roster.waitlist.retain(|record| record.uuid != uuid);

            if roster.waitlist.len() == before {
                return Err(StoreError::NotFound);
            }

            Ok(Some(IndexChange::WaitlistRemoved(uuid)))
        }
        RosterChange::SetEnrolledCount(count) => {
            if count > roster.class.capacity {
                return Err(StoreError::InvalidData);
            }

            roster.class.enrolled_count = count;

            Ok(None)
        }
        RosterChange::SetClassStatus(status) => {
            roster.class.status = status;

            Ok(None)
        }
        RosterChange::InsertPricingTier(tier) => {
            if roster.tier(tier.uuid).is_some()
                || (tier.is_default && roster.default_tier().is_some())
            {
                return Err(StoreError::AlreadyExists);
            }

            roster.tiers.push(tier);

            Ok(None)
        }
        RosterChange::UpdatePricingTier {
            tier,
            is_default,
            is_active,
        } => {
            if is_default
                && roster
                    .default_tier()
                    .is_some_and(|current| current.uuid != tier)
            {
                return Err(StoreError::AlreadyExists);
            }

            let record = roster
                .tiers
                .iter_mut()
                .find(|record| record.uuid == tier)
                .ok_or(StoreError::NotFound)?;

            record.is_default = is_default;
            record.is_active = is_active;

            Ok(None)
        }
        RosterChange::SetTierEnrollmentCount {
            tier,
            enrollment_count,
        } => {
            let record = roster
                .tiers
                .iter_mut()
                .find(|record| record.uuid == tier)
                .ok_or(StoreError::NotFound)?;

            record.enrollment_count = enrollment_count;

            Ok(None)
        }
        RosterChange::InsertDiscountCode(discount) => {
            if roster
                .discount_codes
                .iter()
                .any(|record| record.uuid == discount.uuid || record.code == discount.code)
            {
                return Err(StoreError::AlreadyExists);
            }

            roster.discount_codes.push(discount);

            Ok(None)
        }
        RosterChange::SetDiscountActive {
            discount,
            is_active,
        } => {
            let record = roster
                .discount_codes
                .iter_mut()
                .find(|record| record.uuid == discount)
                .ok_or(StoreError::NotFound)?;

            record.is_active = is_active;

            Ok(None)
        }
        RosterChange::SetDiscountUsageCount {
            discount,
            usage_count,
        } => {
            let record = roster
                .discount_codes
                .iter_mut()
                .find(|record| record.uuid == discount)
                .ok_or(StoreError::NotFound)?;

            if record.usage_limit > 0 && usage_count > record.usage_limit {
                return Err(StoreError::InvalidData);
            }

            record.usage_count = usage_count;

            Ok(None)
        }
    }
}
