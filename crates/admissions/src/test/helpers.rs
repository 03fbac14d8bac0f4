//! Test Helpers
//!
//! Engine-level fixtures run against the in-memory roster store so that
//! admission rules can be exercised without a database.

use std::sync::Arc;

use jiff::Timestamp;
use rust_decimal::Decimal;
use testresult::TestResult;

use crate::{
    clock::FixedClock,
    config::AdmissionsConfig,
    domain::{
        admissions::{
            AdmissionController, SeatRequest, plan_admission,
            records::{EnrollmentRecord, EnrollmentUuid, StudentUuid},
        },
        classes::{
            CatalogError, CatalogService, ClassCatalog,
            data::{NewClassOffering, NewPricingTier},
            records::{ClassStatus, ClassUuid, PricingTierRecord, PricingTierUuid},
        },
        discounts::{
            data::NewDiscountCode,
            records::{DiscountCodeRecord, DiscountCodeUuid, DiscountValue},
        },
        studios::records::StudioUuid,
        waitlist::WaitlistManager,
    },
    roster::{ClassRoster, MemoryRosterStore, RosterChange, RosterStore, RosterTransaction},
};

/// A studio with one published class in a fresh in-memory store.
pub(crate) struct Fixture {
    pub studio: StudioUuid,
    pub class: ClassUuid,
    pub now: Timestamp,
    pub store: MemoryRosterStore,
}

impl Fixture {
    pub(crate) async fn with_capacity(capacity: u64) -> TestResult<Self> {
        let now = Timestamp::from_second(1_767_225_600)?;

        let mut fixture = Self {
            studio: StudioUuid::new(),
            class: ClassUuid::new(),
            now,
            store: MemoryRosterStore::new(),
        };

        fixture.class = fixture
            .catalog()
            .create_class(
                fixture.studio,
                NewClassOffering {
                    uuid: fixture.class,
                    title: "Wheel Throwing".to_string(),
                    capacity,
                    status: ClassStatus::Published,
                },
            )
            .await?
            .uuid;

        Ok(fixture)
    }

    fn clock(&self) -> Arc<FixedClock> {
        Arc::new(FixedClock::new(self.now))
    }

    pub(crate) fn admissions(&self) -> AdmissionController<MemoryRosterStore> {
        AdmissionController::new(self.store.clone(), self.clock(), AdmissionsConfig::default())
    }

    pub(crate) fn waitlist(&self) -> WaitlistManager<MemoryRosterStore> {
        WaitlistManager::new(self.store.clone(), self.clock(), AdmissionsConfig::default())
    }

    pub(crate) fn catalog(&self) -> ClassCatalog<MemoryRosterStore> {
        ClassCatalog::new(self.store.clone(), self.clock(), AdmissionsConfig::default())
    }

    pub(crate) async fn roster(&self) -> Result<ClassRoster, CatalogError> {
        self.catalog().get_roster(self.studio, self.class).await
    }

    pub(crate) async fn add_tier(
        &self,
        name: &str,
        price: u64,
    ) -> Result<PricingTierRecord, CatalogError> {
        self.catalog()
            .add_pricing_tier(
                self.studio,
                self.class,
                NewPricingTier {
                    uuid: PricingTierUuid::new(),
                    name: name.to_string(),
                    price,
                    is_default: false,
                },
            )
            .await
    }

    pub(crate) async fn add_code(
        &self,
        discount: NewDiscountCode,
    ) -> Result<DiscountCodeRecord, CatalogError> {
        self.catalog()
            .add_discount_code(self.studio, self.class, discount)
            .await
    }

    /// Enroll a student by writing the enrollment and seat count only, leaving
    /// any waitlist entry for the student in place.
    pub(crate) async fn seat_directly(
        &self,
        student: StudentUuid,
    ) -> TestResult<EnrollmentRecord> {
        let (mut tx, roster) = self.store.lock_roster(self.studio, self.class).await?;

        let (record, changes) = plan_admission(
            &roster,
            self.now,
            SeatRequest {
                enrollment_uuid: EnrollmentUuid::new(),
                student_uuid: student,
                pricing_tier_uuid: None,
                discount_code: None,
                emergency_contact: None,
            },
        )?;

        for change in changes {
            if !matches!(change, RosterChange::DeleteWaitlistEntry(_)) {
                tx.apply(change).await?;
            }
        }

        tx.commit().await?;

        Ok(record)
    }
}

/// A percentage code with no expiry.
pub(crate) fn percentage_code(code: &str, percentage: u32, usage_limit: u64) -> NewDiscountCode {
    NewDiscountCode {
        uuid: DiscountCodeUuid::new(),
        code: code.to_string(),
        value: DiscountValue::PercentageOff {
            percentage: Decimal::from(percentage),
        },
        expires_at: None,
        usage_limit,
    }
}
