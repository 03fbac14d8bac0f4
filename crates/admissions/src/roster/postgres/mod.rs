//! PostgreSQL roster store.
//!
//! Every call runs in a studio-scoped transaction so row-level security keeps
//! studios apart. Locking a roster takes `FOR UPDATE` on the class row; all
//! writes to a class's children happen under that lock.

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{Postgres, Transaction, query, query_as, query_scalar};
use tracing::debug;
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        admissions::records::{EnrollmentRecord, EnrollmentUuid},
        classes::records::{ClassOfferingRecord, ClassUuid, PricingTierRecord},
        discounts::records::{DiscountCodeRecord, DiscountValue},
        studios::records::StudioUuid,
        waitlist::records::{WaitlistEntryRecord, WaitlistEntryUuid},
    },
    roster::{ClassRoster, RosterChange, RosterStore, RosterTransaction, StoreError},
};

mod rows;

use rows::to_i64;

const CREATE_CLASS_SQL: &str = include_str!("sql/create_class.sql");
const GET_CLASS_SQL: &str = include_str!("sql/get_class.sql");
const LOCK_CLASS_SQL: &str = include_str!("sql/lock_class.sql");
const LIST_PRICING_TIERS_SQL: &str = include_str!("sql/list_pricing_tiers.sql");
const LIST_DISCOUNT_CODES_SQL: &str = include_str!("sql/list_discount_codes.sql");
const LIST_ENROLLMENTS_SQL: &str = include_str!("sql/list_enrollments.sql");
const LIST_WAITLIST_ENTRIES_SQL: &str = include_str!("sql/list_waitlist_entries.sql");
const LOCATE_ENROLLMENT_SQL: &str = include_str!("sql/locate_enrollment.sql");
const LOCATE_WAITLIST_ENTRY_SQL: &str = include_str!("sql/locate_waitlist_entry.sql");
const INSERT_ENROLLMENT_SQL: &str = include_str!("sql/insert_enrollment.sql");
const DELETE_ENROLLMENT_SQL: &str = include_str!("sql/delete_enrollment.sql");
const INSERT_WAITLIST_ENTRY_SQL: &str = include_str!("sql/insert_waitlist_entry.sql");
const DELETE_WAITLIST_ENTRY_SQL: &str = include_str!("sql/delete_waitlist_entry.sql");
const UPDATE_ENROLLED_COUNT_SQL: &str = include_str!("sql/update_enrolled_count.sql");
const UPDATE_CLASS_STATUS_SQL: &str = include_str!("sql/update_class_status.sql");
const INSERT_PRICING_TIER_SQL: &str = include_str!("sql/insert_pricing_tier.sql");
const UPDATE_PRICING_TIER_SQL: &str = include_str!("sql/update_pricing_tier.sql");
const UPDATE_TIER_ENROLLMENT_COUNT_SQL: &str =
    include_str!("sql/update_tier_enrollment_count.sql");
const INSERT_DISCOUNT_CODE_SQL: &str = include_str!("sql/insert_discount_code.sql");
const UPDATE_DISCOUNT_ACTIVE_SQL: &str = include_str!("sql/update_discount_active.sql");
const UPDATE_DISCOUNT_USAGE_COUNT_SQL: &str = include_str!("sql/update_discount_usage_count.sql");

/// Roster store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgRosterStore {
    db: Db,
}

impl PgRosterStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RosterStore for PgRosterStore {
    type Transaction = PgRosterTransaction;

    async fn create_class(
        &self,
        studio: StudioUuid,
        class: ClassOfferingRecord,
    ) -> Result<ClassOfferingRecord, StoreError> {
        let mut tx = self.db.begin_studio_transaction(studio).await?;

        let record = query_as::<Postgres, ClassOfferingRecord>(CREATE_CLASS_SQL)
            .bind(class.uuid.into_uuid())
            .bind(class.title)
            .bind(to_i64(class.capacity)?)
            .bind(to_i64(class.enrolled_count)?)
            .bind(class.status.as_str())
            .bind(SqlxTimestamp::from(class.created_at))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn load_roster(
        &self,
        studio: StudioUuid,
        class: ClassUuid,
    ) -> Result<ClassRoster, StoreError> {
        let mut tx = self.db.begin_studio_transaction(studio).await?;

        let roster = read_roster(&mut tx, class, GET_CLASS_SQL).await?;

        tx.commit().await?;

        Ok(roster)
    }

    async fn lock_roster(
        &self,
        studio: StudioUuid,
        class: ClassUuid,
    ) -> Result<(Self::Transaction, ClassRoster), StoreError> {
        let mut tx = self.db.begin_studio_transaction(studio).await?;

        let roster = read_roster(&mut tx, class, LOCK_CLASS_SQL).await?;

        Ok((PgRosterTransaction { tx, class }, roster))
    }

    async fn locate_enrollment(
        &self,
        studio: StudioUuid,
        enrollment: EnrollmentUuid,
    ) -> Result<ClassUuid, StoreError> {
        self.locate(studio, LOCATE_ENROLLMENT_SQL, enrollment.into_uuid())
            .await
    }

    async fn locate_waitlist_entry(
        &self,
        studio: StudioUuid,
        entry: WaitlistEntryUuid,
    ) -> Result<ClassUuid, StoreError> {
        self.locate(studio, LOCATE_WAITLIST_ENTRY_SQL, entry.into_uuid())
            .await
    }
}

impl PgRosterStore {
    async fn locate(
        &self,
        studio: StudioUuid,
        sql: &'static str,
        uuid: Uuid,
    ) -> Result<ClassUuid, StoreError> {
        let mut tx = self.db.begin_studio_transaction(studio).await?;

        let class: Uuid = query_scalar(sql).bind(uuid).fetch_one(&mut *tx).await?;

        tx.commit().await?;

        Ok(ClassUuid::from_uuid(class))
    }
}

async fn read_roster(
    tx: &mut Transaction<'static, Postgres>,
    class: ClassUuid,
    class_sql: &'static str,
) -> Result<ClassRoster, StoreError> {
    let uuid = class.into_uuid();

    let class = query_as::<Postgres, ClassOfferingRecord>(class_sql)
        .bind(uuid)
        .fetch_one(&mut **tx)
        .await?;

    let tiers = query_as::<Postgres, PricingTierRecord>(LIST_PRICING_TIERS_SQL)
        .bind(uuid)
        .fetch_all(&mut **tx)
        .await?;

    let discount_codes = query_as::<Postgres, DiscountCodeRecord>(LIST_DISCOUNT_CODES_SQL)
        .bind(uuid)
        .fetch_all(&mut **tx)
        .await?;

    let enrollments = query_as::<Postgres, EnrollmentRecord>(LIST_ENROLLMENTS_SQL)
        .bind(uuid)
        .fetch_all(&mut **tx)
        .await?;

    let waitlist = query_as::<Postgres, WaitlistEntryRecord>(LIST_WAITLIST_ENTRIES_SQL)
        .bind(uuid)
        .fetch_all(&mut **tx)
        .await?;

    Ok(ClassRoster {
        class,
        tiers,
        discount_codes,
        enrollments,
        waitlist,
    })
}

/// Transaction holding the row lock on one class.
pub struct PgRosterTransaction {
    tx: Transaction<'static, Postgres>,
    class: ClassUuid,
}

impl PgRosterTransaction {
    async fn execute_one(
        &mut self,
        statement: sqlx::query::Query<'_, Postgres, sqlx::postgres::PgArguments>,
    ) -> Result<(), StoreError> {
        let rows_affected = statement.execute(&mut *self.tx).await?.rows_affected();

        if rows_affected == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl RosterTransaction for PgRosterTransaction {
    async fn apply(&mut self, change: RosterChange) -> Result<(), StoreError> {
        debug!(class_uuid = %self.class, change = change.kind(), "applying roster change");

        let class = self.class.into_uuid();

        match change {
            RosterChange::InsertEnrollment(enrollment) => {
                let statement = query(INSERT_ENROLLMENT_SQL)
                    .bind(enrollment.uuid.into_uuid())
                    .bind(enrollment.class_uuid.into_uuid())
                    .bind(enrollment.student_uuid.into_uuid())
                    .bind(enrollment.pricing_tier_uuid.map(|tier| tier.into_uuid()))
                    .bind(enrollment.discount_code_uuid.map(|code| code.into_uuid()))
                    .bind(to_i64(enrollment.amount_paid)?)
                    .bind(enrollment.status.as_str())
                    .bind(enrollment.payment_status.as_str())
                    .bind(enrollment.emergency_contact)
                    .bind(SqlxTimestamp::from(enrollment.enrolled_at));

                self.execute_one(statement).await
            }
            RosterChange::DeleteEnrollment(enrollment) => {
                self.execute_one(query(DELETE_ENROLLMENT_SQL).bind(enrollment.into_uuid()))
                    .await
            }
            RosterChange::InsertWaitlistEntry(entry) => {
                let statement = query(INSERT_WAITLIST_ENTRY_SQL)
                    .bind(entry.uuid.into_uuid())
                    .bind(entry.class_uuid.into_uuid())
                    .bind(entry.student_uuid.into_uuid())
                    .bind(to_i64(entry.position)?)
                    .bind(entry.notifications_enabled)
                    .bind(SqlxTimestamp::from(entry.created_at));

                self.execute_one(statement).await
            }
            RosterChange::DeleteWaitlistEntry(entry) => {
                self.execute_one(query(DELETE_WAITLIST_ENTRY_SQL).bind(entry.into_uuid()))
                    .await
            }
            RosterChange::SetEnrolledCount(count) => {
                let statement = query(UPDATE_ENROLLED_COUNT_SQL)
                    .bind(class)
                    .bind(to_i64(count)?);

                self.execute_one(statement).await
            }
            RosterChange::SetClassStatus(status) => {
                let statement = query(UPDATE_CLASS_STATUS_SQL)
                    .bind(class)
                    .bind(status.as_str());

                self.execute_one(statement).await
            }
            RosterChange::InsertPricingTier(tier) => {
                let statement = query(INSERT_PRICING_TIER_SQL)
                    .bind(tier.uuid.into_uuid())
                    .bind(tier.class_uuid.into_uuid())
                    .bind(tier.name)
                    .bind(to_i64(tier.price)?)
                    .bind(tier.is_default)
                    .bind(tier.is_active)
                    .bind(to_i64(tier.enrollment_count)?)
                    .bind(SqlxTimestamp::from(tier.created_at));

                self.execute_one(statement).await
            }
            RosterChange::UpdatePricingTier {
                tier,
                is_default,
                is_active,
            } => {
                let statement = query(UPDATE_PRICING_TIER_SQL)
                    .bind(tier.into_uuid())
                    .bind(is_default)
                    .bind(is_active);

                self.execute_one(statement).await
            }
            RosterChange::SetTierEnrollmentCount {
                tier,
                enrollment_count,
            } => {
                let statement = query(UPDATE_TIER_ENROLLMENT_COUNT_SQL)
                    .bind(tier.into_uuid())
                    .bind(to_i64(enrollment_count)?);

                self.execute_one(statement).await
            }
            RosterChange::InsertDiscountCode(discount) => {
                let (percentage, amount) = match discount.value {
                    DiscountValue::PercentageOff { percentage } => (Some(percentage), None),
                    DiscountValue::AmountOff { amount } => (None, Some(to_i64(amount)?)),
                };

                let statement = query(INSERT_DISCOUNT_CODE_SQL)
                    .bind(discount.uuid.into_uuid())
                    .bind(discount.class_uuid.into_uuid())
                    .bind(discount.code)
                    .bind(discount.value.to_str())
                    .bind(percentage)
                    .bind(amount)
                    .bind(discount.expires_at.map(SqlxTimestamp::from))
                    .bind(to_i64(discount.usage_limit)?)
                    .bind(to_i64(discount.usage_count)?)
                    .bind(discount.is_active)
                    .bind(SqlxTimestamp::from(discount.created_at));

                self.execute_one(statement).await
            }
            RosterChange::SetDiscountActive {
                discount,
                is_active,
            } => {
                let statement = query(UPDATE_DISCOUNT_ACTIVE_SQL)
                    .bind(discount.into_uuid())
                    .bind(is_active);

                self.execute_one(statement).await
            }
            RosterChange::SetDiscountUsageCount {
                discount,
                usage_count,
            } => {
                let statement = query(UPDATE_DISCOUNT_USAGE_COUNT_SQL)
                    .bind(discount.into_uuid())
                    .bind(to_i64(usage_count)?);

                self.execute_one(statement).await
            }
        }
    }

    async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use jiff::Timestamp;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        clock::{Clock, SystemClock},
        config::AdmissionsConfig,
        domain::{
            admissions::{
                AdmissionController, AdmissionError, AdmissionsService,
                data::{NewEnrollment, Promotion},
                records::{EnrollmentStatus, PaymentStatus, StudentUuid},
            },
            classes::{
                CatalogService, ClassCatalog,
                data::NewClassOffering,
                records::{ClassStatus, PricingTierUuid},
            },
            discounts::{DiscountError, data::NewDiscountCode, records::DiscountCodeUuid},
            waitlist::{WaitlistManager, WaitlistService, data::NewWaitlistEntry},
        },
        test::TestContext,
    };

    use super::*;

    fn class(capacity: u64) -> ClassOfferingRecord {
        ClassOfferingRecord {
            uuid: ClassUuid::new(),
            studio_uuid: StudioUuid::new(),
            title: "Raku Firing".to_string(),
            capacity,
            enrolled_count: 0,
            status: ClassStatus::Published,
            created_at: Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn roster_round_trips_through_postgres() -> TestResult {
        let ctx = TestContext::new().await;
        let store = PgRosterStore::new(ctx.app_db.clone());
        let created = store.create_class(ctx.studio_uuid, class(4)).await?;

        let tier = PricingTierRecord {
            uuid: PricingTierUuid::new(),
            class_uuid: created.uuid,
            name: "Standard".to_string(),
            price: 10_000,
            is_default: true,
            is_active: true,
            enrollment_count: 0,
            created_at: Timestamp::now(),
        };

        let discount = DiscountCodeRecord {
            uuid: DiscountCodeUuid::new(),
            class_uuid: created.uuid,
            code: "SPRING".to_string(),
            value: DiscountValue::PercentageOff {
                percentage: Decimal::new(125, 1),
            },
            expires_at: None,
            usage_limit: 5,
            usage_count: 0,
            is_active: true,
            created_at: Timestamp::now(),
        };

        let enrollment = EnrollmentRecord {
            uuid: EnrollmentUuid::new(),
            class_uuid: created.uuid,
            student_uuid: StudentUuid::new(),
            pricing_tier_uuid: Some(tier.uuid),
            discount_code_uuid: Some(discount.uuid),
            amount_paid: 8_750,
            status: EnrollmentStatus::Active,
            payment_status: PaymentStatus::Pending,
            emergency_contact: Some("Ada, 555-0100".to_string()),
            enrolled_at: Timestamp::now(),
        };

        let (mut tx, _) = store.lock_roster(ctx.studio_uuid, created.uuid).await?;

        for change in [
            RosterChange::InsertPricingTier(tier.clone()),
            RosterChange::InsertDiscountCode(discount.clone()),
            RosterChange::InsertEnrollment(enrollment.clone()),
            RosterChange::SetEnrolledCount(1),
            RosterChange::SetTierEnrollmentCount {
                tier: tier.uuid,
                enrollment_count: 1,
            },
            RosterChange::SetDiscountUsageCount {
                discount: discount.uuid,
                usage_count: 1,
            },
        ] {
            tx.apply(change).await?;
        }

        tx.commit().await?;

        let roster = store.load_roster(ctx.studio_uuid, created.uuid).await?;

        assert_eq!(roster.class.enrolled_count, 1);
        assert_eq!(roster.tiers.len(), 1);
        assert_eq!(roster.tiers[0].enrollment_count, 1);
        assert_eq!(roster.discount_codes[0].value, discount.value);
        assert_eq!(roster.discount_codes[0].usage_count, 1);
        assert_eq!(roster.enrollments[0].uuid, enrollment.uuid);
        assert_eq!(roster.enrollments[0].amount_paid, 8_750);
        assert_eq!(
            store
                .locate_enrollment(ctx.studio_uuid, enrollment.uuid)
                .await?,
            created.uuid
        );

        Ok(())
    }

    #[tokio::test]
    async fn capacity_check_constraint_maps_to_invalid_data() -> TestResult {
        let ctx = TestContext::new().await;
        let store = PgRosterStore::new(ctx.app_db.clone());
        let created = store.create_class(ctx.studio_uuid, class(1)).await?;

        let (mut tx, _) = store.lock_roster(ctx.studio_uuid, created.uuid).await?;
        let result = tx.apply(RosterChange::SetEnrolledCount(2)).await;

        assert!(
            matches!(result, Err(StoreError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn classes_are_invisible_to_other_studios() -> TestResult {
        let ctx = TestContext::new().await;
        let store = PgRosterStore::new(ctx.app_db.clone());
        let created = store.create_class(ctx.studio_uuid, class(2)).await?;

        let other = ctx.create_studio("Other Studio").await;
        let result = store.load_roster(other, created.uuid).await;

        assert!(
            matches!(result, Err(StoreError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn dropped_transaction_rolls_back() -> TestResult {
        let ctx = TestContext::new().await;
        let store = PgRosterStore::new(ctx.app_db.clone());
        let created = store.create_class(ctx.studio_uuid, class(2)).await?;

        {
            let (mut tx, _) = store.lock_roster(ctx.studio_uuid, created.uuid).await?;
            tx.apply(RosterChange::SetClassStatus(ClassStatus::Cancelled))
                .await?;
        }

        let roster = store.load_roster(ctx.studio_uuid, created.uuid).await?;

        assert_eq!(roster.class.status, ClassStatus::Published);

        Ok(())
    }

    fn services(
        ctx: &TestContext,
    ) -> (
        ClassCatalog<PgRosterStore>,
        Arc<AdmissionController<PgRosterStore>>,
        WaitlistManager<PgRosterStore>,
    ) {
        let store = PgRosterStore::new(ctx.app_db.clone());
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let config = AdmissionsConfig::default();

        (
            ClassCatalog::new(store.clone(), clock.clone(), config),
            Arc::new(AdmissionController::new(store.clone(), clock.clone(), config)),
            WaitlistManager::new(store, clock, config),
        )
    }

    async fn published_class(
        catalog: &ClassCatalog<PgRosterStore>,
        studio: StudioUuid,
        capacity: u64,
    ) -> TestResult<ClassUuid> {
        let class = catalog
            .create_class(
                studio,
                NewClassOffering {
                    uuid: ClassUuid::new(),
                    title: "Raku Firing".to_string(),
                    capacity,
                    status: ClassStatus::Published,
                },
            )
            .await?;

        Ok(class.uuid)
    }

    fn enrollment(class: ClassUuid, code: Option<&str>) -> NewEnrollment {
        NewEnrollment {
            uuid: EnrollmentUuid::new(),
            class_uuid: class,
            student_uuid: StudentUuid::new(),
            pricing_tier_uuid: None,
            discount_code: code.map(str::to_string),
            emergency_contact: None,
        }
    }

    async fn admit_concurrently(
        admissions: &Arc<AdmissionController<PgRosterStore>>,
        studio: StudioUuid,
        requests: Vec<NewEnrollment>,
    ) -> TestResult<Vec<Result<EnrollmentRecord, AdmissionError>>> {
        let handles: Vec<_> = requests
            .into_iter()
            .map(|request| {
                let admissions = Arc::clone(admissions);

                tokio::spawn(async move { admissions.admit(studio, request).await })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());

        for handle in handles {
            results.push(handle.await?);
        }

        Ok(results)
    }

    #[tokio::test]
    async fn concurrent_admissions_never_exceed_capacity() -> TestResult {
        let ctx = TestContext::new().await;
        let (catalog, admissions, _) = services(&ctx);
        let class = published_class(&catalog, ctx.studio_uuid, 2).await?;

        let requests = (0..3).map(|_| enrollment(class, None)).collect();
        let results = admit_concurrently(&admissions, ctx.studio_uuid, requests).await?;

        let admitted = results.iter().filter(|result| result.is_ok()).count();
        let full = results
            .iter()
            .filter(|result| matches!(result, Err(AdmissionError::ClassFull)))
            .count();

        assert_eq!((admitted, full), (2, 1), "unexpected outcomes: {results:?}");

        let roster = catalog.get_roster(ctx.studio_uuid, class).await?;

        assert_eq!(roster.enrollments.len(), 2);
        assert_eq!(roster.class.enrolled_count, 2);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_redemptions_respect_the_usage_limit() -> TestResult {
        let ctx = TestContext::new().await;
        let (catalog, admissions, _) = services(&ctx);
        let class = published_class(&catalog, ctx.studio_uuid, 10).await?;

        catalog
            .add_discount_code(
                ctx.studio_uuid,
                class,
                NewDiscountCode {
                    uuid: DiscountCodeUuid::new(),
                    code: "pair".to_string(),
                    value: DiscountValue::PercentageOff {
                        percentage: Decimal::from(50),
                    },
                    expires_at: None,
                    usage_limit: 2,
                },
            )
            .await?;

        let requests = (0..5).map(|_| enrollment(class, Some("PAIR"))).collect();
        let results = admit_concurrently(&admissions, ctx.studio_uuid, requests).await?;

        let admitted = results.iter().filter(|result| result.is_ok()).count();
        let exhausted = results
            .iter()
            .filter(|result| {
                matches!(
                    result,
                    Err(AdmissionError::Discount(DiscountError::LimitReached))
                )
            })
            .count();

        assert_eq!((admitted, exhausted), (2, 3), "unexpected outcomes: {results:?}");

        let roster = catalog.get_roster(ctx.studio_uuid, class).await?;

        assert_eq!(roster.discount_codes[0].usage_count, 2);
        assert_eq!(roster.class.enrolled_count, 2);

        Ok(())
    }

    #[tokio::test]
    async fn promotion_takes_the_head_of_the_queue_into_a_freed_seat() -> TestResult {
        let ctx = TestContext::new().await;
        let (catalog, admissions, waitlist) = services(&ctx);
        let class = published_class(&catalog, ctx.studio_uuid, 1).await?;

        let seated = admissions
            .admit(ctx.studio_uuid, enrollment(class, None))
            .await?;

        let mut entries = Vec::new();

        for _ in 0..2 {
            entries.push(
                waitlist
                    .enqueue(
                        ctx.studio_uuid,
                        NewWaitlistEntry {
                            uuid: WaitlistEntryUuid::new(),
                            class_uuid: class,
                            student_uuid: StudentUuid::new(),
                            notifications_enabled: true,
                        },
                    )
                    .await?,
            );
        }

        let promotion = || Promotion {
            enrollment_uuid: EnrollmentUuid::new(),
            pricing_tier_uuid: None,
            discount_code: None,
        };

        let result = waitlist
            .promote(ctx.studio_uuid, entries[0].uuid, promotion())
            .await;
        assert!(
            matches!(result, Err(AdmissionError::ClassFull)),
            "expected ClassFull, got {result:?}"
        );

        admissions.remove(ctx.studio_uuid, seated.uuid).await?;

        let result = waitlist
            .promote(ctx.studio_uuid, entries[1].uuid, promotion())
            .await;
        assert!(
            matches!(result, Err(AdmissionError::NotFirstInLine)),
            "expected NotFirstInLine, got {result:?}"
        );

        let promoted = waitlist
            .promote(ctx.studio_uuid, entries[0].uuid, promotion())
            .await?;

        assert_eq!(promoted.student_uuid, entries[0].student_uuid);

        let queue: Vec<(WaitlistEntryUuid, u64)> = waitlist
            .peek_queue(ctx.studio_uuid, class)
            .await?
            .iter()
            .map(|entry| (entry.uuid, entry.position))
            .collect();
        assert_eq!(queue, vec![(entries[1].uuid, 2)]);

        let roster = catalog.get_roster(ctx.studio_uuid, class).await?;
        assert_eq!(roster.class.enrolled_count, 1);
        assert_eq!(roster.enrollments.len(), 1);
        assert_eq!(roster.enrollments[0].uuid, promoted.uuid);

        Ok(())
    }
}
