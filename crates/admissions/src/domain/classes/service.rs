//! Class catalog service.
//!
//! Staff-facing configuration of class offerings, pricing tiers and discount
//! codes. Writes to an existing class go through the same locked roster as
//! admissions, so a tier or code change never interleaves with a seat being
//! granted.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rust_decimal::Decimal;
use tracing::info;

use crate::{
    clock::Clock,
    config::AdmissionsConfig,
    domain::{
        classes::{
            data::{NewClassOffering, NewPricingTier},
            errors::CatalogError,
            records::{
                ClassOfferingRecord, ClassStatus, ClassUuid, PricingTierRecord, PricingTierUuid,
            },
        },
        discounts::{
            data::NewDiscountCode,
            is_valid_code, normalize_code,
            records::{DiscountCodeRecord, DiscountCodeUuid, DiscountValue},
        },
        studios::records::StudioUuid,
    },
    roster::{
        ClassRoster, RosterChange, RosterStore, StoreError,
        executor::{Plan, RosterExecutor},
    },
};

/// Catalog of class offerings backed by a roster store.
#[derive(Debug, Clone)]
pub struct ClassCatalog<S> {
    executor: RosterExecutor<S>,
}

impl<S: RosterStore> ClassCatalog<S> {
    #[must_use]
    pub fn new(store: S, clock: Arc<dyn Clock>, config: AdmissionsConfig) -> Self {
        Self {
            executor: RosterExecutor::new(store, clock, config),
        }
    }
}

#[async_trait]
impl<S: RosterStore> CatalogService for ClassCatalog<S> {
    #[tracing::instrument(
        name = "catalog.service.create_class",
        skip(self, class),
        fields(studio_uuid = %studio, class_uuid = %class.uuid, capacity = class.capacity),
        err
    )]
    async fn create_class(
        &self,
        studio: StudioUuid,
        class: NewClassOffering,
    ) -> Result<ClassOfferingRecord, CatalogError> {
        if class.capacity == 0 {
            return Err(CatalogError::InvalidCapacity);
        }

        let title = class.title.trim();

        if title.is_empty() {
            return Err(CatalogError::EmptyTitle);
        }

        let record = ClassOfferingRecord {
            uuid: class.uuid,
            studio_uuid: studio,
            title: title.to_string(),
            capacity: class.capacity,
            enrolled_count: 0,
            status: class.status,
            created_at: self.executor.now(),
        };

        let created = self.executor.store().create_class(studio, record).await?;

        info!(class_uuid = %created.uuid, "created class");

        Ok(created)
    }

    #[tracing::instrument(
        name = "catalog.service.set_class_status",
        skip(self),
        fields(studio_uuid = %studio, class_uuid = %class, status = status.as_str()),
        err
    )]
    async fn set_class_status(
        &self,
        studio: StudioUuid,
        class: ClassUuid,
        status: ClassStatus,
    ) -> Result<ClassOfferingRecord, CatalogError> {
        self.executor
            .run(studio, class, |roster, _| {
                let mut updated = roster.class.clone();
                updated.status = status;

                Ok(Plan::commit(
                    vec![RosterChange::SetClassStatus(status)],
                    updated,
                ))
            })
            .await
    }

    #[tracing::instrument(
        name = "catalog.service.add_pricing_tier",
        skip(self, tier),
        fields(
            studio_uuid = %studio,
            class_uuid = %class,
            tier_uuid = %tier.uuid,
            is_default = tier.is_default
        ),
        err
    )]
    async fn add_pricing_tier(
        &self,
        studio: StudioUuid,
        class: ClassUuid,
        tier: NewPricingTier,
    ) -> Result<PricingTierRecord, CatalogError> {
        let record = self
            .executor
            .run(studio, class, |roster, now| plan_add_tier(roster, now, &tier))
            .await?;

        info!(tier_uuid = %record.uuid, price = record.price, "added pricing tier");

        Ok(record)
    }

    #[tracing::instrument(
        name = "catalog.service.deactivate_pricing_tier",
        skip(self),
        fields(studio_uuid = %studio, class_uuid = %class, tier_uuid = %tier),
        err
    )]
    async fn deactivate_pricing_tier(
        &self,
        studio: StudioUuid,
        class: ClassUuid,
        tier: PricingTierUuid,
    ) -> Result<PricingTierRecord, CatalogError> {
        self.executor
            .run(studio, class, |roster, _| {
                let mut record = roster
                    .tier(tier)
                    .cloned()
                    .ok_or(CatalogError::TierNotFound)?;

                record.is_active = false;
                record.is_default = false;

                Ok(Plan::commit(
                    vec![RosterChange::UpdatePricingTier {
                        tier,
                        is_default: false,
                        is_active: false,
                    }],
                    record,
                ))
            })
            .await
    }

    #[tracing::instrument(
        name = "catalog.service.add_discount_code",
        skip(self, discount),
        fields(
            studio_uuid = %studio,
            class_uuid = %class,
            discount_uuid = %discount.uuid,
            kind = discount.value.to_str()
        ),
        err
    )]
    async fn add_discount_code(
        &self,
        studio: StudioUuid,
        class: ClassUuid,
        discount: NewDiscountCode,
    ) -> Result<DiscountCodeRecord, CatalogError> {
        let code = normalize_code(&discount.code);

        if code.is_empty() {
            return Err(CatalogError::EmptyCode);
        }

        if !is_valid_code(&code) {
            return Err(CatalogError::InvalidCode);
        }

        if let DiscountValue::PercentageOff { percentage } = discount.value
            && (percentage < Decimal::ZERO || percentage > Decimal::ONE_HUNDRED)
        {
            return Err(CatalogError::InvalidPercentage);
        }

        let record = self
            .executor
            .run(studio, class, |roster, now| {
                plan_add_code(roster, now, &discount, &code)
            })
            .await?;

        info!(discount_uuid = %record.uuid, code = %record.code, "added discount code");

        Ok(record)
    }

    #[tracing::instrument(
        name = "catalog.service.deactivate_discount_code",
        skip(self),
        fields(studio_uuid = %studio, class_uuid = %class, discount_uuid = %discount),
        err
    )]
    async fn deactivate_discount_code(
        &self,
        studio: StudioUuid,
        class: ClassUuid,
        discount: DiscountCodeUuid,
    ) -> Result<DiscountCodeRecord, CatalogError> {
        self.executor
            .run(studio, class, |roster, _| {
                let mut record = roster
                    .discount_codes
                    .iter()
                    .find(|record| record.uuid == discount)
                    .cloned()
                    .ok_or(CatalogError::DiscountNotFound)?;

                record.is_active = false;

                Ok(Plan::commit(
                    vec![RosterChange::SetDiscountActive {
                        discount,
                        is_active: false,
                    }],
                    record,
                ))
            })
            .await
    }

    #[tracing::instrument(
        name = "catalog.service.get_roster",
        skip(self),
        fields(studio_uuid = %studio, class_uuid = %class),
        err
    )]
    async fn get_roster(
        &self,
        studio: StudioUuid,
        class: ClassUuid,
    ) -> Result<ClassRoster, CatalogError> {
        self.executor
            .store()
            .load_roster(studio, class)
            .await
            .map_err(|error| match error {
                StoreError::NotFound => CatalogError::ClassNotFound,
                other => other.into(),
            })
    }
}

fn plan_add_tier(
    roster: &ClassRoster,
    now: Timestamp,
    tier: &NewPricingTier,
) -> Result<Plan<PricingTierRecord, CatalogError>, CatalogError> {
    if roster.tier(tier.uuid).is_some() {
        return Err(CatalogError::AlreadyExists);
    }

    let mut changes = Vec::with_capacity(2);

    if tier.is_default
        && let Some(previous) = roster.default_tier()
    {
        changes.push(RosterChange::UpdatePricingTier {
            tier: previous.uuid,
            is_default: false,
            is_active: previous.is_active,
        });
    }

    let record = PricingTierRecord {
        uuid: tier.uuid,
        class_uuid: roster.class.uuid,
        name: tier.name.clone(),
        price: tier.price,
        is_default: tier.is_default,
        is_active: true,
        enrollment_count: 0,
        created_at: now,
    };

    changes.push(RosterChange::InsertPricingTier(record.clone()));

    Ok(Plan::commit(changes, record))
}

fn plan_add_code(
    roster: &ClassRoster,
    now: Timestamp,
    discount: &NewDiscountCode,
    code: &str,
) -> Result<Plan<DiscountCodeRecord, CatalogError>, CatalogError> {
    if roster
        .discount_codes
        .iter()
        .any(|record| record.uuid == discount.uuid)
    {
        return Err(CatalogError::AlreadyExists);
    }

    if roster.discount_codes.iter().any(|record| record.code == code) {
        return Err(CatalogError::DuplicateCode);
    }

    let record = DiscountCodeRecord {
        uuid: discount.uuid,
        class_uuid: roster.class.uuid,
        code: code.to_string(),
        value: discount.value,
        expires_at: discount.expires_at,
        usage_limit: discount.usage_limit,
        usage_count: 0,
        is_active: true,
        created_at: now,
    };

    Ok(Plan::commit(
        vec![RosterChange::InsertDiscountCode(record.clone())],
        record,
    ))
}

#[automock]
#[async_trait]
/// Class configuration for studio staff.
pub trait CatalogService: Send + Sync {
    /// Create a class offering. Capacity is fixed from here on.
    async fn create_class(
        &self,
        studio: StudioUuid,
        class: NewClassOffering,
    ) -> Result<ClassOfferingRecord, CatalogError>;

    /// Move a class to another scheduling state.
    async fn set_class_status(
        &self,
        studio: StudioUuid,
        class: ClassUuid,
        status: ClassStatus,
    ) -> Result<ClassOfferingRecord, CatalogError>;

    /// Add a pricing tier. A new default tier replaces the current default.
    async fn add_pricing_tier(
        &self,
        studio: StudioUuid,
        class: ClassUuid,
        tier: NewPricingTier,
    ) -> Result<PricingTierRecord, CatalogError>;

    /// Stop offering a tier. Existing enrollments keep referring to it.
    async fn deactivate_pricing_tier(
        &self,
        studio: StudioUuid,
        class: ClassUuid,
        tier: PricingTierUuid,
    ) -> Result<PricingTierRecord, CatalogError>;

    /// Add a discount code, stored in canonical uppercase form.
    async fn add_discount_code(
        &self,
        studio: StudioUuid,
        class: ClassUuid,
        discount: NewDiscountCode,
    ) -> Result<DiscountCodeRecord, CatalogError>;

    /// Stop accepting a discount code.
    async fn deactivate_discount_code(
        &self,
        studio: StudioUuid,
        class: ClassUuid,
        discount: DiscountCodeUuid,
    ) -> Result<DiscountCodeRecord, CatalogError>;

    /// Read a class together with its tiers, codes, enrollments and waitlist.
    async fn get_roster(
        &self,
        studio: StudioUuid,
        class: ClassUuid,
    ) -> Result<ClassRoster, CatalogError>;
}
