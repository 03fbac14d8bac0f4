//! Admissions service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{Span, info};

use crate::{
    clock::Clock,
    config::AdmissionsConfig,
    domain::{
        admissions::{
            data::NewEnrollment,
            errors::AdmissionError,
            planner::{SeatRequest, plan_admission, plan_removal},
            records::{EnrollmentRecord, EnrollmentUuid},
        },
        studios::records::StudioUuid,
    },
    roster::{
        RosterStore, StoreError,
        executor::{Plan, RosterExecutor},
    },
};

/// Admits students into classes and frees their seats again.
#[derive(Debug, Clone)]
pub struct AdmissionController<S> {
    executor: RosterExecutor<S>,
}

impl<S: RosterStore> AdmissionController<S> {
    #[must_use]
    pub fn new(store: S, clock: Arc<dyn Clock>, config: AdmissionsConfig) -> Self {
        Self {
            executor: RosterExecutor::new(store, clock, config),
        }
    }
}

#[async_trait]
impl<S: RosterStore> AdmissionsService for AdmissionController<S> {
    #[tracing::instrument(
        name = "admissions.service.admit",
        skip(self, enrollment),
        fields(
            studio_uuid = %studio,
            class_uuid = %enrollment.class_uuid,
            student_uuid = %enrollment.student_uuid,
            enrollment_uuid = %enrollment.uuid,
            has_discount_code = enrollment.discount_code.is_some(),
            amount_paid = tracing::field::Empty
        ),
        err
    )]
    async fn admit(
        &self,
        studio: StudioUuid,
        enrollment: NewEnrollment,
    ) -> Result<EnrollmentRecord, AdmissionError> {
        let record = self
            .executor
            .run(studio, enrollment.class_uuid, |roster, now| {
                let request = SeatRequest {
                    enrollment_uuid: enrollment.uuid,
                    student_uuid: enrollment.student_uuid,
                    pricing_tier_uuid: enrollment.pricing_tier_uuid,
                    discount_code: enrollment.discount_code.as_deref(),
                    emergency_contact: enrollment.emergency_contact.clone(),
                };

                plan_admission(roster, now, request)
                    .map(|(record, changes)| Plan::commit(changes, record))
            })
            .await?;

        Span::current().record("amount_paid", record.amount_paid);

        info!(
            enrollment_uuid = %record.uuid,
            amount_paid = record.amount_paid,
            payment_status = record.payment_status.as_str(),
            "admitted student"
        );

        Ok(record)
    }

    #[tracing::instrument(
        name = "admissions.service.remove",
        skip(self),
        fields(
            studio_uuid = %studio,
            enrollment_uuid = %enrollment,
            class_uuid = tracing::field::Empty
        ),
        err
    )]
    async fn remove(
        &self,
        studio: StudioUuid,
        enrollment: EnrollmentUuid,
    ) -> Result<EnrollmentRecord, AdmissionError> {
        let class = self
            .executor
            .store()
            .locate_enrollment(studio, enrollment)
            .await
            .map_err(|error| match error {
                StoreError::NotFound => AdmissionError::EnrollmentNotFound,
                other => other.into(),
            })?;

        Span::current().record("class_uuid", tracing::field::display(class));

        let record = self
            .executor
            .run(studio, class, |roster, _| {
                plan_removal(roster, enrollment)
                    .map(|(record, changes)| Plan::commit(changes, record))
            })
            .await?;

        info!(
            enrollment_uuid = %record.uuid,
            released_discount = record.discount_code_uuid.is_some(),
            "removed enrollment"
        );

        Ok(record)
    }
}

#[automock]
#[async_trait]
pub trait AdmissionsService: Send + Sync {
    /// Admit a student into a class, pricing the seat from the chosen tier and
    /// discount code.
    ///
    /// Every counter the enrollment affects commits together with it, or
    /// nothing is written.
    async fn admit(
        &self,
        studio: StudioUuid,
        enrollment: NewEnrollment,
    ) -> Result<EnrollmentRecord, AdmissionError>;

    /// Remove an enrollment, freeing its seat and returning any discount
    /// redemption it used.
    async fn remove(
        &self,
        studio: StudioUuid,
        enrollment: EnrollmentUuid,
    ) -> Result<EnrollmentRecord, AdmissionError>;
}
