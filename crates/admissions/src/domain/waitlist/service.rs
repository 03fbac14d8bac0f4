//! Waitlist service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{Span, info};

use crate::{
    clock::Clock,
    config::AdmissionsConfig,
    domain::{
        admissions::{AdmissionError, data::Promotion, records::EnrollmentRecord},
        classes::records::ClassUuid,
        studios::records::StudioUuid,
        waitlist::{
            data::NewWaitlistEntry,
            queue::{plan_dequeue, plan_enqueue, plan_promotion},
            records::{WaitlistEntryRecord, WaitlistEntryUuid},
        },
    },
    roster::{
        RosterStore, StoreError,
        executor::{Plan, RosterExecutor},
    },
};

/// Keeps the per-class queue of students waiting for a seat.
#[derive(Debug, Clone)]
pub struct WaitlistManager<S> {
    executor: RosterExecutor<S>,
}

impl<S: RosterStore> WaitlistManager<S> {
    #[must_use]
    pub fn new(store: S, clock: Arc<dyn Clock>, config: AdmissionsConfig) -> Self {
        Self {
            executor: RosterExecutor::new(store, clock, config),
        }
    }

    async fn locate(
        &self,
        studio: StudioUuid,
        entry: WaitlistEntryUuid,
    ) -> Result<ClassUuid, AdmissionError> {
        let class = self
            .executor
            .store()
            .locate_waitlist_entry(studio, entry)
            .await
            .map_err(|error| match error {
                StoreError::NotFound => AdmissionError::WaitlistEntryNotFound,
                other => other.into(),
            })?;

        Span::current().record("class_uuid", tracing::field::display(class));

        Ok(class)
    }
}

#[async_trait]
impl<S: RosterStore> WaitlistService for WaitlistManager<S> {
    #[tracing::instrument(
        name = "waitlist.service.enqueue",
        skip(self, entry),
        fields(
            studio_uuid = %studio,
            class_uuid = %entry.class_uuid,
            student_uuid = %entry.student_uuid,
            position = tracing::field::Empty
        ),
        err
    )]
    async fn enqueue(
        &self,
        studio: StudioUuid,
        entry: NewWaitlistEntry,
    ) -> Result<WaitlistEntryRecord, AdmissionError> {
        let record = self
            .executor
            .run(studio, entry.class_uuid, |roster, now| {
                plan_enqueue(roster, now, &entry)
                    .map(|(record, changes)| Plan::commit(changes, record))
            })
            .await?;

        Span::current().record("position", record.position);

        info!(entry_uuid = %record.uuid, position = record.position, "queued student");

        Ok(record)
    }

    #[tracing::instrument(
        name = "waitlist.service.dequeue",
        skip(self),
        fields(
            studio_uuid = %studio,
            entry_uuid = %entry,
            class_uuid = tracing::field::Empty
        ),
        err
    )]
    async fn dequeue(
        &self,
        studio: StudioUuid,
        entry: WaitlistEntryUuid,
    ) -> Result<WaitlistEntryRecord, AdmissionError> {
        let class = self.locate(studio, entry).await?;

        let record = self
            .executor
            .run(studio, class, |roster, _| {
                plan_dequeue(roster, entry)
                    .map(|(record, changes)| Plan::commit(changes, record))
            })
            .await?;

        info!(entry_uuid = %record.uuid, position = record.position, "dequeued student");

        Ok(record)
    }

    #[tracing::instrument(
        name = "waitlist.service.peek_queue",
        skip(self),
        fields(studio_uuid = %studio, class_uuid = %class),
        err
    )]
    async fn peek_queue(
        &self,
        studio: StudioUuid,
        class: ClassUuid,
    ) -> Result<Vec<WaitlistEntryRecord>, AdmissionError> {
        let roster = self
            .executor
            .store()
            .load_roster(studio, class)
            .await
            .map_err(|error| match error {
                StoreError::NotFound => AdmissionError::ClassNotFound,
                other => other.into(),
            })?;

        Ok(roster.ordered_waitlist().into_iter().cloned().collect())
    }

    #[tracing::instrument(
        name = "waitlist.service.promote",
        skip(self, promotion),
        fields(
            studio_uuid = %studio,
            entry_uuid = %entry,
            enrollment_uuid = %promotion.enrollment_uuid,
            class_uuid = tracing::field::Empty,
            amount_paid = tracing::field::Empty
        ),
        err
    )]
    async fn promote(
        &self,
        studio: StudioUuid,
        entry: WaitlistEntryUuid,
        promotion: Promotion,
    ) -> Result<EnrollmentRecord, AdmissionError> {
        let class = self.locate(studio, entry).await?;

        let enrollment = self
            .executor
            .run(studio, class, |roster, now| {
                plan_promotion(roster, now, entry, &promotion)
            })
            .await?;

        Span::current().record("amount_paid", enrollment.amount_paid);

        info!(
            enrollment_uuid = %enrollment.uuid,
            student_uuid = %enrollment.student_uuid,
            amount_paid = enrollment.amount_paid,
            "promoted waitlisted student"
        );

        Ok(enrollment)
    }
}

#[automock]
#[async_trait]
pub trait WaitlistService: Send + Sync {
    /// Add a student to the back of a class's queue.
    async fn enqueue(
        &self,
        studio: StudioUuid,
        entry: NewWaitlistEntry,
    ) -> Result<WaitlistEntryRecord, AdmissionError>;

    /// Remove an entry regardless of where it sits in the queue.
    async fn dequeue(
        &self,
        studio: StudioUuid,
        entry: WaitlistEntryUuid,
    ) -> Result<WaitlistEntryRecord, AdmissionError>;

    /// Entries for a class in queue order.
    async fn peek_queue(
        &self,
        studio: StudioUuid,
        class: ClassUuid,
    ) -> Result<Vec<WaitlistEntryRecord>, AdmissionError>;

    /// Enroll the student at the head of the queue and remove their entry.
    async fn promote(
        &self,
        studio: StudioUuid,
        entry: WaitlistEntryUuid,
        promotion: Promotion,
    ) -> Result<EnrollmentRecord, AdmissionError>;
}
