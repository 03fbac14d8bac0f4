//! Roster Executor
//!
//! Runs a planning function against a locked roster, applies the changes it
//! returns and commits, retrying the whole unit when the store reports a
//! transient conflict.

use std::sync::Arc;

use jiff::Timestamp;
use tracing::{debug, warn};

use crate::{
    clock::Clock,
    config::AdmissionsConfig,
    domain::{classes::records::ClassUuid, studios::records::StudioUuid},
    roster::{ClassRoster, RosterChange, RosterStore, RosterTransaction, StoreError},
};

/// Errors that a roster plan may produce.
pub(crate) trait RosterError: From<StoreError> + Send {
    /// The class being locked does not exist for the studio.
    fn class_not_found() -> Self;
}

/// Changes to commit plus the result to hand back once they are committed.
///
/// A plan may commit changes and still report a failure, for example when a
/// stale waitlist entry is cleaned up during a rejected promotion.
#[derive(Debug)]
pub(crate) struct Plan<T, E> {
    changes: Vec<RosterChange>,
    outcome: Result<T, E>,
}

impl<T, E> Plan<T, E> {
    pub(crate) fn commit(changes: Vec<RosterChange>, value: T) -> Self {
        Self {
            changes,
            outcome: Ok(value),
        }
    }

    pub(crate) fn commit_then_fail(changes: Vec<RosterChange>, error: E) -> Self {
        Self {
            changes,
            outcome: Err(error),
        }
    }

    #[cfg(test)]
    pub(crate) fn changes(&self) -> &[RosterChange] {
        &self.changes
    }

    #[cfg(test)]
    pub(crate) fn outcome(&self) -> Result<&T, &E> {
        self.outcome.as_ref()
    }
}

enum Attempt<E> {
    Conflict,
    Failed(E),
}

impl<E: RosterError> Attempt<E> {
    fn from_lock(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => Self::Failed(E::class_not_found()),
            other => Self::from_store(other),
        }
    }

    fn from_store(error: StoreError) -> Self {
        if error.is_retryable() {
            Self::Conflict
        } else {
            Self::Failed(E::from(error))
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RosterExecutor<S> {
    store: S,
    clock: Arc<dyn Clock>,
    max_attempts: u32,
}

impl<S: RosterStore> RosterExecutor<S> {
    pub(crate) fn new(store: S, clock: Arc<dyn Clock>, config: AdmissionsConfig) -> Self {
        Self {
            store,
            clock,
            max_attempts: config.max_attempts.max(1),
        }
    }

    pub(crate) const fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Plan and commit against the locked roster of `class`.
    ///
    /// Returning `Err` from `plan` aborts the attempt and discards the
    /// transaction. Conflicts re-run `plan` against a freshly locked roster
    /// until the attempt budget is spent.
    pub(crate) async fn run<T, E, F>(
        &self,
        studio: StudioUuid,
        class: ClassUuid,
        plan: F,
    ) -> Result<T, E>
    where
        T: Send,
        E: RosterError,
        F: Fn(&ClassRoster, Timestamp) -> Result<Plan<T, E>, E> + Send + Sync,
    {
        let mut attempt = 1;

        loop {
            match self.attempt(studio, class, &plan).await {
                Ok(outcome) => return outcome,
                Err(Attempt::Failed(error)) => return Err(error),
                Err(Attempt::Conflict) if attempt < self.max_attempts => {
                    warn!(
                        class_uuid = %class,
                        attempt,
                        max_attempts = self.max_attempts,
                        "roster update conflicted; retrying"
                    );

                    attempt += 1;
                }
                Err(Attempt::Conflict) => return Err(E::from(StoreError::Conflict)),
            }
        }
    }

    async fn attempt<T, E, F>(
        &self,
        studio: StudioUuid,
        class: ClassUuid,
        plan: &F,
    ) -> Result<Result<T, E>, Attempt<E>>
    where
        T: Send,
        E: RosterError,
        F: Fn(&ClassRoster, Timestamp) -> Result<Plan<T, E>, E> + Send + Sync,
    {
        let (mut tx, roster) = self
            .store
            .lock_roster(studio, class)
            .await
            .map_err(Attempt::from_lock)?;

        let Plan { changes, outcome } =
            plan(&roster, self.clock.now()).map_err(Attempt::Failed)?;

        drop(roster);

        let change_count = changes.len();

        for change in changes {
            tx.apply(change).await.map_err(Attempt::from_store)?;
        }

        tx.commit().await.map_err(Attempt::from_store)?;

        debug!(class_uuid = %class, change_count, "committed roster changes");

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    };

    use async_trait::async_trait;
    use jiff::Timestamp;
    use testresult::TestResult;

    use crate::{
        clock::FixedClock,
        domain::{
            admissions::records::EnrollmentUuid,
            classes::records::{ClassOfferingRecord, ClassStatus},
            waitlist::records::WaitlistEntryUuid,
        },
        roster::{MemoryRosterStore, memory::MemoryRosterTransaction},
    };

    use super::*;

    #[derive(Debug, thiserror::Error)]
    enum TestError {
        #[error("class not found")]
        ClassNotFound,

        #[error("conflict")]
        Conflict,

        #[error("store: {0}")]
        Store(StoreError),

        #[error("rejected")]
        Rejected,
    }

    impl From<StoreError> for TestError {
        fn from(error: StoreError) -> Self {
            match error {
                StoreError::Conflict => Self::Conflict,
                other => Self::Store(other),
            }
        }
    }

    impl RosterError for TestError {
        fn class_not_found() -> Self {
            Self::ClassNotFound
        }
    }

    /// Memory store whose first `failures` commits report a conflict.
    #[derive(Debug, Clone)]
    struct ConflictingStore {
        inner: MemoryRosterStore,
        failures: Arc<AtomicU32>,
    }

    struct ConflictingTransaction {
        inner: MemoryRosterTransaction,
        conflict: bool,
    }

    #[async_trait]
    impl RosterTransaction for ConflictingTransaction {
        async fn apply(&mut self, change: RosterChange) -> Result<(), StoreError> {
            self.inner.apply(change).await
        }

        async fn commit(self) -> Result<(), StoreError> {
            if self.conflict {
                return Err(StoreError::Conflict);
            }

            self.inner.commit().await
        }
    }

    #[async_trait]
    impl RosterStore for ConflictingStore {
        type Transaction = ConflictingTransaction;

        async fn create_class(
            &self,
            studio: StudioUuid,
            class: ClassOfferingRecord,
        ) -> Result<ClassOfferingRecord, StoreError> {
            self.inner.create_class(studio, class).await
        }

        async fn load_roster(
            &self,
            studio: StudioUuid,
            class: ClassUuid,
        ) -> Result<ClassRoster, StoreError> {
            self.inner.load_roster(studio, class).await
        }

        async fn lock_roster(
            &self,
            studio: StudioUuid,
            class: ClassUuid,
        ) -> Result<(Self::Transaction, ClassRoster), StoreError> {
            let (inner, roster) = self.inner.lock_roster(studio, class).await?;

            let conflict = self
                .failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();

            Ok((ConflictingTransaction { inner, conflict }, roster))
        }

        async fn locate_enrollment(
            &self,
            studio: StudioUuid,
            enrollment: EnrollmentUuid,
        ) -> Result<ClassUuid, StoreError> {
            self.inner.locate_enrollment(studio, enrollment).await
        }

        async fn locate_waitlist_entry(
            &self,
            studio: StudioUuid,
            entry: WaitlistEntryUuid,
        ) -> Result<ClassUuid, StoreError> {
            self.inner.locate_waitlist_entry(studio, entry).await
        }
    }

    async fn setup(
        failures: u32,
        max_attempts: u32,
    ) -> TestResult<(RosterExecutor<ConflictingStore>, StudioUuid, ClassUuid)> {
        let store = ConflictingStore {
            inner: MemoryRosterStore::new(),
            failures: Arc::new(AtomicU32::new(failures)),
        };

        let studio = StudioUuid::new();
        let class = ClassUuid::new();

        store
            .create_class(
                studio,
                ClassOfferingRecord {
                    uuid: class,
                    studio_uuid: studio,
                    title: "Glazing".to_string(),
                    capacity: 4,
                    enrolled_count: 0,
                    status: ClassStatus::Published,
                    created_at: Timestamp::UNIX_EPOCH,
                },
            )
            .await?;

        let executor = RosterExecutor::new(
            store,
            Arc::new(FixedClock::new(Timestamp::UNIX_EPOCH)),
            AdmissionsConfig { max_attempts },
        );

        Ok((executor, studio, class))
    }

    fn set_status(
        roster: &ClassRoster,
        _now: Timestamp,
    ) -> Result<Plan<u64, TestError>, TestError> {
        Ok(Plan::commit(
            vec![RosterChange::SetClassStatus(ClassStatus::InSession)],
            roster.class.capacity,
        ))
    }

    #[tokio::test]
    async fn conflicts_within_budget_are_retried() -> TestResult {
        let (executor, studio, class) = setup(2, 3).await?;

        let capacity = executor.run(studio, class, set_status).await?;

        assert_eq!(capacity, 4);

        let roster = executor.store().load_roster(studio, class).await?;

        assert_eq!(roster.class.status, ClassStatus::InSession);

        Ok(())
    }

    #[tokio::test]
    async fn exhausted_budget_reports_conflict_and_leaves_no_changes() -> TestResult {
        let (executor, studio, class) = setup(3, 3).await?;

        let result = executor.run(studio, class, set_status).await;

        assert!(
            matches!(result, Err(TestError::Conflict)),
            "expected Conflict, got {result:?}"
        );

        let roster = executor.store().load_roster(studio, class).await?;

        assert_eq!(roster.class.status, ClassStatus::Published);

        Ok(())
    }

    #[tokio::test]
    async fn rejected_plan_is_not_retried() -> TestResult {
        let (executor, studio, class) = setup(0, 3).await?;
        let calls = AtomicU32::new(0);

        let result: Result<(), TestError> = executor
            .run(studio, class, |_, _| {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(TestError::Rejected)
            })
            .await;

        assert!(matches!(result, Err(TestError::Rejected)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        Ok(())
    }

    #[tokio::test]
    async fn failed_outcome_still_commits_its_changes() -> TestResult {
        let (executor, studio, class) = setup(0, 1).await?;

        let result: Result<(), TestError> = executor
            .run(studio, class, |_, _| {
                Ok(Plan::commit_then_fail(
                    vec![RosterChange::SetClassStatus(ClassStatus::Cancelled)],
                    TestError::Rejected,
                ))
            })
            .await;

        assert!(matches!(result, Err(TestError::Rejected)));

        let roster = executor.store().load_roster(studio, class).await?;

        assert_eq!(roster.class.status, ClassStatus::Cancelled);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_class_maps_to_class_not_found() -> TestResult {
        let (executor, studio, _) = setup(0, 1).await?;

        let result = executor.run(studio, ClassUuid::new(), set_status).await;

        assert!(matches!(result, Err(TestError::ClassNotFound)));

        Ok(())
    }

    #[test]
    fn zero_attempt_budget_still_tries_once() {
        let executor = RosterExecutor::new(
            MemoryRosterStore::new(),
            Arc::new(FixedClock::new(Timestamp::UNIX_EPOCH)),
            AdmissionsConfig { max_attempts: 0 },
        );

        assert_eq!(executor.max_attempts, 1);
    }
}
