//! Waitlist queue decisions over a locked roster.

use jiff::Timestamp;

use crate::{
    domain::{
        admissions::{
            AdmissionError, SeatRequest, data::Promotion, plan_admission,
            records::EnrollmentRecord,
        },
        waitlist::{
            data::NewWaitlistEntry,
            records::{WaitlistEntryRecord, WaitlistEntryUuid},
        },
    },
    roster::{ClassRoster, RosterChange, executor::Plan},
};

/// Queue a student behind everyone already waiting.
pub(crate) fn plan_enqueue(
    roster: &ClassRoster,
    now: Timestamp,
    entry: &NewWaitlistEntry,
) -> Result<(WaitlistEntryRecord, Vec<RosterChange>), AdmissionError> {
    if roster.enrollment_for(entry.student_uuid).is_some() {
        return Err(AdmissionError::AlreadyEnrolled);
    }

    if roster.waitlist_entry_for(entry.student_uuid).is_some() {
        return Err(AdmissionError::AlreadyWaitlisted);
    }

    let record = WaitlistEntryRecord {
        uuid: entry.uuid,
        class_uuid: roster.class.uuid,
        student_uuid: entry.student_uuid,
        position: roster.next_waitlist_position(),
        notifications_enabled: entry.notifications_enabled,
        created_at: now,
    };

    let changes = vec![RosterChange::InsertWaitlistEntry(record.clone())];

    Ok((record, changes))
}

/// Take an entry off the queue. Later entries keep their positions.
pub(crate) fn plan_dequeue(
    roster: &ClassRoster,
    entry: WaitlistEntryUuid,
) -> Result<(WaitlistEntryRecord, Vec<RosterChange>), AdmissionError> {
    let record = roster
        .waitlist_entry(entry)
        .ok_or(AdmissionError::WaitlistEntryNotFound)?;

    Ok((
        record.clone(),
        vec![RosterChange::DeleteWaitlistEntry(record.uuid)],
    ))
}

/// Convert the entry at the head of the queue into an enrollment.
///
/// An entry whose student was enrolled by another path is removed even though
/// the promotion itself fails with [`AdmissionError::AlreadyEnrolled`].
pub(crate) fn plan_promotion(
    roster: &ClassRoster,
    now: Timestamp,
    entry: WaitlistEntryUuid,
    promotion: &Promotion,
) -> Result<Plan<EnrollmentRecord, AdmissionError>, AdmissionError> {
    let record = roster
        .waitlist_entry(entry)
        .ok_or(AdmissionError::WaitlistEntryNotFound)?;

    if roster.enrollment_for(record.student_uuid).is_some() {
        return Ok(Plan::commit_then_fail(
            vec![RosterChange::DeleteWaitlistEntry(record.uuid)],
            AdmissionError::AlreadyEnrolled,
        ));
    }

    let head = roster.ordered_waitlist().first().map(|head| head.uuid);

    if head != Some(record.uuid) {
        return Err(AdmissionError::NotFirstInLine);
    }

    let request = SeatRequest {
        enrollment_uuid: promotion.enrollment_uuid,
        student_uuid: record.student_uuid,
        pricing_tier_uuid: promotion.pricing_tier_uuid,
        discount_code: promotion.discount_code.as_deref(),
        emergency_contact: None,
    };

    let (enrollment, changes) = plan_admission(roster, now, request)?;

    Ok(Plan::commit(changes, enrollment))
}
