//! Admission planning.
//!
//! Pure decisions over a locked [`ClassRoster`]. Both direct admission and
//! waitlist promotion go through [`plan_admission`], so the two paths apply
//! identical capacity, pricing and discount rules.

use jiff::Timestamp;

use crate::{
    domain::{
        admissions::{
            errors::AdmissionError,
            records::{
                EnrollmentRecord, EnrollmentStatus, EnrollmentUuid, PaymentStatus, StudentUuid,
            },
        },
        classes::records::PricingTierUuid,
        discounts::DiscountLedger,
        pricing::compute_amount,
    },
    roster::{ClassRoster, RosterChange},
};

/// A request for a seat, however it arrived.
#[derive(Debug, Clone)]
pub(crate) struct SeatRequest<'a> {
    pub(crate) enrollment_uuid: EnrollmentUuid,
    pub(crate) student_uuid: StudentUuid,
    pub(crate) pricing_tier_uuid: Option<PricingTierUuid>,
    pub(crate) discount_code: Option<&'a str>,
    pub(crate) emergency_contact: Option<String>,
}

/// Decide whether a seat may be granted and produce the writes that grant it.
///
/// Checks run in a fixed order: existing enrollment, capacity, discount code,
/// then pricing tier. The returned changes insert the enrollment, advance the
/// class, tier and discount counters, and drop any waitlist entry the student
/// still holds for the class.
pub(crate) fn plan_admission(
    roster: &ClassRoster,
    now: Timestamp,
    request: SeatRequest<'_>,
) -> Result<(EnrollmentRecord, Vec<RosterChange>), AdmissionError> {
    if roster.enrollment_for(request.student_uuid).is_some() {
        return Err(AdmissionError::AlreadyEnrolled);
    }

    if roster.class.is_full() {
        return Err(AdmissionError::ClassFull);
    }

    let mut changes = Vec::with_capacity(5);

    let discount = match request.discount_code {
        Some(code) => {
            let (record, reserve) =
                DiscountLedger::new(&roster.discount_codes).validate_and_reserve(code, now)?;

            changes.push(reserve);

            Some(record)
        }
        None => None,
    };

    let tier = match request.pricing_tier_uuid {
        Some(uuid) => {
            let tier = roster.tier(uuid).ok_or(AdmissionError::TierNotFound)?;

            if !tier.is_active {
                return Err(AdmissionError::TierInactive);
            }

            changes.push(RosterChange::SetTierEnrollmentCount {
                tier: tier.uuid,
                enrollment_count: tier.enrollment_count.saturating_add(1),
            });

            Some(tier)
        }
        None => None,
    };

    let amount = compute_amount(
        tier.map(|tier| tier.price),
        discount.map(|discount| &discount.value),
    )?;

    let enrollment = EnrollmentRecord {
        uuid: request.enrollment_uuid,
        class_uuid: roster.class.uuid,
        student_uuid: request.student_uuid,
        pricing_tier_uuid: tier.map(|tier| tier.uuid),
        discount_code_uuid: discount.map(|discount| discount.uuid),
        amount_paid: amount,
        status: EnrollmentStatus::Active,
        payment_status: PaymentStatus::for_amount(amount),
        emergency_contact: request.emergency_contact,
        enrolled_at: now,
    };

    changes.insert(0, RosterChange::InsertEnrollment(enrollment.clone()));
    changes.insert(
        1,
        RosterChange::SetEnrolledCount(roster.class.enrolled_count.saturating_add(1)),
    );

    if let Some(entry) = roster.waitlist_entry_for(request.student_uuid) {
        changes.push(RosterChange::DeleteWaitlistEntry(entry.uuid));
    }

    Ok((enrollment, changes))
}

/// Produce the writes that free the seat held by `enrollment`.
pub(crate) fn plan_removal(
    roster: &ClassRoster,
    enrollment: EnrollmentUuid,
) -> Result<(EnrollmentRecord, Vec<RosterChange>), AdmissionError> {
    let record = roster
        .enrollment(enrollment)
        .ok_or(AdmissionError::EnrollmentNotFound)?;

    let mut changes = vec![
        RosterChange::DeleteEnrollment(record.uuid),
        RosterChange::SetEnrolledCount(roster.class.enrolled_count.saturating_sub(1)),
    ];

    if let Some(tier) = record.pricing_tier_uuid.and_then(|uuid| roster.tier(uuid)) {
        changes.push(RosterChange::SetTierEnrollmentCount {
            tier: tier.uuid,
            enrollment_count: tier.enrollment_count.saturating_sub(1),
        });
    }

    if let Some(release) = record
        .discount_code_uuid
        .and_then(|uuid| DiscountLedger::new(&roster.discount_codes).release(uuid))
    {
        changes.push(release);
    }

    Ok((record.clone(), changes))
}
