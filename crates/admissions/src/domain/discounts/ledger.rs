//! Discount Ledger
//!
//! Decides whether a code may be redeemed against a class and produces the
//! usage-count changes that spend or return a redemption. The ledger works on
//! the discount codes of a locked class roster, so the changes it emits are
//! committed in the same unit as the enrollment they belong to.

use jiff::Timestamp;

use crate::{
    domain::discounts::{
        errors::DiscountError,
        records::{DiscountCodeRecord, DiscountCodeUuid},
    },
    roster::RosterChange,
};

/// Canonical form of a discount code: surrounding spaces removed, ASCII
/// letters uppercased.
///
/// Only ASCII is case-folded, matching the `upper(btrim(code))` form the
/// schema enforces. Use [`is_valid_code`] to check the result.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim_matches(' ').to_ascii_uppercase()
}

/// Whether a canonical code uses only the accepted alphabet: printable ASCII
/// without spaces.
#[must_use]
pub fn is_valid_code(code: &str) -> bool {
    code.chars().all(|c| c.is_ascii_graphic())
}

#[derive(Debug, Clone, Copy)]
pub struct DiscountLedger<'a> {
    codes: &'a [DiscountCodeRecord],
}

impl<'a> DiscountLedger<'a> {
    /// Build a ledger over the discount codes of a single class.
    #[must_use]
    pub const fn new(codes: &'a [DiscountCodeRecord]) -> Self {
        Self { codes }
    }

    /// Look up a code case-insensitively.
    #[must_use]
    pub fn find(&self, code: &str) -> Option<&'a DiscountCodeRecord> {
        let code = normalize_code(code);

        self.codes.iter().find(|record| record.code == code)
    }

    /// Check that a code can be redeemed at `at`.
    ///
    /// Checks run in a fixed order and the first failure is reported:
    /// existence, active flag, expiry, then usage limit.
    ///
    /// # Errors
    ///
    /// Returns the [`DiscountError`] for the first failing check.
    pub fn validate(
        &self,
        code: &str,
        at: Timestamp,
    ) -> Result<&'a DiscountCodeRecord, DiscountError> {
        let record = self.find(code).ok_or(DiscountError::NotFound)?;

        if !record.is_active {
            return Err(DiscountError::Inactive);
        }

        if record.is_expired_at(at) {
            return Err(DiscountError::Expired);
        }

        if record.is_exhausted() {
            return Err(DiscountError::LimitReached);
        }

        Ok(record)
    }

    /// Validate a code and produce the change that spends one redemption.
    ///
    /// # Errors
    ///
    /// Returns the [`DiscountError`] reported by [`Self::validate`].
    pub fn validate_and_reserve(
        &self,
        code: &str,
        at: Timestamp,
    ) -> Result<(&'a DiscountCodeRecord, RosterChange), DiscountError> {
        let record = self.validate(code, at)?;

        let change = RosterChange::SetDiscountUsageCount {
            discount: record.uuid,
            usage_count: record.usage_count.saturating_add(1),
        };

        Ok((record, change))
    }

    /// Produce the change that returns one redemption, floored at zero.
    ///
    /// Returns `None` when the code no longer belongs to this class.
    #[must_use]
    pub fn release(&self, discount: DiscountCodeUuid) -> Option<RosterChange> {
        self.codes
            .iter()
            .find(|record| record.uuid == discount)
            .map(|record| RosterChange::SetDiscountUsageCount {
                discount: record.uuid,
                usage_count: record.usage_count.saturating_sub(1),
            })
    }
}

#[cfg(test)]
mod tests {
    use jiff::{Timestamp, ToSpan};
    use rust_decimal::Decimal;

    use crate::domain::{
        classes::records::ClassUuid,
        discounts::records::{DiscountCodeRecord, DiscountCodeUuid, DiscountValue},
    };

    use super::*;

    fn code(code: &str) -> DiscountCodeRecord {
        DiscountCodeRecord {
            uuid: DiscountCodeUuid::new(),
            class_uuid: ClassUuid::new(),
            code: code.to_string(),
            value: DiscountValue::PercentageOff {
                percentage: Decimal::from(10),
            },
            expires_at: None,
            usage_limit: 0,
            usage_count: 0,
            is_active: true,
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn now() -> Timestamp {
        Timestamp::from_second(1_760_000_000).expect("valid timestamp")
    }

    #[test]
    fn normalize_code_trims_and_uppercases() {
        assert_eq!(normalize_code("  spring25 "), "SPRING25");
        assert_eq!(normalize_code("Glaze-Day"), "GLAZE-DAY");
    }

    #[test]
    fn only_ascii_is_case_folded() {
        assert_eq!(normalize_code("straße"), "STRAßE");
        assert_eq!(normalize_code("\tspring"), "\tSPRING");

        assert!(is_valid_code("SPRING-25!"));
        assert!(!is_valid_code("STRAßE"));
        assert!(!is_valid_code("\tSPRING"));
        assert!(!is_valid_code("TWO WORDS"));
    }

    #[test]
    fn validate_matches_case_insensitively() {
        let codes = [code("SPRING25")];
        let ledger = DiscountLedger::new(&codes);

        let found = ledger.validate("spring25", now()).expect("code is valid");

        assert_eq!(found.code, "SPRING25");
    }

    #[test]
    fn validate_unknown_code_is_not_found() {
        let codes = [code("SPRING25")];
        let ledger = DiscountLedger::new(&codes);

        assert_eq!(
            ledger.validate("WINTER", now()),
            Err(DiscountError::NotFound)
        );
    }

    #[test]
    fn validate_inactive_code_is_reported_before_expiry_and_limit() {
        let mut record = code("OLD");
        record.is_active = false;
        record.expires_at = Some(now() - 1.hour());
        record.usage_limit = 1;
        record.usage_count = 1;

        let codes = [record];
        let ledger = DiscountLedger::new(&codes);

        assert_eq!(ledger.validate("old", now()), Err(DiscountError::Inactive));
    }

    #[test]
    fn validate_expired_code_is_reported_before_limit() {
        let mut record = code("OLD");
        record.expires_at = Some(now() - 1.second());
        record.usage_limit = 1;
        record.usage_count = 1;

        let codes = [record];
        let ledger = DiscountLedger::new(&codes);

        assert_eq!(ledger.validate("OLD", now()), Err(DiscountError::Expired));
    }

    #[test]
    fn validate_code_expiring_exactly_now_is_still_valid() {
        let mut record = code("EDGE");
        record.expires_at = Some(now());

        let codes = [record];
        let ledger = DiscountLedger::new(&codes);

        assert!(ledger.validate("EDGE", now()).is_ok());
    }

    #[test]
    fn validate_exhausted_code_reports_limit_reached() {
        let mut record = code("ONCE");
        record.usage_limit = 1;
        record.usage_count = 1;

        let codes = [record];
        let ledger = DiscountLedger::new(&codes);

        assert_eq!(
            ledger.validate("ONCE", now()),
            Err(DiscountError::LimitReached)
        );
    }

    #[test]
    fn zero_usage_limit_is_unlimited() {
        let mut record = code("FOREVER");
        record.usage_count = 10_000;

        let codes = [record];
        let ledger = DiscountLedger::new(&codes);

        assert!(ledger.validate("FOREVER", now()).is_ok());
    }

    #[test]
    fn reserve_increments_usage_count() {
        let mut record = code("TWICE");
        record.usage_limit = 2;
        record.usage_count = 1;
        let uuid = record.uuid;

        let codes = [record];
        let ledger = DiscountLedger::new(&codes);

        let (_, change) = ledger
            .validate_and_reserve("twice", now())
            .expect("one redemption left");

        assert_eq!(
            change,
            RosterChange::SetDiscountUsageCount {
                discount: uuid,
                usage_count: 2
            }
        );
    }

    #[test]
    fn release_decrements_and_floors_at_zero() {
        let mut used = code("USED");
        used.usage_count = 3;
        let unused = code("UNUSED");

        let (used_uuid, unused_uuid) = (used.uuid, unused.uuid);
        let codes = [used, unused];
        let ledger = DiscountLedger::new(&codes);

        assert_eq!(
            ledger.release(used_uuid),
            Some(RosterChange::SetDiscountUsageCount {
                discount: used_uuid,
                usage_count: 2
            })
        );

        assert_eq!(
            ledger.release(unused_uuid),
            Some(RosterChange::SetDiscountUsageCount {
                discount: unused_uuid,
                usage_count: 0
            })
        );

        assert_eq!(ledger.release(DiscountCodeUuid::new()), None);
    }
}
