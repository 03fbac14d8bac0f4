//! Row decoding for roster tables.

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Row, postgres::PgRow};
use thiserror::Error;

use crate::{
    domain::{
        admissions::records::{
            EnrollmentRecord, EnrollmentStatus, EnrollmentUuid, PaymentStatus, StudentUuid,
        },
        classes::records::{
            ClassOfferingRecord, ClassStatus, ClassUuid, PricingTierRecord, PricingTierUuid,
        },
        discounts::records::{DiscountCodeRecord, DiscountCodeUuid, DiscountValue},
        studios::records::StudioUuid,
        waitlist::records::{WaitlistEntryRecord, WaitlistEntryUuid},
    },
    roster::StoreError,
};

#[derive(Debug, Error)]
#[error("unknown value {value:?}")]
struct UnknownVariant {
    value: String,
}

#[derive(Debug, Error)]
#[error("discount kind {kind:?} is missing its value")]
struct MissingDiscountValue {
    kind: String,
}

fn decode_error(col: &str, source: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(source),
    }
}

pub(super) fn try_get_u64(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    let value: i64 = row.try_get(col)?;

    u64::try_from(value).map_err(|e| decode_error(col, e))
}

fn try_get_variant<T>(
    row: &PgRow,
    col: &str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<T, sqlx::Error> {
    let value: String = row.try_get(col)?;

    parse(&value).ok_or_else(|| decode_error(col, UnknownVariant { value }))
}

/// Convert a count or amount for binding into a `BIGINT` column.
pub(super) fn to_i64(value: u64) -> Result<i64, StoreError> {
    i64::try_from(value).map_err(|_| StoreError::InvalidData)
}

impl<'r> FromRow<'r, PgRow> for ClassOfferingRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ClassUuid::from_uuid(row.try_get("uuid")?),
            studio_uuid: StudioUuid::from_uuid(row.try_get("studio_uuid")?),
            title: row.try_get("title")?,
            capacity: try_get_u64(row, "capacity")?,
            enrolled_count: try_get_u64(row, "enrolled_count")?,
            status: try_get_variant(row, "status", ClassStatus::parse)?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for PricingTierRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: PricingTierUuid::from_uuid(row.try_get("uuid")?),
            class_uuid: ClassUuid::from_uuid(row.try_get("class_uuid")?),
            name: row.try_get("name")?,
            price: try_get_u64(row, "price")?,
            is_default: row.try_get("is_default")?,
            is_active: row.try_get("is_active")?,
            enrollment_count: try_get_u64(row, "enrollment_count")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for DiscountCodeRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let kind: String = row.try_get("kind")?;

        let value = match kind.as_str() {
            "percentage" => row
                .try_get::<Option<Decimal>, _>("percentage")?
                .map(|percentage| DiscountValue::PercentageOff { percentage }),
            "fixed" => row
                .try_get::<Option<i64>, _>("amount")?
                .map(|amount| u64::try_from(amount).map_err(|e| decode_error("amount", e)))
                .transpose()?
                .map(|amount| DiscountValue::AmountOff { amount }),
            _ => return Err(decode_error("kind", UnknownVariant { value: kind.clone() })),
        }
        .ok_or_else(|| decode_error("kind", MissingDiscountValue { kind: kind.clone() }))?;

        Ok(Self {
            uuid: DiscountCodeUuid::from_uuid(row.try_get("uuid")?),
            class_uuid: ClassUuid::from_uuid(row.try_get("class_uuid")?),
            code: row.try_get("code")?,
            value,
            expires_at: row
                .try_get::<Option<SqlxTimestamp>, _>("expires_at")?
                .map(SqlxTimestamp::to_jiff),
            usage_limit: try_get_u64(row, "usage_limit")?,
            usage_count: try_get_u64(row, "usage_count")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for EnrollmentRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: EnrollmentUuid::from_uuid(row.try_get("uuid")?),
            class_uuid: ClassUuid::from_uuid(row.try_get("class_uuid")?),
            student_uuid: StudentUuid::from_uuid(row.try_get("student_uuid")?),
            pricing_tier_uuid: row
                .try_get::<Option<uuid::Uuid>, _>("pricing_tier_uuid")?
                .map(PricingTierUuid::from_uuid),
            discount_code_uuid: row
                .try_get::<Option<uuid::Uuid>, _>("discount_code_uuid")?
                .map(DiscountCodeUuid::from_uuid),
            amount_paid: try_get_u64(row, "amount_paid")?,
            status: try_get_variant(row, "status", EnrollmentStatus::parse)?,
            payment_status: try_get_variant(row, "payment_status", PaymentStatus::parse)?,
            emergency_contact: row.try_get("emergency_contact")?,
            enrolled_at: row.try_get::<SqlxTimestamp, _>("enrolled_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for WaitlistEntryRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: WaitlistEntryUuid::from_uuid(row.try_get("uuid")?),
            class_uuid: ClassUuid::from_uuid(row.try_get("class_uuid")?),
            student_uuid: StudentUuid::from_uuid(row.try_get("student_uuid")?),
            position: try_get_u64(row, "position")?,
            notifications_enabled: row.try_get("notifications_enabled")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
