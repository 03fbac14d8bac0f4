use clap::Args;
use studio_admissions::{
    config::AdmissionsConfig,
    context::AppContext,
    domain::{
        admissions::{
            data::Promotion,
            records::{EnrollmentRecord, EnrollmentUuid},
        },
        classes::records::PricingTierUuid,
        studios::records::StudioUuid,
        waitlist::{WaitlistService, records::WaitlistEntryUuid},
    },
};

#[derive(Debug, Args)]
pub(crate) struct PromoteArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Studio that owns the class
    #[arg(long)]
    studio: StudioUuid,

    /// Waitlist entry to promote; must be first in line
    #[arg(long)]
    entry: WaitlistEntryUuid,

    /// Pricing tier for the new enrollment
    #[arg(long)]
    tier: Option<PricingTierUuid>,

    /// Discount code to apply
    #[arg(long)]
    code: Option<String>,

    /// Optional enrollment UUID; generated when omitted
    #[arg(long)]
    enrollment_uuid: Option<EnrollmentUuid>,

    #[command(flatten)]
    admissions: AdmissionsConfig,
}

pub(crate) async fn run(args: PromoteArgs) -> Result<(), String> {
    let ctx = AppContext::from_database_url(&args.database_url, args.admissions)
        .await
        .map_err(|error| format!("failed to initialise: {error}"))?;

    let promotion = Promotion {
        enrollment_uuid: args.enrollment_uuid.unwrap_or_default(),
        pricing_tier_uuid: args.tier,
        discount_code: args.code,
    };

    let enrollment = promote(ctx.waitlist.as_ref(), args.studio, args.entry, promotion).await?;

    println!("enrollment_uuid: {}", enrollment.uuid);
    println!("student_uuid: {}", enrollment.student_uuid);
    println!("amount_paid: {}", enrollment.amount_paid);
    println!("payment_status: {}", enrollment.payment_status.as_str());

    Ok(())
}

async fn promote(
    waitlist: &dyn WaitlistService,
    studio: StudioUuid,
    entry: WaitlistEntryUuid,
    promotion: Promotion,
) -> Result<EnrollmentRecord, String> {
    waitlist
        .promote(studio, entry, promotion)
        .await
        .map_err(|error| {
            if error.is_retryable() {
                format!("failed to promote waitlist entry: {error} (safe to retry)")
            } else {
                format!("failed to promote waitlist entry: {error}")
            }
        })
}
