use clap::Args;
use studio_admissions::{
    config::AdmissionsConfig,
    context::AppContext,
    domain::{
        classes::records::ClassUuid, studios::records::StudioUuid, waitlist::WaitlistService,
    },
};

#[derive(Debug, Args)]
pub(crate) struct ShowWaitlistArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Studio that owns the class
    #[arg(long)]
    studio: StudioUuid,

    /// Class whose waitlist to show
    #[arg(long)]
    class: ClassUuid,

    #[command(flatten)]
    admissions: AdmissionsConfig,
}

pub(crate) async fn run(args: ShowWaitlistArgs) -> Result<(), String> {
    let ctx = AppContext::from_database_url(&args.database_url, args.admissions)
        .await
        .map_err(|error| format!("failed to initialise: {error}"))?;

    for line in queue_lines(ctx.waitlist.as_ref(), args.studio, args.class).await? {
        println!("{line}");
    }

    Ok(())
}

async fn queue_lines(
    waitlist: &dyn WaitlistService,
    studio: StudioUuid,
    class: ClassUuid,
) -> Result<Vec<String>, String> {
    let entries = waitlist
        .peek_queue(studio, class)
        .await
        .map_err(|error| format!("failed to read waitlist: {error}"))?;

    if entries.is_empty() {
        return Ok(vec!["waitlist is empty".to_string()]);
    }

    Ok(entries
        .iter()
        .map(|entry| {
            format!(
                "{position}\t{entry}\t{student}\tnotify={notify}",
                position = entry.position,
                entry = entry.uuid,
                student = entry.student_uuid,
                notify = entry.notifications_enabled,
            )
        })
        .collect())
}
