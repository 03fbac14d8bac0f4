use clap::Args;
use studio_admissions::{
    database,
    domain::studios::{
        PgStudiosService, StudiosService,
        data::NewStudio,
        records::{StudioRecord, StudioUuid},
    },
};

#[derive(Debug, Args)]
pub(crate) struct CreateStudioArgs {
    /// Studio display name
    #[arg(long)]
    name: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Optional studio UUID; generated when omitted
    #[arg(long)]
    studio_uuid: Option<StudioUuid>,
}

pub(crate) async fn run(args: CreateStudioArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgStudiosService::new(pool);

    let studio = create(
        &service,
        NewStudio {
            uuid: args.studio_uuid.unwrap_or_default(),
            name: args.name,
        },
    )
    .await?;

    println!("studio_uuid: {}", studio.uuid);
    println!("studio_name: {}", studio.name);

    Ok(())
}

async fn create(service: &dyn StudiosService, studio: NewStudio) -> Result<StudioRecord, String> {
    service
        .create_studio(studio)
        .await
        .map_err(|error| format!("failed to create studio: {error}"))
}
