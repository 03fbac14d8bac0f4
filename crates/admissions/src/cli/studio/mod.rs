use clap::{Args, Subcommand};

mod create;

#[derive(Debug, Args)]
pub(crate) struct StudioCommand {
    #[command(subcommand)]
    command: StudioSubcommand,
}

#[derive(Debug, Subcommand)]
enum StudioSubcommand {
    /// Register a studio
    Create(create::CreateStudioArgs),
}

pub(crate) async fn run(command: StudioCommand) -> Result<(), String> {
    match command.command {
        StudioSubcommand::Create(args) => create::run(args).await,
    }
}
