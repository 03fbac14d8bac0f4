use clap::{Parser, Subcommand};

mod db;
mod logging;
mod studio;
mod waitlist;

#[derive(Debug, Parser)]
#[command(name = "studio-admissions", about = "Studio Admissions CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    logging: logging::LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Studio(studio::StudioCommand),
    Waitlist(waitlist::WaitlistCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        logging::init_subscriber(&self.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Studio(command) => studio::run(command).await,
            Commands::Waitlist(command) => waitlist::run(command).await,
        }
    }
}
