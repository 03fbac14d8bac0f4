use clap::{Args, Subcommand};

mod promote;
mod show;

#[derive(Debug, Args)]
pub(crate) struct WaitlistCommand {
    #[command(subcommand)]
    command: WaitlistSubcommand,
}

#[derive(Debug, Subcommand)]
enum WaitlistSubcommand {
    /// Print a class's waitlist in queue order
    Show(show::ShowWaitlistArgs),

    /// Enroll the student at the head of a class's waitlist
    Promote(promote::PromoteArgs),
}

pub(crate) async fn run(command: WaitlistCommand) -> Result<(), String> {
    match command.command {
        WaitlistSubcommand::Show(args) => show::run(args).await,
        WaitlistSubcommand::Promote(args) => promote::run(args).await,
    }
}
