use crate::demo::{run_calculate, run_demo, CalculateArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use profile_matching::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Profile Matching",
    about = "Rank job applicants with the Profile Matching gap method",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a CSV matrix against a job position from a JSON catalog
    Calculate(CalculateArgs),
    /// Run the built-in sample recruitment through the engine
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// JSON catalog of job positions and applicants to serve
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Calculate(args) => run_calculate(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["profile-matching"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn calculate_requires_its_inputs() {
        let cli = Cli::try_parse_from([
            "profile-matching",
            "calculate",
            "--catalog",
            "catalog.json",
            "--job",
            "7",
            "--scores",
            "scores.csv",
            "--json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Calculate(args)) => {
                assert_eq!(args.job, "7");
                assert!(args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        assert!(Cli::try_parse_from(["profile-matching", "calculate", "--job", "7"]).is_err());
    }
}
