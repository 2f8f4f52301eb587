use crate::demo::{run_demo, run_diagnose, run_questions, DemoArgs, DiagnoseArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use place_booster::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Place Booster",
    about = "Self-diagnose a Naver Smart Place listing from the command line or over HTTP",
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
    /// Print the question catalog grouped by stage
    Questions,
    /// Score a set of answers and print the diagnosis
    Diagnose(DiagnoseArgs),
    /// Run the sample questionnaire end to end
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
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Questions => run_questions(),
        Command::Diagnose(args) => run_diagnose(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
