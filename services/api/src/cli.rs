use crate::commands::{run_build, run_evaluate, BuildArgs, EvaluateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use riskform::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "riskform",
    about = "Compile and evaluate declarative risk assessment forms",
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
    /// Validate and compile a form into a JSON bundle
    Build(BuildArgs),
    /// Assess a saved answer file against a form
    Evaluate(EvaluateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Directory holding sections.yaml, risks.yaml and controls.yaml
    #[arg(long)]
    pub(crate) form_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Build(args) => run_build(args),
        Command::Evaluate(args) => run_evaluate(args),
    }
}
