use crate::demo::{run_demo, run_reset, DemoArgs, ResetArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use rfp_engine::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "RFP Response Engine",
    about = "Serve and demonstrate the RFP response lifecycle and vendor evaluation engine",
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
    /// Walk through answering, reuse, progress and a vendor comparison in memory
    Demo(DemoArgs),
    /// Remove every stored response and shared answer from the configured store
    Reset(ResetArgs),
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
        Command::Demo(args) => run_demo(args),
        Command::Reset(args) => run_reset(args),
    }
}
