use crate::demo::{run_simulation, SimulateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use moral_weights::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Moral Weights Explorer",
    about = "Run the moral-weights collection service or simulate survey sessions from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP collection service (default command)
    Serve(ServeArgs),
    /// Play a randomly-answered survey session and print the resulting weights
    Simulate(SimulateArgs),
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
        Command::Simulate(args) => run_simulation(args),
    }
}
