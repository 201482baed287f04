use anyhow::Result;
use clap::{Parser, Subcommand};
use log::debug;

use proximity::{alerts, distance, exclusion};

#[derive(Debug, Parser)]
#[command(version, about = "Proximity filtering for facility datasets, plus alert sync")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Drop every candidate that has an anchor within the radius
    Filter(exclusion::FilterArgs),
    /// Great-circle distance between two points
    Distance(distance::DistanceArgs),
    /// Mirror new Dependabot alerts as Asana tasks
    SyncAlerts(alerts::SyncArgs),
}

fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    match dotenv::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(_) => debug!("No .env file found, using environment variables from system"),
    }

    let cli = Cli::parse();
    match cli.command {
        Command::Filter(args) => exclusion::main(args),
        Command::Distance(args) => distance::main(args),
        Command::SyncAlerts(args) => alerts::main(args),
    }
}
