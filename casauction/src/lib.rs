use cas_solver::{Clearing, io::Auction};
use clap::Parser;
use std::path::PathBuf;
use tracing::{Level, event};

mod io;
pub use io::*;

mod config;
pub use config::AppConfig;

mod commands;
pub use commands::*;

// The top-level arguments: an optional settings file, and which subcommand to execute
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct BaseArgs {
    /// A TOML file of solver settings
    #[arg(short, long, global = true, env = "CAS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl BaseArgs {
    pub fn evaluate(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Solve {
                io,
                policy,
                seed,
                sweeps,
            } => {
                let mut config = AppConfig::load(self.config.as_deref())?;
                if let Some(policy) = policy {
                    config.policy = policy.into();
                }
                if let Some(seed) = seed {
                    config.solver.random_seed = seed;
                }
                if let Some(sweeps) = sweeps {
                    config.solver.sweep_count = sweeps;
                }
                event!(Level::DEBUG, ?config, "resolved configuration");

                let clearing = Clearing::new(config.solver, config.policy)?;
                let input = io.read()?;
                let auction = serde_json::from_reader::<_, Auction>(input)?;
                let outcome = auction.clear(&clearing)?;
                let output = io.write()?;
                serde_json::to_writer_pretty(output, &outcome)?;
            }
            Commands::Graph { io } => {
                let input = io.read()?;
                let auction = serde_json::from_reader::<_, Auction>(input)?;
                let graph = auction.graph()?;
                let output = io.write()?;
                serde_json::to_writer_pretty(output, &graph)?;
            }
            Commands::Schema { output } => {
                let schema = schemars::schema_for!(Auction);
                serde_json::to_writer_pretty(output.write()?, &schema)?;
            }
        }

        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("Config file {0} does not exist")]
    MissingConfig(PathBuf),
}
