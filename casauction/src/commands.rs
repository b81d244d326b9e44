use super::{IOArgs, OutputArgs};
use clap::Subcommand;

mod solve;
pub use solve::PolicyFlag;

#[derive(Subcommand)]
pub enum Commands {
    /// Clear the auction and report the accepted bids and item winners
    Solve {
        #[command(flatten)]
        io: IOArgs,

        /// Override the winner-selection rule
        #[arg(short, long)]
        policy: Option<PolicyFlag>,

        /// Override the random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Override the number of annealing sweeps
        #[arg(long)]
        sweeps: Option<usize>,
    },

    /// Build the coupling model of the auction and export it without solving
    Graph {
        #[command(flatten)]
        io: IOArgs,
    },

    /// Print the JSON Schema of the auction document accepted by the other commands
    Schema {
        #[command(flatten)]
        output: OutputArgs,
    },
}
