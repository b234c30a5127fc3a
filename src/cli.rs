//! Command-line surface: a single `run` command that builds a simple
//! hard-sphere gas in a periodic box, runs it for a fixed number of
//! events, and reports the result. Config/ensemble file loading mirrors
//! the rest of the stack's out-of-scope XML/init-file format and is
//! left to [`crate::simulation::io`] snapshots rather than a CLI flag.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Runs a synthetic hard-sphere gas for a fixed number of events.
    Run {
        /// Number of particles.
        #[arg(short = 'n', long, default_value_t = 100)]
        particles: usize,

        /// Cubic box edge length.
        #[arg(short = 'b', long, default_value_t = 20.0)]
        box_size: f64,

        /// Hard-sphere diameter.
        #[arg(short = 'd', long, default_value_t = 1.0)]
        sigma: f64,

        /// Number of collision events to run.
        #[arg(short = 'e', long, default_value_t = 10_000)]
        events: u64,

        /// Random seed for the initial velocity distribution.
        #[arg(short = 's', long, default_value_t = 1)]
        seed: u64,

        /// Optional path to save a bincode snapshot after the run.
        #[arg(short = 'o', long)]
        save_to: Option<PathBuf>,
    },

    /// Prints a summary of a saved snapshot.
    Inspect {
        /// Path to a snapshot saved by `run --save-to`.
        path: PathBuf,
    },
}
