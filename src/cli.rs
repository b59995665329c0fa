use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "revlink")]
#[command(about = "Resolve copied URLs into review links and insert them while editing", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a URL (or bare issue key) to a review link and print it
    Review {
        url: String,
    },
    /// Open a file in the editor (default command)
    Edit {
        file: Option<PathBuf>,
    },
}
