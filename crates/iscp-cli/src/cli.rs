use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "iscp")]
#[command(about = "Mask PII in a dataset and publish the cleaned release", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Working directory for inputs and outputs (default: current directory)
    #[arg(long, global = true)]
    pub workdir: Option<PathBuf>,

    /// Config file (default: iscp.toml in the working directory)
    #[arg(long, global = true, env = "ISCP_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Mask, export, document, archive and push
    Run {
        /// Stop after building the archive
        #[arg(long)]
        skip_publish: bool,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Mask, export, document and archive without pushing
    Package {
        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Mask a single CSV file into a spreadsheet
    Mask {
        /// CSV file to mask
        input: PathBuf,

        /// Spreadsheet to write (default: <input>_cleaned.xlsx)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Column holding email addresses
        #[arg(long)]
        email_column: Option<String>,

        /// Column holding phone numbers
        #[arg(long)]
        phone_column: Option<String>,
    },

    /// Commit the working directory and force-push it to the remote
    Publish,

    /// Write a default iscp.toml
    Init {
        /// Account that owns the remote repository
        #[arg(long)]
        user: Option<String>,
    },

    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}
