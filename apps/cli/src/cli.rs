use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "TelDrive command-line client", long_about = None)]
pub struct Cli {
    /// Config file (defaults to ~/.config/teldrive/driver.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// List a folder
    Ls {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Create a folder
    Mkdir { path: String },
    /// Delete a file or folder
    Rm { path: String },
    /// Rename a file or folder in place
    Rename { path: String, new_name: String },
    /// Move a file or folder into another folder
    Mv { path: String, dest_dir: String },
    /// Print the download URL of a file
    Link { path: String },
    /// Upload a local file, resuming an earlier interrupted upload
    Put {
        /// local file
        src: PathBuf,
        /// destination folder
        #[arg(default_value = "/")]
        dest_dir: String,
        /// remote name (defaults to the local file name)
        #[arg(long)]
        name: Option<String>,
    },
}
