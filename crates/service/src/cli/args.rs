pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "keepsake")]
#[command(about = "An end-to-end encrypted secret store", version)]
pub struct Args {
    /// Server address
    #[arg(long, global = true, default_value = "http://localhost:3200")]
    pub remote: Url,

    /// Path to the user's PEM key file
    #[arg(long, global = true)]
    pub key: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}
