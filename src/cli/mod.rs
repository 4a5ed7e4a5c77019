pub mod check;
pub mod serve;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gallery")]
#[command(version)]
#[command(about = "Upload images and videos and browse them newest first", long_about = None)]
pub struct Cli {
    /// Optional TOML file; environment variables override its values.
    #[arg(short, long, default_value = "gallery.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the gallery web server
    Serve {
        #[arg(short = 'H', long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the resolved configuration with secrets masked
    Check,
}
