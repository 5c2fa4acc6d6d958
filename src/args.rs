use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "guess-the-movie", about = "Daily movie trivia in the terminal")]
pub struct Args {
    /// Base URL of the puzzle server
    #[arg(long, default_value = "http://localhost:3000")]
    pub server: String,

    /// Play the archive puzzle for this date (YYYY-MM-DD) instead of the latest
    #[arg(long)]
    pub date: Option<String>,

    /// History database file (defaults to the platform data directory)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Directory for the rolling log file
    #[arg(long, default_value = "logs")]
    pub log_dir: PathBuf,
}
