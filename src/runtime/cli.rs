use std::path::PathBuf;

use clap::Parser;

/// Walk a music directory file by file and build a Spotify playlist from it.
#[derive(Debug, Parser)]
#[command(name = "setlist", version, about)]
pub struct Cli {
    /// Directory to review; prefills the directory form.
    pub dir: Option<PathBuf>,

    /// Name of the playlist to create; defaults to the directory name.
    #[arg(short, long)]
    pub playlist: Option<String>,

    /// Config file to use instead of the default location.
    #[arg(short, long, env = "SETLIST_CONFIG_PATH")]
    pub config: Option<PathBuf>,
}
