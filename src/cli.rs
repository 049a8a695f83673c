use std::path::PathBuf;

use clap::Parser;

/// Run a desktop pet headlessly, reading pointer events as JSON lines on
/// stdin and logging what would be drawn.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the settings file (created by --init-settings)
    #[arg(long, default_value = "deskpet.json")]
    pub settings: PathBuf,

    /// Sprite sheet, or a single still image when no manifest is given
    #[arg(long)]
    pub sheet: PathBuf,

    /// JSON frame manifest describing the sprite sheet
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Seed for the wandering decisions, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write default settings to --settings and exit
    #[arg(long)]
    pub init_settings: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}
