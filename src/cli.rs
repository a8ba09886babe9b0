use clap::Parser;
use std::path::PathBuf;

use crate::config::ConfigLayer;

/// Split a long recording into songs at its silent passages.
///
/// Settings come from built-in defaults, then the JSON config file, then any
/// flag given here.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config JSON file
    #[arg(long, value_name = "FILE", default_value = "config.json")]
    pub config: PathBuf,

    /// Input video file
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Minimum silence duration (seconds)
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<f64>,

    /// Silence threshold (e.g. -30dB)
    #[arg(long, value_name = "DB", allow_hyphen_values = true)]
    pub threshold: Option<String>,

    /// Minimum song length (seconds), 0 exports everything
    #[arg(long, value_name = "SECONDS")]
    pub minsonglength: Option<f64>,

    /// Output file prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Output directory
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Upload the output folder with rclone
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub upload: Option<bool>,

    /// rclone remote name (e.g. 'gdrive:')
    #[arg(long)]
    pub remote: Option<String>,

    /// Remote subfolder to upload to
    #[arg(long)]
    pub subfolder: Option<String>,

    /// Path to a .txt setlist file for renaming
    #[arg(long, value_name = "FILE")]
    pub setlist: Option<PathBuf>,
}

impl Cli {
    /// The settings given explicitly on the command line.
    pub fn overrides(&self) -> ConfigLayer {
        ConfigLayer {
            input_file: self.input.clone(),
            min_silence_duration: self.duration,
            silence_threshold: self.threshold.clone(),
            min_song_length: self.minsonglength,
            output_prefix: self.prefix.clone(),
            output_dir: self.output.clone(),
            upload_to_drive: self.upload,
            rclone_remote: self.remote.clone(),
            drive_subfolder: self.subfolder.clone(),
            setlist_file: self.setlist.clone(),
        }
    }
}
