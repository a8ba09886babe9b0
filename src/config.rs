use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("minimum song length must be zero or more, got {0}")]
    NegativeMinSongLength(f64),
}

/// Settings for one run, resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input_file: PathBuf,
    pub min_silence_duration: f64,
    pub silence_threshold: String,
    pub min_song_length: f64,
    pub output_prefix: String,
    pub output_dir: PathBuf,
    pub upload_to_drive: bool,
    pub rclone_remote: String,
    pub drive_subfolder: String,
    pub setlist_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_file: PathBuf::from("practice_session.mp4"),
            min_silence_duration: 2.0,
            silence_threshold: "-12dB".to_string(),
            min_song_length: 200.0,
            output_prefix: "Song".to_string(),
            output_dir: PathBuf::from("output"),
            upload_to_drive: false,
            rclone_remote: "gdrive:".to_string(),
            drive_subfolder: "SplitSongs".to_string(),
            setlist_file: None,
        }
    }
}

/// A partial set of settings. `None` means the layer did not mention the key.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct ConfigLayer {
    pub input_file: Option<PathBuf>,
    pub min_silence_duration: Option<f64>,
    pub silence_threshold: Option<String>,
    pub min_song_length: Option<f64>,
    pub output_prefix: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub upload_to_drive: Option<bool>,
    pub rclone_remote: Option<String>,
    pub drive_subfolder: Option<String>,
    pub setlist_file: Option<PathBuf>,
}

impl ConfigLayer {
    /// Reads a JSON layer. A missing file is not an error and yields `None`.
    pub fn from_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str::<ConfigLayer>(&data)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    fn apply_to(self, mut config: Config) -> Config {
        if let Some(input_file) = self.input_file {
            config.input_file = input_file;
        }
        if let Some(duration) = self.min_silence_duration {
            config.min_silence_duration = duration;
        }
        if let Some(threshold) = self.silence_threshold {
            config.silence_threshold = threshold;
        }
        if let Some(length) = self.min_song_length {
            config.min_song_length = length;
        }
        if let Some(prefix) = self.output_prefix {
            config.output_prefix = prefix;
        }
        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }
        if let Some(upload) = self.upload_to_drive {
            config.upload_to_drive = upload;
        }
        if let Some(remote) = self.rclone_remote {
            config.rclone_remote = remote;
        }
        if let Some(subfolder) = self.drive_subfolder {
            config.drive_subfolder = subfolder;
        }
        if let Some(setlist) = self.setlist_file {
            // An empty path switches renaming off.
            config.setlist_file = (!setlist.as_os_str().is_empty()).then_some(setlist);
        }
        config
    }
}

/// Merges `defaults < file < cli`. Any key present in a later layer wins.
pub fn resolve(defaults: Config, file: Option<ConfigLayer>, cli: ConfigLayer) -> Config {
    let config = match file {
        Some(file) => file.apply_to(defaults),
        None => defaults,
    };
    cli.apply_to(config)
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_song_length >= 0.0) {
            return Err(ConfigError::NegativeMinSongLength(self.min_song_length));
        }
        Ok(())
    }

    /// The directory `rclone mkdir` is pointed at before the run.
    pub fn remote_root(&self) -> String {
        format!("{}{}", self.rclone_remote, self.drive_subfolder)
    }

    /// Where the output directory ends up on the remote.
    pub fn remote_destination(&self) -> String {
        format!("{}/{}", self.remote_root(), self.output_dir.display())
    }
}
