mod cli;
mod config;
mod export;
mod ffmpeg;
mod rclone;
mod setlist;
mod silence;

use anyhow::{bail, Context};
use clap::Parser;
use env_logger::Env;
use log::{error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{resolve, Config, ConfigLayer};
use crate::ffmpeg::Ffmpeg;
use crate::rclone::Rclone;

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let file = match ConfigLayer::from_file(&cli.config) {
        Ok(layer) => layer,
        Err(err) => {
            warn!("{}. Using defaults.", err);
            None
        }
    };

    let config = resolve(Config::default(), file, cli.overrides());
    config.validate()?;
    Ok(config)
}

fn rename_stage(setlist_file: &Path, exported: &[PathBuf]) {
    info!("--- Renaming files from setlist ---");
    let titles = match setlist::read_setlist(setlist_file) {
        Ok(titles) => titles,
        Err(err) => {
            error!(
                "Could not read setlist file '{}': {}. Skipping rename.",
                setlist_file.display(),
                err
            );
            return;
        }
    };
    setlist::rename_from_setlist(exported, &titles);
    info!("--- Setlist renaming complete ---");
}

fn upload_stage(rclone: &Rclone, config: &Config) {
    if !config.output_dir.exists() {
        info!(
            "Skipping upload, output directory '{}' does not exist.",
            config.output_dir.display()
        );
        return;
    }

    info!("--- Starting upload ---");
    let destination = config.remote_destination();
    info!(
        "Uploading local folder '{}' to '{}'",
        config.output_dir.display(),
        destination
    );
    match rclone.copy(&config.output_dir, &destination) {
        Ok(()) => info!("--- Upload complete ---"),
        Err(err) => {
            error!("rclone upload failed: {}", err);
            error!("Please ensure rclone is installed and configured ('rclone config').");
        }
    }
}

fn run(config: &Config) -> anyhow::Result<()> {
    info!(
        "Using config: Input='{}', Duration={:.1}s, Threshold={}, MinSong={:.1}s, Output='{}'",
        config.input_file.display(),
        config.min_silence_duration,
        config.silence_threshold,
        config.min_song_length,
        config.output_dir.display()
    );

    let rclone = if config.upload_to_drive {
        info!("Upload enabled, running rclone pre-check...");
        let rclone = Rclone::locate()?;
        rclone.ensure_remote(&config.remote_root()).context(
            "rclone pre-check failed, check 'rclone config' and your remote permissions",
        )?;
        info!("rclone connection successful.");
        Some(rclone)
    } else {
        None
    };

    let ffmpeg = Ffmpeg::locate()?;

    if !config.input_file.exists() {
        bail!("input file '{}' not found", config.input_file.display());
    }

    info!("Getting video duration...");
    let total_duration = ffmpeg
        .probe_duration(&config.input_file)
        .with_context(|| format!("failed to probe '{}'", config.input_file.display()))?;
    info!("Total video duration: {:.2} seconds", total_duration);

    info!("Detecting silence... This may take a few minutes.");
    let silences = ffmpeg
        .detect_silence(
            &config.input_file,
            &config.silence_threshold,
            config.min_silence_duration,
        )
        .with_context(|| {
            format!(
                "failed to detect silence in '{}'",
                config.input_file.display()
            )
        })?;

    if silences.is_empty() {
        info!("No silence detected.");
        if total_duration >= config.min_song_length {
            info!("Treating the entire recording as one song.");
        }
    }
    let songs = silence::plan_song_segments(&silences, total_duration, config.min_song_length);

    let exported = if songs.is_empty() {
        info!("No song segments found that meet the minimum length criteria.");
        Vec::new()
    } else {
        info!(
            "Found {} non-silent (song) segment(s) that meet criteria.",
            songs.len()
        );
        if !config.output_dir.exists() {
            fs::create_dir_all(&config.output_dir).with_context(|| {
                format!(
                    "could not create output directory '{}'",
                    config.output_dir.display()
                )
            })?;
            info!("Created output directory: {}", config.output_dir.display());
        }
        export::export_segments(
            &ffmpeg,
            &config.input_file,
            &config.output_dir,
            &config.output_prefix,
            &songs,
        )
    };

    if let Some(setlist_file) = &config.setlist_file {
        if exported.is_empty() {
            info!("Skipping setlist rename, no files were exported.");
        } else {
            rename_stage(setlist_file, &exported);
        }
    }

    if let Some(rclone) = &rclone {
        upload_stage(rclone, config);
    }

    info!("All done!");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    info!("Starting set splitter...");
    let config = load_config(&cli)?;
    run(&config)
}
