use log::{debug, warn};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::LazyLock;
use thiserror::Error;

use crate::silence::Interval;

static SILENCE_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"silence_start: (\d+\.?\d*)").expect("valid regex"));
static SILENCE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"silence_end: (\d+\.?\d*)").expect("valid regex"));
static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Duration: (\d{2}):(\d{2}):(\d{2})\.(\d{2})").expect("valid regex")
});

#[derive(Debug, Error)]
pub enum FfmpegError {
    #[error("'ffmpeg' was not found in PATH, install FFmpeg and make sure it is on your PATH")]
    NotFound,

    #[error("failed to run ffmpeg: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("could not parse duration from ffmpeg output:\n{output}")]
    DurationNotFound { output: String },

    #[error("ffmpeg exited with {status}:\n{output}")]
    Failed { status: String, output: String },
}

/// A located `ffmpeg` executable.
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    executable: PathBuf,
}

impl Ffmpeg {
    pub fn locate() -> Result<Self, FfmpegError> {
        let executable = which::which("ffmpeg").map_err(|_| FfmpegError::NotFound)?;
        debug!("Using ffmpeg at {}", executable.display());
        Ok(Ffmpeg { executable })
    }

    /// Reads the total duration from the banner `ffmpeg -i` prints.
    pub fn probe_duration(&self, input_file: &Path) -> Result<f64, FfmpegError> {
        // Without an output file ffmpeg always exits non-zero; only the banner matters.
        let output = run(&mut self.probe_command(input_file))?;
        parse_duration(&String::from_utf8_lossy(&output.stderr))
    }

    pub fn detect_silence(
        &self,
        input_file: &Path,
        threshold: &str,
        min_silence_duration: f64,
    ) -> Result<Vec<Interval>, FfmpegError> {
        let mut command = self.silence_command(input_file, threshold, min_silence_duration);
        let output = run(&mut command)?;
        if !output.status.success() {
            warn!(
                "Silence detection exited with {}, using whatever it reported",
                output.status
            );
        }

        Ok(parse_silences(&String::from_utf8_lossy(&output.stderr)))
    }

    /// Copies `[start, start + duration)` of the input into `output_file` without re-encoding.
    pub fn copy_clip(
        &self,
        input_file: &Path,
        output_file: &Path,
        start: f64,
        duration: f64,
    ) -> Result<(), FfmpegError> {
        let mut command = self.clip_command(input_file, output_file, start, duration);
        let output = run(&mut command)?;
        if output.status.success() {
            Ok(())
        } else {
            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&output.stderr));
            Err(FfmpegError::Failed {
                status: output.status.to_string(),
                output: text,
            })
        }
    }

    fn probe_command(&self, input_file: &Path) -> Command {
        let mut command = Command::new(&self.executable);
        command.arg("-i").arg(input_file);
        command
    }

    fn silence_command(
        &self,
        input_file: &Path,
        threshold: &str,
        min_silence_duration: f64,
    ) -> Command {
        let mut command = Command::new(&self.executable);
        command
            .arg("-i")
            .arg(input_file)
            .arg("-af")
            .arg(format!(
                "silencedetect=noise={}:d={:.1}",
                threshold, min_silence_duration
            ))
            .arg("-f")
            .arg("null")
            .arg("-");
        command
    }

    fn clip_command(
        &self,
        input_file: &Path,
        output_file: &Path,
        start: f64,
        duration: f64,
    ) -> Command {
        let mut command = Command::new(&self.executable);
        command
            .arg("-y")
            .arg("-i")
            .arg(input_file)
            .arg("-ss")
            .arg(format!("{:.3}", start))
            .arg("-t")
            .arg(format!("{:.3}", duration))
            .arg("-c:v")
            .arg("copy")
            .arg("-c:a")
            .arg("copy")
            .arg(output_file);
        command
    }
}

pub(crate) fn command_line(command: &Command) -> String {
    format!(
        "{:?} {}",
        command.get_program(),
        command
            .get_args()
            .map(|arg| arg.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    )
}

fn run(command: &mut Command) -> Result<Output, FfmpegError> {
    debug!("Executing: {}", command_line(command));
    let output = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()?;
    Ok(output)
}

fn parse_markers(output: &str, pattern: &Regex) -> Vec<f64> {
    pattern
        .captures_iter(output)
        .filter_map(|cap| cap[1].parse::<f64>().ok())
        .collect()
}

/// Pairs the n-th `silence_start` with the n-th `silence_end`.
fn parse_silences(output: &str) -> Vec<Interval> {
    let starts = parse_markers(output, &SILENCE_START_RE);
    let ends = parse_markers(output, &SILENCE_END_RE);

    starts
        .into_iter()
        .zip(ends)
        .map(|(start, end)| Interval::new(start, end))
        .collect()
}

fn parse_duration(output: &str) -> Result<f64, FfmpegError> {
    let not_found = || FfmpegError::DurationNotFound {
        output: output.to_string(),
    };

    let cap = DURATION_RE.captures(output).ok_or_else(not_found)?;
    let field = |i: usize| cap[i].parse::<f64>().map_err(|_| not_found());

    let hours = field(1)?;
    let minutes = field(2)?;
    let seconds = field(3)?;
    let hundredths = field(4)?;
    Ok(hours * 3600.0 + minutes * 60.0 + seconds + hundredths / 100.0)
}
