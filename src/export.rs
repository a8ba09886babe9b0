use log::{error, info};
use std::path::{Path, PathBuf};

use crate::ffmpeg::{Ffmpeg, FfmpegError};
use crate::silence::Interval;

/// Something that can cut a lossless sub-clip out of a media file.
pub trait ClipExporter {
    fn export_clip(
        &self,
        input_file: &Path,
        output_file: &Path,
        start: f64,
        duration: f64,
    ) -> Result<(), FfmpegError>;
}

impl ClipExporter for Ffmpeg {
    fn export_clip(
        &self,
        input_file: &Path,
        output_file: &Path,
        start: f64,
        duration: f64,
    ) -> Result<(), FfmpegError> {
        self.copy_clip(input_file, output_file, start, duration)
    }
}

/// `{output_dir}/{prefix}_{NN}{.ext}` with a 1-based index.
pub fn clip_path(output_dir: &Path, prefix: &str, index: usize, input_file: &Path) -> PathBuf {
    let ext = input_file
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    output_dir.join(format!("{}_{:02}{}", prefix, index, ext))
}

/// Exports each segment in order and returns the files that were written.
///
/// A failed segment is logged and left out; the rest still run.
pub fn export_segments<E: ClipExporter>(
    exporter: &E,
    input_file: &Path,
    output_dir: &Path,
    prefix: &str,
    segments: &[Interval],
) -> Vec<PathBuf> {
    let mut exported = Vec::with_capacity(segments.len());

    for (i, segment) in segments.iter().enumerate() {
        let number = i + 1;
        let output_file = clip_path(output_dir, prefix, number, input_file);
        let duration = segment.length();
        info!(
            "Exporting segment {}: {} (from {:.2}s, duration {:.2}s)",
            number,
            output_file.display(),
            segment.start,
            duration
        );

        match exporter.export_clip(input_file, &output_file, segment.start, duration) {
            Ok(()) => exported.push(output_file),
            Err(err) => error!("Error splitting segment {}: {}", number, err),
        }
    }

    exported
}
