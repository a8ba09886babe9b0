use log::{debug, info};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

use crate::ffmpeg::command_line;

#[derive(Debug, Error)]
pub enum RcloneError {
    #[error("upload is enabled but 'rclone' was not found in PATH")]
    NotFound,

    #[error("failed to run rclone: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("could not access rclone remote '{destination}': {stderr}")]
    Unreachable { destination: String, stderr: String },

    #[error("rclone copy to '{destination}' exited with {status}")]
    CopyFailed { destination: String, status: String },
}

/// A located `rclone` executable.
#[derive(Debug, Clone)]
pub struct Rclone {
    executable: PathBuf,
}

impl Rclone {
    pub fn locate() -> Result<Self, RcloneError> {
        let executable = which::which("rclone").map_err(|_| RcloneError::NotFound)?;
        debug!("Using rclone at {}", executable.display());
        Ok(Rclone { executable })
    }

    /// Checks the remote is usable by creating the destination directory.
    pub fn ensure_remote(&self, destination: &str) -> Result<(), RcloneError> {
        info!("Verifying rclone remote and permissions...");
        let mut command = self.mkdir_command(destination);
        debug!("Executing: {}", command_line(&command));

        let output = command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()?;

        if output.status.success() {
            Ok(())
        } else {
            Err(RcloneError::Unreachable {
                destination: destination.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    /// Copies `local_dir` to `destination`. Files that exist only remotely are left alone.
    pub fn copy(&self, local_dir: &Path, destination: &str) -> Result<(), RcloneError> {
        let mut command = self.copy_command(local_dir, destination);
        debug!("Executing: {}", command_line(&command));

        // Progress goes straight to the terminal.
        let status = command.stdin(Stdio::null()).status()?;
        if status.success() {
            Ok(())
        } else {
            Err(RcloneError::CopyFailed {
                destination: destination.to_string(),
                status: status.to_string(),
            })
        }
    }

    fn mkdir_command(&self, destination: &str) -> Command {
        let mut command = Command::new(&self.executable);
        command.arg("mkdir").arg(destination);
        command
    }

    fn copy_command(&self, local_dir: &Path, destination: &str) -> Command {
        let mut command = Command::new(&self.executable);
        command.arg("copy").arg(local_dir).arg(destination).arg("-P");
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_remote_names_destination_and_tool_error() {
        let err = RcloneError::Unreachable {
            destination: "gdrive:SplitSongs".to_string(),
            stderr: "didn't find section in config file".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("gdrive:SplitSongs"));
        assert!(message.contains("didn't find section"));
    }

    #[test]
    fn failed_copy_names_destination() {
        let err = RcloneError::CopyFailed {
            destination: "gdrive:SplitSongs/output".to_string(),
            status: "exit status: 3".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "rclone copy to 'gdrive:SplitSongs/output' exited with exit status: 3"
        );
    }

    fn rclone() -> Rclone {
        Rclone {
            executable: PathBuf::from("rclone"),
        }
    }

    fn args(command: &Command) -> Vec<String> {
        command
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn pre_check_creates_the_remote_root() {
        let command = rclone().mkdir_command("gdrive:SplitSongs");
        assert_eq!(args(&command), ["mkdir", "gdrive:SplitSongs"]);
    }

    #[test]
    fn upload_copies_without_deleting_remote_files() {
        let command = rclone().copy_command(Path::new("output"), "gdrive:SplitSongs/output");
        let args = args(&command);
        assert_eq!(args, ["copy", "output", "gdrive:SplitSongs/output", "-P"]);
        assert!(!args.iter().any(|arg| arg == "sync"));
    }
}
