use log::{error, info, warn};
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static INVALID_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s\-]").expect("valid regex"));

const UNTITLED: &str = "Untitled_Song";

/// One title per line. Empty lines are skipped; a whitespace-only line still
/// takes a slot and ends up as the placeholder title.
pub fn read_setlist(path: &Path) -> io::Result<Vec<String>> {
    let contents = fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Makes a song title safe to use as a file name.
pub fn sanitize_title(title: &str) -> String {
    let name = INVALID_CHARS_RE.replace_all(title.trim(), "");
    let name = name.replace(' ', "_");
    if name.is_empty() {
        UNTITLED.to_string()
    } else {
        name
    }
}

/// `{NN} - {title}{.ext}` next to the original file.
fn renamed_path(original: &Path, number: usize, title: &str) -> PathBuf {
    let ext = original
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    original.with_file_name(format!("{:02} - {}{}", number, sanitize_title(title), ext))
}

/// Renames exported files after the setlist, pairing them by position.
///
/// Files beyond the last title keep their names; extra titles are ignored.
/// Returns the new paths of the files that were renamed.
pub fn rename_from_setlist(files: &[PathBuf], titles: &[String]) -> Vec<PathBuf> {
    if titles.len() < files.len() {
        warn!(
            "Setlist has {} songs, but {} files were exported. Only the first {} files will be renamed.",
            titles.len(),
            files.len(),
            titles.len()
        );
    } else if titles.len() > files.len() {
        warn!(
            "Setlist has {} songs, but only {} files were exported.",
            titles.len(),
            files.len()
        );
    }

    let mut renamed = Vec::new();
    for (i, (old_path, title)) in files.iter().zip(titles).enumerate() {
        let new_path = renamed_path(old_path, i + 1, title);
        match fs::rename(old_path, &new_path) {
            Ok(()) => {
                info!(
                    "Renamed '{}' -> '{}'",
                    old_path.file_name().unwrap_or_default().to_string_lossy(),
                    new_path.file_name().unwrap_or_default().to_string_lossy()
                );
                renamed.push(new_path);
            }
            Err(err) => error!(
                "Error renaming '{}' to '{}': {}",
                old_path.display(),
                new_path.display(),
                err
            ),
        }
    }
    renamed
}
