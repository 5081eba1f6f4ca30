//! Choosing the folder a run writes into.
//!
//! Without an explicit `--output`, the folder is named after the video's
//! title with every character outside `A-Z a-z 0-9 - _ . ( )` and space
//! dropped. Two different titles can collapse to the same folder name.

use std::path::{Path, PathBuf};

use crate::{configuration::DEFAULT_OUTPUT_FOLDER, fetch::VideoSource};

/// Keep only characters that are safe in a folder name.
///
/// Characters are dropped, not replaced.
///
/// ```
/// assert_eq!(ytframes::sanitize_title("Cool Video! #1"), "Cool Video 1");
/// ```
pub fn sanitize_title(title: &str) -> String {
    title.chars().filter(|&c| is_folder_safe(c)).collect()
}

fn is_folder_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '(' | ')' | ' ')
}

/// Decide the output folder for `url`.
///
/// An explicit folder wins. Otherwise the title is fetched (nothing is
/// downloaded) and sanitised. A failed lookup, a missing title, or a title
/// that sanitises to nothing, `.` or `..` all fall back to
/// [`DEFAULT_OUTPUT_FOLDER`].
pub fn resolve_output_folder<S: VideoSource + ?Sized>(
    explicit: Option<&Path>,
    url: &str,
    source: &S,
) -> PathBuf {
    if let Some(folder) = explicit {
        return folder.to_path_buf();
    }

    match source.fetch_title(url) {
        Ok(Some(title)) => {
            let folder = sanitize_title(&title);
            if matches!(folder.trim(), "" | "." | "..") {
                log::warn!("Title {title:?} is not usable as a folder name, using default output folder");
                PathBuf::from(DEFAULT_OUTPUT_FOLDER)
            } else {
                log::debug!("Output folder from title {title:?}: {folder:?}");
                PathBuf::from(folder)
            }
        }
        Ok(None) => {
            log::warn!("No title available for {url}, using default output folder");
            PathBuf::from(DEFAULT_OUTPUT_FOLDER)
        }
        Err(error) => {
            log::warn!("Failed to fetch video information: {error}");
            log::warn!("Using default output folder");
            PathBuf::from(DEFAULT_OUTPUT_FOLDER)
        }
    }
}
