//! Resolving a video URL to its title and to a local media file.
//!
//! Fetching is delegated to an external program. [`VideoSource`] is the seam
//! the pipeline talks to; [`YtDlp`] implements it by running `yt-dlp`.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use ytframes::{VideoSource, YtDlp};
//!
//! let fetcher = YtDlp::new();
//! let title = fetcher.fetch_title("https://youtu.be/dQw4w9WgXcQ")?;
//! let clip = fetcher.download("https://youtu.be/dQw4w9WgXcQ", Path::new("frames"))?;
//! # Ok::<(), ytframes::YtFramesError>(())
//! ```

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
};

use serde_json::Value;

use crate::error::YtFramesError;

/// Something that can look up and download videos by URL.
pub trait VideoSource {
    /// Look up the video's title without downloading it.
    ///
    /// Returns `Ok(None)` when the source has no title for the video.
    fn fetch_title(&self, url: &str) -> Result<Option<String>, YtFramesError>;

    /// Download the video into `destination`, named after its title, and
    /// return the path of the written file.
    fn download(&self, url: &str, destination: &Path) -> Result<PathBuf, YtFramesError>;
}

impl<S: VideoSource + ?Sized> VideoSource for &S {
    fn fetch_title(&self, url: &str) -> Result<Option<String>, YtFramesError> {
        (**self).fetch_title(url)
    }

    fn download(&self, url: &str, destination: &Path) -> Result<PathBuf, YtFramesError> {
        (**self).download(url, destination)
    }
}

/// [`VideoSource`] backed by the `yt-dlp` command-line program.
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
    format: Option<String>,
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new()
    }
}

impl YtDlp {
    /// Use `yt-dlp` from `PATH` with its default format selection.
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("yt-dlp"),
            format: None,
        }
    }

    /// Run a specific `yt-dlp` executable.
    #[must_use]
    pub fn with_program<P: AsRef<Path>>(mut self, program: P) -> Self {
        self.program = program.as_ref().to_path_buf();
        self
    }

    /// Pass a format selector (`-f`) to `yt-dlp`, e.g. `"mp4"` or
    /// `"bv*[height<=720]"`.
    #[must_use]
    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    fn run(&self, url: &str, arguments: &[&OsStr]) -> Result<Output, YtFramesError> {
        let program = self.program.display().to_string();
        log::debug!("Running {program} with {arguments:?}");

        let output = Command::new(&self.program)
            .args(arguments)
            .arg("--")
            .arg(url)
            .stdin(Stdio::null())
            .output()
            .map_err(|error| YtFramesError::FetcherUnavailable {
                program: program.clone(),
                reason: error.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("{program} exited with {}", output.status));
            return Err(YtFramesError::FetchFailed {
                url: url.to_string(),
                reason,
            });
        }

        Ok(output)
    }
}

impl VideoSource for YtDlp {
    fn fetch_title(&self, url: &str) -> Result<Option<String>, YtFramesError> {
        let output = self.run(
            url,
            &[
                OsStr::new("--dump-single-json"),
                OsStr::new("--skip-download"),
                OsStr::new("--no-warnings"),
            ],
        )?;
        let info: Value =
            serde_json::from_slice(&output.stdout).map_err(|error| YtFramesError::FetchFailed {
                url: url.to_string(),
                reason: format!("unreadable video info: {error}"),
            })?;
        Ok(title_from_info(&info))
    }

    fn download(&self, url: &str, destination: &Path) -> Result<PathBuf, YtFramesError> {
        let template = destination.join("%(title)s.%(ext)s");
        let mut arguments: Vec<&OsStr> = vec![
            OsStr::new("-o"),
            template.as_os_str(),
            OsStr::new("--print"),
            OsStr::new("after_move:filepath"),
            OsStr::new("--no-simulate"),
            OsStr::new("--no-warnings"),
        ];
        if let Some(format) = &self.format {
            arguments.push(OsStr::new("-f"));
            arguments.push(OsStr::new(format));
        }

        let output = self.run(url, &arguments)?;
        let path = downloaded_path(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| {
            YtFramesError::FetchFailed {
                url: url.to_string(),
                reason: "no file name reported".to_string(),
            }
        })?;

        if !path.is_file() {
            return Err(YtFramesError::MissingDownload { path });
        }
        log::info!("Downloaded {}", path.display());
        Ok(path)
    }
}

/// Pull the `title` field out of `yt-dlp`'s JSON info dictionary.
fn title_from_info(info: &Value) -> Option<String> {
    info.get("title")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// The final file path is the last non-empty line `yt-dlp` prints.
fn downloaded_path(stdout: &str) -> Option<PathBuf> {
    stdout
        .lines()
        .map(str::trim)
        .rev()
        .find(|line| !line.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use serde_json::json;

    use super::{VideoSource, YtDlp, downloaded_path, title_from_info};
    use crate::error::YtFramesError;

    #[test]
    fn title_is_read_from_info() {
        let info = json!({ "id": "abc", "title": "Cool Video! #1" });
        assert_eq!(title_from_info(&info).as_deref(), Some("Cool Video! #1"));
        assert_eq!(title_from_info(&json!({ "id": "abc" })), None);
        assert_eq!(title_from_info(&json!({ "title": 7 })), None);
    }

    #[test]
    fn downloaded_path_takes_last_line() {
        let stdout = "frames/Some Title.webm\n\n";
        assert_eq!(
            downloaded_path(stdout),
            Some(PathBuf::from("frames/Some Title.webm"))
        );
        assert_eq!(downloaded_path("  \n"), None);
    }

    #[test]
    fn missing_program_is_reported() {
        let fetcher = YtDlp::new().with_program("/nonexistent/yt-dlp-for-tests");
        let result = fetcher.download("https://example.invalid/watch", Path::new("."));
        assert!(matches!(
            result,
            Err(YtFramesError::FetcherUnavailable { .. })
        ));
    }
}
