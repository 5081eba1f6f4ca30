//! Metadata types.
//!
//! [`RunMetadata`] is the `meta.json` sidecar describing how a set of frames
//! was produced. [`VideoMetadata`] describes the decoded video stream and is
//! probed when a [`FfmpegFrameSource`](crate::FfmpegFrameSource) is opened.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::{configuration::META_FILE_NAME, error::YtFramesError};

/// The four run parameters recorded next to the extracted frames.
///
/// Values are stored exactly as supplied; the times keep their original
/// `mm:ss[.ss]` spelling.
///
/// ```no_run
/// use std::path::Path;
///
/// use ytframes::RunMetadata;
///
/// let meta = RunMetadata {
///     url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
///     start_time: "0:10".to_string(),
///     end_time: "0:12".to_string(),
///     frame_interval: 1,
/// };
/// let path = meta.save(Path::new("frames"))?;
/// assert_eq!(RunMetadata::read(&path)?, meta);
/// # Ok::<(), ytframes::YtFramesError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetadata {
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Start Time")]
    pub start_time: String,
    #[serde(rename = "End Time")]
    pub end_time: String,
    #[serde(rename = "Frame Interval")]
    pub frame_interval: u64,
}

impl RunMetadata {
    /// Write `meta.json` into `directory`, replacing any existing file.
    ///
    /// Returns the path of the written file.
    pub fn save(&self, directory: &Path) -> Result<PathBuf, YtFramesError> {
        let path = directory.join(META_FILE_NAME);
        let mut writer = BufWriter::new(File::create(&path)?);
        let mut serializer =
            Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut serializer)?;
        writer.flush()?;

        log::info!("Meta file saved successfully: {}", path.display());
        Ok(path)
    }

    /// Read a sidecar written by [`save`](RunMetadata::save).
    pub fn read(path: &Path) -> Result<Self, YtFramesError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Metadata for a video stream.
#[derive(Debug, Clone)]
#[must_use]
pub struct VideoMetadata {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second as reported by the container.
    pub frames_per_second: f64,
    /// Estimated total number of frames, computed from duration and frame rate.
    pub frame_count: u64,
    /// Codec name (e.g. `"h264"`, `"vp9"`, `"av1"`).
    pub codec: String,
}
