//! Run configuration and named defaults.
//!
//! [`RunConfiguration`] is built once per invocation, from the command line
//! or programmatically, and is read-only afterwards. [`GifOptions`] carries
//! the settings of the optional GIF assembly step.
//!
//! # Example
//!
//! ```
//! use ytframes::RunConfiguration;
//!
//! let config = RunConfiguration::new("https://youtu.be/dQw4w9WgXcQ", "0:10", "0:12.5")?
//!     .with_frame_interval(5)
//!     .with_save_meta(true)
//!     .with_create_gif(true);
//! assert_eq!(config.frame_interval(), 5);
//! # Ok::<(), ytframes::YtFramesError>(())
//! ```

use std::path::{Path, PathBuf};

use crate::{error::YtFramesError, timecode::Timecode};

/// Sample every frame unless told otherwise.
pub const DEFAULT_FRAME_INTERVAL: u64 = 1;
/// Output folder used when no title can be derived.
pub const DEFAULT_OUTPUT_FOLDER: &str = "frames";
/// Image extension (and therefore format) of written frames.
pub const DEFAULT_FRAME_EXTENSION: &str = "jpg";
/// Total GIF playback time in hundredths of a second.
pub const DEFAULT_GIF_DURATION: u32 = 100;
/// File name of the metadata sidecar.
pub const META_FILE_NAME: &str = "meta.json";
/// File name of the assembled GIF.
pub const GIF_FILE_NAME: &str = "frames.gif";
/// Prefix of every frame image file name.
pub const FRAME_FILE_PREFIX: &str = "frame_";

/// How frame images are ordered when assembling a GIF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameOrder {
    /// Sort by the frame index embedded in the file name. This is the default
    /// and matches temporal order.
    #[default]
    Numeric,
    /// Sort file names as strings, so `frame_10` comes before `frame_2`.
    Lexicographic,
}

/// Configuration for the GIF assembly step.
#[derive(Debug, Clone)]
pub struct GifOptions {
    /// Total playback time of one loop, in hundredths of a second. Split
    /// evenly across all frames.
    pub total_duration: u32,
    /// How many times the GIF should repeat. `None` means loop forever.
    pub repeat: Option<u16>,
    /// Ordering applied to the frame files before encoding.
    pub order: FrameOrder,
    /// Only files ending in `.<frame_extension>` are read.
    pub frame_extension: String,
}

impl Default for GifOptions {
    fn default() -> Self {
        Self {
            total_duration: DEFAULT_GIF_DURATION,
            repeat: None,
            order: FrameOrder::Numeric,
            frame_extension: DEFAULT_FRAME_EXTENSION.to_string(),
        }
    }
}

impl GifOptions {
    /// Create a new [`GifOptions`] with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total playback time in hundredths of a second.
    #[must_use]
    pub fn with_total_duration(mut self, hundredths: u32) -> Self {
        self.total_duration = hundredths;
        self
    }

    /// Set the repeat count. `None` means loop forever.
    #[must_use]
    pub fn with_repeat(mut self, repeat: Option<u16>) -> Self {
        self.repeat = repeat;
        self
    }

    /// Set how frame files are ordered.
    #[must_use]
    pub fn with_order(mut self, order: FrameOrder) -> Self {
        self.order = order;
        self
    }

    /// Set the extension of the frame files to read.
    #[must_use]
    pub fn with_frame_extension(mut self, extension: &str) -> Self {
        self.frame_extension = normalize_extension(extension);
        self
    }

    /// Per-frame delay for `frame_count` frames, in hundredths of a second.
    ///
    /// Rounded to the nearest unit and never below one, since most viewers
    /// replace a zero delay with their own default.
    pub fn frame_delay(&self, frame_count: usize) -> u16 {
        if frame_count == 0 {
            return 0;
        }
        let delay = (f64::from(self.total_duration) / frame_count as f64).round();
        delay.clamp(1.0, f64::from(u16::MAX)) as u16
    }
}

/// Everything one invocation needs to know.
#[derive(Debug, Clone)]
pub struct RunConfiguration {
    url: String,
    start_text: String,
    end_text: String,
    start: Timecode,
    end: Timecode,
    frame_interval: u64,
    output: Option<PathBuf>,
    remove_clip: bool,
    save_meta: bool,
    create_gif: bool,
    frame_extension: String,
    gif: GifOptions,
}

impl RunConfiguration {
    /// Create a configuration for `url` between `start` and `end`.
    ///
    /// # Errors
    ///
    /// Returns [`YtFramesError::InvalidTimeFormat`] if either time is not
    /// `mm:ss` or `mm:ss.ss`.
    pub fn new(url: &str, start: &str, end: &str) -> Result<Self, YtFramesError> {
        Ok(Self {
            url: url.to_string(),
            start_text: start.to_string(),
            end_text: end.to_string(),
            start: Timecode::parse(start)?,
            end: Timecode::parse(end)?,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            output: None,
            remove_clip: false,
            save_meta: false,
            create_gif: false,
            frame_extension: DEFAULT_FRAME_EXTENSION.to_string(),
            gif: GifOptions::default(),
        })
    }

    /// Sample only frames whose index is a multiple of `interval`.
    ///
    /// Zero is rejected by [`validate`](RunConfiguration::validate), which a
    /// [`Pipeline`](crate::Pipeline) runs before fetching anything.
    #[must_use]
    pub fn with_frame_interval(mut self, interval: u64) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Check the settings that the builders cannot reject on their own.
    ///
    /// # Errors
    ///
    /// Returns [`YtFramesError::InvalidInterval`] for a frame interval of zero.
    pub fn validate(&self) -> Result<(), YtFramesError> {
        if self.frame_interval == 0 {
            return Err(YtFramesError::InvalidInterval);
        }
        Ok(())
    }

    /// Write everything into `output` instead of a folder named after the
    /// video title.
    #[must_use]
    pub fn with_output<P: AsRef<Path>>(mut self, output: P) -> Self {
        self.output = Some(output.as_ref().to_path_buf());
        self
    }

    /// Delete the downloaded media file once frames are extracted.
    #[must_use]
    pub fn with_remove_clip(mut self, remove: bool) -> Self {
        self.remove_clip = remove;
        self
    }

    /// Write the `meta.json` sidecar.
    #[must_use]
    pub fn with_save_meta(mut self, save: bool) -> Self {
        self.save_meta = save;
        self
    }

    /// Assemble the extracted frames into `frames.gif`.
    #[must_use]
    pub fn with_create_gif(mut self, create: bool) -> Self {
        self.create_gif = create;
        self
    }

    /// Set the image extension used for frame files (`jpg`, `png`, ...).
    ///
    /// The GIF step reads back files with the same extension.
    #[must_use]
    pub fn with_frame_extension(mut self, extension: &str) -> Self {
        self.frame_extension = normalize_extension(extension);
        self.gif.frame_extension = self.frame_extension.clone();
        self
    }

    /// Replace the GIF settings. The frame extension is kept in sync with
    /// [`frame_extension`](RunConfiguration::frame_extension).
    #[must_use]
    pub fn with_gif_options(mut self, gif: GifOptions) -> Self {
        self.gif = gif;
        self.gif.frame_extension = self.frame_extension.clone();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Start time exactly as supplied.
    pub fn start_text(&self) -> &str {
        &self.start_text
    }

    /// End time exactly as supplied.
    pub fn end_text(&self) -> &str {
        &self.end_text
    }

    pub fn start(&self) -> Timecode {
        self.start
    }

    pub fn end(&self) -> Timecode {
        self.end
    }

    pub fn frame_interval(&self) -> u64 {
        self.frame_interval
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn remove_clip(&self) -> bool {
        self.remove_clip
    }

    pub fn save_meta(&self) -> bool {
        self.save_meta
    }

    pub fn create_gif(&self) -> bool {
        self.create_gif
    }

    pub fn frame_extension(&self) -> &str {
        &self.frame_extension
    }

    pub fn gif(&self) -> &GifOptions {
        &self.gif
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{GifOptions, RunConfiguration, YtFramesError};

    #[test]
    fn frame_delay_splits_total_duration() {
        let options = GifOptions::new();
        assert_eq!(options.frame_delay(4), 25);
        assert_eq!(options.frame_delay(3), 33);
        assert_eq!(options.frame_delay(1), 100);
    }

    #[test]
    fn frame_delay_never_drops_to_zero() {
        let options = GifOptions::new();
        assert_eq!(options.frame_delay(500), 1);
        assert_eq!(options.frame_delay(0), 0);
    }

    #[test]
    fn zero_interval_fails_validation() {
        let config = RunConfiguration::new("url", "0:00", "0:01").unwrap();
        assert!(config.validate().is_ok());
        assert!(matches!(
            config.with_frame_interval(0).validate(),
            Err(YtFramesError::InvalidInterval)
        ));
    }

    #[test]
    fn frame_extension_is_shared_with_gif() {
        let config = RunConfiguration::new("url", "0:00", "0:01")
            .unwrap()
            .with_frame_extension(".PNG")
            .with_gif_options(GifOptions::new().with_frame_extension("bmp"));
        assert_eq!(config.frame_extension(), "png");
        assert_eq!(config.gif().frame_extension, "png");
    }
}
