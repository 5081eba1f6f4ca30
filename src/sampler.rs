//! Frame sampling: writing a strided, time-bounded subset of frames to disk.
//!
//! The sampler decodes from the first frame onwards, counting frames from
//! zero. A frame is written when its counter lies in the inclusive window
//! `[start_frame, end_frame]` and is a multiple of the interval. Decoding
//! stops once the counter passes `end_frame` or the source runs dry, so
//! asking for more than the video holds just yields fewer frames.
//!
//! Each frame is written as soon as it is decoded; at most one frame is in
//! memory at a time.
//!
//! # Example
//!
//! ```no_run
//! use ytframes::{FfmpegFrameSource, FrameSampler, Timecode};
//!
//! let mut source = FfmpegFrameSource::open("clip.mp4")?;
//! let report = FrameSampler::new("frames").sample_between(
//!     &mut source,
//!     Timecode::parse("0:01")?,
//!     Timecode::parse("0:02.5")?,
//!     5,
//! )?;
//! println!("wrote {} frames", report.frame_indices.len());
//! # Ok::<(), ytframes::YtFramesError>(())
//! ```

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    configuration::{DEFAULT_FRAME_EXTENSION, FRAME_FILE_PREFIX},
    error::YtFramesError,
    progress::{NoOpProgress, OperationType, ProgressCallback, ProgressTracker},
    source::FrameSource,
    timecode::Timecode,
};

/// Which frame counters get written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleWindow {
    /// First selectable frame index (inclusive).
    pub start_frame: u64,
    /// Last selectable frame index (inclusive).
    pub end_frame: u64,
    /// Only multiples of this are selected.
    pub interval: u64,
}

impl SampleWindow {
    /// # Errors
    ///
    /// Returns [`YtFramesError::InvalidInterval`] if `interval` is zero.
    pub fn new(start_frame: u64, end_frame: u64, interval: u64) -> Result<Self, YtFramesError> {
        if interval == 0 {
            return Err(YtFramesError::InvalidInterval);
        }
        Ok(Self {
            start_frame,
            end_frame,
            interval,
        })
    }

    /// Build a window from timecodes at the given frame rate.
    pub fn from_timecodes(
        start: Timecode,
        end: Timecode,
        frames_per_second: f64,
        interval: u64,
    ) -> Result<Self, YtFramesError> {
        Self::new(
            start.to_frame_number(frames_per_second),
            end.to_frame_number(frames_per_second),
            interval,
        )
    }

    /// Whether the frame with this counter should be written.
    pub fn selects(&self, counter: u64) -> bool {
        self.start_frame <= counter && counter <= self.end_frame && counter % self.interval == 0
    }

    /// Whether decoding can stop once the counter has reached this value.
    pub fn is_past_end(&self, counter: u64) -> bool {
        counter > self.end_frame
    }

    /// How many frames the window selects if the video is long enough.
    pub fn expected_count(&self) -> u64 {
        if self.start_frame > self.end_frame {
            return 0;
        }
        let first = self.start_frame.div_ceil(self.interval);
        let last = self.end_frame / self.interval;
        if last < first { 0 } else { last - first + 1 }
    }
}

/// What a sampling pass produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleReport {
    /// Indices of the written frames, ascending.
    pub frame_indices: Vec<u64>,
    /// Paths of the written frames, matching `frame_indices`.
    pub frame_paths: Vec<PathBuf>,
    /// How many frames were decoded in total.
    pub frames_decoded: u64,
}

/// Writes selected frames of a [`FrameSource`] into a directory.
#[derive(Clone)]
pub struct FrameSampler {
    output_directory: PathBuf,
    extension: String,
    progress: Arc<dyn ProgressCallback>,
}

impl std::fmt::Debug for FrameSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameSampler")
            .field("output_directory", &self.output_directory)
            .field("extension", &self.extension)
            .finish_non_exhaustive()
    }
}

impl FrameSampler {
    /// Write frames into `output_directory` as `frame_<index>.jpg`.
    ///
    /// The directory must already exist.
    pub fn new<P: AsRef<Path>>(output_directory: P) -> Self {
        Self {
            output_directory: output_directory.as_ref().to_path_buf(),
            extension: DEFAULT_FRAME_EXTENSION.to_string(),
            progress: Arc::new(NoOpProgress),
        }
    }

    /// Write frames with this image extension instead; the format follows
    /// from it.
    #[must_use]
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_ascii_lowercase();
        self
    }

    /// Report each written frame to `callback`.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Convert `start` and `end` to frame indices with the source's frame
    /// rate, then [`sample`](FrameSampler::sample).
    pub fn sample_between<S: FrameSource + ?Sized>(
        &self,
        source: &mut S,
        start: Timecode,
        end: Timecode,
        interval: u64,
    ) -> Result<SampleReport, YtFramesError> {
        let frames_per_second = source.frames_per_second();
        if !frames_per_second.is_finite() || frames_per_second <= 0.0 {
            return Err(YtFramesError::InvalidFrameRate(frames_per_second));
        }
        let window = SampleWindow::from_timecodes(start, end, frames_per_second, interval)?;
        log::debug!(
            "{start} - {end} at {frames_per_second:.3} fps is frames {} - {} every {}",
            window.start_frame,
            window.end_frame,
            window.interval,
        );
        self.sample(source, &window)
    }

    /// Decode `source` from the start and write every frame `window` selects.
    ///
    /// Frames outside the selection are passed over with
    /// [`FrameSource::skip_frame`], so no image is produced for them.
    pub fn sample<S: FrameSource + ?Sized>(
        &self,
        source: &mut S,
        window: &SampleWindow,
    ) -> Result<SampleReport, YtFramesError> {
        let mut tracker = ProgressTracker::new(
            self.progress.as_ref(),
            OperationType::FrameExtraction,
            Some(window.expected_count()),
        );
        let mut report = SampleReport::default();
        let mut counter = 0_u64;

        loop {
            if window.selects(counter) {
                let Some(image) = source.next_frame()? else {
                    break;
                };
                let path = self
                    .output_directory
                    .join(frame_file_name(counter, &self.extension));
                image.save(&path)?;
                log::info!("Processing {} {counter}", path.display());

                report.frame_indices.push(counter);
                report.frame_paths.push(path);
                tracker.advance(Some(counter));
            } else if !source.skip_frame()? {
                break;
            }

            counter += 1;
            if window.is_past_end(counter) {
                break;
            }
        }

        report.frames_decoded = counter;
        if (report.frame_indices.len() as u64) < window.expected_count() {
            log::debug!(
                "Source ended after {counter} frames, wrote {} of {} requested",
                report.frame_indices.len(),
                window.expected_count(),
            );
        }
        Ok(report)
    }
}

/// File name of the frame with the given index, e.g. `frame_42.jpg`.
pub fn frame_file_name(index: u64, extension: &str) -> String {
    format!("{FRAME_FILE_PREFIX}{index}.{extension}")
}

/// Recover the frame index from a name produced by [`frame_file_name`].
pub fn frame_index_from_file_name(name: &str, extension: &str) -> Option<u64> {
    let stem = name
        .strip_prefix(FRAME_FILE_PREFIX)?
        .strip_suffix(extension)?
        .strip_suffix('.')?;
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}
