//! GIF assembly from previously written frame images.
//!
//! Frame files are read back from disk, ordered (numerically by their
//! embedded index unless [`FrameOrder::Lexicographic`] is requested), and
//! encoded one at a time into a looping `frames.gif`. The total playback
//! time is split evenly between frames.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use ytframes::{GifAssembler, GifOptions};
//!
//! let report = GifAssembler::new(GifOptions::new().with_total_duration(300))
//!     .assemble(Path::new("frames"), Path::new("frames"))?;
//! println!("{} frames -> {}", report.frame_count, report.path.display());
//! # Ok::<(), ytframes::YtFramesError>(())
//! ```

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use gif::{Encoder, Frame, Repeat};
use image::imageops::FilterType;

use crate::{
    configuration::{FrameOrder, GIF_FILE_NAME, GifOptions},
    error::YtFramesError,
    progress::{NoOpProgress, OperationType, ProgressCallback, ProgressTracker},
    sampler::frame_index_from_file_name,
};

/// What an assembly pass produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GifReport {
    /// Path of the written GIF.
    pub path: PathBuf,
    /// Frame files in the order they were encoded.
    pub frames: Vec<PathBuf>,
    /// Number of encoded frames.
    pub frame_count: usize,
    /// Delay applied to every frame, in hundredths of a second.
    pub frame_delay: u16,
}

/// Encodes a directory of frame images into an animated GIF.
#[derive(Clone)]
pub struct GifAssembler {
    options: GifOptions,
    progress: Arc<dyn ProgressCallback>,
}

impl std::fmt::Debug for GifAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GifAssembler")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl GifAssembler {
    pub fn new(options: GifOptions) -> Self {
        Self {
            options,
            progress: Arc::new(NoOpProgress),
        }
    }

    /// Report each encoded frame to `callback`.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Frame files in `frames_directory`, in encoding order.
    ///
    /// Every regular file whose name ends in `.<frame_extension>` counts.
    pub fn frame_files(&self, frames_directory: &Path) -> Result<Vec<PathBuf>, YtFramesError> {
        let suffix = format!(".{}", self.options.frame_extension);
        let mut names: Vec<String> = Vec::new();
        for entry in fs::read_dir(frames_directory)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.ends_with(&suffix) {
                names.push(name);
            }
        }

        match self.options.order {
            FrameOrder::Lexicographic => names.sort(),
            FrameOrder::Numeric => {
                let extension = self.options.frame_extension.as_str();
                // Names without an index go last, in string order.
                names.sort_by_cached_key(|name| {
                    let index = frame_index_from_file_name(name, extension);
                    (index.is_none(), index, name.clone())
                });
            }
        }

        Ok(names
            .into_iter()
            .map(|name| frames_directory.join(name))
            .collect())
    }

    /// Encode the frames in `frames_directory` into `output_directory/frames.gif`,
    /// replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`YtFramesError::NoFrames`] when there is nothing to encode,
    /// and image or GIF errors for unreadable frames or failed writes.
    pub fn assemble(
        &self,
        frames_directory: &Path,
        output_directory: &Path,
    ) -> Result<GifReport, YtFramesError> {
        let frames = self.frame_files(frames_directory)?;
        if frames.is_empty() {
            return Err(YtFramesError::NoFrames {
                directory: frames_directory.to_path_buf(),
            });
        }

        let frame_delay = self.options.frame_delay(frames.len());
        let path = output_directory.join(GIF_FILE_NAME);
        log::debug!(
            "Encoding {} frames to GIF file {} (delay={frame_delay}, repeat={:?})",
            frames.len(),
            path.display(),
            self.options.repeat,
        );

        let (width, height) = image::image_dimensions(&frames[0])?;
        let gif_width = to_gif_dimension(width)?;
        let gif_height = to_gif_dimension(height)?;

        let file = BufWriter::new(File::create(&path).map_err(|e| {
            YtFramesError::GifEncodeError(format!("Failed to create GIF file: {e}"))
        })?);
        let mut encoder = Encoder::new(file, gif_width, gif_height, &[]).map_err(|e| {
            YtFramesError::GifEncodeError(format!("Failed to create GIF encoder: {e}"))
        })?;

        let repeat = match self.options.repeat {
            None => Repeat::Infinite,
            Some(n) => Repeat::Finite(n),
        };
        encoder
            .set_repeat(repeat)
            .map_err(|e| YtFramesError::GifEncodeError(format!("Failed to set GIF repeat: {e}")))?;

        let mut tracker = ProgressTracker::new(
            self.progress.as_ref(),
            OperationType::GifExport,
            Some(frames.len() as u64),
        );

        for frame_path in &frames {
            let mut image = image::open(frame_path)?;
            if image.width() != width || image.height() != height {
                log::debug!(
                    "Resizing {} from {}x{} to {width}x{height}",
                    frame_path.display(),
                    image.width(),
                    image.height(),
                );
                image = image.resize_exact(width, height, FilterType::Triangle);
            }
            let mut pixels = image.to_rgba8().into_raw();

            let mut gif_frame = Frame::from_rgba_speed(gif_width, gif_height, &mut pixels, 10);
            gif_frame.delay = frame_delay;

            encoder.write_frame(&gif_frame).map_err(|e| {
                YtFramesError::GifEncodeError(format!("Failed to write GIF frame: {e}"))
            })?;

            let index = frame_path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| frame_index_from_file_name(name, &self.options.frame_extension));
            tracker.advance(index);
        }
        encoder
            .into_inner()
            .map_err(|e| YtFramesError::GifEncodeError(format!("Failed to finish GIF: {e}")))?
            .flush()?;

        log::info!("GIF created successfully: {}", path.display());
        Ok(GifReport {
            path,
            frame_count: frames.len(),
            frames,
            frame_delay,
        })
    }
}

fn to_gif_dimension(value: u32) -> Result<u16, YtFramesError> {
    u16::try_from(value).map_err(|_| {
        YtFramesError::GifEncodeError(format!("Frame dimension {value} exceeds the GIF limit"))
    })
}
