//! # ytframes
//!
//! Download a YouTube video, write a time-bounded, strided range of its
//! frames as images, and optionally record a metadata sidecar and assemble
//! the frames into a looping GIF.
//!
//! Downloading is delegated to `yt-dlp`, decoding to FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate, and image
//! encoding to the [`image`] and [`gif`](https://crates.io/crates/gif)
//! crates.
//!
//! ## Quick Start
//!
//! ```no_run
//! use ytframes::{Pipeline, RunConfiguration, YtDlp};
//!
//! let config = RunConfiguration::new("https://youtu.be/dQw4w9WgXcQ", "0:10", "0:12.5")?
//!     .with_frame_interval(2)
//!     .with_save_meta(true)
//!     .with_create_gif(true);
//!
//! let report = Pipeline::new(config, YtDlp::new()).run()?;
//! println!(
//!     "{} frames in {}",
//!     report.sample.frame_indices.len(),
//!     report.output_directory.display(),
//! );
//! # Ok::<(), ytframes::YtFramesError>(())
//! ```
//!
//! ## Stages
//!
//! - **Fetcher** ([`VideoSource`], [`YtDlp`]): title lookup and download
//! - **Output folder** ([`resolve_output_folder`]): sanitised title or `frames`
//! - **Frame sampler** ([`FrameSampler`], [`SampleWindow`]): streamed frame writes
//! - **Metadata** ([`RunMetadata`]): the `meta.json` sidecar
//! - **GIF assembly** ([`GifAssembler`]): frames read back into `frames.gif`
//!
//! ## Requirements
//!
//! FFmpeg development libraries at build time, and `yt-dlp` on `PATH` (or
//! configured with [`YtDlp::with_program`]) at run time.

pub mod configuration;
pub mod error;
pub mod fetch;
pub mod ffmpeg;
pub mod gif;
pub mod metadata;
pub mod output_folder;
pub mod pipeline;
pub mod progress;
pub mod sampler;
pub mod source;
pub mod timecode;
mod utilities;

pub use configuration::{
    DEFAULT_FRAME_EXTENSION, DEFAULT_FRAME_INTERVAL, DEFAULT_GIF_DURATION, DEFAULT_OUTPUT_FOLDER,
    FRAME_FILE_PREFIX, FrameOrder, GIF_FILE_NAME, GifOptions, META_FILE_NAME, RunConfiguration,
};
pub use error::YtFramesError;
pub use fetch::{VideoSource, YtDlp};
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use crate::gif::{GifAssembler, GifReport};
pub use metadata::{RunMetadata, VideoMetadata};
pub use output_folder::{resolve_output_folder, sanitize_title};
pub use pipeline::{Pipeline, RunReport};
pub use progress::{OperationType, ProgressCallback, ProgressInfo};
pub use sampler::{
    FrameSampler, SampleReport, SampleWindow, frame_file_name, frame_index_from_file_name,
};
pub use source::{FfmpegFrameSource, FrameSource};
pub use timecode::Timecode;
