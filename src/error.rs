//! Error types for the `ytframes` crate.
//!
//! This module defines [`YtFramesError`], the unified error type returned by
//! every fallible stage of the pipeline. Errors carry enough context (URLs,
//! paths, offending input) to be printed directly to the user.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `ytframes` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum YtFramesError {
    /// A start or end time did not match `mm:ss` or `mm:ss.ss`.
    #[error("Invalid time format {0:?}. Expected mm:ss or mm:ss.ss")]
    InvalidTimeFormat(String),

    /// A frame interval of zero was provided.
    #[error("Frame interval must be greater than zero")]
    InvalidInterval,

    /// The external video fetcher could not be started.
    #[error("Failed to run {program}: {reason}")]
    FetcherUnavailable {
        /// Program that was invoked.
        program: String,
        /// Why it could not be started.
        reason: String,
    },

    /// Fetching metadata or media for a URL failed.
    #[error("Failed to fetch {url}: {reason}")]
    FetchFailed {
        /// The URL that was requested.
        url: String,
        /// Underlying reason reported by the fetcher.
        reason: String,
    },

    /// The fetcher reported success but the media file is not on disk.
    #[error("Downloaded file is missing: {path}")]
    MissingDownload {
        /// Path the fetcher reported.
        path: PathBuf,
    },

    /// The media file could not be opened for decoding.
    #[error("Failed to open media file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to the decoder.
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// The media reports a frame rate that cannot be used for time conversion.
    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(f64),

    /// A video frame could not be decoded.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// GIF assembly found no frame images to encode.
    #[error("No frame images found in {directory}")]
    NoFrames {
        /// Directory that was scanned.
        directory: PathBuf,
    },

    /// GIF encoding failed.
    #[error("GIF encoding error: {0}")]
    GifEncodeError(String),

    /// The metadata sidecar could not be serialized or parsed.
    #[error("Metadata error: {0}")]
    MetadataError(#[from] serde_json::Error),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate while writing or reading frames.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),
}

impl From<FfmpegError> for YtFramesError {
    fn from(error: FfmpegError) -> Self {
        YtFramesError::FfmpegError(error.to_string())
    }
}
