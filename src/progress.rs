//! Progress reporting for long-running stages.
//!
//! Attach a [`ProgressCallback`] to a [`FrameSampler`](crate::FrameSampler)
//! or [`Pipeline`](crate::Pipeline) to be told about every frame written and
//! every GIF frame encoded.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ytframes::{Pipeline, ProgressCallback, ProgressInfo, RunConfiguration, YtDlp};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("[{:?}] {} done", info.operation, info.current);
//!     }
//! }
//!
//! let config = RunConfiguration::new("https://youtu.be/dQw4w9WgXcQ", "0:00", "0:05")?;
//! Pipeline::new(config, YtDlp::new())
//!     .with_progress(Arc::new(PrintProgress))
//!     .run()?;
//! # Ok::<(), ytframes::YtFramesError>(())
//! ```

use std::time::{Duration, Instant};

/// The kind of work currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OperationType {
    /// Writing sampled frames to disk.
    FrameExtraction,
    /// Encoding frames into the GIF.
    GifExport,
}

/// A snapshot of progress.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// What kind of work is being performed.
    pub operation: OperationType,
    /// How many items have been processed so far.
    pub current: u64,
    /// Total items expected, if known ahead of time.
    pub total: Option<u64>,
    /// Frame index of the item just processed, when there is one.
    pub current_frame: Option<u64>,
    /// Wall-clock time since the operation started.
    pub elapsed: Duration,
}

/// Receives progress updates.
///
/// Callbacks observe but cannot stop the operation.
pub trait ProgressCallback: Send + Sync {
    /// Called after each processed item.
    fn on_progress(&self, info: &ProgressInfo);
}

/// Discards all progress notifications. The default.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Counts items for one operation and forwards snapshots to a callback.
pub(crate) struct ProgressTracker<'a> {
    callback: &'a dyn ProgressCallback,
    operation: OperationType,
    total: Option<u64>,
    current: u64,
    started: Instant,
}

impl<'a> ProgressTracker<'a> {
    pub(crate) fn new(
        callback: &'a dyn ProgressCallback,
        operation: OperationType,
        total: Option<u64>,
    ) -> Self {
        Self {
            callback,
            operation,
            total,
            current: 0,
            started: Instant::now(),
        }
    }

    /// Record one processed item.
    pub(crate) fn advance(&mut self, frame: Option<u64>) {
        self.current += 1;
        self.callback.on_progress(&ProgressInfo {
            operation: self.operation,
            current: self.current,
            total: self.total,
            current_frame: frame,
            elapsed: self.started.elapsed(),
        });
    }
}
