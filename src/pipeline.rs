//! The end-to-end run: fetch, sample, then the optional steps.
//!
//! Stages run once each, in order, on one thread:
//!
//! 1. resolve the output folder (title lookup may fail and fall back),
//! 2. download the video into it,
//! 3. decode the download and write the sampled frames,
//! 4. optionally delete the download,
//! 5. optionally write `meta.json`,
//! 6. optionally assemble `frames.gif`.
//!
//! The configuration is validated before the first stage runs. Apart from
//! the title lookup, the first failing stage ends the run with
//! its error. Nothing is retried.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    configuration::RunConfiguration,
    error::YtFramesError,
    fetch::VideoSource,
    gif::{GifAssembler, GifReport},
    metadata::RunMetadata,
    output_folder::resolve_output_folder,
    progress::{NoOpProgress, ProgressCallback},
    sampler::{FrameSampler, SampleReport},
    source::{FfmpegFrameSource, FrameSource},
};

/// Everything a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Folder all artefacts were written to.
    pub output_directory: PathBuf,
    /// The downloaded media file.
    pub clip_path: PathBuf,
    /// Whether the downloaded file was deleted afterwards.
    pub clip_removed: bool,
    /// Frames written by the sampler.
    pub sample: SampleReport,
    /// Path of `meta.json`, when it was written.
    pub metadata_path: Option<PathBuf>,
    /// GIF details, when one was assembled.
    pub gif: Option<GifReport>,
}

/// One configured run against a [`VideoSource`].
pub struct Pipeline<S> {
    config: RunConfiguration,
    source: S,
    working_directory: Option<PathBuf>,
    progress: Arc<dyn ProgressCallback>,
}

impl<S> Debug for Pipeline<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("working_directory", &self.working_directory)
            .finish_non_exhaustive()
    }
}

impl<S: VideoSource> Pipeline<S> {
    pub fn new(config: RunConfiguration, source: S) -> Self {
        Self {
            config,
            source,
            working_directory: None,
            progress: Arc::new(NoOpProgress),
        }
    }

    /// Resolve relative output folders against `directory` instead of the
    /// process's current directory.
    #[must_use]
    pub fn with_working_directory<P: AsRef<Path>>(mut self, directory: P) -> Self {
        self.working_directory = Some(directory.as_ref().to_path_buf());
        self
    }

    /// Report sampling and GIF progress to `callback`.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    pub fn config(&self) -> &RunConfiguration {
        &self.config
    }

    /// Run every stage, decoding the download with FFmpeg.
    pub fn run(&self) -> Result<RunReport, YtFramesError> {
        self.run_with_decoder(|path| FfmpegFrameSource::open(path))
    }

    /// Run every stage, decoding the download with `open_frames`.
    pub fn run_with_decoder<D, F>(&self, open_frames: F) -> Result<RunReport, YtFramesError>
    where
        D: FrameSource,
        F: FnOnce(&Path) -> Result<D, YtFramesError>,
    {
        let config = &self.config;
        config.validate()?;

        let folder = resolve_output_folder(config.output(), config.url(), &self.source);
        let output_directory = match &self.working_directory {
            Some(base) => base.join(folder),
            None => folder,
        };
        fs::create_dir_all(&output_directory)?;
        log::debug!("Writing into {}", output_directory.display());

        let clip_path = self.source.download(config.url(), &output_directory)?;

        let mut frames = open_frames(&clip_path)?;
        let sample = FrameSampler::new(&output_directory)
            .with_extension(config.frame_extension())
            .with_progress(Arc::clone(&self.progress))
            .sample_between(
                &mut frames,
                config.start(),
                config.end(),
                config.frame_interval(),
            )?;
        drop(frames);
        log::info!(
            "Wrote {} frame(s) to {}",
            sample.frame_indices.len(),
            output_directory.display()
        );

        let clip_removed = if config.remove_clip() {
            fs::remove_file(&clip_path)?;
            log::info!("Removed {}", clip_path.display());
            true
        } else {
            false
        };

        let metadata_path = if config.save_meta() {
            let metadata = RunMetadata {
                url: config.url().to_string(),
                start_time: config.start_text().to_string(),
                end_time: config.end_text().to_string(),
                frame_interval: config.frame_interval(),
            };
            Some(metadata.save(&output_directory)?)
        } else {
            None
        };

        let gif = if config.create_gif() {
            Some(
                GifAssembler::new(config.gif().clone())
                    .with_progress(Arc::clone(&self.progress))
                    .assemble(&output_directory, &output_directory)?,
            )
        } else {
            None
        };

        Ok(RunReport {
            output_directory,
            clip_path,
            clip_removed,
            sample,
            metadata_path,
            gif,
        })
    }
}
