//! Shared test doubles: a synthetic clip and a scripted video source.

#![allow(dead_code)]

use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
};

use image::{DynamicImage, Rgb, RgbImage};
use ytframes::{FrameSource, VideoSource, YtFramesError};

/// A clip of `total_frames` solid-colour frames. Frame `n` is filled with
/// `shade(n)` so its index can be recovered from its pixels.
pub struct SyntheticClip {
    pub frames_per_second: f64,
    pub total_frames: u64,
    pub decoded: u64,
    /// Frames handed out as images rather than skipped.
    pub rendered: u64,
    pub width: u32,
    pub height: u32,
}

impl SyntheticClip {
    pub fn new(frames_per_second: f64, total_frames: u64) -> Self {
        Self {
            frames_per_second,
            total_frames,
            decoded: 0,
            rendered: 0,
            width: 8,
            height: 6,
        }
    }
}

pub fn shade(index: u64) -> u8 {
    ((index * 37) % 256) as u8
}

impl FrameSource for SyntheticClip {
    fn frames_per_second(&self) -> f64 {
        self.frames_per_second
    }

    fn next_frame(&mut self) -> Result<Option<DynamicImage>, YtFramesError> {
        if self.decoded >= self.total_frames {
            return Ok(None);
        }
        let value = shade(self.decoded);
        self.decoded += 1;
        self.rendered += 1;
        Ok(Some(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            self.width,
            self.height,
            Rgb([value, value, value]),
        ))))
    }

    fn skip_frame(&mut self) -> Result<bool, YtFramesError> {
        if self.decoded >= self.total_frames {
            return Ok(false);
        }
        self.decoded += 1;
        Ok(true)
    }
}

/// A [`SyntheticClip`] that only implements `next_frame`, so skipping falls
/// back to the trait's default.
pub struct PlainClip(pub SyntheticClip);

impl FrameSource for PlainClip {
    fn frames_per_second(&self) -> f64 {
        self.0.frames_per_second
    }

    fn next_frame(&mut self) -> Result<Option<DynamicImage>, YtFramesError> {
        self.0.next_frame()
    }
}

/// A [`VideoSource`] with scripted answers that records what it was asked.
pub struct ScriptedSource {
    pub title: Result<Option<String>, String>,
    pub download_fails: bool,
    pub downloads: RefCell<Vec<PathBuf>>,
}

impl ScriptedSource {
    pub fn titled(title: &str) -> Self {
        Self {
            title: Ok(Some(title.to_string())),
            download_fails: false,
            downloads: RefCell::new(Vec::new()),
        }
    }

    /// Title lookups fail but downloads succeed.
    pub fn offline_titles() -> Self {
        Self {
            title: Err("metadata endpoint unreachable".to_string()),
            download_fails: false,
            downloads: RefCell::new(Vec::new()),
        }
    }

    pub fn offline() -> Self {
        Self {
            title: Err("network unreachable".to_string()),
            download_fails: true,
            downloads: RefCell::new(Vec::new()),
        }
    }
}

impl VideoSource for ScriptedSource {
    fn fetch_title(&self, url: &str) -> Result<Option<String>, YtFramesError> {
        self.title.clone().map_err(|reason| YtFramesError::FetchFailed {
            url: url.to_string(),
            reason,
        })
    }

    fn download(&self, url: &str, destination: &Path) -> Result<PathBuf, YtFramesError> {
        if self.download_fails {
            return Err(YtFramesError::FetchFailed {
                url: url.to_string(),
                reason: "video unavailable".to_string(),
            });
        }
        let path = destination.join("clip.mp4");
        fs::write(&path, b"not really a video")?;
        self.downloads.borrow_mut().push(path.clone());
        Ok(path)
    }
}
