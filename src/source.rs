//! Sequential sources of decoded frames.
//!
//! [`FrameSource`] yields frames strictly in decode order, one at a time,
//! together with the frame rate needed to map timecodes to frame indices.
//! [`FfmpegFrameSource`] decodes a media file with FFmpeg; anything else that
//! can produce images in order (a synthetic clip in tests, say) can
//! implement the trait too.
//!
//! # Example
//!
//! ```no_run
//! use ytframes::{FfmpegFrameSource, FrameSource};
//!
//! let mut source = FfmpegFrameSource::open("clip.mp4")?;
//! println!("{} fps", source.frames_per_second());
//! while let Some(frame) = source.next_frame()? {
//!     println!("{}x{}", frame.width(), frame.height());
//! }
//! # Ok::<(), ytframes::YtFramesError>(())
//! ```

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::Path,
    time::Duration,
};

use ffmpeg_next::{
    Error as FfmpegError, Packet,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::DynamicImage;

use crate::{error::YtFramesError, metadata::VideoMetadata};

/// A stream of decoded frames in presentation order.
pub trait FrameSource {
    /// Frames per second reported by the media.
    fn frames_per_second(&self) -> f64;

    /// Decode the next frame. `Ok(None)` means the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<DynamicImage>, YtFramesError>;

    /// Advance past the next frame without producing an image. Returns
    /// `false` once the source is exhausted.
    ///
    /// Sources that can decode without converting pixels should override
    /// this.
    fn skip_frame(&mut self) -> Result<bool, YtFramesError> {
        Ok(self.next_frame()?.is_some())
    }
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn frames_per_second(&self) -> f64 {
        (**self).frames_per_second()
    }

    fn next_frame(&mut self) -> Result<Option<DynamicImage>, YtFramesError> {
        (**self).next_frame()
    }

    fn skip_frame(&mut self) -> Result<bool, YtFramesError> {
        (**self).skip_frame()
    }
}

/// Decodes the best video stream of a media file from the beginning.
///
/// Only one decoded frame is held at a time. Frames are converted to RGB at
/// the source resolution.
pub struct FfmpegFrameSource {
    input_context: Input,
    decoder: VideoDecoder,
    scaler: ScalingContext,
    video_stream_index: usize,
    metadata: VideoMetadata,
    decoded_frame: VideoFrame,
    rgb_frame: VideoFrame,
    eof_sent: bool,
    done: bool,
}

impl Debug for FfmpegFrameSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("FfmpegFrameSource")
            .field("metadata", &self.metadata)
            .field("video_stream_index", &self.video_stream_index)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl FfmpegFrameSource {
    /// Open a media file for sequential decoding.
    ///
    /// # Errors
    ///
    /// Returns [`YtFramesError::FileOpen`] if the file cannot be opened,
    /// [`YtFramesError::NoVideoStream`] if it has no video, and
    /// [`YtFramesError::InvalidFrameRate`] if the stream reports no usable
    /// frame rate.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, YtFramesError> {
        let path = path.as_ref();
        log::debug!("Opening media file: {}", path.display());

        ffmpeg_next::init().map_err(|error| YtFramesError::FileOpen {
            path: path.to_path_buf(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| YtFramesError::FileOpen {
                path: path.to_path_buf(),
                reason: error.to_string(),
            })?;

        let stream = input_context
            .streams()
            .best(Type::Video)
            .ok_or(YtFramesError::NoVideoStream)?;
        let video_stream_index = stream.index();

        let frame_rate = stream.avg_frame_rate();
        let frames_per_second = if frame_rate.denominator() != 0 {
            f64::from(frame_rate.numerator()) / f64::from(frame_rate.denominator())
        } else {
            let rate = stream.rate();
            if rate.denominator() != 0 {
                f64::from(rate.numerator()) / f64::from(rate.denominator())
            } else {
                0.0
            }
        };
        if !frames_per_second.is_finite() || frames_per_second <= 0.0 {
            return Err(YtFramesError::InvalidFrameRate(frames_per_second));
        }

        let decoder_context = CodecContext::from_parameters(stream.parameters())?;
        let decoder = decoder_context.decoder().video()?;

        let duration_microseconds = input_context.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        let metadata = VideoMetadata {
            width: decoder.width(),
            height: decoder.height(),
            frames_per_second,
            frame_count: (duration.as_secs_f64() * frames_per_second) as u64,
            codec: decoder
                .codec()
                .map(|codec| codec.name().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        };
        log::debug!(
            "Video stream {video_stream_index}: {}x{} @ {:.3} fps, ~{} frames [{}]",
            metadata.width,
            metadata.height,
            metadata.frames_per_second,
            metadata.frame_count,
            metadata.codec,
        );

        let scaler = ScalingContext::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            Pixel::RGB24,
            metadata.width,
            metadata.height,
            ScalingFlags::BILINEAR,
        )?;

        Ok(Self {
            input_context,
            decoder,
            scaler,
            video_stream_index,
            metadata,
            decoded_frame: VideoFrame::empty(),
            rgb_frame: VideoFrame::empty(),
            eof_sent: false,
            done: false,
        })
    }

    /// Stream information probed at open time.
    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    /// Decode the next frame into `decoded_frame` without converting it.
    /// Returns `false` once the stream is drained.
    fn decode_next(&mut self) -> Result<bool, YtFramesError> {
        if self.done {
            return Ok(false);
        }

        loop {
            if self.decoder.receive_frame(&mut self.decoded_frame).is_ok() {
                return Ok(true);
            }

            if self.eof_sent {
                self.done = true;
                return Ok(false);
            }

            let mut packet = Packet::empty();
            match packet.read(&mut self.input_context) {
                Ok(()) => {
                    if packet.stream() == self.video_stream_index {
                        if let Err(error) = self.decoder.send_packet(&packet) {
                            self.done = true;
                            return Err(error.into());
                        }
                    }
                }
                Err(FfmpegError::Eof) => {
                    if let Err(error) = self.decoder.send_eof() {
                        self.done = true;
                        return Err(error.into());
                    }
                    self.eof_sent = true;
                }
                Err(error) => {
                    log::debug!("Skipping unreadable packet: {error}");
                }
            }
        }
    }

    fn convert_current_frame(&mut self) -> Result<DynamicImage, YtFramesError> {
        self.scaler.run(&self.decoded_frame, &mut self.rgb_frame)?;
        crate::utilities::rgb_frame_to_image(
            &self.rgb_frame,
            self.metadata.width,
            self.metadata.height,
        )
    }
}

impl FrameSource for FfmpegFrameSource {
    fn frames_per_second(&self) -> f64 {
        self.metadata.frames_per_second
    }

    fn next_frame(&mut self) -> Result<Option<DynamicImage>, YtFramesError> {
        if !self.decode_next()? {
            return Ok(None);
        }
        match self.convert_current_frame() {
            Ok(image) => Ok(Some(image)),
            Err(error) => {
                self.done = true;
                Err(error)
            }
        }
    }

    fn skip_frame(&mut self) -> Result<bool, YtFramesError> {
        self.decode_next()
    }
}
