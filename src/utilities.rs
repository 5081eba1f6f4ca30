//! Internal utility functions.
//!
//! Helpers for turning decoded FFmpeg frames into [`image`] buffers.

use ffmpeg_next::frame::Video as VideoFrame;
use image::{DynamicImage, RgbImage};

use crate::error::YtFramesError;

/// Copy pixel data from an FFmpeg video frame into a tightly-packed buffer.
///
/// FFmpeg rows are often padded (stride > width * bytes per pixel); the
/// padding is dropped so the buffer can be handed to `image` directly.
pub(crate) fn frame_to_buffer(
    video_frame: &VideoFrame,
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
) -> Vec<u8> {
    let stride = video_frame.stride(0);
    let row_length = (width as usize) * bytes_per_pixel;
    let data = video_frame.data(0);

    if stride == row_length {
        data[..row_length * (height as usize)].to_vec()
    } else {
        data.chunks(stride)
            .take(height as usize)
            .flat_map(|row| &row[..row_length])
            .copied()
            .collect()
    }
}

/// Convert a scaled RGB24 video frame to a [`DynamicImage`].
pub(crate) fn rgb_frame_to_image(
    rgb_frame: &VideoFrame,
    width: u32,
    height: u32,
) -> Result<DynamicImage, YtFramesError> {
    let buffer = frame_to_buffer(rgb_frame, width, height, 3);
    let image = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
        YtFramesError::VideoDecodeError(
            "Failed to construct RGB image from decoded frame data".to_string(),
        )
    })?;
    Ok(DynamicImage::ImageRgb8(image))
}
