//! FFmpeg decoding tests.
//!
//! Tests that need a real video skip when `tests/fixtures/sample_video.mp4`
//! is absent. Generate one with:
//!
//! ```sh
//! ffmpeg -f lavfi -i testsrc=duration=5:size=320x240:rate=30 tests/fixtures/sample_video.mp4
//! ```

use std::path::Path;

use ytframes::{FfmpegFrameSource, FrameSampler, FrameSource, Timecode};

fn sample_video_path() -> &'static str {
    "tests/fixtures/sample_video.mp4"
}

#[test]
fn open_nonexistent_file() {
    let result = FfmpegFrameSource::open("this_file_does_not_exist.mp4");
    let error_message = result.unwrap_err().to_string();
    assert!(
        error_message.contains("Failed to open media file"),
        "Error message should mention file open failure: {error_message}",
    );
}

#[test]
fn open_invalid_file() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let invalid_file_path = temporary_directory.path().join("invalid.mp4");
    std::fs::write(&invalid_file_path, b"this is not a media file")
        .expect("Failed to write invalid file");

    let result = FfmpegFrameSource::open(&invalid_file_path);
    assert!(result.is_err(), "Expected error for invalid media file");
}

#[test]
fn decodes_every_frame_in_order() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut source = FfmpegFrameSource::open(path).expect("Failed to open test video");
    let metadata = source.metadata().clone();
    assert!(source.frames_per_second() > 0.0);

    let mut count = 0_u64;
    while let Some(frame) = source.next_frame().expect("Failed to decode") {
        assert_eq!((frame.width(), frame.height()), (metadata.width, metadata.height));
        count += 1;
    }
    assert!(count > 0);
    assert!(source.next_frame().unwrap().is_none());
}

#[test]
fn samples_a_window_from_a_real_video() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let output = tempfile::tempdir().expect("Failed to create temp dir");
    let mut source = FfmpegFrameSource::open(path).expect("Failed to open test video");
    let fps = source.frames_per_second();

    let report = FrameSampler::new(output.path())
        .sample_between(
            &mut source,
            Timecode::parse("0:01").unwrap(),
            Timecode::parse("0:02").unwrap(),
            2,
        )
        .expect("Failed to sample");

    let start = (1.0 * fps).floor() as u64;
    let end = (2.0 * fps).floor() as u64;
    let expected: Vec<u64> = (start..=end).filter(|index| index % 2 == 0).collect();
    assert_eq!(report.frame_indices, expected);
    for path in &report.frame_paths {
        assert!(path.is_file(), "{} was not written", path.display());
    }
}
