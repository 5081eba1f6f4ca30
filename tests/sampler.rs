//! Frame sampling over a synthetic clip.

mod common;

use std::{
    collections::BTreeSet,
    fs,
    path::Path,
    sync::{Arc, Mutex},
};

use common::{PlainClip, SyntheticClip, shade};
use ytframes::{
    FrameSampler, OperationType, ProgressCallback, ProgressInfo, SampleWindow, Timecode,
    YtFramesError, frame_index_from_file_name,
};

fn written_indices(directory: &Path, extension: &str) -> BTreeSet<u64> {
    fs::read_dir(directory)
        .unwrap()
        .filter_map(|entry| {
            let name = entry.unwrap().file_name().into_string().unwrap();
            frame_index_from_file_name(&name, extension)
        })
        .collect()
}

#[test]
fn whole_clip_when_end_is_beyond_duration() {
    let directory = tempfile::tempdir().unwrap();
    let mut clip = SyntheticClip::new(10.0, 25);

    let report = FrameSampler::new(directory.path())
        .with_extension("png")
        .sample_between(
            &mut clip,
            Timecode::parse("0:00").unwrap(),
            Timecode::parse("1:00").unwrap(),
            1,
        )
        .unwrap();

    let expected: Vec<u64> = (0..25).collect();
    assert_eq!(report.frame_indices, expected);
    assert_eq!(report.frames_decoded, 25);
    assert_eq!(
        written_indices(directory.path(), "png"),
        expected.into_iter().collect()
    );
    assert!(directory.path().join("frame_0.png").is_file());
    assert!(directory.path().join("frame_24.png").is_file());
}

#[test]
fn interval_selects_multiples_inside_window() {
    let directory = tempfile::tempdir().unwrap();
    let mut clip = SyntheticClip::new(10.0, 100);

    // 0:01.3 -> frame 13, 0:04 -> frame 40.
    let report = FrameSampler::new(directory.path())
        .with_extension("png")
        .sample_between(
            &mut clip,
            Timecode::parse("0:01.3").unwrap(),
            Timecode::parse("0:04").unwrap(),
            7,
        )
        .unwrap();

    assert_eq!(report.frame_indices, vec![14, 21, 28, 35]);
    assert_eq!(
        written_indices(directory.path(), "png"),
        [14, 21, 28, 35].into_iter().collect()
    );
}

#[test]
fn decoding_stops_after_end_frame() {
    let directory = tempfile::tempdir().unwrap();
    let mut clip = SyntheticClip::new(30.0, 1_000);
    let window = SampleWindow::new(2, 5, 1).unwrap();

    let report = FrameSampler::new(directory.path())
        .with_extension("png")
        .sample(&mut clip, &window)
        .unwrap();

    assert_eq!(report.frame_indices, vec![2, 3, 4, 5]);
    assert_eq!(report.frames_decoded, 6);
    assert_eq!(clip.decoded, 6);
}

#[test]
fn inverted_window_writes_nothing() {
    let directory = tempfile::tempdir().unwrap();
    let mut clip = SyntheticClip::new(10.0, 100);

    let report = FrameSampler::new(directory.path())
        .sample_between(
            &mut clip,
            Timecode::parse("0:05").unwrap(),
            Timecode::parse("0:02").unwrap(),
            1,
        )
        .unwrap();

    assert!(report.frame_indices.is_empty());
    assert_eq!(fs::read_dir(directory.path()).unwrap().count(), 0);
    // Frames 0..=20 are decoded before the counter passes the end.
    assert_eq!(report.frames_decoded, 21);
}

#[test]
fn frames_are_named_by_absolute_index_and_hold_that_frame() {
    let directory = tempfile::tempdir().unwrap();
    let mut clip = SyntheticClip::new(10.0, 50);
    let window = SampleWindow::new(30, 40, 10).unwrap();

    FrameSampler::new(directory.path())
        .with_extension("png")
        .sample(&mut clip, &window)
        .unwrap();

    for index in [30_u64, 40] {
        let image = image::open(directory.path().join(format!("frame_{index}.png")))
            .unwrap()
            .to_rgb8();
        assert_eq!(image.get_pixel(0, 0).0, [shade(index); 3]);
    }
}

#[test]
fn default_extension_is_jpg() {
    let directory = tempfile::tempdir().unwrap();
    let mut clip = SyntheticClip::new(10.0, 3);

    let report = FrameSampler::new(directory.path())
        .sample(&mut clip, &SampleWindow::new(0, 10, 1).unwrap())
        .unwrap();

    assert_eq!(report.frame_paths[0], directory.path().join("frame_0.jpg"));
    assert!(image::open(&report.frame_paths[2]).is_ok());
}

#[test]
fn zero_interval_is_an_error() {
    let directory = tempfile::tempdir().unwrap();
    let mut clip = SyntheticClip::new(10.0, 10);

    let result = FrameSampler::new(directory.path()).sample_between(
        &mut clip,
        Timecode::parse("0:00").unwrap(),
        Timecode::parse("0:01").unwrap(),
        0,
    );
    assert!(matches!(result, Err(YtFramesError::InvalidInterval)));
    assert_eq!(clip.decoded, 0);
}

#[test]
fn unusable_frame_rate_is_an_error() {
    let directory = tempfile::tempdir().unwrap();
    let mut clip = SyntheticClip::new(0.0, 10);

    let result = FrameSampler::new(directory.path()).sample_between(
        &mut clip,
        Timecode::parse("0:00").unwrap(),
        Timecode::parse("0:01").unwrap(),
        1,
    );
    assert!(matches!(result, Err(YtFramesError::InvalidFrameRate(_))));
}

#[derive(Default)]
struct RecordingProgress {
    events: Mutex<Vec<(OperationType, u64, Option<u64>, Option<u64>)>>,
}

impl ProgressCallback for RecordingProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.events.lock().unwrap().push((
            info.operation,
            info.current,
            info.total,
            info.current_frame,
        ));
    }
}

#[test]
fn progress_is_reported_per_written_frame() {
    let directory = tempfile::tempdir().unwrap();
    let mut clip = SyntheticClip::new(10.0, 100);
    let progress = Arc::new(RecordingProgress::default());

    FrameSampler::new(directory.path())
        .with_extension("png")
        .with_progress(progress.clone())
        .sample(&mut clip, &SampleWindow::new(0, 9, 3).unwrap())
        .unwrap();

    let events = progress.events.lock().unwrap();
    assert_eq!(
        *events,
        vec![
            (OperationType::FrameExtraction, 1, Some(4), Some(0)),
            (OperationType::FrameExtraction, 2, Some(4), Some(3)),
            (OperationType::FrameExtraction, 3, Some(4), Some(6)),
            (OperationType::FrameExtraction, 4, Some(4), Some(9)),
        ]
    );
}

#[test]
fn unselected_frames_are_skipped_without_images() {
    let directory = tempfile::tempdir().unwrap();
    let mut clip = SyntheticClip::new(10.0, 100);

    let report = FrameSampler::new(directory.path())
        .with_extension("png")
        .sample(&mut clip, &SampleWindow::new(40, 60, 10).unwrap())
        .unwrap();

    assert_eq!(report.frame_indices, vec![40, 50, 60]);
    assert_eq!(report.frames_decoded, 61);
    assert_eq!(clip.decoded, 61);
    assert_eq!(clip.rendered, 3);
    for index in [40, 50, 60] {
        let image = image::open(directory.path().join(format!("frame_{index}.png"))).unwrap();
        assert_eq!(image.to_rgb8().get_pixel(0, 0).0, [shade(index); 3]);
    }
}

#[test]
fn default_skip_still_advances_the_source() {
    let directory = tempfile::tempdir().unwrap();
    let mut clip = PlainClip(SyntheticClip::new(10.0, 30));

    let report = FrameSampler::new(directory.path())
        .with_extension("png")
        .sample(&mut clip, &SampleWindow::new(5, 100, 7).unwrap())
        .unwrap();

    assert_eq!(report.frame_indices, vec![7, 14, 21, 28]);
    assert_eq!(report.frames_decoded, 30);
    assert_eq!(clip.0.rendered, 30);
}
