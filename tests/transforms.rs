//! End-to-end checks of the transform properties through the public API:
//! sessions, the scheduler, and the codec.

use rasterkit::error::CoreError;
use rasterkit::imaging::codec::ImageCodec;
use rasterkit::imaging::{
    OperationSpec, Raster, Rgba8, RotateDirection, RowBandScheduler, RustCodec, pixel_ops,
};
use rasterkit::session::{ImageSession, SessionState};

/// Deterministic pseudo-random raster (xorshift), so tests see varied pixels.
fn noise(width: u32, height: u32, seed: u32) -> Raster {
    let mut state = seed.max(1);
    Raster::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let [r, g, b, a] = state.to_le_bytes();
        Rgba8::new(r, g, b, a)
    })
    .unwrap()
}

fn rotate(direction: RotateDirection) -> OperationSpec {
    OperationSpec::Rotate { direction }
}

#[test]
fn four_quarter_turns_restore_the_image() {
    let mut session = ImageSession::with_workers(4).unwrap();
    let src = noise(31, 17, 7);
    session.load(src.clone());
    for _ in 0..4 {
        session.apply(&rotate(RotateDirection::Right)).unwrap();
    }
    assert_eq!(session.current().unwrap(), &src);
    // Pixel-identical, but an operation did run
    assert_eq!(session.state(), SessionState::Dirty);
}

#[test]
fn right_then_left_restores_the_image() {
    let mut session = ImageSession::with_workers(3).unwrap();
    let src = noise(8, 21, 3);
    session.load(src.clone());
    session.apply(&rotate(RotateDirection::Right)).unwrap();
    assert_eq!(session.current().unwrap().dimensions(), (21, 8));
    session.apply(&rotate(RotateDirection::Left)).unwrap();
    assert_eq!(session.current().unwrap(), &src);
}

#[test]
fn double_negative_is_identity_including_alpha() {
    let mut session = ImageSession::with_workers(4).unwrap();
    let src = noise(40, 9, 11);
    session.load(src.clone());
    session.apply(&OperationSpec::Negative).unwrap();
    assert_ne!(session.current().unwrap(), &src);
    session.apply(&OperationSpec::Negative).unwrap();
    assert_eq!(session.current().unwrap(), &src);
}

#[test]
fn red_square_negates_to_cyan() {
    let mut session = ImageSession::with_workers(4).unwrap();
    session.load(Raster::from_fn(4, 4, |_, _| Rgba8::rgb(255, 0, 0)).unwrap());
    session.apply(&OperationSpec::Negative).unwrap();
    let out = session.current().unwrap();
    assert_eq!(out.dimensions(), (4, 4));
    assert!(out.as_raw().chunks(4).all(|px| px == [0, 255, 255, 255]));
}

#[test]
fn threshold_output_is_strictly_black_or_white() {
    let scheduler = RowBandScheduler::new(4).unwrap();
    let src = noise(23, 19, 5);
    for level in [0u8, 1, 64, 128, 200, 255] {
        let out = pixel_ops::threshold(&src, level, &scheduler).unwrap();
        for px in out.as_raw().chunks(4) {
            assert!(px == [0, 0, 0, 255] || px == [255, 255, 255, 255]);
        }
    }
    let all_white = pixel_ops::threshold(&src, 0, &scheduler).unwrap();
    assert!(all_white.as_raw().iter().all(|&b| b == 255));
}

#[test]
fn threshold_above_255_is_rejected() {
    assert_eq!(
        OperationSpec::threshold(256),
        Err(CoreError::InvalidThreshold(256))
    );
    assert!("threshold=256".parse::<OperationSpec>().is_err());
}

#[test]
fn brightness_scenario_from_two_by_two() {
    let src = Raster::from_rgba(
        2,
        2,
        [10u8, 200, 10, 200]
            .iter()
            .flat_map(|&v| [v, v, v, 255])
            .collect(),
    )
    .unwrap();
    let scheduler = RowBandScheduler::new(2).unwrap();
    let out = pixel_ops::threshold(&src, 100, &scheduler).unwrap();
    let got: Vec<Rgba8> = (0..2)
        .flat_map(|y| (0..2).map(move |x| (x, y)))
        .map(|(x, y)| out.get(x, y))
        .collect();
    assert_eq!(
        got,
        vec![Rgba8::BLACK, Rgba8::WHITE, Rgba8::BLACK, Rgba8::WHITE]
    );
}

#[test]
fn every_transform_is_independent_of_worker_count() {
    let src = noise(29, 37, 19);
    let ops = [
        OperationSpec::Negative,
        OperationSpec::Threshold { threshold: 77 },
        OperationSpec::EdgeDetect,
        OperationSpec::Resample {
            width: 50,
            height: 13,
        },
        rotate(RotateDirection::Right),
    ];
    for op in &ops {
        let outputs: Vec<Raster> = [1, 2, 4, 7]
            .into_iter()
            .map(|n| {
                let scheduler = RowBandScheduler::new(n).unwrap();
                pixel_ops::apply(&src, op, &scheduler).unwrap()
            })
            .collect();
        for out in &outputs[1..] {
            assert_eq!(out.as_raw(), outputs[0].as_raw(), "{op}");
        }
    }
}

#[test]
fn resample_has_requested_size_for_any_worker_count() {
    let src = noise(10, 10, 2);
    for workers in [1, 3, 16] {
        let scheduler = RowBandScheduler::new(workers).unwrap();
        let out = pixel_ops::resample(&src, 7, 3, &scheduler).unwrap();
        assert_eq!(out.dimensions(), (7, 3));
        assert_eq!(out.as_raw().len(), 7 * 3 * 4);
    }
    let scheduler = RowBandScheduler::new(4).unwrap();
    assert_eq!(pixel_ops::resample(&src, 10, 10, &scheduler).unwrap(), src);
}

#[test]
fn edge_detect_needs_two_by_two() {
    let mut session = ImageSession::with_workers(2).unwrap();
    for (w, h) in [(1, 5), (5, 1)] {
        session.load(noise(w, h, 9));
        assert_eq!(
            session.apply(&OperationSpec::EdgeDetect),
            Err(CoreError::ImageTooSmall {
                width: w,
                height: h
            })
        );
        assert_eq!(session.state(), SessionState::Loaded);
    }
    session.load(noise(2, 2, 9));
    assert!(session.apply(&OperationSpec::EdgeDetect).is_ok());
}

#[test]
fn decoded_png_flows_through_session() {
    let codec = RustCodec::default();
    let src = noise(12, 5, 4);
    let bytes = codec.encode(&src, image::ImageFormat::Png).unwrap();

    let mut session = ImageSession::with_workers(4).unwrap();
    session.load(codec.decode(&bytes).unwrap());
    session.apply(&rotate(RotateDirection::Left)).unwrap();
    assert_eq!(session.current().unwrap().dimensions(), (5, 12));
    assert_eq!(session.original().unwrap(), &src);
}
