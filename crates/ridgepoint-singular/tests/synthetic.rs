use ridgepoint_core::{wrap_orientation, GrayImage, Grid};
use ridgepoint_singular::{
    deduplicate, BlockField, DetectionResult, SingularKind, SingularParams, SingularPointDetector,
};

const ROWS: usize = 24;
const COLS: usize = 24;
const CENTER: (f32, f32) = (11.5, 11.5);

/// Orientation field rotating by `sign · π` around `CENTER`: `+1` gives a
/// core, `-1` a delta.
fn singular_field(sign: f32, block_size: usize) -> BlockField {
    let orientation = Grid::from_fn(ROWS, COLS, |i, j| {
        let phi = (i as f32 - CENTER.0).atan2(j as f32 - CENTER.1);
        wrap_orientation(sign * 0.5 * phi)
    });
    BlockField {
        block_size,
        orientation,
        coherence: Grid::filled(ROWS, COLS, 1.0),
    }
}

fn detector() -> SingularPointDetector {
    SingularPointDetector::new(SingularParams::default()).expect("default params")
}

fn center_pixel(block_size: usize) -> (f32, f32) {
    let half = (block_size / 2) as f32;
    (
        CENTER.1 * block_size as f32 + half,
        CENTER.0 * block_size as f32 + half,
    )
}

fn assert_near_center(res: &DetectionResult, kind: SingularKind, block_size: usize) {
    let points = match kind {
        SingularKind::Core => &res.cores,
        SingularKind::Delta => &res.deltas,
    };
    assert_eq!(points.len(), 1, "expected one {kind:?}, got {points:?}");
    let (cx, cy) = center_pixel(block_size);
    let (x, y) = points[0].pixel();
    let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
    assert!(
        d <= block_size as f32,
        "{kind:?} at ({x}, {y}) is {d:.1}px from ({cx}, {cy})"
    );
}

#[test]
fn synthetic_core_field_yields_single_core() {
    let (res, dbg) = detector().detect_in_field(singular_field(1.0, 16), COLS * 16, ROWS * 16);
    assert!(res.deltas.is_empty(), "unexpected deltas: {:?}", res.deltas);
    assert_near_center(&res, SingularKind::Core, 16);

    let core = &res.cores[0];
    assert!(core.index > 0.45 && core.index < 0.55);
    assert_eq!(dbg.poincare.index.shape(), (ROWS, COLS));
}

#[test]
fn synthetic_delta_field_yields_single_delta() {
    let (res, _) = detector().detect_in_field(singular_field(-1.0, 16), COLS * 16, ROWS * 16);
    assert!(res.cores.is_empty(), "unexpected cores: {:?}", res.cores);
    assert_near_center(&res, SingularKind::Delta, 16);
    assert!(res.deltas[0].index < -0.45 && res.deltas[0].index > -0.55);
}

#[test]
fn low_coherence_everywhere_suppresses_detection() {
    let mut field = singular_field(1.0, 16);
    field.coherence = Grid::filled(ROWS, COLS, 0.3);
    let (res, dbg) = detector().detect_in_field(field, COLS * 16, ROWS * 16);
    assert!(res.is_empty());
    assert_eq!(dbg.poincare.populated(), 0);
}

#[test]
fn smoothed_orientation_stays_in_range() {
    let (_, dbg) = detector().detect_in_field(singular_field(-1.0, 16), COLS * 16, ROWS * 16);
    let half_pi = std::f32::consts::FRAC_PI_2;
    for &o in &dbg.smoothed_orientation.data {
        assert!(o > -half_pi - 1e-6 && o <= half_pi + 1e-6, "{o}");
    }
}

/// Concentric rings with a mild horizontal drift: plenty of structure, no
/// guarantee on what gets detected.
fn ring_image() -> GrayImage {
    GrayImage::from_fn(256, 224, |x, y| {
        let dx = x as f32 - 120.0;
        let dy = y as f32 - 100.0;
        let r = (dx * dx + dy * dy).sqrt();
        (128.0 + 100.0 * (0.4 * r + 0.01 * x as f32).sin()).round() as u8
    })
}

/// Loop pattern: ridges follow the parabolas `r - dx = const` opening
/// towards +x, with the focus at `LOOP_FOCUS`.
const LOOP_FOCUS: (f64, f64) = (256.0, 256.0);

fn loop_image() -> GrayImage {
    GrayImage::from_fn(512, 512, |x, y| {
        let dx = x as f64 - LOOP_FOCUS.0;
        let dy = y as f64 - LOOP_FOCUS.1;
        let r = (dx * dx + dy * dy).sqrt();
        let v = (2.0 * std::f64::consts::PI * (r - dx) / 12.0).sin();
        (128.0 + 100.0 * v).round() as u8
    })
}

#[test]
fn loop_image_yields_one_core_near_focus() {
    let img = loop_image();
    let res = detector().detect(&img.view()).unwrap();
    assert!(res.deltas.is_empty(), "unexpected deltas: {:?}", res.deltas);
    assert_eq!(res.cores.len(), 1, "cores: {:?}", res.cores);

    let (x, y) = res.cores[0].pixel();
    let d = ((x as f64 - LOOP_FOCUS.0).powi(2) + (y as f64 - LOOP_FOCUS.1).powi(2)).sqrt();
    assert!(d <= 32.0, "core at ({x}, {y}) is {d:.1}px from the focus");
}

#[test]
fn detection_is_deterministic() {
    let img = ring_image();
    let det = detector();
    let first = det.detect(&img.view()).unwrap();
    let second = det.detect(&img.view()).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn image_level_outputs_respect_grid_geometry() {
    let img = ring_image();
    let (res, dbg) = detector().detect_with_debug(&img.view()).unwrap();
    assert_eq!(dbg.field.orientation.shape(), (224 / 16, 256 / 16));
    assert_eq!(dbg.field.coherence.shape(), (224 / 16, 256 / 16));
    for &c in &dbg.field.coherence.data {
        assert!((0.0..=1.0).contains(&c));
    }
    for p in res.cores.iter().chain(&res.deltas) {
        assert_eq!(p.position.x as usize % 16, 8);
        assert_eq!(p.position.y as usize % 16, 8);
        assert!((p.position.x as usize) < 256 && (p.position.y as usize) < 224);
    }
    for pair in res.cores.windows(2).chain(res.deltas.windows(2)) {
        assert!(pair[0].distance_to(&pair[1]) >= 50.0);
    }
}

#[test]
fn dedup_output_is_a_fixed_point() {
    let (res, _) = detector().detect_in_field(singular_field(1.0, 16), COLS * 16, ROWS * 16);
    let again = deduplicate(res.cores.clone(), 50.0);
    assert_eq!(again, res.cores);
}

#[test]
fn tiny_image_gives_empty_result() {
    let img = GrayImage::filled(15, 15, 200);
    let res = detector().detect(&img.view()).unwrap();
    assert!(res.is_empty());
    assert_eq!((res.width, res.height), (15, 15));
}
