//! # Session Tests
//!
//! End-to-end checks of the public API: commands built with the protocol
//! builders, sent through a session, observed on an in-memory or preview
//! transport.

use std::time::{Duration, Instant};

use image::{GrayImage, Luma};
use microview::demos;
use microview::preview::PreviewTransport;
use microview::protocol::{ClearMode, Color, DrawMode, commands};
use microview::transport::MemoryTransport;
use microview::{MicroViewError, Session, SessionConfig};
use pretty_assertions::assert_eq;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn quick_session() -> Session<MemoryTransport> {
    Session::with_config(
        MemoryTransport::new(),
        SessionConfig::default().with_delay(Duration::ZERO),
    )
}

fn wire_log(session: &Session<MemoryTransport>) -> Vec<String> {
    session
        .transport()
        .unwrap()
        .writes()
        .iter()
        .map(|w| String::from_utf8_lossy(w).into_owned())
        .collect()
}

// ============================================================================
// SESSION BEHAVIOR
// ============================================================================

#[test]
fn test_new_session_bounds_and_single_rect() {
    let mut mv = quick_session();

    let bounds = mv.bounds();
    assert_eq!((bounds.min, bounds.max), ((0, 0), (64, 48)));

    mv.run([commands::rect(5, 10, 15, 20)]).unwrap();

    assert_eq!(
        String::from_utf8(mv.transport().unwrap().contents()).unwrap(),
        "9,5,10,15,20"
    );
}

#[test]
fn test_run_concatenates_without_separators() {
    let mut mv = quick_session();
    mv.run([
        commands::clear(ClearMode::All),
        commands::fill(),
        commands::invert(true),
        commands::display(),
    ])
    .unwrap();

    assert_eq!(
        String::from_utf8(mv.transport().unwrap().contents()).unwrap(),
        "0,110,0,0,64,481,13"
    );
    assert_eq!(
        wire_log(&mv),
        vec!["0,1", "10,0,0,64,48", "1,1", "3"]
    );
}

#[test]
fn test_run_waits_at_least_n_delays() {
    let delay = Duration::from_millis(15);
    let mut mv = Session::with_config(
        MemoryTransport::new(),
        SessionConfig::default().with_delay(delay),
    );

    let start = Instant::now();
    mv.run([commands::pixel(0, 0), commands::pixel(1, 1)]).unwrap();
    assert!(start.elapsed() >= delay * 2);
}

#[test]
fn test_draw_string_pacing_and_positions() {
    let delay = Duration::from_millis(10);
    let mut mv = Session::with_config(
        MemoryTransport::new(),
        SessionConfig::default().with_delay(delay),
    );

    let start = Instant::now();
    mv.draw_string(0, 0, "AB").unwrap();
    assert!(start.elapsed() >= delay * 2);

    assert_eq!(wire_log(&mv), vec!["13,0,0,65", "13,6,0,66"]);
}

#[test]
fn test_bounds_unaffected_by_drawing() {
    let mut mv = quick_session();
    mv.run(demos::rectangles()).unwrap();
    mv.draw_string(0, 40, "bounds").unwrap();

    let bounds = mv.bounds();
    assert_eq!(bounds.width(), 64);
    assert_eq!(bounds.height(), 48);
    assert_eq!(mv.at(0, 0), Luma([0]));
}

#[test]
fn test_draw_image_only_sends_lit_pixels() {
    let mut img = GrayImage::new(100, 2);
    img.put_pixel(1, 0, Luma([255]));
    img.put_pixel(70, 1, Luma([255])); // off the panel

    let mut mv = quick_session();
    mv.draw_image(&img).unwrap();

    assert_eq!(wire_log(&mv), vec!["5,1,0,1,0"]);
}

#[test]
fn test_closed_session_rejects_work() {
    let mut mv = quick_session();
    mv.close().unwrap();

    let err = mv.run([commands::display()]).unwrap_err();
    assert!(matches!(err, MicroViewError::InvalidState(_)));
    assert!(mv.transport().is_err());
}

#[test]
fn test_into_transport_leaves_transport_open() {
    let mv = quick_session();
    let transport = mv.into_transport().unwrap();
    assert!(!transport.is_closed());
}

// ============================================================================
// PREVIEW
// ============================================================================

#[test]
fn test_demo_renders_in_preview() {
    let mut mv = Session::with_config(
        PreviewTransport::new(),
        SessionConfig::default().with_delay(Duration::ZERO),
    );
    demos::run("circles", &mut mv).unwrap();

    let preview = mv.transport().unwrap();
    assert_eq!(preview.command_count(), demos::circles().len());
    assert!(preview.frame().is_lit(5, 5)); // filled circle centre
    assert!(!preview.frame().is_lit(40, 20)); // concentric outlines leave the centre dark
}

#[test]
fn test_preview_honours_explicit_style() {
    let mut mv = Session::with_config(
        PreviewTransport::new(),
        SessionConfig::default().with_delay(Duration::ZERO),
    );
    mv.run([
        commands::fill(),
        commands::line_h_with_color_and_mode(0, 10, 64, Color::Black, DrawMode::Normal),
    ])
    .unwrap();

    let frame = mv.transport().unwrap().frame();
    assert_eq!(frame.lit_count(), 64 * 48 - 64);
    assert!(!frame.is_lit(32, 10));
}

#[test]
fn test_preview_png_written() {
    let mut mv = Session::with_config(
        PreviewTransport::new(),
        SessionConfig::default().with_delay(Duration::ZERO),
    );
    demos::run("text", &mut mv).unwrap();

    let path = std::env::temp_dir().join(format!("microview-preview-{}.png", std::process::id()));
    mv.transport().unwrap().save_png(&path, 4).unwrap();

    let img = image::open(&path).unwrap().to_luma8();
    assert_eq!(img.dimensions(), (256, 192));
    std::fs::remove_file(&path).unwrap();
}
