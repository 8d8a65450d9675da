//! # Demo Programs
//!
//! Small drawings that exercise the protocol end to end. Each one runs
//! against any transport, so they double as preview fixtures.

use crate::error::MicroViewError;
use crate::protocol::{Command, commands};
use crate::session::Session;
use crate::transport::Transport;

/// Text shown by the `text` demo.
pub const DEFAULT_TEXT: &str = "Hello From Rust!";

/// Vertical distance between lines drawn by [`draw_words`].
pub const DEFAULT_LINE_HEIGHT: u8 = 10;

// ============================================================================
// DEMO TEMPLATES
// ============================================================================

/// A filled circle in the corner and concentric outlines.
pub fn circles() -> Vec<Command> {
    vec![
        commands::circle_fill(5, 5, 5),
        commands::circle(1, 1, 20),
        commands::circle(40, 20, 20),
        commands::circle(40, 20, 15),
        commands::circle(40, 20, 10),
        commands::circle(40, 20, 5),
    ]
}

/// Two filled blocks and nested outlines sharing a corner.
pub fn rectangles() -> Vec<Command> {
    vec![
        commands::rect_fill(5, 5, 5, 15),
        commands::rect_fill(25, 0, 30, 15),
        commands::rect(1, 1, 20, 40),
        commands::rect(40, 20, 20, 20),
        commands::rect(40, 20, 15, 15),
        commands::rect(40, 20, 10, 10),
        commands::rect(40, 20, 5, 5),
    ]
}

/// Draw `text` one word per line from the top-left corner.
pub fn draw_words<T: Transport>(
    session: &mut Session<T>,
    text: &str,
    line_height: u8,
) -> Result<(), MicroViewError> {
    for (i, word) in text.split_whitespace().enumerate() {
        let y = (i as u8).wrapping_mul(line_height);
        session.draw_string(0, y, word)?;
    }
    Ok(())
}

// ============================================================================
// LOOKUP FUNCTIONS
// ============================================================================

/// List available demos
pub fn list_demos() -> &'static [&'static str] {
    &["circles", "rectangles", "text"]
}

/// Check if a name is a demo
pub fn is_demo(name: &str) -> bool {
    list_demos().contains(&name.to_lowercase().as_str())
}

/// Run a demo by name.
pub fn run<T: Transport>(name: &str, session: &mut Session<T>) -> Result<(), MicroViewError> {
    match name.to_lowercase().as_str() {
        "circles" => session.run(circles()),
        "rectangles" => session.run(rectangles()),
        "text" => draw_words(session, DEFAULT_TEXT, DEFAULT_LINE_HEIGHT),
        other => Err(MicroViewError::InvalidCommand(format!(
            "Unknown demo '{}'. Available: {}",
            other,
            list_demos().join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::SessionConfig;
    use crate::transport::MemoryTransport;
    use std::time::Duration;

    fn session() -> Session<MemoryTransport> {
        Session::with_config(
            MemoryTransport::new(),
            SessionConfig::default().with_delay(Duration::ZERO),
        )
    }

    #[test]
    fn test_rectangles_wire_text() {
        let first = &rectangles()[0];
        assert_eq!(first.as_bytes(), b"10,5,5,5,15");
        assert_eq!(rectangles().len(), 7);
    }

    #[test]
    fn test_circles_wire_text() {
        assert_eq!(circles()[0].as_bytes(), b"12,5,5,5");
        assert_eq!(circles().len(), 6);
    }

    #[test]
    fn test_draw_words_one_line_each() {
        let mut mv = session();
        draw_words(&mut mv, "Hi  Go", 10).unwrap();
        let writes = mv.transport().unwrap().writes().to_vec();
        assert_eq!(
            writes,
            vec![
                b"13,0,0,72".to_vec(),
                b"13,6,0,105".to_vec(),
                b"13,0,10,71".to_vec(),
                b"13,6,10,111".to_vec(),
            ]
        );
    }

    #[test]
    fn test_run_by_name() {
        let mut mv = session();
        run("Rectangles", &mut mv).unwrap();
        assert_eq!(mv.transport().unwrap().writes().len(), 7);
    }

    #[test]
    fn test_unknown_demo() {
        let mut mv = session();
        assert!(matches!(run("ripple", &mut mv), Err(MicroViewError::InvalidCommand(_))));
        assert!(!is_demo("ripple"));
        assert!(is_demo("TEXT"));
    }
}
