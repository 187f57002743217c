//! Virtual client windows.

use mpx_core::{GrabMode, Position};

/// A rectangular client surface placed on the simulated display.
///
/// `has_focus` is derived: it is `true` while any seat's keyboard focus names
/// this window.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualWindow {
    pub id: String,
    pub title: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub has_focus: bool,
    pub has_pointer_grab: bool,
    pub grab_mode: Option<GrabMode>,
}

impl VirtualWindow {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            x,
            y,
            width,
            height,
            has_focus: false,
            has_pointer_grab: false,
            grab_mode: None,
        }
    }

    /// Half-open containment: `[x, x + width)` × `[y, y + height)`.
    pub fn contains(&self, pos: Position) -> bool {
        let (left, top) = (f64::from(self.x), f64::from(self.y));
        pos.x >= left
            && pos.x < left + f64::from(self.width)
            && pos.y >= top
            && pos.y < top + f64::from(self.height)
    }

    pub(crate) fn set_grab(&mut self, mode: Option<GrabMode>) {
        self.has_pointer_grab = mode.is_some();
        self.grab_mode = mode;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_half_open() {
        let window = VirtualWindow::new("w", "Editor", 100, 50, 200, 100);

        assert!(window.contains(Position::new(100.0, 50.0)));
        assert!(window.contains(Position::new(299.9, 149.9)));
        assert!(!window.contains(Position::new(300.0, 100.0)));
        assert!(!window.contains(Position::new(150.0, 150.0)));
        assert!(!window.contains(Position::new(99.0, 60.0)));
    }

    #[test]
    fn test_set_grab_keeps_flag_and_mode_together() {
        // Arrange
        let mut window = VirtualWindow::new("game", "Game", 0, 0, 640, 480);

        // Act
        window.set_grab(Some(GrabMode::PointerConfine));

        // Assert
        assert!(window.has_pointer_grab);
        assert_eq!(window.grab_mode, Some(GrabMode::PointerConfine));

        window.set_grab(None);
        assert!(!window.has_pointer_grab);
        assert_eq!(window.grab_mode, None);
    }
}
