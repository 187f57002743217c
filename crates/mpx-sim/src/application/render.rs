//! Text views of a [`SimulatedCompositor`].

use std::fmt::Write as _;

use mpx_core::Position;

use crate::application::compositor::SimulatedCompositor;
use crate::domain::window::VirtualWindow;

/// Cursor glyphs, assigned to seats in registry order and reused cyclically.
const CURSOR_GLYPHS: [char; 5] = ['@', '*', 'X', 'O', '+'];

/// Smallest grid that still has an interior cell inside the border.
const MIN_GRID: usize = 3;

/// A character grid scaled down from display coordinates.
struct Grid {
    cells: Vec<Vec<char>>,
    width: usize,
    height: usize,
    scale_x: f64,
    scale_y: f64,
}

impl Grid {
    fn new(width: usize, height: usize, display: (u32, u32)) -> Self {
        let (display_w, display_h) = (f64::from(display.0.max(1)), f64::from(display.1.max(1)));
        Self {
            cells: vec![vec![' '; width]; height],
            width,
            height,
            scale_x: width as f64 / display_w,
            scale_y: height as f64 / display_h,
        }
    }

    /// Scales a display x coordinate to a column, keeping it off the border.
    fn column(&self, x: f64) -> usize {
        clamp_inner((x * self.scale_x) as i64, self.width)
    }

    fn row(&self, y: f64) -> usize {
        clamp_inner((y * self.scale_y) as i64, self.height)
    }

    fn draw_border(&mut self) {
        let (last_col, last_row) = (self.width - 1, self.height - 1);
        for x in 0..self.width {
            self.cells[0][x] = '-';
            self.cells[last_row][x] = '-';
        }
        for row in &mut self.cells {
            row[0] = '|';
            row[last_col] = '|';
        }
        for (y, x) in [(0, 0), (0, last_col), (last_row, 0), (last_row, last_col)] {
            self.cells[y][x] = '+';
        }
    }

    fn draw_window(&mut self, window: &VirtualWindow) {
        let left = self.column(f64::from(window.x));
        let top = self.row(f64::from(window.y));
        let right = self.column(f64::from(window.x) + f64::from(window.width));
        let bottom = self.row(f64::from(window.y) + f64::from(window.height));

        let edge = if window.has_pointer_grab { '#' } else { '.' };
        // Edges that collapse onto the border row/column are skipped.
        for x in left..right {
            self.cells[top][x] = edge;
            if bottom > 1 {
                self.cells[bottom - 1][x] = edge;
            }
        }
        for y in top..bottom {
            self.cells[y][left] = edge;
            if right > 1 {
                self.cells[y][right - 1] = edge;
            }
        }

        let title_row = top + 1;
        if title_row < self.height - 1 {
            let room = right.saturating_sub(left + 2);
            for (i, c) in window.title.chars().take(room).enumerate() {
                self.cells[title_row][left + 1 + i] = c;
            }
        }
    }

    fn plot(&mut self, pos: Position, glyph: char) {
        let (x, y) = (self.column(pos.x), self.row(pos.y));
        self.cells[y][x] = glyph;
    }

    fn into_lines(self) -> Vec<String> {
        self.cells.into_iter().map(String::from_iter).collect()
    }
}

fn clamp_inner(value: i64, extent: usize) -> usize {
    let max = (extent - 2) as i64;
    value.clamp(1, max) as usize
}

/// Renders the display as a `width × height` character grid followed by a
/// legend line.
///
/// Windows are drawn in stacking order with `.` edges (`#` while they hold a
/// pointer grab) and their title on the first inner row.  Each seat's cursor
/// is drawn last with its own glyph.  Dimensions below 3 are raised to 3.
pub fn render_ascii(compositor: &SimulatedCompositor, width: usize, height: usize) -> String {
    let (width, height) = (width.max(MIN_GRID), height.max(MIN_GRID));
    let mut grid = Grid::new(width, height, compositor.display_size());

    grid.draw_border();
    for window in compositor.windows() {
        grid.draw_window(window);
    }

    let mut legend = String::from("Cursors: ");
    for (seat, glyph) in compositor.registry().seats().zip(CURSOR_GLYPHS.iter().cycle()) {
        grid.plot(seat.cursor.position(), *glyph);
        let grabbed = if seat.is_pointer_grabbed() { "[GRABBED]" } else { "" };
        let _ = write!(legend, "{glyph}={}{grabbed} ", seat.name);
    }

    let mut lines = grid.into_lines();
    lines.push(legend);
    lines.join("\n")
}

/// Multi-line description of seats, devices and windows.
pub fn state_summary(compositor: &SimulatedCompositor) -> String {
    let registry = compositor.registry();
    let mut lines = vec!["=== Simulation State ===".to_string(), String::new(), "Seats:".to_string()];

    for seat in registry.seats() {
        let position = seat.cursor.position();
        let grabbed = if seat.is_pointer_grabbed() { " [POINTER GRABBED]" } else { "" };
        lines.push(format!(
            "  {}: cursor at ({:.0}, {:.0}){grabbed}",
            seat.name, position.x, position.y
        ));
    }

    lines.push(String::new());
    lines.push("Devices:".to_string());
    for device in compositor.devices() {
        let seat_name = registry
            .seat_for_device(&device.id)
            .map_or("(unassigned)", |seat| seat.name.as_str());
        let status = if device.is_connected { "connected" } else { "disconnected" };
        lines.push(format!("  {}: {status}, assigned to {seat_name}", device.name));
    }

    lines.push(String::new());
    lines.push("Windows:".to_string());
    for window in compositor.windows() {
        let grab = match window.grab_mode {
            Some(mode) if window.has_pointer_grab => format!(" [GRAB: {mode}]"),
            _ => String::new(),
        };
        lines.push(format!(
            "  {}: ({}, {}) {}x{}{grab}",
            window.title, window.x, window.y, window.width, window.height
        ));
    }

    lines.join("\n")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::compositor::Motion;
    use crate::domain::virtual_device::VirtualDevice;
    use mpx_core::{GrabMode, DEFAULT_SEAT_NAME};

    #[test]
    fn test_empty_display_has_border_and_default_cursor() {
        // Arrange
        let comp = SimulatedCompositor::new(800, 600);

        // Act
        let text = render_ascii(&comp, 20, 6);

        // Assert
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], format!("+{}+", "-".repeat(18)));
        assert_eq!(lines[5], lines[0]);
        // Origin is clamped off the border into the first inner cell.
        assert_eq!(lines[1].chars().nth(1), Some('@'));
        assert_eq!(lines[6], "Cursors: @=seat0 ");
    }

    #[test]
    fn test_each_seat_gets_its_own_glyph() {
        // Arrange
        let mut comp = SimulatedCompositor::new(1000, 1000);
        comp.registry_mut().create_seat("aux");
        comp.connect_device(VirtualDevice::mouse("m2", "Mouse 2"), "aux").unwrap();
        comp.move_pointer("m2", Motion::Absolute { x: 500.0, y: 500.0 });

        // Act
        let text = render_ascii(&comp, 10, 10);

        // Assert
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[5].chars().nth(5), Some('*'));
        assert!(lines[10].contains("@=seat0"));
        assert!(lines[10].contains("*=aux"));
    }

    #[test]
    fn test_grabbed_window_uses_hash_edges_and_legend_marks_seat() {
        // Arrange
        let mut comp = SimulatedCompositor::new(800, 800);
        comp.create_window(VirtualWindow::new("game", "Game", 0, 0, 800, 800));
        let seat0 = comp.registry().default_seat_id();
        comp.request_grab("game", seat0, GrabMode::PointerLock).unwrap();

        // Act
        let text = render_ascii(&comp, 12, 8);

        // Assert
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[1].contains('#'));
        assert!(lines[2].contains("Game"));
        assert!(lines[8].contains("@=seat0[GRABBED]"));
    }

    #[test]
    fn test_tiny_grid_is_raised_to_minimum() {
        let comp = SimulatedCompositor::default();
        let text = render_ascii(&comp, 0, 1);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[..3], ["+-+", "|@|", "+-+"]);
    }

    #[test]
    fn test_state_summary_lists_everything() {
        // Arrange
        let mut comp = SimulatedCompositor::default();
        comp.connect_device(VirtualDevice::mouse("m", "Mouse"), DEFAULT_SEAT_NAME)
            .unwrap();
        comp.connect_device(VirtualDevice::keyboard("k", "Keys"), "missing")
            .unwrap();
        comp.move_pointer("m", Motion::Absolute { x: 40.0, y: 30.0 });
        comp.create_window(VirtualWindow::new("w", "Editor", 10, 20, 300, 200));
        comp.request_grab("w", comp.registry().default_seat_id(), GrabMode::PointerConfine)
            .unwrap();

        // Act
        let summary = state_summary(&comp);

        // Assert
        assert!(summary.starts_with("=== Simulation State ==="));
        assert!(summary.contains("  seat0: cursor at (40, 30) [POINTER GRABBED]"));
        assert!(summary.contains("  Mouse: connected, assigned to seat0"));
        assert!(summary.contains("  Keys: connected, assigned to (unassigned)"));
        assert!(summary.contains("  Editor: (10, 20) 300x200 [GRAB: POINTER_CONFINE]"));
    }
}
