use std::f32::consts::PI;

use crate::math::Point3;

/// Pointer position normalised to `[-0.5, 0.5]` on both axes, y pointing up.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub x: f32,
    pub y: f32,
}

impl Cursor {
    /// From window pixels with the origin in the top left corner.
    pub fn from_pixels(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x: x / width - 0.5,
            y: -(y / height - 0.5),
        }
    }

    /// Camera position circling the origin: one full turn across the window
    /// width, `height` units of elevation per window height.
    pub fn orbit_position(&self, radius: f32, height: f32) -> Point3 {
        let angle = self.x * PI * 2.0;
        Point3::new(angle.sin() * radius, self.y * height, angle.cos() * radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixels_are_centered_and_flipped() {
        let cursor = Cursor::from_pixels(0.0, 0.0, 800.0, 600.0);
        assert_eq!(cursor, Cursor { x: -0.5, y: 0.5 });
        let cursor = Cursor::from_pixels(400.0, 450.0, 800.0, 600.0);
        assert_eq!(cursor, Cursor { x: 0.0, y: -0.25 });
    }

    #[test]
    fn centered_cursor_looks_from_the_front() {
        let position = Cursor::default().orbit_position(3.0, 5.0);
        assert_eq!(position, Point3::new(0.0, 0.0, 3.0));

        let position = Cursor { x: 0.25, y: 0.5 }.orbit_position(3.0, 5.0);
        assert!((position.x - 3.0).abs() < 1e-5);
        assert!((position.y - 2.5).abs() < 1e-5);
        assert!(position.z.abs() < 1e-5);
    }
}
