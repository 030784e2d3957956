use egui::Pos2;

/// Placement of a tape strip: a rectangle of fixed height whose left edge
/// midpoint sits on the anchor, rotated about the anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapeGeometry {
    pub anchor: Pos2,
    pub width: f32,
    /// Degrees, clockwise in screen space (y grows downward)
    pub rotation: f32,
    pub height: f32,
}

impl TapeGeometry {
    pub fn new(anchor: Pos2, width: f32, rotation: f32, height: f32) -> Self {
        Self {
            anchor,
            width,
            rotation,
            height,
        }
    }

    /// Width is the drag distance and rotation the drag angle.
    pub fn from_drag(anchor: Pos2, current: Pos2, height: f32) -> Self {
        let delta = current - anchor;
        Self {
            anchor,
            width: delta.length(),
            rotation: delta.y.atan2(delta.x).to_degrees(),
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_from_drag_horizontal() {
        let tape = TapeGeometry::from_drag(pos2(50.0, 50.0), pos2(150.0, 50.0), 40.0);
        assert!((tape.width - 100.0).abs() < 1e-4);
        assert!(tape.rotation.abs() < 1e-4);
        assert_eq!(tape.anchor, pos2(50.0, 50.0));
    }

    #[test]
    fn test_from_drag_downward_is_clockwise() {
        let tape = TapeGeometry::from_drag(pos2(0.0, 0.0), pos2(0.0, 10.0), 4.0);
        assert!((tape.rotation - 90.0).abs() < 1e-4);
        assert!((tape.width - 10.0).abs() < 1e-4);

        let back = TapeGeometry::from_drag(pos2(0.0, 0.0), pos2(-10.0, 0.0), 4.0);
        assert!((back.rotation.abs() - 180.0).abs() < 1e-4);
    }
}
