use egui::Pos2;

/// One drawing command of a smoothed stroke path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    Line { to: Pos2 },
    Quad { ctrl: Pos2, to: Pos2 },
}

/// A path starting at `start` followed by line and quadratic segments.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothPath {
    pub start: Pos2,
    pub segments: Vec<PathSegment>,
}

fn midpoint(a: Pos2, b: Pos2) -> Pos2 {
    Pos2::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}

/// Build the midpoint-quadratic smoothing of a short point window.
///
/// With two points the path is a straight segment. With three or more the
/// interior points become control points whose curves end at the midpoint of
/// the next pair, and the final curve ends exactly at the last point.
pub fn smooth_path(points: &[Pos2]) -> Option<SmoothPath> {
    let (&start, rest) = points.split_first()?;
    let n = points.len();
    let mut segments = Vec::with_capacity(n.saturating_sub(1));

    match n {
        1 => {}
        2 => segments.push(PathSegment::Line { to: rest[0] }),
        _ => {
            for i in 1..n - 2 {
                segments.push(PathSegment::Quad {
                    ctrl: points[i],
                    to: midpoint(points[i], points[i + 1]),
                });
            }
            segments.push(PathSegment::Quad {
                ctrl: points[n - 2],
                to: points[n - 1],
            });
        }
    }

    Some(SmoothPath { start, segments })
}

impl SmoothPath {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
