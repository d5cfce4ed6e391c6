//! Page decoration expressed as plain drawing commands.
//!
//! [`certificate_border`] computes the borders and corner flourishes for a page of a given size.
//! The result is a list of [`DrawCommand`]s in page coordinates (millimetres, origin at the top
//! left corner, y growing downwards), which the page decorator in [`crate::builder`] strokes onto
//! every page.

use genpdf::style::Color;

use crate::model::inches;

/// Stroke color of the outer border.
pub const BORDER_COLOR: Color = Color::Rgb(0, 0, 255);
/// Stroke color of the inner border and the corner flourishes.
pub const ACCENT_COLOR: Color = Color::Rgb(255, 215, 0);

const OUTER_INSET_IN: f64 = 0.5;
const INNER_INSET_IN: f64 = 0.6;
const FLOURISH_NEAR_IN: f64 = 0.5;
const FLOURISH_FAR_IN: f64 = 0.8;

const OUTER_STROKE_PT: f64 = 3.0;
const INNER_STROKE_PT: f64 = 1.0;
const FLOURISH_STROKE_PT: f64 = 2.0;

/// A point on the page, in millimetres from the top left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Stroke attributes shared by all commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    /// Line width in PDF points.
    pub width_pt: f64,
    pub color: Color,
}

/// A single drawing instruction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    /// Rectangle outline with its top left corner at `origin`.
    Rect {
        origin: Point,
        width: f64,
        height: f64,
        stroke: Stroke,
    },
    /// Straight line segment.
    Line { from: Point, to: Point, stroke: Stroke },
}

impl DrawCommand {
    /// Returns the stroke used by this command.
    pub fn stroke(&self) -> Stroke {
        match self {
            DrawCommand::Rect { stroke, .. } | DrawCommand::Line { stroke, .. } => *stroke,
        }
    }
}

fn inset_rect(page_width: f64, page_height: f64, inset: f64, stroke: Stroke) -> DrawCommand {
    DrawCommand::Rect {
        origin: Point::new(inset, inset),
        width: page_width - 2.0 * inset,
        height: page_height - 2.0 * inset,
        stroke,
    }
}

fn line(from: (f64, f64), to: (f64, f64), stroke: Stroke) -> DrawCommand {
    DrawCommand::Line {
        from: Point::new(from.0, from.1),
        to: Point::new(to.0, to.1),
        stroke,
    }
}

/// Borders and corner flourishes for a page of `page_width` x `page_height` millimetres.
///
/// The outer border sits 0.5 in inside the page edges, the inner border 0.6 in.  Each corner gets
/// an L-shaped flourish made of two perpendicular segments between 0.5 in and 0.8 in from the
/// corner.
pub fn certificate_border(page_width: f64, page_height: f64) -> Vec<DrawCommand> {
    let outer = Stroke {
        width_pt: OUTER_STROKE_PT,
        color: BORDER_COLOR,
    };
    let inner = Stroke {
        width_pt: INNER_STROKE_PT,
        color: ACCENT_COLOR,
    };
    let accent = Stroke {
        width_pt: FLOURISH_STROKE_PT,
        color: ACCENT_COLOR,
    };

    let mut commands = vec![
        inset_rect(page_width, page_height, inches(OUTER_INSET_IN), outer),
        inset_rect(page_width, page_height, inches(INNER_INSET_IN), inner),
    ];

    let near = inches(FLOURISH_NEAR_IN);
    let far = inches(FLOURISH_FAR_IN);
    let (w, h) = (page_width, page_height);

    // top left, top right, bottom left, bottom right
    commands.extend([
        line((near, far), (far, far), accent),
        line((far, near), (far, far), accent),
        line((w - far, far), (w - near, far), accent),
        line((w - far, near), (w - far, far), accent),
        line((near, h - far), (far, h - far), accent),
        line((far, h - near), (far, h - far), accent),
        line((w - far, h - far), (w - near, h - far), accent),
        line((w - far, h - near), (w - far, h - far), accent),
    ]);

    commands
}

/// Splits a stroke of `width_pt` into the offsets (in millimetres) of parallel hairlines.
///
/// The renderer strokes every line with the default 1 pt width, so a wider stroke is built from
/// `ceil(width)` hairlines spread evenly across the requested width.
pub fn hairline_offsets(width_pt: f64) -> Vec<f64> {
    let count = width_pt.ceil().max(1.0) as usize;
    if count == 1 {
        return vec![0.0];
    }
    let span = crate::model::points(width_pt - 1.0);
    let step = span / (count - 1) as f64;
    (0..count).map(|i| -span / 2.0 + step * i as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const A4: (f64, f64) = (210.0, 297.0);

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn two_borders_and_eight_segments() {
        let commands = certificate_border(A4.0, A4.1);
        let rects = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect { .. }))
            .count();
        let lines = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        assert_eq!(rects, 2);
        assert_eq!(lines, 8);
    }

    #[test]
    fn borders_are_inset_from_every_edge() {
        let commands = certificate_border(A4.0, A4.1);

        match commands[0] {
            DrawCommand::Rect {
                origin,
                width,
                height,
                stroke,
            } => {
                assert!(close(origin.x, 12.7) && close(origin.y, 12.7));
                assert!(close(width, 210.0 - 25.4));
                assert!(close(height, 297.0 - 25.4));
                assert_eq!(stroke.width_pt, 3.0);
                assert_eq!(stroke.color, BORDER_COLOR);
            }
            other => panic!("expected outer rect, got {:?}", other),
        }

        match commands[1] {
            DrawCommand::Rect { origin, stroke, .. } => {
                assert!(close(origin.x, 15.24) && close(origin.y, 15.24));
                assert_eq!(stroke.width_pt, 1.0);
                assert_eq!(stroke.color, ACCENT_COLOR);
            }
            other => panic!("expected inner rect, got {:?}", other),
        }
    }

    #[test]
    fn flourishes_stay_near_their_corner() {
        let (w, h) = A4;
        let near = 12.7;
        let far = 20.32;
        let distance = |value: f64, extent: f64| value.min(extent - value);

        for command in certificate_border(w, h).into_iter().skip(2) {
            let DrawCommand::Line { from, to, stroke } = command else {
                panic!("expected a line segment");
            };
            assert_eq!(stroke.width_pt, 2.0);
            assert_eq!(stroke.color, ACCENT_COLOR);
            assert!(from.x == to.x || from.y == to.y, "segments are axis aligned");
            for point in [from, to] {
                let dx = distance(point.x, w);
                let dy = distance(point.y, h);
                assert!(dx > near - 1e-9 && dx < far + 1e-9);
                assert!(dy > near - 1e-9 && dy < far + 1e-9);
            }
        }
    }

    #[test]
    fn each_corner_gets_perpendicular_pair() {
        let commands = certificate_border(A4.0, A4.1);
        for pair in commands[2..].chunks(2) {
            let (DrawCommand::Line { from: a0, to: a1, .. }, DrawCommand::Line { from: b0, to: b1, .. }) =
                (pair[0], pair[1])
            else {
                panic!("expected line pairs");
            };
            assert!(close(a0.y, a1.y), "first segment is horizontal");
            assert!(close(b0.x, b1.x), "second segment is vertical");
            assert!(a0 == b1 || a1 == b1, "segments meet at the inner corner point");
        }
    }

    #[test]
    fn hairlines_cover_the_stroke_width() {
        assert_eq!(hairline_offsets(1.0), vec![0.0]);
        assert_eq!(hairline_offsets(0.5), vec![0.0]);

        let three = hairline_offsets(3.0);
        assert_eq!(three.len(), 3);
        assert!(close(three[0], -crate::model::points(1.0)));
        assert!(close(three[1], 0.0));
        assert!(close(three[2], crate::model::points(1.0)));

        let two = hairline_offsets(2.0);
        assert_eq!(two.len(), 2);
        assert!(close(two[0] + two[1], 0.0));
    }
}
