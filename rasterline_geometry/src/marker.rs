// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point marker shapes.

use core::f64::consts::PI;
use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Arc, BezPath, Ellipse, Point, Rect, Shape, Vec2};

/// Tolerance used when converting elliptical markers to Béziers.
const MARKER_TOLERANCE: f64 = 0.1;

/// Thickness of bars (cross, x, dash) relative to the marker box.
const BAR: f64 = 0.25;

/// The shape drawn for each vertex of a point draw.
///
/// Shapes are laid out in a `width` × `height` box centred on the vertex, in
/// device pixels. Names are matched case-sensitively with underscores;
/// hyphenated spellings are accepted as aliases and any other name resolves
/// to [`MarkerShape::Circle`].
///
/// ```
/// use rasterline_geometry::MarkerShape;
///
/// assert_eq!(MarkerShape::from_name("triangle_up"), MarkerShape::TriangleUp);
/// assert_eq!(MarkerShape::from_name("four-rays"), MarkerShape::FourRays);
/// assert_eq!(MarkerShape::from_name("hexagon"), MarkerShape::Circle);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MarkerShape {
    /// A filled rectangle covering the box.
    Square,
    /// A rhombus touching the middle of each side of the box.
    Diamond,
    /// An ellipse inscribed in the box.
    #[default]
    Circle,
    /// A smaller ellipse with a cross reaching the edges of the box.
    CrossedCircle,
    /// Half an ellipse bulging to the left.
    SemiEllipseLeft,
    /// Half an ellipse bulging to the right.
    SemiEllipseRight,
    /// Half an ellipse bulging upwards.
    SemiEllipseUp,
    /// Half an ellipse bulging downwards.
    SemiEllipseDown,
    /// A triangle pointing left.
    TriangleLeft,
    /// A triangle pointing right.
    TriangleRight,
    /// A triangle pointing up.
    TriangleUp,
    /// A triangle pointing down.
    TriangleDown,
    /// A four-pointed star.
    FourRays,
    /// A plus sign.
    Cross,
    /// A diagonal cross.
    X,
    /// A horizontal bar.
    Dash,
    /// An ellipse half the size of the box.
    Dot,
}

impl MarkerShape {
    /// Every shape, in name-table order.
    pub const ALL: [Self; 17] = [
        Self::Square,
        Self::Diamond,
        Self::Circle,
        Self::CrossedCircle,
        Self::SemiEllipseLeft,
        Self::SemiEllipseRight,
        Self::SemiEllipseUp,
        Self::SemiEllipseDown,
        Self::TriangleLeft,
        Self::TriangleRight,
        Self::TriangleUp,
        Self::TriangleDown,
        Self::FourRays,
        Self::Cross,
        Self::X,
        Self::Dash,
        Self::Dot,
    ];

    /// The canonical name of the shape.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Diamond => "diamond",
            Self::Circle => "circle",
            Self::CrossedCircle => "crossed_circle",
            Self::SemiEllipseLeft => "semiellipse_left",
            Self::SemiEllipseRight => "semiellipse_right",
            Self::SemiEllipseUp => "semiellipse_up",
            Self::SemiEllipseDown => "semiellipse_down",
            Self::TriangleLeft => "triangle_left",
            Self::TriangleRight => "triangle_right",
            Self::TriangleUp => "triangle_up",
            Self::TriangleDown => "triangle_down",
            Self::FourRays => "four_rays",
            Self::Cross => "cross",
            Self::X => "x",
            Self::Dash => "dash",
            Self::Dot => "dot",
        }
    }

    /// Look up a shape by name, falling back to [`MarkerShape::Circle`].
    pub fn from_name(name: &str) -> Self {
        Self::try_from_name(name).unwrap_or_default()
    }

    /// Look up a shape by name.
    pub fn try_from_name(name: &str) -> Option<Self> {
        if let Some(shape) = Self::lookup(name) {
            return Some(shape);
        }
        if name.contains('-') {
            return Self::lookup(&name.replace('-', "_"));
        }
        None
    }

    fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|shape| shape.name() == name)
    }

    /// The fillable outline of this marker centred on `center`.
    ///
    /// Every contour winds the same way, so overlapping parts stay filled
    /// under the non-zero rule.
    pub fn outline(self, center: Point, width: f64, height: f64) -> BezPath {
        let rx = width.abs() * 0.5;
        let ry = height.abs() * 0.5;
        // Maps unit-box coordinates in [-1, 1] to device space.
        let at = |x: f64, y: f64| Point::new(center.x + x * rx, center.y + y * ry);
        let rect = |x0: f64, y0: f64, x1: f64, y1: f64| Rect::from_points(at(x0, y0), at(x1, y1));

        let mut path = BezPath::new();
        match self {
            Self::Square => extend(&mut path, rect(-1.0, -1.0, 1.0, 1.0).to_path(MARKER_TOLERANCE)),
            Self::Diamond => polygon(
                &mut path,
                &[at(0.0, -1.0), at(1.0, 0.0), at(0.0, 1.0), at(-1.0, 0.0)],
            ),
            Self::Circle => ellipse(&mut path, center, rx, ry),
            Self::CrossedCircle => {
                ellipse(&mut path, center, rx * 0.6, ry * 0.6);
                let t = BAR * 0.5;
                extend(&mut path, rect(-1.0, -t, 1.0, t).to_path(MARKER_TOLERANCE));
                extend(&mut path, rect(-t, -1.0, t, 1.0).to_path(MARKER_TOLERANCE));
            }
            Self::SemiEllipseLeft => semi_ellipse(&mut path, center, rx, ry, 0.5 * PI),
            Self::SemiEllipseRight => semi_ellipse(&mut path, center, rx, ry, -0.5 * PI),
            Self::SemiEllipseUp => semi_ellipse(&mut path, center, rx, ry, PI),
            Self::SemiEllipseDown => semi_ellipse(&mut path, center, rx, ry, 0.0),
            Self::TriangleLeft => polygon(
                &mut path,
                &[at(-1.0, 0.0), at(1.0, -1.0), at(1.0, 1.0)],
            ),
            Self::TriangleRight => polygon(
                &mut path,
                &[at(1.0, 0.0), at(-1.0, 1.0), at(-1.0, -1.0)],
            ),
            Self::TriangleUp => polygon(
                &mut path,
                &[at(0.0, -1.0), at(1.0, 1.0), at(-1.0, 1.0)],
            ),
            Self::TriangleDown => polygon(
                &mut path,
                &[at(0.0, 1.0), at(-1.0, -1.0), at(1.0, -1.0)],
            ),
            Self::FourRays => {
                let k = BAR;
                polygon(
                    &mut path,
                    &[
                        at(0.0, -1.0),
                        at(k, -k),
                        at(1.0, 0.0),
                        at(k, k),
                        at(0.0, 1.0),
                        at(-k, k),
                        at(-1.0, 0.0),
                        at(-k, -k),
                    ],
                );
            }
            Self::Cross => {
                extend(&mut path, rect(-1.0, -BAR, 1.0, BAR).to_path(MARKER_TOLERANCE));
                extend(&mut path, rect(-BAR, -1.0, BAR, 1.0).to_path(MARKER_TOLERANCE));
            }
            Self::X => {
                let a = 1.0 - BAR;
                polygon(
                    &mut path,
                    &[at(-1.0, -a), at(-a, -1.0), at(1.0, a), at(a, 1.0)],
                );
                polygon(
                    &mut path,
                    &[at(a, -1.0), at(1.0, -a), at(-a, 1.0), at(-1.0, a)],
                );
            }
            Self::Dash => extend(&mut path, rect(-1.0, -BAR, 1.0, BAR).to_path(MARKER_TOLERANCE)),
            Self::Dot => ellipse(&mut path, center, rx * 0.5, ry * 0.5),
        }
        path
    }
}

impl fmt::Display for MarkerShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn extend(path: &mut BezPath, other: BezPath) {
    path.extend(other.elements().iter().copied());
}

/// Append a closed polygon, reversed if needed so it winds like kurbo's shapes.
fn polygon(path: &mut BezPath, points: &[Point]) {
    let twice_area: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum();
    let mut push = |i: usize, p: Point| {
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    };
    if twice_area < 0.0 {
        points.iter().rev().enumerate().for_each(|(i, &p)| push(i, p));
    } else {
        points.iter().enumerate().for_each(|(i, &p)| push(i, p));
    }
    path.close_path();
}

fn ellipse(path: &mut BezPath, center: Point, rx: f64, ry: f64) {
    extend(
        path,
        Ellipse::new(center, Vec2::new(rx, ry), 0.0).to_path(MARKER_TOLERANCE),
    );
}

/// Half an ellipse whose arc starts at `start_angle` and sweeps half a turn.
fn semi_ellipse(path: &mut BezPath, center: Point, rx: f64, ry: f64, start_angle: f64) {
    let arc = Arc {
        center,
        radii: Vec2::new(rx, ry),
        start_angle,
        sweep_angle: PI,
        x_rotation: 0.0,
    };
    let mut half = arc.to_path(MARKER_TOLERANCE);
    half.close_path();
    extend(path, half);
}
