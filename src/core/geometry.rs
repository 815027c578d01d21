//! Pure hit-testing and line-derivation helpers in pixel space.

use crate::core::{Bounding, Coordinate};

/// Distance, in pixels, within which a pointer counts as "on" a line.
pub const LINE_HIT_TOLERANCE: f64 = 2.0;

/// Classification of a line through two coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    Horizontal,
    Vertical,
    Common,
}

#[must_use]
pub fn line_type(start: Coordinate, end: Coordinate) -> LineType {
    if start.x == end.x {
        LineType::Vertical
    } else if start.y == end.y {
        LineType::Horizontal
    } else {
        LineType::Common
    }
}

/// Slope and intercept `(k, b)` of `y = k * x + b`; `None` for vertical lines.
#[must_use]
pub fn linear_slope_intercept(start: Coordinate, end: Coordinate) -> Option<(f64, f64)> {
    let dif_x = end.x - start.x;
    if dif_x == 0.0 {
        return None;
    }
    let k = (end.y - start.y) / dif_x;
    Some((k, start.y - k * start.x))
}

/// `y` of the line through `start`/`end` at `target.x`; vertical lines
/// return `start.y`.
#[must_use]
pub fn linear_y_from_coordinates(start: Coordinate, end: Coordinate, target: Coordinate) -> f64 {
    linear_slope_intercept(start, end).map_or(start.y, |(k, b)| k * target.x + b)
}

#[must_use]
pub fn check_coordinate_on_circle(center: Coordinate, radius: f64, target: Coordinate) -> bool {
    let dif_x = target.x - center.x;
    let dif_y = target.y - center.y;
    dif_x * dif_x + dif_y * dif_y <= radius * radius
}

/// Perpendicular distance from `target` to the infinite line through
/// `start`/`end`. Degenerate lines fall back to point distance.
#[must_use]
pub fn distance_to_straight_line(start: Coordinate, end: Coordinate, target: Coordinate) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length = dx.hypot(dy);
    if length == 0.0 {
        return start.distance_to(target);
    }
    ((target.x - start.x) * dy - (target.y - start.y) * dx).abs() / length
}

#[must_use]
pub fn check_coordinate_on_straight_line(
    start: Coordinate,
    end: Coordinate,
    target: Coordinate,
) -> bool {
    if !start.is_finite() || !end.is_finite() || !target.is_finite() {
        return false;
    }
    distance_to_straight_line(start, end, target) <= LINE_HIT_TOLERANCE
}

/// Ray starting at `start` and passing through `end`.
#[must_use]
pub fn check_coordinate_on_ray_line(
    start: Coordinate,
    end: Coordinate,
    target: Coordinate,
) -> bool {
    if !check_coordinate_on_straight_line(start, end, target) {
        return false;
    }
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    // Projection of the target onto the ray direction must not point backwards.
    (target.x - start.x) * dx + (target.y - start.y) * dy >= -LINE_HIT_TOLERANCE * dx.hypot(dy)
}

#[must_use]
pub fn check_coordinate_on_segment(start: Coordinate, end: Coordinate, target: Coordinate) -> bool {
    if !check_coordinate_on_straight_line(start, end, target) {
        return false;
    }
    let tolerance = LINE_HIT_TOLERANCE;
    target.x >= start.x.min(end.x) - tolerance
        && target.x <= start.x.max(end.x) + tolerance
        && target.y >= start.y.min(end.y) - tolerance
        && target.y <= start.y.max(end.y) + tolerance
}

/// End points of the straight line through `start`/`end`, clipped to the
/// horizontal (or vertical) extent of `bounding`.
#[must_use]
pub fn straight_line_ends(
    start: Coordinate,
    end: Coordinate,
    bounding: Bounding,
) -> [Coordinate; 2] {
    match line_type(start, end) {
        LineType::Vertical => [
            Coordinate::new(start.x, 0.0),
            Coordinate::new(start.x, bounding.height),
        ],
        LineType::Horizontal => [
            Coordinate::new(0.0, start.y),
            Coordinate::new(bounding.width, start.y),
        ],
        LineType::Common => [
            Coordinate::new(0.0, linear_y_from_coordinates(start, end, Coordinate::new(0.0, 0.0))),
            Coordinate::new(
                bounding.width,
                linear_y_from_coordinates(start, end, Coordinate::new(bounding.width, 0.0)),
            ),
        ],
    }
}

/// Far end of the ray from `start` through `end`, at the edge of `bounding`.
#[must_use]
pub fn ray_line_end(start: Coordinate, end: Coordinate, bounding: Bounding) -> Coordinate {
    match line_type(start, end) {
        LineType::Vertical => {
            let y = if end.y < start.y { 0.0 } else { bounding.height };
            Coordinate::new(start.x, y)
        }
        LineType::Horizontal | LineType::Common => {
            let x = if end.x < start.x { 0.0 } else { bounding.width };
            Coordinate::new(x, linear_y_from_coordinates(start, end, Coordinate::new(x, 0.0)))
        }
    }
}

/// Straight line through `start`/`end` plus its parallel through `offset`,
/// both clipped to `bounding`. With `mirrored` a third line is added at the
/// opposite offset (price channel).
#[must_use]
pub fn parallel_lines(
    start: Coordinate,
    end: Coordinate,
    offset: Coordinate,
    bounding: Bounding,
    mirrored: bool,
) -> Vec<[Coordinate; 2]> {
    let main = straight_line_ends(start, end, bounding);
    let mut lines = vec![main];
    let (dx, dy) = match line_type(start, end) {
        LineType::Vertical => (offset.x - start.x, 0.0),
        LineType::Horizontal | LineType::Common => {
            (0.0, offset.y - linear_y_from_coordinates(start, end, offset))
        }
    };
    let shifted = |sign: f64| {
        main.map(|coordinate| Coordinate::new(coordinate.x + sign * dx, coordinate.y + sign * dy))
    };
    lines.push(shifted(1.0));
    if mirrored {
        lines.push(shifted(-1.0));
    }
    lines
}

/// Fibonacci retracement ratios, from 100% down to 0%. The retracement mark
/// anchors 100% at its first point.
pub const FIBONACCI_RATIOS: [f64; 7] = [1.0, 0.786, 0.618, 0.5, 0.382, 0.236, 0.0];

/// `(ratio, value)` pairs interpolated between `from` (0%) and `to` (100%).
#[must_use]
pub fn fibonacci_levels(from: f64, to: f64) -> Vec<(f64, f64)> {
    FIBONACCI_RATIOS
        .iter()
        .map(|ratio| (*ratio, from + (to - from) * ratio))
        .collect()
}
