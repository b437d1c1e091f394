//! Rotation math for screen coordinates.
//!
//! The coordinate system is left-handed with Y pointing down, so a positive
//! angle turns clockwise on screen. The rotation matrix is:
//!
//! ```text
//! x' = round(x * cos(θ) - y * sin(θ))
//! y' = round(x * sin(θ) + y * cos(θ))
//! ```
//!
//! Rounding is half away from zero (`f64::round`), which decides where edge
//! pixels land after rotation.

/// Integer pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// A rotation by a fixed angle with its sine and cosine precomputed.
///
/// Mapping many points through one `Rotation` gives exactly the same results
/// as calling [`rotate_point`] for each of them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    sin: f64,
    cos: f64,
}

impl Rotation {
    pub fn new(angle_degrees: f64) -> Self {
        let radians = angle_degrees.to_radians();
        Self {
            sin: radians.sin(),
            cos: radians.cos(),
        }
    }

    #[inline]
    pub fn apply(&self, point: Point) -> Point {
        let (x, y) = (point.x as f64, point.y as f64);
        Point {
            x: (x * self.cos - y * self.sin).round() as i64,
            y: (x * self.sin + y * self.cos).round() as i64,
        }
    }
}

/// Rotate `point` about the origin by `angle_degrees` (clockwise on screen).
pub fn rotate_point(point: Point, angle_degrees: f64) -> Point {
    Rotation::new(angle_degrees).apply(point)
}

/// Output canvas of a rotation and the translation that moves the rotated
/// content's top-left corner to `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotatedBounds {
    pub width: i64,
    pub height: i64,
    pub offset_x: i64,
    pub offset_y: i64,
}

/// Compute the canvas for rotating a `width x height` image.
///
/// The corners `p1 (0,0)`, `p2 (w-1,0)`, `p3 (w-1,h-1)` and `p4 (0,h-1)` are
/// rotated, then:
///
/// ```text
/// width  = max(|p3.x - p1.x| + 1, |p4.x - p2.x| + 1)
/// height = max(|p3.y - p1.x| + 1, |p4.y - p2.y| + 1)
/// ```
///
/// The height term pairs `p3.y` with `p1.x`. `p1` is the origin, so both of
/// its coordinates are always zero.
pub fn rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> RotatedBounds {
    let rotation = Rotation::new(angle_degrees);
    let right = i64::from(width) - 1;
    let bottom = i64::from(height) - 1;

    let p1 = rotation.apply(Point::new(0, 0));
    let p2 = rotation.apply(Point::new(right, 0));
    let p3 = rotation.apply(Point::new(right, bottom));
    let p4 = rotation.apply(Point::new(0, bottom));

    let out_width = ((p3.x - p1.x).abs() + 1).max((p4.x - p2.x).abs() + 1);
    let out_height = ((p3.y - p1.x).abs() + 1).max((p4.y - p2.y).abs() + 1);

    let corners = [p1, p2, p3, p4];
    let min_x = corners.iter().map(|p| p.x).min().unwrap_or(0);
    let min_y = corners.iter().map(|p| p.y).min().unwrap_or(0);

    RotatedBounds {
        width: out_width,
        height: out_height,
        offset_x: -min_x,
        offset_y: -min_y,
    }
}
