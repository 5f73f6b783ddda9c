/// A point in canvas space: x grows right, y grows down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned rectangle given by its top-left and bottom-right corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            min: Point::new(x0.min(x1), y0.min(y1)),
            max: Point::new(x0.max(x1), y0.max(y1)),
        }
    }

    pub fn around(center: Point, half_width: f64, half_height: f64) -> Self {
        Self::new(
            center.x - half_width,
            center.y - half_height,
            center.x + half_width,
            center.y + half_height,
        )
    }

    pub fn square(center: Point, half: f64) -> Self {
        Self::around(center, half, half)
    }

    pub fn inset(self, by: f64) -> Self {
        Self::new(
            self.min.x + by,
            self.min.y + by,
            self.max.x - by,
            self.max.y - by,
        )
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// Maps a polar position around `center` to canvas coordinates.
///
/// Angle 0 points straight up and angles grow clockwise, so the standard
/// trigonometric angle is rotated by -90 degrees before conversion.
pub fn project(center: Point, radius: f64, angle_degrees: f64) -> Point {
    let radians = (angle_degrees - 90.0).to_radians();
    Point::new(
        center.x + radius * radians.cos(),
        center.y + radius * radians.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(actual: Point, expected: Point) {
        assert!(
            actual.distance(expected) < EPS,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn zero_degrees_points_up() {
        let c = Point::new(240.0, 280.0);
        assert_close(project(c, 200.0, 0.0), Point::new(240.0, 80.0));
    }

    #[test]
    fn ninety_degrees_points_right() {
        let c = Point::new(240.0, 280.0);
        assert_close(project(c, 200.0, 90.0), Point::new(440.0, 280.0));
    }

    #[test]
    fn angles_grow_clockwise() {
        let c = Point::new(0.0, 0.0);
        assert_close(project(c, 10.0, 180.0), Point::new(0.0, 10.0));
        assert_close(project(c, 10.0, 270.0), Point::new(-10.0, 0.0));
    }

    #[test]
    fn wraparound_needs_no_special_case() {
        let c = Point::new(5.0, 5.0);
        assert_close(project(c, 3.0, 370.0), project(c, 3.0, 10.0));
        assert_close(project(c, 3.0, -90.0), project(c, 3.0, 270.0));
    }

    #[test]
    fn rect_normalizes_corners() {
        let r = Rect::new(10.0, 20.0, 0.0, 0.0);
        assert_eq!(r.min, Point::new(0.0, 0.0));
        assert_eq!(r.max, Point::new(10.0, 20.0));
        assert_eq!(r.inset(2.0).width(), 6.0);
        assert_eq!(Rect::around(Point::new(5.0, 5.0), 2.0, 1.0).height(), 2.0);
    }
}
