use std::collections::BTreeMap;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector and distance from `self` to `other`.
    ///
    /// Coincident points have no direction; they get `(1, 0)` so callers never
    /// divide by zero.
    pub fn direction_to(self, other: Point) -> (Point, f64) {
        let delta = other - self;
        let length = delta.length();
        if length == 0.0 {
            return (Point::new(1.0, 0.0), 0.0);
        }
        (delta * (1.0 / length), length)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

#[derive(Debug, Clone)]
pub struct NodeLayout {
    pub key: String,
    pub label: String,
    pub fill: Option<String>,
    pub radius: f64,
    /// Center of the node's circle.
    pub x: f64,
    pub y: f64,
}

impl NodeLayout {
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub nodes: BTreeMap<String, NodeLayout>,
    pub width: f64,
    pub height: f64,
}
