use std::fmt;

use serde::{Deserialize, Serialize};

/// Warehouse bounding box: `width` along x, `height` along y (stack levels), `depth` along z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
    pub depth: i32,
}

impl Size {
    pub fn new(width: i32, height: i32, depth: i32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0 || self.depth <= 0
    }

    pub fn contains(&self, p: Position) -> bool {
        p.x >= 0
            && p.y >= 0
            && p.z >= 0
            && p.x < self.width
            && p.y < self.height
            && p.z < self.depth
    }

    pub fn contains_column(&self, x: i32, z: i32) -> bool {
        x >= 0 && z >= 0 && x < self.width && z < self.depth
    }

    pub fn column_count(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.width as usize) * (self.depth as usize)
    }

    pub fn iter_columns(&self) -> impl Iterator<Item = (i32, i32)> {
        let width = self.width.max(0);
        let depth = self.depth.max(0);
        (0..width).flat_map(move |x| (0..depth).map(move |z| (x, z)))
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.depth)
    }
}

/// A grid cell. The crane's hook rests on these between commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn with_y(self, y: i32) -> Self {
        Self { y, ..self }
    }

    pub fn with_x(self, x: i32) -> Self {
        Self { x, ..self }
    }

    pub fn manhattan(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) + self.z.abs_diff(other.z)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Continuous position, used while the crane is between grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn lerp(self, to: Point3, t: f64) -> Self {
        Self {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
            z: self.z + (to.z - self.z) * t,
        }
    }

    /// True when every axis lies in `[0, dim - 1]`.
    pub fn within(&self, size: Size) -> bool {
        let inside = |v: f64, dim: i32| v >= 0.0 && v <= f64::from(dim - 1);
        inside(self.x, size.width) && inside(self.y, size.height) && inside(self.z, size.depth)
    }
}

impl From<Position> for Point3 {
    fn from(p: Position) -> Self {
        Self {
            x: f64::from(p.x),
            y: f64::from(p.y),
            z: f64::from(p.z),
        }
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}
