//! Grid coordinates

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A cell position on the grid.
///
/// Signed so that pointer positions left of or above the canvas can still be
/// expressed; whether a coordinate is usable is decided by
/// [`GridConfig::contains`](crate::GridConfig::contains).
///
/// Ordering is row-major (`y` first, then `x`), which is the canonical order
/// used for iteration and persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset this coordinate by a delta
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The four orthogonal neighbours (N, E, S, W). North is `y - 1`.
    pub fn orthogonal_neighbors(self) -> [Coordinate; 4] {
        [
            self.offset(0, -1),
            self.offset(1, 0),
            self.offset(0, 1),
            self.offset(-1, 0),
        ]
    }

    /// Euclidean distance to another coordinate
    pub fn distance(self, other: Coordinate) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Parse the legacy `"x,y"` key form used by persisted documents
    pub fn parse_key(key: &str) -> Option<Self> {
        let (x, y) = key.split_once(',')?;
        Some(Self {
            x: x.trim().parse().ok()?,
            y: y.trim().parse().ok()?,
        })
    }

    /// Format as the `"x,y"` key form used by persisted documents
    pub fn to_key(self) -> String {
        format!("{},{}", self.x, self.y)
    }
}

impl Ord for Coordinate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Coordinate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<(i32, i32)> for Coordinate {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
