//! Box primitive.

use super::{Bounds, LineStyle, ObjectId, Point, ShapeTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A drawn box, occupying `width` x `height` cells from its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    pub(crate) id: ObjectId,
    /// Top-left cell.
    pub position: Point,
    pub width: i32,
    pub height: i32,
    /// Border style.
    #[serde(default)]
    pub style: LineStyle,
    #[serde(default)]
    pub z_index: i32,
}

impl Rectangle {
    /// Create a new box.
    pub fn new(position: Point, width: i32, height: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            style: LineStyle::default(),
            z_index: 0,
        }
    }

    /// Create a box spanning two opposite corner cells (inclusive).
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let min = Point::new(p1.x.min(p2.x), p1.y.min(p2.y));
        let width = (p2.x - p1.x).abs() + 1;
        let height = (p2.y - p1.y).abs() + 1;
        Self::new(min, width, height)
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn bounds(&self) -> Bounds {
        Bounds::new(
            self.position,
            self.position.offset(self.width.max(1) - 1, self.height.max(1) - 1),
        )
    }

    fn z_index(&self) -> i32 {
        self.z_index
    }

    fn translate(&mut self, dx: i32, dy: i32) {
        self.position = self.position.offset(dx, dy);
    }
}
