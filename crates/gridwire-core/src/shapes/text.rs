//! Text primitive.

use super::{Bounds, ObjectId, Point, ShapeTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A free text block anchored at its top-left cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub(crate) id: ObjectId,
    pub position: Point,
    pub content: String,
    #[serde(default)]
    pub z_index: i32,
}

impl Text {
    pub fn new(position: Point, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content: content.into(),
            z_index: 0,
        }
    }

    /// Width in cells of the widest line.
    fn columns(&self) -> i32 {
        self.content
            .lines()
            .map(|l| l.chars().count() as i32)
            .max()
            .unwrap_or(0)
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn bounds(&self) -> Bounds {
        let rows = self.content.lines().count().max(1) as i32;
        let cols = self.columns().max(1);
        Bounds::new(self.position, self.position.offset(cols - 1, rows - 1))
    }

    fn z_index(&self) -> i32 {
        self.z_index
    }

    fn translate(&mut self, dx: i32, dy: i32) {
        self.position = self.position.offset(dx, dy);
    }
}
