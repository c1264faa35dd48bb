//! Line primitive.

use super::{Bounds, LineStyle, ObjectId, Point, ShapeTrait};
use crate::geometry::{self, Segment};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A purely visual orthogonal polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub(crate) id: ObjectId,
    /// Ordered vertices; consecutive pairs differ in exactly one axis.
    pub points: Vec<Point>,
    /// Stroke style.
    #[serde(default)]
    pub style: LineStyle,
    /// Stacking order among lines.
    #[serde(default)]
    pub z_index: i32,
}

impl Line {
    /// Create a new single-style line through `points`.
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            style: LineStyle::default(),
            z_index: 0,
        }
    }

    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.style = style;
        self
    }

    pub fn start(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn segments(&self) -> Vec<Segment> {
        geometry::get_segments(&self.points)
    }

    /// Join this line with another line that shares one endpoint.
    ///
    /// The result is a new line carrying this line's style and z-index.
    pub fn merge(&self, other: &Line) -> Option<Line> {
        let points = geometry::merge_lines(&self.points, &other.points)?;
        Some(Line {
            id: Uuid::new_v4(),
            points,
            style: self.style,
            z_index: self.z_index,
        })
    }
}

impl ShapeTrait for Line {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn bounds(&self) -> Bounds {
        Bounds::from_points(&self.points).unwrap_or(Bounds::new(Point::ZERO, Point::ZERO))
    }

    fn z_index(&self) -> i32 {
        self.z_index
    }

    fn translate(&mut self, dx: i32, dy: i32) {
        for p in &mut self.points {
            *p = p.offset(dx, dy);
        }
    }
}
