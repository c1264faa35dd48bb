//! Primitive object definitions for a diagram page.

mod line;
mod rectangle;
mod symbol;
mod text;
mod wire;

pub use line::Line;
pub use rectangle::Rectangle;
pub use symbol::{
    EdgeHit, PIN_CORNER_CELLS, Pin, PinEdge, PinId, Symbol, check_pin_collision,
    find_symbol_edge_at_point, pin_position,
};
pub use text::Text;
pub use wire::{PinBinding, Wire};

use crate::geometry::CornerRole;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for primitives.
pub type ObjectId = Uuid;

/// Integer grid coordinate (column, row). Rows grow downward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return this point shifted by `(dx, dy)`.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Travel direction along an orthogonal segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
    #[default]
    None,
}

/// Visual stroke style for lines, wires and boxes.
///
/// Variants are declared in precedence order, so `max` picks the style a
/// junction between mixed contributors is drawn with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Single,
    Double,
    Thick,
}

impl LineStyle {
    /// Combine contributor styles: thick wins over double, double over single.
    pub fn consolidate(styles: impl IntoIterator<Item = LineStyle>) -> LineStyle {
        styles.into_iter().max().unwrap_or_default()
    }

    pub fn horizontal_glyph(self) -> char {
        match self {
            LineStyle::Single => '─',
            LineStyle::Double => '═',
            LineStyle::Thick => '━',
        }
    }

    pub fn vertical_glyph(self) -> char {
        match self {
            LineStyle::Single => '│',
            LineStyle::Double => '║',
            LineStyle::Thick => '┃',
        }
    }

    pub fn junction_glyph(self) -> char {
        match self {
            LineStyle::Single => '┼',
            LineStyle::Double => '╬',
            LineStyle::Thick => '╋',
        }
    }

    pub fn corner_glyph(self, role: CornerRole) -> char {
        match (self, role) {
            (LineStyle::Single, CornerRole::TopLeft) => '┌',
            (LineStyle::Single, CornerRole::TopRight) => '┐',
            (LineStyle::Single, CornerRole::BottomLeft) => '└',
            (LineStyle::Single, CornerRole::BottomRight) => '┘',
            (LineStyle::Double, CornerRole::TopLeft) => '╔',
            (LineStyle::Double, CornerRole::TopRight) => '╗',
            (LineStyle::Double, CornerRole::BottomLeft) => '╚',
            (LineStyle::Double, CornerRole::BottomRight) => '╝',
            (LineStyle::Thick, CornerRole::TopLeft) => '┏',
            (LineStyle::Thick, CornerRole::TopRight) => '┓',
            (LineStyle::Thick, CornerRole::BottomLeft) => '┗',
            (LineStyle::Thick, CornerRole::BottomRight) => '┛',
        }
    }
}

/// Inclusive cell bounds of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Smallest bounds covering every point, or `None` for an empty slice.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = *points.first()?;
        Some(points.iter().skip(1).fold(Self::new(first, first), |b, p| {
            Self::new(
                Point::new(b.min.x.min(p.x), b.min.y.min(p.y)),
                Point::new(b.max.x.max(p.x), b.max.y.max(p.y)),
            )
        }))
    }

    pub fn union(self, other: Bounds) -> Bounds {
        Bounds::new(
            Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        )
    }
}

/// Common trait for all primitives.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ObjectId;

    /// Get the cell bounds.
    fn bounds(&self) -> Bounds;

    /// Explicit stacking order within a render tier.
    fn z_index(&self) -> i32;

    /// Move the whole primitive by a grid delta.
    fn translate(&mut self, dx: i32, dy: i32);
}

/// Discriminant of primitives and derived objects, used for render ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Line,
    Junction,
    Wire,
    WireJunction,
    WireNoConnect,
    Box,
    Symbol,
    Text,
}

/// Enum wrapper for all primitive types (for storage and dispatch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Line(Line),
    Wire(Wire),
    Box(Rectangle),
    Symbol(Symbol),
    Text(Text),
}

impl Shape {
    pub fn id(&self) -> ObjectId {
        match self {
            Shape::Line(s) => s.id(),
            Shape::Wire(s) => s.id(),
            Shape::Box(s) => s.id(),
            Shape::Symbol(s) => s.id(),
            Shape::Text(s) => s.id(),
        }
    }

    pub fn bounds(&self) -> Bounds {
        match self {
            Shape::Line(s) => s.bounds(),
            Shape::Wire(s) => s.bounds(),
            Shape::Box(s) => s.bounds(),
            Shape::Symbol(s) => s.bounds(),
            Shape::Text(s) => s.bounds(),
        }
    }

    pub fn z_index(&self) -> i32 {
        match self {
            Shape::Line(s) => s.z_index(),
            Shape::Wire(s) => s.z_index(),
            Shape::Box(s) => s.z_index(),
            Shape::Symbol(s) => s.z_index(),
            Shape::Text(s) => s.z_index(),
        }
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        match self {
            Shape::Line(s) => s.translate(dx, dy),
            Shape::Wire(s) => s.translate(dx, dy),
            Shape::Box(s) => s.translate(dx, dy),
            Shape::Symbol(s) => s.translate(dx, dy),
            Shape::Text(s) => s.translate(dx, dy),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            Shape::Line(_) => ObjectKind::Line,
            Shape::Wire(_) => ObjectKind::Wire,
            Shape::Box(_) => ObjectKind::Box,
            Shape::Symbol(_) => ObjectKind::Symbol,
            Shape::Text(_) => ObjectKind::Text,
        }
    }

    pub fn as_wire(&self) -> Option<&Wire> {
        match self {
            Shape::Wire(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Shape::Symbol(s) => Some(s),
            _ => None,
        }
    }
}

/// Iterate over the wires in an object list.
pub fn wires(objects: &[Shape]) -> impl Iterator<Item = &Wire> {
    objects.iter().filter_map(Shape::as_wire)
}

/// Iterate over the symbols in an object list.
pub fn symbols(objects: &[Shape]) -> impl Iterator<Item = &Symbol> {
    objects.iter().filter_map(Shape::as_symbol)
}
