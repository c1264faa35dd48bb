//! Symbol primitive and pin placement.
//!
//! A pin sits on one edge of its symbol at a fractional offset. The offset
//! is quantized onto the edge's usable cells, which exclude the corner cells
//! at each end, so a pin never lands on a box corner.

use super::{Bounds, Direction, ObjectId, Point, Shape, ShapeTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of cells excluded from pin placement at each end of an edge.
pub const PIN_CORNER_CELLS: i32 = 1;

/// Unique identifier for pins within a symbol.
pub type PinId = Uuid;

/// Symbol edge a pin is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinEdge {
    Left,
    Right,
    Top,
    Bottom,
}

impl PinEdge {
    /// Left and right pins leave the symbol horizontally.
    pub fn exits_horizontally(self) -> bool {
        matches!(self, PinEdge::Left | PinEdge::Right)
    }

    /// Direction a wire takes when leaving the pin away from the symbol.
    pub fn exit_direction(self) -> Direction {
        match self {
            PinEdge::Left => Direction::Left,
            PinEdge::Right => Direction::Right,
            PinEdge::Top => Direction::Up,
            PinEdge::Bottom => Direction::Down,
        }
    }
}

/// A connection point on a symbol edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pin {
    pub id: PinId,
    pub edge: PinEdge,
    /// Fraction along the edge in `[0, 1]`, top-to-bottom or left-to-right.
    pub offset: f64,
    #[serde(default)]
    pub name: String,
}

impl Pin {
    pub fn new(edge: PinEdge, offset: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            edge,
            offset,
            name: String::new(),
        }
    }
}

/// A component box with pins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symbol {
    pub(crate) id: ObjectId,
    /// Top-left cell.
    pub position: Point,
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub pins: Vec<Pin>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub z_index: i32,
}

/// Result of locating a symbol edge under a grid point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeHit {
    pub symbol_id: ObjectId,
    pub edge: PinEdge,
    pub offset: f64,
}

impl Symbol {
    pub fn new(position: Point, width: i32, height: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            pins: Vec::new(),
            name: String::new(),
            z_index: 0,
        }
    }

    /// Add a pin and return its id.
    pub fn add_pin(&mut self, edge: PinEdge, offset: f64) -> PinId {
        let pin = Pin::new(edge, offset);
        let id = pin.id;
        self.pins.push(pin);
        id
    }

    pub fn pin(&self, id: PinId) -> Option<&Pin> {
        self.pins.iter().find(|p| p.id == id)
    }

    pub fn pin_mut(&mut self, id: PinId) -> Option<&mut Pin> {
        self.pins.iter_mut().find(|p| p.id == id)
    }

    /// Live grid position of a pin by id.
    pub fn pin_position_of(&self, id: PinId) -> Option<Point> {
        self.pin(id).map(|pin| pin_position(self, pin))
    }

    /// The pin located exactly at `p`, if any.
    pub fn pin_at(&self, p: Point) -> Option<&Pin> {
        self.pins.iter().find(|pin| pin_position(self, pin) == p)
    }

    /// Number of cells along an edge available for pins.
    pub fn edge_slots(&self, edge: PinEdge) -> i32 {
        let length = if edge.exits_horizontally() {
            self.height
        } else {
            self.width
        };
        length - 2 * PIN_CORNER_CELLS
    }

    /// Cell for the `index`-th usable slot on an edge.
    fn slot_position(&self, edge: PinEdge, index: i32) -> Point {
        let Point { x, y } = self.position;
        let along = PIN_CORNER_CELLS + index;
        match edge {
            PinEdge::Top => Point::new(x + along, y),
            PinEdge::Bottom => Point::new(x + along, y + self.height - 1),
            PinEdge::Left => Point::new(x, y + along),
            PinEdge::Right => Point::new(x + self.width - 1, y + along),
        }
    }

    /// Which usable slot `p` occupies on `edge`, if any.
    fn slot_index_at(&self, edge: PinEdge, p: Point) -> Option<i32> {
        let Point { x, y } = self.position;
        let (on_edge, along) = match edge {
            PinEdge::Top => (p.y == y, p.x - x),
            PinEdge::Bottom => (p.y == y + self.height - 1, p.x - x),
            PinEdge::Left => (p.x == x, p.y - y),
            PinEdge::Right => (p.x == x + self.width - 1, p.y - y),
        };
        let index = along - PIN_CORNER_CELLS;
        (on_edge && index >= 0 && index < self.edge_slots(edge)).then_some(index)
    }

    /// Edge and fractional offset of `p` on this symbol's border.
    pub fn edge_at(&self, p: Point) -> Option<(PinEdge, f64)> {
        [PinEdge::Top, PinEdge::Bottom, PinEdge::Left, PinEdge::Right]
            .into_iter()
            .find_map(|edge| {
                let index = self.slot_index_at(edge, p)?;
                Some((edge, index_to_offset(index, self.edge_slots(edge))))
            })
    }
}

impl ShapeTrait for Symbol {
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

/// Quantize a fractional offset onto `slots` cells.
pub(crate) fn quantize_offset(offset: f64, slots: i32) -> i32 {
    if slots <= 1 {
        return 0;
    }
    (offset.clamp(0.0, 1.0) * f64::from(slots - 1)).round() as i32
}

fn index_to_offset(index: i32, slots: i32) -> f64 {
    if slots <= 1 {
        0.5
    } else {
        f64::from(index) / f64::from(slots - 1)
    }
}

/// Grid position of a pin, derived from the symbol's bounds, the pin's edge
/// and its quantized offset.
pub fn pin_position(symbol: &Symbol, pin: &Pin) -> Point {
    let slots = symbol.edge_slots(pin.edge);
    symbol.slot_position(pin.edge, quantize_offset(pin.offset, slots))
}

/// Find the symbol edge under `p`, topmost symbol first.
pub fn find_symbol_edge_at_point(p: Point, objects: &[Shape]) -> Option<EdgeHit> {
    objects.iter().rev().find_map(|shape| {
        let symbol = shape.as_symbol()?;
        let (edge, offset) = symbol.edge_at(p)?;
        Some(EdgeHit {
            symbol_id: symbol.id,
            edge,
            offset,
        })
    })
}

/// Whether placing a pin at `offset` on `edge` would land on the same cell as
/// another pin of the symbol.
pub fn check_pin_collision(
    symbol: &Symbol,
    edge: PinEdge,
    offset: f64,
    exclude_pin: Option<PinId>,
) -> bool {
    let slots = symbol.edge_slots(edge);
    let target = quantize_offset(offset, slots);
    symbol
        .pins
        .iter()
        .filter(|pin| Some(pin.id) != exclude_pin && pin.edge == edge)
        .any(|pin| quantize_offset(pin.offset, slots) == target)
}
