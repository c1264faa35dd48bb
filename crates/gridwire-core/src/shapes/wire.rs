//! Wire primitive.

use super::{Bounds, LineStyle, ObjectId, PinId, Point, ShapeTrait};
use crate::geometry::{self, Segment};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Logical attachment of a wire endpoint to a symbol pin.
///
/// Carries no geometry; the endpoint position is always recomputed from the
/// live symbol and pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinBinding {
    pub symbol_id: ObjectId,
    pub pin_id: PinId,
}

impl PinBinding {
    pub fn new(symbol_id: ObjectId, pin_id: PinId) -> Self {
        Self { symbol_id, pin_id }
    }
}

/// An electrical orthogonal polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wire {
    pub(crate) id: ObjectId,
    /// Ordered vertices; consecutive pairs differ in exactly one axis.
    pub points: Vec<Point>,
    /// Stroke style.
    #[serde(default)]
    pub style: LineStyle,
    /// Net label (may be empty).
    #[serde(default)]
    pub net: String,
    #[serde(default)]
    pub start_binding: Option<PinBinding>,
    #[serde(default)]
    pub end_binding: Option<PinBinding>,
    /// Stacking order among wires.
    #[serde(default)]
    pub z_index: i32,
}

impl Wire {
    /// Create a new unbound, unlabeled wire through `points`.
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            style: LineStyle::default(),
            net: String::new(),
            start_binding: None,
            end_binding: None,
            z_index: 0,
        }
    }

    pub fn with_net(mut self, net: impl Into<String>) -> Self {
        self.net = net.into();
        self
    }

    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_bindings(mut self, start: Option<PinBinding>, end: Option<PinBinding>) -> Self {
        self.start_binding = start;
        self.end_binding = end;
        self
    }

    /// Copy of this wire under a fresh id.
    pub(crate) fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            ..self.clone()
        }
    }

    /// First (`is_start`) or last vertex.
    pub fn endpoint(&self, is_start: bool) -> Option<Point> {
        if is_start {
            self.points.first().copied()
        } else {
            self.points.last().copied()
        }
    }

    pub fn binding(&self, is_start: bool) -> Option<PinBinding> {
        if is_start {
            self.start_binding
        } else {
            self.end_binding
        }
    }

    pub fn set_binding(&mut self, is_start: bool, binding: Option<PinBinding>) {
        if is_start {
            self.start_binding = binding;
        } else {
            self.end_binding = binding;
        }
    }

    /// Whether either end is bound to the given symbol.
    pub fn is_bound_to(&self, symbol_id: ObjectId) -> bool {
        [self.start_binding, self.end_binding]
            .iter()
            .flatten()
            .any(|b| b.symbol_id == symbol_id)
    }

    pub fn segments(&self) -> Vec<Segment> {
        geometry::get_segments(&self.points)
    }

    /// Whether `p` is a vertex of this wire or lies on one of its segments.
    pub fn touches(&self, p: Point) -> bool {
        self.points.contains(&p)
            || self
                .segments()
                .iter()
                .any(|s| geometry::point_on_segment(p, s.start, s.end))
    }
}

impl ShapeTrait for Wire {
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
