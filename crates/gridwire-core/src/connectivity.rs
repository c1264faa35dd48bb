//! Wire connectivity: endpoint bindings, merging, extension, splitting and
//! rubberbanding.
//!
//! Nothing here mutates a page. Operations return new wires or an
//! [`EditPlan`] that the caller commits (and records for undo).

use crate::geometry::{direction_between, orthogonalize, simplify_points};
use crate::shapes::{
    Direction, ObjectId, PinBinding, PinEdge, PinId, Point, Shape, Symbol, Wire,
    check_pin_collision, pin_position, symbols, wires,
};
use thiserror::Error;

/// Rejected connectivity edits.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConnectivityError {
    #[error("Pin {pin} would collide with another pin on symbol {symbol}")]
    PinCollision { symbol: ObjectId, pin: PinId },
    #[error("Pin {pin} would leave its edge on symbol {symbol}")]
    PinOffEdge { symbol: ObjectId, pin: PinId },
    #[error("Segment {index} out of range ({count} segments)")]
    SegmentOutOfRange { index: usize, count: usize },
    #[error("Segment {0} is neither horizontal nor vertical")]
    DegenerateSegment(usize),
    #[error("Object not found: {0}")]
    UnknownObject(ObjectId),
    #[error("Object is not a wire: {0}")]
    NotAWire(ObjectId),
}

/// Primitives to delete, replace in place, and create, as one undoable unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditPlan {
    pub remove: Vec<ObjectId>,
    pub replace: Vec<Shape>,
    pub insert: Vec<Shape>,
}

impl EditPlan {
    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.replace.is_empty() && self.insert.is_empty()
    }

    /// Plan that swaps a single wire for an updated version of itself.
    pub fn replacing(wire: Wire) -> Self {
        Self {
            replace: vec![Shape::Wire(wire)],
            ..Self::default()
        }
    }

    /// Wires created by this plan, in order.
    pub fn inserted_wires(&self) -> impl Iterator<Item = &Wire> {
        self.insert.iter().filter_map(Shape::as_wire)
    }

    /// Wires replaced by this plan, in order.
    pub fn replaced_wires(&self) -> impl Iterator<Item = &Wire> {
        self.replace.iter().filter_map(Shape::as_wire)
    }
}

fn find_wire(objects: &[Shape], id: ObjectId) -> Result<&Wire, ConnectivityError> {
    let shape = objects
        .iter()
        .find(|s| s.id() == id)
        .ok_or(ConnectivityError::UnknownObject(id))?;
    shape.as_wire().ok_or(ConnectivityError::NotAWire(id))
}

fn find_symbol(objects: &[Shape], id: ObjectId) -> Option<&Symbol> {
    symbols(objects).find(|s| s.id == id)
}

/// Whether a wire endpoint is connected to nothing.
///
/// An endpoint is attached if it is bound to a pin, lies anywhere on another
/// wire, or sits on any symbol's pin, checked in that order.
pub fn is_floating_endpoint(wire: &Wire, is_start: bool, objects: &[Shape]) -> bool {
    let Some(p) = wire.endpoint(is_start) else {
        return false;
    };
    if wire.binding(is_start).is_some() {
        return false;
    }
    if wires(objects).any(|other| other.id != wire.id && other.touches(p)) {
        return false;
    }
    !symbols(objects).any(|symbol| symbol.pin_at(p).is_some())
}

/// Direction of travel leaving the endpoint along its first or last segment.
pub fn get_endpoint_exit_direction(wire: &Wire, is_start: bool) -> Direction {
    let pts = &wire.points;
    let n = pts.len();
    if n < 2 {
        return Direction::None;
    }
    if is_start {
        direction_between(pts[0], pts[1])
    } else {
        direction_between(pts[n - 1], pts[n - 2])
    }
}

/// Right-angle Z path from a pin to `other`, leaving the pin along its edge
/// axis and turning at the midpoint.
fn staircase(pin: Point, other: Point, horizontal: bool) -> Vec<Point> {
    if horizontal {
        let mid_x = (pin.x + other.x).div_euclid(2);
        vec![pin, Point::new(mid_x, pin.y), Point::new(mid_x, other.y), other]
    } else {
        let mid_y = (pin.y + other.y).div_euclid(2);
        vec![pin, Point::new(pin.x, mid_y), Point::new(other.x, mid_y), other]
    }
}

/// Move a bound endpoint to its pin's new position, keeping the wire
/// orthogonal.
///
/// With three or more points the neighbouring vertex follows on the axis the
/// pin edge dictates. A two-point wire that would go diagonal gets a
/// staircase through the midpoint. If the route would collapse to a single
/// cell (the pin landed on the wire's other end), the wire is returned
/// unchanged.
pub fn update_endpoint_position(
    wire: &Wire,
    is_start: bool,
    new_pos: Point,
    edge: PinEdge,
) -> Wire {
    let mut updated = wire.clone();
    let n = wire.points.len();
    if n < 2 {
        return updated;
    }
    let horizontal = edge.exits_horizontally();
    let (end, adj) = if is_start { (0, 1) } else { (n - 1, n - 2) };

    let mut pts = wire.points.clone();
    pts[end] = new_pos;
    if n >= 3 {
        if horizontal {
            pts[adj].y = new_pos.y;
        } else {
            pts[adj].x = new_pos.x;
        }
    } else if pts[0].x != pts[1].x && pts[0].y != pts[1].y {
        pts = staircase(new_pos, pts[adj], horizontal);
        if !is_start {
            pts.reverse();
        }
    }
    let points = orthogonalize(&pts, horizontal);
    if points.len() < 2 {
        log::debug!("wire {} would collapse onto {:?}; left in place", wire.id, new_pos);
        return updated;
    }
    updated.points = points;
    updated
}

/// Combine two wires whose free endpoints meet.
///
/// The merged wire keeps the bindings of the two outer ends and the first
/// wire's net (the second's if the first is unlabeled). Returns `None` if the
/// chosen endpoints do not coincide, are bound, or belong to the same wire.
pub fn merge_wires(
    wire1: &Wire,
    wire1_is_start: bool,
    wire2: &Wire,
    wire2_is_start: bool,
) -> Option<EditPlan> {
    if wire1.id == wire2.id || wire1.points.len() < 2 || wire2.points.len() < 2 {
        return None;
    }
    let shared = wire1.endpoint(wire1_is_start)?;
    if wire2.endpoint(wire2_is_start)? != shared {
        return None;
    }
    if wire1.binding(wire1_is_start).is_some() || wire2.binding(wire2_is_start).is_some() {
        return None;
    }

    let mut head = wire1.points.clone();
    if wire1_is_start {
        head.reverse();
    }
    let mut tail = wire2.points.clone();
    if !wire2_is_start {
        tail.reverse();
    }
    head.extend_from_slice(&tail[1..]);

    let net = if wire1.net.is_empty() {
        wire2.net.clone()
    } else {
        wire1.net.clone()
    };
    let mut merged = Wire::new(simplify_points(&head))
        .with_net(net)
        .with_style(wire1.style)
        .with_bindings(wire1.binding(!wire1_is_start), wire2.binding(!wire2_is_start));
    merged.z_index = wire1.z_index;

    log::debug!("merging wires {} and {} at {:?}", wire1.id, wire2.id, shared);
    Some(EditPlan {
        remove: vec![wire1.id, wire2.id],
        insert: vec![Shape::Wire(merged)],
        ..EditPlan::default()
    })
}

/// Prepend (`from_start`) or append a run of points to a wire.
///
/// `new_points` is ordered outward from the extended end. The untouched end
/// keeps its binding; the extended end takes `new_binding`.
pub fn extend_wire(
    wire: &Wire,
    from_start: bool,
    new_points: &[Point],
    new_binding: Option<PinBinding>,
) -> Wire {
    let mut pts = Vec::with_capacity(wire.points.len() + new_points.len());
    if from_start {
        pts.extend(new_points.iter().rev());
        pts.extend_from_slice(&wire.points);
    } else {
        pts.extend_from_slice(&wire.points);
        pts.extend_from_slice(new_points);
    }
    let mut extended = wire.clone();
    extended.points = orthogonalize(&pts, true);
    extended.set_binding(from_start, new_binding);
    extended
}

/// Cut a wire in two at a point strictly inside it.
///
/// The first half keeps the start binding, the second the end binding; both
/// keep net and style.
pub fn split_wire(wire: &Wire, at: Point) -> Option<EditPlan> {
    let pts = &wire.points;
    if pts.len() < 2 || pts.first() == Some(&at) || pts.last() == Some(&at) {
        return None;
    }
    let index = wire.segments().iter().position(|s| s.contains(at))?;

    let mut first = wire.duplicate();
    let mut head = pts[..=index].to_vec();
    head.push(at);
    first.points = simplify_points(&head);
    first.end_binding = None;

    let mut second = wire.duplicate();
    let mut tail = vec![at];
    tail.extend_from_slice(&pts[index + 1..]);
    second.points = simplify_points(&tail);
    second.start_binding = None;

    Some(EditPlan {
        remove: vec![wire.id],
        insert: vec![Shape::Wire(first), Shape::Wire(second)],
        ..EditPlan::default()
    })
}

/// Re-attach every wire bound to `symbol` at the symbol's live pin positions.
///
/// Only wires whose geometry changed are returned.
pub fn rubberband_symbol(symbol: &Symbol, objects: &[Shape]) -> Vec<Wire> {
    rubberband_symbols(std::slice::from_ref(symbol), objects, None)
}

/// Rubberband against several moved symbols at once, so a wire bound to two
/// of them gets both ends updated in one result.
fn rubberband_symbols(moved: &[Symbol], objects: &[Shape], skip: Option<ObjectId>) -> Vec<Wire> {
    wires(objects)
        .filter(|w| Some(w.id) != skip && moved.iter().any(|s| w.is_bound_to(s.id)))
        .filter_map(|wire| {
            let follower = follow_pins(wire, moved);
            (follower.points != wire.points).then_some(follower)
        })
        .collect()
}

/// Move each bound end of `wire` onto its pin among `moved`.
fn follow_pins(wire: &Wire, moved: &[Symbol]) -> Wire {
    let mut follower = wire.clone();
    for is_start in [true, false] {
        let Some(binding) = follower.binding(is_start) else {
            continue;
        };
        let Some(symbol) = moved.iter().find(|s| s.id == binding.symbol_id) else {
            continue;
        };
        let Some(pin) = symbol.pin(binding.pin_id) else {
            continue;
        };
        let pos = pin_position(symbol, pin);
        if follower.endpoint(is_start) != Some(pos) {
            follower = update_endpoint_position(&follower, is_start, pos, pin.edge);
        }
    }
    follower
}

/// How a dragged end segment treats its endpoint.
enum EndAnchor {
    /// Nothing attached: the endpoint moves with the segment.
    Free,
    /// Bound to a pin that has been validated to slide along its edge.
    Pin,
    /// Touching another wire or pin: the endpoint stays and a jog is added.
    Fixed,
}

/// Validate and apply the pin slide caused by dragging a bound endpoint.
fn relocate_pin(
    binding: PinBinding,
    new_pos: Point,
    objects: &[Shape],
    moved_symbols: &mut Vec<Symbol>,
) -> Result<EndAnchor, ConnectivityError> {
    let symbol = match moved_symbols.iter().find(|s| s.id == binding.symbol_id) {
        Some(s) => s.clone(),
        None => match find_symbol(objects, binding.symbol_id) {
            Some(s) => s.clone(),
            None => return Ok(EndAnchor::Fixed),
        },
    };
    let Some(pin) = symbol.pin(binding.pin_id) else {
        return Ok(EndAnchor::Fixed);
    };
    let (edge, offset) = match symbol.edge_at(new_pos) {
        Some((edge, offset)) if edge == pin.edge => (edge, offset),
        _ => {
            log::debug!("pin {} dragged off its edge; move aborted", pin.id);
            return Err(ConnectivityError::PinOffEdge {
                symbol: symbol.id,
                pin: pin.id,
            });
        }
    };
    if check_pin_collision(&symbol, edge, offset, Some(pin.id)) {
        log::debug!("pin {} would collide on symbol {}; move aborted", pin.id, symbol.id);
        return Err(ConnectivityError::PinCollision {
            symbol: symbol.id,
            pin: pin.id,
        });
    }
    let mut symbol = symbol;
    if let Some(pin) = symbol.pin_mut(binding.pin_id) {
        pin.offset = offset;
    }
    match moved_symbols.iter_mut().find(|s| s.id == symbol.id) {
        Some(slot) => *slot = symbol,
        None => moved_symbols.push(symbol),
    }
    Ok(EndAnchor::Pin)
}

/// Drag one segment of a wire perpendicular to itself by `delta` cells.
///
/// A bound endpoint carried by the drag slides its pin along the symbol
/// edge, and other wires on that pin are rubberbanded. If any pin would leave
/// its edge or land on another pin, the whole move is rejected and nothing is
/// applied.
pub fn drag_segment(
    wire_id: ObjectId,
    segment_index: usize,
    delta: i32,
    objects: &[Shape],
) -> Result<EditPlan, ConnectivityError> {
    let wire = find_wire(objects, wire_id)?;
    let segments = wire.segments();
    let segment = segments
        .get(segment_index)
        .ok_or(ConnectivityError::SegmentOutOfRange {
            index: segment_index,
            count: segments.len(),
        })?;
    let (dx, dy) = if segment.is_horizontal() {
        (0, delta)
    } else if segment.is_vertical() {
        (delta, 0)
    } else {
        return Err(ConnectivityError::DegenerateSegment(segment_index));
    };
    if delta == 0 {
        return Ok(EditPlan::default());
    }

    let pts = &wire.points;
    let last = pts.len() - 1;
    let mut moved_symbols: Vec<Symbol> = Vec::new();
    let mut out = Vec::with_capacity(pts.len() + 2);

    for (i, &p) in pts.iter().enumerate() {
        if i != segment_index && i != segment_index + 1 {
            out.push(p);
            continue;
        }
        let moved = p.offset(dx, dy);
        if i != 0 && i != last {
            out.push(moved);
            continue;
        }
        let is_start = i == 0;
        let anchor = match wire.binding(is_start) {
            Some(binding) => relocate_pin(binding, moved, objects, &mut moved_symbols)?,
            None if is_floating_endpoint(wire, is_start, objects) => EndAnchor::Free,
            None => EndAnchor::Fixed,
        };
        match anchor {
            EndAnchor::Free | EndAnchor::Pin => out.push(moved),
            EndAnchor::Fixed if is_start => out.extend([p, moved]),
            EndAnchor::Fixed => out.extend([moved, p]),
        }
    }

    let mut dragged = wire.clone();
    dragged.points = simplify_points(&out);

    let mut plan = EditPlan::replacing(dragged);
    let followers = rubberband_symbols(&moved_symbols, objects, Some(wire_id));
    plan.replace.extend(followers.into_iter().map(Shape::Wire));
    plan.replace.extend(moved_symbols.into_iter().map(Shape::Symbol));
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::is_orthogonal;
    use crate::shapes::{Rectangle, ShapeTrait};

    fn pts(raw: &[(i32, i32)]) -> Vec<Point> {
        raw.iter().map(|&p| p.into()).collect()
    }

    fn wire(raw: &[(i32, i32)]) -> Wire {
        Wire::new(pts(raw))
    }

    /// Symbol at (10,0), 5 wide x 7 tall, with a left pin in the middle slot.
    fn symbol_with_left_pin() -> (Symbol, PinId) {
        let mut symbol = Symbol::new(Point::new(10, 0), 5, 7);
        let pin = symbol.add_pin(PinEdge::Left, 0.5);
        (symbol, pin)
    }

    #[test]
    fn test_floating_endpoint_classification() {
        let a = wire(&[(0, 0), (10, 0)]);
        let b = wire(&[(5, 0), (5, 5)]);
        let objects = vec![Shape::Wire(a.clone()), Shape::Wire(b.clone())];
        assert!(is_floating_endpoint(&a, true, &objects));
        assert!(is_floating_endpoint(&a, false, &objects));
        // b's start lands in the middle of a.
        assert!(!is_floating_endpoint(&b, true, &objects));
        assert!(is_floating_endpoint(&b, false, &objects));
    }

    #[test]
    fn test_bound_endpoint_is_not_floating() {
        let (symbol, pin) = symbol_with_left_pin();
        let w = wire(&[(0, 3), (4, 3)]).with_bindings(None, Some(PinBinding::new(symbol.id, pin)));
        let objects = vec![Shape::Wire(w.clone())];
        assert!(!is_floating_endpoint(&w, false, &objects));
    }

    #[test]
    fn test_endpoint_on_pin_is_not_floating() {
        let (symbol, _) = symbol_with_left_pin();
        let w = wire(&[(0, 3), (10, 3)]);
        let objects = vec![Shape::Symbol(symbol), Shape::Wire(w.clone())];
        assert!(!is_floating_endpoint(&w, false, &objects));
        assert!(is_floating_endpoint(&w, true, &objects));
    }

    #[test]
    fn test_exit_direction() {
        let w = wire(&[(0, 0), (5, 0), (5, 5)]);
        assert_eq!(get_endpoint_exit_direction(&w, true), Direction::Right);
        assert_eq!(get_endpoint_exit_direction(&w, false), Direction::Up);
        assert_eq!(get_endpoint_exit_direction(&wire(&[(1, 1)]), true), Direction::None);
    }

    #[test]
    fn test_rubberband_adjusts_adjacent_point() {
        let w = wire(&[(0, 0), (5, 0), (5, 5)]);
        let moved = update_endpoint_position(&w, true, Point::new(0, 2), PinEdge::Right);
        assert_eq!(moved.points, pts(&[(0, 2), (5, 2), (5, 5)]));

        let moved = update_endpoint_position(&w, false, Point::new(8, 5), PinEdge::Bottom);
        assert_eq!(moved.points, pts(&[(0, 0), (8, 0), (8, 5)]));
    }

    #[test]
    fn test_rubberband_two_point_staircase() {
        let w = wire(&[(0, 0), (10, 0)]);
        let moved = update_endpoint_position(&w, true, Point::new(0, 4), PinEdge::Right);
        assert_eq!(moved.points, pts(&[(0, 4), (5, 4), (5, 0), (10, 0)]));

        let moved = update_endpoint_position(&w, false, Point::new(10, 6), PinEdge::Left);
        assert_eq!(moved.points, pts(&[(0, 0), (5, 0), (5, 6), (10, 6)]));

        let vertical = wire(&[(0, 0), (0, 10)]);
        let moved = update_endpoint_position(&vertical, false, Point::new(4, 10), PinEdge::Top);
        assert_eq!(moved.points, pts(&[(0, 0), (0, 5), (4, 5), (4, 10)]));
    }

    #[test]
    fn test_rubberband_two_point_axis_aligned() {
        let w = wire(&[(0, 0), (10, 0)]);
        let moved = update_endpoint_position(&w, false, Point::new(12, 0), PinEdge::Left);
        assert_eq!(moved.points, pts(&[(0, 0), (12, 0)]));
    }

    #[test]
    fn test_rubberband_never_diagonal() {
        // First segment vertical although the pin exits horizontally.
        let w = wire(&[(0, 0), (0, 5), (6, 5), (6, 9)]);
        for target in [(3, 2), (-4, 7), (0, 9), (2, 0)] {
            for edge in [PinEdge::Left, PinEdge::Right, PinEdge::Top, PinEdge::Bottom] {
                for is_start in [true, false] {
                    let moved = update_endpoint_position(&w, is_start, target.into(), edge);
                    assert!(is_orthogonal(&moved.points), "{:?}", moved.points);
                    assert_eq!(moved.endpoint(is_start), Some(target.into()));
                }
            }
        }
    }

    #[test]
    fn test_rubberband_onto_other_end_keeps_wire() {
        let w = wire(&[(0, 0), (5, 0), (5, 5)]);
        let moved = update_endpoint_position(&w, true, Point::new(5, 5), PinEdge::Right);
        assert_eq!(moved.points, w.points);

        let short = wire(&[(0, 0), (10, 0)]);
        let moved = update_endpoint_position(&short, false, Point::new(0, 0), PinEdge::Left);
        assert_eq!(moved.points, short.points);
        assert!(moved.points.len() >= 2);
    }

    #[test]
    fn test_merge_wires() {
        let x = PinBinding::new(ObjectId::new_v4(), PinId::new_v4());
        let y = PinBinding::new(ObjectId::new_v4(), PinId::new_v4());
        let a = wire(&[(0, 0), (5, 0)]).with_net("VCC").with_bindings(Some(x), None);
        let b = wire(&[(5, 0), (5, 5)]).with_bindings(None, Some(y));

        let plan = merge_wires(&a, false, &b, true).unwrap();
        assert_eq!(plan.remove, vec![a.id, b.id]);
        let merged: Vec<_> = plan.inserted_wires().collect();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].points, pts(&[(0, 0), (5, 0), (5, 5)]));
        assert_eq!(merged[0].start_binding, Some(x));
        assert_eq!(merged[0].end_binding, Some(y));
        assert_eq!(merged[0].net, "VCC");
    }

    #[test]
    fn test_merge_wires_reversed_operands() {
        let a = wire(&[(5, 0), (0, 0)]);
        let b = wire(&[(5, 5), (5, 0)]).with_net("GND");
        let plan = merge_wires(&a, true, &b, false).unwrap();
        let merged = plan.inserted_wires().next().unwrap();
        assert_eq!(merged.points, pts(&[(0, 0), (5, 0), (5, 5)]));
        assert_eq!(merged.net, "GND");
    }

    #[test]
    fn test_merge_collinear_wires_simplifies() {
        let a = wire(&[(0, 0), (5, 0)]);
        let b = wire(&[(5, 0), (9, 0)]);
        let plan = merge_wires(&a, false, &b, true).unwrap();
        assert_eq!(plan.inserted_wires().next().unwrap().points, pts(&[(0, 0), (9, 0)]));
    }

    #[test]
    fn test_merge_rejects_non_touching_or_bound() {
        let a = wire(&[(0, 0), (5, 0)]);
        let b = wire(&[(6, 0), (9, 0)]);
        assert!(merge_wires(&a, false, &b, true).is_none());
        assert!(merge_wires(&a, false, &a, false).is_none());

        let bound = wire(&[(5, 0), (5, 4)])
            .with_bindings(Some(PinBinding::new(ObjectId::new_v4(), PinId::new_v4())), None);
        assert!(merge_wires(&a, false, &bound, true).is_none());
    }

    #[test]
    fn test_extend_wire_append() {
        let y = PinBinding::new(ObjectId::new_v4(), PinId::new_v4());
        let x = PinBinding::new(ObjectId::new_v4(), PinId::new_v4());
        let w = wire(&[(0, 0), (5, 0)]).with_bindings(Some(x), None);
        let extended = extend_wire(&w, false, &pts(&[(8, 0), (8, 4)]), Some(y));
        assert_eq!(extended.points, pts(&[(0, 0), (8, 0), (8, 4)]));
        assert_eq!(extended.start_binding, Some(x));
        assert_eq!(extended.end_binding, Some(y));
        assert_eq!(extended.id, w.id);
    }

    #[test]
    fn test_extend_wire_prepend() {
        let y = PinBinding::new(ObjectId::new_v4(), PinId::new_v4());
        let w = wire(&[(5, 0), (5, 5)]).with_bindings(None, Some(y));
        let extended = extend_wire(&w, true, &pts(&[(5, 0), (0, 0), (0, -3)]), None);
        assert_eq!(extended.points, pts(&[(0, -3), (0, 0), (5, 0), (5, 5)]));
        assert_eq!(extended.start_binding, None);
        assert_eq!(extended.end_binding, Some(y));
    }

    #[test]
    fn test_extend_wire_repairs_diagonal_join() {
        let w = wire(&[(0, 0), (5, 0)]);
        let extended = extend_wire(&w, false, &pts(&[(9, 3)]), None);
        assert!(is_orthogonal(&extended.points));
        assert_eq!(extended.points, pts(&[(0, 0), (9, 0), (9, 3)]));
    }

    #[test]
    fn test_split_wire() {
        let x = PinBinding::new(ObjectId::new_v4(), PinId::new_v4());
        let y = PinBinding::new(ObjectId::new_v4(), PinId::new_v4());
        let w = wire(&[(0, 0), (6, 0), (6, 6)]).with_net("CLK").with_bindings(Some(x), Some(y));

        let plan = split_wire(&w, Point::new(3, 0)).unwrap();
        assert_eq!(plan.remove, vec![w.id]);
        let parts: Vec<_> = plan.inserted_wires().collect();
        assert_eq!(parts[0].points, pts(&[(0, 0), (3, 0)]));
        assert_eq!(parts[1].points, pts(&[(3, 0), (6, 0), (6, 6)]));
        assert_eq!((parts[0].start_binding, parts[0].end_binding), (Some(x), None));
        assert_eq!((parts[1].start_binding, parts[1].end_binding), (None, Some(y)));
        assert!(parts.iter().all(|p| p.net == "CLK"));
    }

    #[test]
    fn test_split_wire_at_corner_and_rejects() {
        let w = wire(&[(0, 0), (6, 0), (6, 6)]);
        let plan = split_wire(&w, Point::new(6, 0)).unwrap();
        let parts: Vec<_> = plan.inserted_wires().collect();
        assert_eq!(parts[0].points, pts(&[(0, 0), (6, 0)]));
        assert_eq!(parts[1].points, pts(&[(6, 0), (6, 6)]));

        assert!(split_wire(&w, Point::new(0, 0)).is_none());
        assert!(split_wire(&w, Point::new(6, 6)).is_none());
        assert!(split_wire(&w, Point::new(3, 3)).is_none());
    }

    #[test]
    fn test_rubberband_symbol_moves_bound_wires() {
        let (mut symbol, pin) = symbol_with_left_pin();
        let bound =
            wire(&[(0, 3), (10, 3)]).with_bindings(None, Some(PinBinding::new(symbol.id, pin)));
        let unrelated = wire(&[(0, 8), (4, 8)]);
        symbol.position = Point::new(12, 2);
        let objects = vec![
            Shape::Symbol(symbol.clone()),
            Shape::Wire(bound.clone()),
            Shape::Wire(unrelated),
        ];

        let updated = rubberband_symbol(&symbol, &objects);
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].id, bound.id);
        assert_eq!(updated[0].points, pts(&[(0, 3), (6, 3), (6, 5), (12, 5)]));
        assert!(is_orthogonal(&updated[0].points));
    }

    #[test]
    fn test_rubberband_symbol_unchanged_returns_nothing() {
        let (symbol, pin) = symbol_with_left_pin();
        let bound =
            wire(&[(0, 3), (10, 3)]).with_bindings(None, Some(PinBinding::new(symbol.id, pin)));
        let objects = vec![Shape::Symbol(symbol.clone()), Shape::Wire(bound)];
        assert!(rubberband_symbol(&symbol, &objects).is_empty());
    }

    #[test]
    fn test_drag_interior_segment() {
        let w = wire(&[(0, 0), (4, 0), (4, 6), (9, 6)]);
        let objects = vec![Shape::Wire(w.clone())];
        let plan = drag_segment(w.id, 1, 2, &objects).unwrap();
        let dragged = plan.replaced_wires().next().unwrap();
        assert_eq!(dragged.points, pts(&[(0, 0), (6, 0), (6, 6), (9, 6)]));
        assert!(plan.remove.is_empty() && plan.insert.is_empty());
    }

    #[test]
    fn test_drag_floating_end_segment_moves_endpoint() {
        let w = wire(&[(0, 0), (4, 0), (4, 6)]);
        let objects = vec![Shape::Wire(w.clone())];
        let plan = drag_segment(w.id, 0, -2, &objects).unwrap();
        let dragged = plan.replaced_wires().next().unwrap();
        assert_eq!(dragged.points, pts(&[(0, -2), (4, -2), (4, 6)]));
    }

    #[test]
    fn test_drag_connected_end_segment_inserts_jog() {
        let w = wire(&[(0, 0), (4, 0), (4, 6)]);
        let trunk = wire(&[(0, -5), (0, 5)]);
        let objects = vec![Shape::Wire(w.clone()), Shape::Wire(trunk)];
        let plan = drag_segment(w.id, 0, 2, &objects).unwrap();
        let dragged = plan.replaced_wires().next().unwrap();
        assert_eq!(dragged.points, pts(&[(0, 0), (0, 2), (4, 2), (4, 6)]));
    }

    #[test]
    fn test_drag_bound_end_segment_slides_pin() {
        let (symbol, pin) = symbol_with_left_pin();
        let binding = PinBinding::new(symbol.id, pin);
        let w = wire(&[(0, 3), (10, 3)]).with_bindings(None, Some(binding));
        let other = Wire::new(pts(&[(6, 10), (6, 3), (10, 3)])).with_bindings(None, Some(binding));
        let objects = vec![
            Shape::Symbol(symbol.clone()),
            Shape::Wire(w.clone()),
            Shape::Wire(other.clone()),
        ];

        let plan = drag_segment(w.id, 0, -1, &objects).unwrap();
        let dragged = plan.replaced_wires().find(|x| x.id == w.id).unwrap();
        assert_eq!(dragged.points, pts(&[(0, 2), (10, 2)]));

        let moved_symbol = plan.replace.iter().find_map(Shape::as_symbol).unwrap();
        assert_eq!(moved_symbol.pin_position_of(pin), Some(Point::new(10, 2)));

        let follower = plan.replaced_wires().find(|x| x.id == other.id).unwrap();
        assert_eq!(follower.points, pts(&[(6, 10), (6, 2), (10, 2)]));
    }

    #[test]
    fn test_drag_between_two_pins_moves_both_ends_of_followers() {
        let mut left = Symbol::new(Point::new(0, 0), 5, 7);
        let out_pin = left.add_pin(PinEdge::Right, 0.5);
        let mut right = Symbol::new(Point::new(10, 0), 5, 7);
        let in_pin = right.add_pin(PinEdge::Left, 0.5);
        let start = PinBinding::new(left.id, out_pin);
        let end = PinBinding::new(right.id, in_pin);

        let w = wire(&[(4, 3), (10, 3)]).with_bindings(Some(start), Some(end));
        let detour = wire(&[(4, 3), (6, 3), (6, 9), (8, 9), (8, 3), (10, 3)])
            .with_bindings(Some(start), Some(end));
        let objects = vec![
            Shape::Symbol(left.clone()),
            Shape::Symbol(right.clone()),
            Shape::Wire(w.clone()),
            Shape::Wire(detour.clone()),
        ];

        let plan = drag_segment(w.id, 0, -1, &objects).unwrap();
        let dragged = plan.replaced_wires().find(|x| x.id == w.id).unwrap();
        assert_eq!(dragged.points, pts(&[(4, 2), (10, 2)]));

        let followers: Vec<_> = plan.replaced_wires().filter(|x| x.id == detour.id).collect();
        assert_eq!(followers.len(), 1);
        assert_eq!(
            followers[0].points,
            pts(&[(4, 2), (6, 2), (6, 9), (8, 9), (8, 2), (10, 2)])
        );

        let symbols: Vec<_> = plan.replace.iter().filter_map(Shape::as_symbol).collect();
        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[0].id, left.id);
        assert_eq!(symbols[0].pin_position_of(out_pin), followers[0].endpoint(true));
        assert_eq!(symbols[1].pin_position_of(in_pin), followers[0].endpoint(false));
    }

    #[test]
    fn test_drag_pin_collision_aborts() {
        let (mut symbol, pin) = symbol_with_left_pin();
        symbol.add_pin(PinEdge::Left, 0.0);
        let w = wire(&[(0, 3), (10, 3)]).with_bindings(None, Some(PinBinding::new(symbol.id, pin)));
        let objects = vec![Shape::Symbol(symbol.clone()), Shape::Wire(w.clone())];

        let err = drag_segment(w.id, 0, -2, &objects).unwrap_err();
        assert_eq!(err, ConnectivityError::PinCollision { symbol: symbol.id, pin });
    }

    #[test]
    fn test_drag_pin_off_edge_aborts() {
        let (symbol, pin) = symbol_with_left_pin();
        let w = wire(&[(0, 3), (10, 3)]).with_bindings(None, Some(PinBinding::new(symbol.id, pin)));
        let objects = vec![Shape::Symbol(symbol.clone()), Shape::Wire(w.clone())];

        // Row 0 is the corner cell.
        let err = drag_segment(w.id, 0, -3, &objects).unwrap_err();
        assert_eq!(err, ConnectivityError::PinOffEdge { symbol: symbol.id, pin });
    }

    #[test]
    fn test_drag_errors() {
        let w = wire(&[(0, 0), (4, 0)]);
        let b = Rectangle::new(Point::new(0, 0), 3, 3);
        let box_id = b.id();
        let objects = vec![Shape::Wire(w.clone()), Shape::Box(b)];
        assert_eq!(
            drag_segment(w.id, 3, 1, &objects).unwrap_err(),
            ConnectivityError::SegmentOutOfRange { index: 3, count: 1 }
        );
        assert_eq!(
            drag_segment(box_id, 0, 1, &objects).unwrap_err(),
            ConnectivityError::NotAWire(box_id)
        );
        let missing = ObjectId::new_v4();
        assert_eq!(
            drag_segment(missing, 0, 1, &objects).unwrap_err(),
            ConnectivityError::UnknownObject(missing)
        );
        assert!(drag_segment(w.id, 0, 0, &objects).unwrap().is_empty());
    }
}
