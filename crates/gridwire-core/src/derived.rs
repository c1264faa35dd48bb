//! Derived state: junctions, no-connect markers and render order.
//!
//! [`compute`] is a pure function of the primitive list. It is re-run in full
//! after every committed edit and keeps nothing between calls.
//!
//! Junction policy, applied alike to lines and to wires:
//! - two primitives meeting only at their respective endpoints are a merge
//!   candidate, not a junction;
//! - a vertex of one primitive landing on another primitive's interior
//!   (a T-junction, or an endpoint on a corner) is a junction;
//! - segments crossing without a shared vertex are not connected.

use crate::geometry::get_segments;
use crate::shapes::{LineStyle, ObjectId, ObjectKind, Point, Shape};
use std::collections::{HashMap, HashSet};

/// Visual junction between lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Junction {
    pub point: Point,
    /// Contributing line ids, in collection order.
    pub lines: Vec<ObjectId>,
    pub style: LineStyle,
}

impl Junction {
    /// Box-drawing glyph for the junction cell.
    pub fn glyph(&self) -> char {
        self.style.junction_glyph()
    }
}

/// Electrical junction between wires.
#[derive(Debug, Clone, PartialEq)]
pub struct WireJunction {
    pub point: Point,
    /// Contributing wire ids, in collection order.
    pub wires: Vec<ObjectId>,
    pub style: LineStyle,
    /// First non-empty net among the contributors.
    pub net: String,
}

/// Which end of a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Start,
    End,
}

/// Marker on a wire end that is neither bound nor shared.
#[derive(Debug, Clone, PartialEq)]
pub struct WireNoConnect {
    pub point: Point,
    pub wire_id: ObjectId,
    pub endpoint: Endpoint,
}

/// Objects computed from primitives. Never persisted, never selectable.
#[derive(Debug, Clone, PartialEq)]
pub enum DerivedObject {
    Junction(Junction),
    WireJunction(WireJunction),
    WireNoConnect(WireNoConnect),
}

impl DerivedObject {
    pub fn point(&self) -> Point {
        match self {
            DerivedObject::Junction(j) => j.point,
            DerivedObject::WireJunction(j) => j.point,
            DerivedObject::WireNoConnect(n) => n.point,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            DerivedObject::Junction(_) => ObjectKind::Junction,
            DerivedObject::WireJunction(_) => ObjectKind::WireJunction,
            DerivedObject::WireNoConnect(_) => ObjectKind::WireNoConnect,
        }
    }

    pub fn is_selectable(&self) -> bool {
        false
    }
}

/// What a render list entry draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTarget {
    /// A primitive, by id.
    Primitive(ObjectId),
    /// Index into [`DerivedState::derived`].
    Derived(usize),
}

/// One entry of the back-to-front render list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderEntry {
    pub kind: ObjectKind,
    pub z_index: i32,
    pub target: RenderTarget,
}

/// Output of one [`compute`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedState {
    pub derived: Vec<DerivedObject>,
    pub render_list: Vec<RenderEntry>,
}

impl DerivedState {
    pub fn junctions(&self) -> impl Iterator<Item = &Junction> {
        self.derived.iter().filter_map(|d| match d {
            DerivedObject::Junction(j) => Some(j),
            _ => None,
        })
    }

    pub fn wire_junctions(&self) -> impl Iterator<Item = &WireJunction> {
        self.derived.iter().filter_map(|d| match d {
            DerivedObject::WireJunction(j) => Some(j),
            _ => None,
        })
    }

    pub fn no_connects(&self) -> impl Iterator<Item = &WireNoConnect> {
        self.derived.iter().filter_map(|d| match d {
            DerivedObject::WireNoConnect(n) => Some(n),
            _ => None,
        })
    }
}

/// A polyline taking part in junction inference.
struct Contributor<'a> {
    id: ObjectId,
    points: &'a [Point],
    style: LineStyle,
    net: &'a str,
}

/// Contributors meeting at one point, indices in collection order.
struct JunctionSite {
    point: Point,
    members: Vec<usize>,
}

fn infer_junctions(contributors: &[Contributor]) -> Vec<JunctionSite> {
    let mut groups: Vec<(Point, Vec<(usize, bool)>)> = Vec::new();
    let mut by_point: HashMap<Point, usize> = HashMap::new();
    let mut record = |point: Point, member: usize, at_endpoint: bool| {
        let slot = *by_point.entry(point).or_insert_with(|| {
            groups.push((point, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push((member, at_endpoint));
    };

    // Every vertex, tagged with whether it is one of the two ends.
    for (ci, c) in contributors.iter().enumerate() {
        let last = c.points.len() - 1;
        for (i, &p) in c.points.iter().enumerate() {
            record(p, ci, i == 0 || i == last);
        }
    }

    // Vertices of other primitives landing inside a segment.
    for (ai, a) in contributors.iter().enumerate() {
        for seg in get_segments(a.points) {
            for (bi, b) in contributors.iter().enumerate() {
                if bi == ai {
                    continue;
                }
                for &v in b.points {
                    if v != seg.start && v != seg.end && seg.contains(v) {
                        record(v, ai, false);
                    }
                }
            }
        }
    }

    groups
        .into_iter()
        .filter_map(|(point, touches)| {
            let mut members: Vec<usize> = Vec::new();
            for &(member, _) in &touches {
                if !members.contains(&member) {
                    members.push(member);
                }
            }
            let interior = touches.iter().any(|&(_, at_endpoint)| !at_endpoint);
            (members.len() >= 2 && interior).then_some(JunctionSite { point, members })
        })
        .collect()
}

/// Drop primitives too short to form a segment.
fn well_formed<'a>(contributors: Vec<Contributor<'a>>) -> Vec<Contributor<'a>> {
    contributors
        .into_iter()
        .filter(|c| {
            let ok = c.points.len() >= 2;
            if !ok {
                log::warn!("skipping primitive {} with {} point(s)", c.id, c.points.len());
            }
            ok
        })
        .collect()
}

fn line_junctions(objects: &[Shape]) -> Vec<Junction> {
    let contributors = well_formed(
        objects
            .iter()
            .filter_map(|s| match s {
                Shape::Line(l) => Some(Contributor {
                    id: l.id,
                    points: &l.points,
                    style: l.style,
                    net: "",
                }),
                _ => None,
            })
            .collect(),
    );
    infer_junctions(&contributors)
        .into_iter()
        .map(|site| Junction {
            point: site.point,
            lines: site.members.iter().map(|&m| contributors[m].id).collect(),
            style: LineStyle::consolidate(site.members.iter().map(|&m| contributors[m].style)),
        })
        .collect()
}

fn wire_contributors(objects: &[Shape]) -> Vec<Contributor<'_>> {
    well_formed(
        objects
            .iter()
            .filter_map(Shape::as_wire)
            .map(|w| Contributor {
                id: w.id,
                points: &w.points,
                style: w.style,
                net: &w.net,
            })
            .collect(),
    )
}

fn wire_junctions(contributors: &[Contributor]) -> Vec<WireJunction> {
    infer_junctions(contributors)
        .into_iter()
        .map(|site| WireJunction {
            point: site.point,
            wires: site.members.iter().map(|&m| contributors[m].id).collect(),
            style: LineStyle::consolidate(site.members.iter().map(|&m| contributors[m].style)),
            net: site
                .members
                .iter()
                .map(|&m| contributors[m].net)
                .find(|net| !net.is_empty())
                .unwrap_or_default()
                .to_string(),
        })
        .collect()
}

fn wire_no_connects(objects: &[Shape], junctions: &[WireJunction]) -> Vec<WireNoConnect> {
    let wires: Vec<_> = objects
        .iter()
        .filter_map(Shape::as_wire)
        .filter(|w| w.points.len() >= 2)
        .collect();
    let junction_points: HashSet<Point> = junctions.iter().map(|j| j.point).collect();

    let mut sharing: HashMap<Point, usize> = HashMap::new();
    for wire in &wires {
        for is_start in [true, false] {
            if let Some(p) = wire.endpoint(is_start) {
                *sharing.entry(p).or_default() += 1;
            }
        }
    }

    let mut markers = Vec::new();
    for wire in &wires {
        for (is_start, endpoint) in [(true, Endpoint::Start), (false, Endpoint::End)] {
            if wire.binding(is_start).is_some() {
                continue;
            }
            let Some(p) = wire.endpoint(is_start) else {
                continue;
            };
            if !junction_points.contains(&p) && sharing.get(&p) == Some(&1) {
                markers.push(WireNoConnect {
                    point: p,
                    wire_id: wire.id,
                    endpoint,
                });
            }
        }
    }
    markers
}

/// Render tier: lines, line junctions, wires, wire junctions, no-connects,
/// then boxes, symbols and text sharing the top tier.
fn render_tier(kind: ObjectKind) -> u8 {
    match kind {
        ObjectKind::Line => 0,
        ObjectKind::Junction => 1,
        ObjectKind::Wire => 2,
        ObjectKind::WireJunction => 3,
        ObjectKind::WireNoConnect => 4,
        ObjectKind::Box | ObjectKind::Symbol | ObjectKind::Text => 5,
    }
}

/// Tie-break inside the top tier when z-indices are equal.
fn tier_rank(kind: ObjectKind) -> u8 {
    match kind {
        ObjectKind::Symbol => 1,
        ObjectKind::Text => 2,
        _ => 0,
    }
}

fn build_render_list(objects: &[Shape], derived: &[DerivedObject]) -> Vec<RenderEntry> {
    let mut entries: Vec<RenderEntry> = objects
        .iter()
        .map(|s| RenderEntry {
            kind: s.kind(),
            z_index: s.z_index(),
            target: RenderTarget::Primitive(s.id()),
        })
        .chain(derived.iter().enumerate().map(|(i, d)| RenderEntry {
            kind: d.kind(),
            z_index: 0,
            target: RenderTarget::Derived(i),
        }))
        .collect();
    entries.sort_by_key(|e| (render_tier(e.kind), e.z_index, tier_rank(e.kind)));
    entries
}

/// Compute every derived object and the render order for a primitive list.
pub fn compute(objects: &[Shape]) -> DerivedState {
    let mut derived: Vec<DerivedObject> = line_junctions(objects)
        .into_iter()
        .map(DerivedObject::Junction)
        .collect();

    let wire_junctions = wire_junctions(&wire_contributors(objects));
    let no_connects = wire_no_connects(objects, &wire_junctions);
    log::debug!(
        "derived state: {} primitives, {} line junctions, {} wire junctions, {} no-connects",
        objects.len(),
        derived.len(),
        wire_junctions.len(),
        no_connects.len()
    );
    derived.extend(wire_junctions.into_iter().map(DerivedObject::WireJunction));
    derived.extend(no_connects.into_iter().map(DerivedObject::WireNoConnect));

    let render_list = build_render_list(objects, &derived);
    DerivedState {
        derived,
        render_list,
    }
}
