//! Polyline geometry on the integer grid.
//!
//! Every function here is total: malformed input (fewer than two points,
//! diagonal segments) yields an empty or `None` result instead of panicking,
//! because a single bad primitive must not stop work on the rest of a page.

use crate::shapes::{Direction, LineStyle, Point};

/// One straight piece of a polyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn is_horizontal(&self) -> bool {
        self.start.y == self.end.y && self.start.x != self.end.x
    }

    pub fn is_vertical(&self) -> bool {
        self.start.x == self.end.x && self.start.y != self.end.y
    }

    pub fn contains(&self, p: Point) -> bool {
        point_on_segment(p, self.start, self.end)
    }

    /// Box-drawing glyph for the run, `None` for a diagonal or zero-length
    /// segment.
    pub fn glyph(&self, style: LineStyle) -> Option<char> {
        if self.is_horizontal() {
            Some(style.horizontal_glyph())
        } else if self.is_vertical() {
            Some(style.vertical_glyph())
        } else {
            None
        }
    }
}

/// Visual corner a bend occupies in its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CornerRole {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Consecutive point pairs of a polyline.
pub fn get_segments(points: &[Point]) -> Vec<Segment> {
    points
        .windows(2)
        .map(|w| Segment::new(w[0], w[1]))
        .collect()
}

/// Whether `p` lies on the orthogonal segment `a`-`b`, endpoints included.
///
/// Diagonal segments never match.
pub fn point_on_segment(p: Point, a: Point, b: Point) -> bool {
    if a.x == b.x {
        p.x == a.x && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
    } else if a.y == b.y {
        p.y == a.y && p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x)
    } else {
        false
    }
}

fn collinear(a: Point, b: Point, c: Point) -> bool {
    (a.x == b.x && b.x == c.x) || (a.y == b.y && b.y == c.y)
}

/// Drop consecutive duplicates and interior points that are not true corners.
///
/// First and last points are always kept. Idempotent.
pub fn simplify_points(points: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if out.last() == Some(&p) {
            continue;
        }
        while out.len() >= 2 && collinear(out[out.len() - 2], out[out.len() - 1], p) {
            out.pop();
        }
        if out.last() == Some(&p) {
            continue;
        }
        out.push(p);
    }
    out
}

/// Orthogonal path from `anchor` to `cursor` with at most one bend.
pub fn get_preview_path(anchor: Point, cursor: Point, horizontal_first: bool) -> Vec<Point> {
    if anchor.x == cursor.x || anchor.y == cursor.y {
        return vec![anchor, cursor];
    }
    let bend = if horizontal_first {
        Point::new(cursor.x, anchor.y)
    } else {
        Point::new(anchor.x, cursor.y)
    };
    vec![anchor, bend, cursor]
}

/// Direction of travel from `a` to `b`; `None` for equal or diagonal pairs.
pub fn direction_between(a: Point, b: Point) -> Direction {
    match (b.x - a.x, b.y - a.y) {
        (dx, 0) if dx > 0 => Direction::Right,
        (dx, 0) if dx < 0 => Direction::Left,
        (0, dy) if dy > 0 => Direction::Down,
        (0, dy) if dy < 0 => Direction::Up,
        _ => Direction::None,
    }
}

/// Corner role for a bend entered travelling `incoming` and left travelling
/// `outgoing`. Straight runs and reversals have no corner.
pub fn corner_role(incoming: Direction, outgoing: Direction) -> Option<CornerRole> {
    use Direction as D;
    match (incoming, outgoing) {
        (D::Right, D::Down) | (D::Up, D::Left) => Some(CornerRole::TopRight),
        (D::Right, D::Up) | (D::Down, D::Left) => Some(CornerRole::BottomRight),
        (D::Left, D::Down) | (D::Up, D::Right) => Some(CornerRole::TopLeft),
        (D::Left, D::Up) | (D::Down, D::Right) => Some(CornerRole::BottomLeft),
        _ => None,
    }
}

/// Box-drawing glyph for a bend in the given style.
pub fn corner_char(incoming: Direction, outgoing: Direction, style: LineStyle) -> Option<char> {
    corner_role(incoming, outgoing).map(|role| style.corner_glyph(role))
}

/// Crossing point of one horizontal and one vertical segment.
///
/// Parallel, degenerate or non-overlapping segments give `None`.
pub fn segment_intersection(a1: Point, a2: Point, b1: Point, b2: Point) -> Option<Point> {
    let a = Segment::new(a1, a2);
    let b = Segment::new(b1, b2);
    let (h, v) = if a.is_horizontal() && b.is_vertical() {
        (a, b)
    } else if a.is_vertical() && b.is_horizontal() {
        (b, a)
    } else {
        return None;
    };
    let x = v.start.x;
    let y = h.start.y;
    let within_h = x >= h.start.x.min(h.end.x) && x <= h.start.x.max(h.end.x);
    let within_v = y >= v.start.y.min(v.end.y) && y <= v.start.y.max(v.end.y);
    (within_h && within_v).then_some(Point::new(x, y))
}

/// Join two polylines sharing exactly one endpoint into one, shared point
/// interior. `None` when no endpoint, or more than one pair, is shared.
pub fn merge_lines(line1: &[Point], line2: &[Point]) -> Option<Vec<Point>> {
    let (&s1, &e1) = (line1.first()?, line1.last()?);
    let (&s2, &e2) = (line2.first()?, line2.last()?);
    if line1.len() < 2 || line2.len() < 2 {
        return None;
    }

    let shared = [e1 == s2, e1 == e2, s1 == s2, s1 == e2];
    if shared.iter().filter(|&&m| m).count() != 1 {
        return None;
    }

    let (mut head, mut tail) = (line1.to_vec(), line2.to_vec());
    match shared {
        [true, ..] => {}
        [_, true, ..] => tail.reverse(),
        [_, _, true, _] => head.reverse(),
        _ => std::mem::swap(&mut head, &mut tail),
    }
    head.extend_from_slice(&tail[1..]);
    Some(simplify_points(&head))
}

/// Whether every segment is horizontal or vertical.
pub fn is_orthogonal(points: &[Point]) -> bool {
    points.windows(2).all(|w| w[0].x == w[1].x || w[0].y == w[1].y)
}

/// Replace each diagonal step with a single right-angle bend, then simplify.
pub fn orthogonalize(points: &[Point], horizontal_first: bool) -> Vec<Point> {
    let mut out = Vec::with_capacity(points.len() * 2);
    for (i, &p) in points.iter().enumerate() {
        if i > 0 {
            let prev = points[i - 1];
            if prev.x != p.x && prev.y != p.y {
                out.push(get_preview_path(prev, p, horizontal_first)[1]);
            }
        }
        out.push(p);
    }
    simplify_points(&out)
}
