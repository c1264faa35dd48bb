//! Page document: the owned primitive list and its latest derived state.

use crate::connectivity::{EditPlan, rubberband_symbol};
use crate::derived::{self, DerivedObject, DerivedState, RenderEntry};
use crate::shapes::{Bounds, ObjectId, Shape, ShapeTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A page of a diagram.
///
/// Only primitives are persisted; derived objects are recomputed after every
/// committed change and after loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Unique page identifier.
    pub id: String,
    /// Page name.
    pub name: String,
    /// Primitives in insertion order.
    objects: Vec<Shape>,
    /// Output of the most recent recompute.
    #[serde(skip)]
    derived: DerivedState,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    /// Create a new empty page.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled".to_string(),
            objects: Vec::new(),
            derived: DerivedState::default(),
        }
    }

    /// Primitives in insertion order.
    pub fn objects(&self) -> &[Shape] {
        &self.objects
    }

    /// Add a primitive and recompute.
    pub fn add(&mut self, shape: Shape) {
        self.objects.push(shape);
        self.commit();
    }

    /// Remove a primitive and recompute.
    pub fn remove(&mut self, id: ObjectId) -> Option<Shape> {
        let index = self.objects.iter().position(|s| s.id() == id)?;
        let removed = self.objects.remove(index);
        self.commit();
        Some(removed)
    }

    /// Get a primitive by ID.
    pub fn get(&self, id: ObjectId) -> Option<&Shape> {
        self.objects.iter().find(|s| s.id() == id)
    }

    /// Mutable access for an edit in progress. Call [`Page::commit`] when the
    /// edit is done; until then the derived state may be stale.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Shape> {
        self.objects.iter_mut().find(|s| s.id() == id)
    }

    /// Re-run the derived-state computation over the whole page.
    pub fn commit(&mut self) {
        self.derived = derived::compute(&self.objects);
    }

    /// Apply an edit plan as one unit, then recompute.
    ///
    /// Replacements keep their position in the list; insertions go on top.
    pub fn apply(&mut self, plan: EditPlan) {
        let EditPlan {
            remove,
            replace,
            insert,
        } = plan;
        self.objects.retain(|s| !remove.contains(&s.id()));
        for shape in replace {
            match self.objects.iter_mut().find(|s| s.id() == shape.id()) {
                Some(slot) => *slot = shape,
                None => self.objects.push(shape),
            }
        }
        self.objects.extend(insert);
        self.commit();
    }

    /// Move a symbol and drag every wire bound to it along.
    ///
    /// Returns false if `id` is not a symbol on this page.
    pub fn move_symbol(&mut self, id: ObjectId, dx: i32, dy: i32) -> bool {
        let Some(Shape::Symbol(symbol)) = self.get(id) else {
            return false;
        };
        let mut symbol = symbol.clone();
        symbol.translate(dx, dy);
        let followers = rubberband_symbol(&symbol, &self.objects);

        let mut plan = EditPlan::default();
        plan.replace.push(Shape::Symbol(symbol));
        plan.replace.extend(followers.into_iter().map(Shape::Wire));
        self.apply(plan);
        true
    }

    /// Derived objects from the last commit.
    pub fn derived(&self) -> &[DerivedObject] {
        &self.derived.derived
    }

    /// Back-to-front render order from the last commit.
    pub fn render_list(&self) -> &[RenderEntry] {
        &self.derived.render_list
    }

    /// Full output of the last commit.
    pub fn derived_state(&self) -> &DerivedState {
        &self.derived
    }

    /// Get the bounding box of all primitives.
    pub fn bounds(&self) -> Option<Bounds> {
        self.objects
            .iter()
            .map(Shape::bounds)
            .reduce(Bounds::union)
    }

    /// Check if the page is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Get the number of primitives.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Serialize the page to JSON. Derived objects are not included.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a page from JSON and recompute its derived state.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut page: Page = serde_json::from_str(json)?;
        page.commit();
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::{drag_segment, merge_wires};
    use crate::geometry::is_orthogonal;
    use crate::shapes::{PinBinding, PinEdge, Point, Symbol, Wire};

    fn pts(raw: &[(i32, i32)]) -> Vec<Point> {
        raw.iter().map(|&p| p.into()).collect()
    }

    #[test]
    fn test_add_recomputes() {
        let mut page = Page::new();
        page.add(Shape::Wire(Wire::new(pts(&[(0, 0), (10, 0)]))));
        assert_eq!(page.derived_state().no_connects().count(), 2);
        page.add(Shape::Wire(Wire::new(pts(&[(10, 0), (10, 5)]))));
        assert_eq!(page.derived_state().no_connects().count(), 2);
        assert_eq!(page.render_list().len(), 4);
    }

    #[test]
    fn test_remove_recomputes() {
        let mut page = Page::new();
        let a = Wire::new(pts(&[(0, 5), (10, 5)]));
        let b = Wire::new(pts(&[(5, 0), (5, 5)]));
        let b_id = b.id();
        page.add(Shape::Wire(a));
        page.add(Shape::Wire(b));
        assert_eq!(page.derived_state().wire_junctions().count(), 1);
        assert!(page.remove(b_id).is_some());
        assert_eq!(page.derived_state().wire_junctions().count(), 0);
        assert!(page.remove(b_id).is_none());
    }

    #[test]
    fn test_apply_merge_plan() {
        let mut page = Page::new();
        let a = Wire::new(pts(&[(0, 0), (5, 0)])).with_net("VCC");
        let b = Wire::new(pts(&[(5, 0), (5, 5)]));
        page.add(Shape::Wire(a.clone()));
        page.add(Shape::Wire(b.clone()));

        let plan = merge_wires(&a, false, &b, true).unwrap();
        page.apply(plan);
        assert_eq!(page.len(), 1);
        let merged = page.objects()[0].as_wire().unwrap();
        assert_eq!(merged.points, pts(&[(0, 0), (5, 0), (5, 5)]));
        assert_eq!(page.derived_state().no_connects().count(), 2);
    }

    #[test]
    fn test_apply_keeps_replaced_position() {
        let mut page = Page::new();
        let a = Wire::new(pts(&[(0, 0), (4, 0), (4, 4)]));
        let b = Wire::new(pts(&[(20, 0), (24, 0)]));
        page.add(Shape::Wire(a.clone()));
        page.add(Shape::Wire(b));

        let plan = drag_segment(a.id(), 1, 3, page.objects()).unwrap();
        page.apply(plan);
        assert_eq!(page.objects()[0].id(), a.id());
        assert_eq!(page.objects()[0].as_wire().unwrap().points, pts(&[(0, 0), (7, 0), (7, 4)]));
    }

    #[test]
    fn test_move_symbol_rubberbands_wires() {
        let mut symbol = Symbol::new(Point::new(10, 0), 5, 7);
        let pin = symbol.add_pin(PinEdge::Left, 0.5);
        let symbol_id = symbol.id();
        let w = Wire::new(pts(&[(0, 3), (10, 3)]))
            .with_bindings(None, Some(PinBinding::new(symbol_id, pin)));
        let wire_id = w.id();

        let mut page = Page::new();
        page.add(Shape::Symbol(symbol));
        page.add(Shape::Wire(w));
        assert_eq!(page.derived_state().no_connects().count(), 1);

        assert!(page.move_symbol(symbol_id, 4, 2));
        let moved = page.get(wire_id).and_then(Shape::as_wire).unwrap();
        assert_eq!(moved.endpoint(false), Some(Point::new(14, 5)));
        assert!(is_orthogonal(&moved.points));
        assert_eq!(page.derived_state().no_connects().count(), 1);

        assert!(!page.move_symbol(wire_id, 1, 1));
    }

    #[test]
    fn test_json_round_trip_excludes_derived() {
        let mut page = Page::new();
        page.add(Shape::Wire(Wire::new(pts(&[(0, 0), (10, 0)])).with_net("GND")));
        let json = page.to_json().unwrap();
        assert!(!json.contains("derived"));
        assert!(!json.contains("noConnect"));

        let loaded = Page::from_json(&json).unwrap();
        assert_eq!(loaded.id, page.id);
        assert_eq!(loaded.objects(), page.objects());
        assert_eq!(loaded.derived(), page.derived());
    }

    #[test]
    fn test_bounds() {
        let mut page = Page::new();
        assert!(page.bounds().is_none());
        page.add(Shape::Wire(Wire::new(pts(&[(2, 3), (8, 3)]))));
        page.add(Shape::Wire(Wire::new(pts(&[(-1, 9), (4, 9)]))));
        let bounds = page.bounds().unwrap();
        assert_eq!(bounds.min, Point::new(-1, 3));
        assert_eq!(bounds.max, Point::new(8, 9));
    }
}
