//! Gridwire Core Library
//!
//! Connectivity engine for orthogonal line and wire diagrams drawn on a
//! character grid: line geometry, wire editing, symbol pins, and the derived
//! junction and no-connect markers recomputed after every change.

pub mod connectivity;
pub mod derived;
pub mod geometry;
pub mod page;
pub mod shapes;

pub use connectivity::{ConnectivityError, EditPlan};
pub use derived::{DerivedObject, DerivedState, RenderEntry, RenderTarget, compute};
pub use page::Page;
pub use shapes::{
    Direction, Line, LineStyle, ObjectId, ObjectKind, PinBinding, PinEdge, PinId, Point,
    Rectangle, Shape, ShapeTrait, Symbol, Text, Wire,
};
