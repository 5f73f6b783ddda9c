use std::collections::BTreeMap;

use crate::config::Color;
use crate::geometry::{Point, Rect};

// ============================================================================
// RETAINED MODE PRIMITIVES
// ============================================================================

/// Handle to a primitive living on a [`Surface`].
///
/// Ids grow monotonically and are never reused by the same surface, so
/// ordering by id is drawing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrimitiveId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
}

/// On/off run lengths in pixels for dashed lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dash {
    pub on: f64,
    pub off: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Line {
        from: Point,
        to: Point,
        width: f32,
        cap: LineCap,
        dash: Option<Dash>,
        color: Color,
    },
    Oval {
        bounds: Rect,
        fill: Option<Color>,
        outline: Option<Stroke>,
    },
    Rectangle {
        bounds: Rect,
        fill: Option<Color>,
        outline: Option<Stroke>,
    },
    Polygon {
        points: Vec<Point>,
        fill: Color,
    },
    Text {
        at: Point,
        text: String,
        size: f32,
        color: Color,
    },
}

// ============================================================================
// SURFACE
// ============================================================================

/// A drawing surface whose primitives can be removed one by one.
pub trait Surface {
    fn add(&mut self, primitive: Primitive) -> PrimitiveId;

    /// Returns false if `id` is not on the surface.
    fn remove(&mut self, id: PrimitiveId) -> bool;

    /// Removes every primitive.
    fn clear(&mut self);

    fn set_background(&mut self, color: Color);

    fn line(&mut self, from: Point, to: Point, width: f32, cap: LineCap, color: Color) -> PrimitiveId {
        self.add(Primitive::Line {
            from,
            to,
            width,
            cap,
            dash: None,
            color,
        })
    }

    fn dashed_line(&mut self, from: Point, to: Point, width: f32, dash: Dash, color: Color) -> PrimitiveId {
        self.add(Primitive::Line {
            from,
            to,
            width,
            cap: LineCap::Butt,
            dash: Some(dash),
            color,
        })
    }

    fn oval(&mut self, bounds: Rect, fill: Option<Color>, outline: Option<Stroke>) -> PrimitiveId {
        self.add(Primitive::Oval {
            bounds,
            fill,
            outline,
        })
    }

    fn rectangle(&mut self, bounds: Rect, fill: Option<Color>, outline: Option<Stroke>) -> PrimitiveId {
        self.add(Primitive::Rectangle {
            bounds,
            fill,
            outline,
        })
    }

    fn polygon(&mut self, points: Vec<Point>, fill: Color) -> PrimitiveId {
        self.add(Primitive::Polygon { points, fill })
    }

    fn text(&mut self, at: Point, text: String, size: f32, color: Color) -> PrimitiveId {
        self.add(Primitive::Text {
            at,
            text,
            size,
            color,
        })
    }
}

/// In-memory display list backing the window.
///
/// The host rasterizes it whenever [`Scene::take_dirty`] reports a change.
#[derive(Debug, Clone)]
pub struct Scene {
    background: Color,
    primitives: BTreeMap<PrimitiveId, Primitive>,
    next_id: u64,
    dirty: bool,
}

impl Scene {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            primitives: BTreeMap::new(),
            next_id: 0,
            dirty: true,
        }
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn contains(&self, id: PrimitiveId) -> bool {
        self.primitives.contains_key(&id)
    }

    pub fn get(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.get(&id)
    }

    /// Primitives in drawing order.
    pub fn iter(&self) -> impl Iterator<Item = (PrimitiveId, &Primitive)> {
        self.primitives.iter().map(|(id, p)| (*id, p))
    }

    /// Returns whether the scene changed since the last call, and resets it.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Color::BLACK)
    }
}

impl Surface for Scene {
    fn add(&mut self, primitive: Primitive) -> PrimitiveId {
        let id = PrimitiveId(self.next_id);
        self.next_id += 1;
        self.primitives.insert(id, primitive);
        self.dirty = true;
        id
    }

    fn remove(&mut self, id: PrimitiveId) -> bool {
        let removed = self.primitives.remove(&id).is_some();
        self.dirty |= removed;
        removed
    }

    fn clear(&mut self) {
        self.primitives.clear();
        self.dirty = true;
    }

    fn set_background(&mut self, color: Color) {
        self.background = color;
        self.dirty = true;
    }
}
