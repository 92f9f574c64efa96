//! Diagram canvas.
//!
//! The importer hands placements to whatever implements [`Canvas`]. It does
//! no layout of its own: every element goes to the origin and the host is
//! expected to arrange them.

use crate::model::ElementId;

/// One element placed on one diagram.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    pub diagram: ElementId,
    pub element: ElementId,
    pub x: f64,
    pub y: f64,
}

impl Placement {
    /// A placement at `(0, 0)`.
    pub fn origin(diagram: ElementId, element: ElementId) -> Self {
        Self {
            diagram,
            element,
            x: 0.0,
            y: 0.0,
        }
    }
}

/// Host-provided diagram surface.
pub trait Canvas {
    /// Draw `element` on `diagram` at `(x, y)`.
    fn place(&mut self, element: &ElementId, diagram: &ElementId, x: f64, y: f64);
}

/// A canvas that only remembers what it was asked to draw.
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    placements: Vec<Placement>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every placement, in the order received.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Elements placed on `diagram`, in order.
    pub fn on(&self, diagram: &ElementId) -> Vec<&ElementId> {
        self.placements
            .iter()
            .filter(|p| &p.diagram == diagram)
            .map(|p| &p.element)
            .collect()
    }

    /// Position of `element` in the placement order of `diagram`.
    pub fn position_of(&self, diagram: &ElementId, element: &ElementId) -> Option<usize> {
        self.on(diagram).iter().position(|e| *e == element)
    }

    pub fn clear(&mut self) {
        self.placements.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn place(&mut self, element: &ElementId, diagram: &ElementId, x: f64, y: f64) {
        self.placements.push(Placement {
            diagram: diagram.clone(),
            element: element.clone(),
            x,
            y,
        });
    }
}
