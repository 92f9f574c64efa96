//! Import session: the state one import carries through its passes.

use std::collections::VecDeque;

use super::diagnostics::{Diagnostic, ImportReport, Severity, codes};
use super::document::{Document, NodeId};
use super::profile::ProfileIndex;
use super::registry::Registry;
use crate::host::{Canvas, Placement};
use crate::model::{ElementId, ModelStore, push_unique};

/// A deferred unit of work: a document node plus the node it was met under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pending {
    pub node: NodeId,
    pub context: Option<NodeId>,
}

impl Pending {
    pub fn new(node: NodeId, context: Option<NodeId>) -> Self {
        Self { node, context }
    }
}

/// The four deferred queues, drained in declaration order.
#[derive(Debug, Default)]
pub struct Queues {
    /// Type, generalization, association-end and similar references.
    pub cross_refs: VecDeque<Pending>,
    /// Diagrams whose contents still need placing.
    pub diagrams: VecDeque<Pending>,
    /// Relationship entries of the diagram being placed; context is the diagram.
    pub diagram_links: VecDeque<Pending>,
    /// Nested-diagram entries; context is the showing diagram.
    pub diagram_refs: VecDeque<Pending>,
}

impl Queues {
    pub fn is_empty(&self) -> bool {
        self.cross_refs.is_empty()
            && self.diagrams.is_empty()
            && self.diagram_links.is_empty()
            && self.diagram_refs.is_empty()
    }
}

/// Per-import state.
pub struct Session<'d, 's> {
    pub doc: &'d Document,
    pub registry: Registry<'s>,
    pub queues: Queues,
    pub profiles: ProfileIndex,
    diagnostics: Vec<Diagnostic>,
    placements: Vec<Placement>,
}

impl<'d, 's> Session<'d, 's> {
    pub fn new(doc: &'d Document, store: &'s mut dyn ModelStore) -> Self {
        let profiles = ProfileIndex::from_store(&*store);
        Self {
            doc,
            registry: Registry::new(store),
            queues: Queues::default(),
            profiles,
            diagnostics: Vec::new(),
            placements: Vec::new(),
        }
    }

    // ── Diagnostics ──────────────────────────────────────────────────

    /// Record a non-fatal finding.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Info => tracing::debug!(code = diagnostic.code, "{diagnostic}"),
            _ => tracing::warn!(code = diagnostic.code, "{diagnostic}"),
        }
        self.diagnostics.push(diagnostic);
    }

    /// A reference that named nothing registered.
    pub fn unresolved(&mut self, from: Option<&str>, feature: &str, target: &str) {
        self.report(
            Diagnostic::warning(
                codes::UNRESOLVED_REFERENCE,
                format!("{feature} reference to '{target}' does not resolve"),
            )
            .with_element_opt(from.map(ElementId::from)),
        );
    }

    /// A node whose kind is not handled where it was found.
    pub fn unhandled(&mut self, node: NodeId) {
        let doc = self.doc;
        let n = doc.node(node);
        match n.xmi_id() {
            Some(id) => {
                let what = n.xmi_type().unwrap_or(&n.name);
                self.report(
                    Diagnostic::warning(
                        codes::UNHANDLED_ELEMENT_KIND,
                        format!("skipped {what} in <{}>", n.name),
                    )
                    .with_element(id),
                );
            }
            None => tracing::debug!(tag = %n.name, "skipping leaf"),
        }
    }

    #[cfg(test)]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    // ── Placement ────────────────────────────────────────────────────

    /// Buffer a placement of `element` on `diagram`.
    ///
    /// The diagram records what it shows, so a pair placed by an earlier
    /// import into the same store is not placed again.
    pub fn place(&mut self, diagram: &ElementId, element: &ElementId) {
        let added = self
            .registry
            .update(diagram, |el| {
                el.as_diagram_mut()
                    .map(|d| push_unique(&mut d.shown, element.clone()))
            })
            .flatten()
            .unwrap_or(false);
        if added {
            tracing::trace!(%diagram, %element, "place");
            self.placements.push(Placement::origin(diagram.clone(), element.clone()));
        }
    }

    #[cfg(test)]
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Hand buffered placements to the canvas and build the report.
    pub fn finish(self, canvas: &mut dyn Canvas) -> ImportReport {
        for p in &self.placements {
            canvas.place(&p.element, &p.diagram, p.x, p.y);
        }
        ImportReport {
            created: self.registry.created(),
            placements: self.placements.len(),
            diagnostics: self.diagnostics,
        }
    }
}
