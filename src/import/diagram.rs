//! Diagram, diagram-link and diagram-reference queues.
//!
//! A diagram's representation block lists the elements it shows in order:
//!
//! ```xml
//! <packagedElement xmi:type="uml:Diagram" xmi:id="d1" name="Overview">
//!   <xmi:Extension>
//!     <diagramRepresentation>
//!       <diagram:DiagramRepresentationObject type="Class Diagram">
//!         <usedObjects href="#c1"/>
//!         <usedObjects href="#assoc1"/>
//!       </diagram:DiagramRepresentationObject>
//!     </diagramRepresentation>
//!   </xmi:Extension>
//! </packagedElement>
//! ```
//!
//! Nodes are placed as they are listed. Relationships wait in the link queue
//! until the diagram's nodes are down, so their ends exist on the canvas.
//! Nested diagrams wait in the reference queue until every diagram is done.

use super::diagnostics::{Diagnostic, codes};
use super::error::ImportResult;
use super::session::{Pending, Session};
use super::document::{NodeId, Reference};
use crate::model::{ElementId, ElementKind, push_unique};

/// Drain the diagram queue; each diagram's links are drained right after it.
pub fn drain_diagrams(s: &mut Session<'_, '_>) -> ImportResult<()> {
    let mut drained = 0usize;
    while let Some(pending) = s.queues.diagrams.pop_front() {
        place_diagram(s, pending)?;
        drain_links(s);
        drained += 1;
    }
    tracing::debug!(drained, "diagram queue drained");
    Ok(())
}

/// Drain nested-diagram references.
pub fn drain_diagram_refs(s: &mut Session<'_, '_>) -> ImportResult<()> {
    let mut drained = 0usize;
    while let Some(pending) = s.queues.diagram_refs.pop_front() {
        let (Some(diagram), Some(target)) = (context_id(s, pending), used_object(s, pending.node))
        else {
            continue;
        };
        drained += 1;
        if diagram == target {
            s.report(
                Diagnostic::info(codes::SELF_REFERENCE, "diagram lists itself; skipped")
                    .with_element(diagram),
            );
            continue;
        }
        s.registry.update(&diagram, |el| {
            if let Some(d) = el.as_diagram_mut() {
                push_unique(&mut d.nested_diagrams, target.clone());
            }
        });
        s.place(&diagram, &target);
    }
    tracing::debug!(drained, "diagram reference queue drained");
    Ok(())
}

/// The representation block of a diagram node.
fn representation(s: &Session<'_, '_>, diagram: NodeId) -> Option<NodeId> {
    s.doc
        .descendants_named(diagram, "DiagramRepresentationObject")
        .into_iter()
        .next()
}

/// The element a `usedObjects` entry names.
fn used_object(s: &Session<'_, '_>, node: NodeId) -> Option<ElementId> {
    let n = s.doc.node(node);
    n.xmi_idref()
        .map(ElementId::new)
        .or_else(|| n.href().and_then(Reference::from_href).map(|r| ElementId::new(r.id)))
        .or_else(|| n.text.as_deref().map(|t| ElementId::new(t.trim())))
}

/// Identifier of the diagram a link or reference entry was queued under.
fn context_id(s: &Session<'_, '_>, pending: Pending) -> Option<ElementId> {
    pending
        .context
        .and_then(|c| s.doc.node(c).xmi_id())
        .map(ElementId::new)
}

fn place_diagram(s: &mut Session<'_, '_>, pending: Pending) -> ImportResult<()> {
    let doc = s.doc;
    let Some(diagram) = doc.node(pending.node).xmi_id().map(ElementId::new) else {
        return Ok(());
    };
    let Some(repr) = representation(s, pending.node) else {
        tracing::debug!(%diagram, "diagram without representation");
        return Ok(());
    };

    if let Some(diagram_type) = doc.node(repr).attr("type") {
        s.registry.update(&diagram, |el| {
            if let Some(d) = el.as_diagram_mut() {
                d.diagram_type = Some(diagram_type.into());
            }
        });
    }

    for entry in doc.children_named(repr, "usedObjects") {
        let Some(element) = used_object(s, entry) else {
            s.unhandled(entry);
            continue;
        };
        let queued = Pending::new(entry, Some(pending.node));
        match s.registry.kind_of(&element) {
            None => s.unresolved(Some(diagram.as_str()), "usedObjects", element.as_str()),
            Some(ElementKind::Diagram) => s.queues.diagram_refs.push_back(queued),
            Some(ElementKind::Property) => {
                tracing::trace!(%diagram, %element, "property not drawn");
            }
            Some(kind) if kind.is_relationship() => s.queues.diagram_links.push_back(queued),
            Some(_) => s.place(&diagram, &element),
        }
    }
    Ok(())
}

fn drain_links(s: &mut Session<'_, '_>) {
    while let Some(pending) = s.queues.diagram_links.pop_front() {
        if let (Some(diagram), Some(link)) = (context_id(s, pending), used_object(s, pending.node)) {
            s.place(&diagram, &link);
        }
    }
}
