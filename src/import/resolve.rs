//! Cross-reference queue drain.
//!
//! Every entry is a document node the walker already materialized. Draining
//! it reads the node's reference features again, now that the whole
//! containment tree exists, and links the element to its referents. A
//! referent that still does not exist is reported and the link is dropped.

use super::document::NodeId;
use super::error::ImportResult;
use super::factory::{TypeTarget, apply_type, read_type};
use super::kinds::SourceKind;
use super::profile;
use super::session::{Pending, Session};
use crate::model::{ElementId, ElementKind, ParameterDirection, push_unique};

/// Drain the cross-reference queue in FIFO order.
pub fn drain_cross_refs(s: &mut Session<'_, '_>) -> ImportResult<()> {
    let mut drained = 0usize;
    while let Some(pending) = s.queues.cross_refs.pop_front() {
        resolve(s, pending)?;
        drained += 1;
    }
    tracing::debug!(drained, "cross-reference queue drained");
    Ok(())
}

fn resolve(s: &mut Session<'_, '_>, pending: Pending) -> ImportResult<()> {
    let node = pending.node;
    if pending.context.is_none() && profile::is_stereotype_application(s, node) {
        return profile::apply_stereotype(s, node);
    }

    let doc = s.doc;
    let n = doc.node(node);
    let kind = n
        .xmi_type()
        .map(SourceKind::from_xmi_type)
        .unwrap_or_else(|| slot_kind(n.local_name()));

    if kind == SourceKind::ProfileApplication {
        resolve_profile_application(s, node, pending.context);
        return Ok(());
    }
    let Some(raw) = n.xmi_id() else {
        tracing::debug!(tag = %n.name, "queued node without identifier");
        return Ok(());
    };
    let id = ElementId::new(raw);

    match kind {
        SourceKind::Generalization => resolve_generalization(s, &id, node),
        SourceKind::Property | SourceKind::Port | SourceKind::ExtensionEnd => {
            resolve_property(s, &id, node)
        }
        SourceKind::Parameter => resolve_parameter(s, &id, node),
        SourceKind::Association => resolve_association(s, &id, node),
        SourceKind::InterfaceRealization => resolve_interface_realization(s, &id, node),
        SourceKind::Dependency
        | SourceKind::Usage
        | SourceKind::Realization
        | SourceKind::Abstraction => resolve_dependency(s, &id, node),
        SourceKind::Include => resolve_include(s, &id, node),
        SourceKind::InstanceSpecification => resolve_instance(s, &id, node),
        SourceKind::Slot => resolve_slot(s, &id, node),
        SourceKind::Comment => resolve_comment(s, &id, node),
        SourceKind::Extension => resolve_extension(s, &id, node),
        other => tracing::debug!(%id, kind = ?other, "nothing to resolve"),
    }
    Ok(())
}

/// Kind implied by a containment slot, for nodes written without `xmi:type`.
fn slot_kind(local: &str) -> SourceKind {
    match local {
        "profileApplication" => SourceKind::ProfileApplication,
        "generalization" => SourceKind::Generalization,
        "interfaceRealization" => SourceKind::InterfaceRealization,
        "include" => SourceKind::Include,
        "ownedAttribute" | "ownedEnd" => SourceKind::Property,
        "ownedParameter" => SourceKind::Parameter,
        "ownedComment" => SourceKind::Comment,
        "slot" => SourceKind::Slot,
        _ => SourceKind::Unknown,
    }
}

// ============================================================================
// REFERENCE READERS
// ============================================================================

/// Registered referents of `feature`, in document order. Missing ones are
/// reported against `from` and dropped.
fn targets(s: &mut Session<'_, '_>, node: NodeId, from: &ElementId, feature: &str) -> Vec<ElementId> {
    let refs = s.doc.references(node, feature);
    let mut found = Vec::with_capacity(refs.len());
    for r in refs {
        let id = ElementId::new(r.id.as_str());
        if s.registry.contains(&id) {
            found.push(id);
        } else {
            s.unresolved(Some(from.as_str()), feature, &r.id);
        }
    }
    found
}

fn target(s: &mut Session<'_, '_>, node: NodeId, from: &ElementId, feature: &str) -> Option<ElementId> {
    targets(s, node, from, feature).into_iter().next()
}

/// Resolve the `type` of a typed element, reporting a dangling reference.
fn typed(s: &mut Session<'_, '_>, id: &ElementId, node: NodeId) -> Option<TypeTarget> {
    match read_type(s, node)? {
        TypeTarget::Missing(missing) => {
            s.unresolved(Some(id.as_str()), "type", &missing);
            None
        }
        resolved => Some(resolved),
    }
}

// ============================================================================
// PER-KIND RESOLUTION
// ============================================================================

fn resolve_generalization(s: &mut Session<'_, '_>, id: &ElementId, node: NodeId) {
    let general = target(s, node, id, "general");
    s.registry.update(id, |el| {
        if let Some(g) = el.as_generalization_mut() {
            if general.is_some() {
                g.general = general;
            }
        }
    });
}

fn resolve_property(s: &mut Session<'_, '_>, id: &ElementId, node: NodeId) {
    if let Some(t) = typed(s, id, node) {
        s.registry.update(id, |el| {
            if let Some(p) = el.as_property_mut() {
                apply_type(&t, &mut p.type_ref, &mut p.type_name);
            }
        });
    }

    let Some(association) = target(s, node, id, "association") else {
        return;
    };
    if s.registry.kind_of(&association) != Some(ElementKind::Association) {
        s.unresolved(Some(id.as_str()), "association", association.as_str());
        return;
    }
    link_end(s, &association, id);
}

/// Record `end` as a member end of `association`, both directions.
fn link_end(s: &mut Session<'_, '_>, association: &ElementId, end: &ElementId) {
    s.registry.update(end, |el| {
        if let Some(p) = el.as_property_mut() {
            p.association = Some(association.clone());
        }
    });
    s.registry.update(association, |el| {
        if let Some(a) = el.as_association_mut() {
            push_unique(&mut a.member_ends, end.clone());
        }
    });
}

fn resolve_parameter(s: &mut Session<'_, '_>, id: &ElementId, node: NodeId) {
    let target = typed(s, id, node);
    let direction = s
        .doc
        .node(node)
        .attr("direction")
        .and_then(ParameterDirection::from_xmi);
    s.registry.update(id, |el| {
        if let Some(p) = el.as_parameter_mut() {
            if let Some(t) = &target {
                apply_type(t, &mut p.type_ref, &mut p.type_name);
            }
            if let Some(direction) = direction {
                p.direction = direction;
            }
        }
    });
}

/// Member ends follow the `memberEnd` order; ends linked earlier from the
/// property side keep their place after them.
fn resolve_association(s: &mut Session<'_, '_>, id: &ElementId, node: NodeId) {
    let ends = targets(s, node, id, "memberEnd");
    for end in &ends {
        if s.registry.kind_of(end) == Some(ElementKind::Property) {
            s.registry.update(end, |el| {
                if let Some(p) = el.as_property_mut() {
                    p.association = Some(id.clone());
                }
            });
        }
    }
    s.registry.update(id, |el| {
        if let Some(a) = el.as_association_mut() {
            let mut ordered = ends;
            for existing in a.member_ends.drain(..) {
                push_unique(&mut ordered, existing);
            }
            a.member_ends = ordered;
        }
    });
}

fn resolve_interface_realization(s: &mut Session<'_, '_>, id: &ElementId, node: NodeId) {
    let mut contract = target(s, node, id, "contract");
    let mut supplier = targets(s, node, id, "supplier");
    let client = targets(s, node, id, "client");

    if contract.is_none() {
        contract = supplier.first().cloned();
    }
    if supplier.is_empty() {
        supplier.extend(contract.clone());
    }
    if contract.is_none() {
        s.unresolved(Some(id.as_str()), "contract", "<none>");
    }

    s.registry.update(id, |el| {
        if let Some(r) = el.as_interface_realization_mut() {
            if contract.is_some() {
                r.contract = contract;
            }
            let implementing = r.implementing_classifier.clone();
            for c in client.into_iter().chain(implementing) {
                push_unique(&mut r.dependency.client, c);
            }
            for sup in supplier {
                push_unique(&mut r.dependency.supplier, sup);
            }
        }
    });
}

fn resolve_dependency(s: &mut Session<'_, '_>, id: &ElementId, node: NodeId) {
    let client = targets(s, node, id, "client");
    let supplier = targets(s, node, id, "supplier");
    s.registry.update(id, |el| {
        if let Some(d) = el.as_dependency_mut() {
            for c in client {
                push_unique(&mut d.client, c);
            }
            for sup in supplier {
                push_unique(&mut d.supplier, sup);
            }
        }
    });
}

fn resolve_include(s: &mut Session<'_, '_>, id: &ElementId, node: NodeId) {
    let addition = target(s, node, id, "addition");
    s.registry.update(id, |el| {
        if let Some(i) = el.as_include_mut() {
            if addition.is_some() {
                i.addition = addition;
            }
        }
    });
}

fn resolve_instance(s: &mut Session<'_, '_>, id: &ElementId, node: NodeId) {
    let classifiers = targets(s, node, id, "classifier");
    s.registry.update(id, |el| {
        if let Some(i) = el.as_instance_mut() {
            for c in classifiers {
                push_unique(&mut i.classifiers, c);
            }
        }
    });
}

fn resolve_slot(s: &mut Session<'_, '_>, id: &ElementId, node: NodeId) {
    let feature = target(s, node, id, "definingFeature");
    s.registry.update(id, |el| {
        if let Some(slot) = el.as_slot_mut() {
            if feature.is_some() {
                slot.defining_feature = feature;
            }
        }
    });
}

fn resolve_comment(s: &mut Session<'_, '_>, id: &ElementId, node: NodeId) {
    let annotated = targets(s, node, id, "annotatedElement");
    for element in &annotated {
        s.registry.update(element, |el| {
            push_unique(&mut el.comments, id.clone());
        });
    }
    s.registry.update(id, |el| {
        if let Some(c) = el.as_comment_mut() {
            for element in annotated {
                push_unique(&mut c.annotated_elements, element);
            }
        }
    });
}

/// An explicit Extension element. Its stereotype comes from the owned end;
/// the metaclass side is only known if a stereotype base attribute named
/// this extension.
fn resolve_extension(s: &mut Session<'_, '_>, id: &ElementId, node: NodeId) {
    let stereotype = s
        .doc
        .first_child_named(node, "ownedEnd")
        .and_then(|end| target(s, end, id, "type"));

    if let Some(stereotype) = &stereotype {
        if s.registry.kind_of(stereotype) == Some(ElementKind::Stereotype) {
            s.registry.update(id, |el| {
                if let Some(x) = el.as_extension_mut() {
                    x.stereotype.get_or_insert_with(|| stereotype.clone());
                }
            });
            s.registry.update(stereotype, |el| {
                if let Some(st) = el.as_stereotype_mut() {
                    push_unique(&mut st.extensions, id.clone());
                }
            });
        }
    }

    let has_metaclass = s
        .registry
        .lookup(id)
        .and_then(|el| el.as_extension())
        .is_some_and(|x| x.metaclass.is_some());
    if !has_metaclass {
        s.unresolved(Some(id.as_str()), "metaclass", "<none>");
    }
}

fn resolve_profile_application(s: &mut Session<'_, '_>, node: NodeId, context: Option<NodeId>) {
    let doc = s.doc;
    let package = context
        .and_then(|c| doc.node(c).xmi_id())
        .map(ElementId::new);
    let Some(package) = package else {
        s.unhandled(node);
        return;
    };
    let Some(reference) = doc.reference(node, "appliedProfile") else {
        s.unresolved(Some(package.as_str()), "appliedProfile", "<none>");
        return;
    };
    let Some(applied) = profile::profile_for_reference(s, &reference, node) else {
        return;
    };
    s.registry.update(&package, |el| {
        if let Some(p) = el.as_package_mut() {
            push_unique(&mut p.applied_profiles, applied);
        }
    });
}
