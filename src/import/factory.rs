//! Metaclass factories.
//!
//! One get-or-create function per element kind. Each takes the declaring
//! document node and the owning element, applies only the attributes that
//! are syntactically present on the node, and returns the identifier.
//! References that may point forward (`general`, `memberEnd`, ...) are left
//! for the deferred queues; the walker decides what to enqueue.
//!
//! Calling a factory twice for the same node is harmless: the registry
//! returns the existing element and every list append is deduplicated.

use std::sync::Arc;

use super::document::{Document, NodeId};
use super::error::{ImportError, ImportResult};
use super::kinds::primitive_type_name;
use super::profile;
use super::session::Session;
use crate::model::{
    Aggregation, ElementId, ElementKind, Multiplicity, ParameterDirection, Visibility,
    push_unique,
};

// ============================================================================
// SHARED READERS
// ============================================================================

/// What a `type` reference points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeTarget {
    /// A registered element.
    Element(ElementId),
    /// A UML primitive, kept as a label.
    Primitive(&'static str),
    /// Nothing registered under this identifier (yet).
    Missing(String),
}

/// Read the `type` reference of `node` against the current registry.
pub fn read_type(s: &Session<'_, '_>, node: NodeId) -> Option<TypeTarget> {
    let r = s.doc.reference(node, "type")?;
    let id = ElementId::new(r.id.as_str());
    if !r.is_external() && s.registry.contains(&id) {
        return Some(TypeTarget::Element(id));
    }
    if let Some(primitive) = primitive_type_name(&r.id) {
        return Some(TypeTarget::Primitive(primitive));
    }
    if s.registry.contains(&id) {
        return Some(TypeTarget::Element(id));
    }
    Some(TypeTarget::Missing(r.id))
}

/// Apply a resolved type to a typed element's two type slots.
///
/// At most one slot is ever set: the walk may label a forward reference
/// that the drain later finds registered, and the drain's answer wins.
pub fn apply_type(
    target: &TypeTarget,
    type_ref: &mut Option<ElementId>,
    type_name: &mut Option<Arc<str>>,
) {
    match target {
        TypeTarget::Element(id) => {
            *type_ref = Some(id.clone());
            *type_name = None;
        }
        TypeTarget::Primitive(name) => {
            *type_ref = None;
            *type_name = Some(Arc::from(*name));
        }
        TypeTarget::Missing(_) => {}
    }
}

/// Read `lowerValue` / `upperValue` children.
pub fn read_multiplicity(doc: &Document, node: NodeId) -> Multiplicity {
    let lower = doc
        .first_child_named(node, "lowerValue")
        .map(|c| Arc::from(doc.node(c).attr("value").unwrap_or("0")));
    let upper = doc
        .first_child_named(node, "upperValue")
        .and_then(|c| doc.node(c).attr("value"))
        .map(Arc::from);
    Multiplicity { lower, upper }
}

/// Textual content of a value specification node.
pub fn value_text(doc: &Document, node: NodeId) -> Option<Arc<str>> {
    let n = doc.node(node);
    if let Some(v) = n.attr("value") {
        return Some(Arc::from(v));
    }
    if let Some(body) = doc.text_or_attr(node, "body") {
        return Some(Arc::from(body));
    }
    if let Some(r) = doc.reference(node, "instance") {
        return Some(Arc::from(r.id));
    }
    n.text.as_deref().map(Arc::from)
}

// ============================================================================
// DECLARATION
// ============================================================================

/// Get-or-create the element `node` declares, set its owner, name and
/// visibility.
fn declare(
    s: &mut Session<'_, '_>,
    kind: ElementKind,
    node: NodeId,
    owner: Option<&ElementId>,
) -> ImportResult<ElementId> {
    let doc = s.doc;
    let n = doc.node(node);
    let raw = n
        .xmi_id()
        .ok_or_else(|| ImportError::malformed(format!("<{}> has no xmi:id", n.name)))?;

    let (id, created) = s.registry.get_or_create(kind, raw, node)?;
    if created {
        tracing::trace!(%id, %kind, "created");
    }
    if let Some(owner) = owner {
        s.registry.set_owner(&id, Some(owner));
    }

    let name = n.name_attr();
    let visibility = n.attr("visibility").and_then(Visibility::from_xmi);
    s.registry.update(&id, |el| {
        if let Some(name) = name {
            el.set_name(name);
        }
        if visibility.is_some() {
            el.visibility = visibility;
        }
    });
    Ok(id)
}

// ============================================================================
// CONTAINERS AND CLASSIFIERS
// ============================================================================

/// Package, model or profile.
pub fn package(
    s: &mut Session<'_, '_>,
    node: NodeId,
    owner: Option<&ElementId>,
    kind: ElementKind,
) -> ImportResult<ElementId> {
    let id = declare(s, kind, node, owner)?;
    if kind == ElementKind::Profile {
        profile::note_profile(s, &id);
    }
    Ok(id)
}

/// Class, interface, data type, enumeration, actor, use case or stereotype.
pub fn classifier(
    s: &mut Session<'_, '_>,
    node: NodeId,
    owner: &ElementId,
    kind: ElementKind,
) -> ImportResult<ElementId> {
    let id = declare(s, kind, node, Some(owner))?;
    let doc = s.doc;
    let n = doc.node(node);
    let (is_abstract, is_leaf) = (n.attr("isAbstract"), n.attr("isLeaf"));
    s.registry.update(&id, |el| {
        if let Some(c) = el.classifier_mut() {
            if let Some(v) = is_abstract {
                c.is_abstract = v == "true";
            }
            if let Some(v) = is_leaf {
                c.is_leaf = v == "true";
            }
        }
    });
    if kind == ElementKind::Stereotype {
        profile::note_stereotype(s, &id);
    }
    Ok(id)
}

pub fn enumeration_literal(
    s: &mut Session<'_, '_>,
    node: NodeId,
    enumeration: &ElementId,
) -> ImportResult<ElementId> {
    let id = declare(s, ElementKind::EnumerationLiteral, node, Some(enumeration))?;
    s.registry.update(enumeration, |el| {
        if let Some(e) = el.as_enumeration_mut() {
            push_unique(&mut e.literals, id.clone());
        }
    });
    Ok(id)
}

// ============================================================================
// FEATURES
// ============================================================================

/// Attribute of a classifier, or owned end of an association.
///
/// A type already registered is linked immediately; a forward type reference
/// is picked up again by the cross-reference drain.
pub fn property(
    s: &mut Session<'_, '_>,
    node: NodeId,
    owner: &ElementId,
) -> ImportResult<ElementId> {
    let id = declare(s, ElementKind::Property, node, Some(owner))?;
    let doc = s.doc;
    let n = doc.node(node);

    let target = read_type(s, node);
    let multiplicity = read_multiplicity(doc, node);
    let aggregation = n.attr("aggregation").and_then(Aggregation::from_xmi);
    let default_value = doc
        .first_child_named(node, "defaultValue")
        .and_then(|d| value_text(doc, d));

    s.registry.update(&id, |el| {
        if let Some(p) = el.as_property_mut() {
            if let Some(target) = &target {
                apply_type(target, &mut p.type_ref, &mut p.type_name);
            }
            p.multiplicity = multiplicity;
            if let Some(aggregation) = aggregation {
                p.aggregation = aggregation;
            }
            p.is_static = n.flag("isStatic");
            p.is_read_only = n.flag("isReadOnly");
            p.is_derived = n.flag("isDerived");
            if default_value.is_some() {
                p.default_value = default_value;
            }
        }
    });

    s.registry.update(owner, |el| {
        if let Some(c) = el.classifier_mut() {
            push_unique(&mut c.attributes, id.clone());
        } else if let Some(a) = el.as_association_mut() {
            push_unique(&mut a.owned_ends, id.clone());
        }
    });
    Ok(id)
}

pub fn operation(
    s: &mut Session<'_, '_>,
    node: NodeId,
    owner: &ElementId,
) -> ImportResult<ElementId> {
    let id = declare(s, ElementKind::Operation, node, Some(owner))?;
    let doc = s.doc;
    let n = doc.node(node);
    s.registry.update(&id, |el| {
        if let Some(o) = el.as_operation_mut() {
            o.is_static = n.flag("isStatic");
            o.is_abstract = n.flag("isAbstract");
            o.is_query = n.flag("isQuery");
        }
    });
    s.registry.update(owner, |el| {
        if let Some(c) = el.classifier_mut() {
            push_unique(&mut c.operations, id.clone());
        }
    });
    Ok(id)
}

pub fn parameter(
    s: &mut Session<'_, '_>,
    node: NodeId,
    operation: &ElementId,
) -> ImportResult<ElementId> {
    let id = declare(s, ElementKind::Parameter, node, Some(operation))?;
    let doc = s.doc;
    let target = read_type(s, node);
    let multiplicity = read_multiplicity(doc, node);
    let direction = doc
        .node(node)
        .attr("direction")
        .and_then(ParameterDirection::from_xmi);

    s.registry.update(&id, |el| {
        if let Some(p) = el.as_parameter_mut() {
            if let Some(target) = &target {
                apply_type(target, &mut p.type_ref, &mut p.type_name);
            }
            p.multiplicity = multiplicity;
            if let Some(direction) = direction {
                p.direction = direction;
            }
        }
    });
    s.registry.update(operation, |el| {
        if let Some(o) = el.as_operation_mut() {
            push_unique(&mut o.parameters, id.clone());
        }
    });
    Ok(id)
}

// ============================================================================
// RELATIONSHIPS
// ============================================================================

pub fn association(
    s: &mut Session<'_, '_>,
    node: NodeId,
    owner: &ElementId,
) -> ImportResult<ElementId> {
    declare(s, ElementKind::Association, node, Some(owner))
}

/// Generalization owned by its specific classifier.
pub fn generalization(
    s: &mut Session<'_, '_>,
    node: NodeId,
    specific: &ElementId,
) -> ImportResult<ElementId> {
    let id = declare(s, ElementKind::Generalization, node, Some(specific))?;
    s.registry.update(&id, |el| {
        if let Some(g) = el.as_generalization_mut() {
            g.specific = Some(specific.clone());
        }
    });
    s.registry.update(specific, |el| {
        if let Some(c) = el.classifier_mut() {
            push_unique(&mut c.generalizations, id.clone());
        }
    });
    Ok(id)
}

/// Interface realization owned by its implementing classifier.
pub fn interface_realization(
    s: &mut Session<'_, '_>,
    node: NodeId,
    implementing: &ElementId,
) -> ImportResult<ElementId> {
    let id = declare(s, ElementKind::InterfaceRealization, node, Some(implementing))?;
    s.registry.update(&id, |el| {
        if let Some(r) = el.as_interface_realization_mut() {
            r.implementing_classifier = Some(implementing.clone());
        }
    });
    s.registry.update(implementing, |el| {
        if let Some(c) = el.classifier_mut() {
            push_unique(&mut c.interface_realizations, id.clone());
        }
    });
    Ok(id)
}

/// Dependency, realization or abstraction.
pub fn dependency(
    s: &mut Session<'_, '_>,
    node: NodeId,
    owner: &ElementId,
    kind: ElementKind,
) -> ImportResult<ElementId> {
    declare(s, kind, node, Some(owner))
}

/// Include owned by its including use case.
pub fn include(
    s: &mut Session<'_, '_>,
    node: NodeId,
    including: &ElementId,
) -> ImportResult<ElementId> {
    let id = declare(s, ElementKind::Include, node, Some(including))?;
    s.registry.update(&id, |el| {
        if let Some(i) = el.as_include_mut() {
            i.including_case = Some(including.clone());
        }
    });
    s.registry.update(including, |el| {
        if let Some(u) = el.as_use_case_mut() {
            push_unique(&mut u.includes, id.clone());
        }
    });
    Ok(id)
}

pub fn extension(
    s: &mut Session<'_, '_>,
    node: NodeId,
    owner: &ElementId,
) -> ImportResult<ElementId> {
    declare(s, ElementKind::Extension, node, Some(owner))
}

// ============================================================================
// INSTANCES, ANNOTATIONS, VIEWS
// ============================================================================

pub fn instance_specification(
    s: &mut Session<'_, '_>,
    node: NodeId,
    owner: &ElementId,
) -> ImportResult<ElementId> {
    declare(s, ElementKind::InstanceSpecification, node, Some(owner))
}

/// Slot of an instance specification, with its literal values.
pub fn slot(
    s: &mut Session<'_, '_>,
    node: NodeId,
    instance: &ElementId,
) -> ImportResult<ElementId> {
    let id = declare(s, ElementKind::Slot, node, Some(instance))?;
    let doc = s.doc;
    let values: Vec<Arc<str>> = doc
        .children_named(node, "value")
        .filter_map(|v| value_text(doc, v))
        .collect();

    s.registry.update(&id, |el| {
        if let Some(slot) = el.as_slot_mut() {
            if !values.is_empty() {
                slot.values = values;
            }
        }
    });
    s.registry.update(instance, |el| {
        if let Some(i) = el.as_instance_mut() {
            push_unique(&mut i.slots, id.clone());
        }
    });
    Ok(id)
}

pub fn comment(
    s: &mut Session<'_, '_>,
    node: NodeId,
    owner: &ElementId,
) -> ImportResult<ElementId> {
    let id = declare(s, ElementKind::Comment, node, Some(owner))?;
    let body = s.doc.text_or_attr(node, "body");
    s.registry.update(&id, |el| {
        if let (Some(c), Some(body)) = (el.as_comment_mut(), body) {
            c.body = Some(Arc::from(body));
        }
    });
    Ok(id)
}

/// Diagram owned by the element whose extension block declares it.
pub fn diagram(
    s: &mut Session<'_, '_>,
    node: NodeId,
    owner: Option<&ElementId>,
) -> ImportResult<ElementId> {
    declare(s, ElementKind::Diagram, node, owner)
}
