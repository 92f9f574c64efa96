//! Structural walker: the one recursive pass over the document.
//!
//! ```text
//! xmi:XMI
//! ├── uml:Model ........................ 1. containment, depth first
//! │   ├── packagedElement (Package) .... package contents
//! │   ├── packagedElement (Class) ...... classifier contents
//! │   │   ├── ownedAttribute ........... factory + cross-ref queue
//! │   │   └── xmi:Extension ............ diagrams -> diagram queue
//! │   └── profileApplication ........... cross-ref queue
//! ├── xmi:Extension .................... 2. shorthand profiles, referenced profiles
//! └── Prof:Stereo ...................... 3. stereotype applications -> cross-ref queue
//! ```
//!
//! The walker materializes every owned element through the factories and
//! queues whatever references something that may not exist yet. Leaves it
//! does not handle are reported and skipped; a package child that cannot be
//! classified at all aborts the import.

use super::document::NodeId;
use super::error::{ImportError, ImportResult};
use super::factory;
use super::kinds::SourceKind;
use super::profile;
use super::session::{Pending, Session};
use crate::model::{ElementId, ElementKind};

/// Walk the whole document.
pub fn walk_document(s: &mut Session<'_, '_>) -> ImportResult<()> {
    let doc = s.doc;
    let root = doc.root();
    let root_node = doc.node(root);

    if is_model_root(s, root) {
        return walk_model(s, root);
    }
    if root_node.local_name() != "XMI" {
        return Err(ImportError::malformed(format!(
            "unexpected root element <{}>",
            root_node.name
        )));
    }

    let models: Vec<NodeId> = root_node
        .children
        .iter()
        .copied()
        .filter(|c| is_model_root(s, *c))
        .collect();
    if models.is_empty() {
        return Err(ImportError::malformed("document contains no uml:Model"));
    }
    for model in models {
        walk_model(s, model)?;
    }

    for &child in &root_node.children {
        let n = doc.node(child);
        if is_model_root(s, child) {
            continue;
        }
        if n.prefix() == Some("xmi") && n.local_name() == "Extension" {
            walk_extension(s, child, None)?;
        } else if profile::is_stereotype_application(s, child) {
            tracing::trace!(tag = %n.name, "queue stereotype application");
            s.queues.cross_refs.push_back(Pending::new(child, None));
        } else if n.prefix() == Some("xmi") {
            tracing::trace!(tag = %n.name, "skip");
        } else {
            s.unhandled(child);
        }
    }
    Ok(())
}

/// `uml:Model`, `uml:Package` or `uml:Profile` as a top-level element.
fn is_model_root(s: &Session<'_, '_>, node: NodeId) -> bool {
    let n = s.doc.node(node);
    let kind = match n.xmi_type() {
        Some(t) => SourceKind::from_xmi_type(t),
        None if n.prefix() == Some("uml") => SourceKind::from_xmi_type(n.local_name()),
        None => return false,
    };
    matches!(
        kind,
        SourceKind::Model | SourceKind::Package | SourceKind::Profile
    )
}

fn walk_model(s: &mut Session<'_, '_>, node: NodeId) -> ImportResult<()> {
    let doc = s.doc;
    let n = doc.node(node);
    let kind = n
        .xmi_type()
        .map(SourceKind::from_xmi_type)
        .unwrap_or_else(|| SourceKind::from_xmi_type(n.local_name()));
    let element_kind = if kind == SourceKind::Profile {
        ElementKind::Profile
    } else {
        ElementKind::Package
    };
    tracing::trace!(id = ?n.xmi_id(), "model root");
    let id = factory::package(s, node, None, element_kind)?;
    walk_package(s, node, &id)
}

// ============================================================================
// PACKAGES
// ============================================================================

fn walk_package(s: &mut Session<'_, '_>, node: NodeId, id: &ElementId) -> ImportResult<()> {
    let doc = s.doc;
    for &child in &doc.node(node).children {
        let c = doc.node(child);
        match c.local_name() {
            "packagedElement" => walk_packaged_element(s, child, id)?,
            "ownedComment" => walk_comment(s, child, id)?,
            "profileApplication" => {
                s.queues.cross_refs.push_back(Pending::new(child, Some(node)));
            }
            "Extension" if c.prefix() == Some("xmi") => walk_extension(s, child, Some(id))?,
            _ => skip_leaf(s, child),
        }
    }
    Ok(())
}

/// A `packagedElement`. Both `xmi:type` and `xmi:id` are required here.
fn walk_packaged_element(
    s: &mut Session<'_, '_>,
    node: NodeId,
    owner: &ElementId,
) -> ImportResult<()> {
    let doc = s.doc;
    let n = doc.node(node);
    let (Some(xmi_type), Some(xmi_id)) = (n.xmi_type(), n.xmi_id()) else {
        return Err(ImportError::malformed(format!(
            "packagedElement without xmi:type or xmi:id under '{owner}'"
        )));
    };
    let kind = SourceKind::from_xmi_type(xmi_type);
    if !kind.is_packageable() {
        return Err(ImportError::malformed(format!(
            "{xmi_type} '{xmi_id}' cannot be a packaged element"
        )));
    }
    tracing::trace!(id = xmi_id, kind = ?kind, "packagedElement");
    walk_owned(s, node, owner, kind)
}

/// Dispatch one owned element by kind.
fn walk_owned(
    s: &mut Session<'_, '_>,
    node: NodeId,
    owner: &ElementId,
    kind: SourceKind,
) -> ImportResult<()> {
    match kind {
        SourceKind::Model | SourceKind::Package => {
            let id = factory::package(s, node, Some(owner), ElementKind::Package)?;
            walk_package(s, node, &id)
        }
        SourceKind::Profile => {
            let id = factory::package(s, node, Some(owner), ElementKind::Profile)?;
            walk_package(s, node, &id)
        }
        SourceKind::Class
        | SourceKind::Interface
        | SourceKind::DataType
        | SourceKind::PrimitiveType
        | SourceKind::Enumeration
        | SourceKind::Actor
        | SourceKind::UseCase
        | SourceKind::Stereotype => {
            let Some(element_kind) = kind.element_kind() else {
                s.unhandled(node);
                return Ok(());
            };
            let id = factory::classifier(s, node, owner, element_kind)?;
            walk_classifier(s, node, &id, element_kind)
        }
        SourceKind::Association => {
            let id = factory::association(s, node, owner)?;
            walk_association(s, node, &id)
        }
        SourceKind::Dependency | SourceKind::Usage => {
            factory::dependency(s, node, owner, ElementKind::Dependency)?;
            enqueue(s, node);
            Ok(())
        }
        SourceKind::Realization => {
            factory::dependency(s, node, owner, ElementKind::Realization)?;
            enqueue(s, node);
            Ok(())
        }
        SourceKind::Abstraction => {
            factory::dependency(s, node, owner, ElementKind::Abstraction)?;
            enqueue(s, node);
            Ok(())
        }
        SourceKind::Extension => {
            factory::extension(s, node, owner)?;
            enqueue(s, node);
            Ok(())
        }
        SourceKind::InstanceSpecification => {
            let id = factory::instance_specification(s, node, owner)?;
            enqueue(s, node);
            walk_instance(s, node, &id)
        }
        SourceKind::Comment => walk_comment(s, node, owner),
        SourceKind::Diagram => {
            factory::diagram(s, node, Some(owner))?;
            s.queues.diagrams.push_back(Pending::new(node, None));
            Ok(())
        }

        SourceKind::Component
        | SourceKind::InformationFlow
        | SourceKind::TemplateBinding
        | SourceKind::Constraint
        | SourceKind::Extend
        | SourceKind::Signal
        | SourceKind::Behavior
        | SourceKind::Unknown => {
            s.unhandled(node);
            Ok(())
        }

        // Owned features and value specifications are handled by their
        // owner's walk and never reach the generic dispatch.
        SourceKind::EnumerationLiteral
        | SourceKind::Property
        | SourceKind::Port
        | SourceKind::Operation
        | SourceKind::Parameter
        | SourceKind::Generalization
        | SourceKind::InterfaceRealization
        | SourceKind::Include
        | SourceKind::ExtensionEnd
        | SourceKind::ProfileApplication
        | SourceKind::Slot
        | SourceKind::LiteralInteger
        | SourceKind::LiteralUnlimitedNatural
        | SourceKind::LiteralString
        | SourceKind::LiteralBoolean
        | SourceKind::LiteralReal
        | SourceKind::OpaqueExpression
        | SourceKind::InstanceValue => {
            s.unhandled(node);
            Ok(())
        }
    }
}

// ============================================================================
// CLASSIFIERS
// ============================================================================

fn walk_classifier(
    s: &mut Session<'_, '_>,
    node: NodeId,
    id: &ElementId,
    kind: ElementKind,
) -> ImportResult<()> {
    let doc = s.doc;
    for &child in &doc.node(node).children {
        let c = doc.node(child);
        if c.xmi_id().is_none() {
            // Reference-valued children (`<general xmi:idref=..>`) are read
            // by whoever resolves the reference.
            if !(c.prefix() == Some("xmi") && c.local_name() == "Extension") {
                skip_leaf(s, child);
                continue;
            }
        }
        match c.local_name() {
            "ownedAttribute" if kind == ElementKind::Stereotype => {
                profile::stereotype_attribute(s, child, id)?;
            }
            "ownedAttribute" => {
                factory::property(s, child, id)?;
                enqueue(s, child);
            }
            "ownedOperation" => walk_operation(s, child, id)?,
            "generalization" => {
                factory::generalization(s, child, id)?;
                enqueue(s, child);
            }
            "interfaceRealization" => {
                factory::interface_realization(s, child, id)?;
                enqueue(s, child);
            }
            "ownedLiteral" if kind == ElementKind::Enumeration => {
                factory::enumeration_literal(s, child, id)?;
            }
            "include" if kind == ElementKind::UseCase => {
                factory::include(s, child, id)?;
                enqueue(s, child);
            }
            "nestedClassifier" | "ownedUseCase" => {
                let nested = c.xmi_type().map(SourceKind::from_xmi_type);
                match nested.and_then(|k| k.element_kind()) {
                    Some(k) if k.is_classifier() => {
                        let nested_id = factory::classifier(s, child, id, k)?;
                        walk_classifier(s, child, &nested_id, k)?;
                    }
                    _ => s.unhandled(child),
                }
            }
            "ownedComment" => walk_comment(s, child, id)?,
            "Extension" if c.prefix() == Some("xmi") => walk_extension(s, child, Some(id))?,
            _ => s.unhandled(child),
        }
    }
    Ok(())
}

fn walk_operation(s: &mut Session<'_, '_>, node: NodeId, owner: &ElementId) -> ImportResult<()> {
    let id = factory::operation(s, node, owner)?;
    let doc = s.doc;
    for &child in &doc.node(node).children {
        let c = doc.node(child);
        match c.local_name() {
            "ownedParameter" if c.xmi_id().is_some() => {
                factory::parameter(s, child, &id)?;
                enqueue(s, child);
            }
            "ownedComment" if c.xmi_id().is_some() => walk_comment(s, child, &id)?,
            _ => skip_leaf(s, child),
        }
    }
    Ok(())
}

fn walk_association(s: &mut Session<'_, '_>, node: NodeId, id: &ElementId) -> ImportResult<()> {
    let doc = s.doc;
    for &child in &doc.node(node).children {
        let c = doc.node(child);
        match c.local_name() {
            "ownedEnd" if c.xmi_id().is_some() => {
                factory::property(s, child, id)?;
                enqueue(s, child);
            }
            "ownedComment" if c.xmi_id().is_some() => walk_comment(s, child, id)?,
            _ => skip_leaf(s, child),
        }
    }
    enqueue(s, node);
    Ok(())
}

fn walk_instance(s: &mut Session<'_, '_>, node: NodeId, id: &ElementId) -> ImportResult<()> {
    let doc = s.doc;
    for &child in &doc.node(node).children {
        let c = doc.node(child);
        match c.local_name() {
            "slot" if c.xmi_id().is_some() => {
                factory::slot(s, child, id)?;
                enqueue(s, child);
            }
            _ => skip_leaf(s, child),
        }
    }
    Ok(())
}

fn walk_comment(s: &mut Session<'_, '_>, node: NodeId, owner: &ElementId) -> ImportResult<()> {
    if s.doc.node(node).xmi_id().is_none() {
        skip_leaf(s, node);
        return Ok(());
    }
    factory::comment(s, node, owner)?;
    enqueue(s, node);
    Ok(())
}

// ============================================================================
// EXTENSION BLOCKS
// ============================================================================

/// An `xmi:Extension` block: owned diagrams, shorthand profiles, referenced
/// profiles. Everything else in it is tool bookkeeping.
fn walk_extension(
    s: &mut Session<'_, '_>,
    node: NodeId,
    owner: Option<&ElementId>,
) -> ImportResult<()> {
    let doc = s.doc;
    for &child in &doc.node(node).children {
        match doc.node(child).local_name() {
            "modelExtension" => {
                for &entry in &doc.node(child).children {
                    if is_diagram(s, entry) {
                        factory::diagram(s, entry, owner)?;
                        s.queues.diagrams.push_back(Pending::new(entry, None));
                    }
                }
            }
            "stereotypesHREFS" => profile::shorthand_table(s, child)?,
            _ => {}
        }
    }
    for referenced in doc.descendants_named(node, "referencedProfile") {
        profile::referenced_profile(s, referenced)?;
    }
    Ok(())
}

fn is_diagram(s: &Session<'_, '_>, node: NodeId) -> bool {
    let n = s.doc.node(node);
    n.xmi_id().is_some()
        && n.xmi_type().map(SourceKind::from_xmi_type) == Some(SourceKind::Diagram)
}

// ============================================================================
// HELPERS
// ============================================================================

/// Queue `node` for the cross-reference drain, with its parent as context.
fn enqueue(s: &mut Session<'_, '_>, node: NodeId) {
    let parent = s.doc.node(node).parent;
    s.queues.cross_refs.push_back(Pending::new(node, parent));
}

/// Skip a child the walker does not descend into.
fn skip_leaf(s: &mut Session<'_, '_>, node: NodeId) {
    let doc = s.doc;
    let n = doc.node(node);
    if n.xmi_idref().is_some() || n.href().is_some() {
        return;
    }
    s.unhandled(node);
}
