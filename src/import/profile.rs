//! Profile and extension synthesis.
//!
//! Stereotypes reach the importer in three shapes:
//!
//! ```text
//! explicit profile subtree      uml:Profile ─ uml:Stereotype ─ base_Class ──► Extension ──► Class «metaclass»
//! shorthand table               xmi:Extension/stereotypesHREFS/stereotype[@name="Prof:Stereo"]
//! referenced profile            xmi:Extension/referencedProfile[@href="Prof.mdzip#id"]
//! ```
//!
//! All three converge on the same elements, keyed by name inside a profile
//! scope, so a profile that shows up in more than one shape is materialized
//! once. [`ProfileIndex`] holds the name keys and the per-stereotype dedup
//! sets; it is seeded from the store at session start so a re-import finds
//! what the previous import made.
//!
//! Applied stereotypes (`<Prof:Stereo base_Class="..."/>` at the document
//! root) are turned into instance specifications here as well, once the
//! cross-reference drain reaches them.

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use super::diagnostics::{Diagnostic, codes};
use super::document::{NodeId, Reference};
use super::error::ImportResult;
use super::kinds::metaclass_name;
use super::session::{Pending, Session};
use super::factory;
use crate::model::{Element, ElementId, ElementKind, ModelStore, push_unique};

/// Metaclass an extension from the shorthand table points at.
pub const SHORTHAND_METACLASS: &str = "Element";

// ============================================================================
// INDEX
// ============================================================================

/// Name-keyed view of the profiles in the store.
#[derive(Debug, Default)]
pub struct ProfileIndex {
    profiles: FxHashMap<SmolStr, ElementId>,
    /// (profile scope, stereotype name) -> stereotype
    stereotypes: FxHashMap<(ElementId, SmolStr), ElementId>,
    /// (profile scope, metaclass name) -> synthesized metaclass
    metaclasses: FxHashMap<(ElementId, SmolStr), ElementId>,
    ledgers: FxHashMap<ElementId, StereotypeLedger>,
}

/// What one stereotype already declares.
#[derive(Debug, Default)]
pub struct StereotypeLedger {
    /// Attribute name -> attribute.
    pub attributes: FxHashMap<SmolStr, ElementId>,
    /// Names of the metaclasses this stereotype extends.
    pub extended: FxHashSet<SmolStr>,
}

impl ProfileIndex {
    /// Index the profiles, stereotypes and metaclasses already in `store`.
    pub fn from_store(store: &dyn ModelStore) -> Self {
        let mut index = Self::default();
        for el in store.elements() {
            let Some(name) = el.name() else { continue };
            match el.kind() {
                ElementKind::Profile => {
                    index
                        .profiles
                        .entry(SmolStr::new(name))
                        .or_insert_with(|| el.id.clone());
                }
                ElementKind::Stereotype => {
                    if let Some(scope) = profile_scope(store, &el.id) {
                        index
                            .stereotypes
                            .entry((scope, SmolStr::new(name)))
                            .or_insert_with(|| el.id.clone());
                    }
                    let ledger = index.ledger(&el.id);
                    seed_ledger(store, el, ledger);
                }
                ElementKind::Class if el.as_class().is_some_and(|c| c.is_metaclass) => {
                    if let Some(scope) = profile_scope(store, &el.id) {
                        index
                            .metaclasses
                            .entry((scope, SmolStr::new(name)))
                            .or_insert_with(|| el.id.clone());
                    }
                }
                _ => {}
            }
        }
        index
    }

    pub fn profile_named(&self, name: &str) -> Option<&ElementId> {
        self.profiles.get(name)
    }

    pub fn stereotype_named(&self, scope: &ElementId, name: &str) -> Option<&ElementId> {
        self.stereotypes.get(&(scope.clone(), SmolStr::new(name)))
    }

    /// Dedup sets of `stereotype`, created on first use.
    pub fn ledger(&mut self, stereotype: &ElementId) -> &mut StereotypeLedger {
        self.ledgers.entry(stereotype.clone()).or_default()
    }
}

fn seed_ledger(store: &dyn ModelStore, stereotype: &Element, ledger: &mut StereotypeLedger) {
    if let Some(c) = stereotype.classifier() {
        for attr in &c.attributes {
            if let Some(name) = store.lookup(attr).and_then(Element::name) {
                ledger.attributes.insert(SmolStr::new(name), attr.clone());
            }
        }
    }
    if let Some(st) = stereotype.as_stereotype() {
        for ext in &st.extensions {
            let metaclass = store
                .lookup(ext)
                .and_then(Element::as_extension)
                .and_then(|x| x.metaclass.as_ref())
                .and_then(|m| store.lookup(m))
                .and_then(Element::name);
            if let Some(name) = metaclass {
                ledger.extended.insert(SmolStr::new(name));
            }
        }
    }
}

/// Nearest enclosing profile of `id`, else its nearest package.
pub fn profile_scope(store: &dyn ModelStore, id: &ElementId) -> Option<ElementId> {
    let mut package = None;
    let mut seen = FxHashSet::default();
    let mut current = store.lookup(id).and_then(|e| e.owner.clone());
    while let Some(owner) = current {
        if !seen.insert(owner.clone()) {
            break;
        }
        let Some(el) = store.lookup(&owner) else { break };
        match el.kind() {
            ElementKind::Profile => return Some(owner),
            ElementKind::Package if package.is_none() => package = Some(owner.clone()),
            _ => {}
        }
        current = el.owner.clone();
    }
    package
}

// ============================================================================
// REGISTRATION (called by the factories)
// ============================================================================

pub fn note_profile(s: &mut Session<'_, '_>, id: &ElementId) {
    if let Some(name) = s.registry.lookup(id).and_then(Element::name) {
        let name = SmolStr::new(name);
        s.profiles.profiles.entry(name).or_insert_with(|| id.clone());
    }
}

pub fn note_stereotype(s: &mut Session<'_, '_>, id: &ElementId) {
    let name = s.registry.lookup(id).and_then(Element::name).map(SmolStr::new);
    let scope = profile_scope(s.registry.store(), id);
    if let (Some(name), Some(scope)) = (name, scope) {
        s.profiles
            .stereotypes
            .entry((scope, name))
            .or_insert_with(|| id.clone());
    }
    s.profiles.ledger(id);
}

// ============================================================================
// GET-OR-CREATE BY NAME
// ============================================================================

/// The profile named `name`, created as a root if unknown.
pub fn profile_by_name(s: &mut Session<'_, '_>, name: &str) -> ElementId {
    if let Some(id) = s.profiles.profile_named(name) {
        return id.clone();
    }
    let id = s.registry.create(ElementKind::Profile);
    s.registry.update(&id, |el| el.set_name(name));
    tracing::debug!(%id, name, "synthesized profile");
    s.profiles.profiles.insert(SmolStr::new(name), id.clone());
    id
}

/// The stereotype `name` in profile `profile_name`, created if unknown.
pub fn stereotype_by_name(s: &mut Session<'_, '_>, profile_name: &str, name: &str) -> ElementId {
    let profile = profile_by_name(s, profile_name);
    if let Some(id) = s.profiles.stereotype_named(&profile, name) {
        return id.clone();
    }
    let id = s.registry.create(ElementKind::Stereotype);
    s.registry.set_owner(&id, Some(&profile));
    s.registry.update(&id, |el| el.set_name(name));
    tracing::debug!(%id, profile = profile_name, name, "synthesized stereotype");
    s.profiles
        .stereotypes
        .insert((profile, SmolStr::new(name)), id.clone());
    s.profiles.ledger(&id);
    id
}

/// The metaclass stand-in `name` inside `scope`, created if unknown.
pub fn ensure_metaclass(s: &mut Session<'_, '_>, scope: &ElementId, name: &str) -> ElementId {
    let key = (scope.clone(), SmolStr::new(name));
    if let Some(id) = s.profiles.metaclasses.get(&key) {
        return id.clone();
    }
    let id = s.registry.create(ElementKind::Class);
    s.registry.set_owner(&id, Some(scope));
    s.registry.update(&id, |el| {
        el.set_name(name);
        if let crate::model::ElementData::Class(c) = &mut el.data {
            c.is_metaclass = true;
        }
    });
    s.profiles.metaclasses.insert(key, id.clone());
    id
}

/// Make `stereotype` extend the metaclass `metaclass`, once per name.
///
/// `extension_id` is the identifier the document gives the extension, if
/// any. Returns the extension, or None when the stereotype already extends a
/// metaclass of that name.
pub fn ensure_extension(
    s: &mut Session<'_, '_>,
    scope: &ElementId,
    stereotype: &ElementId,
    metaclass: &str,
    extension_id: Option<&str>,
) -> ImportResult<Option<ElementId>> {
    let key = SmolStr::new(metaclass);
    if s.profiles.ledger(stereotype).extended.contains(&key) {
        let same = extension_id
            .map(ElementId::from)
            .and_then(|id| s.registry.lookup(&id).and_then(Element::as_extension).cloned())
            .is_some_and(|x| x.stereotype.as_ref() == Some(stereotype));
        if !same {
            s.report(
                Diagnostic::warning(
                    codes::DUPLICATE_DECLARATION,
                    format!("stereotype already extends {metaclass}"),
                )
                .with_element(stereotype.clone()),
            );
        }
        return Ok(None);
    }

    let meta = ensure_metaclass(s, scope, metaclass);
    let ext = match extension_id {
        Some(id) => s.registry.ensure(ElementKind::Extension, id)?,
        None => s.registry.create(ElementKind::Extension),
    };
    if s.registry.lookup(&ext).is_some_and(|e| e.owner.is_none()) {
        s.registry.set_owner(&ext, Some(scope));
    }
    s.registry.update(&ext, |el| {
        if let Some(x) = el.as_extension_mut() {
            x.metaclass = Some(meta.clone());
            x.stereotype = Some(stereotype.clone());
        }
    });
    s.registry.update(stereotype, |el| {
        if let Some(st) = el.as_stereotype_mut() {
            push_unique(&mut st.extensions, ext.clone());
        }
    });
    s.profiles.ledger(stereotype).extended.insert(key);
    tracing::debug!(%stereotype, metaclass, extension = %ext, "extension");
    Ok(Some(ext))
}

// ============================================================================
// STEREOTYPE ATTRIBUTES
// ============================================================================

/// Whether an attribute of a stereotype is its metaclass end.
fn is_base_attribute(s: &Session<'_, '_>, node: NodeId) -> bool {
    let n = s.doc.node(node);
    let has_association = s.doc.reference(node, "association").is_some();
    has_association && n.name_attr().is_none_or(|name| name.starts_with("base_"))
}

/// Handle one `ownedAttribute` of a stereotype.
///
/// A base attribute becomes an Extension to a metaclass and is not kept as an
/// attribute. Anything else is a tag definition, deduplicated by name.
pub fn stereotype_attribute(
    s: &mut Session<'_, '_>,
    node: NodeId,
    stereotype: &ElementId,
) -> ImportResult<()> {
    if is_base_attribute(s, node) {
        return base_attribute(s, node, stereotype);
    }

    let doc = s.doc;
    let n = doc.node(node);
    let Some(raw) = n.xmi_id() else {
        s.unhandled(node);
        return Ok(());
    };

    let key = n.name_attr().map(SmolStr::new);
    if let Some(key) = &key {
        let existing = s.profiles.ledger(stereotype).attributes.get(key).cloned();
        if existing.is_some_and(|e| e.as_str() != raw) {
            s.report(
                Diagnostic::warning(
                    codes::DUPLICATE_DECLARATION,
                    format!("attribute '{key}' already declared on stereotype"),
                )
                .with_element(raw),
            );
            return Ok(());
        }
    }

    let id = factory::property(s, node, stereotype)?;
    if let Some(key) = key {
        s.profiles.ledger(stereotype).attributes.insert(key, id);
    }
    s.queues.cross_refs.push_back(Pending::new(node, n.parent));
    Ok(())
}

fn base_attribute(s: &mut Session<'_, '_>, node: NodeId, stereotype: &ElementId) -> ImportResult<()> {
    let doc = s.doc;
    let n = doc.node(node);
    let type_ref = doc.reference(node, "type");

    let metaclass = type_ref
        .as_ref()
        .filter(|r| r.is_external())
        .map(|r| metaclass_name(&r.id).to_string())
        .or_else(|| {
            n.name_attr()
                .and_then(|name| name.strip_prefix("base_"))
                .filter(|m| !m.is_empty())
                .map(str::to_string)
        })
        .or_else(|| {
            type_ref.as_ref().and_then(|r| {
                s.registry
                    .lookup(&ElementId::new(r.id.as_str()))
                    .and_then(Element::name)
                    .map(str::to_string)
            })
        });

    let Some(metaclass) = metaclass else {
        s.unresolved(n.xmi_id(), "metaclass", n.name_attr().unwrap_or("<anonymous>"));
        return Ok(());
    };
    let Some(scope) = profile_scope(s.registry.store(), stereotype) else {
        s.unhandled(node);
        return Ok(());
    };

    let extension_id = doc.reference(node, "association").map(|r| r.id);
    ensure_extension(s, &scope, stereotype, &metaclass, extension_id.as_deref())?;
    Ok(())
}

// ============================================================================
// SHORTHAND TABLE
// ============================================================================

/// Read a `stereotypesHREFS` block.
pub fn shorthand_table(s: &mut Session<'_, '_>, table: NodeId) -> ImportResult<()> {
    let doc = s.doc;
    for &child in &doc.node(table).children {
        match doc.node(child).local_name() {
            "stereotype" => {
                let label = doc.node(child).name_attr();
                let Some((profile, name)) = label.and_then(|l| l.split_once(':')) else {
                    s.unhandled(child);
                    continue;
                };
                let stereotype = shorthand_stereotype(s, profile, name)?;
                for tag in doc.children_named(child, "tag") {
                    shorthand_tag(s, tag, Some(&stereotype))?;
                }
            }
            "tag" => shorthand_tag(s, child, None)?,
            _ => s.unhandled(child),
        }
    }
    Ok(())
}

fn shorthand_stereotype(s: &mut Session<'_, '_>, profile: &str, name: &str) -> ImportResult<ElementId> {
    let stereotype = stereotype_by_name(s, profile, name);
    let has_extension = s
        .registry
        .lookup(&stereotype)
        .and_then(Element::as_stereotype)
        .is_some_and(|st| !st.extensions.is_empty());
    if !has_extension {
        let profile = profile_by_name(s, profile);
        ensure_extension(s, &profile, &stereotype, SHORTHAND_METACLASS, None)?;
    }
    Ok(stereotype)
}

/// A `tag[@tagName="Prof:Stereo:Tag"]` entry. Nested tags already know
/// their stereotype; sibling tags name it in the label.
fn shorthand_tag(
    s: &mut Session<'_, '_>,
    tag: NodeId,
    stereotype: Option<&ElementId>,
) -> ImportResult<()> {
    let doc = s.doc;
    let n = doc.node(tag);
    let label = n.attr("tagName").or_else(|| n.name_attr());
    let mut parts = label.map(|l| l.splitn(3, ':').collect::<Vec<_>>()).unwrap_or_default();

    let (stereotype, name) = match (stereotype, parts.len()) {
        (Some(st), _) if !parts.is_empty() => (st.clone(), parts.pop().unwrap_or_default()),
        (None, 3) => (shorthand_stereotype(s, parts[0], parts[1])?, parts[2]),
        _ => {
            s.unhandled(tag);
            return Ok(());
        }
    };
    if name.is_empty() {
        s.unhandled(tag);
        return Ok(());
    }

    let key = SmolStr::new(name);
    if s.profiles.ledger(&stereotype).attributes.contains_key(&key) {
        tracing::debug!(%stereotype, tag = name, "tag already declared");
        return Ok(());
    }

    let id = match n.attr("tagID").filter(|t| !t.is_empty()) {
        Some(tag_id) => s.registry.ensure(ElementKind::Property, tag_id)?,
        None => s.registry.create(ElementKind::Property),
    };
    s.registry.set_owner(&id, Some(&stereotype));
    s.registry.update(&id, |el| el.set_name(name));
    s.registry.update(&stereotype, |el| {
        if let Some(c) = el.classifier_mut() {
            push_unique(&mut c.attributes, id.clone());
        }
    });
    s.profiles.ledger(&stereotype).attributes.insert(key, id);
    Ok(())
}

// ============================================================================
// REFERENCED PROFILES
// ============================================================================

/// Profile name from an href's document part: `../Prof%20A.mdzip` -> `Prof A`.
pub fn profile_name_from_path(path: &str) -> Option<String> {
    let decoded = path.replace("%20", " ");
    let file = decoded.rsplit(['/', '\\']).next().unwrap_or(&decoded);
    let stem = file.rsplit_once('.').map_or(file, |(stem, _)| stem);
    (!stem.is_empty()).then(|| stem.to_string())
}

/// A `referencedProfile` entry.
pub fn referenced_profile(s: &mut Session<'_, '_>, node: NodeId) -> ImportResult<()> {
    let Some(r) = s.doc.node(node).href().and_then(Reference::from_href) else {
        s.unhandled(node);
        return Ok(());
    };
    profile_for_reference(s, &r, node);
    Ok(())
}

/// The profile a reference names: the registered profile under its
/// identifier, else the profile named after the referenced document.
pub fn profile_for_reference(
    s: &mut Session<'_, '_>,
    r: &Reference,
    from: NodeId,
) -> Option<ElementId> {
    let id = ElementId::new(r.id.as_str());
    if s.registry.kind_of(&id) == Some(ElementKind::Profile) {
        return Some(id);
    }
    match r.external.as_deref().and_then(profile_name_from_path) {
        Some(name) => Some(profile_by_name(s, &name)),
        None => {
            let doc = s.doc;
            s.unresolved(doc.node(from).xmi_id(), "profile", &r.id);
            None
        }
    }
}

// ============================================================================
// STEREOTYPE APPLICATIONS
// ============================================================================

/// Whether a root-level node is a stereotype application: its prefix is a
/// declared namespace that is not one of the interchange namespaces.
pub fn is_stereotype_application(s: &Session<'_, '_>, node: NodeId) -> bool {
    let n = s.doc.node(node);
    match n.prefix() {
        Some("xmi" | "uml" | "xsi" | "diagram") | None => false,
        Some(prefix) => s.doc.namespace(prefix).is_some() && n.xmi_id().is_some(),
    }
}

/// Turn `<Prof:Stereo xmi:id=".." base_X="el" tag="v"/>` into an instance
/// specification classified by the stereotype and attached to its base
/// element.
pub fn apply_stereotype(s: &mut Session<'_, '_>, node: NodeId) -> ImportResult<()> {
    let doc = s.doc;
    let n = doc.node(node);
    let (Some(profile_name), Some(raw)) = (n.prefix(), n.xmi_id()) else {
        s.unhandled(node);
        return Ok(());
    };
    let stereotype = s
        .profiles
        .profile_named(profile_name)
        .cloned()
        .and_then(|p| s.profiles.stereotype_named(&p, n.local_name()).cloned());
    let Some(stereotype) = stereotype else {
        s.unhandled(node);
        return Ok(());
    };

    let (instance, _) = s
        .registry
        .get_or_create(ElementKind::InstanceSpecification, raw, node)?;
    s.registry.update(&instance, |el| {
        if let Some(i) = el.as_instance_mut() {
            push_unique(&mut i.classifiers, stereotype.clone());
        }
    });

    for (key, value) in n.attrs() {
        if key.starts_with("xmi:") || key.starts_with("xmlns") {
            continue;
        }
        if key.starts_with("base_") {
            for base in value.split_whitespace() {
                let base_id = ElementId::new(base);
                let attached = s.registry.update(&base_id, |el| {
                    push_unique(&mut el.applied_stereotypes, instance.clone());
                });
                if attached.is_none() {
                    s.unresolved(Some(raw), key, base);
                }
            }
            continue;
        }
        tag_value(s, &instance, &stereotype, key, vec![value.into()])?;
    }

    // Multi-valued tags are written as child elements.
    let mut children: Vec<(&str, Vec<std::sync::Arc<str>>)> = Vec::new();
    for &child in &n.children {
        let c = doc.node(child);
        let Some(text) = c.text.as_deref() else { continue };
        match children.iter_mut().find(|(k, _)| *k == c.name) {
            Some((_, values)) => values.push(text.into()),
            None => children.push((c.name.as_str(), vec![text.into()])),
        }
    }
    for (key, values) in children {
        tag_value(s, &instance, &stereotype, key, values)?;
    }
    Ok(())
}

/// Slot of a stereotype application for the tag `key`.
fn tag_value(
    s: &mut Session<'_, '_>,
    instance: &ElementId,
    stereotype: &ElementId,
    key: &str,
    values: Vec<std::sync::Arc<str>>,
) -> ImportResult<()> {
    let feature = s
        .profiles
        .ledger(stereotype)
        .attributes
        .get(key)
        .cloned();
    let Some(feature) = feature else {
        s.unresolved(Some(instance.as_str()), key, key);
        return Ok(());
    };

    let slot = s
        .registry
        .ensure(ElementKind::Slot, &format!("{instance}.{key}"))?;
    s.registry.set_owner(&slot, Some(instance));
    s.registry.update(&slot, |el| {
        if let Some(slot) = el.as_slot_mut() {
            slot.defining_feature = Some(feature);
            slot.values = values;
        }
    });
    s.registry.update(instance, |el| {
        if let Some(i) = el.as_instance_mut() {
            push_unique(&mut i.slots, slot.clone());
        }
    });
    Ok(())
}
