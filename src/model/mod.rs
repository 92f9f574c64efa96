//! In-memory UML model graph.
//!
//! This module provides the element types the importer materializes and the
//! [`ModelStore`] interface it mutates them through. Elements reference each
//! other by [`ElementId`] only, never by address, so a reference can be
//! recorded before its target has been created.
//!
//! ## Design
//!
//! ```text
//! Element
//! ├── id, name, owner, owned_elements, visibility   (common to every kind)
//! ├── comments, applied_stereotypes
//! └── data: ElementData                             (one variant per kind)
//! ```
//!
//! [`ElementData`] is a closed enum: every kind the importer can produce has
//! exactly one variant, and code that needs kind-specific fields matches on it.

mod store;

pub use store::{Model, ModelStore, StoreError};

use std::sync::Arc;

// ============================================================================
// IDs
// ============================================================================

/// Unique identifier for a model element.
///
/// This corresponds to `xmi:id` in the source document. Elements invented by
/// the importer get a generated UUID instead.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub Arc<str>);

impl ElementId {
    /// Create a new element ID.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier for an element with no source identifier.
    pub fn generate() -> Self {
        Self(format!("_synth_{}", uuid::Uuid::new_v4().simple()).into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

// ============================================================================
// ELEMENT KINDS
// ============================================================================

/// The metaclass of a model element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    // Containers
    Package,
    Profile,

    // Classifiers
    Class,
    Interface,
    DataType,
    Enumeration,
    Actor,
    UseCase,
    Stereotype,

    // Features
    EnumerationLiteral,
    Property,
    Operation,
    Parameter,

    // Relationships
    Association,
    Generalization,
    Realization,
    InterfaceRealization,
    Dependency,
    Abstraction,
    Include,
    Extension,

    // Instances
    InstanceSpecification,
    Slot,

    // Annotations and views
    Comment,
    Diagram,
}

impl ElementKind {
    /// Returns true if this kind can own attributes and generalizations.
    pub fn is_classifier(&self) -> bool {
        matches!(
            self,
            Self::Class
                | Self::Interface
                | Self::DataType
                | Self::Enumeration
                | Self::Actor
                | Self::UseCase
                | Self::Stereotype
        )
    }

    /// Returns true if this kind is a package-like container.
    pub fn is_package(&self) -> bool {
        matches!(self, Self::Package | Self::Profile)
    }

    /// Returns true if this kind is drawn as a link between two other
    /// elements rather than as a node.
    pub fn is_relationship(&self) -> bool {
        matches!(
            self,
            Self::Association
                | Self::Generalization
                | Self::Realization
                | Self::InterfaceRealization
                | Self::Dependency
                | Self::Abstraction
                | Self::Include
                | Self::Extension
        )
    }

    /// UML metaclass name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Package => "Package",
            Self::Profile => "Profile",
            Self::Class => "Class",
            Self::Interface => "Interface",
            Self::DataType => "DataType",
            Self::Enumeration => "Enumeration",
            Self::Actor => "Actor",
            Self::UseCase => "UseCase",
            Self::Stereotype => "Stereotype",
            Self::EnumerationLiteral => "EnumerationLiteral",
            Self::Property => "Property",
            Self::Operation => "Operation",
            Self::Parameter => "Parameter",
            Self::Association => "Association",
            Self::Generalization => "Generalization",
            Self::Realization => "Realization",
            Self::InterfaceRealization => "InterfaceRealization",
            Self::Dependency => "Dependency",
            Self::Abstraction => "Abstraction",
            Self::Include => "Include",
            Self::Extension => "Extension",
            Self::InstanceSpecification => "InstanceSpecification",
            Self::Slot => "Slot",
            Self::Comment => "Comment",
            Self::Diagram => "Diagram",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Visibility of a named element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Private,
    Protected,
    Package,
}

impl Visibility {
    /// Parse the `visibility` attribute value.
    pub fn from_xmi(value: &str) -> Option<Self> {
        match value {
            "public" => Some(Self::Public),
            "private" => Some(Self::Private),
            "protected" => Some(Self::Protected),
            "package" => Some(Self::Package),
            _ => None,
        }
    }
}

/// Aggregation of a property end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Aggregation {
    #[default]
    None,
    Shared,
    Composite,
}

impl Aggregation {
    pub fn from_xmi(value: &str) -> Option<Self> {
        match value {
            "none" => Some(Self::None),
            "shared" => Some(Self::Shared),
            "composite" => Some(Self::Composite),
            _ => None,
        }
    }
}

/// Direction of an operation parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ParameterDirection {
    #[default]
    In,
    InOut,
    Out,
    Return,
}

impl ParameterDirection {
    pub fn from_xmi(value: &str) -> Option<Self> {
        match value {
            "in" => Some(Self::In),
            "inout" => Some(Self::InOut),
            "out" => Some(Self::Out),
            "return" => Some(Self::Return),
            _ => None,
        }
    }
}

// ============================================================================
// KIND-SPECIFIC DATA
// ============================================================================

/// Package and profile data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PackageData {
    /// Profiles applied to this package, in application order.
    pub applied_profiles: Vec<ElementId>,
}

/// Fields shared by every classifier kind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassifierData {
    pub is_abstract: bool,
    pub is_leaf: bool,
    /// Owned attributes in document order.
    pub attributes: Vec<ElementId>,
    /// Owned operations in document order.
    pub operations: Vec<ElementId>,
    /// Generalizations whose specific end is this classifier.
    pub generalizations: Vec<ElementId>,
    /// Interface realizations owned by this classifier.
    pub interface_realizations: Vec<ElementId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassData {
    pub classifier: ClassifierData,
    /// Set on the classes the importer synthesizes to stand for UML
    /// metaclasses (the `Class` an Extension points at).
    pub is_metaclass: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnumerationData {
    pub classifier: ClassifierData,
    pub literals: Vec<ElementId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UseCaseData {
    pub classifier: ClassifierData,
    pub includes: Vec<ElementId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StereotypeData {
    pub classifier: ClassifierData,
    /// Extensions that make this stereotype applicable to a metaclass.
    pub extensions: Vec<ElementId>,
}

/// Multiplicity bounds as they appear in the document.
///
/// `lower` is `"0"` when the bound is present without a value; `upper` is
/// `None` when absent, which reads as unbounded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Multiplicity {
    pub lower: Option<Arc<str>>,
    pub upper: Option<Arc<str>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyData {
    /// Linked type element.
    pub type_ref: Option<ElementId>,
    /// Primitive type label (`String`, `Integer`, ...). Primitive types are
    /// kept as a label, never as an edge.
    pub type_name: Option<Arc<str>>,
    pub association: Option<ElementId>,
    pub multiplicity: Multiplicity,
    pub aggregation: Aggregation,
    pub is_static: bool,
    pub is_read_only: bool,
    pub is_derived: bool,
    pub default_value: Option<Arc<str>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct OperationData {
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_query: bool,
    pub parameters: Vec<ElementId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterData {
    pub type_ref: Option<ElementId>,
    pub type_name: Option<Arc<str>>,
    pub direction: ParameterDirection,
    pub multiplicity: Multiplicity,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssociationData {
    /// Member ends in document order, without duplicates.
    pub member_ends: Vec<ElementId>,
    /// The subset of member ends owned by the association itself.
    pub owned_ends: Vec<ElementId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeneralizationData {
    pub specific: Option<ElementId>,
    pub general: Option<ElementId>,
}

/// Client/supplier pair used by dependencies, realizations and abstractions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DependencyData {
    pub client: Vec<ElementId>,
    pub supplier: Vec<ElementId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InterfaceRealizationData {
    pub dependency: DependencyData,
    pub contract: Option<ElementId>,
    pub implementing_classifier: Option<ElementId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct IncludeData {
    pub including_case: Option<ElementId>,
    pub addition: Option<ElementId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExtensionData {
    pub metaclass: Option<ElementId>,
    pub stereotype: Option<ElementId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InstanceSpecificationData {
    pub classifiers: Vec<ElementId>,
    pub slots: Vec<ElementId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SlotData {
    pub defining_feature: Option<ElementId>,
    pub values: Vec<Arc<str>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommentData {
    pub body: Option<Arc<str>>,
    pub annotated_elements: Vec<ElementId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DiagramData {
    /// Representation type, e.g. `Class Diagram`.
    pub diagram_type: Option<Arc<str>>,
    /// Other diagrams shown on this one, without duplicates or self.
    pub nested_diagrams: Vec<ElementId>,
    /// Everything placed on this diagram, in placement order.
    pub shown: Vec<ElementId>,
}

/// Kind-specific payload of an [`Element`].
#[derive(Clone, Debug, PartialEq)]
pub enum ElementData {
    Package(PackageData),
    Profile(PackageData),
    Class(ClassData),
    Interface(ClassifierData),
    DataType(ClassifierData),
    Enumeration(EnumerationData),
    Actor(ClassifierData),
    UseCase(UseCaseData),
    Stereotype(StereotypeData),
    EnumerationLiteral,
    Property(PropertyData),
    Operation(OperationData),
    Parameter(ParameterData),
    Association(AssociationData),
    Generalization(GeneralizationData),
    Realization(DependencyData),
    InterfaceRealization(InterfaceRealizationData),
    Dependency(DependencyData),
    Abstraction(DependencyData),
    Include(IncludeData),
    Extension(ExtensionData),
    InstanceSpecification(InstanceSpecificationData),
    Slot(SlotData),
    Comment(CommentData),
    Diagram(DiagramData),
}

impl ElementData {
    /// Empty payload for a freshly created element of `kind`.
    pub fn new(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Package => Self::Package(PackageData::default()),
            ElementKind::Profile => Self::Profile(PackageData::default()),
            ElementKind::Class => Self::Class(ClassData::default()),
            ElementKind::Interface => Self::Interface(ClassifierData::default()),
            ElementKind::DataType => Self::DataType(ClassifierData::default()),
            ElementKind::Enumeration => Self::Enumeration(EnumerationData::default()),
            ElementKind::Actor => Self::Actor(ClassifierData::default()),
            ElementKind::UseCase => Self::UseCase(UseCaseData::default()),
            ElementKind::Stereotype => Self::Stereotype(StereotypeData::default()),
            ElementKind::EnumerationLiteral => Self::EnumerationLiteral,
            ElementKind::Property => Self::Property(PropertyData::default()),
            ElementKind::Operation => Self::Operation(OperationData::default()),
            ElementKind::Parameter => Self::Parameter(ParameterData::default()),
            ElementKind::Association => Self::Association(AssociationData::default()),
            ElementKind::Generalization => Self::Generalization(GeneralizationData::default()),
            ElementKind::Realization => Self::Realization(DependencyData::default()),
            ElementKind::InterfaceRealization => {
                Self::InterfaceRealization(InterfaceRealizationData::default())
            }
            ElementKind::Dependency => Self::Dependency(DependencyData::default()),
            ElementKind::Abstraction => Self::Abstraction(DependencyData::default()),
            ElementKind::Include => Self::Include(IncludeData::default()),
            ElementKind::Extension => Self::Extension(ExtensionData::default()),
            ElementKind::InstanceSpecification => {
                Self::InstanceSpecification(InstanceSpecificationData::default())
            }
            ElementKind::Slot => Self::Slot(SlotData::default()),
            ElementKind::Comment => Self::Comment(CommentData::default()),
            ElementKind::Diagram => Self::Diagram(DiagramData::default()),
        }
    }

    /// The kind this payload belongs to.
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Package(_) => ElementKind::Package,
            Self::Profile(_) => ElementKind::Profile,
            Self::Class(_) => ElementKind::Class,
            Self::Interface(_) => ElementKind::Interface,
            Self::DataType(_) => ElementKind::DataType,
            Self::Enumeration(_) => ElementKind::Enumeration,
            Self::Actor(_) => ElementKind::Actor,
            Self::UseCase(_) => ElementKind::UseCase,
            Self::Stereotype(_) => ElementKind::Stereotype,
            Self::EnumerationLiteral => ElementKind::EnumerationLiteral,
            Self::Property(_) => ElementKind::Property,
            Self::Operation(_) => ElementKind::Operation,
            Self::Parameter(_) => ElementKind::Parameter,
            Self::Association(_) => ElementKind::Association,
            Self::Generalization(_) => ElementKind::Generalization,
            Self::Realization(_) => ElementKind::Realization,
            Self::InterfaceRealization(_) => ElementKind::InterfaceRealization,
            Self::Dependency(_) => ElementKind::Dependency,
            Self::Abstraction(_) => ElementKind::Abstraction,
            Self::Include(_) => ElementKind::Include,
            Self::Extension(_) => ElementKind::Extension,
            Self::InstanceSpecification(_) => ElementKind::InstanceSpecification,
            Self::Slot(_) => ElementKind::Slot,
            Self::Comment(_) => ElementKind::Comment,
            Self::Diagram(_) => ElementKind::Diagram,
        }
    }
}

// ============================================================================
// ELEMENT
// ============================================================================

/// A model element.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// The declared name (may be None for anonymous elements).
    pub name: Option<Arc<str>>,
    /// The owning package or classifier (None for roots).
    pub owner: Option<ElementId>,
    /// IDs of directly owned elements, in containment order.
    pub owned_elements: Vec<ElementId>,
    pub visibility: Option<Visibility>,
    /// Comments annotating this element.
    pub comments: Vec<ElementId>,
    /// Stereotype application instances whose base element is this one.
    pub applied_stereotypes: Vec<ElementId>,
    /// Kind-specific payload.
    pub data: ElementData,
}

impl Element {
    /// Create a new element with the given ID and kind.
    pub fn new(id: impl Into<ElementId>, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            name: None,
            owner: None,
            owned_elements: Vec::new(),
            visibility: None,
            comments: Vec::new(),
            applied_stereotypes: Vec::new(),
            data: ElementData::new(kind),
        }
    }

    /// The metaclass of this element.
    pub fn kind(&self) -> ElementKind {
        self.data.kind()
    }

    /// Set the name.
    pub fn with_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the owner.
    pub fn with_owner(mut self, owner: impl Into<ElementId>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// The declared name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<Arc<str>>) {
        self.name = Some(name.into());
    }

    // ── Classifier access ───────────────────────────────────────────

    /// Classifier fields, for every classifier kind.
    pub fn classifier(&self) -> Option<&ClassifierData> {
        match &self.data {
            ElementData::Class(c) => Some(&c.classifier),
            ElementData::Enumeration(e) => Some(&e.classifier),
            ElementData::UseCase(u) => Some(&u.classifier),
            ElementData::Stereotype(s) => Some(&s.classifier),
            ElementData::Interface(c) | ElementData::DataType(c) | ElementData::Actor(c) => {
                Some(c)
            }
            _ => None,
        }
    }

    pub fn classifier_mut(&mut self) -> Option<&mut ClassifierData> {
        match &mut self.data {
            ElementData::Class(c) => Some(&mut c.classifier),
            ElementData::Enumeration(e) => Some(&mut e.classifier),
            ElementData::UseCase(u) => Some(&mut u.classifier),
            ElementData::Stereotype(s) => Some(&mut s.classifier),
            ElementData::Interface(c) | ElementData::DataType(c) | ElementData::Actor(c) => {
                Some(c)
            }
            _ => None,
        }
    }

    /// Whether the element is an abstract classifier (false for everything else).
    pub fn is_abstract(&self) -> bool {
        self.classifier().is_some_and(|c| c.is_abstract)
    }

    // ── Kind-specific access ────────────────────────────────────────

    pub fn as_package(&self) -> Option<&PackageData> {
        match &self.data {
            ElementData::Package(p) | ElementData::Profile(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_package_mut(&mut self) -> Option<&mut PackageData> {
        match &mut self.data {
            ElementData::Package(p) | ElementData::Profile(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassData> {
        match &self.data {
            ElementData::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_stereotype(&self) -> Option<&StereotypeData> {
        match &self.data {
            ElementData::Stereotype(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_stereotype_mut(&mut self) -> Option<&mut StereotypeData> {
        match &mut self.data {
            ElementData::Stereotype(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&PropertyData> {
        match &self.data {
            ElementData::Property(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_property_mut(&mut self) -> Option<&mut PropertyData> {
        match &mut self.data {
            ElementData::Property(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_operation_mut(&mut self) -> Option<&mut OperationData> {
        match &mut self.data {
            ElementData::Operation(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_parameter(&self) -> Option<&ParameterData> {
        match &self.data {
            ElementData::Parameter(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_parameter_mut(&mut self) -> Option<&mut ParameterData> {
        match &mut self.data {
            ElementData::Parameter(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_association(&self) -> Option<&AssociationData> {
        match &self.data {
            ElementData::Association(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_association_mut(&mut self) -> Option<&mut AssociationData> {
        match &mut self.data {
            ElementData::Association(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_generalization(&self) -> Option<&GeneralizationData> {
        match &self.data {
            ElementData::Generalization(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_generalization_mut(&mut self) -> Option<&mut GeneralizationData> {
        match &mut self.data {
            ElementData::Generalization(g) => Some(g),
            _ => None,
        }
    }

    /// Client/supplier data of dependencies, realizations, abstractions and
    /// interface realizations.
    pub fn as_dependency(&self) -> Option<&DependencyData> {
        match &self.data {
            ElementData::Dependency(d)
            | ElementData::Realization(d)
            | ElementData::Abstraction(d) => Some(d),
            ElementData::InterfaceRealization(r) => Some(&r.dependency),
            _ => None,
        }
    }

    pub fn as_dependency_mut(&mut self) -> Option<&mut DependencyData> {
        match &mut self.data {
            ElementData::Dependency(d)
            | ElementData::Realization(d)
            | ElementData::Abstraction(d) => Some(d),
            ElementData::InterfaceRealization(r) => Some(&mut r.dependency),
            _ => None,
        }
    }

    pub fn as_interface_realization(&self) -> Option<&InterfaceRealizationData> {
        match &self.data {
            ElementData::InterfaceRealization(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_interface_realization_mut(&mut self) -> Option<&mut InterfaceRealizationData> {
        match &mut self.data {
            ElementData::InterfaceRealization(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_enumeration(&self) -> Option<&EnumerationData> {
        match &self.data {
            ElementData::Enumeration(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_enumeration_mut(&mut self) -> Option<&mut EnumerationData> {
        match &mut self.data {
            ElementData::Enumeration(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_use_case(&self) -> Option<&UseCaseData> {
        match &self.data {
            ElementData::UseCase(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_use_case_mut(&mut self) -> Option<&mut UseCaseData> {
        match &mut self.data {
            ElementData::UseCase(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_operation(&self) -> Option<&OperationData> {
        match &self.data {
            ElementData::Operation(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_include(&self) -> Option<&IncludeData> {
        match &self.data {
            ElementData::Include(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_include_mut(&mut self) -> Option<&mut IncludeData> {
        match &mut self.data {
            ElementData::Include(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_extension(&self) -> Option<&ExtensionData> {
        match &self.data {
            ElementData::Extension(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_extension_mut(&mut self) -> Option<&mut ExtensionData> {
        match &mut self.data {
            ElementData::Extension(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&InstanceSpecificationData> {
        match &self.data {
            ElementData::InstanceSpecification(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_instance_mut(&mut self) -> Option<&mut InstanceSpecificationData> {
        match &mut self.data {
            ElementData::InstanceSpecification(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_slot(&self) -> Option<&SlotData> {
        match &self.data {
            ElementData::Slot(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_slot_mut(&mut self) -> Option<&mut SlotData> {
        match &mut self.data {
            ElementData::Slot(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_comment(&self) -> Option<&CommentData> {
        match &self.data {
            ElementData::Comment(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_comment_mut(&mut self) -> Option<&mut CommentData> {
        match &mut self.data {
            ElementData::Comment(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_diagram(&self) -> Option<&DiagramData> {
        match &self.data {
            ElementData::Diagram(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_diagram_mut(&mut self) -> Option<&mut DiagramData> {
        match &mut self.data {
            ElementData::Diagram(d) => Some(d),
            _ => None,
        }
    }
}

/// Push `id` onto `list` unless it is already present.
///
/// Returns true when the list changed.
pub(crate) fn push_unique(list: &mut Vec<ElementId>, id: ElementId) -> bool {
    if list.contains(&id) {
        false
    } else {
        list.push(id);
        true
    }
}
