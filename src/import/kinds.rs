//! The closed table of source element kinds.
//!
//! Every `xmi:type` the walker can meet maps to one [`SourceKind`] variant.
//! Kinds the importer deliberately does not model still get a variant, so
//! the walker's dispatch is an exhaustive match and a gap in the table is a
//! compile error rather than a silent fallthrough. Anything outside the table
//! is [`SourceKind::Unknown`].

use crate::model::ElementKind;

/// Element kind as declared by a document node's `xmi:type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    // Containers
    Model,
    Package,
    Profile,

    // Classifiers
    Class,
    Interface,
    DataType,
    PrimitiveType,
    Enumeration,
    Actor,
    UseCase,
    Stereotype,

    // Features
    EnumerationLiteral,
    Property,
    Port,
    Operation,
    Parameter,

    // Relationships
    Association,
    Generalization,
    InterfaceRealization,
    Realization,
    Dependency,
    Usage,
    Abstraction,
    Include,
    Extension,
    ExtensionEnd,
    ProfileApplication,

    // Instances
    InstanceSpecification,
    Slot,

    // Annotations and views
    Comment,
    Diagram,

    // Value specifications (read in place by their owner)
    LiteralInteger,
    LiteralUnlimitedNatural,
    LiteralString,
    LiteralBoolean,
    LiteralReal,
    OpaqueExpression,
    InstanceValue,

    // Recognized but deliberately not modeled
    Component,
    InformationFlow,
    TemplateBinding,
    Constraint,
    Extend,
    Signal,
    Behavior,

    /// Not in the table at all.
    Unknown,
}

impl SourceKind {
    /// Classify an `xmi:type` value (`uml:Class`, or bare `Class`).
    pub fn from_xmi_type(xmi_type: &str) -> Self {
        let type_name = xmi_type.rsplit(':').next().unwrap_or(xmi_type);

        match type_name {
            "Model" => Self::Model,
            "Package" => Self::Package,
            "Profile" => Self::Profile,
            "Class" => Self::Class,
            "Interface" => Self::Interface,
            "DataType" => Self::DataType,
            "PrimitiveType" => Self::PrimitiveType,
            "Enumeration" => Self::Enumeration,
            "Actor" => Self::Actor,
            "UseCase" => Self::UseCase,
            "Stereotype" => Self::Stereotype,
            "EnumerationLiteral" => Self::EnumerationLiteral,
            "Property" => Self::Property,
            "Port" => Self::Port,
            "Operation" => Self::Operation,
            "Parameter" => Self::Parameter,
            "Association" | "AssociationClass" => Self::Association,
            "Generalization" => Self::Generalization,
            "InterfaceRealization" => Self::InterfaceRealization,
            "Realization" | "ComponentRealization" => Self::Realization,
            "Dependency" => Self::Dependency,
            "Usage" => Self::Usage,
            "Abstraction" => Self::Abstraction,
            "Include" => Self::Include,
            "Extension" => Self::Extension,
            "ExtensionEnd" => Self::ExtensionEnd,
            "ProfileApplication" => Self::ProfileApplication,
            "InstanceSpecification" => Self::InstanceSpecification,
            "Slot" => Self::Slot,
            "Comment" => Self::Comment,
            "Diagram" => Self::Diagram,
            "LiteralInteger" => Self::LiteralInteger,
            "LiteralUnlimitedNatural" => Self::LiteralUnlimitedNatural,
            "LiteralString" => Self::LiteralString,
            "LiteralBoolean" => Self::LiteralBoolean,
            "LiteralReal" => Self::LiteralReal,
            "OpaqueExpression" => Self::OpaqueExpression,
            "InstanceValue" => Self::InstanceValue,
            "Component" => Self::Component,
            "InformationFlow" => Self::InformationFlow,
            "TemplateBinding" => Self::TemplateBinding,
            "Constraint" => Self::Constraint,
            "Extend" => Self::Extend,
            "Signal" => Self::Signal,
            "Activity" | "StateMachine" | "Interaction" | "OpaqueBehavior"
            | "FunctionBehavior" => Self::Behavior,
            _ => Self::Unknown,
        }
    }

    /// The model element kind this source kind materializes as, if it is
    /// materialized as an element of its own.
    pub fn element_kind(&self) -> Option<ElementKind> {
        match self {
            Self::Model | Self::Package => Some(ElementKind::Package),
            Self::Profile => Some(ElementKind::Profile),
            Self::Class => Some(ElementKind::Class),
            Self::Interface => Some(ElementKind::Interface),
            Self::DataType | Self::PrimitiveType => Some(ElementKind::DataType),
            Self::Enumeration => Some(ElementKind::Enumeration),
            Self::Actor => Some(ElementKind::Actor),
            Self::UseCase => Some(ElementKind::UseCase),
            Self::Stereotype => Some(ElementKind::Stereotype),
            Self::EnumerationLiteral => Some(ElementKind::EnumerationLiteral),
            Self::Property | Self::Port | Self::ExtensionEnd => Some(ElementKind::Property),
            Self::Operation => Some(ElementKind::Operation),
            Self::Parameter => Some(ElementKind::Parameter),
            Self::Association => Some(ElementKind::Association),
            Self::Generalization => Some(ElementKind::Generalization),
            Self::InterfaceRealization => Some(ElementKind::InterfaceRealization),
            Self::Realization => Some(ElementKind::Realization),
            Self::Dependency | Self::Usage => Some(ElementKind::Dependency),
            Self::Abstraction => Some(ElementKind::Abstraction),
            Self::Include => Some(ElementKind::Include),
            Self::Extension => Some(ElementKind::Extension),
            Self::InstanceSpecification => Some(ElementKind::InstanceSpecification),
            Self::Slot => Some(ElementKind::Slot),
            Self::Comment => Some(ElementKind::Comment),
            Self::Diagram => Some(ElementKind::Diagram),
            Self::ProfileApplication
            | Self::LiteralInteger
            | Self::LiteralUnlimitedNatural
            | Self::LiteralString
            | Self::LiteralBoolean
            | Self::LiteralReal
            | Self::OpaqueExpression
            | Self::InstanceValue
            | Self::Component
            | Self::InformationFlow
            | Self::TemplateBinding
            | Self::Constraint
            | Self::Extend
            | Self::Signal
            | Self::Behavior
            | Self::Unknown => None,
        }
    }

    /// Whether this kind may legally appear as a `packagedElement`.
    ///
    /// Features, value specifications and owned relationships are only valid
    /// under their classifier; finding one directly in a package means the
    /// subtree is not shaped the way the walker relies on.
    pub fn is_packageable(&self) -> bool {
        !matches!(
            self,
            Self::EnumerationLiteral
                | Self::Property
                | Self::Port
                | Self::Operation
                | Self::Parameter
                | Self::Generalization
                | Self::InterfaceRealization
                | Self::Include
                | Self::ExtensionEnd
                | Self::ProfileApplication
                | Self::Slot
                | Self::LiteralInteger
                | Self::LiteralUnlimitedNatural
                | Self::LiteralString
                | Self::LiteralBoolean
                | Self::LiteralReal
                | Self::OpaqueExpression
                | Self::InstanceValue
        )
    }
}

// ============================================================================
// PRIMITIVE TYPES
// ============================================================================

/// UML primitive types that are imported as a type label instead of an edge.
pub const PRIMITIVE_TYPES: &[&str] = &["String", "Integer", "Boolean", "Real", "UnlimitedNatural"];

/// Map an href fragment to a primitive type label.
///
/// Accepts the bare name (`PrimitiveTypes.xmi#String`) and tool-specific ids
/// that end in the name after a `-` or `_` separator
/// (`..._PrimitiveType-String`).
pub fn primitive_type_name(fragment: &str) -> Option<&'static str> {
    PRIMITIVE_TYPES.iter().copied().find(|p| {
        fragment == *p
            || fragment
                .strip_suffix(p)
                .is_some_and(|head| head.ends_with('-') || head.ends_with('_'))
    })
}

/// Map a reference to a UML metaclass (`UML.xmi#Class`) to its name.
pub fn metaclass_name(fragment: &str) -> &str {
    fragment
        .rsplit(['-', '.'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(fragment)
}
