//! Fatal errors roll back; lossy findings become diagnostics.

use mdimport::host::ImportHost;
use mdimport::import::{ImportError, Severity, codes};
use mdimport::model::{ElementId, ElementKind};

use crate::helpers::fixtures::{fixture, import_fixture};
use crate::helpers::model_assertions::{codes as report_codes, element};

#[test]
fn test_unresolved_references_are_reported_and_dropped() {
    let (host, report) = import_fixture("unresolved.xmi");

    let mut found = report_codes(&report);
    found.sort_unstable();
    assert_eq!(
        found,
        vec![
            codes::UNRESOLVED_REFERENCE,
            codes::UNRESOLVED_REFERENCE,
            codes::UNRESOLVED_REFERENCE,
            codes::UNRESOLVED_REFERENCE,
            codes::UNHANDLED_ELEMENT_KIND,
        ]
    );
    assert!(report.diagnostics.iter().all(|d| d.severity == Severity::Warning));
    assert!(!report.is_lossless());

    let model = host.model();
    assert!(element(&model, "_Client_gen").as_generalization().unwrap().general.is_none());
    assert!(element(&model, "_Client_peer").as_property().unwrap().type_ref.is_none());

    let dep = element(&model, "_dep").as_dependency().unwrap();
    assert_eq!(dep.client, vec![ElementId::new("_Client")]);
    assert!(dep.supplier.is_empty());

    assert!(model.get(&ElementId::new("_component")).is_none());
    assert_eq!(host.canvas().on(&ElementId::new("_main")), vec![&ElementId::new("_Client")]);
}

#[test]
fn test_diagnostics_name_the_element() {
    let (_, report) = import_fixture("unresolved.xmi");
    let general = report
        .with_code(codes::UNRESOLVED_REFERENCE)
        .find(|d| d.message.contains("_Missing"))
        .expect("missing general is reported");
    assert_eq!(general.element, Some(ElementId::new("_Client_gen")));

    let component = report
        .with_code(codes::UNHANDLED_ELEMENT_KIND)
        .next()
        .unwrap();
    assert_eq!(component.element, Some(ElementId::new("_component")));
}

#[test]
fn test_duplicate_identifier_is_fatal() {
    let mut host = ImportHost::new();
    let err = host.import_bytes(&fixture("fatal_duplicate_id.xmi")).unwrap_err();
    assert!(matches!(err, ImportError::DuplicateIdentifier(ref id) if id.as_str() == "_dup"));
    assert_eq!(host.model().element_count(), 0);
}

#[test]
fn test_untyped_package_child_is_fatal() {
    let mut host = ImportHost::new();
    let err = host.import_bytes(&fixture("fatal_untyped_child.xmi")).unwrap_err();
    assert!(matches!(err, ImportError::Malformed(_)));
    assert!(err.to_string().starts_with("malformed document"));
    assert_eq!(host.model().element_count(), 0);
}

#[test]
fn test_failed_import_leaves_previous_import_untouched() {
    let mut host = ImportHost::new();
    host.import_bytes(&fixture("diagrams.xmi")).unwrap();
    let before = host.model().clone();
    let placements = host.placements().len();

    for name in ["fatal_duplicate_id.xmi", "fatal_untyped_child.xmi"] {
        assert!(host.import_bytes(&fixture(name)).is_err(), "{name}");
        assert_eq!(*host.model(), before, "{name}");
        assert_eq!(host.placements().len(), placements, "{name}");
    }
    assert!(host.model().find_unique(ElementKind::Class, "Kept").is_none());
}

#[test]
fn test_identifier_reused_for_another_kind_is_fatal() {
    let mut host = ImportHost::new();
    host.import_bytes(&fixture("generalization.xmi")).unwrap();

    let err = host
        .import_bytes(
            br#"<uml:Model xmlns:xmi="x" xmlns:uml="u" xmi:type="uml:Model" xmi:id="_other">
  <packagedElement xmi:type="uml:Interface" xmi:id="_A" name="A"/>
</uml:Model>"#,
        )
        .unwrap_err();
    assert!(matches!(err, ImportError::DuplicateIdentifier(_)));
    assert!(host.model().get(&ElementId::new("_other")).is_none());
}

#[test]
fn test_not_well_formed_xml() {
    let mut host = ImportHost::new();
    let err = host.import_bytes(b"<xmi:XMI><uml:Model></xmi:XMI>").unwrap_err();
    assert!(matches!(err, ImportError::Malformed(_)));
}
