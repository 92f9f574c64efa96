//! Diagram placement order, nested diagrams and self references.

use mdimport::import::codes;
use mdimport::model::ElementId;

use crate::helpers::fixtures::{import_fixture, import_str};
use crate::helpers::model_assertions::element;

fn id(s: &str) -> ElementId {
    ElementId::new(s)
}

#[test]
fn test_nodes_then_links_then_nested_diagrams() {
    let (host, report) = import_fixture("diagrams.xmi");

    let placed: Vec<(&str, &str)> = host
        .placements()
        .iter()
        .map(|p| (p.diagram.as_str(), p.element.as_str()))
        .collect();
    assert_eq!(
        placed,
        vec![
            ("_overview", "_Car"),
            ("_overview", "_Engine"),
            ("_overview", "_Sports"),
            ("_overview", "_assoc"),
            ("_overview", "_Sports_gen"),
            ("_detail", "_Engine"),
            ("_overview", "_detail"),
            ("_detail", "_overview"),
        ]
    );
    assert_eq!(report.placements, placed.len());
    assert!(host.placements().iter().all(|p| p.x == 0.0 && p.y == 0.0));
}

#[test]
fn test_link_listed_before_its_ends_is_placed_after_them() {
    let (host, _) = import_fixture("diagrams.xmi");
    let canvas = host.canvas();
    let overview = id("_overview");

    let link = canvas.position_of(&overview, &id("_assoc")).unwrap();
    for end in ["_Car", "_Engine"] {
        assert!(canvas.position_of(&overview, &id(end)).unwrap() < link, "{end}");
    }
}

#[test]
fn test_properties_are_never_placed() {
    let (host, _) = import_fixture("diagrams.xmi");
    assert!(
        host.placements()
            .iter()
            .all(|p| p.element.as_str() != "_Car_engine")
    );
}

#[test]
fn test_self_reference_is_skipped_once() {
    let (host, report) = import_fixture("diagrams.xmi");
    assert_eq!(report.with_code(codes::SELF_REFERENCE).count(), 1);
    assert!(report.is_lossless());

    let model = host.model();
    let overview = element(&model, "_overview").as_diagram().unwrap();
    assert_eq!(overview.nested_diagrams, vec![id("_detail")]);
    assert_eq!(overview.diagram_type.as_deref(), Some("Class Diagram"));

    let detail = element(&model, "_detail").as_diagram().unwrap();
    assert_eq!(detail.nested_diagrams, vec![id("_overview")]);

    assert!(
        host.placements()
            .iter()
            .all(|p| p.diagram != p.element)
    );
}

#[test]
fn test_diagram_owner_is_the_declaring_element() {
    let (host, _) = import_fixture("diagrams.xmi");
    let model = host.model();
    assert_eq!(element(&model, "_overview").owner, Some(id("_model")));
    assert_eq!(element(&model, "_detail").owner, Some(id("_model")));
}

#[test]
fn test_repeated_used_object_is_placed_once() {
    let (host, report) = import_str(
        r##"<uml:Model xmlns:xmi="x" xmlns:uml="u" xmlns:diagram="d" xmi:type="uml:Model" xmi:id="_m">
  <packagedElement xmi:type="uml:Class" xmi:id="_a" name="A"/>
  <packagedElement xmi:type="uml:Class" xmi:id="_b" name="B">
    <xmi:Extension>
      <modelExtension>
        <ownedDiagram xmi:type="uml:Diagram" xmi:id="_d" name="Inside B">
          <xmi:Extension>
            <diagramRepresentation>
              <diagram:DiagramRepresentationObject type="Class Diagram">
                <usedObjects href="#_a"/>
                <usedObjects xmi:idref="_b"/>
                <usedObjects href="#_a"/>
              </diagram:DiagramRepresentationObject>
            </diagramRepresentation>
          </xmi:Extension>
        </ownedDiagram>
      </modelExtension>
    </xmi:Extension>
  </packagedElement>
</uml:Model>"##,
    );
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    assert_eq!(host.canvas().on(&id("_d")), vec![&id("_a"), &id("_b")]);
    assert_eq!(element(&host.model(), "_d").owner, Some(id("_b")));
}

#[test]
fn test_diagram_without_representation_places_nothing() {
    let (host, report) = import_str(
        r#"<uml:Model xmlns:xmi="x" xmlns:uml="u" xmi:type="uml:Model" xmi:id="_m">
  <xmi:Extension>
    <modelExtension>
      <ownedDiagram xmi:type="uml:Diagram" xmi:id="_empty" name="Empty"/>
    </modelExtension>
  </xmi:Extension>
</uml:Model>"#,
    );
    assert!(report.diagnostics.is_empty());
    assert!(host.placements().is_empty());
    assert!(element(&host.model(), "_empty").as_diagram().is_some());
}
