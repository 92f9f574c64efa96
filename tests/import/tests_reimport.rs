//! Importing the same document twice into one model.

use mdimport::host::ImportHost;
use mdimport::model::ElementId;
use rstest::rstest;

use crate::helpers::fixtures::fixture;

#[rstest]
#[case("generalization.xmi")]
#[case("profile.xmi")]
#[case("shorthand.xmi")]
#[case("diagrams.xmi")]
fn test_second_import_creates_nothing(#[case] name: &str) {
    let mut host = ImportHost::new();
    let first = host.import_bytes(&fixture(name)).unwrap();
    let after_first = host.model().clone();
    let placed = host.placements().len();
    assert!(first.created > 0);
    assert_eq!(first.created, after_first.element_count());
    assert_eq!(first.placements, placed);

    let second = host.import_bytes(&fixture(name)).unwrap();
    assert_eq!(second.created, 0, "{name}");
    assert_eq!(second.placements, 0, "{name}");
    assert_eq!(second.warnings().count(), 0, "{:?}", second.diagnostics);
    assert_eq!(*host.model(), after_first, "{name}");
    assert_eq!(host.placements().len(), placed, "{name}");
}

#[test]
fn test_reimport_places_only_new_diagram_contents() {
    let mut host = ImportHost::new();
    host.import_bytes(&fixture("diagrams.xmi")).unwrap();
    let overview = ElementId::new("_overview");
    let shown = host.model().get(&overview).unwrap().as_diagram().unwrap().shown.clone();
    assert_eq!(shown.len(), host.canvas().on(&overview).len());

    let second = host.import_bytes(&fixture("diagrams.xmi")).unwrap();
    assert_eq!(second.placements, 0);
    assert_eq!(host.canvas().on(&overview).len(), shown.len());
}

#[test]
fn test_shorthand_after_explicit_profile_reuses_it() {
    let mut host = ImportHost::new();
    host.import_bytes(&fixture("profile.xmi")).unwrap();

    let report = host
        .import_bytes(
            br#"<xmi:XMI xmlns:xmi="x" xmlns:uml="u" xmlns:P="p">
  <uml:Model xmi:type="uml:Model" xmi:id="_more" name="More">
    <packagedElement xmi:type="uml:Class" xmi:id="_Valve" name="Valve"/>
  </uml:Model>
  <xmi:Extension>
    <stereotypesHREFS>
      <stereotype name="P:S">
        <tag tagName="P:S:color"/>
        <tag tagName="P:S:pressure"/>
      </stereotype>
    </stereotypesHREFS>
  </xmi:Extension>
  <P:S xmi:id="_valve_app" base_Class="_Valve" pressure="high"/>
</xmi:XMI>"#,
        )
        .unwrap();
    assert!(report.is_lossless(), "{:?}", report.diagnostics);

    let model = host.model();
    assert_eq!(model.find_by_name("P").len(), 1);
    let s = model.get(&"_S".into()).unwrap();
    let st = s.as_stereotype().unwrap();
    // The explicit extension to Class already exists; no Element stand-in.
    assert_eq!(st.extensions.len(), 1);
    assert!(model.find_by_name("Element").is_empty());

    let attributes = &s.classifier().unwrap().attributes;
    assert_eq!(attributes.len(), 2);
    assert_eq!(attributes[0].as_str(), "_S_color");

    let valve = model.get(&"_Valve".into()).unwrap();
    assert_eq!(valve.applied_stereotypes.len(), 1);
}
