//! Profiles, stereotypes, extensions and stereotype applications.

use mdimport::import::codes;
use mdimport::model::{Element, ElementId, ElementKind, Model};

use crate::helpers::fixtures::{import_fixture, import_str};
use crate::helpers::model_assertions::{assert_lossless, codes as report_codes, element, named, names};

/// The metaclass each extension of `stereotype` points at.
fn extended_metaclasses<'m>(model: &'m Model, stereotype: &Element) -> Vec<&'m Element> {
    stereotype
        .as_stereotype()
        .unwrap()
        .extensions
        .iter()
        .filter_map(|x| model.get(x)?.as_extension()?.metaclass.as_ref())
        .filter_map(|m| model.get(m))
        .collect()
}

#[test]
fn test_explicit_profile_with_base_attribute() {
    let (host, report) = import_fixture("profile.xmi");
    assert_lossless(&report);
    let model = host.model();

    let p = named(&model, ElementKind::Profile, "P");
    let s = named(&model, ElementKind::Stereotype, "S");
    assert_eq!(s.owner.as_ref(), Some(&p.id));

    let metaclasses = extended_metaclasses(&model, s);
    assert_eq!(metaclasses.len(), 1);
    assert_eq!(metaclasses[0].name(), Some("Class"));
    assert!(metaclasses[0].as_class().unwrap().is_metaclass);

    let attributes = &s.classifier().unwrap().attributes;
    assert_eq!(names(&model, attributes), vec!["color"]);
    let color = model.get(&attributes[0]).unwrap().as_property().unwrap();
    assert_eq!(color.type_name.as_deref(), Some("String"));
    assert_eq!(color.multiplicity.lower.as_deref(), Some("0"));
    assert_eq!(color.multiplicity.upper.as_deref(), Some("1"));

    // The document's own Extension element is the one that got wired.
    let ext = element(&model, "_S_ext").as_extension().unwrap();
    assert_eq!(ext.stereotype.as_ref(), Some(&s.id));
    assert_eq!(ext.metaclass.as_ref(), Some(&metaclasses[0].id));
    assert_eq!(element(&model, "_S_ext").owner.as_ref(), Some(&p.id));
    assert!(model.get(&ElementId::new("_S_base")).is_none());
}

#[test]
fn test_profile_application_and_applied_stereotype() {
    let (host, _) = import_fixture("profile.xmi");
    let model = host.model();

    let data = named(&model, ElementKind::Package, "Data");
    assert_eq!(
        data.as_package().unwrap().applied_profiles,
        vec![ElementId::new("_P")]
    );

    let tank = named(&model, ElementKind::Class, "Tank");
    assert_eq!(tank.applied_stereotypes, vec![ElementId::new("_app")]);

    let app = element(&model, "_app").as_instance().unwrap();
    assert_eq!(app.classifiers, vec![ElementId::new("_S")]);
    assert_eq!(app.slots.len(), 1);
    let slot = model.get(&app.slots[0]).unwrap().as_slot().unwrap();
    assert_eq!(slot.defining_feature, Some(ElementId::new("_S_color")));
    assert_eq!(slot.values.iter().map(|v| &**v).collect::<Vec<_>>(), vec!["red"]);
}

#[test]
fn test_shorthand_table_synthesizes_profile() {
    let (host, report) = import_fixture("shorthand.xmi");
    assert_lossless(&report);
    let model = host.model();

    let prof = named(&model, ElementKind::Profile, "Prof");
    let stereo = named(&model, ElementKind::Stereotype, "Stereo");
    assert_eq!(stereo.owner.as_ref(), Some(&prof.id));

    let metaclasses = extended_metaclasses(&model, stereo);
    assert_eq!(metaclasses.len(), 1);
    assert_eq!(metaclasses[0].name(), Some("Element"));
    assert_eq!(metaclasses[0].owner.as_ref(), Some(&prof.id));

    let attributes = &stereo.classifier().unwrap().attributes;
    assert_eq!(attributes, &vec![ElementId::new("_priority_tag")]);
    assert_eq!(names(&model, attributes), vec!["priority"]);

    let pump = named(&model, ElementKind::Class, "Pump");
    assert_eq!(pump.applied_stereotypes, vec![ElementId::new("_app")]);
    let app = element(&model, "_app").as_instance().unwrap();
    let slot = model.get(&app.slots[0]).unwrap().as_slot().unwrap();
    assert_eq!(slot.defining_feature, Some(ElementId::new("_priority_tag")));
    assert_eq!(slot.values.iter().map(|v| &**v).collect::<Vec<_>>(), vec!["high"]);
}

#[test]
fn test_sibling_tags_name_their_stereotype() {
    let (host, report) = import_str(
        r#"<xmi:XMI xmlns:xmi="x" xmlns:uml="u">
  <uml:Model xmi:type="uml:Model" xmi:id="_m"/>
  <xmi:Extension>
    <stereotypesHREFS>
      <tag tagName="Req:Requirement:text"/>
      <tag tagName="Req:Requirement:id"/>
      <tag tagName="Req:Risk:level"/>
      <stereotype name="Req:Requirement"/>
    </stereotypesHREFS>
  </xmi:Extension>
</xmi:XMI>"#,
    );
    assert_lossless(&report);
    let model = host.model();

    assert_eq!(model.find_by_kind(ElementKind::Profile).len(), 1);
    let requirement = named(&model, ElementKind::Stereotype, "Requirement");
    assert_eq!(
        names(&model, &requirement.classifier().unwrap().attributes),
        vec!["text", "id"]
    );
    let risk = named(&model, ElementKind::Stereotype, "Risk");
    assert_eq!(names(&model, &risk.classifier().unwrap().attributes), vec!["level"]);

    // One "Element" stand-in per profile, one extension per stereotype.
    assert_eq!(model.find_by_name("Element").len(), 1);
    assert_eq!(requirement.as_stereotype().unwrap().extensions.len(), 1);
    assert_eq!(risk.as_stereotype().unwrap().extensions.len(), 1);
}

#[test]
fn test_duplicate_base_and_tag_declarations_collapse() {
    let (host, report) = import_str(
        r#"<uml:Model xmlns:xmi="x" xmlns:uml="u" xmi:type="uml:Model" xmi:id="_m">
  <packagedElement xmi:type="uml:Profile" xmi:id="_p" name="P">
    <packagedElement xmi:type="uml:Stereotype" xmi:id="_s" name="S">
      <ownedAttribute xmi:type="uml:Property" xmi:id="_s_base1" name="base_Class" association="_x1">
        <type href="http://www.omg.org/spec/UML/20131001/UML.xmi#Class"/>
      </ownedAttribute>
      <ownedAttribute xmi:type="uml:Property" xmi:id="_s_base2" name="base_Class" association="_x2">
        <type href="http://www.omg.org/spec/UML/20131001/UML.xmi#Class"/>
      </ownedAttribute>
      <ownedAttribute xmi:type="uml:Property" xmi:id="_s_tag1" name="weight"/>
      <ownedAttribute xmi:type="uml:Property" xmi:id="_s_tag2" name="weight"/>
    </packagedElement>
  </packagedElement>
</uml:Model>"#,
    );
    let model = host.model();
    let s = named(&model, ElementKind::Stereotype, "S");

    assert_eq!(s.as_stereotype().unwrap().extensions.len(), 1);
    assert_eq!(model.find_by_kind(ElementKind::Extension).len(), 1);
    assert_eq!(names(&model, &s.classifier().unwrap().attributes), vec!["weight"]);
    assert!(model.get(&ElementId::new("_s_tag2")).is_none());

    assert_eq!(
        report_codes(&report),
        vec![codes::DUPLICATE_DECLARATION, codes::DUPLICATE_DECLARATION]
    );
}

#[test]
fn test_referenced_profile_is_found_or_synthesized_by_name() {
    let (host, report) = import_str(
        r##"<xmi:XMI xmlns:xmi="x" xmlns:uml="u">
  <uml:Model xmi:type="uml:Model" xmi:id="_m">
    <packagedElement xmi:type="uml:Profile" xmi:id="_local" name="Local"/>
  </uml:Model>
  <xmi:Extension>
    <referencedProfile href="#_local"/>
    <moduleInfo>
      <referencedProfile href="../profiles/SysML%20Profile.mdzip#_sysml"/>
      <referencedProfile href="../profiles/SysML%20Profile.mdzip#_sysml_again"/>
    </moduleInfo>
  </xmi:Extension>
</xmi:XMI>"##,
    );
    assert_lossless(&report);
    let model = host.model();

    assert_eq!(model.find_by_kind(ElementKind::Profile).len(), 2);
    let sysml = named(&model, ElementKind::Profile, "SysML Profile");
    assert!(sysml.owner.is_none());
    assert!(model.get(&ElementId::new("_sysml")).is_none());
}

#[test]
fn test_application_of_unknown_profile_is_skipped() {
    let (host, report) = import_str(
        r#"<xmi:XMI xmlns:xmi="x" xmlns:uml="u" xmlns:Other="http://example.com/other">
  <uml:Model xmi:type="uml:Model" xmi:id="_m">
    <packagedElement xmi:type="uml:Class" xmi:id="_c" name="C"/>
  </uml:Model>
  <Other:Thing xmi:id="_app" base_Class="_c"/>
</xmi:XMI>"#,
    );
    assert_eq!(report_codes(&report), vec![codes::UNHANDLED_ELEMENT_KIND]);
    let model = host.model();
    assert!(model.get(&ElementId::new("_app")).is_none());
    assert!(element(&model, "_c").applied_stereotypes.is_empty());
}
