//! Containment and cross-reference wiring of plain model elements.

use mdimport::model::{Aggregation, ElementId, ElementKind};
use rstest::rstest;

use crate::helpers::fixtures::{import_fixture, import_str};
use crate::helpers::model_assertions::{assert_lossless, element, named, names};

#[test]
fn test_package_with_abstract_class_and_generalization() {
    let (host, report) = import_fixture("generalization.xmi");
    assert_lossless(&report);

    let model = host.model();
    let m = named(&model, ElementKind::Package, "M");
    let a = named(&model, ElementKind::Class, "A");
    let b = named(&model, ElementKind::Class, "B");

    assert!(a.is_abstract());
    assert!(!b.is_abstract());
    assert_eq!(a.owner.as_ref(), Some(&m.id));
    assert_eq!(b.owner.as_ref(), Some(&m.id));
    assert_eq!(names(&model, &m.owned_elements), vec!["A", "B"]);

    let gens = &b.classifier().unwrap().generalizations;
    assert_eq!(gens.len(), 1);
    let g = model.get(&gens[0]).unwrap().as_generalization().unwrap();
    assert_eq!(g.general.as_ref(), Some(&a.id));
    assert_eq!(g.specific.as_ref(), Some(&b.id));
}

#[test]
fn test_forward_references_across_packages() {
    let (host, report) = import_str(
        r#"<xmi:XMI xmlns:xmi="http://www.omg.org/spec/XMI/20131001" xmlns:uml="http://www.omg.org/spec/UML/20131001">
  <uml:Model xmi:type="uml:Model" xmi:id="_m" name="M">
    <packagedElement xmi:type="uml:Package" xmi:id="_p1" name="Vehicles">
      <packagedElement xmi:type="uml:Class" xmi:id="_car" name="Car">
        <generalization xmi:type="uml:Generalization" xmi:id="_car_gen">
          <general xmi:idref="_thing"/>
        </generalization>
        <interfaceRealization xmi:type="uml:InterfaceRealization" xmi:id="_car_drives" contract="_drivable"/>
        <ownedAttribute xmi:type="uml:Property" xmi:id="_car_wheels" name="wheels" type="_wheel" aggregation="composite">
          <lowerValue xmi:type="uml:LiteralInteger" xmi:id="_lw"/>
          <upperValue xmi:type="uml:LiteralUnlimitedNatural" xmi:id="_uw" value="*"/>
        </ownedAttribute>
      </packagedElement>
    </packagedElement>
    <packagedElement xmi:type="uml:Package" xmi:id="_p2" name="Core">
      <packagedElement xmi:type="uml:Class" xmi:id="_thing" name="Thing"/>
      <packagedElement xmi:type="uml:Class" xmi:id="_wheel" name="Wheel"/>
      <packagedElement xmi:type="uml:Interface" xmi:id="_drivable" name="Drivable"/>
    </packagedElement>
  </uml:Model>
</xmi:XMI>"#,
    );
    assert_lossless(&report);
    let model = host.model();

    let g = element(&model, "_car_gen").as_generalization().unwrap();
    assert_eq!(g.general, Some(ElementId::new("_thing")));

    let r = element(&model, "_car_drives").as_interface_realization().unwrap();
    assert_eq!(r.contract, Some(ElementId::new("_drivable")));
    assert_eq!(r.implementing_classifier, Some(ElementId::new("_car")));

    let wheels = element(&model, "_car_wheels").as_property().unwrap();
    assert_eq!(wheels.type_ref, Some(ElementId::new("_wheel")));
    assert_eq!(wheels.aggregation, Aggregation::Composite);
    assert_eq!(wheels.multiplicity.lower.as_deref(), Some("0"));
    assert_eq!(wheels.multiplicity.upper.as_deref(), Some("*"));
}

#[rstest]
#[case("String")]
#[case("Integer")]
#[case("Boolean")]
#[case("Real")]
#[case("UnlimitedNatural")]
fn test_primitive_types_become_labels(#[case] primitive: &str) {
    let xml = format!(
        r#"<uml:Model xmlns:xmi="x" xmlns:uml="u" xmi:type="uml:Model" xmi:id="_m">
  <packagedElement xmi:type="uml:Class" xmi:id="_c">
    <ownedAttribute xmi:type="uml:Property" xmi:id="_c_a" name="a">
      <type href="http://www.omg.org/spec/UML/20131001/PrimitiveTypes.xmi#{primitive}"/>
    </ownedAttribute>
  </packagedElement>
</uml:Model>"#
    );
    let (host, report) = import_str(&xml);
    assert_lossless(&report);

    let model = host.model();
    let a = element(&model, "_c_a").as_property().unwrap();
    assert_eq!(a.type_name.as_deref(), Some(primitive));
    assert!(a.type_ref.is_none());
}

#[rstest]
#[case::declared_first(true)]
#[case::declared_after_use(false)]
fn test_local_primitive_type_resolves_the_same_in_either_order(#[case] declared_first: bool) {
    let primitive = r#"<packagedElement xmi:type="uml:PrimitiveType" xmi:id="_PrimitiveType-String" name="String"/>"#;
    let class = r#"<packagedElement xmi:type="uml:Class" xmi:id="_c">
    <ownedAttribute xmi:type="uml:Property" xmi:id="_c_a" name="a" type="_PrimitiveType-String"/>
  </packagedElement>"#;
    let (first, second) = if declared_first {
        (primitive, class)
    } else {
        (class, primitive)
    };
    let xml = format!(
        r#"<uml:Model xmlns:xmi="x" xmlns:uml="u" xmi:type="uml:Model" xmi:id="_m">
  {first}
  {second}
</uml:Model>"#
    );
    let (host, report) = import_str(&xml);
    assert_lossless(&report);

    let model = host.model();
    let a = element(&model, "_c_a").as_property().unwrap();
    assert_eq!(a.type_ref, Some(ElementId::new("_PrimitiveType-String")));
    assert!(a.type_name.is_none());
}

#[test]
fn test_absent_upper_bound_is_unbounded() {
    let (host, _) = import_str(
        r#"<uml:Model xmlns:xmi="x" xmlns:uml="u" xmi:type="uml:Model" xmi:id="_m">
  <packagedElement xmi:type="uml:Class" xmi:id="_c">
    <ownedAttribute xmi:type="uml:Property" xmi:id="_c_a" name="a">
      <lowerValue xmi:type="uml:LiteralInteger" xmi:id="_lo" value="1"/>
    </ownedAttribute>
    <ownedAttribute xmi:type="uml:Property" xmi:id="_c_b" name="b"/>
  </packagedElement>
</uml:Model>"#,
    );
    let model = host.model();
    let a = element(&model, "_c_a").as_property().unwrap();
    assert_eq!(a.multiplicity.lower.as_deref(), Some("1"));
    assert!(a.multiplicity.upper.is_none());

    let b = element(&model, "_c_b").as_property().unwrap();
    assert!(b.multiplicity.lower.is_none());
    assert!(b.multiplicity.upper.is_none());
}

#[test]
fn test_association_member_ends_link_both_ways() {
    let (host, report) = import_fixture("diagrams.xmi");
    assert!(report.warnings().next().is_none());
    let model = host.model();

    let assoc = element(&model, "_assoc").as_association().unwrap();
    assert_eq!(
        assoc.member_ends,
        vec![ElementId::new("_Car_engine"), ElementId::new("_assoc_car")]
    );
    assert_eq!(assoc.owned_ends, vec![ElementId::new("_assoc_car")]);

    for end in ["_Car_engine", "_assoc_car"] {
        let p = element(&model, end).as_property().unwrap();
        assert_eq!(p.association, Some(ElementId::new("_assoc")), "{end}");
    }
    let engine = element(&model, "_Car_engine").as_property().unwrap();
    assert_eq!(engine.type_ref, Some(ElementId::new("_Engine")));
}

#[test]
fn test_enumeration_use_case_and_instance() {
    let (host, report) = import_str(
        r#"<uml:Model xmlns:xmi="x" xmlns:uml="u" xmi:type="uml:Model" xmi:id="_m">
  <packagedElement xmi:type="uml:Enumeration" xmi:id="_color" name="Color">
    <ownedLiteral xmi:type="uml:EnumerationLiteral" xmi:id="_red" name="Red"/>
    <ownedLiteral xmi:type="uml:EnumerationLiteral" xmi:id="_green" name="Green"/>
  </packagedElement>
  <packagedElement xmi:type="uml:UseCase" xmi:id="_checkout" name="Checkout">
    <include xmi:type="uml:Include" xmi:id="_inc" addition="_pay"/>
  </packagedElement>
  <packagedElement xmi:type="uml:UseCase" xmi:id="_pay" name="Pay"/>
  <packagedElement xmi:type="uml:Actor" xmi:id="_customer" name="Customer"/>
  <packagedElement xmi:type="uml:Class" xmi:id="_car" name="Car">
    <ownedAttribute xmi:type="uml:Property" xmi:id="_car_color" name="color" type="_color"/>
  </packagedElement>
  <packagedElement xmi:type="uml:InstanceSpecification" xmi:id="_myCar" name="myCar" classifier="_car">
    <slot xmi:type="uml:Slot" xmi:id="_myCar_color" definingFeature="_car_color">
      <value xmi:type="uml:InstanceValue" xmi:id="_v1" instance="_red"/>
    </slot>
  </packagedElement>
</uml:Model>"#,
    );
    assert_lossless(&report);
    let model = host.model();

    let color = named(&model, ElementKind::Enumeration, "Color");
    assert_eq!(
        names(&model, &color.as_enumeration().unwrap().literals),
        vec!["Red", "Green"]
    );

    let checkout = named(&model, ElementKind::UseCase, "Checkout");
    let includes = &checkout.as_use_case().unwrap().includes;
    assert_eq!(includes, &vec![ElementId::new("_inc")]);
    let inc = element(&model, "_inc").as_include().unwrap();
    assert_eq!(inc.addition, Some(ElementId::new("_pay")));
    assert_eq!(inc.including_case, Some(ElementId::new("_checkout")));

    assert!(model.find_unique(ElementKind::Actor, "Customer").is_some());

    let my_car = element(&model, "_myCar").as_instance().unwrap();
    assert_eq!(my_car.classifiers, vec![ElementId::new("_car")]);
    assert_eq!(my_car.slots, vec![ElementId::new("_myCar_color")]);
    let slot = element(&model, "_myCar_color").as_slot().unwrap();
    assert_eq!(slot.defining_feature, Some(ElementId::new("_car_color")));
    assert_eq!(slot.values.iter().map(|v| &**v).collect::<Vec<_>>(), vec!["_red"]);
}

#[test]
fn test_dependency_kinds_and_comments() {
    let (host, report) = import_str(
        r#"<uml:Model xmlns:xmi="x" xmlns:uml="u" xmi:type="uml:Model" xmi:id="_m">
  <packagedElement xmi:type="uml:Class" xmi:id="_a" name="A"/>
  <packagedElement xmi:type="uml:Class" xmi:id="_b" name="B"/>
  <packagedElement xmi:type="uml:Usage" xmi:id="_uses" client="_a" supplier="_b"/>
  <packagedElement xmi:type="uml:Abstraction" xmi:id="_abs">
    <client xmi:idref="_b"/>
    <supplier xmi:idref="_a"/>
  </packagedElement>
  <packagedElement xmi:type="uml:Realization" xmi:id="_real" client="_a" supplier="_b"/>
  <ownedComment xmi:type="uml:Comment" xmi:id="_note" annotatedElement="_a">
    <body>Needs review</body>
  </ownedComment>
</uml:Model>"#,
    );
    assert_lossless(&report);
    let model = host.model();

    assert_eq!(element(&model, "_uses").kind(), ElementKind::Dependency);
    assert_eq!(element(&model, "_abs").kind(), ElementKind::Abstraction);
    assert_eq!(element(&model, "_real").kind(), ElementKind::Realization);

    let abs = element(&model, "_abs").as_dependency().unwrap();
    assert_eq!(abs.client, vec![ElementId::new("_b")]);
    assert_eq!(abs.supplier, vec![ElementId::new("_a")]);

    let note = element(&model, "_note").as_comment().unwrap();
    assert_eq!(note.body.as_deref(), Some("Needs review"));
    assert_eq!(element(&model, "_a").comments, vec![ElementId::new("_note")]);
}
