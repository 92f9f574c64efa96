//! Lookup and assertion helpers over an imported model.

use mdimport::import::ImportReport;
use mdimport::model::{Element, ElementId, ElementKind, Model};

/// The single element of `kind` named `name`.
pub fn named<'m>(model: &'m Model, kind: ElementKind, name: &str) -> &'m Element {
    model
        .find_unique(kind, name)
        .unwrap_or_else(|| panic!("expected exactly one {kind} named '{name}'"))
}

/// The element under `id`.
pub fn element<'m>(model: &'m Model, id: &str) -> &'m Element {
    model
        .get(&ElementId::new(id))
        .unwrap_or_else(|| panic!("no element '{id}'"))
}

/// Names of `ids`, in order.
pub fn names<'m>(model: &'m Model, ids: &[ElementId]) -> Vec<&'m str> {
    ids.iter()
        .filter_map(|id| model.get(id))
        .filter_map(Element::name)
        .collect()
}

/// Diagnostic codes of a report, in order.
pub fn codes(report: &ImportReport) -> Vec<&'static str> {
    report.diagnostics.iter().map(|d| d.code).collect()
}

/// Assert a report carries no warnings.
pub fn assert_lossless(report: &ImportReport) {
    assert!(
        report.is_lossless(),
        "expected a lossless import, got {} warning(s):\n{}",
        report.warnings().count(),
        report
            .warnings()
            .map(|d| format!("  {d}"))
            .collect::<Vec<_>>()
            .join("\n")
    );
}
