//! Fixture documents under `tests/fixtures/`.

use std::path::PathBuf;

use mdimport::host::ImportHost;
use mdimport::import::ImportReport;

/// Directory holding the fixture documents.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Raw bytes of a fixture.
pub fn fixture(name: &str) -> Vec<u8> {
    let path = fixtures_dir().join(name);
    std::fs::read(&path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

/// Import one fixture into a fresh host.
pub fn import_fixture(name: &str) -> (ImportHost, ImportReport) {
    let mut host = ImportHost::new();
    let report = host
        .import_bytes(&fixture(name))
        .unwrap_or_else(|e| panic!("import of {name} failed: {e}"));
    (host, report)
}

/// Import a document held in a string into a fresh host.
pub fn import_str(xml: &str) -> (ImportHost, ImportReport) {
    let mut host = ImportHost::new();
    let report = host
        .import_bytes(xml.as_bytes())
        .unwrap_or_else(|e| panic!("import failed: {e}"));
    (host, report)
}
