//! Host-side collaborators for an import.
//!
//! The importer needs two things from its host: a [`MutationWindow`] over a
//! model store and a [`Canvas`] to place diagram contents on. This module
//! provides in-memory versions of both, and [`ImportHost`], which bundles
//! them behind file- and byte-level entry points.
//!
//! ```ignore
//! use mdimport::host::ImportHost;
//!
//! let mut host = ImportHost::new();
//! let report = host.import_file(std::path::Path::new("Project.mdzip"))?;
//! for diag in report.warnings() {
//!     eprintln!("{diag}");
//! }
//! ```

#[cfg(feature = "mdzip")]
pub mod archive;
mod canvas;
mod transaction;

pub use canvas::{Canvas, Placement, RecordingCanvas};
pub use transaction::{ModelTransaction, MutationWindow, SharedModel};

use std::path::Path;

use parking_lot::RwLockReadGuard;

use crate::import::{ImportContext, ImportError, ImportReport, ImportResult, import_document};
use crate::model::Model;

/// Input formats the host can open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    /// A bare XMI document.
    Xmi,
    /// A zipped MagicDraw project.
    #[cfg(feature = "mdzip")]
    MdZip,
}

/// Detect the document format from a file extension.
pub fn detect_format(path: &Path) -> Option<DocumentFormat> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "xmi" | "xml" | "uml" => Some(DocumentFormat::Xmi),
        #[cfg(feature = "mdzip")]
        "mdzip" => Some(DocumentFormat::MdZip),
        _ => None,
    }
}

/// File extensions [`ImportHost::import_file`] accepts.
pub fn supported_extensions() -> &'static [&'static str] {
    if cfg!(feature = "mdzip") {
        &["xmi", "xml", "uml", "mdzip"]
    } else {
        &["xmi", "xml", "uml"]
    }
}

/// Owns a shared model and a recording canvas, and imports into them.
///
/// Successive imports accumulate into the same model. Re-importing a
/// document that is already present creates nothing new.
#[derive(Default)]
pub struct ImportHost {
    model: SharedModel,
    canvas: RecordingCanvas,
}

impl ImportHost {
    // ── Construction ─────────────────────────────────────────────────

    pub fn new() -> Self {
        Self::default()
    }

    /// Import on top of an existing model.
    pub fn from_model(model: Model) -> Self {
        Self {
            model: SharedModel::from_model(model),
            canvas: RecordingCanvas::default(),
        }
    }

    // ── Import ───────────────────────────────────────────────────────

    /// Import an XMI document held in memory.
    pub fn import_bytes(&mut self, bytes: &[u8]) -> ImportResult<ImportReport> {
        import_document(ImportContext::new(&self.model, &mut self.canvas), bytes)
    }

    /// Import the model document inside a zipped project.
    #[cfg(feature = "mdzip")]
    pub fn import_mdzip(&mut self, bytes: &[u8]) -> ImportResult<ImportReport> {
        let document = archive::unpack_mdzip(bytes)?;
        self.import_bytes(&document)
    }

    /// Import a file; the format is chosen by extension.
    pub fn import_file(&mut self, path: &Path) -> ImportResult<ImportReport> {
        let format = detect_format(path).ok_or_else(|| {
            ImportError::UnsupportedFormat(
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("?")
                    .to_string(),
            )
        })?;
        let bytes = std::fs::read(path)?;
        tracing::debug!(path = %path.display(), ?format, bytes = bytes.len(), "importing file");
        match format {
            DocumentFormat::Xmi => self.import_bytes(&bytes),
            #[cfg(feature = "mdzip")]
            DocumentFormat::MdZip => self.import_mdzip(&bytes),
        }
    }

    // ── Access ───────────────────────────────────────────────────────

    /// Read access to the model.
    pub fn model(&self) -> RwLockReadGuard<'_, Model> {
        self.model.read()
    }

    /// The shared handle, for callers that import from elsewhere.
    pub fn shared(&self) -> &SharedModel {
        &self.model
    }

    pub fn canvas(&self) -> &RecordingCanvas {
        &self.canvas
    }

    /// Every placement made so far, across imports.
    pub fn placements(&self) -> &[Placement] {
        self.canvas.placements()
    }

    /// Consume the host and return a copy of the model.
    pub fn into_model(self) -> Model {
        self.model.snapshot()
    }
}

impl std::fmt::Debug for ImportHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportHost")
            .field("elements", &self.model.read().element_count())
            .field("placements", &self.canvas.placements().len())
            .finish()
    }
}
