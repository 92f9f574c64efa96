//! Zipped MagicDraw projects (`.mdzip`).
//!
//! A project archive holds the model document next to tool metadata:
//!
//! ```text
//! Project.mdzip
//! ├── META-INF/...
//! ├── com.nomagic.magicdraw.uml_model.model   ← the XMI document
//! ├── com.nomagic.magicdraw.uml_model.shared_model
//! └── proxy.local__...
//! ```

use std::io::{Cursor, Read};

use zip::ZipArchive;

use crate::import::{ImportError, ImportResult};

/// Archive entry that holds the model in MagicDraw projects.
pub const MODEL_ENTRY: &str = "com.nomagic.magicdraw.uml_model.model";

/// Extract the model document from an `.mdzip` archive.
///
/// Prefers [`MODEL_ENTRY`]; otherwise takes the first `.xmi`, `.uml` or
/// `.xml` entry outside `META-INF/`.
pub fn unpack_mdzip(input: &[u8]) -> ImportResult<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(input))
        .map_err(|e| ImportError::archive(format!("Failed to open archive: {e}")))?;

    let entry = if archive.by_name(MODEL_ENTRY).is_ok() {
        MODEL_ENTRY.to_string()
    } else {
        archive
            .file_names()
            .filter(|name| !name.starts_with("META-INF/"))
            .filter(|name| {
                let lower = name.to_ascii_lowercase();
                lower.ends_with(".xmi") || lower.ends_with(".uml") || lower.ends_with(".xml")
            })
            .map(str::to_string)
            .next()
            .ok_or_else(|| ImportError::archive("archive contains no model document"))?
    };

    let mut file = archive
        .by_name(&entry)
        .map_err(|e| ImportError::archive(format!("Failed to read {entry}: {e}")))?;
    let mut content = Vec::new();
    file.read_to_end(&mut content)
        .map_err(|e| ImportError::archive(format!("Failed to read {entry}: {e}")))?;
    tracing::debug!(entry, bytes = content.len(), "unpacked archive");
    Ok(content)
}
