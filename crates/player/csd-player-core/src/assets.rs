#![allow(dead_code)]
//! Asset loading seam.
//!
//! The engine never does I/O itself; hosts hand it an [`Assets`]
//! implementation that can read text by path (from disk, memory, or an
//! archive). Documents and atlas descriptors are fetched through it, images
//! never are: texture ops carry paths for the host to load.

use hashbrown::HashMap;

use crate::document::ExportDocument;
use crate::error::{LoadError, PlayerError, Result};
use crate::paths;

pub trait Assets {
    fn fetch_text(&mut self, path: &str) -> core::result::Result<String, LoadError>;
}

/// Prefetched text files served from a map.
///
/// The engine is synchronous, so hosts that load over the network fetch
/// every document and sheet up front and hand them over in one of these.
#[derive(Debug, Default, Clone)]
pub struct MemoryAssets {
    files: HashMap<String, String>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, text: impl Into<String>) {
        self.files.insert(path.into(), text.into());
    }

    pub fn remove(&mut self, path: &str) -> Option<String> {
        self.files.remove(path)
    }
}

impl<P: Into<String>, T: Into<String>> FromIterator<(P, T)> for MemoryAssets {
    fn from_iter<I: IntoIterator<Item = (P, T)>>(iter: I) -> Self {
        Self {
            files: iter
                .into_iter()
                .map(|(path, text)| (path.into(), text.into()))
                .collect(),
        }
    }
}

impl Assets for MemoryAssets {
    fn fetch_text(&mut self, path: &str) -> core::result::Result<String, LoadError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| LoadError::new(path, "not in the memory store"))
    }
}

/// Fetch and parse one export document.
pub fn load_export(assets: &mut dyn Assets, path: &str) -> Result<ExportDocument> {
    let text = assets.fetch_text(path)?;
    serde_json::from_str(&text).map_err(|e| PlayerError::parse(path, e.to_string()))
}

/// Try each candidate path in order; the first document that loads and
/// parses wins, returned together with its base directory.
pub fn load_document_with_base(
    assets: &mut dyn Assets,
    candidates: &[&str],
) -> Result<(ExportDocument, String)> {
    let mut last_err: Option<PlayerError> = None;
    for path in candidates {
        match load_export(assets, path) {
            Ok(doc) => return Ok((doc, paths::dir_of(path).to_string())),
            Err(err) => last_err = Some(err),
        }
    }
    Err(last_err.unwrap_or_else(|| LoadError::new("", "no document candidates").into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// it should fall through to the first candidate that loads and parses
    #[test]
    fn candidate_fallthrough() {
        let mut assets = MemoryAssets::from_iter([
            ("bad.json", "{not json"),
            (
                "res/scene.json",
                r#"{"Content":{"Content":{"ObjectData":{"ctype":"GameNodeObjectData"}}}}"#,
            ),
        ]);
        let (doc, base) =
            load_document_with_base(&mut assets, &["missing.json", "bad.json", "res/scene.json"])
                .unwrap();
        assert_eq!(base, "res/");
        assert!(doc.into_content().is_some());
    }

    /// it should keep the last error when every candidate fails
    #[test]
    fn exhausted_candidates_surface_the_last_error() {
        let mut assets = MemoryAssets::new();
        let err = load_document_with_base(&mut assets, &["a.json", "b.json"]).unwrap_err();
        match err {
            PlayerError::Load(load) => assert_eq!(load.path, "b.json"),
            other => panic!("expected load error, got {other:?}"),
        }
    }

    /// it should report malformed documents as parse errors
    #[test]
    fn malformed_documents_are_parse_errors() {
        let mut assets = MemoryAssets::from_iter([("scene.json", "[1, 2")]);
        let err = load_export(&mut assets, "scene.json").unwrap_err();
        assert_eq!(err.category(), "parse");
    }

    /// it should serve inserted files and forget removed ones
    #[test]
    fn memory_assets_round_trip() {
        let mut assets = MemoryAssets::new();
        assets.insert("a.txt", "alpha");
        assert_eq!(assets.fetch_text("a.txt").unwrap(), "alpha");
        assert_eq!(assets.remove("a.txt"), Some("alpha".to_string()));
        assert!(assets.fetch_text("a.txt").is_err());
    }
}
