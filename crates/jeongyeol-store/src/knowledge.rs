//! Filesystem access to the knowledge-base directory.

use std::path::{Path, PathBuf};

use jeongyeol_parse::Document;
use tracing::debug;

use crate::StoreError;
use crate::catalog::{Catalog, CatalogEntry};

pub const ORG_CHART_FILE: &str = "조직도_structured.txt";
pub const ROUTING_GUIDE_FILE: &str = "결재라인_가이드_structured.txt";

/// A knowledge-base directory plus its document catalog.
///
/// Nothing is cached: every read goes back to disk, so edits to the source
/// documents show up on the next assembly.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    root: PathBuf,
    catalog: Catalog,
}

impl KnowledgeBase {
    /// Open `root`, loading a catalog override if one exists.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StoreError::RootNotFound(root));
        }
        let catalog = Catalog::load(&root)?;
        Ok(Self { root, catalog })
    }

    /// Use an explicit catalog instead of the on-disk one.
    pub fn with_catalog(root: impl Into<PathBuf>, catalog: Catalog) -> Self {
        Self {
            root: root.into(),
            catalog,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Read one catalog document. `Ok(None)` when the file does not exist.
    pub fn read_document(&self, entry: &CatalogEntry) -> Result<Option<Document>, StoreError> {
        let path = self.root.join(&entry.file_name);
        Ok(read_optional(&path)?.map(|text| Document::new(entry.stem(), text)))
    }

    /// Organisation chart text, verbatim.
    pub fn org_chart(&self) -> Result<Option<String>, StoreError> {
        read_optional(&self.root.join(ORG_CHART_FILE))
    }

    /// Approval-routing guide text, verbatim.
    pub fn routing_guide(&self) -> Result<Option<String>, StoreError> {
        read_optional(&self.root.join(ROUTING_GUIDE_FILE))
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "document not present");
            Ok(None)
        }
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Format;

    #[test]
    fn open_missing_root_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = KnowledgeBase::open(dir.path().join("nope"));
        assert!(matches!(result, Err(StoreError::RootNotFound(_))));
    }

    #[test]
    fn read_document_present_and_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("02_예산.csv"), "항목\n예산").unwrap();
        let kb = KnowledgeBase::open(dir.path()).unwrap();

        let budget = kb.catalog().find("tab-budget").unwrap().clone();
        let doc = kb.read_document(&budget).unwrap().unwrap();
        assert_eq!(doc.stem, "02_예산");
        assert_eq!(doc.text, "항목\n예산");

        let missing = CatalogEntry {
            file_name: "99_없음.csv".into(),
            display_name: "없음".into(),
            tab_id: "tab-none".into(),
            format: Format::Tabular,
        };
        assert!(kb.read_document(&missing).unwrap().is_none());
    }

    #[test]
    fn auxiliary_documents() {
        let dir = tempfile::TempDir::new().unwrap();
        let kb = KnowledgeBase::open(dir.path()).unwrap();
        assert!(kb.org_chart().unwrap().is_none());
        assert!(kb.routing_guide().unwrap().is_none());

        std::fs::write(dir.path().join(ORG_CHART_FILE), "CEO\n  └ 경영지원본부").unwrap();
        assert_eq!(
            kb.org_chart().unwrap().as_deref(),
            Some("CEO\n  └ 경영지원본부")
        );
    }
}
