//! The ordered list of domain documents and the parser assigned to each.
//!
//! Parser choice is a static property of the catalog entry. Content is never
//! inspected to pick a format.

use std::path::Path;

use jeongyeol_core::Section;
use jeongyeol_parse::{Document, MarkupParser, PrefaceParser, SectionParser, TabularParser};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::StoreError;

/// Optional override file inside the knowledge-base directory.
pub const CATALOG_FILE: &str = "catalog.json";

/// Source grammar of a catalog document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Preface,
    Tabular,
    Markup,
}

impl Format {
    fn parser(self) -> &'static dyn SectionParser {
        match self {
            Self::Preface => &PrefaceParser,
            Self::Tabular => &TabularParser,
            Self::Markup => &MarkupParser,
        }
    }

    pub fn parse(self, doc: &Document) -> Option<Section> {
        self.parser().parse(doc)
    }
}

/// One document in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub file_name: String,
    pub display_name: String,
    pub tab_id: String,
    pub format: Format,
}

impl CatalogEntry {
    fn new(file_name: &str, display_name: &str, tab_id: &str, format: Format) -> Self {
        Self {
            file_name: file_name.to_string(),
            display_name: display_name.to_string(),
            tab_id: tab_id.to_string(),
            format,
        }
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        Path::new(&self.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.file_name)
    }

    /// Matches a tab id, display name, or file stem.
    pub fn matches(&self, key: &str) -> bool {
        self.tab_id == key || self.display_name == key || self.stem() == key
    }
}

/// Ordered document catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    pub entries: Vec<CatalogEntry>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// The built-in approval-regulation catalog, in display order.
    pub fn builtin() -> Self {
        use Format::{Preface, Tabular};
        let entries = vec![
            CatalogEntry::new("00_서문.csv", "서문", "tab-preface", Preface),
            CatalogEntry::new("01_경영관리.csv", "경영관리", "tab-management", Tabular),
            CatalogEntry::new("02_예산.csv", "예산", "tab-budget", Tabular),
            CatalogEntry::new("03_구매.csv", "구매", "tab-purchase", Tabular),
            CatalogEntry::new("04_재무.csv", "재무", "tab-finance", Tabular),
            CatalogEntry::new("05_자산관리.csv", "자산관리", "tab-asset", Tabular),
            CatalogEntry::new("06_인사_총무.csv", "인사/총무", "tab-hr", Tabular),
            CatalogEntry::new("07_법제_법무.csv", "법제/법무", "tab-legal", Tabular),
            CatalogEntry::new("08_사업개발_생산_홍보.csv", "사업개발", "tab-business", Tabular),
            CatalogEntry::new("09_환경_보건_안전_보안.csv", "환경/안전", "tab-safety", Tabular),
        ];
        Self { entries }
    }

    /// Load `catalog.json` from `root` if present, else the built-in catalog.
    pub fn load(root: &Path) -> Result<Self, StoreError> {
        let path = root.join(CATALOG_FILE);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::builtin()),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        let catalog: Self =
            serde_json::from_str(&text).map_err(|source| StoreError::Catalog {
                path: path.clone(),
                source,
            })?;
        info!(path = %path.display(), documents = catalog.entries.len(), "loaded catalog override");
        Ok(catalog)
    }

    pub fn find(&self, key: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.matches(key))
    }
}
