//! Fold every catalog document into one rendering payload.

use jeongyeol_core::Section;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::StoreError;
use crate::catalog::CatalogEntry;
use crate::knowledge::KnowledgeBase;

/// A parsed section together with its catalog identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainSection {
    pub tab_id: String,
    pub display_name: String,
    pub data: Section,
}

/// Everything the presentation layer needs for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub sections: Vec<DomainSection>,
    /// Rule entries across all sections, headings included.
    pub total_items: usize,
    /// Entries with a `CEO` final-authority approver, each counted once.
    pub ceo_items: usize,
    pub org_data: Option<String>,
    pub guide_data: Option<String>,
}

impl Reference {
    /// Append a section and update the counters.
    pub fn push(&mut self, section: DomainSection) {
        self.total_items += section.data.rules.len();
        self.ceo_items += section.data.ceo_final_authority_count();
        self.sections.push(section);
    }
}

/// Attach approver badges throughout a section.
fn decorate(section: &mut Section) {
    for rule in &mut section.rules {
        for approver in &mut rule.approvers {
            approver.decorate();
        }
    }
}

impl KnowledgeBase {
    /// Parse one catalog entry. `Ok(None)` when the file is missing or holds
    /// no parseable data.
    pub fn load_section(&self, entry: &CatalogEntry) -> Result<Option<DomainSection>, StoreError> {
        let Some(doc) = self.read_document(entry)? else {
            return Ok(None);
        };
        let Some(mut data) = entry.format.parse(&doc) else {
            return Ok(None);
        };
        decorate(&mut data);
        Ok(Some(DomainSection {
            tab_id: entry.tab_id.clone(),
            display_name: entry.display_name.clone(),
            data,
        }))
    }

    /// Parse the section matching a tab id, display name, or file stem.
    pub fn section(&self, key: &str) -> Result<Option<DomainSection>, StoreError> {
        let entry = self
            .catalog()
            .find(key)
            .ok_or_else(|| StoreError::UnknownDomain(key.to_string()))?;
        self.load_section(entry)
    }

    /// Re-read and parse the whole knowledge base.
    ///
    /// Never fails: missing documents are skipped, and documents that cannot
    /// be read are logged and skipped.
    pub fn assemble(&self) -> Reference {
        let mut reference = Reference::default();

        for entry in &self.catalog().entries {
            match self.load_section(entry) {
                Ok(Some(section)) => reference.push(section),
                Ok(None) => {}
                Err(e) => warn!(file = %entry.file_name, error = %e, "skipping unreadable document"),
            }
        }

        reference.org_data = self.org_chart().unwrap_or_else(|e| {
            warn!(error = %e, "skipping unreadable organisation chart");
            None
        });
        reference.guide_data = self.routing_guide().unwrap_or_else(|e| {
            warn!(error = %e, "skipping unreadable routing guide");
            None
        });

        info!(
            sections = reference.sections.len(),
            total_items = reference.total_items,
            ceo_items = reference.ceo_items,
            "assembled approval reference"
        );
        reference
    }
}
