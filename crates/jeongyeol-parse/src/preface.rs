//! The narrative preface document.
//!
//! Same CSV header as the domain documents, but rows are prose: the note
//! column holds the body text and nothing carries an approval chain.

use jeongyeol_core::{RuleEntry, Section};

use crate::tabular::read_rows;
use crate::{Document, SectionParser};

pub const PREFACE_SECTION: &str = "서문";
pub const PREFACE_VERSION: &str = "v2025.10.01";
pub const PREFACE_NOTES: &str = "전결규정 서문";

#[derive(Debug, Clone, Copy, Default)]
pub struct PrefaceParser;

impl SectionParser for PrefaceParser {
    fn parse(&self, doc: &Document) -> Option<Section> {
        let rules = read_rows(&doc.text)
            .into_iter()
            .filter(|row| !row.item.is_empty())
            .map(|row| {
                let mut entry = RuleEntry::new(row.item);
                if !row.notes.is_empty() {
                    entry.notes = row.notes;
                }
                entry.basis = row.basis;
                entry.code = row.code;
                entry
            })
            .collect();

        Some(Section {
            section: PREFACE_SECTION.to_string(),
            version: PREFACE_VERSION.to_string(),
            notes: PREFACE_NOTES.to_string(),
            rules,
            common_annotations: Vec::new(),
        })
    }
}
