//! Tabular (CSV) approval documents.
//!
//! Header fields are looked up by name, so column order in the file does not
//! matter. Each of the five role columns implies its own symbol.
//!
//! Parsing runs two passes over the same rows. The first pass collects
//! sub-section names, because a sub-section's naming row can appear after the
//! first row that belongs to it. The second pass emits entries and inserts a
//! synthesized heading wherever the sub-section number changes.

use std::collections::HashMap;

use jeongyeol_core::model::NO_SUB_SECTION;
use jeongyeol_core::{Approver, Citation, RuleEntry, Section, Symbol};
use tracing::debug;

use crate::{Document, SectionParser};

/// Version tag stamped on every section this parser produces.
pub const TABULAR_VERSION: &str = "v2025.12.01";

const FIELD_ITEM: &str = "항목";
const FIELD_BASIS: &str = "근거조항";
const FIELD_NOTES: &str = "비고";
const FIELD_CODE: &str = "Code";
const FIELD_SUB_SECTION: &str = "절";
const FIELD_FINAL_AUTHORITY: &str = "전결권자";
const FIELD_CONCURRENCE: &str = "합의";
const FIELD_REFERENCE: &str = "참조";
const FIELD_REPORT: &str = "보고";
const FIELD_RECEIPT: &str = "접수";

/// One CSV record, trimmed. Missing columns read as empty, except the
/// sub-section number which reads as `"0"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub item: String,
    pub basis: String,
    pub notes: String,
    pub code: String,
    pub section_num: String,
    pub final_authority: String,
    pub concurrence: String,
    pub reference: String,
    pub report: String,
    pub receipt: String,
}

impl Default for Row {
    fn default() -> Self {
        Self {
            item: String::new(),
            basis: String::new(),
            notes: String::new(),
            code: String::new(),
            section_num: NO_SUB_SECTION.to_string(),
            final_authority: String::new(),
            concurrence: String::new(),
            reference: String::new(),
            report: String::new(),
            receipt: String::new(),
        }
    }
}

impl Row {
    /// Role columns in emission order. This is neither alphabetical nor
    /// symbol priority: reference comes before report.
    fn role_columns(&self) -> [(Symbol, &str); 5] {
        [
            (Symbol::FinalAuthority, &self.final_authority),
            (Symbol::Concurrence, &self.concurrence),
            (Symbol::Reference, &self.reference),
            (Symbol::Report, &self.report),
            (Symbol::Receipt, &self.receipt),
        ]
    }

    fn approvers(&self) -> Vec<Approver> {
        self.role_columns()
            .into_iter()
            .filter(|(_, role)| !role.is_empty())
            .map(|(symbol, role)| Approver::new(role, symbol))
            .collect()
    }

    fn in_sub_section(&self) -> bool {
        self.section_num != NO_SUB_SECTION
    }
}

/// Read CSV text into rows. A leading byte-order mark is ignored, and
/// records that fail to decode are skipped.
pub fn read_rows(text: &str) -> Vec<Row> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: HashMap<String, usize> = match reader.headers() {
        Ok(h) => h
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.trim_matches('\u{feff}').trim().to_string(), idx))
            .collect(),
        Err(e) => {
            debug!(error = %e, "unreadable csv header");
            return Vec::new();
        }
    };

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                debug!(line = line + 2, error = %e, "skipping malformed csv record");
                continue;
            }
        };
        let field = |name: &str| -> String {
            headers
                .get(name)
                .and_then(|&idx| record.get(idx))
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };
        let section_num = field(FIELD_SUB_SECTION);
        rows.push(Row {
            item: field(FIELD_ITEM),
            basis: field(FIELD_BASIS),
            notes: field(FIELD_NOTES),
            code: field(FIELD_CODE),
            section_num: if section_num.is_empty() {
                NO_SUB_SECTION.to_string()
            } else {
                section_num
            },
            final_authority: field(FIELD_FINAL_AUTHORITY),
            concurrence: field(FIELD_CONCURRENCE),
            reference: field(FIELD_REFERENCE),
            report: field(FIELD_REPORT),
            receipt: field(FIELD_RECEIPT),
        });
    }
    rows
}

/// Running state of the row pass.
#[derive(Debug, Default)]
struct ScanContext {
    chapter: Option<String>,
    sub_section: Option<String>,
    sub_section_names: HashMap<String, String>,
    rules: Vec<RuleEntry>,
}

impl ScanContext {
    fn observe_chapter(&mut self, row: &Row) {
        if self.chapter.is_none()
            && let Some(name) = Citation::new(&row.basis).chapter_name()
        {
            self.chapter = Some(name.to_string());
        }
    }

    /// Push a synthesized heading when `row` opens a new sub-section.
    fn enter_sub_section(&mut self, row: &Row) {
        if !row.in_sub_section() || self.sub_section.as_deref() == Some(row.section_num.as_str())
        {
            return;
        }
        self.sub_section = Some(row.section_num.clone());

        let Some(number) = Citation::new(&row.basis).sub_section() else {
            return;
        };
        let title = match self.sub_section_names.get(&row.section_num) {
            Some(name) => format!("제{number}절 {name}"),
            None => format!("제{number}절"),
        };
        self.rules
            .push(RuleEntry::sub_section_title(title, row.section_num.clone()));
    }

    fn push_row(&mut self, row: &Row) {
        let citation = Citation::new(&row.basis);
        let item_number = citation.item_number();
        let display_item = if item_number.is_empty() {
            row.item.clone()
        } else {
            format!("{item_number} {}", row.item)
        };

        let mut entry = RuleEntry::new(row.item.clone());
        entry.display_item = display_item;
        entry.item_number = item_number;
        entry.approvers = row.approvers();
        if !row.notes.is_empty() {
            entry.notes = row.notes.clone();
        }
        // A clause heading that carries its own approval stays an item.
        entry.is_section_title = citation.is_clause_heading() && entry.approvers.is_empty();
        entry.basis = row.basis.clone();
        entry.code = row.code.clone();
        entry.section_num = row.section_num.clone();
        self.rules.push(entry);
    }
}

/// First pass: sub-section number → name, taken from the first row of each
/// sub-section whose citation is a bare `<N>절 <M>조` clause heading.
fn sub_section_names(rows: &[Row]) -> HashMap<String, String> {
    let mut names = HashMap::new();
    for row in rows {
        if !row.in_sub_section() || row.item.is_empty() || names.contains_key(&row.section_num) {
            continue;
        }
        let citation = Citation::new(&row.basis);
        if citation.names_sub_section_clause() && citation.is_clause_heading() {
            names.insert(row.section_num.clone(), row.item.clone());
        }
    }
    names
}

/// Parser for the header-driven CSV format.
#[derive(Debug, Clone, Copy, Default)]
pub struct TabularParser;

impl TabularParser {
    /// Build a section from already-decoded rows.
    ///
    /// `stem` is the source file stem; its prefix before the first `_` is the
    /// chapter number used in the section notes.
    pub fn parse_rows(&self, stem: &str, rows: &[Row]) -> Section {
        let mut ctx = ScanContext {
            sub_section_names: sub_section_names(rows),
            ..ScanContext::default()
        };

        for row in rows {
            ctx.observe_chapter(row);
            if row.item.is_empty() {
                debug!(basis = %row.basis, "skipping row without item");
                continue;
            }
            ctx.enter_sub_section(row);
            ctx.push_row(row);
        }

        let section = ctx.chapter.unwrap_or_default();
        let chapter_no = stem.split('_').next().unwrap_or(stem);
        Section {
            notes: format!("제{chapter_no}장 {section}"),
            section,
            version: TABULAR_VERSION.to_string(),
            rules: ctx.rules,
            common_annotations: Vec::new(),
        }
    }
}

impl SectionParser for TabularParser {
    fn parse(&self, doc: &Document) -> Option<Section> {
        Some(self.parse_rows(&doc.stem, &read_rows(&doc.text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "항목,근거조항,전결권자,합의,참조,보고,접수,비고,Code,절";

    fn csv(lines: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for line in lines {
            text.push('\n');
            text.push_str(line);
        }
        text
    }

    fn parse(stem: &str, lines: &[&str]) -> Section {
        TabularParser
            .parse(&Document::new(stem, csv(lines)))
            .expect("tabular parse always yields a section")
    }

    #[test]
    fn read_rows_strips_bom_and_trims() {
        let text = format!("\u{feff}{}", csv(&[" 예산 편성 ,제2장 예산 1조 1항, CEO ,,,,,,B-01,"]));
        let rows = read_rows(&text);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item, "예산 편성");
        assert_eq!(rows[0].final_authority, "CEO");
        assert_eq!(rows[0].code, "B-01");
        assert_eq!(rows[0].section_num, "0");
    }

    #[test]
    fn read_rows_by_header_name() {
        let text = "절,Code,항목,근거조항,합의\n2,X,계약,제3장 구매 2절 1조 1항,재무팀장";
        let rows = read_rows(text);
        assert_eq!(rows[0].item, "계약");
        assert_eq!(rows[0].section_num, "2");
        assert_eq!(rows[0].concurrence, "재무팀장");
        assert!(rows[0].final_authority.is_empty());
    }

    #[test]
    fn chapter_and_metadata() {
        let section = parse(
            "01_경영관리",
            &[
                "경영목표,제1장 경영관리 1조,,,,,,,,0",
                "연간 경영계획 수립,제1장 경영관리 1조 1항,CEO,CSO,,,,,M-01,0",
            ],
        );
        assert_eq!(section.section, "경영관리");
        assert_eq!(section.version, "v2025.12.01");
        assert_eq!(section.notes, "제01장 경영관리");
        assert_eq!(section.rules.len(), 2);
        assert!(section.common_annotations.is_empty());
    }

    #[test]
    fn numbering_and_titles() {
        let section = parse(
            "01_경영관리",
            &[
                "경영목표,제1장 경영관리 1조,,,,,,,,0",
                "연간 경영계획 수립,제1장 경영관리 1조 1항,CEO,,,,,,,0",
            ],
        );
        let heading = &section.rules[0];
        assert!(heading.is_section_title);
        assert!(!heading.is_sub_section);
        assert_eq!(heading.item_number, "1");
        assert_eq!(heading.display_item, "1 경영목표");

        let item = &section.rules[1];
        assert!(!item.is_section_title);
        assert_eq!(item.item_number, "1.1");
        assert_eq!(item.display_item, "1.1 연간 경영계획 수립");
        assert_eq!(item.basis, "제1장 경영관리 1조 1항");
        assert_eq!(item.notes, "-");
    }

    #[test]
    fn clause_heading_with_approver_is_an_item() {
        let section = parse(
            "01_경영관리",
            &["경영목표,제1장 경영관리 1조,CEO,,,,,,,0"],
        );
        let entry = &section.rules[0];
        assert!(!entry.is_section_title);
        assert_eq!(entry.approvers.len(), 1);
        assert_eq!(entry.display_item, "1 경영목표");
    }

    #[test]
    fn approvers_follow_column_order() {
        let section = parse(
            "02_예산",
            &["예산 전용,제2장 예산 3조 1항,CEO,CSO,감사,이사회,재무팀,1억원 이상,,0"],
        );
        let approvers = &section.rules[0].approvers;
        let got: Vec<(&str, Symbol)> = approvers
            .iter()
            .map(|a| (a.role.as_str(), a.symbol))
            .collect();
        assert_eq!(
            got,
            vec![
                ("CEO", Symbol::FinalAuthority),
                ("CSO", Symbol::Concurrence),
                ("감사", Symbol::Reference),
                ("이사회", Symbol::Report),
                ("재무팀", Symbol::Receipt),
            ]
        );
        assert!(approvers.iter().all(|a| a.condition.is_none()));
        assert_eq!(section.rules[0].notes, "1억원 이상");
    }

    #[test]
    fn rows_without_item_are_skipped() {
        let section = parse(
            "02_예산",
            &[
                ",제2장 예산 1조,,,,,,,,0",
                "예산 편성,제2장 예산 1조 1항,CEO,,,,,,,0",
                "   ,제2장 예산 1조 2항,CEO,,,,,,,0",
            ],
        );
        assert_eq!(section.section, "예산");
        assert_eq!(section.rules.len(), 1);
        assert!(section.rules.iter().all(|r| !r.item.is_empty()));
    }

    #[test]
    fn sub_section_titles_are_synthesized() {
        let section = parse(
            "03_구매",
            &[
                "총칙,제3장 구매 1조,,,,,,,,0",
                "구매계획,제3장 구매 1절 1조,,,,,,,,1",
                "연간 구매계획,제3장 구매 1절 1조 1항,CEO,,,,,,,1",
                "계약 일반,제3장 구매 2절 1조 1항,본부장,,,,,,,2",
                "계약,제3장 구매 2절 1조,,,,,,,,2",
            ],
        );
        let labels: Vec<&str> = section.rules.iter().map(|r| r.item.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "총칙",
                "제1절 구매계획",
                "구매계획",
                "연간 구매계획",
                "제2절 계약",
                "계약 일반",
                "계약",
            ]
        );

        let titles: Vec<&RuleEntry> = section.rules.iter().filter(|r| r.is_sub_section).collect();
        assert_eq!(titles.len(), 2);
        for title in titles {
            assert!(title.approvers.is_empty());
            assert!(title.is_section_title);
            assert_eq!(title.notes, "-");
            assert!(title.item_number.is_empty());
        }
        assert_eq!(section.rules[4].section_num, "2");
    }

    #[test]
    fn unnamed_sub_section_uses_bare_title() {
        let section = parse(
            "03_구매",
            &["긴급 구매,제3장 구매 4절 2조 1항,팀장,,,,,,,4"],
        );
        assert_eq!(section.rules[0].item, "제4절");
        assert!(section.rules[0].is_sub_section);
        assert_eq!(section.rules[1].item, "긴급 구매");
    }

    #[test]
    fn sub_section_without_citation_token_updates_state_only() {
        let section = parse(
            "03_구매",
            &[
                "비고 항목,별표,팀장,,,,,,,1",
                "구매계획,제3장 구매 1절 1조,,,,,,,,1",
            ],
        );
        assert_eq!(section.rules.len(), 2);
        assert!(section.rules.iter().all(|r| !r.is_sub_section));
    }

    #[test]
    fn head_numbers_are_parenthesized() {
        let section = parse(
            "03_구매",
            &["수의계약,제3장 구매 1절 6항 1호 2목,CEO,,,,,,,1"],
        );
        let entry = &section.rules[1];
        assert_eq!(entry.item_number, "1.6.1(2)");
        assert_eq!(entry.display_item, "1.6.1(2) 수의계약");
    }

    #[test]
    fn empty_document_still_yields_section() {
        let section = parse("05_자산관리", &[]);
        assert!(section.rules.is_empty());
        assert_eq!(section.section, "");
        assert_eq!(section.notes, "제05장 ");
    }

    #[test]
    fn parsing_is_repeatable() {
        let doc = Document::new(
            "03_구매",
            csv(&[
                "구매계획,제3장 구매 1절 1조,,,,,,,,1",
                "연간 구매계획,제3장 구매 1절 1조 1항,CEO,,,,,,,1",
            ]),
        );
        assert_eq!(TabularParser.parse(&doc), TabularParser.parse(&doc));
    }
}
