//! Structured markup approval documents.
//!
//! The parseable content sits between two marker lines:
//!
//! ```text
//! ---STRUCTURED_DATA_START---
//! section: "재무"
//! version: "v2025.10.01"
//! notes: "제4장 재무"
//! annotations:
//!   - ref: "1.1"
//!     text: "자금 집행은 월 2회를 원칙으로 한다.\n긴급 집행은 예외로 한다."
//!   - ref: "공통-금융"
//!     text: "금융기관 거래는 재무팀이 접수한다."
//! rules:
//!   - item: "[1-1 자금관리]"
//!     approver_line: []
//!   - item: "1.1 자금 집행"
//!     approver_line: ["CEO(1억원 초과)", "CFO(○)", "재무팀장"]
//!     notes: "월 2회"
//! ---STRUCTURED_DATA_END---
//! ```
//!
//! Quoted values may span lines and may contain `\n`, `\t`, `\"` and `\\`
//! escapes. Everything outside the region is ignored.

use std::collections::HashMap;
use std::sync::LazyLock;

use jeongyeol_core::{Approver, CommonAnnotation, RuleEntry, Section, Symbol};
use regex::Regex;
use tracing::debug;

use crate::{Document, SectionParser};

pub const REGION_START: &str = "---STRUCTURED_DATA_START---";
pub const REGION_END: &str = "---STRUCTURED_DATA_END---";

/// Ref prefix marking a section-wide annotation.
pub const COMMON_REF_PREFIX: &str = "공통";

/// A double-quoted value with backslash escapes; group 1 is the raw body.
const QUOTED: &str = r#""((?:[^"\\]|\\.)*)""#;

static HEADER_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:-\s|annotations:|rules:)").expect("invalid header regex")
});

static ANNOTATIONS_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*annotations:[ \t]*\r?$").expect("invalid annotations regex")
});

static BLOCK_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:annotations:|rules:|-\s*item:)").expect("invalid block-end regex")
});

static ANNOTATION_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"-\s*ref:\s*{QUOTED}\s*text:\s*{QUOTED}"))
        .expect("invalid annotation regex")
});

static RULE_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    let token = r#""(?:[^"\\]|\\.)*""#;
    Regex::new(&format!(
        r"-\s*item:\s*{QUOTED}\s*approver_line:\s*\[((?:\s*{token}\s*,?)*)\s*\](?:\s*notes:\s*{QUOTED})?"
    ))
    .expect("invalid rule regex")
});

static QUOTED_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(QUOTED).expect("invalid token regex"));

static PAREN_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s*\(([^()]+)\)$").expect("invalid approver regex")
});

/// `section`, `version` or `notes` metadata; group 1 is the key.
static METADATA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?m)^\s*(section|version|notes):\s*{QUOTED}"))
        .expect("invalid metadata regex")
});

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\r?\n\s*").expect("invalid line-break regex"));

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)*").expect("invalid item-number regex"));

static BRACKET_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\d+-\d+\s+.+\]$").expect("invalid heading regex"));

/// Resolve backslash escapes in a quoted body. Unknown escapes are kept.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Unescape and fold every line break, with its surrounding indentation,
/// into a single space.
fn single_line(raw: &str) -> String {
    LINE_BREAK
        .replace_all(&unescape(raw), " ")
        .trim()
        .to_string()
}

/// The text strictly between the region markers.
fn region(text: &str) -> Option<&str> {
    let start = text.find(REGION_START)? + REGION_START.len();
    let end = start + text[start..].find(REGION_END)?;
    Some(&text[start..end])
}

/// First value for `key` in the region header, or empty.
fn metadata(header: &str, key: &str) -> String {
    METADATA
        .captures_iter(header)
        .find(|c| &c[1] == key)
        .map(|c| single_line(&c[2]))
        .unwrap_or_default()
}

/// Unescape, keeping line breaks but dropping each line's indentation.
fn multi_line(raw: &str) -> String {
    unescape(raw)
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Classify one `approver_line` token.
///
/// - `"CEO(◎)"`         → role `CEO`, symbol ◎
/// - `"CEO(1억원 초과)"` → role `CEO`, condition `1억원 초과`, symbol ◎
/// - `"Team Leader"`    → role `Team Leader`, symbol ◎
pub fn classify_approver(token: &str) -> Approver {
    let token = single_line(token);
    if let Some(caps) = PAREN_SUFFIX.captures(&token) {
        let role = caps[1].trim();
        let inner = caps[2].trim();
        return match Symbol::from_glyph(inner) {
            Some(symbol) => Approver::new(role, symbol),
            None => Approver::new(role, Symbol::FinalAuthority).with_condition(inner),
        };
    }
    Approver::new(token, Symbol::FinalAuthority)
}

/// Annotations split into per-item and section-wide sets.
#[derive(Debug, Default)]
struct Annotations {
    by_item: HashMap<String, String>,
    common: Vec<CommonAnnotation>,
}

impl Annotations {
    fn collect(region: &str) -> Self {
        let mut out = Self::default();
        for key in ANNOTATIONS_KEY.find_iter(region) {
            let rest = &region[key.end()..];
            let block = match BLOCK_END.find(rest) {
                Some(m) => &rest[..m.start()],
                None => rest,
            };
            for caps in ANNOTATION_ENTRY.captures_iter(block) {
                let reference = single_line(&caps[1]);
                let text = multi_line(&caps[2]);
                out.insert(reference, text);
            }
        }
        out
    }

    fn insert(&mut self, reference: String, text: String) {
        let numeric = reference.starts_with(|c: char| c.is_ascii_digit());
        if reference.starts_with(COMMON_REF_PREFIX) || !numeric {
            let keyword = reference
                .rsplit('-')
                .next()
                .unwrap_or(&reference)
                .trim()
                .to_string();
            self.common.push(CommonAnnotation {
                reference,
                keyword,
                text,
            });
        } else {
            self.by_item.insert(reference, text);
        }
    }
}

/// Parser for the marker-delimited block format.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupParser;

impl MarkupParser {
    /// Parse raw text. `None` when the region markers are missing.
    pub fn parse_str(&self, text: &str) -> Option<Section> {
        let region = region(text)?;

        let header = match HEADER_END.find(region) {
            Some(m) => &region[..m.start()],
            None => region,
        };
        let annotations = Annotations::collect(region);

        let mut rules = Vec::new();
        for caps in RULE_ENTRY.captures_iter(region) {
            let item = single_line(&caps[1]);
            if item.is_empty() {
                debug!("skipping markup rule without item");
                continue;
            }

            let approvers = QUOTED_TOKEN
                .captures_iter(&caps[2])
                .map(|t| classify_approver(&t[1]))
                .filter(|a| !a.role.is_empty())
                .collect();

            let item_number = LEADING_NUMBER
                .find(&item)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();

            let mut entry = RuleEntry::new(item);
            entry.approvers = approvers;
            if let Some(notes) = caps.get(3).map(|m| single_line(m.as_str()))
                && !notes.is_empty()
            {
                entry.notes = notes;
            }
            entry.annotation = annotations.by_item.get(&item_number).cloned();
            entry.is_section_title =
                entry.approvers.is_empty() && BRACKET_HEADING.is_match(&entry.item);
            entry.item_number = item_number;
            rules.push(entry);
        }

        Some(Section {
            section: metadata(header, "section"),
            version: metadata(header, "version"),
            notes: metadata(header, "notes"),
            rules,
            common_annotations: annotations.common,
        })
    }
}

impl SectionParser for MarkupParser {
    fn parse(&self, doc: &Document) -> Option<Section> {
        let section = self.parse_str(&doc.text);
        if section.is_none() {
            debug!(stem = %doc.stem, "no structured region found");
        }
        section
    }
}
