//! Citation matchers for Korean regulation references.
//!
//! A citation such as `"제3장 구매 1절 1조 6항 1호 2목"` names, in descending
//! scope: chapter (장), sub-section (절), clause (조), paragraph (항),
//! sub-item (호) and head (목). Each token is matched independently so a
//! missing level never shifts the others.
//!
//! # Item numbers
//!
//! Clause, paragraph and sub-item numbers are joined with `.`; a head number
//! is appended in parentheses:
//!
//! - `"제1장 경영관리 1조 1항"`               → `"1.1"`
//! - `"제3장 구매 1절 1조 1항 1호"`           → `"1.1.1"`
//! - `"제3장 구매 1절 1조 6항 1호 2목"`       → `"1.6.1(2)"`
//!
//! A paragraph cannot stand without a clause. When a citation names a
//! paragraph but no clause, the sub-section number takes the clause slot,
//! so `"제3장 구매 1절 6항 1호 2목"` is also `"1.6.1(2)"`.

use std::sync::LazyLock;

use regex::Regex;

macro_rules! token {
    ($name:ident, $pattern:literal) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($pattern).expect("invalid citation regex"));
    };
}

token!(CHAPTER, r"제(\d+)장\s+(.+?)(?:\s+\d+절)?\s+\d+조");
token!(SUB_SECTION, r"(\d+)절");
token!(SUB_SECTION_CLAUSE, r"(\d+)절\s+(\d+)조");
token!(CLAUSE, r"(\d+)조");
token!(CLAUSE_END, r"\d+조$");
token!(PARAGRAPH, r"(\d+)항");
token!(SUB_ITEM, r"(\d+)호");
token!(HEAD, r"(\d+)목");

fn first_group<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// A borrowed, trimmed citation string with per-token accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Citation<'a> {
    text: &'a str,
}

impl<'a> Citation<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text: text.trim() }
    }

    /// Chapter name from `제<N>장 <name> [<K>절] <M>조`.
    pub fn chapter_name(&self) -> Option<&'a str> {
        CHAPTER
            .captures(self.text)
            .and_then(|c| c.get(2))
            .map(|m| m.as_str())
    }

    /// Number before `절`.
    pub fn sub_section(&self) -> Option<&'a str> {
        first_group(&SUB_SECTION, self.text)
    }

    /// True when the citation contains `<N>절 <M>조`.
    pub fn names_sub_section_clause(&self) -> bool {
        SUB_SECTION_CLAUSE.is_match(self.text)
    }

    /// Number before `조`.
    pub fn clause(&self) -> Option<&'a str> {
        first_group(&CLAUSE, self.text)
    }

    /// Number before `항`.
    pub fn paragraph(&self) -> Option<&'a str> {
        first_group(&PARAGRAPH, self.text)
    }

    /// Number before `호`.
    pub fn sub_item(&self) -> Option<&'a str> {
        first_group(&SUB_ITEM, self.text)
    }

    /// Number before `목`.
    pub fn head(&self) -> Option<&'a str> {
        first_group(&HEAD, self.text)
    }

    /// A citation that stops at a clause (`...<M>조`, no `항`) is a heading.
    pub fn is_clause_heading(&self) -> bool {
        CLAUSE_END.is_match(self.text) && !self.text.contains('항')
    }

    /// Hierarchical item number, empty when no clause-level token is present.
    pub fn item_number(&self) -> String {
        let paragraph = self.paragraph();
        let clause = self
            .clause()
            .or_else(|| paragraph.and_then(|_| self.sub_section()));

        let numbers: Vec<&str> = [clause, paragraph, self.sub_item()]
            .into_iter()
            .flatten()
            .collect();
        if numbers.is_empty() {
            return String::new();
        }

        let mut number = numbers.join(".");
        if let Some(head) = self.head() {
            number.push('(');
            number.push_str(head);
            number.push(')');
        }
        number
    }
}

/// Item number for a raw citation string.
pub fn item_number(citation: &str) -> String {
    Citation::new(citation).item_number()
}
