//! Source-format parsers: each turns one domain document into a [`Section`].
//!
//! Two independent grammars feed one output schema:
//!
//! - [`TabularParser`]: header-driven CSV, one approval row per record.
//! - [`MarkupParser`]: a delimited block format with inline annotations.
//!
//! [`PrefaceParser`] reads the narrative preface, which shares the CSV header
//! but carries no approval chains. The caller picks a parser from a static
//! document catalog; parsers never sniff content to decide.

use jeongyeol_core::Section;

mod markup;
mod preface;
mod tabular;

pub use markup::{MarkupParser, REGION_END, REGION_START, classify_approver};
pub use preface::PrefaceParser;
pub use tabular::{Row, TabularParser, read_rows};

/// A source document held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File stem, e.g. `03_구매`.
    pub stem: String,
    pub text: String,
}

impl Document {
    pub fn new(stem: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            stem: stem.into(),
            text: text.into(),
        }
    }
}

/// A parse strategy for one source grammar.
///
/// Parsing is pure: the same document always yields an equal result.
/// `None` means the document holds no recognisable data at all and should be
/// treated like a missing file.
pub trait SectionParser {
    fn parse(&self, doc: &Document) -> Option<Section>;
}
