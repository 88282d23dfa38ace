//! Normalized approval-rule model shared by every source format.

use serde::{Deserialize, Serialize};

use crate::level::classify_level;
use crate::symbol::{RoleClass, Symbol};

/// Note text used when a source row or block carries none.
pub const EMPTY_NOTES: &str = "-";

/// Sub-section identifier for rows outside any sub-section.
pub const NO_SUB_SECTION: &str = "0";

/// One link in an approval chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Approver {
    pub role: String,
    pub symbol: Symbol,
    /// Qualifier scoping when this approver applies, e.g. a monetary threshold.
    #[serde(default)]
    pub condition: Option<String>,
    /// Presentation classes, filled in by the assembler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<ApproverBadge>,
}

impl Approver {
    pub fn new(role: impl Into<String>, symbol: Symbol) -> Self {
        Self {
            role: role.into(),
            symbol,
            condition: None,
            badge: None,
        }
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// True for the literal role `CEO` holding final authority.
    pub fn is_ceo_final_authority(&self) -> bool {
        self.role == "CEO" && self.symbol == Symbol::FinalAuthority
    }

    /// Attach role and symbol display classes.
    pub fn decorate(&mut self) {
        self.badge = Some(ApproverBadge {
            role_class: RoleClass::of(&self.role).as_str().to_string(),
            symbol_class: self.symbol.css_class().to_string(),
            symbol_text: self.symbol.label().to_string(),
        });
    }
}

/// Display classes derived from the symbol registry and the role text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproverBadge {
    pub role_class: String,
    pub symbol_class: String,
    pub symbol_text: String,
}

/// One row of the approval reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEntry {
    pub item: String,
    pub display_item: String,
    /// Dot-joined citation number such as `1.6.1(2)`; empty when not derivable.
    pub item_number: String,
    pub approvers: Vec<Approver>,
    pub notes: String,
    pub annotation: Option<String>,
    pub is_section_title: bool,
    pub is_sub_section: bool,
    pub basis: String,
    pub code: String,
    pub section_num: String,
    /// Indentation depth, classified from `item` rather than `display_item`.
    pub level: u8,
}

impl RuleEntry {
    /// A plain entry labelled `item`. Level is classified from the label.
    pub fn new(item: impl Into<String>) -> Self {
        let item = item.into();
        Self {
            level: classify_level(&item),
            display_item: item.clone(),
            item,
            item_number: String::new(),
            approvers: Vec::new(),
            notes: EMPTY_NOTES.to_string(),
            annotation: None,
            is_section_title: false,
            is_sub_section: false,
            basis: String::new(),
            code: String::new(),
            section_num: NO_SUB_SECTION.to_string(),
        }
    }

    /// A synthesized sub-section heading. Never carries approvers.
    pub fn sub_section_title(title: impl Into<String>, section_num: impl Into<String>) -> Self {
        Self {
            is_section_title: true,
            is_sub_section: true,
            section_num: section_num.into(),
            ..Self::new(title)
        }
    }

    pub fn has_ceo_final_authority(&self) -> bool {
        self.approvers.iter().any(Approver::is_ceo_final_authority)
    }
}

/// An annotation that applies to a whole section rather than one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonAnnotation {
    #[serde(rename = "ref")]
    pub reference: String,
    pub keyword: String,
    pub text: String,
}

/// One parsed domain document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub section: String,
    pub version: String,
    pub notes: String,
    pub rules: Vec<RuleEntry>,
    pub common_annotations: Vec<CommonAnnotation>,
}

impl Section {
    /// Entries with at least one CEO final-authority approver.
    pub fn ceo_final_authority_count(&self) -> usize {
        self.rules
            .iter()
            .filter(|r| r.has_ceo_final_authority())
            .count()
    }
}
