//! Approval symbols and approver role classes.
//!
//! The approval reference uses a fixed five-glyph alphabet to mark what each
//! approver does in a chain:
//!
//! | glyph | kind            | label | priority |
//! |-------|-----------------|-------|----------|
//! | ◎     | final-authority | 전결  | 1        |
//! | ○     | concurrence     | 합의  | 2        |
//! | □     | report          | 보고  | 3        |
//! | ★     | reference       | 참조  | 4        |
//! | →     | receipt         | 접수  | 5        |
//!
//! Priority is only an ordering hint for alternate views. Approver lists keep
//! their source order everywhere.

use serde::{Deserialize, Serialize};

/// One glyph of the approval alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    #[serde(rename = "◎")]
    FinalAuthority,
    #[serde(rename = "○")]
    Concurrence,
    #[serde(rename = "□")]
    Report,
    #[serde(rename = "★")]
    Reference,
    #[serde(rename = "→")]
    Receipt,
}

impl Symbol {
    /// Every symbol, in priority order.
    pub const ALL: [Symbol; 5] = [
        Symbol::FinalAuthority,
        Symbol::Concurrence,
        Symbol::Report,
        Symbol::Reference,
        Symbol::Receipt,
    ];

    /// Look up a symbol by its glyph. Surrounding whitespace is ignored.
    pub fn from_glyph(s: &str) -> Option<Self> {
        match s.trim() {
            "◎" => Some(Self::FinalAuthority),
            "○" => Some(Self::Concurrence),
            "□" => Some(Self::Report),
            "★" => Some(Self::Reference),
            "→" => Some(Self::Receipt),
            _ => None,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Self::FinalAuthority => "◎",
            Self::Concurrence => "○",
            Self::Report => "□",
            Self::Reference => "★",
            Self::Receipt => "→",
        }
    }

    /// Semantic classification tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FinalAuthority => "final-authority",
            Self::Concurrence => "concurrence",
            Self::Report => "report",
            Self::Reference => "reference",
            Self::Receipt => "receipt",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FinalAuthority => "전결",
            Self::Concurrence => "합의",
            Self::Report => "보고",
            Self::Reference => "참조",
            Self::Receipt => "접수",
        }
    }

    /// Stylesheet class for the symbol badge. Reference and receipt share one.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::FinalAuthority => "symbol-approve",
            Self::Concurrence => "symbol-agree",
            Self::Report => "symbol-report",
            Self::Reference | Self::Receipt => "symbol-refer",
        }
    }

    /// 1 is shown first.
    pub fn priority(&self) -> u8 {
        match self {
            Self::FinalAuthority => 1,
            Self::Concurrence => 2,
            Self::Report => 3,
            Self::Reference => 4,
            Self::Receipt => 5,
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.glyph())
    }
}

/// Coarse grouping of an approver's role title, used for badge colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleClass {
    Ceo,
    Cso,
    Director,
    TeamLeader,
    Board,
    Staff,
}

impl RoleClass {
    /// Classify a free-text role. First match wins, so "CEO 및 이사회" is `Ceo`.
    pub fn of(role: &str) -> Self {
        let lower = role.to_lowercase();
        if lower.contains("ceo") {
            Self::Ceo
        } else if lower.contains("cso") {
            Self::Cso
        } else if role.contains("본부장") || lower.contains("director") {
            Self::Director
        } else if role.contains("팀장") || lower.contains("team") {
            Self::TeamLeader
        } else if role.contains("이사회") || lower.contains("board") {
            Self::Board
        } else {
            Self::Staff
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ceo => "approver-ceo",
            Self::Cso => "approver-cso",
            Self::Director => "approver-director",
            Self::TeamLeader => "approver-team-leader",
            Self::Board => "approver-board",
            Self::Staff => "approver-staff",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_lookup_covers_alphabet() {
        for symbol in Symbol::ALL {
            assert_eq!(Symbol::from_glyph(symbol.glyph()), Some(symbol));
        }
        assert_eq!(Symbol::from_glyph(" ◎ "), Some(Symbol::FinalAuthority));
        assert_eq!(Symbol::from_glyph("●"), None);
        assert_eq!(Symbol::from_glyph(""), None);
    }

    #[test]
    fn priorities_follow_alphabet_order() {
        let priorities: Vec<u8> = Symbol::ALL.iter().map(Symbol::priority).collect();
        assert_eq!(priorities, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn registry_values() {
        assert_eq!(Symbol::FinalAuthority.kind(), "final-authority");
        assert_eq!(Symbol::FinalAuthority.label(), "전결");
        assert_eq!(Symbol::Concurrence.css_class(), "symbol-agree");
        assert_eq!(Symbol::Report.label(), "보고");
        assert_eq!(Symbol::Reference.css_class(), "symbol-refer");
        assert_eq!(Symbol::Receipt.css_class(), "symbol-refer");
        assert_eq!(Symbol::Receipt.label(), "접수");
    }

    #[test]
    fn serializes_as_glyph() {
        let json = serde_json::to_string(&Symbol::Concurrence).unwrap();
        assert_eq!(json, "\"○\"");
        let parsed: Symbol = serde_json::from_str("\"★\"").unwrap();
        assert_eq!(parsed, Symbol::Reference);
    }

    #[test]
    fn role_classes() {
        assert_eq!(RoleClass::of("CEO"), RoleClass::Ceo);
        assert_eq!(RoleClass::of("ceo"), RoleClass::Ceo);
        assert_eq!(RoleClass::of("CSO"), RoleClass::Cso);
        assert_eq!(RoleClass::of("경영지원본부장"), RoleClass::Director);
        assert_eq!(RoleClass::of("재무팀장"), RoleClass::TeamLeader);
        assert_eq!(RoleClass::of("Team Leader"), RoleClass::TeamLeader);
        assert_eq!(RoleClass::of("이사회"), RoleClass::Board);
        assert_eq!(RoleClass::of("담당자"), RoleClass::Staff);
        assert_eq!(RoleClass::of("CEO 및 이사회"), RoleClass::Ceo);
        assert_eq!(RoleClass::Director.as_str(), "approver-director");
    }
}
