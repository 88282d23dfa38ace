//! Case-insensitive substring search over an assembled reference.

use jeongyeol_core::RuleEntry;
use serde::Serialize;

use crate::assemble::Reference;

/// A matching rule and the section it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit<'a> {
    pub tab_id: &'a str,
    pub display_name: &'a str,
    pub rule: &'a RuleEntry,
}

fn rule_matches(rule: &RuleEntry, needle: &str) -> bool {
    let hit = |s: &str| s.to_lowercase().contains(needle);
    hit(&rule.display_item)
        || hit(&rule.notes)
        || rule.annotation.as_deref().is_some_and(hit)
        || rule
            .approvers
            .iter()
            .any(|a| hit(&a.role) || a.condition.as_deref().is_some_and(hit))
}

/// Rules whose label, notes, annotation, or approvers contain `query`.
///
/// Section and sub-section headings are not returned. A blank query
/// matches nothing.
pub fn search<'a>(reference: &'a Reference, query: &str) -> Vec<SearchHit<'a>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    reference
        .sections
        .iter()
        .flat_map(|section| {
            section.data.rules.iter().map(move |rule| SearchHit {
                tab_id: &section.tab_id,
                display_name: &section.display_name,
                rule,
            })
        })
        .filter(|hit| !hit.rule.is_section_title && rule_matches(hit.rule, &needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::DomainSection;
    use jeongyeol_core::{Approver, Section, Symbol};

    fn reference() -> Reference {
        let mut heading = RuleEntry::new("계약 일반");
        heading.is_section_title = true;

        let mut contract = RuleEntry::new("계약 체결");
        contract.approvers = vec![
            Approver::new("CEO", Symbol::FinalAuthority).with_condition("1억원 초과"),
        ];

        let mut travel = RuleEntry::new("출장 승인");
        travel.notes = "해외 출장 포함".into();
        travel.annotation = Some("Overseas travel needs CSO sign-off".into());

        let mut reference = Reference::default();
        reference.push(DomainSection {
            tab_id: "tab-purchase".into(),
            display_name: "구매".into(),
            data: Section {
                rules: vec![heading, contract, travel],
                ..Section::default()
            },
        });
        reference
    }

    #[test]
    fn matches_labels_but_not_headings() {
        let reference = reference();
        let hits = search(&reference, "계약");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].rule.item, "계약 체결");
        assert_eq!(hits[0].tab_id, "tab-purchase");
    }

    #[test]
    fn matches_approvers_conditions_notes_and_annotations() {
        let reference = reference();
        assert_eq!(search(&reference, "ceo").len(), 1);
        assert_eq!(search(&reference, "1억원").len(), 1);
        assert_eq!(search(&reference, "해외").len(), 1);
        assert_eq!(search(&reference, "overseas").len(), 1);
    }

    #[test]
    fn blank_query_matches_nothing() {
        let reference = reference();
        assert!(search(&reference, "   ").is_empty());
        assert!(search(&reference, "없는 단어").is_empty());
    }
}
