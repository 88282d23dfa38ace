//! Terminal rendering for the `summary` and `show` commands.

use std::fmt::Write;

use jeongyeol_core::RuleEntry;
use jeongyeol_core::model::EMPTY_NOTES;
use jeongyeol_store::{DomainSection, Reference};

const INDENT: &str = "  ";

// ── Public API ──

/// One line per section followed by the overall totals.
pub fn summary(reference: &Reference) -> String {
    let mut out = String::new();
    for section in &reference.sections {
        let _ = writeln!(
            out,
            "{:<16} {:<12} {:>5} rules {:>4} CEO",
            section.tab_id,
            section.display_name,
            section.data.rules.len(),
            section.data.ceo_final_authority_count()
        );
    }
    if !reference.sections.is_empty() {
        out.push('\n');
    }
    let _ = writeln!(out, "{:<26} {}", "sections", reference.sections.len());
    let _ = writeln!(out, "{:<26} {}", "total items", reference.total_items);
    let _ = writeln!(out, "{:<26} {}", "CEO final authority", reference.ceo_items);
    let _ = writeln!(
        out,
        "{:<26} {}",
        "organisation chart",
        if reference.org_data.is_some() { "yes" } else { "no" }
    );
    let _ = writeln!(
        out,
        "{:<26} {}",
        "routing guide",
        if reference.guide_data.is_some() { "yes" } else { "no" }
    );
    out
}

/// A section as a vertical card: header, rules indented by level, then
/// the common annotations.
pub fn section_card(section: &DomainSection) -> String {
    let data = &section.data;
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===", section.display_name);
    let _ = writeln!(out, "{} ({})", data.notes, data.version);
    out.push('\n');

    for rule in &data.rules {
        write_rule(&mut out, rule);
    }

    if !data.common_annotations.is_empty() {
        out.push('\n');
        out.push_str("Common annotations\n");
        for annotation in &data.common_annotations {
            let _ = writeln!(out, "{INDENT}{:<24} {}", annotation.keyword, annotation.text);
        }
    }
    out
}

// ── Rules ──

fn write_rule(out: &mut String, rule: &RuleEntry) {
    let indent = INDENT.repeat(usize::from(rule.level.max(1)));
    if rule.is_sub_section {
        let _ = writeln!(out, "{indent}[{}]", rule.display_item);
        return;
    }
    let _ = writeln!(out, "{indent}{}", rule.display_item);

    if !rule.approvers.is_empty() {
        let line: Vec<String> = rule
            .approvers
            .iter()
            .map(|a| match &a.condition {
                Some(condition) => format!("{} {} ({condition})", a.symbol.glyph(), a.role),
                None => format!("{} {}", a.symbol.glyph(), a.role),
            })
            .collect();
        let _ = writeln!(out, "{indent}{INDENT}{}", line.join(", "));
    }
    if rule.notes != EMPTY_NOTES {
        let _ = writeln!(out, "{indent}{INDENT}비고: {}", rule.notes);
    }
    if let Some(annotation) = &rule.annotation {
        let _ = writeln!(out, "{indent}{INDENT}주석: {annotation}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jeongyeol_core::{Approver, CommonAnnotation, Section, Symbol};

    fn purchase() -> DomainSection {
        let mut rule = RuleEntry::new("1.1 연간 구매계획");
        rule.approvers = vec![
            Approver::new("CEO", Symbol::FinalAuthority).with_condition("1억원 초과"),
            Approver::new("재무팀", Symbol::Receipt),
        ];
        rule.notes = "분기별 검토".into();

        DomainSection {
            tab_id: "tab-purchase".into(),
            display_name: "구매".into(),
            data: Section {
                section: "구매".into(),
                version: "v2025.12.01".into(),
                notes: "제03장 구매".into(),
                rules: vec![RuleEntry::sub_section_title("제1절 구매계획", "1"), rule],
                common_annotations: vec![CommonAnnotation {
                    reference: "공통-계약".into(),
                    keyword: "계약".into(),
                    text: "계약서 필수".into(),
                }],
            },
        }
    }

    #[test]
    fn card_lists_rules_with_approvers() {
        let card = section_card(&purchase());
        let lines: Vec<&str> = card.lines().collect();
        assert_eq!(lines[0], "=== 구매 ===");
        assert_eq!(lines[1], "제03장 구매 (v2025.12.01)");
        assert!(card.contains("[제1절 구매계획]"));
        assert!(card.contains("    1.1 연간 구매계획\n"));
        assert!(card.contains("◎ CEO (1억원 초과), → 재무팀"));
        assert!(card.contains("비고: 분기별 검토"));
        assert!(card.contains("Common annotations\n  계약"));
    }

    #[test]
    fn summary_totals() {
        let mut reference = Reference::default();
        reference.push(purchase());
        let text = summary(&reference);
        assert!(text.starts_with("tab-purchase"));
        assert!(text.contains("total items                2"));
        assert!(text.contains("CEO final authority        1"));
        assert!(text.contains("organisation chart         no"));
    }
}
