//! Server-side HTML rendering of an assembled reference.

use jeongyeol_core::{Approver, CommonAnnotation, RuleEntry};
use jeongyeol_store::{DomainSection, Reference};

const STYLE: &str = r#"
body { font-family: "Noto Sans KR", sans-serif; margin: 0; color: #222; }
header { padding: 1rem 2rem; background: #1f3b63; color: #fff; }
header .stats span { margin-right: 1.5rem; }
nav { display: flex; flex-wrap: wrap; gap: .25rem; padding: .5rem 2rem; background: #eef2f7; }
.tab-btn { border: 0; padding: .4rem .9rem; background: #fff; cursor: pointer; }
.tab-btn.active { background: #1f3b63; color: #fff; }
.tab-content { display: none; padding: 1rem 2rem; }
.tab-content.active { display: block; }
table { border-collapse: collapse; width: 100%; }
td, th { border-bottom: 1px solid #ddd; padding: .35rem .5rem; vertical-align: top; }
tr.section-title td { background: #f5f0e1; font-weight: bold; }
tr.sub-section td { background: #e8eef8; font-weight: bold; }
.approver { display: inline-block; margin: 0 .25rem .25rem 0; padding: .1rem .4rem; border-radius: .3rem; background: #f0f0f0; }
.approver-ceo { background: #fde2e1; }
.approver-cso { background: #fff1d6; }
.approver-director { background: #e4f1e1; }
.approver-team-leader { background: #e1ecfb; }
.approver-board { background: #eee1fb; }
.symbol-approve { font-weight: bold; }
.annotation { color: #666; font-size: .9em; }
pre { background: #f7f7f7; padding: 1rem; white-space: pre-wrap; }
footer { padding: 1rem 2rem; color: #888; font-size: .85em; }
"#;

const SCRIPT: &str = r#"
document.querySelectorAll('.tab-btn').forEach(function (btn) {
  btn.addEventListener('click', function () {
    document.querySelectorAll('.tab-btn, .tab-content').forEach(function (el) { el.classList.remove('active'); });
    btn.classList.add('active');
    document.getElementById(btn.dataset.tab).classList.add('active');
  });
});
"#;

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Render the full page. `generated_at` is shown in the footer.
pub fn render(reference: &Reference, generated_at: &str) -> String {
    let mut out = String::with_capacity(64 * 1024);
    out.push_str("<!DOCTYPE html>\n<html lang=\"ko\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>전결규정</title>\n<style>");
    out.push_str(STYLE);
    out.push_str("</style>\n</head>\n<body>\n");

    out.push_str("<header>\n<h1>전결규정</h1>\n<div class=\"stats\">");
    out.push_str(&format!(
        "<span>분야 {}</span><span>전체 항목 {}</span><span>CEO 전결 {}</span>",
        reference.sections.len(),
        reference.total_items,
        reference.ceo_items
    ));
    out.push_str("</div>\n</header>\n");

    out.push_str("<nav>\n");
    for (i, section) in reference.sections.iter().enumerate() {
        out.push_str(&format!(
            "<button class=\"tab-btn{}\" data-tab=\"{}\">{}</button>\n",
            if i == 0 { " active" } else { "" },
            escape_html(&section.tab_id),
            escape_html(&section.display_name)
        ));
    }
    if reference.org_data.is_some() {
        out.push_str("<button class=\"tab-btn\" data-tab=\"tab-org\">조직도</button>\n");
    }
    if reference.guide_data.is_some() {
        out.push_str("<button class=\"tab-btn\" data-tab=\"tab-guide\">결재라인 가이드</button>\n");
    }
    out.push_str("</nav>\n");

    for (i, section) in reference.sections.iter().enumerate() {
        render_section(&mut out, section, i == 0);
    }
    if let Some(org) = &reference.org_data {
        render_text_tab(&mut out, "tab-org", "조직도", org);
    }
    if let Some(guide) = &reference.guide_data {
        render_text_tab(&mut out, "tab-guide", "결재라인 가이드", guide);
    }

    out.push_str(&format!(
        "<footer>생성 시각 {}</footer>\n",
        escape_html(generated_at)
    ));
    out.push_str("<script>");
    out.push_str(SCRIPT);
    out.push_str("</script>\n</body>\n</html>\n");
    out
}

// ── Sections ──

fn render_section(out: &mut String, section: &DomainSection, active: bool) {
    let data = &section.data;
    out.push_str(&format!(
        "<section id=\"{}\" class=\"tab-content{}\">\n",
        escape_html(&section.tab_id),
        if active { " active" } else { "" }
    ));
    out.push_str(&format!(
        "<h2>{}</h2>\n<p class=\"meta\">{} · {}</p>\n",
        escape_html(&section.display_name),
        escape_html(&data.notes),
        escape_html(&data.version)
    ));

    out.push_str("<table>\n<thead><tr><th>항목</th><th>결재선</th><th>비고</th></tr></thead>\n<tbody>\n");
    for rule in &data.rules {
        render_rule(out, rule);
    }
    out.push_str("</tbody>\n</table>\n");

    if !data.common_annotations.is_empty() {
        render_common_annotations(out, &data.common_annotations);
    }
    out.push_str("</section>\n");
}

fn row_class(rule: &RuleEntry) -> &'static str {
    if rule.is_sub_section {
        "sub-section"
    } else if rule.is_section_title {
        "section-title"
    } else {
        "rule"
    }
}

fn render_rule(out: &mut String, rule: &RuleEntry) {
    let indent = f32::from(rule.level.saturating_sub(1)) * 1.5;
    out.push_str(&format!(
        "<tr class=\"{} level-{}\"><td style=\"padding-left: {indent}em\">{}",
        row_class(rule),
        rule.level,
        escape_html(&rule.display_item)
    ));
    if let Some(annotation) = &rule.annotation {
        out.push_str(&format!(
            "<div class=\"annotation\">{}</div>",
            escape_html(annotation)
        ));
    }
    out.push_str("</td><td>");
    for approver in &rule.approvers {
        render_approver(out, approver);
    }
    let notes = if rule.notes == jeongyeol_core::model::EMPTY_NOTES {
        ""
    } else {
        rule.notes.as_str()
    };
    out.push_str(&format!("</td><td>{}</td></tr>\n", escape_html(notes)));
}

fn render_approver(out: &mut String, approver: &Approver) {
    let (role_class, symbol_class, symbol_text) = match &approver.badge {
        Some(badge) => (
            badge.role_class.as_str(),
            badge.symbol_class.as_str(),
            badge.symbol_text.as_str(),
        ),
        None => ("", approver.symbol.css_class(), approver.symbol.label()),
    };
    out.push_str(&format!(
        "<span class=\"approver {role_class}\"><span class=\"{symbol_class}\" title=\"{}\">{}</span> {}",
        escape_html(symbol_text),
        approver.symbol.glyph(),
        escape_html(&approver.role)
    ));
    if let Some(condition) = &approver.condition {
        out.push_str(&format!(" <small>({})</small>", escape_html(condition)));
    }
    out.push_str("</span>");
}

fn render_common_annotations(out: &mut String, annotations: &[CommonAnnotation]) {
    out.push_str("<h3>공통 주석</h3>\n<ul class=\"common-annotations\">\n");
    for annotation in annotations {
        out.push_str(&format!(
            "<li><strong>{}</strong> {}</li>\n",
            escape_html(&annotation.keyword),
            escape_html(&annotation.text)
        ));
    }
    out.push_str("</ul>\n");
}

fn render_text_tab(out: &mut String, id: &str, title: &str, text: &str) {
    out.push_str(&format!(
        "<section id=\"{id}\" class=\"tab-content\">\n<h2>{title}</h2>\n<pre>{}</pre>\n</section>\n",
        escape_html(text)
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use jeongyeol_core::{Section, Symbol};

    fn reference() -> Reference {
        let mut title = RuleEntry::sub_section_title("제1절 구매계획", "1");
        title.level = 1;

        let mut rule = RuleEntry::new("1.1 연간 구매계획");
        rule.display_item = "1.1 연간 구매계획".into();
        rule.annotation = Some("예산 범위 내".into());
        rule.approvers = vec![
            Approver::new("CEO", Symbol::FinalAuthority).with_condition("1억원 초과"),
            Approver::new("구매팀장", Symbol::Concurrence),
        ];
        for approver in &mut rule.approvers {
            approver.decorate();
        }

        let mut reference = Reference::default();
        reference.push(DomainSection {
            tab_id: "tab-purchase".into(),
            display_name: "구매".into(),
            data: Section {
                section: "구매".into(),
                version: "v2025.12.01".into(),
                notes: "제03장 구매".into(),
                rules: vec![title, rule],
                common_annotations: vec![CommonAnnotation {
                    reference: "공통-계약".into(),
                    keyword: "계약".into(),
                    text: "계약서 <필수>".into(),
                }],
            },
        });
        reference.org_data = Some("CEO\n └ 구매팀".into());
        reference
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">R&D's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;R&amp;D&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn renders_tabs_counts_and_badges() {
        let html = render(&reference(), "2026-10-19 09:00:00");

        assert!(html.contains("<span>전체 항목 2</span><span>CEO 전결 1</span>"));
        assert!(html.contains(r#"data-tab="tab-purchase">구매</button>"#));
        assert!(html.contains(r#"<section id="tab-purchase" class="tab-content active">"#));
        assert!(html.contains(r#"<tr class="sub-section level-1">"#));
        assert!(html.contains(r#"class="approver approver-ceo""#));
        assert!(html.contains("<small>(1억원 초과)</small>"));
        assert!(html.contains(r#"<div class="annotation">예산 범위 내</div>"#));
        assert!(html.contains("계약서 &lt;필수&gt;"));
        assert!(html.contains(r#"data-tab="tab-org">조직도</button>"#));
        assert!(!html.contains("tab-guide"));
        assert!(html.contains("생성 시각 2026-10-19 09:00:00"));
    }

    #[test]
    fn nested_levels_are_indented() {
        let html = render(&reference(), "");
        assert!(html.contains(r#"<td style="padding-left: 1.5em">1.1 연간 구매계획"#));
        assert!(html.contains(r#"<td style="padding-left: 0em">제1절 구매계획"#));
    }

    #[test]
    fn empty_reference_still_renders() {
        let html = render(&Reference::default(), "now");
        assert!(html.contains("<span>분야 0</span>"));
        assert!(html.ends_with("</html>\n"));
    }
}
