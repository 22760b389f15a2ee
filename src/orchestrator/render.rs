//! 终端输出
//!
//! 只负责把会话状态格式化成文本，不修改任何状态

use crate::models::review::{ANSWER_RUBRIC, CITATION_RUBRIC, FIX_RUBRIC, QUESTION_RUBRIC};
use crate::models::Grading;
use crate::services::{ItemView, Progress, ReviewForm};
use crate::utils::logging::{progress_bar, truncate_text};

const RULE: &str = "────────────────────────────────────────────────────────────";

pub fn render_progress(progress: &Progress) -> String {
    format!(
        "Progress: {}/{} {}",
        progress.position,
        progress.total,
        progress_bar(progress.fraction, 30)
    )
}

pub fn render_document(view: &ItemView) -> String {
    let status = if view.document.found { "" } else { "  [未找到]" };
    format!("📄 {}{}", view.document.path.display(), status)
}

pub fn render_item(topic: &str, view: &ItemView, progress: Option<&Progress>) -> String {
    let mut out = vec![
        RULE.to_string(),
        format!("Topic: {}", topic),
        format!("Cluster: {} | Level: {}", view.index, view.level),
    ];
    if let Some(progress) = progress {
        out.push(render_progress(progress));
    }
    out.push(render_document(view));
    out.push(format!(
        "Source: {}",
        view.citation_source.as_deref().unwrap_or("(không rõ)")
    ));
    out.join("\n")
}

fn render_checks(title: &str, labels: &[&str], checks: &[bool]) -> Vec<String> {
    let mut out = vec![format!("{}:", title)];
    for (i, (label, checked)) in labels.iter().zip(checks).enumerate() {
        let mark = if *checked { "x" } else { " " };
        out.push(format!("  [{}] {}. {}", mark, i + 1, label));
    }
    out
}

pub fn render_form(form: &ReviewForm) -> String {
    let mut out = vec![
        format!("Question: {}", form.question),
        format!("Answer:   {}", form.answer),
        format!("Citation: {}", truncate_text(&form.citation, 400)),
    ];
    out.extend(render_checks("Question Review (q)", &QUESTION_RUBRIC, &form.question_checks));
    out.extend(render_checks("Answer Review (a)", &ANSWER_RUBRIC, &form.answer_checks));
    out.extend(render_checks("Citation Review (c)", &CITATION_RUBRIC, &form.citation_checks));
    out.push(format!("Chấm điểm: {}", form.grading));
    if form.grading.requires_fix_details() {
        out.extend(render_checks("Cần Chỉnh Sửa Nhẹ (f)", &FIX_RUBRIC, &form.fix_checks));
    }
    out.push(RULE.to_string());
    out.join("\n")
}

pub fn render_gradings(current: Grading) -> String {
    Grading::ALL
        .iter()
        .enumerate()
        .map(|(i, grading)| {
            let mark = if *grading == current { "●" } else { "○" };
            format!("  {} {}. {}", mark, i + 1, grading)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_list(title: &str, values: &[String], selected: Option<&str>) -> String {
    let mut out = vec![format!("{}:", title)];
    for value in values {
        let mark = if Some(value.as_str()) == selected { "*" } else { " " };
        out.push(format!(" {} {}", mark, value));
    }
    out.join("\n")
}

pub fn render_pair(topic: &str, topic_size: usize, pair: &[ItemView]) -> String {
    let mut out = vec![
        RULE.to_string(),
        format!("Topic: {}", topic),
        format!("Length of topic: {}", topic_size),
    ];
    for view in pair {
        out.push(format!("Cluster: {}", view.index));
        out.push(format!("  {}", render_document(view)));
        out.push(format!(
            "  Source: {}",
            view.citation_source.as_deref().unwrap_or("(không rõ)")
        ));
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ResolvedDocument;
    use std::path::PathBuf;

    fn view(found: bool) -> ItemView {
        ItemView {
            index: 4,
            topic: "tax".to_string(),
            level: "Remember".to_string(),
            question: "Q".to_string(),
            answer: "A".to_string(),
            citation_text: "C".to_string(),
            citation_source: None,
            file_name: "luat.pdf".to_string(),
            document: ResolvedDocument {
                path: PathBuf::from("law_domain_part2/luat.pdf"),
                found,
            },
        }
    }

    #[test]
    fn test_missing_document_is_marked() {
        assert!(render_document(&view(false)).ends_with("[未找到]"));
        assert!(!render_document(&view(true)).contains("未找到"));
    }

    #[test]
    fn test_fix_checks_only_shown_for_minor_edit() {
        let mut form = ReviewForm::default();
        assert!(!render_form(&form).contains(FIX_RUBRIC[0]));
        form.grading = Grading::MinorEdit;
        assert!(render_form(&form).contains(FIX_RUBRIC[0]));
    }

    #[test]
    fn test_gradings_mark_current() {
        let text = render_gradings(Grading::NoEdit);
        let line = text.lines().nth(2).unwrap();
        assert!(line.contains('●'));
        assert!(line.contains("Không Cần Chỉnh Sửa ✅"));
    }
}
