use std::fmt::Write;

use scribe_core::{
    facet_view, AppViewModel, ArticleFacet, FacetView, JobDetailView, JobRowView, StepState,
    ToolKind, ToolOutput, ToolPanelView,
};

pub const BANNER: &str = "scribe dashboard (type `help` for commands)";

/// Renders the whole dashboard as plain text.
pub fn render(view: &AppViewModel, facet: ArticleFacet) -> String {
    let mut out = String::new();

    let filter = view.list_filter.map_or("all", |status| status.as_str());
    let _ = writeln!(
        out,
        "== {} | filter: {}{} ==",
        view.backend,
        filter,
        if view.busy { " | working..." } else { "" }
    );
    if let Some(error) = &view.last_error {
        let _ = writeln!(out, "!! {error}  (dismiss to clear)");
    }

    if view.jobs.is_empty() {
        out.push_str("no jobs\n");
    }
    for (idx, row) in view.jobs.iter().enumerate() {
        let _ = writeln!(out, "{}", format_job_row(idx + 1, row));
    }

    if let Some(detail) = &view.current {
        out.push('\n');
        render_detail(&mut out, detail, facet);
    }

    render_tool(&mut out, &view.tool);
    out
}

fn format_job_row(number: usize, row: &JobRowView) -> String {
    format!(
        "{marker}#{number:<3} {glyph} {label:<12} {progress:>3}%  {id}  {created}",
        marker = if row.is_current { ">" } else { " " },
        glyph = row.status.glyph,
        label = row.status.label,
        progress = row.progress_percent,
        id = row.job_id,
        created = row.created_at,
    )
}

fn render_detail(out: &mut String, detail: &JobDetailView, facet: ArticleFacet) {
    let _ = writeln!(
        out,
        "job {} | {} {} | {}%{}",
        detail.job_id,
        detail.status.glyph,
        detail.status.label,
        detail.progress_percent,
        if detail.polling { " | live" } else { "" }
    );
    if let Some(step) = &detail.current_step {
        let _ = writeln!(out, "step: {step}");
    }
    let _ = writeln!(out, "{}", progress_bar(detail.progress_percent));

    let steps: Vec<String> = detail
        .steps
        .iter()
        .map(|step| {
            let mark = match step.state {
                StepState::Done => "x",
                StepState::Active => ">",
                StepState::Upcoming => " ",
                StepState::Halted => "-",
            };
            format!("[{mark}] {}", step.descriptor.label)
        })
        .collect();
    let _ = writeln!(out, "{}", steps.join("  "));

    let _ = writeln!(
        out,
        "created {} | updated {}{}",
        detail.created_at,
        detail.updated_at,
        detail
            .completed_at
            .as_ref()
            .map(|at| format!(" | completed {at}"))
            .unwrap_or_default()
    );
    if let Some(warning) = &detail.poll_warning {
        let _ = writeln!(out, "warning: {warning}");
    }
    if let Some(message) = &detail.error_message {
        let _ = writeln!(out, "error: {message}");
        let _ = writeln!(
            out,
            "checkpoints: research {} | outline {}",
            yes_no(detail.serp_data_collected),
            yes_no(detail.outline_generated)
        );
    }
    if detail.can_resume {
        out.push_str("this job can be resumed: `resume`\n");
    }

    if let Some(article) = &detail.article {
        let tabs: Vec<String> = ArticleFacet::ALL
            .iter()
            .map(|candidate| {
                if *candidate == facet {
                    format!("[{}]", candidate.label())
                } else {
                    candidate.label().to_string()
                }
            })
            .collect();
        let _ = writeln!(out, "\n{}", tabs.join(" "));
        render_facet(out, facet_view(article, facet));
    }
}

fn render_facet(out: &mut String, facet: FacetView<'_>) {
    match facet {
        FacetView::Content(content) => {
            let _ = writeln!(
                out,
                "{} ({} words, {:.1}s)",
                content.title, content.word_count, content.generation_time_seconds
            );
            let _ = writeln!(out, "title tag: {}", content.metadata.title_tag);
            let _ = writeln!(out, "meta: {}", content.metadata.meta_description);
            let _ = writeln!(out, "focus keyword: {}", content.metadata.focus_keyword);
            for section in content.sections {
                let depth = usize::from(section.level.max(1));
                let _ = writeln!(out, "\n{} {}", "#".repeat(depth), section.heading);
                let _ = writeln!(out, "{}", section.content);
            }
        }
        FacetView::Quality(quality) => {
            match quality.quality {
                Some(score) => {
                    let _ = writeln!(
                        out,
                        "overall {:.0} | readability {:.0} | seo {:.0}{}",
                        score.overall_score,
                        score.readability_score,
                        score.seo_score,
                        if score.needs_revision { " | needs revision" } else { "" }
                    );
                    for suggestion in &score.improvement_suggestions {
                        let _ = writeln!(out, "  - {suggestion}");
                    }
                }
                None => out.push_str("no quality score\n"),
            }
            if let Some(validation) = quality.validation {
                let _ = writeln!(
                    out,
                    "seo validation: {} ({:.0})",
                    if validation.is_valid { "pass" } else { "fail" },
                    validation.score
                );
                for (check, passed) in &validation.checks {
                    let _ = writeln!(out, "  [{}] {check}", if *passed { "x" } else { " " });
                }
                for issue in &validation.issues {
                    let _ = writeln!(out, "  issue: {issue}");
                }
            }
            let keywords = quality.keywords;
            let _ = writeln!(
                out,
                "keyword `{}`: {} uses, {:.2}% density",
                keywords.primary_keyword,
                keywords.primary_keyword_count,
                keywords.primary_keyword_density
            );
            for (keyword, count) in &keywords.secondary_keywords {
                let _ = writeln!(out, "  {keyword}: {count}");
            }
        }
        FacetView::Links(links) => {
            let _ = writeln!(out, "internal links ({})", links.internal.len());
            for link in links.internal {
                let _ = writeln!(
                    out,
                    "  \"{}\" -> {} ({:.2})",
                    link.anchor_text, link.suggested_target_topic, link.relevance_score
                );
            }
            let _ = writeln!(out, "external references ({})", links.external.len());
            for reference in links.external {
                let _ = writeln!(
                    out,
                    "  {} [{}]{}",
                    reference.source_name,
                    reference.source_type,
                    reference
                        .url
                        .as_ref()
                        .map(|url| format!(" {url}"))
                        .unwrap_or_default()
                );
            }
        }
        FacetView::Faq(faq) => {
            if faq.items.is_empty() {
                out.push_str("no faq\n");
            }
            for item in faq.items {
                let _ = writeln!(out, "Q: {}\nA: {}", item.question, item.answer);
            }
        }
    }
}

fn render_tool(out: &mut String, tool: &ToolPanelView) {
    match tool {
        ToolPanelView::Hidden => {}
        ToolPanelView::Running(kind) => {
            let _ = writeln!(out, "\n[{}] running...", tool_name(*kind));
        }
        ToolPanelView::Ready(ToolOutput::Research(analysis)) => {
            let _ = writeln!(
                out,
                "\n[research] {} ({} results)",
                analysis.query, analysis.total_results
            );
            for result in &analysis.results {
                let _ = writeln!(out, "  {}. {} {}", result.rank, result.title, result.url);
            }
            for question in &analysis.common_questions {
                let _ = writeln!(out, "  ? {question}");
            }
        }
        ToolPanelView::Ready(ToolOutput::Outline(outline)) => {
            let _ = writeln!(
                out,
                "\n[outline] {} (~{} words)",
                outline.title, outline.estimated_word_count
            );
            for section in &outline.sections {
                let indent = "  ".repeat(usize::from(section.level.saturating_sub(1)));
                let _ = writeln!(out, "  {indent}{}", section.heading);
            }
        }
        ToolPanelView::Ready(ToolOutput::Article(article)) => {
            let _ = writeln!(
                out,
                "\n[generate] {} ({} words)",
                article.title, article.word_count
            );
        }
    }
}

fn tool_name(kind: ToolKind) -> &'static str {
    match kind {
        ToolKind::Research => "research",
        ToolKind::Outline => "outline",
        ToolKind::Generate => "generate",
    }
}

fn progress_bar(percent: u8) -> String {
    const WIDTH: usize = 28;
    let filled = usize::from(percent.min(100)) * WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(WIDTH - filled))
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "done"
    } else {
        "missing"
    }
}

#[cfg(test)]
mod tests {
    use scribe_core::{AppState, JobId, JobStatus, StepView};

    use super::*;

    fn failed_detail() -> JobDetailView {
        let status = JobStatus::Failed.descriptor();
        JobDetailView {
            job_id: JobId::from("abc123"),
            status,
            progress_percent: 40,
            current_step: Some("Generating article".to_string()),
            steps: vec![StepView {
                descriptor: JobStatus::Pending.descriptor(),
                state: StepState::Done,
            }],
            polling: false,
            poll_warning: None,
            can_resume: true,
            error_message: Some("LLM timeout".to_string()),
            created_at: "2024-05-01 10:00:00".to_string(),
            updated_at: "2024-05-01 10:03:00".to_string(),
            completed_at: None,
            serp_data_collected: true,
            outline_generated: false,
            article: None,
        }
    }

    #[test]
    fn empty_dashboard_shows_backend_and_filter() {
        let text = render(&AppState::new().view(), ArticleFacet::Content);
        assert!(text.starts_with("== backend: checking | filter: all =="));
        assert!(text.contains("no jobs"));
    }

    #[test]
    fn failed_job_offers_resume_and_checkpoints() {
        let mut view = AppState::new().view();
        view.current = Some(failed_detail());
        view.last_error = Some("Failed to resume job abc123: boom".to_string());

        let text = render(&view, ArticleFacet::Content);
        assert!(text.contains("!! Failed to resume job abc123: boom"));
        assert!(text.contains("job abc123 | ✗ Failed | 40%"));
        assert!(text.contains("error: LLM timeout"));
        assert!(text.contains("checkpoints: research done | outline missing"));
        assert!(text.contains("`resume`"));
    }

    #[test]
    fn running_tool_is_announced() {
        let mut view = AppState::new().view();
        view.tool = ToolPanelView::Running(ToolKind::Outline);
        assert!(render(&view, ArticleFacet::Faq).contains("[outline] running..."));
    }

    #[test]
    fn progress_bar_is_proportional() {
        assert_eq!(progress_bar(0), format!("[{}]", ".".repeat(28)));
        assert_eq!(progress_bar(100), format!("[{}]", "#".repeat(28)));
        assert_eq!(progress_bar(50).matches('#').count(), 14);
    }
}
