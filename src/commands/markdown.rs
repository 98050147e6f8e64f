//! Markdown rendering of an `analyze` report.

use std::fmt::Write;

use super::analyze::AnalysisReport;
use crate::llm::{AnalysisOutcome, DegradedResponse, QualityReport, SuggestionSet, TestSuite};

/// Renders the whole report; sections for operations that did not run are left out.
pub fn render(report: &AnalysisReport, provider_name: &str) -> String {
    let mut out = String::new();

    // String 的 fmt::Write 不会失败
    let _ = writeln!(out, "# Code analysis: `{}`", report.file);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Language **{}**, analyzed by {} (`{}`).",
        report.language, provider_name, report.model
    );

    if let Some(outcome) = &report.results.quality {
        section(&mut out, "Code quality", outcome, quality_report);
    }
    if let Some(outcome) = &report.results.tests {
        section(&mut out, "Generated tests", outcome, test_suite);
    }
    if let Some(outcome) = &report.results.suggestions {
        section(&mut out, "Improvement suggestions", outcome, suggestion_set);
    }

    out
}

fn section<T>(
    out: &mut String,
    title: &str,
    outcome: &AnalysisOutcome<T>,
    render_parsed: fn(&mut String, &T),
) {
    let _ = writeln!(out);
    let _ = writeln!(out, "## {}", title);
    let _ = writeln!(out);
    match outcome {
        AnalysisOutcome::Parsed(value) => render_parsed(out, value),
        AnalysisOutcome::Degraded(degraded) => degraded_reply(out, degraded),
    }
}

fn quality_report(out: &mut String, report: &QualityReport) {
    let _ = writeln!(out, "**Score:** {:.0}/100", report.quality_score);
    let _ = writeln!(out);
    let _ = writeln!(out, "| Metric | Value |");
    let _ = writeln!(out, "|---|---|");
    let _ = writeln!(out, "| Complexity | {} |", report.metrics.complexity.as_str());
    let _ = writeln!(out, "| Maintainability | {:.0} |", report.metrics.maintainability);
    let _ = writeln!(out, "| Readability | {:.0} |", report.metrics.readability);
    let _ = writeln!(out, "| Security | {:.0} |", report.metrics.security);

    if !report.summary.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", report.summary);
    }

    if !report.issues.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "### Issues");
        let _ = writeln!(out);
        for issue in &report.issues {
            let location = issue
                .line
                .map(|line| format!(" (line {})", line))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "- **{}** {:?}{}: {}",
                issue.severity.as_str(),
                issue.kind,
                location,
                issue.message
            );
            if !issue.suggestion.is_empty() {
                let _ = writeln!(out, "  - {}", issue.suggestion);
            }
        }
    }

    bullet_list(out, "Recommendations", &report.recommendations);
}

fn test_suite(out: &mut String, suite: &TestSuite) {
    if !suite.test_framework.is_empty() {
        let _ = writeln!(out, "Framework: `{}`", suite.test_framework);
    }
    for case in &suite.test_cases {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "### {} ({:?}, {} priority)",
            case.name,
            case.kind,
            case.priority.as_str()
        );
        if !case.description.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", case.description);
        }
        if !case.test_code.is_empty() {
            let _ = writeln!(out);
            code_block(out, &case.test_code);
        }
    }
    bullet_list(out, "Coverage", &suite.coverage_suggestions);
    bullet_list(out, "Mocking", &suite.mocking_suggestions);
}

fn suggestion_set(out: &mut String, set: &SuggestionSet) {
    for suggestion in &set.refactoring_suggestions {
        let _ = writeln!(out);
        let _ = writeln!(out, "### {:?}: {}", suggestion.category, suggestion.description);
        if !suggestion.before_code.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Before:");
            code_block(out, &suggestion.before_code);
        }
        if !suggestion.after_code.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "After:");
            code_block(out, &suggestion.after_code);
        }
        if !suggestion.rationale.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", suggestion.rationale);
        }
    }
    bullet_list(out, "Architecture", &set.architecture_suggestions);
    bullet_list(out, "Dependencies", &set.dependency_suggestions);
}

fn bullet_list(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "### {}", title);
    let _ = writeln!(out);
    for item in items {
        let _ = writeln!(out, "- {}", item);
    }
}

fn code_block(out: &mut String, code: &str) {
    let _ = writeln!(out, "```");
    let _ = writeln!(out, "{}", code.trim_end());
    let _ = writeln!(out, "```");
}

fn degraded_reply(out: &mut String, degraded: &DegradedResponse) {
    let _ = writeln!(out, "> {}", degraded.error);
    let _ = writeln!(out);
    code_block(out, &degraded.content);
}
