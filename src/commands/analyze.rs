use serde::Serialize;

use super::format::OutputFormat;
use super::json;
use super::markdown;
use super::options::{AnalysisScope, AnalyzeOptions};
use super::session::Session;
use crate::config::AppConfig;
use crate::error::{CodelensError, Result};
use crate::language;
use crate::llm::provider::ProviderFactory;
use crate::llm::provider::catalog::ProviderId;
use crate::llm::{
    AnalysisOutcome, AnalysisProvider, AnalysisRequest, DegradedResponse, Operation,
    QualityReport, SuggestionSet, TestSuite,
};
use crate::ui;

/// Results of one `analyze` run; absent operations are omitted.
#[derive(Debug, Default, Serialize)]
pub struct AnalysisResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<AnalysisOutcome<QualityReport>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tests: Option<AnalysisOutcome<TestSuite>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<AnalysisOutcome<SuggestionSet>>,
}

/// JSON `data` payload.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub file: String,
    pub language: String,
    pub provider: ProviderId,
    pub model: String,
    #[serde(flatten)]
    pub results: AnalysisResults,
}

pub async fn run(options: &AnalyzeOptions<'_>, config: &AppConfig) -> Result<()> {
    let colored = options.effective_colored(config.ui.colored);

    let code = std::fs::read_to_string(options.file)?;
    if code.trim().is_empty() {
        return Err(CodelensError::InvalidInput(format!(
            "{} is empty, nothing to analyze",
            options.file
        )));
    }

    let language = options
        .language
        .map(str::to_string)
        .unwrap_or_else(|| language::detect(options.file, &code).to_string());

    let session = Session::load(config)?;
    let provider = match options.provider {
        Some(id) => id
            .parse::<ProviderId>()
            .map_err(|_| CodelensError::UnsupportedProvider(id.to_string()))?,
        None => session.record.provider,
    };
    // 记录中的模型只对记录中的 provider 有效
    let model = options
        .model
        .map(str::to_string)
        .or_else(|| (provider == session.record.provider).then(|| session.record.model.clone()))
        .unwrap_or_else(|| provider.descriptor().default_model().to_string());

    let request = AnalysisRequest {
        code,
        language,
        provider,
        model,
        credential: session.credential_for(config, provider)?,
    };
    tracing::debug!("Analyze request: {:?}", request);

    let factory = ProviderFactory::new(config)?;
    let adapter = factory.create_for(&request)?;

    let results = execute(
        &adapter,
        options.scope,
        &request.code,
        &request.language,
        options.format.is_interactive(),
    )
    .await?;

    let report = AnalysisReport {
        file: options.file.to_string(),
        language: request.language,
        provider: request.provider,
        model: adapter.model().to_string(),
        results,
    };

    match options.format {
        OutputFormat::Json => json::output_json_success(&report),
        OutputFormat::Markdown => {
            print!("{}", markdown::render(&report, adapter.name()));
            Ok(())
        }
        OutputFormat::Text => {
            print_text(&report, adapter.name(), colored);
            Ok(())
        }
    }
}

/// Runs the selected operations one after another; the first failure aborts.
pub async fn execute(
    provider: &dyn AnalysisProvider,
    scope: AnalysisScope,
    code: &str,
    language: &str,
    show_spinner: bool,
) -> Result<AnalysisResults> {
    let mut results = AnalysisResults::default();

    for operation in scope.operations() {
        let spinner = ui::Spinner::new(
            &format!(
                "Running {} analysis with {} ({})...",
                operation,
                provider.name(),
                provider.model()
            ),
            show_spinner,
        );

        match operation {
            Operation::Quality => {
                results.quality = Some(provider.analyze_quality(code, language).await?)
            }
            Operation::Tests => results.tests = Some(provider.generate_tests(code, language).await?),
            Operation::Suggestions => {
                results.suggestions = Some(provider.suggest_improvements(code, language).await?)
            }
        }
        spinner.finish_and_clear();
    }

    Ok(results)
}

fn print_text(report: &AnalysisReport, provider_name: &str, colored: bool) {
    println!(
        "{}",
        ui::info(
            &format!(
                "{} ({}) via {} / {}",
                report.file, report.language, provider_name, report.model
            ),
            colored
        )
    );

    if let Some(outcome) = &report.results.quality {
        println!();
        println!("{}", ui::heading("Code quality", colored));
        match outcome {
            AnalysisOutcome::Parsed(quality) => print_quality(quality, colored),
            AnalysisOutcome::Degraded(degraded) => print_degraded(degraded, colored),
        }
    }

    if let Some(outcome) = &report.results.tests {
        println!();
        println!("{}", ui::heading("Generated tests", colored));
        match outcome {
            AnalysisOutcome::Parsed(suite) => print_tests(suite, colored),
            AnalysisOutcome::Degraded(degraded) => print_degraded(degraded, colored),
        }
    }

    if let Some(outcome) = &report.results.suggestions {
        println!();
        println!("{}", ui::heading("Improvement suggestions", colored));
        match outcome {
            AnalysisOutcome::Parsed(set) => print_suggestions(set, colored),
            AnalysisOutcome::Degraded(degraded) => print_degraded(degraded, colored),
        }
    }
}

fn print_quality(report: &QualityReport, colored: bool) {
    println!("Score: {}", ui::score(report.quality_score, colored));
    println!(
        "Complexity {}  maintainability {:.0}  readability {:.0}  security {:.0}",
        ui::level_label(report.metrics.complexity, colored),
        report.metrics.maintainability,
        report.metrics.readability,
        report.metrics.security
    );
    if !report.summary.is_empty() {
        println!();
        println!("{}", report.summary);
    }

    if !report.issues.is_empty() {
        println!();
        for (i, issue) in report.issues.iter().enumerate() {
            let location = issue
                .line
                .map(|line| format!(" line {}", line))
                .unwrap_or_default();
            println!(
                "  {}. {} {:?}{}: {}",
                i + 1,
                ui::level_label(issue.severity, colored),
                issue.kind,
                location,
                issue.message
            );
            if !issue.suggestion.is_empty() {
                println!("     -> {}", issue.suggestion);
            }
        }
    }

    for recommendation in &report.recommendations {
        println!("  • {}", recommendation);
    }
}

fn print_tests(suite: &TestSuite, colored: bool) {
    if !suite.test_framework.is_empty() {
        println!("Framework: {}", suite.test_framework);
    }
    for case in &suite.test_cases {
        println!();
        println!(
            "{} {} ({:?})",
            ui::level_label(case.priority, colored),
            case.name,
            case.kind
        );
        if !case.description.is_empty() {
            println!("  {}", case.description);
        }
        for line in case.test_code.lines() {
            println!("    {}", line);
        }
    }
    print_list("Coverage", &suite.coverage_suggestions, colored);
    print_list("Mocking", &suite.mocking_suggestions, colored);
}

fn print_suggestions(set: &SuggestionSet, colored: bool) {
    for suggestion in &set.refactoring_suggestions {
        println!();
        println!("[{:?}] {}", suggestion.category, suggestion.description);
        if !suggestion.before_code.is_empty() {
            println!("  before: {}", suggestion.before_code);
        }
        if !suggestion.after_code.is_empty() {
            println!("  after:  {}", suggestion.after_code);
        }
        if !suggestion.rationale.is_empty() {
            println!("  {}", suggestion.rationale);
        }
    }
    print_list("Architecture", &set.architecture_suggestions, colored);
    print_list("Dependencies", &set.dependency_suggestions, colored);
}

fn print_list(title: &str, items: &[String], colored: bool) {
    if items.is_empty() {
        return;
    }
    println!();
    println!("{}", ui::heading(title, colored));
    for item in items {
        println!("  • {}", item);
    }
}

fn print_degraded(degraded: &DegradedResponse, colored: bool) {
    ui::warning(&degraded.error, colored);
    println!("{}", degraded.content);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockAnalysisProvider;
    use pretty_assertions::assert_eq;

    fn mock() -> MockAnalysisProvider {
        let mut mock = MockAnalysisProvider::new();
        mock.expect_name().return_const("Mock".to_string());
        mock.expect_model().return_const("mock-1".to_string());
        mock
    }

    fn suite() -> TestSuite {
        TestSuite {
            test_framework: "pytest".to_string(),
            test_cases: vec![],
            coverage_suggestions: vec![],
            mocking_suggestions: vec![],
        }
    }

    #[tokio::test]
    async fn test_single_operation_runs_once() {
        let mut mock = mock();
        mock.expect_generate_tests()
            .times(1)
            .returning(|_, _| Ok(AnalysisOutcome::Parsed(suite())));
        mock.expect_analyze_quality().never();
        mock.expect_suggest_improvements().never();

        let results = execute(&mock, AnalysisScope::Single(Operation::Tests), "x", "python", false)
            .await
            .unwrap();

        assert!(results.quality.is_none());
        assert_eq!(results.tests.unwrap().parsed().unwrap().test_framework, "pytest");
    }

    #[tokio::test]
    async fn test_failure_aborts_remaining_operations() {
        let mut mock = mock();
        mock.expect_analyze_quality().times(1).returning(|_, _| {
            Err(CodelensError::Transport {
                provider: "Mock".to_string(),
                status: Some(401),
                body: "unauthorized".to_string(),
            })
        });
        mock.expect_generate_tests().never();
        mock.expect_suggest_improvements().never();

        let err = execute(&mock, AnalysisScope::All, "x", "python", false)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn test_degraded_outcome_is_reported() {
        let mut mock = mock();
        mock.expect_suggest_improvements().returning(|_, _| {
            Ok(AnalysisOutcome::Degraded(DegradedResponse::invalid_json("plain text")))
        });

        let results = execute(
            &mock,
            AnalysisScope::Single(Operation::Suggestions),
            "x",
            "python",
            false,
        )
        .await
        .unwrap();

        let json = serde_json::to_value(&results).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "suggestions": {"error": "Invalid JSON response", "content": "plain text"}
            })
        );
    }
}
