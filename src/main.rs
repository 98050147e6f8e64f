// Re-export all library modules
use codelens::*;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tokio::runtime::Runtime;

fn main() -> Result<()> {
    human_panic::setup_panic!();

    // reqwest 使用 rustls-no-provider，需要在任何请求前安装 crypto provider
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cli = Cli::parse();

    // 根据 verbose 标志设置日志级别
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    // 初始化 tracing 日志（输出到 stderr，避免污染 JSON 输出）
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .init();

    // providers/detect/vault 不需要有效配置，可以在配置损坏时运行
    let needs_config = matches!(
        &cli.command,
        Commands::Analyze { .. } | Commands::Validate { .. } | Commands::Keys { .. }
    );

    let mut config = if needs_config {
        config::load_config()?
    } else {
        config::load_config().unwrap_or_default()
    };
    if cli.verbose {
        config.ui.verbose = true;
    }
    let colored = config.ui.colored;

    let rt = Runtime::new()?;

    rt.block_on(async {
        match cli.command {
            Commands::Providers { json } => {
                if let Err(e) = commands::providers::run(json, colored) {
                    exit_with_error(&e, colored);
                }
                Ok(())
            }
            Commands::Detect { ref file } => {
                if let Err(e) = commands::detect::run(file) {
                    exit_with_error(&e, colored);
                }
                Ok(())
            }
            Commands::Analyze {
                ref file,
                ref provider,
                ref model,
                ref operation,
                ref language,
                ref format,
                json,
            } => {
                let format = match commands::OutputFormat::from_cli(format, json) {
                    Ok(format) => format,
                    Err(e) => exit_with_error(&e, colored),
                };
                let scope = match operation.parse::<commands::AnalysisScope>() {
                    Ok(scope) => scope,
                    Err(e) => report_and_exit(&e, format, colored),
                };
                let options = commands::AnalyzeOptions {
                    file,
                    provider: provider.as_deref(),
                    model: model.as_deref(),
                    language: language.as_deref(),
                    scope,
                    format,
                };
                if let Err(e) = commands::analyze::run(&options, &config).await {
                    report_and_exit(&e, format, colored);
                }
                Ok(())
            }
            Commands::Validate {
                ref provider,
                ref key,
            } => match commands::validate::run(provider, key.as_deref(), &config).await {
                Ok(true) => Ok(()),
                Ok(false) => std::process::exit(1),
                Err(e) => exit_with_error(&e, colored),
            },
            Commands::Keys { ref action } => {
                if let Err(e) = commands::keys::run(action, &config) {
                    exit_with_error(&e, colored);
                }
                Ok(())
            }
            Commands::Vault { ref action } => {
                if let Err(e) = commands::vault::run(action, colored) {
                    exit_with_error(&e, colored);
                }
                Ok(())
            }
        }
    })
}

/// JSON 模式输出 JSON 错误，否则输出带建议的错误信息
fn report_and_exit(e: &error::CodelensError, format: commands::OutputFormat, colored: bool) -> ! {
    if format.is_json() {
        let _ = commands::json::output_json_error::<()>(e);
        std::process::exit(1);
    }
    exit_with_error(e, colored)
}

fn exit_with_error(e: &error::CodelensError, colored: bool) -> ! {
    ui::error(&e.to_string(), colored);
    if let Some(suggestion) = e.suggestion() {
        eprintln!();
        eprintln!("{}", ui::info(suggestion, colored));
    }
    std::process::exit(1);
}
