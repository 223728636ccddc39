use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::{info, warn};

use resume_analyzer::models::SubmissionState;
use resume_analyzer::services::DEFAULT_EXPORT_FILE;
use resume_analyzer::utils::logging;
use resume_analyzer::{
    logger, AnalyzeClient, AppResult, Config, FeedbackReport, ResumeFile, SubmissionOrchestrator,
    SubmitOutcome, UploadSpec,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Command-line arguments
struct Args {
    /// Use the PDF-only / 5 MB upload profile
    #[arg(long = "strict-pdf", action = ArgAction::SetTrue, global = true)]
    strict_pdf: bool,

    /// Verbose logging
    #[arg(short, long, action = ArgAction::SetTrue, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a resume and print the analysis
    Analyze {
        /// Resume file (PDF, DOC, DOCX, TXT, RTF)
        file: PathBuf,

        /// Target job role
        #[arg(long, value_name = "ROLE")]
        job_role: Option<String>,

        /// Skip AI-generated feedback
        #[arg(long = "no-llm", action = ArgAction::SetTrue)]
        no_llm: bool,

        /// Declared content type, e.g. application/pdf
        #[arg(long, value_name = "MIME")]
        content_type: Option<String>,

        /// Write the feedback report to a file
        #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = DEFAULT_EXPORT_FILE)]
        export: Option<PathBuf>,

        /// Print the feedback in clipboard format
        #[arg(long, action = ArgAction::SetTrue)]
        clipboard: bool,

        /// Print the normalized result as JSON on stdout
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },
    /// Check that the analysis service is reachable
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 加载配置
    let mut config = load_config(args.strict_pdf).context("无法加载配置")?;
    config.verbose_logging |= args.verbose;

    // 初始化日志
    logger::init(config.verbose_logging);

    let client = AnalyzeClient::new(&config)?;

    match args.command {
        Command::Health => {
            if client.ping().await {
                info!("✓ 分析服务可用: {}", config.health_url());
                Ok(())
            } else {
                bail!("分析服务不可达: {}", config.health_url());
            }
        }
        Command::Analyze {
            file,
            job_role,
            no_llm,
            content_type,
            export,
            clipboard,
            json,
        } => {
            logging::log_startup(&config);

            let state =
                submit_file(&config, client, &file, content_type, job_role, !no_llm).await?;

            match state {
                SubmissionState::Success(result) => {
                    logging::log_analysis_result(&result);

                    let report = FeedbackReport::from_result(&result);
                    if clipboard {
                        println!("{}", report.to_clipboard_text());
                    }
                    if let Some(path) = export {
                        export_report(&report, &path).await?;
                    }
                    if json {
                        println!("{}", serde_json::to_string_pretty(&result)?);
                    }
                    Ok(())
                }
                SubmissionState::Failed(info) => {
                    logging::log_failure(&info);
                    bail!("{}", info.message);
                }
                other => bail!("意外的状态: {}", other.name()),
            }
        }
    }
}

/// 读取环境配置；`strict_pdf` 时以严格预设为默认值
fn load_config(strict_pdf: bool) -> AppResult<Config> {
    let preset = if strict_pdf {
        Config::strict_pdf()
    } else {
        Config::default()
    };
    Ok(Config::from_env_with(preset)?)
}

/// 读取文件并提交一次分析，返回最终状态
async fn submit_file(
    config: &Config,
    client: AnalyzeClient,
    file: &Path,
    content_type: Option<String>,
    job_role: Option<String>,
    use_llm: bool,
) -> AppResult<SubmissionState> {
    let resume = ResumeFile::from_path(file, content_type).await?;
    let mut spec = UploadSpec::new(resume).with_llm(use_llm);
    if let Some(role) = job_role {
        spec = spec.with_job_role(role);
    }

    let orchestrator = SubmissionOrchestrator::new(config, Arc::new(client));
    let state = match orchestrator.submit(spec).await? {
        SubmitOutcome::Settled(state) => state,
        SubmitOutcome::Discarded => orchestrator.state(),
    };
    Ok(state)
}

/// 导出反馈报告，没有反馈时只打警告
async fn export_report(report: &FeedbackReport, path: &Path) -> AppResult<()> {
    if report.is_empty() {
        warn!("⚠️ 没有可导出的反馈");
        return Ok(());
    }
    report.write_to(path).await?;
    Ok(())
}
