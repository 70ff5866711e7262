mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod report;
mod services;
mod workflow;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::repos;
use crate::cmd::summarize::{self, SummarizeCommandArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::github::GitHubClient;
use crate::infra::llm::OpenAiClient;
use crate::report::ReportFormat;
use crate::services::LanguageModelService;

#[derive(Parser)]
#[command(
    name = "prdigest",
    author,
    version,
    about = "Summarize merged pull requests across repositories"
)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List organizations visible to the GitHub token.
    Orgs,
    /// List repositories of an organization.
    Repos {
        /// Organization login.
        org: String,
    },
    /// Summarize pull requests merged in a date range.
    Summarize(SummarizeArgs),
    /// Inspect CLI configuration.
    Config(ConfigArgs),
}

#[derive(Args)]
struct SummarizeArgs {
    /// Organization the report is titled after.
    #[arg(short, long)]
    org: String,
    /// Repository as owner/name; repeat for several.
    #[arg(short, long = "repo", required = true)]
    repos: Vec<String>,
    /// First merge date, YYYY-MM-DD.
    #[arg(long = "start")]
    start_date: String,
    /// Last merge date, YYYY-MM-DD (inclusive).
    #[arg(long = "end")]
    end_date: String,
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(error) = run(cli).await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> AppResult<()> {
    match cli.command {
        Commands::Config(args) => config_cmd::run(args.command),
        Commands::Orgs => {
            let context = build_context()?;
            for org in repos::list_orgs(&context).await? {
                println!("{org}");
            }
            Ok(())
        }
        Commands::Repos { org } => {
            let context = build_context()?;
            for repo in repos::list_repos(&context, &org).await? {
                println!("{repo}");
            }
            Ok(())
        }
        Commands::Summarize(args) => run_summarize(args).await,
    }
}

async fn run_summarize(args: SummarizeArgs) -> AppResult<()> {
    let context = build_context()?;
    let format = args.format;
    let digest = summarize::run(
        &context,
        SummarizeCommandArgs {
            org: args.org,
            repos: args.repos,
            start_date: args.start_date,
            end_date: args.end_date,
        },
    )
    .await?;

    println!("{}", report::render(&digest, format)?);
    Ok(())
}

fn build_context() -> AppResult<AppContext> {
    let config = AppConfig::load()?;

    if config.github_token.is_none() {
        warn!("GitHub token not configured; set GITHUB_TOKEN.");
    }
    if config.openai_api_key.is_none() {
        warn!("OpenAI API key not configured; summaries will contain error placeholders.");
    }

    let language_model: Arc<dyn LanguageModelService> = Arc::new(OpenAiClient::new(
        config.openai_base_url.clone(),
        config.openai_api_key.clone(),
        config.http_timeout,
    )?);

    let repository_host = Arc::new(GitHubClient::new(
        config.github_api_url.clone(),
        config.github_token.clone(),
        config.http_timeout,
    )?);

    Ok(AppContext::new(config, repository_host, language_model))
}
