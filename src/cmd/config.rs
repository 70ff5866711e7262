use clap::{Args, Subcommand};

use crate::config::AppConfig;
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Show the effective configuration (secrets masked).
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Show => {
            let config = AppConfig::load()?;
            print!("{}", describe(&config));
            Ok(())
        }
    }
}

fn describe(config: &AppConfig) -> String {
    let lines = [
        format!("GitHub API URL: {}", config.github_api_url),
        format!("GitHub token: {}", mask_secret(&config.github_token)),
        format!("OpenAI base URL: {}", config.openai_base_url),
        format!("OpenAI API key: {}", mask_secret(&config.openai_api_key)),
        format!("Unit model: {}", config.unit_model),
        format!("Aggregate model: {}", config.aggregate_model),
        format!("Concurrency: {}", config.concurrency),
        format!("HTTP timeout: {}s", config.http_timeout.as_secs()),
    ];
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.chars().count() > 6 => {
            let chars: Vec<char> = token.chars().collect();
            let prefix: String = chars[..3].iter().collect();
            let suffix: String = chars[chars.len() - 3..].iter().collect();
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}
