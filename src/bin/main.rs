use anyhow::{Context, Result};
use clap::Parser;
use fragcheck::{ChangelogChecker, GitHubClient, TriggerInput};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// exit status for configuration and transport errors
const ERROR_EXIT_CODE: u8 = 2;

#[derive(Parser)]
#[command(name = "fragcheck")]
#[command(
    version,
    about = "verify a pull request adds a towncrier changelog fragment",
    long_about = None
)]
struct Cli {
    /// name of the event that triggered the run
    #[arg(long, env = "GITHUB_EVENT_NAME")]
    event_name: String,

    /// path to the JSON event payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: Option<PathBuf>,

    /// bot whose `[tool.<bot>.towncrier_changelog]` section holds the policy
    #[arg(long, env = "BOT_USERNAME", default_value = fragcheck::utils::trigger::DEFAULT_BOT_USERNAME)]
    bot_username: String,

    /// API token for the code host
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// base URL of the code host REST API
    #[arg(long, env = "GITHUB_API_URL", default_value = fragcheck::utils::trigger::DEFAULT_API_URL)]
    api_url: String,

    /// read the policy from a local pyproject.toml instead of the base repository
    #[arg(long)]
    config_file: Option<PathBuf>,

    /// output format (json or human)
    #[arg(short, long, default_value = "human")]
    format: OutputFormat,

    /// log debug details to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Json,
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "human" => Ok(OutputFormat::Human),
            _ => Err(format!(
                "invalid output format: {}, use 'json' or 'human'",
                s
            )),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(ERROR_EXIT_CODE)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut input = TriggerInput::new(cli.event_name)
        .bot_username(cli.bot_username)
        .token(cli.token)
        .api_url(cli.api_url)
        .config_file(cli.config_file);
    if let Some(path) = cli.event_path {
        input = input.event_path(path);
    }

    let host = GitHubClient::new(input.api_url.clone(), input.token.clone());
    let report = ChangelogChecker::run(&input, &host).context("changelog check failed")?;

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Human => {
            report.display();
        }
    }

    Ok(report.verdict.exit_code())
}
