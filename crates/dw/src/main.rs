use clap::{Parser, Subcommand};
use dw_core::scanner::AbortReason;
use dw_core::settings::Settings;
use dw_core::types::PullRequestRef;
use dw_core::{GithubApi, SubmitMode, WatchReport, WatchStatus, Watcher, WatcherError};
use dw_github::GithubClient;
use owo_colors::OwoColorize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dw", about = "Flags newly added lint suppressions in pull requests")]
struct Cli {
    /// TOML settings file (or DW_CONFIG); DW_* environment variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Listen for pull request webhooks.
    Serve,
    /// Review one pull request from the command line.
    Scan {
        /// Repository as owner/name.
        repo: String,
        number: u64,
        /// Print findings without submitting a review.
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        json: bool,
    },
    Openapi,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Command::Openapi = cli.command {
        println!("{}", dw_serve::openapi::generate_spec());
        return ExitCode::SUCCESS;
    }

    let config_path = cli
        .config
        .or_else(|| std::env::var_os("DW_CONFIG").map(PathBuf::from));
    let settings = match Settings::load(config_path.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{} {err}", "config error:".red());
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Command::Serve => serve(&settings).await,
        Command::Scan {
            repo,
            number,
            dry_run,
            json,
        } => {
            let mode = if dry_run {
                SubmitMode::DryRun
            } else {
                SubmitMode::Submit
            };
            match scan(&settings, &repo, number, mode).await {
                Ok(report) => {
                    print_report(&report, json);
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    eprintln!("{} {err}", "scan failed:".red());
                    ExitCode::FAILURE
                }
            }
        }
        Command::Openapi => ExitCode::SUCCESS,
    }
}

async fn serve(settings: &Settings) -> ExitCode {
    let state = match dw_serve::AppState::from_settings(settings) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("{} {err}", "config error:".red());
            return ExitCode::FAILURE;
        }
    };
    let addr = SocketAddr::new(settings.host, settings.port);
    if let Err(err) = dw_serve::serve(state, addr).await {
        tracing::error!(%err, "server stopped");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn scan(
    settings: &Settings,
    repo: &str,
    number: u64,
    mode: SubmitMode,
) -> Result<WatchReport, WatcherError> {
    let pull = PullRequestRef::parse(repo, number)?;
    let client = GithubClient::from_settings(settings)?;
    let watcher = Watcher::new(client, settings.bot_login.clone())
        .with_config_path(settings.repo_config_path.clone());

    let head = watcher.api().get_pull_request(&pull).await?.head;
    let config = watcher.load_config(&pull).await?;
    watcher.review(&pull, &head, &config, mode).await
}

fn print_report(report: &WatchReport, json: bool) {
    if json {
        match serde_json::to_string_pretty(report) {
            Ok(out) => println!("{out}"),
            Err(err) => eprintln!("failed to encode report: {err}"),
        }
        return;
    }

    for comment in &report.comments {
        println!(
            "{}:{} {}",
            comment.path.cyan(),
            comment.position.yellow(),
            comment.body
        );
    }
    match &report.aborted {
        Some(AbortReason::LimitExceeded { collected, limit }) => println!(
            "{} {collected} comments reached the limit of {limit}",
            "stopped early:".yellow()
        ),
        Some(AbortReason::MissingPatch { path }) => {
            println!("{} no diff available for {path}", "stopped early:".yellow())
        }
        None => {}
    }
    let summary = match report.status {
        WatchStatus::Submitted => format!("submitted {} comment(s)", report.comments.len()),
        WatchStatus::DryRun => {
            format!("found {} comment(s), not submitted", report.comments.len())
        }
        WatchStatus::NothingToReport => "nothing to report".to_string(),
        WatchStatus::SkippedBranch => "branch skipped by repository config".to_string(),
    };
    println!("{}", summary.bold());
}
