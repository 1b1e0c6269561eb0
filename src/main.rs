mod cache;
mod config;
mod github;
mod model;
mod report;
mod sync;

use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, info_span};
use tracing_subscriber::EnvFilter;

use model::{Account, AccountType};

/// PR Summary — counts open, closed, and merged pull requests across every
/// repository of a GitHub user or organization.
#[derive(Parser, Debug)]
#[command(name = "pr-summary", version, about)]
struct Cli {
    /// Account type. Defaults to github.account_type from .pr-summary.toml
    #[arg(value_enum)]
    account_type: Option<AccountType>,

    /// Account login. Defaults to github.account from .pr-summary.toml
    account: Option<String>,

    /// Optional output file path for markdown report
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Ignore the cached snapshot and fetch everything again
    #[arg(long)]
    refresh: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("loading configuration");
    let config = config::Config::load()?;

    let account_type = cli
        .account_type
        .or(config.github.account_type)
        .ok_or("account type is required: pass `user` or `organization`, or set github.account_type")?;
    let login = cli
        .account
        .clone()
        .or_else(|| config.github.account.clone())
        .ok_or("account is required: pass it after the account type, or set github.account")?;
    let account = Account::new(account_type, login);

    let _main_span = info_span!("pr_summary", account = %account).entered();

    let token = config
        .github_token()
        .ok_or("GitHub token not found: set github.token or GITHUB_TOKEN")?;
    let transport = github::HttpTransport::new(config.endpoint(), token);
    let store = cache::CacheStore::new(config.cache_dir());
    debug!(endpoint = config.endpoint(), cache = %store.path_for(&account).display(), "resolved settings");

    let options = sync::SyncOptions {
        refresh: cli.refresh,
        max_pages: config.github.max_pages,
    };
    let repositories = sync::load_or_fetch(&store, &transport, &account, options).await?;

    info!("generating report");
    let built_report = report::build(&account, &repositories);
    report::output(&built_report, cli.output.as_deref())?;
    info!(
        repositories = built_report.repositories.len(),
        pull_requests = built_report.totals.total,
        "done"
    );

    Ok(())
}
