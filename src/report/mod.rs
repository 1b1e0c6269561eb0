pub mod types;

pub use types::{Report, RepositorySummary};

use std::collections::BTreeMap;
use std::path::Path;

use colored::Colorize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::model::{Account, PullRequestCounts, Repository};

/// Label used for pull requests whose author account no longer exists.
const GHOST_AUTHOR: &str = "ghost";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    FileWrite(#[from] std::io::Error),
}

/// Build a Report from the fetched repositories.
pub fn build(account: &Account, repositories: &[Repository]) -> Report {
    let mut totals = PullRequestCounts::default();
    let mut authors: BTreeMap<String, PullRequestCounts> = BTreeMap::new();

    let summaries: Vec<RepositorySummary> = repositories
        .iter()
        .map(|repo| {
            let counts = repo.counts();
            totals += counts;
            for pr in repo.pull_requests() {
                let login = if pr.author_login.is_empty() {
                    GHOST_AUTHOR
                } else {
                    pr.author_login.as_str()
                };
                authors.entry(login.to_string()).or_default().record(pr);
            }
            RepositorySummary {
                name: repo.name().to_string(),
                counts,
            }
        })
        .collect();

    Report {
        account: account.to_string(),
        repositories: summaries,
        totals,
        authors,
    }
}

/// Output the report to terminal (default) or to a markdown file.
#[instrument(skip(report), fields(account = %report.account, repositories = report.repositories.len()))]
pub fn output(report: &Report, output_path: Option<&Path>) -> Result<(), ReportError> {
    match output_path {
        None => {
            debug!("writing report to terminal");
            print_terminal_report(report);
            Ok(())
        }
        Some(path) => {
            debug!(path = %path.display(), "writing report to file");
            write_markdown_report(report, path)
        }
    }
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>, minimum: usize) -> usize {
    names.map(|name| name.chars().count()).max().unwrap_or(0).max(minimum)
}

fn print_terminal_report(report: &Report) {
    println!();
    println!("{}", format!("Pull requests for {}", report.account).bold());
    println!();

    let width = name_width(report.repositories.iter().map(|r| r.name.as_str()), "Repository".len());
    println!("═══ Repositories ({}) ═══", report.repositories.len());
    print_header("Repository", width);
    for repo in &report.repositories {
        print_row(&repo.name, &repo.counts, width);
    }
    println!();

    println!("═══ Authors ({}) ═══", report.authors.len());
    let width = name_width(report.authors.keys().map(String::as_str), "Author".len());
    print_header("Author", width);
    for (login, counts) in &report.authors {
        print_row(login, counts, width);
    }
    println!();

    println!(
        "═══ Total: {} open | {} closed | {} merged | {} pull requests ═══",
        report.totals.open.to_string().green().bold(),
        report.totals.closed.to_string().red().bold(),
        report.totals.merged.to_string().magenta().bold(),
        report.totals.total,
    );
    println!();
}

fn print_header(label: &str, width: usize) {
    println!(
        "  {:<width$}  {:>6}  {:>6}  {:>6}",
        label.bold(),
        "open".bold(),
        "closed".bold(),
        "merged".bold(),
    );
}

fn print_row(name: &str, counts: &PullRequestCounts, width: usize) {
    println!(
        "  {:<width$}  {:>6}  {:>6}  {:>6}",
        name,
        counts.open.to_string().green(),
        counts.closed.to_string().red(),
        counts.merged.to_string().magenta(),
    );
}

fn write_markdown_report(report: &Report, path: &Path) -> Result<(), ReportError> {
    let mut md = String::new();
    md.push_str(&format!("# Pull requests for {}\n\n", report.account));

    md.push_str("## Repositories\n\n");
    md.push_str("| Repository | Open | Closed | Merged |\n|---|---:|---:|---:|\n");
    for repo in &report.repositories {
        md.push_str(&markdown_row(&repo.name, &repo.counts));
    }
    md.push('\n');

    md.push_str("## Authors\n\n");
    md.push_str("| Author | Open | Closed | Merged |\n|---|---:|---:|---:|\n");
    for (login, counts) in &report.authors {
        md.push_str(&markdown_row(login, counts));
    }
    md.push('\n');

    md.push_str(&format!(
        "## Total: {} open, {} closed, {} merged ({} pull requests)\n",
        report.totals.open, report.totals.closed, report.totals.merged, report.totals.total
    ));

    std::fs::write(path, md)?;
    Ok(())
}

fn markdown_row(name: &str, counts: &PullRequestCounts) -> String {
    format!(
        "| {} | {} | {} | {} |\n",
        name, counts.open, counts.closed, counts.merged
    )
}
