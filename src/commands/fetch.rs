use repo_scraper::{IssueStateFilter, RepositoryScraper, ScrapeResult};
use serde::Serialize;

pub fn info_command(scraper: &RepositoryScraper, url: &str) -> ScrapeResult<()> {
    let info = scraper.fetch_info(url)?;
    print_json(&info);
    Ok(())
}

pub fn files_command(scraper: &RepositoryScraper, url: &str, path: &str) -> ScrapeResult<()> {
    let files = scraper.fetch_file_structure(url, path)?;
    print_json(&files);
    Ok(())
}

pub fn commits_command(scraper: &RepositoryScraper, url: &str, limit: u32) -> ScrapeResult<()> {
    let commits = scraper.fetch_commits(url, limit)?;
    print_json(&commits);
    Ok(())
}

pub fn issues_command(
    scraper: &RepositoryScraper,
    url: &str,
    state: IssueStateFilter,
    limit: u32,
) -> ScrapeResult<()> {
    let issues = scraper.fetch_issues(url, state, limit)?;
    print_json(&issues);
    Ok(())
}

pub(crate) fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}
