use crate::client::{HttpTransport, RequestExecutor, Transport};
use crate::config::ScraperConfig;
use crate::error::{ScrapeError, ScrapeResult};
use crate::platform::{self, PlatformApi};
use crate::resolve::resolve;
use crate::types::{
    CommitInfo, FileEntry, IssueInfo, IssueStateFilter, Operation, Platform, RepositoryIdentity,
    RepositoryInfo, RepositorySnapshot, SectionFailure,
};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{error, info};

pub const DEFAULT_LIMIT: u32 = 30;

pub const SNAPSHOT_COMMIT_LIMIT: u32 = 50;
pub const SNAPSHOT_OPEN_ISSUE_LIMIT: u32 = 50;
pub const SNAPSHOT_CLOSED_ISSUE_LIMIT: u32 = 20;

/// Fetches repository metadata from any supported platform and returns it
/// in the canonical record shapes.
pub struct RepositoryScraper<T = HttpTransport> {
    executor: RequestExecutor<T>,
    api_bases: HashMap<Platform, String>,
}

impl RepositoryScraper<HttpTransport> {
    pub fn new(config: ScraperConfig) -> ScrapeResult<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(transport, config))
    }
}

impl<T: Transport> RepositoryScraper<T> {
    pub fn with_transport(transport: T, config: ScraperConfig) -> Self {
        Self {
            executor: RequestExecutor::new(transport, config.retry),
            api_bases: config.api_bases,
        }
    }

    pub fn executor(&self) -> &RequestExecutor<T> {
        &self.executor
    }

    pub fn fetch_info(&self, repo_url: &str) -> ScrapeResult<RepositoryInfo> {
        info!(repo_url, "fetching repository info");
        self.run(repo_url, Operation::Info, |api, _, raw| {
            api.normalize_info(raw)
        })
    }

    pub fn fetch_file_structure(&self, repo_url: &str, path: &str) -> ScrapeResult<Vec<FileEntry>> {
        info!(repo_url, path, "fetching file structure");
        let op = Operation::Contents {
            path: path.to_string(),
        };
        self.run(repo_url, op, |api, repo, raw| {
            platform::listing_items(raw)
                .into_iter()
                .map(|item| api.normalize_file(item, repo))
                .collect()
        })
    }

    pub fn fetch_commits(&self, repo_url: &str, limit: u32) -> ScrapeResult<Vec<CommitInfo>> {
        info!(repo_url, limit, "fetching commits");
        self.run(repo_url, Operation::Commits { limit }, |api, _, raw| {
            platform::list_items(raw)?
                .into_iter()
                .map(|item| api.normalize_commit(item))
                .collect()
        })
    }

    pub fn fetch_issues(
        &self,
        repo_url: &str,
        state: IssueStateFilter,
        limit: u32,
    ) -> ScrapeResult<Vec<IssueInfo>> {
        info!(repo_url, ?state, limit, "fetching issues");
        self.run(repo_url, Operation::Issues { state, limit }, |api, _, raw| {
            platform::list_items(raw)?
                .into_iter()
                .map(|item| api.normalize_issue(item))
                .collect()
        })
    }

    /// Fetch every section in turn. A failing section is left at its default
    /// and listed in [`RepositorySnapshot::errors`]; the snapshot itself
    /// always completes.
    pub fn fetch_snapshot(&self, repo_url: &str) -> RepositorySnapshot {
        info!(repo_url, "starting full snapshot");

        let mut errors = Vec::new();
        let basic_info = best_effort("basic_info", self.fetch_info(repo_url), &mut errors);
        let file_structure = best_effort(
            "file_structure",
            self.fetch_file_structure(repo_url, ""),
            &mut errors,
        );
        let recent_commits = best_effort(
            "recent_commits",
            self.fetch_commits(repo_url, SNAPSHOT_COMMIT_LIMIT),
            &mut errors,
        );
        let open_issues = best_effort(
            "open_issues",
            self.fetch_issues(repo_url, IssueStateFilter::Open, SNAPSHOT_OPEN_ISSUE_LIMIT),
            &mut errors,
        );
        let closed_issues = best_effort(
            "closed_issues",
            self.fetch_issues(repo_url, IssueStateFilter::Closed, SNAPSHOT_CLOSED_ISSUE_LIMIT),
            &mut errors,
        );

        info!(repo_url, failed_sections = errors.len(), "snapshot finished");

        RepositorySnapshot {
            scraped_at: chrono::Utc::now().to_rfc3339(),
            repository_url: repo_url.to_string(),
            basic_info,
            file_structure,
            recent_commits,
            open_issues,
            closed_issues,
            errors,
        }
    }

    fn run<R>(
        &self,
        repo_url: &str,
        op: Operation,
        normalize: impl FnOnce(&dyn PlatformApi, &RepositoryIdentity, Value) -> Result<R, serde_json::Error>,
    ) -> ScrapeResult<R> {
        let result = self.try_run(repo_url, &op, normalize);
        if let Err(err) = &result {
            error!(repo_url, operation = op.name(), error = %err, "fetch failed");
        }
        result
    }

    fn try_run<R>(
        &self,
        repo_url: &str,
        op: &Operation,
        normalize: impl FnOnce(&dyn PlatformApi, &RepositoryIdentity, Value) -> Result<R, serde_json::Error>,
    ) -> ScrapeResult<R> {
        let repo = resolve(repo_url)?;
        let api = platform::api_for(repo.platform).ok_or_else(|| {
            ScrapeError::UnsupportedPlatform {
                host: repo.base_url.clone(),
            }
        })?;
        let endpoint = api.endpoint(self.api_base(api), &repo, op);

        let raw = self.executor.get_json(&endpoint)?;
        normalize(api, &repo, raw).map_err(|source| ScrapeError::MalformedResponse {
            url: endpoint.url,
            source,
        })
    }

    fn api_base<'a>(&'a self, api: &'static dyn PlatformApi) -> &'a str {
        self.api_bases
            .get(&api.platform())
            .map(String::as_str)
            .unwrap_or_else(|| api.default_api_base())
    }
}

fn best_effort<T: Default>(
    section: &str,
    result: ScrapeResult<T>,
    errors: &mut Vec<SectionFailure>,
) -> T {
    result.unwrap_or_else(|err| {
        errors.push(SectionFailure {
            section: section.to_string(),
            message: err.to_string(),
        });
        T::default()
    })
}
