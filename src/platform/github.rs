use super::{encode_path, NormalizeResult, PlatformApi};
use crate::types::{
    CommitInfo, Endpoint, EntryKind, FileEntry, IssueInfo, IssueState, IssueStateFilter,
    Operation, Platform, RepositoryIdentity, RepositoryInfo,
};
use serde::Deserialize;
use serde_json::Value;

pub const API_BASE: &str = "https://api.github.com";

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct GitHubRepo {
    name: Option<String>,
    full_name: Option<String>,
    description: Option<String>,
    language: Option<String>,
    stargazers_count: Option<u64>,
    forks_count: Option<u64>,
    watchers_count: Option<u64>,
    open_issues_count: Option<u64>,
    created_at: Option<String>,
    updated_at: Option<String>,
    size: Option<u64>,
    default_branch: Option<String>,
    topics: Option<Vec<String>>,
    license: Option<GitHubLicense>,
    clone_url: Option<String>,
    ssh_url: Option<String>,
    homepage: Option<String>,
    archived: Option<bool>,
    disabled: Option<bool>,
    private: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct GitHubLicense {
    name: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct GitHubContent {
    name: Option<String>,
    path: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    size: Option<u64>,
    download_url: Option<String>,
    html_url: Option<String>,
    url: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct GitHubCommit {
    sha: Option<String>,
    commit: Option<GitHubCommitDetail>,
    html_url: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct GitHubCommitDetail {
    message: Option<String>,
    author: Option<GitHubSignature>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct GitHubSignature {
    name: Option<String>,
    email: Option<String>,
    date: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct GitHubIssue {
    number: Option<u64>,
    title: Option<String>,
    body: Option<String>,
    state: Option<String>,
    user: Option<GitHubUser>,
    created_at: Option<String>,
    updated_at: Option<String>,
    labels: Option<Vec<GitHubLabel>>,
    html_url: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct GitHubUser {
    login: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct GitHubLabel {
    name: Option<String>,
}

pub struct GitHub;

impl PlatformApi for GitHub {
    fn platform(&self) -> Platform {
        Platform::GitHub
    }

    fn domain(&self) -> &'static str {
        "github.com"
    }

    fn default_api_base(&self) -> &'static str {
        API_BASE
    }

    fn endpoint(&self, api_base: &str, repo: &RepositoryIdentity, op: &Operation) -> Endpoint {
        let root = format!(
            "{}/repos/{}/{}",
            api_base.trim_end_matches('/'),
            urlencoding::encode(&repo.owner),
            urlencoding::encode(&repo.repo)
        );

        match op {
            Operation::Info => Endpoint::new(root),
            Operation::Contents { path } => {
                Endpoint::new(format!("{}/contents/{}", root, encode_path(path)))
            }
            Operation::Commits { limit } => {
                Endpoint::new(format!("{}/commits", root)).param("per_page", limit)
            }
            Operation::Issues { state, limit } => Endpoint::new(format!("{}/issues", root))
                .param("state", state_token(*state))
                .param("per_page", limit),
        }
    }

    fn normalize_info(&self, raw: Value) -> NormalizeResult<RepositoryInfo> {
        let repo: GitHubRepo = serde_json::from_value(raw)?;

        Ok(RepositoryInfo {
            name: repo.name.unwrap_or_default(),
            full_name: repo.full_name.unwrap_or_default(),
            description: repo.description,
            language: repo.language,
            stars: repo.stargazers_count.unwrap_or(0),
            forks: repo.forks_count.unwrap_or(0),
            watchers: repo.watchers_count.unwrap_or(0),
            open_issues_count: repo.open_issues_count.unwrap_or(0),
            created_at: repo.created_at.unwrap_or_default(),
            updated_at: repo.updated_at.unwrap_or_default(),
            size: repo.size.unwrap_or(0),
            default_branch: repo.default_branch.unwrap_or_default(),
            topics: repo.topics.unwrap_or_default(),
            license: repo.license.and_then(|license| license.name),
            clone_url: repo.clone_url.unwrap_or_default(),
            ssh_url: repo.ssh_url.unwrap_or_default(),
            homepage: repo.homepage,
            archived: repo.archived.unwrap_or(false),
            disabled: repo.disabled.unwrap_or(false),
            private: repo.private.unwrap_or(false),
        })
    }

    fn normalize_file(&self, raw: Value, _repo: &RepositoryIdentity) -> NormalizeResult<FileEntry> {
        let item: GitHubContent = serde_json::from_value(raw)?;
        let kind = match item.kind.as_deref() {
            Some("dir") => EntryKind::Directory,
            _ => EntryKind::File,
        };

        Ok(FileEntry {
            name: item.name.unwrap_or_default(),
            path: item.path.unwrap_or_default(),
            kind,
            size: item.size.unwrap_or(0),
            download_url: item.download_url,
            web_url: item.html_url.or(item.url).unwrap_or_default(),
        })
    }

    fn normalize_commit(&self, raw: Value) -> NormalizeResult<CommitInfo> {
        let commit: GitHubCommit = serde_json::from_value(raw)?;
        let detail = commit.commit.unwrap_or_default();
        let author = detail.author.unwrap_or_default();

        Ok(CommitInfo {
            sha: commit.sha.unwrap_or_default(),
            message: detail.message.unwrap_or_default(),
            author_name: author.name.unwrap_or_default(),
            author_email: author.email.unwrap_or_default(),
            authored_at: author.date.unwrap_or_default(),
            web_url: commit.html_url.unwrap_or_default(),
        })
    }

    fn normalize_issue(&self, raw: Value) -> NormalizeResult<IssueInfo> {
        let issue: GitHubIssue = serde_json::from_value(raw)?;
        let state = match issue.state.as_deref() {
            Some("closed") => IssueState::Closed,
            _ => IssueState::Open,
        };

        Ok(IssueInfo {
            number: issue.number.unwrap_or(0),
            title: issue.title.unwrap_or_default(),
            body: issue.body,
            state,
            author: issue.user.and_then(|user| user.login).unwrap_or_default(),
            created_at: issue.created_at.unwrap_or_default(),
            updated_at: issue.updated_at.unwrap_or_default(),
            labels: issue
                .labels
                .unwrap_or_default()
                .into_iter()
                .filter_map(|label| label.name)
                .collect(),
            web_url: issue.html_url.unwrap_or_default(),
        })
    }
}

fn state_token(state: IssueStateFilter) -> &'static str {
    match state {
        IssueStateFilter::Open => "open",
        IssueStateFilter::Closed => "closed",
        IssueStateFilter::All => "all",
    }
}
