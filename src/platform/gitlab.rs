use super::{encode_path, NormalizeResult, PlatformApi};
use crate::types::{
    CommitInfo, Endpoint, EntryKind, FileEntry, IssueInfo, IssueState, IssueStateFilter,
    Operation, Platform, RepositoryIdentity, RepositoryInfo,
};
use serde::Deserialize;
use serde_json::Value;

pub const API_BASE: &str = "https://gitlab.com/api/v4";

// GitLab has no watchers, repository size or license on the project payload.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct GitLabProject {
    name: Option<String>,
    path_with_namespace: Option<String>,
    description: Option<String>,
    star_count: Option<u64>,
    forks_count: Option<u64>,
    open_issues_count: Option<u64>,
    created_at: Option<String>,
    last_activity_at: Option<String>,
    default_branch: Option<String>,
    topics: Option<Vec<String>>,
    http_url_to_repo: Option<String>,
    ssh_url_to_repo: Option<String>,
    web_url: Option<String>,
    archived: Option<bool>,
    visibility: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct GitLabTreeEntry {
    name: Option<String>,
    path: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct GitLabCommit {
    id: Option<String>,
    message: Option<String>,
    author_name: Option<String>,
    author_email: Option<String>,
    authored_date: Option<String>,
    created_at: Option<String>,
    web_url: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct GitLabIssue {
    iid: Option<u64>,
    title: Option<String>,
    description: Option<String>,
    state: Option<String>,
    author: Option<GitLabUser>,
    created_at: Option<String>,
    updated_at: Option<String>,
    labels: Option<Vec<String>>,
    web_url: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct GitLabUser {
    username: Option<String>,
}

pub struct GitLab;

impl GitLab {
    /// Projects are addressed by their url-encoded `namespace/name` path.
    fn project_id(repo: &RepositoryIdentity) -> String {
        urlencoding::encode(&format!("{}/{}", repo.owner, repo.repo)).into_owned()
    }
}

impl PlatformApi for GitLab {
    fn platform(&self) -> Platform {
        Platform::GitLab
    }

    fn domain(&self) -> &'static str {
        "gitlab.com"
    }

    fn default_api_base(&self) -> &'static str {
        API_BASE
    }

    fn endpoint(&self, api_base: &str, repo: &RepositoryIdentity, op: &Operation) -> Endpoint {
        let root = format!(
            "{}/projects/{}",
            api_base.trim_end_matches('/'),
            Self::project_id(repo)
        );

        match op {
            Operation::Info => Endpoint::new(root),
            Operation::Contents { path } => {
                let endpoint = Endpoint::new(format!("{}/repository/tree", root));
                let path = path.trim_matches('/');
                if path.is_empty() {
                    endpoint
                } else {
                    endpoint.param("path", path)
                }
            }
            Operation::Commits { limit } => {
                Endpoint::new(format!("{}/repository/commits", root)).param("per_page", limit)
            }
            Operation::Issues { state, limit } => Endpoint::new(format!("{}/issues", root))
                .param("state", state_token(*state))
                .param("per_page", limit),
        }
    }

    fn normalize_info(&self, raw: Value) -> NormalizeResult<RepositoryInfo> {
        let project: GitLabProject = serde_json::from_value(raw)?;

        Ok(RepositoryInfo {
            name: project.name.unwrap_or_default(),
            full_name: project.path_with_namespace.unwrap_or_default(),
            description: project.description,
            language: None,
            stars: project.star_count.unwrap_or(0),
            forks: project.forks_count.unwrap_or(0),
            watchers: 0,
            open_issues_count: project.open_issues_count.unwrap_or(0),
            created_at: project.created_at.unwrap_or_default(),
            updated_at: project.last_activity_at.unwrap_or_default(),
            size: 0,
            default_branch: project.default_branch.unwrap_or_default(),
            topics: project.topics.unwrap_or_default(),
            license: None,
            clone_url: project.http_url_to_repo.unwrap_or_default(),
            ssh_url: project.ssh_url_to_repo.unwrap_or_default(),
            homepage: project.web_url,
            archived: project.archived.unwrap_or(false),
            disabled: false,
            private: project.visibility.as_deref() == Some("private"),
        })
    }

    fn normalize_file(&self, raw: Value, repo: &RepositoryIdentity) -> NormalizeResult<FileEntry> {
        let entry: GitLabTreeEntry = serde_json::from_value(raw)?;
        let kind = match entry.kind.as_deref() {
            Some("tree") => EntryKind::Directory,
            _ => EntryKind::File,
        };
        let path = entry.path.unwrap_or_default();
        let view = match kind {
            EntryKind::Directory => "tree",
            EntryKind::File => "blob",
        };
        let web_url = format!(
            "{}/{}/{}/-/{}/HEAD/{}",
            repo.base_url,
            repo.owner,
            repo.repo,
            view,
            encode_path(&path)
        );

        Ok(FileEntry {
            name: entry.name.unwrap_or_default(),
            path,
            kind,
            size: 0,
            download_url: None,
            web_url,
        })
    }

    fn normalize_commit(&self, raw: Value) -> NormalizeResult<CommitInfo> {
        let commit: GitLabCommit = serde_json::from_value(raw)?;

        Ok(CommitInfo {
            sha: commit.id.unwrap_or_default(),
            message: commit.message.unwrap_or_default(),
            author_name: commit.author_name.unwrap_or_default(),
            author_email: commit.author_email.unwrap_or_default(),
            authored_at: commit.authored_date.or(commit.created_at).unwrap_or_default(),
            web_url: commit.web_url.unwrap_or_default(),
        })
    }

    fn normalize_issue(&self, raw: Value) -> NormalizeResult<IssueInfo> {
        let issue: GitLabIssue = serde_json::from_value(raw)?;
        let state = match issue.state.as_deref() {
            Some("closed") => IssueState::Closed,
            _ => IssueState::Open,
        };

        Ok(IssueInfo {
            number: issue.iid.unwrap_or(0),
            title: issue.title.unwrap_or_default(),
            body: issue.description,
            state,
            author: issue
                .author
                .and_then(|author| author.username)
                .unwrap_or_default(),
            created_at: issue.created_at.unwrap_or_default(),
            updated_at: issue.updated_at.unwrap_or_default(),
            labels: issue.labels.unwrap_or_default(),
            web_url: issue.web_url.unwrap_or_default(),
        })
    }
}

fn state_token(state: IssueStateFilter) -> &'static str {
    match state {
        IssueStateFilter::Open => "opened",
        IssueStateFilter::Closed => "closed",
        IssueStateFilter::All => "all",
    }
}
