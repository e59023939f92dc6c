use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    GitHub,
    GitLab,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::GitHub => write!(f, "github"),
            Platform::GitLab => write!(f, "gitlab"),
        }
    }
}

/// Who a repository URL points at. Derived per call and thrown away after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryIdentity {
    pub platform: Platform,
    pub owner: String,
    pub repo: String,
    /// `scheme://host[:port]` of the web URL the identity came from.
    pub base_url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RepositoryInfo {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
    pub open_issues_count: u64,
    pub created_at: String,
    pub updated_at: String,
    pub size: u64,
    pub default_branch: String,
    pub topics: Vec<String>,
    pub license: Option<String>,
    pub clone_url: String,
    pub ssh_url: String,
    pub homepage: Option<String>,
    pub archived: bool,
    pub disabled: bool,
    pub private: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[default]
    File,
    #[serde(rename = "dir")]
    Directory,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    pub kind: EntryKind,
    /// Bytes; 0 when the platform does not report it.
    pub size: u64,
    pub download_url: Option<String>,
    pub web_url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CommitInfo {
    pub sha: String,
    pub message: String,
    pub author_name: String,
    pub author_email: String,
    pub authored_at: String,
    pub web_url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    #[default]
    Open,
    Closed,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct IssueInfo {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub state: IssueState,
    pub author: String,
    pub created_at: String,
    pub updated_at: String,
    pub labels: Vec<String>,
    pub web_url: String,
}

/// Which issues to ask for. Each platform spells these differently on the wire.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IssueStateFilter {
    #[default]
    Open,
    Closed,
    All,
}

/// A snapshot section that could not be fetched.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SectionFailure {
    pub section: String,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RepositorySnapshot {
    pub scraped_at: String,
    pub repository_url: String,
    pub basic_info: RepositoryInfo,
    pub file_structure: Vec<FileEntry>,
    pub recent_commits: Vec<CommitInfo>,
    pub open_issues: Vec<IssueInfo>,
    pub closed_issues: Vec<IssueInfo>,
    pub errors: Vec<SectionFailure>,
}

impl RepositorySnapshot {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Info,
    Contents { path: String },
    Commits { limit: u32 },
    Issues { state: IssueStateFilter, limit: u32 },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Info => "info",
            Operation::Contents { .. } => "contents",
            Operation::Commits { .. } => "commits",
            Operation::Issues { .. } => "issues",
        }
    }
}

/// A concrete API request: absolute URL plus ordered query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl Endpoint {
    pub fn new(url: String) -> Self {
        Self { url, query: Vec::new() }
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn enum_tags_serialize_lowercase() {
        assert_eq!(serde_json::to_value(Platform::GitLab).unwrap(), json!("gitlab"));
        assert_eq!(serde_json::to_value(EntryKind::Directory).unwrap(), json!("dir"));
        assert_eq!(serde_json::to_value(EntryKind::File).unwrap(), json!("file"));
        assert_eq!(serde_json::to_value(IssueState::Closed).unwrap(), json!("closed"));
    }

    #[test]
    fn default_info_keeps_every_field() {
        let value = serde_json::to_value(RepositoryInfo::default()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 20);
        assert_eq!(object["license"], json!(null));
        assert_eq!(object["topics"], json!([]));
        assert_eq!(object["stars"], json!(0));
        assert_eq!(object["private"], json!(false));
    }

    #[test]
    fn endpoint_params_keep_order() {
        let endpoint = Endpoint::new("https://x/issues".into())
            .param("state", "open")
            .param("per_page", 30);
        assert_eq!(
            endpoint.query,
            vec![
                ("state".to_string(), "open".to_string()),
                ("per_page".to_string(), "30".to_string()),
            ]
        );
    }
}
