//! Per-platform endpoint construction and response normalization.
//!
//! Each hosting platform implements [`PlatformApi`] in its own module and is
//! listed in [`PLATFORMS`]. Nothing outside this module branches on the
//! platform, so supporting another host means adding one module and one
//! registry entry.

pub mod github;
pub mod gitlab;

use crate::types::{
    CommitInfo, Endpoint, FileEntry, IssueInfo, Operation, Platform, RepositoryIdentity,
    RepositoryInfo,
};
use serde_json::Value;

pub use github::GitHub;
pub use gitlab::GitLab;

pub type NormalizeResult<T> = Result<T, serde_json::Error>;

pub trait PlatformApi: Sync {
    fn platform(&self) -> Platform;

    /// Web domain the platform serves repositories from, e.g. `github.com`.
    fn domain(&self) -> &'static str;

    fn default_api_base(&self) -> &'static str;

    fn endpoint(&self, api_base: &str, repo: &RepositoryIdentity, op: &Operation) -> Endpoint;

    fn normalize_info(&self, raw: Value) -> NormalizeResult<RepositoryInfo>;

    fn normalize_file(&self, raw: Value, repo: &RepositoryIdentity) -> NormalizeResult<FileEntry>;

    fn normalize_commit(&self, raw: Value) -> NormalizeResult<CommitInfo>;

    fn normalize_issue(&self, raw: Value) -> NormalizeResult<IssueInfo>;

    fn matches_host(&self, host: &str) -> bool {
        let domain = self.domain();
        host == domain
            || host
                .strip_suffix(domain)
                .is_some_and(|prefix| prefix.ends_with('.'))
    }
}

pub static PLATFORMS: &[&dyn PlatformApi] = &[&GitHub, &GitLab];

pub fn api_for(platform: Platform) -> Option<&'static dyn PlatformApi> {
    PLATFORMS.iter().copied().find(|api| api.platform() == platform)
}

/// Find the platform serving `host`. `host` must already be lower-case.
pub fn for_host(host: &str) -> Option<&'static dyn PlatformApi> {
    PLATFORMS.iter().copied().find(|api| api.matches_host(host))
}

/// Percent-encode each `/`-separated piece of a repository path.
pub(crate) fn encode_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// A contents listing is a list for directories and a bare object for a
/// single file. Either way the caller gets a list.
pub fn listing_items(raw: Value) -> Vec<Value> {
    match raw {
        Value::Array(items) => items,
        other => vec![other],
    }
}

/// Decode a JSON list response into items; anything else is malformed.
pub fn list_items(raw: Value) -> NormalizeResult<Vec<Value>> {
    serde_json::from_value(raw)
}
