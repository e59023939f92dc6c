use crate::error::{ScrapeError, ScrapeResult};
use crate::platform;
use crate::types::RepositoryIdentity;
use url::Url;

/// Turn a repository URL into a platform, owner and repo.
///
/// Accepts full URLs (`https://github.com/owner/repo.git`), scheme-less
/// URLs (`gitlab.com/owner/repo`) and GitHub shorthand (`owner/repo`).
/// Anything after the repo segment (`/tree/main/src`) is ignored.
pub fn resolve(repo_url: &str) -> ScrapeResult<RepositoryIdentity> {
    let input = repo_url.trim();
    let normalized = if input.contains("://") {
        input.to_string()
    } else if looks_like_host(input) {
        format!("https://{}", input)
    } else {
        format!("https://github.com/{}", input.trim_start_matches('/'))
    };

    let url = Url::parse(&normalized)
        .map_err(|err| ScrapeError::invalid_url(repo_url, err.to_string()))?;

    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    if segments.len() < 2 {
        return Err(ScrapeError::invalid_url(
            repo_url,
            "expected at least owner and repository path segments",
        ));
    }

    let host = url
        .host_str()
        .ok_or_else(|| ScrapeError::invalid_url(repo_url, "missing host"))?
        .to_lowercase();

    let api = platform::for_host(&host)
        .ok_or_else(|| ScrapeError::UnsupportedPlatform { host: host.clone() })?;

    let owner = decode_segment(repo_url, segments[0])?;
    let name = decode_segment(repo_url, segments[1])?;
    let repo = name.strip_suffix(".git").unwrap_or(&name).to_string();
    if repo.is_empty() {
        return Err(ScrapeError::invalid_url(repo_url, "empty repository name"));
    }

    Ok(RepositoryIdentity {
        platform: api.platform(),
        owner,
        repo,
        base_url: web_origin(&url, &host),
    })
}

fn decode_segment(repo_url: &str, segment: &str) -> ScrapeResult<String> {
    urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .map_err(|err| ScrapeError::invalid_url(repo_url, err.to_string()))
}

/// `scheme://host[:port]` of the repository's web pages. Clone URLs
/// (`ssh://`, `git://`) point at the https site on the same host.
fn web_origin(url: &Url, host: &str) -> String {
    match (url.scheme(), url.port()) {
        (scheme @ ("http" | "https"), Some(port)) => format!("{}://{}:{}", scheme, host, port),
        (scheme @ ("http" | "https"), None) => format!("{}://{}", scheme, host),
        _ => format!("https://{}", host),
    }
}

fn looks_like_host(input: &str) -> bool {
    input
        .split('/')
        .next()
        .is_some_and(|first| first.contains('.') || first.contains(':'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Platform;

    #[test]
    fn resolves_github_url() {
        let identity = resolve("https://github.com/microsoft/vscode").unwrap();
        assert_eq!(
            identity,
            RepositoryIdentity {
                platform: Platform::GitHub,
                owner: "microsoft".into(),
                repo: "vscode".into(),
                base_url: "https://github.com".into(),
            }
        );
    }

    #[test]
    fn strips_trailing_git_suffix_only() {
        let identity = resolve("https://gitlab.com/gitlab-org/gitaly.git").unwrap();
        assert_eq!(identity.platform, Platform::GitLab);
        assert_eq!(identity.repo, "gitaly");

        let identity = resolve("https://github.com/owner/my.github.io").unwrap();
        assert_eq!(identity.repo, "my.github.io");

        let identity = resolve("https://github.com/owner/.gitconfig").unwrap();
        assert_eq!(identity.repo, ".gitconfig");
    }

    #[test]
    fn host_is_case_insensitive() {
        let identity = resolve("https://GitHub.COM/Owner/Repo/").unwrap();
        assert_eq!(identity.platform, Platform::GitHub);
        assert_eq!(identity.owner, "Owner");
        assert_eq!(identity.repo, "Repo");
    }

    #[test]
    fn ignores_trailing_path() {
        let identity = resolve("https://github.com/rust-lang/cargo/tree/master/src").unwrap();
        assert_eq!(identity.owner, "rust-lang");
        assert_eq!(identity.repo, "cargo");
    }

    #[test]
    fn accepts_scheme_less_input() {
        let identity = resolve("gitlab.com/inkscape/inkscape").unwrap();
        assert_eq!(identity.platform, Platform::GitLab);
        assert_eq!(identity.base_url, "https://gitlab.com");

        let identity = resolve("tokio-rs/tokio").unwrap();
        assert_eq!(identity.platform, Platform::GitHub);
        assert_eq!(identity.owner, "tokio-rs");
        assert_eq!(identity.repo, "tokio");
    }

    #[test]
    fn clone_urls_resolve_to_https_site() {
        let identity = resolve("ssh://git@gitlab.com/group/proj.git").unwrap();
        assert_eq!(identity.platform, Platform::GitLab);
        assert_eq!(identity.owner, "group");
        assert_eq!(identity.repo, "proj");
        assert_eq!(identity.base_url, "https://gitlab.com");

        let identity = resolve("git://github.com/a/b.git").unwrap();
        assert_eq!(identity.base_url, "https://github.com");
    }

    #[test]
    fn keeps_explicit_web_port() {
        let identity = resolve("http://gitlab.com:8080/group/proj").unwrap();
        assert_eq!(identity.base_url, "http://gitlab.com:8080");
    }

    #[test]
    fn decodes_percent_encoded_segments() {
        let identity = resolve("https://gitlab.com/grp/my%2Erepo").unwrap();
        assert_eq!(identity.repo, "my.repo");

        let identity = resolve("https://github.com/some%20one/repo%2Egit").unwrap();
        assert_eq!(identity.owner, "some one");
        assert_eq!(identity.repo, "repo");
    }

    #[test]
    fn invalid_utf8_escape_is_invalid() {
        assert!(matches!(
            resolve("https://github.com/owner/%FF%FE"),
            Err(ScrapeError::InvalidRepositoryUrl { .. })
        ));
    }

    #[test]
    fn too_few_segments_is_invalid() {
        for input in [
            "https://github.com/",
            "https://github.com/onlyowner",
            "https://bitbucket.org/onlyowner",
            "https://github.com//repo",
        ] {
            assert!(
                matches!(resolve(input), Err(ScrapeError::InvalidRepositoryUrl { .. })),
                "{input} should be invalid"
            );
        }
    }

    #[test]
    fn unknown_host_is_unsupported() {
        match resolve("https://bitbucket.org/atlassian/python-bitbucket") {
            Err(ScrapeError::UnsupportedPlatform { host }) => assert_eq!(host, "bitbucket.org"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
