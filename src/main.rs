mod commands;
mod logging;

use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use clap_complete::Shell;
use repo_scraper::{
    IssueStateFilter, Platform, RepositoryScraper, RetryPolicy, ScrapeResult, ScraperConfig,
    DEFAULT_LIMIT,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "repo-scraper")]
#[command(about = "Fetch repository metadata from GitHub and GitLab as uniform JSON", long_about = None)]
#[command(version)]
struct Cli {
    /// API token, sent as `Authorization: token <TOKEN>`
    #[arg(long, global = true, env = "REPO_SCRAPER_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout: u64,
    /// How many rate-limit responses to sit out before giving up
    #[arg(long, global = true, default_value_t = 5)]
    max_rate_limit_waits: u32,
    /// Override the GitHub API base (e.g. a GitHub Enterprise host)
    #[arg(long, global = true, value_hint = ValueHint::Url)]
    github_api: Option<String>,
    /// Override the GitLab API base (e.g. https://gitlab.example.com/api/v4)
    #[arg(long, global = true, value_hint = ValueHint::Url)]
    gitlab_api: Option<String>,
    /// Log requests and retries to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show repository metadata
    #[command(short_flag = 'i')]
    Info {
        /// Repository URL (e.g., https://github.com/user/repo)
        #[arg(value_hint = ValueHint::Url)]
        url: String,
    },
    /// List files and directories at a path
    #[command(short_flag = 'f')]
    Files {
        #[arg(value_hint = ValueHint::Url)]
        url: String,
        /// Path inside the repository, root when omitted
        #[arg(long, short = 'p', default_value = "")]
        path: String,
    },
    /// Show recent commits
    #[command(short_flag = 'c')]
    Commits {
        #[arg(value_hint = ValueHint::Url)]
        url: String,
        #[arg(long, short = 'n', default_value_t = DEFAULT_LIMIT)]
        limit: u32,
    },
    /// Show issues
    Issues {
        #[arg(value_hint = ValueHint::Url)]
        url: String,
        #[arg(long, short = 's', value_enum, default_value_t = StateArg::Open)]
        state: StateArg,
        #[arg(long, short = 'n', default_value_t = DEFAULT_LIMIT)]
        limit: u32,
    },
    /// Fetch everything at once; failed sections are left empty
    #[command(short_flag = 'S')]
    Snapshot {
        #[arg(value_hint = ValueHint::Url)]
        url: String,
        /// Write the snapshot JSON here instead of stdout
        #[arg(long, short = 'o', value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },
    /// Generate shell completion scripts
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StateArg {
    Open,
    Closed,
    All,
}

impl From<StateArg> for IssueStateFilter {
    fn from(state: StateArg) -> Self {
        match state {
            StateArg::Open => IssueStateFilter::Open,
            StateArg::Closed => IssueStateFilter::Closed,
            StateArg::All => IssueStateFilter::All,
        }
    }
}

impl Cli {
    fn scraper_config(&self) -> ScraperConfig {
        let mut config = ScraperConfig::default()
            .with_timeout(Duration::from_secs(self.timeout))
            .with_retry(RetryPolicy {
                max_rate_limit_waits: self.max_rate_limit_waits,
                ..RetryPolicy::default()
            });

        if let Some(token) = &self.token {
            config = config.with_token(token);
        }
        if let Some(base) = &self.github_api {
            config = config.with_api_base(Platform::GitHub, base);
        }
        if let Some(base) = &self.gitlab_api {
            config = config.with_api_base(Platform::GitLab, base);
        }
        config
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Commands::Completions { shell } = cli.command {
        commands::generate_completions(shell);
        return ExitCode::SUCCESS;
    }

    let scraper = match RepositoryScraper::new(cli.scraper_config()) {
        Ok(scraper) => scraper,
        Err(e) => {
            eprintln!("Can't create HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result: ScrapeResult<()> = match &cli.command {
        Commands::Info { url } => commands::info_command(&scraper, url),
        Commands::Files { url, path } => commands::files_command(&scraper, url, path),
        Commands::Commits { url, limit } => commands::commits_command(&scraper, url, *limit),
        Commands::Issues { url, state, limit } => {
            commands::issues_command(&scraper, url, (*state).into(), *limit)
        }
        Commands::Snapshot { url, output } => {
            if commands::snapshot_command(&scraper, url, output.as_deref()) {
                Ok(())
            } else {
                return ExitCode::FAILURE;
            }
        }
        Commands::Completions { .. } => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_issue_flags() {
        let cli = Cli::try_parse_from([
            "repo-scraper",
            "issues",
            "https://gitlab.com/a/b",
            "--state",
            "closed",
            "-n",
            "5",
        ])
        .unwrap();

        match cli.command {
            Commands::Issues { url, state, limit } => {
                assert_eq!(url, "https://gitlab.com/a/b");
                assert_eq!(IssueStateFilter::from(state), IssueStateFilter::Closed);
                assert_eq!(limit, 5);
            }
            _ => panic!("expected issues command"),
        }
    }

    #[test]
    fn global_flags_reach_config() {
        let cli = Cli::try_parse_from([
            "repo-scraper",
            "info",
            "https://github.com/a/b",
            "--timeout",
            "7",
            "--github-api",
            "http://localhost:9000",
            "--max-rate-limit-waits",
            "0",
        ])
        .unwrap();

        let config = cli.scraper_config();
        assert_eq!(config.timeout(), Duration::from_secs(7));
        assert_eq!(config.retry.max_rate_limit_waits, 0);
        assert_eq!(
            config.api_bases.get(&Platform::GitHub).map(String::as_str),
            Some("http://localhost:9000")
        );
    }
}
