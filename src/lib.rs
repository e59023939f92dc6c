//! Repository metadata from GitHub and GitLab behind one interface.
//!
//! A repository URL is resolved to a platform, turned into an API request,
//! fetched with retries and normalized into canonical records that look the
//! same whichever platform they came from.
//!
//! ```no_run
//! use repo_scraper::{RepositoryScraper, ScraperConfig};
//!
//! let scraper = RepositoryScraper::new(ScraperConfig::default())?;
//! let info = scraper.fetch_info("https://github.com/rust-lang/cargo")?;
//! println!("{} has {} stars", info.full_name, info.stars);
//! # Ok::<(), repo_scraper::ScrapeError>(())
//! ```
//!
//! The library only emits `tracing` events; installing a subscriber is up to
//! the caller.

pub mod client;
pub mod config;
pub mod error;
pub mod platform;
pub mod resolve;
pub mod scraper;
pub mod types;

pub use client::{HttpTransport, RawResponse, RequestExecutor, Transport};
pub use config::{RetryPolicy, ScraperConfig};
pub use error::{RequestFailure, ScrapeError, ScrapeResult, TransportError};
pub use platform::PlatformApi;
pub use resolve::resolve;
pub use scraper::{RepositoryScraper, DEFAULT_LIMIT};
pub use types::{
    CommitInfo, Endpoint, EntryKind, FileEntry, IssueInfo, IssueState, IssueStateFilter,
    Operation, Platform, RepositoryIdentity, RepositoryInfo, RepositorySnapshot, SectionFailure,
};
