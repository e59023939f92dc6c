pub mod fetch;
pub mod misc;
pub mod snapshot;

pub use fetch::{commits_command, files_command, info_command, issues_command};
pub use misc::generate_completions;
pub use snapshot::snapshot_command;
