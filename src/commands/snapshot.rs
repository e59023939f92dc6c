use super::fetch::print_json;
use repo_scraper::RepositoryScraper;
use std::fs;
use std::path::Path;

/// Take a full snapshot and print it, or write it to `output`.
///
/// Returns false when the file could not be written. Failed sections are
/// reported on stderr but do not fail the command.
pub fn snapshot_command(scraper: &RepositoryScraper, url: &str, output: Option<&Path>) -> bool {
    let snapshot = scraper.fetch_snapshot(url);

    for failure in &snapshot.errors {
        eprintln!("⚠️  {} unavailable: {}", failure.section, failure.message);
    }

    let Some(path) = output else {
        print_json(&snapshot);
        return true;
    };

    let contents = match serde_json::to_string_pretty(&snapshot) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("Failed to serialize snapshot: {}", e);
            return false;
        }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Can't create {}: {}", parent.display(), e);
            return false;
        }
    }

    match fs::write(path, contents) {
        Ok(()) => {
            println!("✓ Snapshot of {} saved to {}", url, path.display());
            true
        }
        Err(e) => {
            eprintln!("Can't write {}: {}", path.display(), e);
            false
        }
    }
}
