//! Output file naming and writing

use crate::error::ScrapeError;
use chrono::{DateTime, Local, TimeZone};
use std::path::{Path, PathBuf};
use tracing::info;

/// Base name used when none is given
pub const DEFAULT_BASE_NAME: &str = "scraped_content";

/// Directory scraped files are written to by default
pub const DEFAULT_OUTPUT_DIR: &str = "scraped_files";

/// Timestamp layout appended to every filename
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Generate `{base}_{YYYYMMDD_HHMMSS}.md` using the current local time
///
/// Two calls within the same second return the same name.
pub fn generate_unique_filename(base: Option<&str>) -> String {
    generate_filename_at(base, &Local::now())
}

/// Generate a filename for an explicit timestamp
pub fn generate_filename_at<Tz>(base: Option<&str>, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let base = normalize_base_name(base);
    format!("{}_{}.md", base, at.format(TIMESTAMP_FORMAT))
}

/// Strip a trailing `.md` and fall back to the default base name
fn normalize_base_name(base: Option<&str>) -> &str {
    let base = base.map(str::trim).unwrap_or_default();
    let base = base.strip_suffix(".md").unwrap_or(base);
    if base.is_empty() {
        DEFAULT_BASE_NAME
    } else {
        base
    }
}

/// Write `content` to `dir/filename`, creating `dir` if needed
///
/// An existing file at the target path is overwritten.
pub async fn save_content(
    dir: impl AsRef<Path>,
    filename: &str,
    content: &str,
) -> Result<PathBuf, ScrapeError> {
    let dir = dir.as_ref();
    tokio::fs::create_dir_all(dir).await?;

    let path = dir.join(filename);
    tokio::fs::write(&path, content).await?;

    info!(path = %path.display(), bytes = content.len(), "Saved content");
    Ok(path)
}
