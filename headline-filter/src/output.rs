use crate::types::{FilterError, HeadlineItem, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Pretty-printed JSON array of `{ "title", "link" }` objects.
pub fn to_json(items: &[HeadlineItem]) -> Result<String> {
    Ok(serde_json::to_string_pretty(items)?)
}

/// Write `items` as JSON to `path`, or to stdout when no path is given.
///
/// File output goes to a temporary sibling first and is renamed into place, so
/// readers never observe a half-written document.
pub fn emit(items: &[HeadlineItem], path: Option<&Path>) -> Result<()> {
    let json = to_json(items)?;

    match path {
        Some(path) => {
            info!("Writing {} headlines to {}", items.len(), path.display());
            write_atomically(path, &json).map_err(|e| {
                error!("Error creating or writing {}: {}", path.display(), e);
                FilterError::Config(format!("cannot write output file {}: {}", path.display(), e))
            })
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", json)?;
            Ok(())
        }
    }
}

fn write_atomically(path: &Path, contents: &str) -> std::io::Result<()> {
    let tmp_path = temp_sibling(path);

    let result = write_file(&tmp_path, contents).and_then(|_| fs::rename(&tmp_path, path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "headlines.json".into());
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}
