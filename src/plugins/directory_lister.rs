//! list_directory — one-level directory listing.

use crate::config::Config;
use crate::error::PluginError;
use crate::paths;
use crate::reply::Reply;

pub async fn run(argument: &str, _config: &Config) -> Result<Reply, PluginError> {
    let raw = argument.trim();
    if raw.is_empty() {
        return Err(PluginError::InvalidInput(
            "the directory path is empty".to_string(),
        ));
    }
    let path = paths::resolve(&paths::expand_user(raw));

    let meta = tokio::fs::metadata(&path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            PluginError::InvalidInput(format!("directory not found: {}", path.display()))
        }
        std::io::ErrorKind::PermissionDenied => {
            PluginError::InvalidInput(format!("permission denied: {}", path.display()))
        }
        _ => PluginError::Internal(format!("could not stat {}: {e}", path.display())),
    })?;
    if !meta.is_dir() {
        return Err(PluginError::InvalidInput(format!(
            "not a directory: {}",
            path.display()
        )));
    }

    let mut entries = tokio::fs::read_dir(&path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => {
            PluginError::InvalidInput(format!("permission denied: {}", path.display()))
        }
        _ => PluginError::Internal(format!("could not list {}: {e}", path.display())),
    })?;

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| PluginError::Internal(format!("could not list {}: {e}", path.display())))?
    {
        let name = entry.file_name().to_string_lossy().into_owned();
        // Follows symlinks, so a link to a directory lists as a directory.
        match tokio::fs::metadata(entry.path()).await {
            Ok(m) if m.is_dir() => dirs.push(name),
            _ => files.push(name),
        }
    }

    if dirs.is_empty() && files.is_empty() {
        return Ok(Reply::Text(format!(
            "Directory '{}' is empty.",
            path.display()
        )));
    }

    dirs.sort();
    files.sort();

    let mut out = format!("Contents of directory: {}\n", path.display());
    if !dirs.is_empty() {
        out.push_str("\nSubdirectories:\n");
        for name in &dirs {
            out.push_str(&format!("  [D] {name}\n"));
        }
    }
    if !files.is_empty() {
        out.push_str("\nFiles:\n");
        for name in &files {
            out.push_str(&format!("  [F] {name}\n"));
        }
    }
    Ok(Reply::Text(out.trim_end().to_string()))
}
