//! delete_path — move a target into the platform trash.
//!
//! The one plugin with an allow-list. The target must resolve to a strict
//! descendant of a configured base path, and that check runs before the
//! existence check, so a refused caller learns nothing about what exists.

use serde_json::json;

use crate::config::Config;
use crate::error::PluginError;
use crate::paths::{self, AllowedPathSet};
use crate::reply::{Reply, Status};

pub async fn run(argument: &str, config: &Config) -> Result<Reply, PluginError> {
    let cfg = &config.plugins.file_deleter;
    let raw = argument.trim();
    if raw.is_empty() {
        return Err(PluginError::MalformedArgument(
            "the path argument is empty".to_string(),
        ));
    }

    let allowed = AllowedPathSet::from_configured(&cfg.allowed_base_paths);
    if allowed.is_empty() {
        tracing::warn!("file_deleter has no allowed base paths configured; every request is refused");
    }

    let target = paths::resolve(&paths::expand_user(raw));
    if !allowed.permits(&target) {
        return Err(PluginError::Unauthorized(format!(
            "deletion is not permitted for this path: {}",
            target.display()
        )));
    }

    // Symlinks are trashed themselves, never their targets.
    tokio::fs::symlink_metadata(&target)
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                PluginError::InvalidInput(format!("path does not exist: {}", target.display()))
            }
            _ => PluginError::Internal(format!("could not stat {}: {e}", target.display())),
        })?;

    let displayed = target.display().to_string();
    let to_trash = target.clone();
    let trashed = tokio::task::spawn_blocking(move || trash::delete(&to_trash)).await;
    match trashed {
        Ok(Ok(())) => {
            tracing::info!("moved to trash: {displayed}");
            Ok(Reply::Json(json!({
                "status": Status::Success,
                "message": format!("moved to trash: {displayed}"),
            })))
        }
        Ok(Err(e)) => Err(PluginError::DependencyMissing(format!(
            "could not move to trash: {e}"
        ))),
        Err(e) => Err(PluginError::Internal(format!("trash task failed: {e}"))),
    }
}
