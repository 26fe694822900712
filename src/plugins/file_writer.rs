//! write_files — batched file creation and overwrite.
//!
//! Paths are deliberately unrestricted; the batch is rejected as a whole
//! only at the argument level, individual operations fail independently
//! and never abort their siblings.

use serde_json::{json, Value};

use crate::config::{Config, FileWriterConfig};
use crate::error::PluginError;
use crate::paths;
use crate::reply::{Reply, Status};

pub async fn run(argument: &str, config: &Config) -> Result<Reply, PluginError> {
    let cfg = &config.plugins.file_writer;
    if !cfg.allow_arbitrary_paths {
        return Ok(Reply::Json(json!([entry(
            "disabled",
            Status::Failure,
            "file updates are disabled by configuration (plugins.file_writer.allow_arbitrary_paths)",
        )])));
    }

    let parsed: Value = serde_json::from_str(argument)
        .map_err(|e| PluginError::MalformedArgument(format!("argument is not valid JSON: {e}")))?;
    let Some(ops) = parsed.as_array() else {
        return Ok(Reply::Json(json!([entry(
            "invalid input",
            Status::Failure,
            "the argument must be a JSON array of {\"path\", \"content\"} objects",
        )])));
    };
    if ops.is_empty() {
        return Ok(Reply::Json(json!([entry(
            "no operations",
            Status::Info,
            "the operations array is empty; nothing to do",
        )])));
    }

    tracing::warn!("file_updater writes to arbitrary paths without restriction");

    let mut results = Vec::with_capacity(ops.len());
    for op in ops {
        results.push(apply_one(op, cfg).await);
    }
    Ok(Reply::Json(Value::Array(results)))
}

fn entry(path: &str, status: Status, message: &str) -> Value {
    json!({ "path": path, "status": status, "message": message })
}

async fn apply_one(op: &Value, cfg: &FileWriterConfig) -> Value {
    let Some(obj) = op.as_object() else {
        return entry(
            "invalid entry",
            Status::Failure,
            "each operation must be an object with \"path\" and \"content\"",
        );
    };
    let path_raw = match obj.get("path").and_then(Value::as_str) {
        Some(p) if !p.trim().is_empty() => p,
        _ => {
            return entry(
                "missing path",
                Status::Failure,
                "the \"path\" field is required and must be a non-empty string",
            )
        }
    };
    let Some(content) = obj.get("content").and_then(Value::as_str) else {
        return entry(
            path_raw,
            Status::Failure,
            "the \"content\" field is required and must be a string",
        );
    };

    let limit = cfg.max_file_size_mb * 1024 * 1024;
    if content.len() as u64 > limit {
        return entry(
            path_raw,
            Status::Failure,
            &format!(
                "content is {} bytes, over the {} MB limit",
                content.len(),
                cfg.max_file_size_mb
            ),
        );
    }

    let path = paths::resolve(&paths::expand_user(path_raw));
    if let Some(parent) = path.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            return entry(
                path_raw,
                Status::Failure,
                &format!("could not create parent directories: {e}"),
            );
        }
    }
    match tokio::fs::write(&path, content).await {
        Ok(()) => entry(
            path_raw,
            Status::Success,
            &format!("wrote {} bytes", content.len()),
        ),
        Err(e) => entry(path_raw, Status::Failure, &format!("write failed: {e}")),
    }
}
