//! generate_project_tree — materialize a nested directory/file structure.
//!
//! The structure object is walked in document order: a string leaf is a
//! file with that content, a null leaf is an empty directory, an object is
//! a subdirectory that is recursed into without producing an entry of its
//! own. A bad leaf fails alone; its siblings still proceed.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::config::Config;
use crate::error::PluginError;
use crate::paths;
use crate::reply::{Reply, Status};

#[derive(Debug, Deserialize)]
struct TreeArgs {
    base_path: Option<String>,
    structure: Option<Value>,
}

pub async fn run(argument: &str, config: &Config) -> Result<Reply, PluginError> {
    let cfg = &config.plugins.project_generator;
    let args: TreeArgs = serde_json::from_str(argument)
        .map_err(|e| PluginError::MalformedArgument(format!("argument is not valid JSON: {e}")))?;

    let base_raw = match args.base_path {
        Some(p) if !p.trim().is_empty() => p,
        _ => {
            return Err(PluginError::MalformedArgument(
                "the \"base_path\" field is required and must be a non-empty string".to_string(),
            ))
        }
    };
    let structure = match args.structure {
        Some(Value::Object(map)) => map,
        Some(_) => {
            return Err(PluginError::MalformedArgument(
                "the \"structure\" field must be a JSON object".to_string(),
            ))
        }
        None => {
            return Err(PluginError::MalformedArgument(
                "the \"structure\" field is required".to_string(),
            ))
        }
    };

    if !cfg.allow_arbitrary_paths {
        return Ok(Reply::Json(json!([entry(
            "disabled",
            Status::Failure,
            "project generation is disabled by configuration (plugins.project_generator.allow_arbitrary_paths)",
        )])));
    }
    tracing::warn!("project_generator creates files under arbitrary base paths");

    let base = paths::resolve(&paths::expand_user(&base_raw));
    let mut results = Vec::new();

    // The base directory gets the first entry.
    if base.is_dir() {
        results.push(entry(
            &base.display().to_string(),
            Status::Info,
            "already existed",
        ));
    } else {
        match tokio::fs::create_dir_all(&base).await {
            Ok(()) => results.push(entry(&base.display().to_string(), Status::Success, "created")),
            Err(e) => {
                results.push(entry(
                    &base.display().to_string(),
                    Status::Failure,
                    &format!("could not create the base directory: {e}"),
                ));
                return Ok(Reply::Json(Value::Array(results)));
            }
        }
    }

    build_level(&base, &structure, "", &mut results).await;
    Ok(Reply::Json(Value::Array(results)))
}

fn entry(item: &str, status: Status, message: &str) -> Value {
    json!({ "item": item, "status": status, "message": message })
}

fn label(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

/// A name must stay inside its parent directory.
fn invalid_name(name: &str) -> bool {
    name.trim().is_empty() || name.contains("..") || name.contains('/') || name.contains('\\')
}

fn build_level<'a>(
    dir: &'a Path,
    members: &'a Map<String, Value>,
    prefix: &'a str,
    out: &'a mut Vec<Value>,
) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
    Box::pin(async move {
        for (name, value) in members {
            let item = label(prefix, name);
            if invalid_name(name) {
                out.push(entry(
                    &item,
                    Status::Failure,
                    &format!("invalid name {name:?}: names must not be empty or contain '..', '/' or '\\'"),
                ));
                continue;
            }
            let target = dir.join(name);
            match value {
                Value::String(content) => match tokio::fs::write(&target, content).await {
                    Ok(()) => out.push(entry(&item, Status::Success, "created file")),
                    Err(e) => out.push(entry(
                        &item,
                        Status::Failure,
                        &format!("could not create file: {e}"),
                    )),
                },
                Value::Null => match tokio::fs::create_dir_all(&target).await {
                    Ok(()) => out.push(entry(&item, Status::Success, "created empty directory")),
                    Err(e) => out.push(entry(
                        &item,
                        Status::Failure,
                        &format!("could not create directory: {e}"),
                    )),
                },
                Value::Object(children) => match tokio::fs::create_dir_all(&target).await {
                    // Subdirectories produce no entry of their own.
                    Ok(()) => build_level(&target, children, &item, out).await,
                    Err(e) => out.push(entry(
                        &item,
                        Status::Failure,
                        &format!("could not create directory: {e}"),
                    )),
                },
                other => out.push(entry(
                    &item,
                    Status::Failure,
                    &format!(
                        "unsupported value of type {}: expected a string (file), null (empty directory) or object (subdirectory)",
                        json_type(other)
                    ),
                )),
            }
        }
    })
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
