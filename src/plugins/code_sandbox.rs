//! run_sandboxed_code — execute a short script under a timeout.
//!
//! The snippet is written to a scratch file, the matching interpreter runs
//! it with a cleared environment, and stdout/stderr/exit code come back as
//! one JSON object. The scratch file is owned by an RAII guard, so it is
//! removed on every path, including timeouts.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::{CodeSandboxConfig, Config};
use crate::error::PluginError;
use crate::reply::{Reply, Status};

#[derive(Debug, Deserialize)]
struct SandboxArgs {
    language: Option<String>,
    code: Option<String>,
}

/// One supported interpreter.
struct LanguageSpec {
    command: String,
    suffix: &'static str,
    timeout: Duration,
}

fn language_spec(language: &str, cfg: &CodeSandboxConfig) -> Result<LanguageSpec, PluginError> {
    match language.to_ascii_lowercase().as_str() {
        "python" => Ok(LanguageSpec {
            command: cfg.python_command.clone(),
            suffix: ".py",
            timeout: Duration::from_secs(cfg.python_timeout_secs),
        }),
        "javascript_node" => Ok(LanguageSpec {
            command: cfg.node_command.clone(),
            suffix: ".js",
            timeout: Duration::from_secs(cfg.node_timeout_secs),
        }),
        other => Err(PluginError::UnsupportedAction(format!(
            "unsupported language '{other}'; supported languages are python and javascript_node"
        ))),
    }
}

pub async fn run(argument: &str, config: &Config) -> Result<Reply, PluginError> {
    let cfg = &config.plugins.code_sandbox;
    let args: SandboxArgs = serde_json::from_str(argument)
        .map_err(|e| PluginError::MalformedArgument(format!("argument is not valid JSON: {e}")))?;

    let language = match args.language {
        Some(l) if !l.trim().is_empty() => l,
        _ => {
            return Err(PluginError::MalformedArgument(
                "the \"language\" field is required and must be a non-empty string".to_string(),
            ))
        }
    };
    let code = match args.code {
        Some(c) if !c.trim().is_empty() => c,
        _ => {
            return Err(PluginError::MalformedArgument(
                "the \"code\" field is required and must be a non-empty string".to_string(),
            ))
        }
    };
    let spec = language_spec(&language, cfg)?;

    tracing::info!("running {language} snippet ({} bytes)", code.len());

    let scratch_dir = cfg
        .scratch_dir
        .as_deref()
        .map(|d| crate::paths::expand_user(d))
        .unwrap_or_else(std::env::temp_dir);
    // The guard deletes the script when it drops.
    let script = tempfile::Builder::new()
        .prefix("snippet-")
        .suffix(spec.suffix)
        .tempfile_in(&scratch_dir)
        .map_err(|e| PluginError::Internal(format!("could not create scratch file: {e}")))?;
    tokio::fs::write(script.path(), &code)
        .await
        .map_err(|e| PluginError::Internal(format!("could not write scratch file: {e}")))?;

    let outcome = run_interpreter(&spec, script.path()).await?;
    Ok(Reply::Json(outcome))
}

async fn run_interpreter(spec: &LanguageSpec, script: &Path) -> Result<Value, PluginError> {
    let child = tokio::process::Command::new(&spec.command)
        .arg(script)
        .env_clear()
        .env("PATH", "/usr/local/bin:/usr/bin:/bin")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PluginError::DependencyMissing(format!(
                "interpreter '{}' is not installed",
                spec.command
            )),
            _ => PluginError::Internal(format!("could not start '{}': {e}", spec.command)),
        })?;

    match tokio::time::timeout(spec.timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => {
            let code = output.status.code().unwrap_or(-1);
            let status = if output.status.success() {
                Status::Success
            } else {
                Status::Failure
            };
            Ok(json!({
                "status": status,
                "stdout": String::from_utf8_lossy(&output.stdout),
                "stderr": String::from_utf8_lossy(&output.stderr),
                "return_code": code,
            }))
        }
        Ok(Err(e)) => Err(PluginError::Internal(format!(
            "waiting for the interpreter failed: {e}"
        ))),
        // Dropping the future kills the child (kill_on_drop).
        Err(_) => Err(PluginError::Timeout(format!(
            "execution timed out after {} seconds",
            spec.timeout.as_secs()
        ))),
    }
}
