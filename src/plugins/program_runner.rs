//! run_arbitrary_program — spawn one program and report its outcome.
//!
//! There is deliberately no allow-list here: the action exists to run
//! arbitrary commands, and the only guard rails are the wall-clock timeout
//! and the `allow_arbitrary` refusal switch.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use crate::config::Config;
use crate::error::PluginError;
use crate::paths;
use crate::reply::{Reply, Status};

#[derive(Debug, Deserialize)]
struct RunnerArgs {
    #[serde(default)]
    cwd: Option<String>,
    #[serde(default)]
    command: Option<CommandSpec>,
}

/// Either a command line to lex or a ready argv.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CommandSpec {
    Line(String),
    Argv(Vec<String>),
}

impl CommandSpec {
    fn into_argv(self) -> Result<Vec<String>, PluginError> {
        match self {
            CommandSpec::Line(line) => shlex::split(&line).ok_or_else(|| {
                PluginError::InvalidInput(
                    "the command line could not be split (unbalanced quoting)".to_string(),
                )
            }),
            CommandSpec::Argv(argv) => Ok(argv),
        }
    }
}

pub async fn run(argument: &str, config: &Config) -> Result<Reply, PluginError> {
    let cfg = &config.plugins.program_runner;
    if !cfg.allow_arbitrary {
        return Err(PluginError::Unauthorized(
            "program_runner is disabled by configuration (plugins.program_runner.allow_arbitrary)"
                .to_string(),
        ));
    }
    tracing::warn!("program_runner executes arbitrary commands without restriction");

    let args: RunnerArgs = serde_json::from_str(argument)
        .map_err(|e| PluginError::MalformedArgument(format!("argument is not valid JSON: {e}")))?;
    let argv = args
        .command
        .ok_or_else(|| {
            PluginError::MalformedArgument(
                "the \"command\" field is required (a string or an array of strings)".to_string(),
            )
        })?
        .into_argv()?;
    if argv.is_empty() || argv[0].trim().is_empty() {
        return Err(PluginError::InvalidInput("the command is empty".to_string()));
    }
    let cwd = resolve_cwd(args.cwd.as_deref())?;

    tracing::info!("running '{}' in {}", argv[0], cwd.display());

    let child = tokio::process::Command::new(&argv[0])
        .args(&argv[1..])
        .current_dir(&cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                PluginError::DependencyMissing(format!("program not found: '{}'", argv[0]))
            }
            _ => PluginError::Internal(format!("could not start '{}': {e}", argv[0])),
        })?;

    let timeout = Duration::from_secs(cfg.timeout_secs);
    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => {
            let code = output.status.code().unwrap_or(-1);
            let status = if output.status.success() {
                Status::Success
            } else {
                Status::Failure
            };
            Ok(Reply::Json(json!({
                "status": status,
                "return_code": code,
                "stdout": String::from_utf8_lossy(&output.stdout),
                "stderr": String::from_utf8_lossy(&output.stderr),
            })))
        }
        Ok(Err(e)) => Err(PluginError::Internal(format!(
            "waiting for the program failed: {e}"
        ))),
        // Dropping the future kills the child (kill_on_drop).
        Err(_) => Err(PluginError::Timeout(format!(
            "command timed out after {} seconds",
            timeout.as_secs()
        ))),
    }
}

/// An absent, null or empty cwd means the invoking process's own current
/// directory.
fn resolve_cwd(raw: Option<&str>) -> Result<PathBuf, PluginError> {
    let raw = match raw {
        Some(r) if !r.trim().is_empty() => r,
        _ => {
            return std::env::current_dir().map_err(|e| {
                PluginError::Internal(format!("current directory is unavailable: {e}"))
            })
        }
    };
    let dir = paths::resolve(&paths::expand_user(raw));
    if !dir.is_dir() {
        return Err(PluginError::InvalidInput(format!(
            "working directory does not exist or is not a directory: {}",
            dir.display()
        )));
    }
    Ok(dir)
}
