//! The plugin set and its single entry point, [`invoke`].

pub mod code_sandbox;
pub mod continue_reply;
pub mod directory_lister;
pub mod file_deleter;
pub mod file_reader;
pub mod file_writer;
pub mod program_runner;
pub mod project_generator;
pub mod time_reporter;
pub mod web_reader;
pub mod web_search;

use serde_json::json;

use crate::config::Config;
use crate::error::PluginError;
use crate::manifest;
use crate::reply::{Reply, Status};

/// Identifies one plugin action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plugin {
    CodeSandbox,
    ProgramRunner,
    FileReader,
    FileUpdater,
    FileDeleter,
    DirectoryLister,
    ProjectGenerator,
    WebReader,
    WebSearch,
    TimeReporter,
    ContinueReply,
}

impl Plugin {
    pub const ALL: [Plugin; 11] = [
        Plugin::CodeSandbox,
        Plugin::ProgramRunner,
        Plugin::FileReader,
        Plugin::FileUpdater,
        Plugin::FileDeleter,
        Plugin::DirectoryLister,
        Plugin::ProjectGenerator,
        Plugin::WebReader,
        Plugin::WebSearch,
        Plugin::TimeReporter,
        Plugin::ContinueReply,
    ];

    /// The binary this plugin ships as.
    pub fn binary(self) -> &'static str {
        match self {
            Plugin::CodeSandbox => "code_sandbox",
            Plugin::ProgramRunner => "program_runner",
            Plugin::FileReader => "file_content_reader",
            Plugin::FileUpdater => "file_updater",
            Plugin::FileDeleter => "file_deleter",
            Plugin::DirectoryLister => "directory_lister",
            Plugin::ProjectGenerator => "project_generator",
            Plugin::WebReader => "web_content_reader",
            Plugin::WebSearch => "web_search",
            Plugin::TimeReporter => "time_reporter",
            Plugin::ContinueReply => "continue_reply",
        }
    }

    /// Whether a missing CLI argument is a usage error.
    pub fn requires_argument(self) -> bool {
        !matches!(self, Plugin::TimeReporter | Plugin::ContinueReply)
    }
}

/// Carry out one plugin action.
///
/// This never fails past its boundary: every internal fault is rendered
/// into the plugin's own error shape, and a missing required argument
/// yields the plugin's fixed usage text.
pub async fn invoke(plugin: Plugin, argument: Option<&str>, config: &Config) -> Reply {
    let outcome = match (plugin, argument) {
        (Plugin::TimeReporter, arg) => time_reporter::run(arg, config).await,
        (Plugin::ContinueReply, arg) => continue_reply::run(arg, config).await,
        (_, None) => return Reply::text(manifest::for_plugin(plugin).usage),
        (Plugin::CodeSandbox, Some(arg)) => code_sandbox::run(arg, config).await,
        (Plugin::ProgramRunner, Some(arg)) => program_runner::run(arg, config).await,
        (Plugin::FileReader, Some(arg)) => file_reader::run(arg, config).await,
        (Plugin::FileUpdater, Some(arg)) => file_writer::run(arg, config).await,
        (Plugin::FileDeleter, Some(arg)) => file_deleter::run(arg, config).await,
        (Plugin::DirectoryLister, Some(arg)) => directory_lister::run(arg, config).await,
        (Plugin::ProjectGenerator, Some(arg)) => project_generator::run(arg, config).await,
        (Plugin::WebReader, Some(arg)) => web_reader::run(arg, config).await,
        (Plugin::WebSearch, Some(arg)) => web_search::run(arg, config).await,
    };
    match outcome {
        Ok(reply) => reply,
        Err(err) => {
            tracing::warn!(
                "{} failed ({}): {err}",
                plugin.binary(),
                err.kind()
            );
            fault_reply(plugin, &err)
        }
    }
}

/// Render an error in the shape the proxy expects from this plugin.
fn fault_reply(plugin: Plugin, err: &PluginError) -> Reply {
    let status = fault_status(plugin, err);
    match plugin {
        Plugin::CodeSandbox => Reply::Json(json!({
            "status": status,
            "stdout": "",
            "stderr": err.to_string(),
            "return_code": -1,
        })),
        Plugin::ProgramRunner => Reply::Json(json!({
            "status": status,
            "message": err.to_string(),
            "return_code": -1,
        })),
        Plugin::FileDeleter => Reply::Json(json!({
            "status": status,
            "message": err.to_string(),
        })),
        Plugin::FileUpdater => Reply::Json(json!([{
            "path": "json parse error",
            "status": status,
            "message": err.to_string(),
        }])),
        Plugin::ProjectGenerator => Reply::Json(json!([{
            "item": "invalid argument",
            "status": status,
            "message": err.to_string(),
        }])),
        _ => Reply::Text(format!("Error: {err}")),
    }
}

/// The deleter reports refusals as failures, and the batch plugins report
/// argument faults as failure entries; everything else is an error.
fn fault_status(plugin: Plugin, err: &PluginError) -> Status {
    match (plugin, err) {
        (Plugin::FileDeleter, PluginError::Unauthorized(_) | PluginError::InvalidInput(_)) => {
            Status::Failure
        }
        (
            Plugin::FileUpdater | Plugin::ProjectGenerator,
            PluginError::MalformedArgument(_),
        ) => Status::Failure,
        _ => Status::Error,
    }
}
