//! Static per-plugin metadata consumed by the proxy.

use serde::Serialize;

use crate::plugins::Plugin;

/// What the proxy needs in order to route a model's action request to a
/// plugin binary.
#[derive(Debug, Clone, Serialize)]
pub struct PluginManifest {
    /// Action identifier, also the placeholder body.
    pub action: &'static str,
    /// Binary name under which the plugin ships.
    pub binary: &'static str,
    pub description: &'static str,
    /// Opening marker the proxy scans for in model output.
    pub placeholder_open: &'static str,
    /// Closing marker ending the placeholder pair.
    pub placeholder_close: &'static str,
    /// Whether a missing CLI argument is a usage error.
    pub requires_argument: bool,
    /// Fixed usage text emitted when a required argument is missing.
    pub usage: &'static str,
}

const CATALOG: [PluginManifest; 11] = [
    PluginManifest {
        action: "run_sandboxed_code",
        binary: "code_sandbox",
        description: "Run a python or javascript_node snippet under a timeout and report stdout, stderr and the exit code.",
        placeholder_open: "[run_sandboxed_code]",
        placeholder_close: "[/run_sandboxed_code]",
        requires_argument: true,
        usage: "Usage: code_sandbox '<json>' where <json> is {\"language\": \"python\" | \"javascript_node\", \"code\": \"...\"}",
    },
    PluginManifest {
        action: "run_arbitrary_program",
        binary: "program_runner",
        description: "Run an arbitrary program (no shell) in an optional working directory and report its outcome.",
        placeholder_open: "[run_arbitrary_program]",
        placeholder_close: "[/run_arbitrary_program]",
        requires_argument: true,
        usage: "Usage: program_runner '<json>' where <json> is {\"command\": \"...\" | [\"...\", ...], \"cwd\": \"...\"}",
    },
    PluginManifest {
        action: "read_file",
        binary: "file_content_reader",
        description: "Read a text file (size-capped, encoding-detected) and report its content.",
        placeholder_open: "[read_file]",
        placeholder_close: "[/read_file]",
        requires_argument: true,
        usage: "Usage: file_content_reader <file-path>",
    },
    PluginManifest {
        action: "write_files",
        binary: "file_updater",
        description: "Create or overwrite a batch of files; each operation succeeds or fails on its own.",
        placeholder_open: "[write_files]",
        placeholder_close: "[/write_files]",
        requires_argument: true,
        usage: "Usage: file_updater '<json>' where <json> is [{\"path\": \"...\", \"content\": \"...\"}, ...]",
    },
    PluginManifest {
        action: "delete_path",
        binary: "file_deleter",
        description: "Move a file or directory to the trash; only strict descendants of the configured base paths qualify.",
        placeholder_open: "[delete_path]",
        placeholder_close: "[/delete_path]",
        requires_argument: true,
        usage: "Usage: file_deleter <path>",
    },
    PluginManifest {
        action: "list_directory",
        binary: "directory_lister",
        description: "List a directory's subdirectories and files, one level deep.",
        placeholder_open: "[list_directory]",
        placeholder_close: "[/list_directory]",
        requires_argument: true,
        usage: "Usage: directory_lister <directory-path>",
    },
    PluginManifest {
        action: "generate_project_tree",
        binary: "project_generator",
        description: "Create a directory/file tree from a JSON structure under a base path.",
        placeholder_open: "[generate_project_tree]",
        placeholder_close: "[/generate_project_tree]",
        requires_argument: true,
        usage: "Usage: project_generator '<json>' where <json> is {\"base_path\": \"...\", \"structure\": {...}}",
    },
    PluginManifest {
        action: "read_web_page",
        binary: "web_content_reader",
        description: "Load a URL in a headless browser and report the page's title, main text and links.",
        placeholder_open: "[read_web_page]",
        placeholder_close: "[/read_web_page]",
        requires_argument: true,
        usage: "Usage: web_content_reader <url>",
    },
    PluginManifest {
        action: "search_web",
        binary: "web_search",
        description: "Run a web search in a headless browser and report the external result links.",
        placeholder_open: "[search_web]",
        placeholder_close: "[/search_web]",
        requires_argument: true,
        usage: "Usage: web_search <query>",
    },
    PluginManifest {
        action: "report_time",
        binary: "time_reporter",
        description: "Report the current local system time.",
        placeholder_open: "[report_time]",
        placeholder_close: "[/report_time]",
        requires_argument: false,
        usage: "Usage: time_reporter",
    },
    PluginManifest {
        action: "continue_reply_ack",
        binary: "continue_reply",
        description: "Acknowledge a continuation request, echoing an optional hint.",
        placeholder_open: "[continue_reply]",
        placeholder_close: "[/continue_reply]",
        requires_argument: false,
        usage: "Usage: continue_reply [hint]",
    },
];

/// The whole catalog, in a fixed order.
pub fn catalog() -> &'static [PluginManifest] {
    &CATALOG
}

/// The manifest for one plugin.
pub fn for_plugin(plugin: Plugin) -> &'static PluginManifest {
    match plugin {
        Plugin::CodeSandbox => &CATALOG[0],
        Plugin::ProgramRunner => &CATALOG[1],
        Plugin::FileReader => &CATALOG[2],
        Plugin::FileUpdater => &CATALOG[3],
        Plugin::FileDeleter => &CATALOG[4],
        Plugin::DirectoryLister => &CATALOG[5],
        Plugin::ProjectGenerator => &CATALOG[6],
        Plugin::WebReader => &CATALOG[7],
        Plugin::WebSearch => &CATALOG[8],
        Plugin::TimeReporter => &CATALOG[9],
        Plugin::ContinueReply => &CATALOG[10],
    }
}

// ── tests ───────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_plugin_has_a_consistent_manifest() {
        assert_eq!(catalog().len(), Plugin::ALL.len());
        for plugin in Plugin::ALL {
            let meta = for_plugin(plugin);
            assert_eq!(meta.binary, plugin.binary());
            assert_eq!(meta.requires_argument, plugin.requires_argument());
            let inner = meta
                .placeholder_open
                .trim_start_matches('[')
                .trim_end_matches(']');
            assert_eq!(meta.placeholder_open, format!("[{inner}]"));
            assert_eq!(meta.placeholder_close, format!("[/{inner}]"));
            assert!(!meta.usage.is_empty());
            assert!(meta.usage.starts_with(&format!("Usage: {}", meta.binary)));
        }
    }

    #[test]
    fn binaries_are_unique() {
        let mut names: Vec<&str> = catalog().iter().map(|m| m.binary).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Plugin::ALL.len());
    }
}
