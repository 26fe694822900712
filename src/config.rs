//! Configuration: one optional JSON file, read once, passed by reference.
//!
//! Every key has a built-in default, so an absent or malformed file never
//! stops an invocation. A malformed file is reported on stderr and ignored.
//! Nothing here is global: the loaded [`Config`] is threaded as an explicit
//! `&Config` parameter into every action call.

use std::path::Path;

use serde::Deserialize;

/// Top-level configuration tree.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Shared browser infrastructure settings.
    pub browser: BrowserConfig,
    /// Per-plugin tunables.
    pub plugins: PluginsConfig,
}

impl Config {
    /// Read `path` if present; fall back to the defaults on any problem.
    pub async fn load(path: &Path) -> Self {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no config file at {}; using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                tracing::warn!("could not read config {}: {e}; using defaults", path.display());
                return Self::default();
            }
        };
        match serde_json::from_str::<Self>(&raw) {
            Ok(cfg) => {
                cfg.validate();
                cfg
            }
            Err(e) => {
                tracing::warn!("malformed config {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Warn about values that will behave surprisingly.
    fn validate(&self) {
        let sandbox = &self.plugins.code_sandbox;
        if sandbox.python_timeout_secs == 0 || sandbox.node_timeout_secs == 0 {
            tracing::warn!("a code_sandbox timeout of 0 seconds will time out every run");
        }
        if self.plugins.program_runner.timeout_secs == 0 {
            tracing::warn!("a program_runner timeout of 0 seconds will time out every run");
        }
        if self.plugins.file_deleter.allowed_base_paths.is_empty() {
            tracing::debug!("file_deleter has no allowed base paths; deletion is disabled");
        }
    }
}

/// Settings for the browser back-end shared by the web plugins.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Base URL of the browser sidecar. Defaults to the
    /// `BROWSER_SIDECAR_URL` environment variable, then localhost:9514.
    /// Ignored when the `playwright` feature drives the browser in-process.
    pub sidecar_url: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            sidecar_url: default_sidecar_url(),
        }
    }
}

fn default_sidecar_url() -> String {
    std::env::var("BROWSER_SIDECAR_URL").unwrap_or_else(|_| "http://127.0.0.1:9514".to_string())
}

/// Per-plugin tunables, one section per plugin that has any.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PluginsConfig {
    pub code_sandbox: CodeSandboxConfig,
    pub program_runner: ProgramRunnerConfig,
    pub file_reader: FileReaderConfig,
    pub file_writer: FileWriterConfig,
    pub file_deleter: FileDeleterConfig,
    pub project_generator: ProjectGeneratorConfig,
    pub web_reader: WebReaderConfig,
    pub web_search: WebSearchConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CodeSandboxConfig {
    /// Interpreter spawned for `python` snippets.
    pub python_command: String,
    /// Interpreter spawned for `javascript_node` snippets.
    pub node_command: String,
    /// Wall-clock limit for a python run, in seconds.
    pub python_timeout_secs: u64,
    /// Wall-clock limit for a node run, in seconds.
    pub node_timeout_secs: u64,
    /// Where temporary script files are created. Defaults to the system
    /// temp directory; point it at a dedicated volume if needed.
    pub scratch_dir: Option<String>,
}

impl Default for CodeSandboxConfig {
    fn default() -> Self {
        Self {
            python_command: default_python_command(),
            node_command: default_node_command(),
            python_timeout_secs: default_sandbox_timeout(),
            node_timeout_secs: default_sandbox_timeout(),
            scratch_dir: None,
        }
    }
}

fn default_python_command() -> String {
    "python3".to_string()
}

fn default_node_command() -> String {
    "node".to_string()
}

fn default_sandbox_timeout() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProgramRunnerConfig {
    /// Master switch. When false every invocation is refused. There is no
    /// finer-grained allow-list: the plugin exists to run arbitrary
    /// commands.
    pub allow_arbitrary: bool,
    /// Wall-clock limit for the spawned program, in seconds.
    pub timeout_secs: u64,
}

impl Default for ProgramRunnerConfig {
    fn default() -> Self {
        Self {
            allow_arbitrary: true,
            timeout_secs: default_runner_timeout(),
        }
    }
}

fn default_runner_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FileReaderConfig {
    /// Largest file the reader will open, in megabytes. A file exactly at
    /// the limit still passes.
    pub max_file_size_mb: u64,
    /// Longest content echoed back, in characters; the rest is truncated
    /// with a marker.
    pub max_output_chars: usize,
}

impl Default for FileReaderConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: default_max_file_size_mb(),
            max_output_chars: default_reader_output_chars(),
        }
    }
}

fn default_max_file_size_mb() -> u64 {
    5
}

fn default_reader_output_chars() -> usize {
    15000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FileWriterConfig {
    /// Master switch. When false every batch is refused with a single
    /// failure entry. Paths are otherwise unrestricted by design.
    pub allow_arbitrary_paths: bool,
    /// Largest content accepted per operation, in megabytes of UTF-8.
    pub max_file_size_mb: u64,
}

impl Default for FileWriterConfig {
    fn default() -> Self {
        Self {
            allow_arbitrary_paths: true,
            max_file_size_mb: default_max_file_size_mb(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileDeleterConfig {
    /// Roots under which deletion is permitted. A target must be a strict
    /// descendant of one of these; empty means deletion is disabled.
    pub allowed_base_paths: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectGeneratorConfig {
    /// Master switch, as for the file writer.
    pub allow_arbitrary_paths: bool,
}

impl Default for ProjectGeneratorConfig {
    fn default() -> Self {
        Self {
            allow_arbitrary_paths: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebReaderConfig {
    /// Navigation deadline, in seconds. On expiry whatever HTML already
    /// rendered is used.
    pub page_load_timeout_secs: u64,
    /// Fixed wait after navigation for dynamic content, in seconds.
    pub settle_delay_secs: u64,
    /// Longest main-text excerpt, in characters.
    pub max_text_chars: usize,
    /// Most links listed.
    pub max_links: usize,
    /// Browser engine for the in-process backend. The sidecar picks its
    /// own engine.
    pub browser: String,
    pub headless: bool,
}

impl Default for WebReaderConfig {
    fn default() -> Self {
        Self {
            page_load_timeout_secs: default_reader_page_timeout(),
            settle_delay_secs: default_settle_delay(),
            max_text_chars: default_reader_text_chars(),
            max_links: default_reader_links(),
            browser: default_browser_engine(),
            headless: true,
        }
    }
}

fn default_reader_page_timeout() -> u64 {
    30
}

fn default_settle_delay() -> u64 {
    3
}

fn default_reader_text_chars() -> usize {
    20000
}

fn default_reader_links() -> usize {
    25
}

fn default_browser_engine() -> String {
    "chromium".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebSearchConfig {
    /// Result-page endpoint the query is appended to.
    pub search_base_url: String,
    pub page_load_timeout_secs: u64,
    pub settle_delay_secs: u64,
    pub max_text_chars: usize,
    pub max_links: usize,
    pub headless: bool,
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            search_base_url: default_search_base_url(),
            page_load_timeout_secs: default_search_page_timeout(),
            settle_delay_secs: default_settle_delay(),
            max_text_chars: default_search_text_chars(),
            max_links: default_search_links(),
            headless: true,
        }
    }
}

fn default_search_base_url() -> String {
    "https://www.google.com/search".to_string()
}

fn default_search_page_timeout() -> u64 {
    45
}

fn default_search_text_chars() -> usize {
    25000
}

fn default_search_links() -> usize {
    30
}

// ── tests ───────────────────────────────────────────────────
