//! Shared command-line entry point for every plugin binary.
//!
//! Each binary in `src/bin/` is a thin shell around [`plugin_main`]: it
//! names its [`Plugin`] variant and everything else, argument parsing,
//! logging, config loading and reply printing, happens here. Replies go
//! to stdout; logs go to stderr so a host process can capture the two
//! streams separately. The process always exits 0, faults are reported
//! in the reply body instead.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::manifest;
use crate::plugins::{self, Plugin};

#[derive(Parser, Debug)]
#[command(version, about = "Single-action assistant plugin", disable_help_subcommand = true)]
struct PluginCli {
    /// Argument string for the action, usually a JSON document.
    argument: Option<String>,

    /// Path to the configuration file.
    #[arg(long, value_name = "PATH", default_value = "config.json")]
    config: PathBuf,

    /// Print the plugin manifest as JSON and exit.
    #[arg(long)]
    manifest: bool,
}

/// Run one plugin end to end: parse argv, load config, invoke, print.
pub async fn plugin_main(plugin: Plugin) {
    init_tracing();

    let cli = match PluginCli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too; print and exit clean.
            let _ = e.print();
            return;
        }
    };

    if cli.manifest {
        let meta = manifest::for_plugin(plugin);
        println!("{}", serde_json::to_string_pretty(meta).unwrap_or_default());
        return;
    }

    let config = Config::load(&cli.config).await;
    let reply = plugins::invoke(plugin, cli.argument.as_deref(), &config).await;
    println!("{}", reply.render());
}

/// Log to stderr, filtered by `RUST_LOG` with an `info` fallback.
fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
