use errand::cli;
use errand::plugins::Plugin;

#[tokio::main]
async fn main() {
    cli::plugin_main(Plugin::FileReader).await;
}
