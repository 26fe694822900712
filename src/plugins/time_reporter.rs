//! report_time — the local wall-clock time.

use chrono::Local;

use crate::config::Config;
use crate::error::PluginError;
use crate::reply::Reply;

/// Any argument is ignored; the proxy sends one sometimes.
pub async fn run(_argument: Option<&str>, _config: &Config) -> Result<Reply, PluginError> {
    let now = Local::now();
    Ok(Reply::Text(format!(
        "Current system time: {}",
        now.format("%Y-%m-%d %H:%M:%S")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn reports_a_formatted_timestamp() {
        let reply = run(None, &Config::default()).await.unwrap();
        let text = reply.render();
        assert!(text.starts_with("Current system time: "));
        // YYYY-MM-DD HH:MM:SS is 19 characters.
        assert_eq!(text.len(), "Current system time: ".len() + 19);
    }

    #[tokio::test]
    async fn argument_is_ignored() {
        let reply = run(Some("whatever"), &Config::default()).await.unwrap();
        assert!(reply.render().starts_with("Current system time: "));
    }
}
