//! read_web_page — fetch one page through a real browser and distill it.

use std::time::Duration;

use crate::browser::{self, PageRequest};
use crate::config::{Config, WebReaderConfig};
use crate::error::PluginError;
use crate::extract;
use crate::reply::Reply;
use crate::text;

pub async fn run(argument: &str, config: &Config) -> Result<Reply, PluginError> {
    let cfg = &config.plugins.web_reader;
    let raw = argument.trim();
    if raw.is_empty() {
        return Err(PluginError::InvalidInput("the URL is empty".to_string()));
    }
    let url = normalize_url(raw)?;

    tracing::info!("reading web page {url}");

    let capture = browser::capture_page(
        &config.browser.sidecar_url,
        PageRequest {
            url: &url,
            load_timeout: Duration::from_secs(cfg.page_load_timeout_secs),
            settle: Duration::from_secs(cfg.settle_delay_secs),
            post_load_script: None,
            headless: cfg.headless,
        },
    )
    .await?;
    if capture.timed_out {
        tracing::warn!("navigation timed out; reporting the partial page");
    }

    Ok(Reply::Text(build_report(
        &url,
        &capture.final_url,
        &capture.html,
        cfg,
    )))
}

/// A bare `host/path` gets an `http://` scheme; anything without a host
/// after that is rejected.
fn normalize_url(raw: &str) -> Result<String, PluginError> {
    let url = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };
    match extract::host_of(&url) {
        Some(_) => Ok(url),
        None => Err(PluginError::InvalidInput(format!(
            "no host in URL '{raw}'"
        ))),
    }
}

fn build_report(requested: &str, final_url: &str, html: &str, cfg: &WebReaderConfig) -> String {
    let title = extract::page_title(html).unwrap_or_else(|| "(no title)".to_string());
    let body = extract::page_text(html);
    let links = extract::page_links(html, final_url);

    let mut out = format!(
        "[Page title]: {title}\n[Requested URL]: {requested}\n[Final URL]: {final_url}\n\n[Main text content]:\n"
    );
    if body.is_empty() {
        out.push_str("(no readable text on this page)");
    } else {
        let (shown, cut) = text::clip_chars(&body, cfg.max_text_chars);
        out.push_str(&shown);
        if cut {
            out.push_str(&format!(
                "...\n[Content truncated at {} characters]",
                cfg.max_text_chars
            ));
        }
    }

    out.push_str("\n\n[Extracted links]:\n");
    if links.is_empty() {
        out.push_str("No usable links found.");
    } else {
        for link in links.iter().take(cfg.max_links) {
            out.push_str(&format!("- {}: {}\n", link.text, link.href));
        }
        if links.len() > cfg.max_links {
            out.push_str(&format!("[Link list truncated at {} links]", cfg.max_links));
        }
    }
    out.trim_end().to_string()
}

// ── tests ───────────────────────────────────────────────────
