//! search_web — drive the engine's results page and distill result links.

use std::time::Duration;

use crate::browser::{self, PageRequest};
use crate::config::{Config, WebSearchConfig};
use crate::error::PluginError;
use crate::extract;
use crate::reply::Reply;
use crate::text;

/// Best-effort dismissal of a cookie-consent dialog; the result is
/// ignored.
const CONSENT_SCRIPT: &str = r#"(() => {
    const labels = ["accept all", "i agree", "agree", "reject all", "alle akzeptieren", "tout accepter"];
    const candidates = Array.from(document.querySelectorAll('button, input[type="submit"]'));
    for (const el of candidates) {
        const caption = (el.innerText || el.value || "").trim().toLowerCase();
        if (labels.some(l => caption.includes(l))) { el.click(); return "clicked"; }
    }
    return "none";
})()"#;

pub async fn run(argument: &str, config: &Config) -> Result<Reply, PluginError> {
    let cfg = &config.plugins.web_search;
    let query = argument.trim();
    if query.is_empty() {
        return Err(PluginError::InvalidInput(
            "the search query is empty".to_string(),
        ));
    }
    let url = search_url(&cfg.search_base_url, query);

    tracing::info!("searching the web for {query:?}");

    let capture = browser::capture_page(
        &config.browser.sidecar_url,
        PageRequest {
            url: &url,
            load_timeout: Duration::from_secs(cfg.page_load_timeout_secs),
            settle: Duration::from_secs(cfg.settle_delay_secs),
            post_load_script: Some(CONSENT_SCRIPT),
            headless: cfg.headless,
        },
    )
    .await?;
    if capture.timed_out {
        tracing::warn!("navigation timed out; reporting the partial results page");
    }

    Ok(Reply::Text(build_report(query, &url, &capture.html, cfg)))
}

fn search_url(base: &str, query: &str) -> String {
    let joiner = if base.contains('?') { '&' } else { '?' };
    format!("{base}{joiner}q={}&hl=en", extract::urlencode(query))
}

fn build_report(query: &str, url: &str, html: &str, cfg: &WebSearchConfig) -> String {
    let title = extract::page_title(html).unwrap_or_else(|| "(no title)".to_string());
    let body = extract::search_page_text(html);
    let links = extract::search_result_links(html, url);

    let mut out = format!(
        "[Search query]: {query}\n[Result page title]: {title}\n[Search URL]: {url}\n\n[Main text content]:\n"
    );
    if body.is_empty() {
        out.push_str("(no readable text on the results page)");
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

    out.push_str("\n\n[Result links]:\n");
    if links.is_empty() {
        out.push_str("No external result links found.");
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
