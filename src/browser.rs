//! One-shot browser page sessions for the web plugins.
//!
//! Two back-ends are available at compile time:
//!
//! * **Default (sidecar)** — talks to a Playwright/CDP sidecar over HTTP.
//!   If the sidecar is not running, opening a session fails immediately.
//!
//! * **`playwright` feature** — drives a headless Chromium directly via
//!   the `playwright-rs` crate (no sidecar needed).
//!
//! A session lives for exactly one plugin invocation. [`capture_page`] is
//! the only entry point the plugins use; it owns the session for its whole
//! scope and tears it down on every path, including timeouts.

use std::time::Duration;

use serde_json::Value;

use crate::error::PluginError;

/// What to fetch and how long to wait for it.
#[derive(Debug, Clone)]
pub struct PageRequest<'a> {
    pub url: &'a str,
    /// Navigation deadline. On expiry whatever HTML already rendered is
    /// captured instead of failing outright.
    pub load_timeout: Duration,
    /// Fixed wait after navigation for dynamic content.
    pub settle: Duration,
    /// Evaluated after the settle wait, before capture; failures are
    /// ignored (used for best-effort consent dismissal).
    pub post_load_script: Option<&'a str>,
    pub headless: bool,
}

/// The captured page.
#[derive(Debug, Clone)]
pub struct PageCapture {
    pub html: String,
    /// Where the browser actually ended up after redirects.
    pub final_url: String,
    pub timed_out: bool,
}

/// Navigate one fresh page and capture its HTML.
pub async fn capture_page(
    sidecar_url: &str,
    req: PageRequest<'_>,
) -> Result<PageCapture, PluginError> {
    let session = PageSession::open(sidecar_url, req.headless)
        .await
        .map_err(|e| {
            PluginError::DependencyMissing(format!(
                "browser unavailable: {e:#}; start the browser sidecar or install the browser driver"
            ))
        })?;
    let outcome = drive(&session, &req).await;
    session.close().await;
    outcome
}

async fn drive(session: &PageSession, req: &PageRequest<'_>) -> Result<PageCapture, PluginError> {
    let timed_out = match tokio::time::timeout(req.load_timeout, session.goto(req.url)).await {
        Ok(Ok(())) => false,
        Ok(Err(e)) => return Err(PluginError::Internal(format!("navigation failed: {e:#}"))),
        // The page may still hold partial content worth capturing.
        Err(_) => true,
    };

    if !req.settle.is_zero() {
        tokio::time::sleep(req.settle).await;
    }
    if let Some(script) = req.post_load_script {
        if let Err(e) = session.eval(script).await {
            tracing::debug!("post-load script failed: {e:#}");
        }
    }

    let html = match session.eval("document.documentElement.outerHTML").await {
        Ok(v) => value_text(&v),
        Err(_) if timed_out => String::new(),
        Err(e) => {
            return Err(PluginError::Internal(format!(
                "could not capture page HTML: {e:#}"
            )))
        }
    };
    if timed_out && html.trim().is_empty() {
        return Err(PluginError::Timeout(format!(
            "page did not load within {} seconds",
            req.load_timeout.as_secs()
        )));
    }

    let final_url = match session.eval("window.location.href").await {
        Ok(v) => {
            let url = value_text(&v);
            if url.is_empty() {
                req.url.to_string()
            } else {
                url
            }
        }
        Err(_) => req.url.to_string(),
    };

    Ok(PageCapture {
        html,
        final_url,
        timed_out,
    })
}

/// Eval results arrive as a bare JSON value; page HTML and URLs are
/// strings.
fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ── Playwright-backed implementation ────────────────────────
#[cfg(feature = "playwright")]
mod impl_playwright {
    use serde_json::Value;

    use playwright_rust::api::LaunchOptions;
    use playwright_rust::protocol::{Browser, Page, Playwright};

    /// One page in a freshly launched Chromium.
    pub struct PageSession {
        _playwright: Playwright,
        _browser: Browser,
        page: Page,
    }

    impl PageSession {
        /// Launch Playwright + Chromium and open a page. The sidecar URL is
        /// unused by this backend.
        pub async fn open(_sidecar_url: &str, headless: bool) -> anyhow::Result<Self> {
            let playwright = Playwright::launch()
                .await
                .map_err(|e| anyhow::anyhow!("failed to launch Playwright server: {e}"))?;

            let browser = playwright
                .chromium()
                .launch_with_options(LaunchOptions::new().headless(headless))
                .await
                .map_err(|e| anyhow::anyhow!("failed to launch Chromium: {e}"))?;

            let page = browser
                .new_page()
                .await
                .map_err(|e| anyhow::anyhow!("failed to open page: {e}"))?;

            Ok(Self {
                _playwright: playwright,
                _browser: browser,
                page,
            })
        }

        pub async fn goto(&self, url: &str) -> anyhow::Result<()> {
            self.page
                .goto(url, None)
                .await
                .map(|_| ())
                .map_err(|e| anyhow::anyhow!("goto failed: {e}"))
        }

        /// Evaluate a JavaScript expression in the page.
        pub async fn eval(&self, expr: &str) -> anyhow::Result<Value> {
            // `evaluate_value` returns a `String` representation of the
            // result.
            let result = self
                .page
                .evaluate_value(expr)
                .await
                .map_err(|e| anyhow::anyhow!("eval failed: {e}"))?;
            Ok(Value::String(result))
        }

        pub async fn close(self) {
            if let Err(e) = self.page.close().await {
                tracing::debug!("page close failed: {e}");
            }
        }
    }
}

#[cfg(feature = "playwright")]
pub use impl_playwright::PageSession;

// ── Sidecar-based (default) implementation ──────────────────
#[cfg(not(feature = "playwright"))]
mod impl_sidecar {
    use std::time::Duration;

    use anyhow::Context;
    use serde_json::Value;

    /// Deadline for housekeeping calls. Navigation gets its own deadline
    /// at the call site.
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// One session in a headless-browser sidecar, driven over HTTP.
    #[derive(Debug, Clone)]
    pub struct PageSession {
        client: reqwest::Client,
        base_url: String,
        session_id: String,
    }

    impl PageSession {
        /// Connect to the sidecar and open a session.
        ///
        /// Performs a health-check request first, so an absent sidecar
        /// fails fast. The `_headless` parameter is ignored: the sidecar
        /// controls its own browser mode.
        pub async fn open(sidecar_url: &str, _headless: bool) -> anyhow::Result<Self> {
            let base_url = sidecar_url.trim_end_matches('/').to_string();
            let client = reqwest::Client::builder()
                .build()
                .context("building HTTP client for browser sidecar")?;

            client
                .get(format!("{base_url}/health"))
                .timeout(REQUEST_TIMEOUT)
                .send()
                .await
                .with_context(|| format!("browser sidecar not reachable at {base_url}"))?;

            let resp = client
                .post(format!("{base_url}/sessions"))
                .timeout(REQUEST_TIMEOUT)
                .json(&serde_json::json!({ "agent_id": "errand" }))
                .send()
                .await
                .context("creating browser session")?;
            let json: Value = resp.json().await.context("parsing session response")?;
            let session_id = json["session_id"]
                .as_str()
                .map(|s| s.to_string())
                .ok_or_else(|| anyhow::anyhow!("sidecar did not return session_id"))?;

            Ok(Self {
                client,
                base_url,
                session_id,
            })
        }

        pub async fn goto(&self, url: &str) -> anyhow::Result<()> {
            let endpoint = format!("{}/sessions/{}/goto", self.base_url, self.session_id);
            self.client
                .post(&endpoint)
                .json(&serde_json::json!({ "url": url }))
                .send()
                .await
                .context("browser goto")?;
            Ok(())
        }

        /// Evaluate a JavaScript expression in the current page.
        pub async fn eval(&self, expr: &str) -> anyhow::Result<Value> {
            let endpoint = format!("{}/sessions/{}/eval", self.base_url, self.session_id);
            let resp = self
                .client
                .post(&endpoint)
                .timeout(REQUEST_TIMEOUT)
                .json(&serde_json::json!({ "expression": expr }))
                .send()
                .await
                .context("browser eval")?;
            resp.json().await.context("parsing eval response")
        }

        pub async fn close(self) {
            let endpoint = format!("{}/sessions/{}", self.base_url, self.session_id);
            let sent = self
                .client
                .delete(&endpoint)
                .timeout(REQUEST_TIMEOUT)
                .send()
                .await;
            if let Err(e) = sent {
                tracing::debug!("closing browser session failed: {e}");
            }
        }
    }
}

#[cfg(not(feature = "playwright"))]
pub use impl_sidecar::PageSession;
