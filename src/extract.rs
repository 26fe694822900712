//! HTML distillation for the web plugins.
//!
//! Everything here is synchronous and allocation-only: `scraper`'s DOM is
//! not `Send`, so callers hand in the HTML as a string and get owned
//! results back before the next await point.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};

use crate::text::collapse_ws;

/// Elements that never contribute readable text or usable links.
const STRIP_TAGS: &[&str] = &[
    "script", "style", "header", "footer", "nav", "aside", "form", "noscript", "iframe", "button",
    "input", "select", "textarea", "link", "meta",
];

/// Elements that end a line of rendered text.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "main", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6",
    "table", "thead", "tbody", "tr", "blockquote", "pre", "figure", "figcaption", "dl", "dt", "dd",
];

/// Hosts owned by the search engine itself; links there are navigation
/// chrome or media proxies, not results.
const ENGINE_HOSTS: &[&str] = &["google.com", "googleusercontent.com"];

/// Anchor captions that mark engine navigation rather than results.
const NAV_LABELS: &[&str] = &[
    "maps", "images", "videos", "news", "shopping", "books", "flights", "finance", "tools",
    "settings", "sign in", "next", "previous", "more", "help", "privacy", "terms",
];

/// One extracted link: caption plus absolute target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub text: String,
    pub href: String,
}

/// Parse a literal CSS selector. Panics on an invalid selector, so call
/// only with literals.
fn css(selector: &str) -> Selector {
    Selector::parse(selector).unwrap()
}

/// The document title, trimmed, if there is a nonempty one.
pub fn page_title(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let title = doc.select(&css("title")).next()?;
    let text = collapse_ws(&title.text().collect::<String>());
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Readable text of an article-style page: the first of `<article>`,
/// `<main>`, `<body>` that exists, with non-content elements dropped and
/// blank lines collapsed.
pub fn page_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    rendered_text(main_container(&doc, &["article", "main", "body"]))
}

/// Readable text of a search results page (`#main`, `#rcnt`, else body).
pub fn search_page_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    rendered_text(main_container(&doc, &["#main", "#rcnt", "body"]))
}

/// Links from the main area of an article-style page, absolutized against
/// the final visited URL. Fragment, `javascript:`, `mailto:` and `tel:`
/// targets are skipped; an anchor without visible text is captioned with
/// its own URL.
pub fn page_links(html: &str, base_url: &str) -> Vec<PageLink> {
    let doc = Html::parse_document(html);
    let container = main_container(&doc, &["article", "main", "body"]);
    let mut links = Vec::new();
    for anchor in container.select(&css("a[href]")) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if skip_href(href) {
            continue;
        }
        let Some(absolute) = absolutize(base_url, href) else {
            continue;
        };
        let text = collapse_ws(&anchor.text().collect::<String>());
        let text = if text.is_empty() {
            absolute.clone()
        } else {
            text
        };
        links.push(PageLink {
            text,
            href: absolute,
        });
    }
    links
}

/// External result links from a search results page.
///
/// Engine redirect links (`/url?q=…`, `/search?sa=U&url=…`) are unwrapped
/// to their real target and dropped when the target is missing; links that
/// stay on the engine's own hosts are dropped; navigation captions (empty,
/// numeric pagination, known labels) are dropped; duplicates keep their
/// first occurrence.
pub fn search_result_links(html: &str, base_url: &str) -> Vec<PageLink> {
    let doc = Html::parse_document(html);
    let container = main_container(&doc, &["#main", "#rcnt", "body"]);
    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for anchor in container.select(&css("a[href]")) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if skip_href(href) {
            continue;
        }
        let text = collapse_ws(&anchor.text().collect::<String>());
        if is_nav_caption(&text) {
            continue;
        }
        let candidate = if is_engine_redirect(href) {
            match redirect_target(href) {
                Some(target) => target,
                None => continue,
            }
        } else {
            href.to_string()
        };
        let Some(absolute) = absolutize(base_url, &candidate) else {
            continue;
        };
        let Some(host) = host_of(&absolute) else {
            continue;
        };
        if ENGINE_HOSTS.iter().any(|d| host_matches(host, d)) {
            continue;
        }
        if !seen.insert(absolute.clone()) {
            continue;
        }
        links.push(PageLink {
            text,
            href: absolute,
        });
    }
    links
}

// ── DOM walking ─────────────────────────────────────────────

fn main_container<'a>(doc: &'a Html, candidates: &[&str]) -> ElementRef<'a> {
    for selector in candidates {
        if let Some(el) = doc.select(&css(selector)).next() {
            return el;
        }
    }
    doc.root_element()
}

fn rendered_text(container: ElementRef<'_>) -> String {
    let mut raw = String::new();
    append_text(container, &mut raw);
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn append_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            if STRIP_TAGS.contains(&name) {
                continue;
            }
            if name == "br" || name == "hr" {
                out.push('\n');
                continue;
            }
            append_text(child_el, out);
            if BLOCK_TAGS.contains(&name) {
                out.push('\n');
            }
        }
    }
}

// ── link filtering ──────────────────────────────────────────

fn skip_href(href: &str) -> bool {
    let h = href.trim();
    h.is_empty()
        || h.starts_with('#')
        || starts_with_ignore_case(h, "javascript:")
        || starts_with_ignore_case(h, "mailto:")
        || starts_with_ignore_case(h, "tel:")
}

fn is_nav_caption(text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    if text.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    let lowered = text.to_lowercase();
    NAV_LABELS.contains(&lowered.as_str())
}

fn is_engine_redirect(href: &str) -> bool {
    href.contains("/url?")
        || (href.contains("/search?") && href.contains("sa=U") && href.contains("url="))
}

/// The real target of an engine redirect link, percent-decoded.
fn redirect_target(href: &str) -> Option<String> {
    let target = query_param(href, "q")
        .or_else(|| query_param(href, "url"))
        .map(urldecode)?;
    if target.is_empty() {
        None
    } else {
        Some(target)
    }
}

fn query_param<'a>(url: &'a str, name: &str) -> Option<&'a str> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);
    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        if key == name {
            return Some(value);
        }
    }
    None
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len() && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

// ── URL handling ────────────────────────────────────────────
//
// Deliberately minimal: scheme, authority and path splitting plus dot
// segment removal cover everything the link extractors need.

/// The host of an absolute URL, without userinfo or port.
pub fn host_of(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("://")?;
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let mut authority = &rest[..end];
    if let Some((_, after_at)) = authority.rsplit_once('@') {
        authority = after_at;
    }
    let host = authority.split(':').next().unwrap_or(authority);
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// Whether `host` is `domain` or a subdomain of it, case-insensitively.
fn host_matches(host: &str, domain: &str) -> bool {
    let host = host.to_ascii_lowercase();
    let domain = domain.to_ascii_lowercase();
    host == domain || host.ends_with(&format!(".{domain}"))
}

/// Resolve `href` against an absolute `base` URL. Returns `None` when the
/// result would have no scheme or host.
pub fn absolutize(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.contains("://") {
        return if host_of(href).is_some() {
            Some(href.to_string())
        } else {
            None
        };
    }

    let (scheme, rest) = base.split_once("://")?;
    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..authority_end];
    if authority.is_empty() {
        return None;
    }
    let base_path = {
        let tail = &rest[authority_end..];
        let end = tail.find(['?', '#']).unwrap_or(tail.len());
        if tail[..end].is_empty() {
            "/"
        } else {
            &tail[..end]
        }
    };

    if let Some(body) = href.strip_prefix("//") {
        let joined = format!("{scheme}://{body}");
        return if host_of(&joined).is_some() {
            Some(joined)
        } else {
            None
        };
    }
    if href.starts_with('/') {
        return Some(format!("{scheme}://{authority}{}", resolve_dots(href)));
    }
    if href.starts_with('?') {
        return Some(format!("{scheme}://{authority}{base_path}{href}"));
    }
    if href.is_empty() {
        return Some(format!("{scheme}://{authority}{base_path}"));
    }

    let dir = match base_path.rfind('/') {
        Some(idx) => &base_path[..=idx],
        None => "/",
    };
    Some(format!(
        "{scheme}://{authority}{}",
        resolve_dots(&format!("{dir}{href}"))
    ))
}

/// Remove `.` and `..` segments from a rooted path, leaving any query or
/// fragment suffix alone.
fn resolve_dots(path_and_query: &str) -> String {
    let cut = path_and_query
        .find(['?', '#'])
        .unwrap_or(path_and_query.len());
    let (path, suffix) = path_and_query.split_at(cut);
    let mut segments: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    let mut out = String::from("/");
    out.push_str(&segments.join("/"));
    if path.ends_with('/') && !segments.is_empty() {
        out.push('/');
    }
    out.push_str(suffix);
    out
}

/// Percent-encode a query value (RFC 3986 unreserved set).
pub fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

/// Undo percent-encoding; `+` counts as a space, broken escapes stay
/// literal.
fn urldecode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit() =>
            {
                // Both guard bytes are ASCII, so the slice stays on char
                // boundaries.
                let byte = u8::from_str_radix(&s[i + 1..i + 3], 16).unwrap_or(b'%');
                out.push(byte);
                i += 3;
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

// ── tests ───────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE_PAGE: &str = r##"
        <html>
          <head><title>  Spaced   Title </title><style>body { color: red }</style></head>
          <body>
            <nav><a href="/nav">Navigation</a></nav>
            <article>
              <h1>Heading</h1>
              <p>First paragraph.</p>
              <script>console.log("noise")</script>
              <p>Second<br>line.</p>
              <a href="/docs/guide">Guide</a>
              <a href="mailto:a@b.c">Mail</a>
              <a href="#top">Top</a>
              <a href="https://other.example/page">Other</a>
              <a href="../sibling.html"><img src="x.png"></a>
            </article>
            <footer>Footer noise</footer>
          </body>
        </html>"##;

    #[test]
    fn title_is_collapsed() {
        assert_eq!(page_title(ARTICLE_PAGE).unwrap(), "Spaced Title");
        assert_eq!(page_title("<html><body>x</body></html>"), None);
    }

    #[test]
    fn article_text_skips_noise() {
        let text = page_text(ARTICLE_PAGE);
        assert!(text.contains("Heading"));
        assert!(text.contains("First paragraph."));
        assert!(text.contains("Second\nline."));
        assert!(!text.contains("noise"));
        assert!(!text.contains("Navigation"));
        assert!(!text.contains("Footer"));
    }

    #[test]
    fn body_is_the_fallback_container() {
        let html = "<html><body><p>Plain page.</p></body></html>";
        assert_eq!(page_text(html), "Plain page.");
    }

    #[test]
    fn links_come_from_the_main_area_absolutized() {
        let links = page_links(ARTICLE_PAGE, "https://site.example/a/b.html");
        let hrefs: Vec<&str> = links.iter().map(|l| l.href.as_str()).collect();
        assert!(hrefs.contains(&"https://site.example/docs/guide"));
        assert!(hrefs.contains(&"https://other.example/page"));
        assert!(hrefs.contains(&"https://site.example/sibling.html"));
        // Navigation is outside the article; mail and fragment targets are
        // skipped.
        assert!(!hrefs.iter().any(|h| h.contains("/nav")));
        assert!(!hrefs.iter().any(|h| h.starts_with("mailto:")));
        assert!(!hrefs.iter().any(|h| h.contains("#top")));
    }

    #[test]
    fn caption_falls_back_to_the_url() {
        let links = page_links(ARTICLE_PAGE, "https://site.example/a/b.html");
        let img_link = links
            .iter()
            .find(|l| l.href == "https://site.example/sibling.html")
            .unwrap();
        assert_eq!(img_link.text, img_link.href);
    }

    const RESULTS_PAGE: &str = r#"
        <html><head><title>query - Search</title></head>
        <body>
          <div id="main">
            <a href="/url?q=https%3A%2F%2Fexample.org%2Fdocs&amp;sa=U&amp;ved=abc"><h3>Example Docs</h3></a>
            <a href="/search?sa=U&amp;url=https%3A%2F%2Frust-lang.org%2F">Rust</a>
            <a href="/url?q=https%3A%2F%2Fexample.org%2Fdocs&amp;sa=U">Example Docs again</a>
            <a href="/url?q=&amp;sa=U">Broken redirect</a>
            <a href="https://www.google.com/preferences">Settings</a>
            <a href="https://accounts.google.com/signin">Sign in</a>
            <a href="https://lh3.googleusercontent.com/img">thumb</a>
            <a href="/search?q=query&amp;start=10">2</a>
            <a href="https://mirror.example.net/direct">Direct result</a>
          </div>
        </body></html>"#;

    #[test]
    fn search_links_unwrap_redirects_and_filter_chrome() {
        let links = search_result_links(RESULTS_PAGE, "https://www.google.com/search?q=query");
        let hrefs: Vec<&str> = links.iter().map(|l| l.href.as_str()).collect();
        assert_eq!(
            hrefs,
            vec![
                "https://example.org/docs",
                "https://rust-lang.org/",
                "https://mirror.example.net/direct",
            ]
        );
        assert_eq!(links[0].text, "Example Docs");
    }

    #[test]
    fn numeric_and_label_captions_are_chrome() {
        assert!(is_nav_caption(""));
        assert!(is_nav_caption("2"));
        assert!(is_nav_caption("Images"));
        assert!(is_nav_caption("Sign in"));
        assert!(!is_nav_caption("Rust 2024 roadmap"));
    }

    #[test]
    fn absolutize_handles_the_usual_shapes() {
        let base = "https://host.example/dir/page.html?x=1";
        assert_eq!(
            absolutize(base, "https://abs.example/p").unwrap(),
            "https://abs.example/p"
        );
        assert_eq!(
            absolutize(base, "//cdn.example/lib.js").unwrap(),
            "https://cdn.example/lib.js"
        );
        assert_eq!(
            absolutize(base, "/root.html").unwrap(),
            "https://host.example/root.html"
        );
        assert_eq!(
            absolutize(base, "other.html").unwrap(),
            "https://host.example/dir/other.html"
        );
        assert_eq!(
            absolutize(base, "../up.html").unwrap(),
            "https://host.example/up.html"
        );
        assert_eq!(
            absolutize(base, "?page=2").unwrap(),
            "https://host.example/dir/page.html?page=2"
        );
        assert_eq!(absolutize(base, "http://"), None);
        assert_eq!(absolutize("not-a-url", "x.html"), None);
    }

    #[test]
    fn host_extraction() {
        assert_eq!(host_of("https://a.example:8080/x"), Some("a.example"));
        assert_eq!(host_of("http://user@b.example/x"), Some("b.example"));
        assert_eq!(host_of("nope"), None);
        assert!(host_matches("www.google.com", "google.com"));
        assert!(host_matches("GOOGLE.com", "google.com"));
        assert!(!host_matches("notgoogle.com", "google.com"));
    }

    #[test]
    fn query_encoding_round_trip() {
        assert_eq!(urlencode("rust async runtime"), "rust%20async%20runtime");
        assert_eq!(urlencode("a&b=c"), "a%26b%3Dc");
        assert_eq!(urldecode("https%3A%2F%2Fx.example%2F"), "https://x.example/");
        assert_eq!(urldecode("one+two"), "one two");
        assert_eq!(urldecode("50%"), "50%");
        assert_eq!(urldecode("%中"), "%中");
    }
}
