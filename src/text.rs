//! Small text helpers shared by the reporting plugins.

/// Cut `s` to at most `max_chars` characters (characters, not bytes).
///
/// Returns the clipped text and whether anything was removed. Text exactly
/// at the limit counts as untouched.
pub fn clip_chars(s: &str, max_chars: usize) -> (String, bool) {
    match s.char_indices().nth(max_chars) {
        None => (s.to_string(), false),
        Some((byte_idx, _)) => (s[..byte_idx].to_string(), true),
    }
}

/// Human-readable file size in KB with two decimals, e.g. `12.34 KB`.
pub fn format_kb(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

/// Collapse runs of whitespace (including newlines) into single spaces and
/// trim the ends. Used for link captions.
pub fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ── tests ───────────────────────────────────────────────────
