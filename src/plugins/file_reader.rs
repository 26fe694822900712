//! read_file — bounded, encoding-aware file reading.

use crate::config::Config;
use crate::error::PluginError;
use crate::paths;
use crate::reply::Reply;
use crate::text;

pub async fn run(argument: &str, config: &Config) -> Result<Reply, PluginError> {
    let cfg = &config.plugins.file_reader;
    let raw = argument.trim();
    if raw.is_empty() {
        return Err(PluginError::InvalidInput("the file path is empty".to_string()));
    }
    let path = paths::resolve(&paths::expand_user(raw));

    let meta = tokio::fs::metadata(&path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            PluginError::InvalidInput(format!("file not found: {}", path.display()))
        }
        _ => PluginError::Internal(format!("could not stat {}: {e}", path.display())),
    })?;
    if !meta.is_file() {
        return Err(PluginError::InvalidInput(format!(
            "not a regular file: {}",
            path.display()
        )));
    }
    let limit = cfg.max_file_size_mb * 1024 * 1024;
    if meta.len() > limit {
        return Err(PluginError::InvalidInput(format!(
            "file is {}, over the {} MB limit",
            text::format_kb(meta.len()),
            cfg.max_file_size_mb
        )));
    }

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| PluginError::Internal(format!("could not read {}: {e}", path.display())))?;
    let (content, encoding) = decode_bytes(&bytes)?;

    let (mut shown, cut) = text::clip_chars(&content, cfg.max_output_chars);
    if cut {
        shown.push_str(&format!(
            "\n\n[Content truncated at {} characters...]",
            cfg.max_output_chars
        ));
    }

    Ok(Reply::Text(format!(
        "[File path]: {}\n[Detected encoding]: {}\n[File size]: {}\n\n[File content]:\n{}",
        path.display(),
        encoding,
        text::format_kb(meta.len()),
        shown
    )))
}

/// Try UTF-8 strict, then GBK, then windows-1252. Bytes containing NUL are
/// treated as binary and never decoded.
fn decode_bytes(bytes: &[u8]) -> Result<(String, &'static str), PluginError> {
    if bytes.contains(&0) {
        return Err(PluginError::InvalidInput(
            "the file appears to be binary (contains NUL bytes)".to_string(),
        ));
    }
    if let Ok(utf8) = std::str::from_utf8(bytes) {
        return Ok((utf8.to_string(), "utf-8"));
    }
    let (decoded, _, had_errors) = encoding_rs::GBK.decode(bytes);
    if !had_errors {
        return Ok((decoded.into_owned(), "gbk"));
    }
    // windows-1252 maps every byte, so this always succeeds.
    let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    Ok((decoded.into_owned(), "windows-1252"))
}

// ── tests ───────────────────────────────────────────────────
