//! Reply — the single terminal output of a plugin invocation.

use serde::Serialize;
use serde_json::Value;

/// Outcome class carried by every structured payload.
///
/// Stays an enum everywhere inside the crate; it becomes a lowercase string
/// only when a JSON record is built or a Reply is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The action ran and the outcome was positive.
    Success,
    /// The action ran but the outcome was negative: nonzero exit code,
    /// refused batch item, unauthorized path.
    Failure,
    /// Neutral notice. Nothing was done and nothing went wrong.
    Info,
    /// The action could not be carried out at all.
    Error,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Failure => "failure",
            Status::Info => "info",
            Status::Error => "error",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a plugin hands back to its binary: plain text or a JSON value.
///
/// Every invocation produces exactly one of these, even on internal fault.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Json(Value),
}

impl Reply {
    pub fn text(s: impl Into<String>) -> Self {
        Reply::Text(s.into())
    }

    /// Serialize for stdout. Arrays (batch results) are pretty-printed,
    /// single objects stay compact, text passes through untouched.
    pub fn render(&self) -> String {
        match self {
            Reply::Text(s) => s.clone(),
            Reply::Json(v) if v.is_array() => {
                serde_json::to_string_pretty(v).unwrap_or_default()
            }
            Reply::Json(v) => serde_json::to_string(v).unwrap_or_default(),
        }
    }
}

// ── tests ───────────────────────────────────────────────────
