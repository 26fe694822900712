//! continue_reply_ack — acknowledge a continuation request.
//!
//! The proxy injects the Reply back into the model conversation, so the
//! wording addresses the assistant, not a human.

use crate::config::Config;
use crate::error::PluginError;
use crate::reply::Reply;

pub async fn run(argument: Option<&str>, _config: &Config) -> Result<Reply, PluginError> {
    let hint = argument.map(str::trim).filter(|h| !h.is_empty());
    Ok(Reply::Text(match hint {
        Some(h) => format!(
            "[continue_reply]: Continuation request received with hint: '{h}'. \
             The assistant should continue from this hint."
        ),
        None => "[continue_reply]: Continuation request received. \
                 The assistant should resume the original reply."
            .to_string(),
    }))
}
