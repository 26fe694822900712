//! Dispatcher contract tests: usage replies, fault shapes and rendering.

use errand::config::Config;
use errand::manifest;
use errand::plugins::{self, Plugin};
use errand::reply::Reply;
use serde_json::Value;

fn json_of(reply: Reply) -> Value {
    match reply {
        Reply::Json(v) => v,
        Reply::Text(t) => panic!("expected a JSON reply, got text: {t}"),
    }
}

fn text_of(reply: Reply) -> String {
    match reply {
        Reply::Text(t) => t,
        Reply::Json(v) => panic!("expected a text reply, got JSON: {v}"),
    }
}

// ── usage replies ────────────────────────────────────────────

#[tokio::test]
async fn missing_argument_yields_the_usage_line() {
    let config = Config::default();
    for plugin in Plugin::ALL {
        if !plugin.requires_argument() {
            continue;
        }
        let reply = plugins::invoke(plugin, None, &config).await;
        let text = text_of(reply);
        assert_eq!(text, manifest::for_plugin(plugin).usage);
        assert!(
            text.starts_with(&format!("Usage: {}", plugin.binary())),
            "usage should name the binary, got: {text}"
        );
    }
}

#[tokio::test]
async fn argument_free_plugins_run_without_one() {
    let config = Config::default();

    let time = text_of(plugins::invoke(Plugin::TimeReporter, None, &config).await);
    assert!(time.starts_with("Current system time: "));

    let ack = text_of(plugins::invoke(Plugin::ContinueReply, None, &config).await);
    assert!(ack.starts_with("[continue_reply]:"));
}

// ── fault shapes ─────────────────────────────────────────────

#[tokio::test]
async fn sandbox_faults_keep_the_execution_shape() {
    let config = Config::default();
    let v = json_of(plugins::invoke(Plugin::CodeSandbox, Some("not json"), &config).await);
    assert_eq!(v["status"], "error");
    assert_eq!(v["stdout"], "");
    assert_eq!(v["return_code"], -1);
    assert!(v["stderr"]
        .as_str()
        .unwrap()
        .contains("argument is not valid JSON"));
}

#[tokio::test]
async fn sandbox_rejects_unknown_languages() {
    let config = Config::default();
    let arg = r#"{"language": "ruby", "code": "puts 1"}"#;
    let v = json_of(plugins::invoke(Plugin::CodeSandbox, Some(arg), &config).await);
    assert_eq!(v["status"], "error");
    assert!(v["stderr"]
        .as_str()
        .unwrap()
        .contains("unsupported language 'ruby'"));
}

#[tokio::test]
async fn runner_faults_carry_a_message_and_sentinel_code() {
    let config = Config::default();
    let v = json_of(plugins::invoke(Plugin::ProgramRunner, Some("{"), &config).await);
    assert_eq!(v["status"], "error");
    assert_eq!(v["return_code"], -1);
    assert!(v["message"]
        .as_str()
        .unwrap()
        .contains("argument is not valid JSON"));
}

#[tokio::test]
async fn updater_parse_failure_is_a_single_failure_entry() {
    let config = Config::default();
    let v = json_of(plugins::invoke(Plugin::FileUpdater, Some("not json"), &config).await);
    let entries = v.as_array().expect("updater replies are arrays");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["path"], "json parse error");
    assert_eq!(entries[0]["status"], "failure");
    assert!(entries[0]["message"]
        .as_str()
        .unwrap()
        .contains("argument is not valid JSON"));
}

#[tokio::test]
async fn generator_parse_failure_is_a_single_failure_entry() {
    let config = Config::default();
    let v = json_of(plugins::invoke(Plugin::ProjectGenerator, Some("]["), &config).await);
    let entries = v.as_array().expect("generator replies are arrays");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["item"], "invalid argument");
    assert_eq!(entries[0]["status"], "failure");
}

#[tokio::test]
async fn deleter_refusal_is_a_failure_with_a_message() {
    // The default config has no allowed base paths, so everything is refused.
    let config = Config::default();
    let v = json_of(plugins::invoke(Plugin::FileDeleter, Some("/tmp/whatever"), &config).await);
    assert_eq!(v["status"], "failure");
    assert!(v["message"].as_str().unwrap().contains("not permitted"));
}

#[tokio::test]
async fn deleter_empty_argument_is_an_error() {
    let config = Config::default();
    let v = json_of(plugins::invoke(Plugin::FileDeleter, Some("   "), &config).await);
    assert_eq!(v["status"], "error");
    assert!(v["message"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn text_plugins_report_faults_as_an_error_line() {
    let config = Config::default();
    let text = text_of(
        plugins::invoke(Plugin::FileReader, Some("/definitely/not/here.txt"), &config).await,
    );
    assert!(
        text.starts_with("Error: file not found:"),
        "got: {text}"
    );
}

// ── rendering ────────────────────────────────────────────────

#[tokio::test]
async fn batch_replies_render_pretty_and_object_replies_compact() {
    let config = Config::default();

    let batch = plugins::invoke(Plugin::FileUpdater, Some("not json"), &config).await;
    assert!(batch.render().contains('\n'));

    let single = plugins::invoke(Plugin::ProgramRunner, Some("{"), &config).await;
    assert!(!single.render().contains('\n'));
}
