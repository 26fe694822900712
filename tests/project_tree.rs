//! Integration tests for project_generator: tree walking, entry order
//! and per-leaf failure isolation.

use errand::config::Config;
use errand::plugins::{self, Plugin};
use errand::reply::Reply;
use serde_json::{json, Value};
use tempfile::TempDir;

fn workspace() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn entries_of(reply: Reply) -> Vec<Value> {
    match reply {
        Reply::Json(Value::Array(entries)) => entries,
        other => panic!("expected a JSON array reply, got: {other:?}"),
    }
}

#[tokio::test]
async fn generator_builds_a_tree_in_document_order() {
    let ws = workspace();
    let base = ws.path().join("proj");
    let arg = json!({
        "base_path": base.to_string_lossy(),
        "structure": {
            "src": { "main.py": "print('hi')\n" },
            "README.md": "# Demo\n",
        },
    })
    .to_string();

    let entries =
        entries_of(plugins::invoke(Plugin::ProjectGenerator, Some(&arg), &Config::default()).await);
    assert_eq!(entries.len(), 3, "base + two files, no entry for 'src' itself");

    let resolved_base = ws.path().canonicalize().unwrap().join("proj");
    assert_eq!(entries[0]["item"], resolved_base.display().to_string());
    assert_eq!(entries[0]["status"], "success");
    assert_eq!(entries[0]["message"], "created");

    assert_eq!(entries[1]["item"], "src/main.py");
    assert_eq!(entries[1]["status"], "success");
    assert_eq!(entries[1]["message"], "created file");

    assert_eq!(entries[2]["item"], "README.md");
    assert_eq!(entries[2]["status"], "success");

    assert_eq!(
        std::fs::read_to_string(base.join("src/main.py")).unwrap(),
        "print('hi')\n"
    );
    assert_eq!(std::fs::read_to_string(base.join("README.md")).unwrap(), "# Demo\n");
}

#[tokio::test]
async fn generator_reports_an_existing_base_as_info() {
    let ws = workspace();
    let base = ws.path().join("already");
    std::fs::create_dir(&base).unwrap();

    let arg = json!({ "base_path": base.to_string_lossy(), "structure": {} }).to_string();
    let entries =
        entries_of(plugins::invoke(Plugin::ProjectGenerator, Some(&arg), &Config::default()).await);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["status"], "info");
    assert_eq!(entries[0]["message"], "already existed");
}

#[tokio::test]
async fn generator_rejects_escaping_names_but_keeps_going() {
    let ws = workspace();
    let base = ws.path().join("proj");
    let arg = json!({
        "base_path": base.to_string_lossy(),
        "structure": {
            "ok.txt": "x",
            "../evil.txt": "y",
            "also_ok.txt": "z",
        },
    })
    .to_string();

    let entries =
        entries_of(plugins::invoke(Plugin::ProjectGenerator, Some(&arg), &Config::default()).await);
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[1]["item"], "ok.txt");
    assert_eq!(entries[1]["status"], "success");
    assert_eq!(entries[2]["item"], "../evil.txt");
    assert_eq!(entries[2]["status"], "failure");
    assert!(entries[2]["message"].as_str().unwrap().contains("invalid name"));
    assert_eq!(entries[3]["item"], "also_ok.txt");
    assert_eq!(entries[3]["status"], "success");

    assert!(base.join("ok.txt").exists());
    assert!(base.join("also_ok.txt").exists());
    assert!(!ws.path().join("evil.txt").exists(), "nothing may escape the base");
}

#[tokio::test]
async fn generator_distinguishes_leaf_kinds() {
    let ws = workspace();
    let base = ws.path().join("proj");
    let arg = json!({
        "base_path": base.to_string_lossy(),
        "structure": {
            "empty_dir": null,
            "file.txt": "content",
            "count": 7,
        },
    })
    .to_string();

    let entries =
        entries_of(plugins::invoke(Plugin::ProjectGenerator, Some(&arg), &Config::default()).await);
    assert_eq!(entries.len(), 4);

    assert_eq!(entries[1]["item"], "empty_dir");
    assert_eq!(entries[1]["message"], "created empty directory");
    assert!(base.join("empty_dir").is_dir());

    assert_eq!(entries[2]["item"], "file.txt");
    assert_eq!(entries[2]["message"], "created file");

    assert_eq!(entries[3]["item"], "count");
    assert_eq!(entries[3]["status"], "failure");
    assert!(entries[3]["message"]
        .as_str()
        .unwrap()
        .contains("unsupported value of type number"));
}

#[tokio::test]
async fn generator_labels_nested_files_with_relative_paths() {
    let ws = workspace();
    let base = ws.path().join("proj");
    let arg = json!({
        "base_path": base.to_string_lossy(),
        "structure": { "a": { "b": { "c.txt": "deep" } } },
    })
    .to_string();

    let entries =
        entries_of(plugins::invoke(Plugin::ProjectGenerator, Some(&arg), &Config::default()).await);
    assert_eq!(entries.len(), 2, "directories along the way produce no entries");
    assert_eq!(entries[1]["item"], "a/b/c.txt");
    assert_eq!(std::fs::read_to_string(base.join("a/b/c.txt")).unwrap(), "deep");
}

#[tokio::test]
async fn generator_disabled_by_configuration() {
    let ws = workspace();
    let base = ws.path().join("proj");
    let mut config = Config::default();
    config.plugins.project_generator.allow_arbitrary_paths = false;

    let arg = json!({
        "base_path": base.to_string_lossy(),
        "structure": { "file.txt": "x" },
    })
    .to_string();

    let entries = entries_of(plugins::invoke(Plugin::ProjectGenerator, Some(&arg), &config).await);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["item"], "disabled");
    assert_eq!(entries[0]["status"], "failure");
    assert!(!base.exists());
}
