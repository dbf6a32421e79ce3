use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::path::Path;

/// Environment variables that would leak host configuration into a test run
const HOST_ENV: &[&str] = &[
    "GROQ_API_KEY",
    "SCIGRADE_MODEL",
    "SCIGRADE_API_BASE",
    "SCIGRADE_TIMEOUT_SECS",
    "SCIGRADE_LOG",
    "RUST_LOG",
];

/// Get a Command for scigrade running in `dir` with a clean environment
pub fn scigrade(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("scigrade");
    cmd.current_dir(dir);
    for var in HOST_ENV {
        cmd.env_remove(var);
    }
    cmd
}

/// Chat-completion envelope wrapping `content`
#[allow(dead_code)]
pub fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

#[allow(dead_code)]
pub const MITOCHONDRIA_REPLY: &str = r#"{"Accuracy": [5, "Correct"], "Completeness": [3, "Missing detail on electron transport chain"], "Clarity": [4, "Clear"], "Depth": [3, "Surface level"], "Relevance": [5, "On topic"]}"#;
