#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::{Command, Output};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "cepcli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn ceprims(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ceprims"))
        .args(["--log-level", "error", "--format", "json"])
        .args(args)
        .output()
        .expect("ceprims should run")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn encode_structured_embeds_json_payload() {
    let output = ceprims(&[
        "encode",
        "--id",
        "e1",
        "--source",
        "/people/p1",
        "--type",
        "AddressChanged",
        "--json",
        r#"{"zipCode":"10001"}"#,
        "--ext",
        "anumber=10",
        "--ext",
        "aboolean=true",
    ]);

    assert!(output.status.success());
    let doc = stdout_json(&output);
    assert_eq!(doc["specversion"], "1.0");
    assert_eq!(doc["type"], "AddressChanged");
    assert_eq!(doc["datacontenttype"], "application/json");
    assert_eq!(doc["data"]["zipCode"], "10001");
    assert_eq!(doc["anumber"], 10);
    assert_eq!(doc["aboolean"], true);
}

#[test]
fn encode_binary_prints_headers_and_body() {
    let output = ceprims(&[
        "encode",
        "--mode",
        "binary",
        "--id",
        "e1",
        "--source",
        "/people/p1",
        "--type",
        "AddressChanged",
        "--data-content-type",
        "text/plain",
        "--data",
        "hello",
        "--ext",
        "astring=aaa",
    ]);

    assert!(output.status.success());
    let doc = stdout_json(&output);
    assert!(doc["schema_id"]
        .as_str()
        .unwrap()
        .ends_with("binary-record.schema.json"));
    assert_eq!(doc["headers"]["ce_id"], "e1");
    assert_eq!(doc["headers"]["ce_specversion"], "1.0");
    assert_eq!(doc["headers"]["ce_astring"], "aaa");
    assert_eq!(doc["headers"]["content-type"], "text/plain");
    assert_eq!(doc["body"], "hello");
}

#[test]
fn decode_structured_file() {
    let dir = unique_temp_dir("decode");
    let path = dir.join("event.json");
    std::fs::write(
        &path,
        r#"{"specversion":"1.0","id":"e1","source":"/s","type":"t","data_base64":"aGk="}"#,
    )
    .unwrap();

    let output = ceprims(&["decode", path.to_str().unwrap()]);

    assert!(output.status.success());
    let doc = stdout_json(&output);
    assert_eq!(doc["id"], "e1");
    assert_eq!(doc["data_base64"], "aGk=");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn decode_binary_headers() {
    let output = ceprims(&[
        "decode",
        "--mode",
        "binary",
        "--header",
        "ce_id=e1",
        "--header",
        "ce_source=/s",
        "--header",
        "ce_specversion=1.0",
        "--header",
        "ce_type=t",
        "--header",
        "ce_anumber=10",
    ]);

    assert!(output.status.success());
    let doc = stdout_json(&output);
    assert_eq!(doc["type"], "t");
    assert_eq!(doc["anumber"], 10);
}

#[test]
fn decode_missing_type_returns_60() {
    let dir = unique_temp_dir("invalid");
    let path = dir.join("event.json");
    std::fs::write(&path, r#"{"specversion":"1.0","id":"e1","source":"/s"}"#).unwrap();

    let output = ceprims(&["decode", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("type"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn decode_missing_file_returns_1() {
    let output = ceprims(&["decode", "/nonexistent/ceprims/event.json"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn formats_lists_json() {
    let output = ceprims(&["formats"]);
    assert!(output.status.success());
    let doc = stdout_json(&output);
    let types = doc["content_types"].as_array().unwrap();
    assert!(types.iter().any(|t| t == "application/cloudevents+json"));
}

#[test]
fn version_prints_package_version() {
    let output = ceprims(&["version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        format!("ceprims {}", env!("CARGO_PKG_VERSION"))
    );
}
