use std::io::Write;
use std::process::Command;

use serde_json::Value;

fn temp_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn run(args: &[&str]) -> (bool, Value) {
    run_with_env(args, &[])
}

fn run_with_env(args: &[&str], envs: &[(&str, &str)]) -> (bool, Value) {
    let output = Command::new(env!("CARGO_BIN_EXE_flatknn"))
        .args(args)
        .env("RUST_LOG", "off")
        .env_remove("FLATKNN_CONFIG")
        .env_remove("FLATKNN_DEFAULT_RADIUS")
        .envs(envs.iter().copied())
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    let value = serde_json::from_str(&stdout).unwrap_or(Value::Null);
    (output.status.success(), value)
}

const CLOUD: &str =
    r#"{"type":"point_cloud","points":[[0.0,0.0,0.0],[1.0,0.0,0.0],[5.0,5.0,5.0]]}"#;

#[test]
fn test_cli_knn() {
    let file = temp_file(CLOUD);
    let path = file.path().to_str().unwrap();
    let (ok, out) = run(&[path, "--query", "0,0,0", "--knn", "2"]);

    assert!(ok);
    assert_eq!(out["mode"], "knn");
    let neighbors = out["neighbors"].as_array().unwrap();
    assert_eq!(neighbors.len(), 2);
    assert_eq!(neighbors[0]["index"], 0);
    assert_eq!(neighbors[1]["index"], 1);
    assert_eq!(neighbors[1]["distance2"], 1.0);
}

#[test]
fn test_cli_radius() {
    let file = temp_file(CLOUD);
    let path = file.path().to_str().unwrap();
    let (ok, out) = run(&[path, "--query", "5,5,4", "--radius", "1.5"]);

    assert!(ok);
    assert_eq!(out["mode"], "radius");
    let neighbors = out["neighbors"].as_array().unwrap();
    assert_eq!(neighbors.len(), 1);
    assert_eq!(neighbors[0]["index"], 2);
}

#[test]
fn test_cli_radius_falls_back_to_config_default() {
    let file = temp_file(CLOUD);
    let path = file.path().to_str().unwrap();

    // Built-in default radius of 1.0 reaches nothing from (5,5,3.5).
    let (ok, out) = run(&[path, "--query", "5,5,3.5", "--radius"]);
    assert!(ok);
    assert_eq!(out["mode"], "radius");
    assert!(out["neighbors"].as_array().unwrap().is_empty());

    let (ok, out) = run_with_env(
        &[path, "--query", "5,5,3.5", "--radius"],
        &[("FLATKNN_DEFAULT_RADIUS", "2.0")],
    );
    assert!(ok);
    let neighbors = out["neighbors"].as_array().unwrap();
    assert_eq!(neighbors.len(), 1);
    assert_eq!(neighbors[0]["index"], 2);
}

#[test]
fn test_cli_radius_from_config_file() {
    let file = temp_file(CLOUD);
    let path = file.path().to_str().unwrap();
    let config = temp_file("[search]\ndefault_radius = 1.5\n");
    let config_path = config.path().to_str().unwrap();

    let (ok, out) = run(&[path, "--config", config_path, "--query", "0,0,0", "--radius"]);
    assert!(ok);
    let neighbors = out["neighbors"].as_array().unwrap();
    assert_eq!(neighbors.len(), 2);
}

#[test]
fn test_cli_rejects_image() {
    let file = temp_file(r#"{"type":"image","width":1,"height":1,"num_channels":1,"data":[0]}"#);
    let path = file.path().to_str().unwrap();
    let (ok, _) = run(&[path, "--query", "0,0,0"]);
    assert!(!ok);
}

#[test]
fn test_cli_dimension_mismatch() {
    let file = temp_file(CLOUD);
    let path = file.path().to_str().unwrap();
    let (ok, _) = run(&[path, "--query", "0,0"]);
    assert!(!ok);
}
