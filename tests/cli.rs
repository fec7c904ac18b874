use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn infer_from_json(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_infer-from-json"))
        .args(args)
        .output()
        .unwrap()
}

fn infer_from_frontmatter(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_infer-from-frontmatter"))
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_unsupported_format_exits_with_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.csv");
    fs::write(&path, "a,b\n1,2\n").unwrap();

    let output = infer_from_json(&["-f", "csv", path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unsupported input format `csv`"), "stderr: {}", stderr);
}

#[test]
fn test_json_schema_on_stdout() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pets.json");
    fs::write(&path, r#"{"pets": [{"name": "Rex"}, {"name": "Tom"}]}"#).unwrap();

    let output = infer_from_json(&[path.to_str().unwrap(), "--container-class-name", "Shelter"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let schema: serde_yaml::Value = serde_yaml::from_slice(&output.stdout).unwrap();
    assert_eq!(schema["name"].as_str(), Some("Shelter"));
    assert_eq!(schema["classes"]["Shelter"]["tree_root"].as_bool(), Some(true));
    assert_eq!(
        schema["classes"]["Shelter"]["attributes"]["pets"]["range"].as_str(),
        Some("Pets")
    );
}

#[test]
fn test_output_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("data.yaml");
    let output_path = dir.path().join("schema.yaml");
    fs::write(&input, "name: Alice\nage: 30\n").unwrap();

    let output = infer_from_json(&[
        "-f",
        "yaml",
        input.to_str().unwrap(),
        "-o",
        output_path.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty());

    let schema: serde_yaml::Value = serde_yaml::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(
        schema["classes"]["Container"]["attributes"]["age"]["range"].as_str(),
        Some("integer")
    );
}

#[test]
fn test_missing_input_exits_with_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.json");

    let output = infer_from_json(&[path.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to infer schema from"), "stderr: {}", stderr);
}

#[test]
fn test_frontmatter_documents() {
    let dir = TempDir::new().unwrap();
    let note = dir.path().join("note.md");
    fs::write(&note, "---\ntitle: First\n---\nbody\n").unwrap();

    let output = infer_from_frontmatter(&[note.to_str().unwrap(), "--container-class-name", "Notebook"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let schema: serde_yaml::Value = serde_yaml::from_slice(&output.stdout).unwrap();
    assert_eq!(
        schema["classes"]["Notebook"]["attributes"]["objects"]["range"].as_str(),
        Some("Objects")
    );
}

#[test]
fn test_malformed_frontmatter_exits_with_error() {
    let dir = TempDir::new().unwrap();
    let note = dir.path().join("bad.md");
    fs::write(&note, "---\na: 1\n---\ntext\n---\n").unwrap();

    let output = infer_from_frontmatter(&[note.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("malformed document"), "stderr: {}", stderr);
}
