// CLI integration tests: one flow per subcommand.
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::{json, Value};

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_structkit");
    Command::new(exe)
}

fn run(args: &[&str]) -> Output {
    cmd().args(args).output().expect("spawn structkit")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).expect("utf8")
}

fn write_json(dir: &Path, name: &str, value: &Value) -> String {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn prefix_and_postfix() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = write_json(temp.path(), "in.json", &json!({"a": 1, "b": 2, "c": {"a": 11, "b": 22}}));

    let out = stdout(&run(&["prefix", "--affix", "_", "-i", &input]));
    let value: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value, json!({"_a": 1, "_b": 2, "_c": {"_a": 11, "_b": 22}}));
    // key order survives
    assert!(out.find("\"_a\"").unwrap() < out.find("\"_c\"").unwrap());

    let out = stdout(&run(&["postfix", "--affix", "_", "--shallow", "-i", &input]));
    let value: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value, json!({"a_": 1, "b_": 2, "c_": {"a": 11, "b": 22}}));
}

#[test]
fn export_both_styles() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = write_json(temp.path(), "in.json", &json!({"a": 1, "b": {"c": 3}}));

    let out = stdout(&run(&["export", "-i", &input]));
    assert_eq!(out, "array (\n  'a' => 1,\n  'b' => array (\n    'c' => 3,\n  ),\n)\n");

    let out = stdout(&run(&["export", "--bracketed", "-i", &input]));
    assert_eq!(out, "[\n  'a' => 1,\n  'b' => [\n    'c' => 3,\n  ],\n]\n");
}

#[test]
fn xml_with_pointer_and_output_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = write_json(
        temp.path(),
        "in.json",
        &json!({"rows": [{"a": 1, "b": 1, "c": 1}, {"a": 2, "b": 2, "c": 2}]}),
    );
    let target = temp.path().join("out/data.xml");

    let output = run(&["xml", "--json-pointer", "/rows", "-i", &input, "-o", target.to_str().unwrap()]);
    stdout(&output);
    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        "<?xml version=\"1.0\"?>\n<data value=\"\"><item0><a>1</a><b>1</b><c>1</c></item0><item1><a>2</a><b>2</b><c>2</c></item1></data>\n"
    );
}

#[test]
fn xml_rejects_nested_records() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = write_json(temp.path(), "in.json", &json!([{"a": {"b": 1}}]));
    let output = run(&["xml", "-i", &input]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not a scalar"));
}

#[test]
fn dedupe_ndjson_with_jq() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("in.ndjson");
    fs::write(
        &path,
        "{\"rows\": [{\"a\": 1, \"b\": 2}, {\"a\": 3, \"b\": 4}, {\"a\": 1, \"b\": 2}]}\n\n",
    )
    .unwrap();

    let out = stdout(&run(&["dedupe", "--ndjson", "--jq-expr", ".rows", "-i", path.to_str().unwrap()]));
    let value: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value, json!([{"a": 1, "b": 2}, {"a": 3, "b": 4}]));
}

#[test]
fn csv_in_and_out() {
    let temp = tempfile::tempdir().expect("tempdir");
    let csv_path = temp.path().join("people.csv");
    fs::write(&csv_path, "First name,Last name\nJohn,Doe\n\"Richard\", \"Roe\"\n42,1.5\n").unwrap();

    let out = stdout(&run(&["csv", "--header", "-i", csv_path.to_str().unwrap()]));
    let value: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value, json!([["John", "Doe"], ["Richard", "Roe"], [42, 1.5]]));

    let rows_path = write_json(temp.path(), "rows.json", &value);
    let target = temp.path().join("_output/tmp.csv");
    stdout(&run(&["write-csv", "-i", &rows_path, "--to", target.to_str().unwrap()]));
    assert_eq!(fs::read_to_string(&target).unwrap(), "John,Doe\nRichard,Roe\n42,1.5\n");
}

#[test]
fn missing_input_is_an_error() {
    let output = run(&["export", "-i", "/no/such/input.json"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read source file"));
}
