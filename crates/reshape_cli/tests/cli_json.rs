#![allow(missing_docs)]

use std::process::{Command, Output};

use reshape_testkit::fixture_path;
use serde_json::Value;

#[test]
fn assign_json_output_contains_value_and_issues() {
	let json = run_json(&[
		"assign",
		&fixture("person.schema.json"),
		&fixture("person.json"),
		"--json",
	]);

	assert_eq!(json["value"]["Name"]["First"], "Tom");
	assert_eq!(json["value"]["Address"], "Toronto");
	assert_eq!(json["value"]["Age"], 42);
	assert_eq!(json["value"]["CreatedBy"], "ops");
	let paths: Vec<&str> = json["issues"]
		.as_array()
		.expect("issues array")
		.iter()
		.filter_map(|issue| issue["path"].as_str())
		.collect();
	assert_eq!(paths, ["Score", "Labels.y"]);
}

#[test]
fn assign_get_selects_one_field() {
	let json = run_json(&[
		"assign",
		&fixture("person.schema.json"),
		&fixture("person.json"),
		"--get",
		"Name.Last",
	]);
	assert_eq!(json, "Jim");
}

#[test]
fn assign_exact_matcher_without_fallback_leaves_fields_empty() {
	let json = run_json(&[
		"assign",
		&fixture("person.schema.json"),
		&fixture("person.json"),
		"--matcher",
		"exact",
		"--no-fallback",
	]);
	assert_eq!(json["Address"], "");
	assert_eq!(json["Name"], Value::Null);
}

#[test]
fn assign_missing_path_fails() {
	let output = run(&[
		"assign",
		&fixture("person.schema.json"),
		&fixture("person.json"),
		"--get",
		"Nope",
	]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("error: no value at Nope"));
}

#[test]
fn coerce_converts_and_rejects() {
	assert_eq!(run_json(&["coerce", "YES", "--to", "bool"]), true);
	assert_eq!(run_json(&["coerce", "[1, \"2\", 3.0]", "--to", "[]i64", "--json"]), serde_json::json!([1, 2, 3]));
	assert_eq!(run_json(&["coerce", "0x1F", "--to", "u8"]), 31);

	let output = run(&["coerce", "300", "--to", "u8", "--json"]);
	assert!(!output.status.success(), "300 does not fit u8");
}

#[test]
fn names_json_lists_case_forms() {
	let json = run_json(&["names", "hello_world_id", "DBUrl", "--json"]);
	assert_eq!(json[0]["camel"], "helloWorldID");
	assert_eq!(json[0]["class"], "HelloWorldID");
	assert_eq!(json[1]["snake"], "db_url");
	assert_eq!(json[1]["words"], serde_json::json!(["DB", "Url"]));
}

fn fixture(name: &str) -> String {
	fixture_path(name).display().to_string()
}

fn run(args: &[&str]) -> Output {
	Command::new(env!("CARGO_BIN_EXE_reshape")).args(args).output().expect("command executes")
}

fn run_json(args: &[&str]) -> Value {
	let output = run(args);
	assert!(
		output.status.success(),
		"reshape failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}
