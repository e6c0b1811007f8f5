#![allow(missing_docs)]

use std::path::PathBuf;
use std::process::{Command, Output};

use onisave_testkit::{GroupDef, ObjectDef, SaveFixture, TYPE_INT32, TemplateDef, temp_path};
use serde_json::Value;

fn fixture_file(name: &str, fixture: &SaveFixture) -> PathBuf {
	let path = temp_path(name);
	std::fs::write(&path, fixture.build()).expect("fixture written");
	path
}

fn colony() -> SaveFixture {
	let mut fixture = SaveFixture {
		compressed: true,
		..SaveFixture::default()
	};
	fixture.templates.push(TemplateDef::with_fields("Foo", &[("x", TYPE_INT32)]));
	let foo = ObjectDef {
		behaviors: vec![("Foo".to_owned(), 42_i32.to_le_bytes().to_vec())],
	};
	fixture.groups = vec![
		GroupDef {
			prefab: "Foo".to_owned(),
			objects: vec![foo.clone(), foo],
		},
		GroupDef {
			prefab: "Bar".to_owned(),
			objects: vec![ObjectDef::default()],
		},
	];
	fixture
}

fn run(args: &[&str]) -> Output {
	Command::new(env!("CARGO_BIN_EXE_onisave")).args(args).output().expect("command executes")
}

fn run_json(args: &[&str]) -> Value {
	let output = run(args);
	assert!(output.status.success(), "command failed: {}", String::from_utf8_lossy(&output.stderr));
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

#[test]
fn info_json_reports_colony_summary() {
	let path = fixture_file("cli-info.sav", &colony());
	let json = run_json(&["info", path.to_str().expect("utf-8 path"), "--json"]);

	assert_eq!(json["compression"], "zlib");
	assert_eq!(json["sentinel"], "KSAV");
	assert_eq!(json["colony"]["base_name"], "Fixture");
	assert_eq!(json["colony"]["version"]["major"], 7);
	assert_eq!(json["colony"]["object_count"], 3);
	assert_eq!(json["game_info"]["numberOfCycles"], 3);
}

#[test]
fn groups_and_dump_json_list_objects() {
	let path = fixture_file("cli-groups.sav", &colony());
	let path = path.to_str().expect("utf-8 path");

	let groups = run_json(&["groups", path, "--json"]);
	assert_eq!(groups["object_count"], 3);
	assert_eq!(groups["groups"][0]["prefab"], "Foo");
	assert_eq!(groups["groups"][0]["objects"], 2);

	let dump = run_json(&["dump", path, "--prefab", "Foo", "--limit", "1", "--json"]);
	assert_eq!(dump["total"], 2);
	let objects = dump["objects"].as_array().expect("objects array");
	assert_eq!(objects.len(), 1);
	assert_eq!(objects[0]["behaviors"][0]["name"], "Foo");
}

#[test]
fn templates_json_lists_members() {
	let path = fixture_file("cli-templates.sav", &colony());
	let json = run_json(&["templates", path.to_str().expect("utf-8 path"), "--name", "Foo", "--json"]);

	assert_eq!(json[0]["name"], "Foo");
	assert_eq!(json[0]["fields"][0]["name"], "x");
	assert_eq!(json[0]["fields"][0]["type"]["code"], "Int32");
}

#[test]
fn roundtrip_reports_identical() {
	let path = fixture_file("cli-roundtrip.sav", &colony());
	let json = run_json(&["roundtrip", path.to_str().expect("utf-8 path"), "--json"]);
	assert_eq!(json["identical"], true);
	assert_eq!(json["compressed"], true);
}

#[test]
fn version_flags_control_acceptance() {
	let fixture = SaveFixture {
		minor: 40,
		..SaveFixture::default()
	};
	let path = fixture_file("cli-minor.sav", &fixture);
	let path = path.to_str().expect("utf-8 path");

	let strict = run(&["info", path]);
	assert!(!strict.status.success());
	assert!(String::from_utf8_lossy(&strict.stderr).contains("incompatible"));

	let lenient = run_json(&["info", path, "--lenient", "--json"]);
	assert_eq!(lenient["colony"]["version"]["minor"], 40);
}
