#![allow(missing_docs)]

use onisave::save::{DecodeOptions, SaveGame, SaveVersion, Value};
use onisave_testkit::{GroupDef, ObjectDef, SaveFixture, TYPE_INT32, TemplateDef};

fn minimal_foo() -> SaveFixture {
	let mut fixture = SaveFixture {
		header_version: 1,
		compressed: false,
		sentinel: *b"ABCD",
		major: 1,
		minor: 0,
		..SaveFixture::default()
	};
	fixture.templates.push(TemplateDef::with_fields("Foo", &[("x", TYPE_INT32)]));
	fixture.groups = vec![GroupDef {
		prefab: "Foo".to_owned(),
		objects: vec![ObjectDef {
			behaviors: vec![("Foo".to_owned(), 42_i32.to_le_bytes().to_vec())],
		}],
	}];
	fixture
}

fn options() -> DecodeOptions {
	DecodeOptions {
		sentinel: *b"ABCD",
		..DecodeOptions::for_version(1, 0)
	}
}

#[test]
fn minimal_save_yields_single_foo_object() {
	let bytes = minimal_foo().build();
	let save = SaveGame::decode(&bytes, &options()).expect("minimal save decodes");

	assert_eq!(save.version, SaveVersion { major: 1, minor: 0 });
	assert_eq!(save.sentinel, *b"ABCD");
	assert_eq!(save.prefab_names(), ["Foo"]);
	assert_eq!(save.groups.len(), 1);

	let group = &save.groups[0];
	assert_eq!(group.prefab_name, "Foo");
	assert_eq!(group.objects.len(), 1);

	let foo = group.objects[0].behavior("Foo").and_then(|item| item.data.as_ref()).expect("foo data");
	assert_eq!(foo.get("x"), Some(&Value::I32(42)));

	assert_eq!(save.encode().expect("save encodes"), bytes);
}

#[test]
fn minimal_save_round_trips_compressed() {
	let mut fixture = minimal_foo();
	fixture.compressed = true;
	let save = SaveGame::decode(&fixture.build(), &options()).expect("compressed save decodes");

	let encoded = save.encode().expect("save encodes");
	let again = SaveGame::decode(&encoded, &options()).expect("re-encoded save decodes");
	assert_eq!(again, save);
	assert_eq!(again.objects_by_prefab("Foo").count(), 1);
}

#[test]
fn open_and_write_to_use_the_filesystem() {
	let path = onisave_testkit::temp_path("scenario-foo.sav");
	std::fs::write(&path, minimal_foo().build()).expect("fixture written");

	let save = SaveGame::open(&path, &options()).expect("save opens");
	let out = onisave_testkit::temp_path("scenario-foo-out.sav");
	save.write_to(&out).expect("save writes");

	assert_eq!(std::fs::read(&out).expect("output readable"), minimal_foo().build());
}
