//! Shared test helpers: a raw-byte save builder independent of the library writer.

use std::io::Write;
use std::path::PathBuf;

use flate2::Compression;
use flate2::write::ZlibEncoder;

/// `Int32` type descriptor byte.
pub const TYPE_INT32: u8 = 6;
/// `Single` type descriptor byte.
pub const TYPE_SINGLE: u8 = 10;
/// `String` type descriptor byte.
pub const TYPE_STRING: u8 = 12;

/// Little-endian byte buffer with chainable writes.
#[derive(Debug, Default, Clone)]
pub struct Bytes(
	/// Accumulated bytes.
	pub Vec<u8>,
);

impl Bytes {
	/// Empty buffer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a `u8`.
	pub fn u8(mut self, value: u8) -> Self {
		self.0.push(value);
		self
	}

	/// Append an `i32`.
	pub fn i32(mut self, value: i32) -> Self {
		self.0.extend_from_slice(&value.to_le_bytes());
		self
	}

	/// Append a `u32`.
	pub fn u32(mut self, value: u32) -> Self {
		self.0.extend_from_slice(&value.to_le_bytes());
		self
	}

	/// Append an `f32`.
	pub fn f32(mut self, value: f32) -> Self {
		self.0.extend_from_slice(&value.to_le_bytes());
		self
	}

	/// Append a length-prefixed string.
	pub fn string(self, value: &str) -> Self {
		self.i32(value.len() as i32).raw(value.as_bytes())
	}

	/// Append raw bytes.
	pub fn raw(mut self, bytes: &[u8]) -> Self {
		self.0.extend_from_slice(bytes);
		self
	}

	/// Append an `i32` byte length followed by `bytes`.
	pub fn sized(self, bytes: &[u8]) -> Self {
		self.i32(bytes.len() as i32).raw(bytes)
	}

	/// Finish the buffer.
	pub fn build(self) -> Vec<u8> {
		self.0
	}
}

/// Class template as written in the template table.
#[derive(Debug, Clone)]
pub struct TemplateDef {
	/// Template name.
	pub name: String,
	/// Field names with raw type descriptor bytes.
	pub fields: Vec<(String, Vec<u8>)>,
	/// Property names with raw type descriptor bytes.
	pub properties: Vec<(String, Vec<u8>)>,
}

impl TemplateDef {
	/// Template with primitive fields only.
	pub fn with_fields(name: &str, fields: &[(&str, u8)]) -> Self {
		Self {
			name: name.to_owned(),
			fields: fields.iter().map(|(field, code)| ((*field).to_owned(), vec![*code])).collect(),
			properties: Vec::new(),
		}
	}
}

/// One game object: default transform plus raw behaviors.
#[derive(Debug, Clone, Default)]
pub struct ObjectDef {
	/// Behavior names with their raw data bytes.
	pub behaviors: Vec<(String, Vec<u8>)>,
}

/// One prefab group.
#[derive(Debug, Clone)]
pub struct GroupDef {
	/// Prefab name.
	pub prefab: String,
	/// Instances.
	pub objects: Vec<ObjectDef>,
}

/// Synthetic save file description.
#[derive(Debug, Clone)]
pub struct SaveFixture {
	/// Header build version.
	pub build_version: u32,
	/// Header layout version.
	pub header_version: u32,
	/// Whether the body is zlib-compressed.
	pub compressed: bool,
	/// Header JSON text.
	pub game_info: String,
	/// Template table.
	pub templates: Vec<TemplateDef>,
	/// World type name; its template must exist.
	pub world_type: String,
	/// Raw world member bytes.
	pub world_data: Vec<u8>,
	/// Settings type name; its template must exist.
	pub settings_type: String,
	/// Raw settings member bytes.
	pub settings_data: Vec<u8>,
	/// Opaque simulation bytes.
	pub sim_data: Vec<u8>,
	/// Body sentinel.
	pub sentinel: [u8; 4],
	/// Body major version.
	pub major: i32,
	/// Body minor version.
	pub minor: i32,
	/// Object groups.
	pub groups: Vec<GroupDef>,
	/// Trailing opaque bytes.
	pub game_data: Vec<u8>,
}

impl Default for SaveFixture {
	fn default() -> Self {
		Self {
			build_version: 555_555,
			header_version: 1,
			compressed: false,
			game_info: r#"{"numberOfCycles":3,"numberOfDuplicants":3,"baseName":"Fixture","saveMajorVersion":7,"saveMinorVersion":35}"#.to_owned(),
			templates: vec![
				TemplateDef::with_fields("Klei.SaveFileRoot", &[("WidthInCells", TYPE_INT32)]),
				TemplateDef::with_fields("Game+Settings", &[]),
			],
			world_type: "Klei.SaveFileRoot".to_owned(),
			world_data: 256_i32.to_le_bytes().to_vec(),
			settings_type: "Game+Settings".to_owned(),
			settings_data: Vec::new(),
			sim_data: vec![0x5A; 16],
			sentinel: *b"KSAV",
			major: 7,
			minor: 35,
			groups: Vec::new(),
			game_data: b"trailing game data".to_vec(),
		}
	}
}

impl SaveFixture {
	/// Bytes of the header and template table.
	pub fn head_bytes(&self) -> Vec<u8> {
		let mut out = Bytes::new().u32(self.build_version).u32(self.game_info.len() as u32).u32(self.header_version);
		if self.header_version >= 1 {
			out = out.u32(u32::from(self.compressed));
		}
		out = out.raw(self.game_info.as_bytes()).i32(self.templates.len() as i32);
		for template in &self.templates {
			out = out.string(&template.name).i32(template.fields.len() as i32).i32(template.properties.len() as i32);
			for (name, ty) in template.fields.iter().chain(&template.properties) {
				out = out.string(name).raw(ty);
			}
		}
		out.build()
	}

	/// Uncompressed body bytes.
	pub fn body_bytes(&self) -> Vec<u8> {
		let mut out = Bytes::new()
			.string("world")
			.string(&self.world_type)
			.raw(&self.world_data)
			.string(&self.settings_type)
			.raw(&self.settings_data)
			.sized(&self.sim_data)
			.raw(&self.sentinel)
			.i32(self.major)
			.i32(self.minor)
			.i32(self.groups.len() as i32);

		for group in &self.groups {
			let mut objects = Bytes::new();
			for object in &group.objects {
				objects = objects
					.f32(1.0)
					.f32(2.0)
					.f32(0.0)
					.f32(0.0)
					.f32(0.0)
					.f32(0.0)
					.f32(1.0)
					.f32(1.0)
					.f32(1.0)
					.f32(1.0)
					.u8(0)
					.i32(object.behaviors.len() as i32);
				for (name, data) in &object.behaviors {
					objects = objects.string(name).sized(data);
				}
			}
			out = out.string(&group.prefab).i32(group.objects.len() as i32).sized(&objects.build());
		}

		out.raw(&self.game_data).build()
	}

	/// Complete file bytes, compressing the body when requested.
	pub fn build(&self) -> Vec<u8> {
		let mut out = self.head_bytes();
		let body = self.body_bytes();
		if self.compressed {
			out.extend_from_slice(&zlib(&body));
		} else {
			out.extend_from_slice(&body);
		}
		out
	}
}

/// Compress bytes into one zlib stream at the best level.
pub fn zlib(bytes: &[u8]) -> Vec<u8> {
	let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
	encoder.write_all(bytes).unwrap_or_else(|err| panic!("zlib write failed: {err}"));
	encoder.finish().unwrap_or_else(|err| panic!("zlib finish failed: {err}"))
}

/// Per-process scratch path under the system temp directory.
pub fn temp_path(name: &str) -> PathBuf {
	let dir = std::env::temp_dir().join(format!("onisave-tests-{}", std::process::id()));
	std::fs::create_dir_all(&dir).unwrap_or_else(|err| panic!("create {}: {err}", dir.display()));
	dir.join(name)
}
