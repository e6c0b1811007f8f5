use std::fs;
use std::path::Path;

use tracing::debug;

use crate::save::bytes::{Cursor, Writer};
use crate::save::compression::{DEFAULT_LEVEL, deflate, inflate};
use crate::save::objects::{ObjectReader, write_groups};
use crate::save::templates::{read_identifier, read_templates, write_templates};
use crate::save::{DecodeOptions, GameObjectGroup, ObjectValue, Result, SaveError, SaveHeader, SaveVersion, TemplateTable, ValueEncoder, decode_object};

/// Literal string opening every save body.
pub const WORLD_MARKER: &str = "world";

/// Fully decoded save file.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveGame {
	/// Header fields and game-info JSON.
	pub header: SaveHeader,
	/// Class templates in file order.
	pub templates: TemplateTable,
	/// Save root object; its template name is the world type name.
	pub world: ObjectValue,
	/// Game settings object.
	pub settings: ObjectValue,
	/// Opaque simulation payload.
	pub sim_data: Vec<u8>,
	/// Sentinel found before the body version.
	pub sentinel: [u8; 4],
	/// Body version pair.
	pub version: SaveVersion,
	/// Object groups in file order.
	pub groups: Vec<GameObjectGroup>,
	/// Opaque trailing game data.
	pub game_data: Vec<u8>,
}

/// Section reached by a decode in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
	/// Header and game info parsed.
	Header,
	/// Template table parsed.
	Templates,
	/// Body located and inflated if compressed.
	Body,
	/// World root object decoded.
	World,
	/// Settings object decoded.
	Settings,
	/// Simulation payload captured.
	SimData,
	/// One more object group decoded.
	Groups,
	/// Trailing game data captured.
	GameData,
}

/// Progress report passed to [`SaveGame::decode_with_progress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
	/// Section just finished.
	pub stage: Stage,
	/// Cursor offset after the section.
	pub offset: usize,
	/// Length of the buffer being read; the inflated body once past [`Stage::Templates`].
	pub total: usize,
}

/// Write-time settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
	/// zlib level for compressed bodies (0-9).
	pub compression_level: u32,
}

impl Default for EncodeOptions {
	fn default() -> Self {
		Self {
			compression_level: DEFAULT_LEVEL,
		}
	}
}

struct Body {
	world: ObjectValue,
	settings: ObjectValue,
	sim_data: Vec<u8>,
	sentinel: [u8; 4],
	version: SaveVersion,
	groups: Vec<GameObjectGroup>,
	game_data: Vec<u8>,
}

impl SaveGame {
	/// Read and decode a save from disk.
	pub fn open(path: impl AsRef<Path>, opt: &DecodeOptions) -> Result<Self> {
		let bytes = fs::read(path)?;
		Self::decode(&bytes, opt)
	}

	/// Decode a complete save file.
	pub fn decode(bytes: &[u8], opt: &DecodeOptions) -> Result<Self> {
		Self::decode_with_progress(bytes, opt, &mut |_| {})
	}

	/// Decode a complete save file, reporting each finished section.
	pub fn decode_with_progress(bytes: &[u8], opt: &DecodeOptions, progress: &mut dyn FnMut(Progress)) -> Result<Self> {
		let mut cursor = Cursor::new(bytes);
		let total = bytes.len();

		let header = SaveHeader::read(&mut cursor)?;
		debug!(build = header.build_version, header_version = header.header_version, compression = header.compression.as_str(), "read save header");
		progress(Progress {
			stage: Stage::Header,
			offset: cursor.pos(),
			total,
		});

		let templates = read_templates(&mut cursor)?;
		progress(Progress {
			stage: Stage::Templates,
			offset: cursor.pos(),
			total,
		});

		let body = if header.compression.is_compressed() {
			let at = cursor.pos();
			let inflated = inflate(cursor.read_rest(), at)?;
			debug!(offset = at, inflated = inflated.len(), "inflated save body");
			read_body(&mut Cursor::new(&inflated), &templates, opt, progress)?
		} else {
			read_body(&mut cursor, &templates, opt, progress)?
		};

		Ok(Self {
			header,
			templates,
			world: body.world,
			settings: body.settings,
			sim_data: body.sim_data,
			sentinel: body.sentinel,
			version: body.version,
			groups: body.groups,
			game_data: body.game_data,
		})
	}

	/// Encode with default options.
	pub fn encode(&self) -> Result<Vec<u8>> {
		self.encode_with(&EncodeOptions::default())
	}

	/// Encode the save, compressing the body when the header says so.
	pub fn encode_with(&self, opt: &EncodeOptions) -> Result<Vec<u8>> {
		let mut writer = Writer::new();
		self.header.write(&mut writer)?;
		write_templates(&mut writer, &self.templates)?;

		let body = self.encode_body()?;
		if self.header.compression.is_compressed() {
			let compressed = deflate(&body, opt.compression_level)?;
			debug!(body = body.len(), compressed = compressed.len(), level = opt.compression_level, "deflated save body");
			writer.write_bytes(&compressed);
		} else {
			writer.write_bytes(&body);
		}
		Ok(writer.into_bytes())
	}

	/// Encode and write the save to disk.
	pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
		let bytes = self.encode()?;
		fs::write(path, bytes)?;
		Ok(())
	}

	fn encode_body(&self) -> Result<Vec<u8>> {
		let mut writer = Writer::with_capacity(self.sim_data.len() + self.game_data.len());
		writer.write_string(Some(WORLD_MARKER), "world")?;

		for (root, object) in [("world", &self.world), ("settings", &self.settings)] {
			writer.write_string(Some(&*object.template), root)?;
			ValueEncoder::new(&self.templates, root).encode_object(&mut writer, &object.template, object)?;
		}

		writer.write_len(self.sim_data.len(), "sim_data")?;
		writer.write_bytes(&self.sim_data);
		writer.write_bytes(&self.sentinel);
		writer.write_i32(self.version.major);
		writer.write_i32(self.version.minor);
		write_groups(&mut writer, &self.templates, &self.groups)?;
		writer.write_bytes(&self.game_data);
		Ok(writer.into_bytes())
	}
}

fn read_body(cursor: &mut Cursor<'_>, templates: &TemplateTable, opt: &DecodeOptions, progress: &mut dyn FnMut(Progress)) -> Result<Body> {
	let total = cursor.len();
	let mut report = |stage, offset| progress(Progress { stage, offset, total });
	report(Stage::Body, cursor.pos());

	let marker = cursor.read_string()?;
	if marker.as_deref() != Some(WORLD_MARKER) {
		return Err(SaveError::UnexpectedMarker {
			expected: WORLD_MARKER,
			got: marker,
			at: cursor.pos(),
		});
	}

	let world_type = read_identifier(cursor)?;
	let world = decode_object(cursor, templates, &world_type, opt)?;
	report(Stage::World, cursor.pos());

	let settings_type = read_identifier(cursor)?;
	let settings = decode_object(cursor, templates, &settings_type, opt)?;
	report(Stage::Settings, cursor.pos());

	let sim_len = cursor.read_len("simulation data length")?;
	let sim_data = cursor.read_exact(sim_len)?.to_vec();
	report(Stage::SimData, cursor.pos());

	let at = cursor.pos();
	let sentinel = cursor.read_code4()?;
	if sentinel != opt.sentinel {
		return Err(SaveError::SentinelMismatch {
			expected: opt.sentinel,
			got: sentinel,
			at,
		});
	}

	let version = SaveVersion {
		major: cursor.read_i32()?,
		minor: cursor.read_i32()?,
	};
	opt.check_version(version)?;
	debug!(world = %world_type, settings = %settings_type, sim_bytes = sim_len, major = version.major, minor = version.minor, "read save body prelude");

	let groups = ObjectReader::new(templates, opt).read_groups(cursor, &mut |offset| report(Stage::Groups, offset))?;
	debug!(groups = groups.len(), offset = cursor.pos(), "read object groups");

	let game_data = cursor.read_rest().to_vec();
	report(Stage::GameData, cursor.pos());

	Ok(Body {
		world,
		settings,
		sim_data,
		sentinel,
		version,
		groups,
		game_data,
	})
}
