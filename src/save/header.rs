use serde_json::{Map, Value as Json};

use crate::save::bytes::{Cursor, Writer};
use crate::save::{Compression, Result, SaveError};

/// Fixed save header plus its JSON game-info block.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveHeader {
	/// Game build that wrote the file.
	pub build_version: u32,
	/// Header layout version; `>= 1` carries a compression flag.
	pub header_version: u32,
	/// Body compression mode.
	pub compression: Compression,
	/// Free-form colony metadata.
	pub game_info: GameInfo,
}

impl SaveHeader {
	/// Parse the header at the cursor.
	pub fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
		let build_version = cursor.read_u32()?;
		let info_len = cursor.read_u32()? as usize;
		let header_version = cursor.read_u32()?;
		let compressed = header_version >= 1 && cursor.read_u32()? != 0;

		let at = cursor.pos();
		let raw = cursor.read_exact(info_len)?;
		let game_info = GameInfo::parse(raw, at)?;

		Ok(Self {
			build_version,
			header_version,
			compression: Compression::from_flag(compressed),
			game_info,
		})
	}

	/// Write the header; mirror of [`SaveHeader::read`].
	pub fn write(&self, writer: &mut Writer) -> Result<()> {
		let json = self.game_info.to_json_bytes()?;
		let info_len = u32::try_from(json.len()).map_err(|_| SaveError::LengthOverflow {
			path: "header.game_info".to_owned(),
			len: json.len(),
		})?;

		writer.write_u32(self.build_version);
		writer.write_u32(info_len);
		writer.write_u32(self.header_version);
		if self.header_version >= 1 {
			writer.write_u32(u32::from(self.compression.is_compressed()));
		}
		writer.write_bytes(&json);
		Ok(())
	}
}

/// Header JSON kept as an order-preserving map so unknown keys survive.
///
/// The source bytes are re-emitted verbatim until the map is mutated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GameInfo {
	values: Map<String, Json>,
	source: Option<Vec<u8>>,
}

impl GameInfo {
	/// Parse a JSON object block.
	pub fn parse(raw: &[u8], at: usize) -> Result<Self> {
		let values = serde_json::from_slice(raw).map_err(|source| SaveError::GameInfoJson { at, source })?;
		Ok(Self {
			values,
			source: Some(raw.to_vec()),
		})
	}

	/// Build from a map; serialized compactly on write.
	pub fn from_map(values: Map<String, Json>) -> Self {
		Self { values, source: None }
	}

	/// Borrow all keys and values.
	pub fn values(&self) -> &Map<String, Json> {
		&self.values
	}

	/// Mutably borrow the map; the next write re-serializes it.
	pub fn values_mut(&mut self) -> &mut Map<String, Json> {
		self.source = None;
		&mut self.values
	}

	/// Raw value for `key`.
	pub fn get(&self, key: &str) -> Option<&Json> {
		self.values.get(key)
	}

	/// Bytes written for this block.
	pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
		if let Some(source) = &self.source {
			return Ok(source.clone());
		}
		serde_json::to_vec(&self.values).map_err(|source| SaveError::GameInfoJson { at: 0, source })
	}

	fn int(&self, key: &str) -> Option<i64> {
		self.get(key).and_then(Json::as_i64)
	}

	fn text(&self, key: &str) -> Option<&str> {
		self.get(key).and_then(Json::as_str)
	}

	fn flag(&self, key: &str) -> Option<bool> {
		self.get(key).and_then(Json::as_bool)
	}

	/// `numberOfCycles`.
	pub fn number_of_cycles(&self) -> Option<i64> {
		self.int("numberOfCycles")
	}

	/// `numberOfDuplicants`.
	pub fn number_of_duplicants(&self) -> Option<i64> {
		self.int("numberOfDuplicants")
	}

	/// `baseName`.
	pub fn base_name(&self) -> Option<&str> {
		self.text("baseName")
	}

	/// `isAutoSave`.
	pub fn is_auto_save(&self) -> Option<bool> {
		self.flag("isAutoSave")
	}

	/// `originalSaveName`.
	pub fn original_save_name(&self) -> Option<&str> {
		self.text("originalSaveName")
	}

	/// `saveMajorVersion`.
	pub fn save_major_version(&self) -> Option<i64> {
		self.int("saveMajorVersion")
	}

	/// `saveMinorVersion`.
	pub fn save_minor_version(&self) -> Option<i64> {
		self.int("saveMinorVersion")
	}

	/// `clusterId`.
	pub fn cluster_id(&self) -> Option<&str> {
		self.text("clusterId")
	}

	/// `sandboxEnabled`.
	pub fn sandbox_enabled(&self) -> Option<bool> {
		self.flag("sandboxEnabled")
	}

	/// `colonyGuid`.
	pub fn colony_guid(&self) -> Option<&str> {
		self.text("colonyGuid")
	}

	/// `dlcId`.
	pub fn dlc_id(&self) -> Option<&str> {
		self.text("dlcId")
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::{GameInfo, SaveHeader};
	use crate::save::bytes::{Cursor, Writer};
	use crate::save::{Compression, SaveError};

	const INFO: &[u8] = br#"{"numberOfCycles":12,"baseName":"Rocky Hollow","saveMajorVersion":7,"saveMinorVersion":35,"dlcId":"EXPANSION1_ID","zFutureKey":[1,2]}"#;

	fn header_bytes(header_version: u32, compressed: u32) -> Vec<u8> {
		let mut bytes = Vec::new();
		bytes.extend_from_slice(&555_u32.to_le_bytes());
		bytes.extend_from_slice(&(INFO.len() as u32).to_le_bytes());
		bytes.extend_from_slice(&header_version.to_le_bytes());
		if header_version >= 1 {
			bytes.extend_from_slice(&compressed.to_le_bytes());
		}
		bytes.extend_from_slice(INFO);
		bytes
	}

	#[test]
	fn parses_header_and_known_keys() {
		let bytes = header_bytes(1, 1);
		let mut cursor = Cursor::new(&bytes);
		let header = SaveHeader::read(&mut cursor).expect("header parses");
		assert_eq!(cursor.remaining(), 0);
		assert_eq!(header.build_version, 555);
		assert_eq!(header.compression, Compression::Zlib);
		assert_eq!(header.game_info.number_of_cycles(), Some(12));
		assert_eq!(header.game_info.base_name(), Some("Rocky Hollow"));
		assert_eq!(header.game_info.dlc_id(), Some("EXPANSION1_ID"));
		assert_eq!(header.game_info.colony_guid(), None);
		assert_eq!(header.game_info.get("zFutureKey"), Some(&json!([1, 2])));
	}

	#[test]
	fn version_zero_header_has_no_compression_flag() {
		let bytes = header_bytes(0, 0);
		let header = SaveHeader::read(&mut Cursor::new(&bytes)).expect("header parses");
		assert_eq!(header.compression, Compression::None);

		let mut writer = Writer::new();
		header.write(&mut writer).expect("header writes");
		assert_eq!(writer.as_bytes(), &bytes[..]);
	}

	#[test]
	fn unmodified_json_is_written_verbatim() {
		let spaced = br#"{ "baseName" : "A",  "numberOfCycles": 1 }"#;
		let info = GameInfo::parse(spaced, 0).expect("json parses");
		assert_eq!(info.to_json_bytes().expect("json writes"), spaced.to_vec());
	}

	#[test]
	fn mutation_reserializes_in_original_key_order() {
		let mut info = GameInfo::parse(INFO, 0).expect("json parses");
		info.values_mut().insert("baseName".to_owned(), json!("Renamed"));
		let out = String::from_utf8(info.to_json_bytes().expect("json writes")).expect("utf-8");
		assert!(out.starts_with(r#"{"numberOfCycles":12,"baseName":"Renamed","#), "{out}");
		assert!(out.ends_with(r#""zFutureKey":[1,2]}"#), "{out}");
	}

	#[test]
	fn invalid_json_is_reported_with_offset() {
		let err = GameInfo::parse(b"{nope", 16).expect_err("bad json");
		assert!(matches!(err, SaveError::GameInfoJson { at: 16, .. }));
	}
}
