use serde::Serialize;
use tracing::{trace, warn};

use crate::save::bytes::{Cursor, Writer};
use crate::save::templates::read_identifier;
use crate::save::{DecodeOptions, ObjectValue, Result, SaveError, TemplateTable, ValueEncoder, decode_object};

/// Behavior whose extra data is a list of stored game objects.
pub const STORAGE_BEHAVIOR: &str = "Storage";

/// Position or scale.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vector3 {
	/// X component.
	pub x: f32,
	/// Y component.
	pub y: f32,
	/// Z component.
	pub z: f32,
}

/// Rotation quaternion.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Quaternion {
	/// X component.
	pub x: f32,
	/// Y component.
	pub y: f32,
	/// Z component.
	pub z: f32,
	/// W component.
	pub w: f32,
}

/// All instances of one prefab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameObjectGroup {
	/// Prefab name such as `Minion` or `Tile`.
	pub prefab_name: String,
	/// Instances in file order.
	pub objects: Vec<GameObject>,
}

/// One placed entity: transform plus behaviors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameObject {
	/// World position.
	pub position: Vector3,
	/// Rotation.
	pub rotation: Quaternion,
	/// Scale.
	pub scale: Vector3,
	/// Prefab folder index.
	pub folder: u8,
	/// Attached behaviors in file order.
	pub behaviors: Vec<Behavior>,
}

/// Serialized component of a game object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Behavior {
	/// Component class name; also the template name.
	pub name: String,
	/// Template-decoded members, or `None` when no template exists.
	pub data: Option<ObjectValue>,
	/// Behavior-specific data following the template members.
	pub extra: BehaviorExtra,
	/// Remaining undecoded bytes, written back verbatim.
	pub extra_raw: Vec<u8>,
}

/// Structured data some behaviors append after their template members.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub enum BehaviorExtra {
	/// Nothing beyond `extra_raw`.
	#[default]
	None,
	/// Items held by a `Storage` behavior.
	Storage(Vec<StoredItem>),
}

/// Game object held inside a storage behavior.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredItem {
	/// Prefab name of the stored object.
	pub prefab_name: String,
	/// Stored object.
	pub object: GameObject,
}

impl GameObject {
	/// Look up a behavior by class name.
	pub fn behavior(&self, name: &str) -> Option<&Behavior> {
		self.behaviors.iter().find(|item| item.name == name)
	}

	/// Look up a behavior by class name for mutation.
	pub fn behavior_mut(&mut self, name: &str) -> Option<&mut Behavior> {
		self.behaviors.iter_mut().find(|item| item.name == name)
	}
}

/// Reads the object-group section using the file's templates.
pub struct ObjectReader<'t> {
	templates: &'t TemplateTable,
	opt: &'t DecodeOptions,
}

impl<'t> ObjectReader<'t> {
	/// Create a reader over `templates`.
	pub fn new(templates: &'t TemplateTable, opt: &'t DecodeOptions) -> Self {
		Self { templates, opt }
	}

	/// Read the group count and every group, reporting progress after each one.
	pub fn read_groups(&self, cursor: &mut Cursor<'_>, on_group: &mut dyn FnMut(usize)) -> Result<Vec<GameObjectGroup>> {
		let count = cursor.read_len("group count")?;
		let mut groups = Vec::with_capacity(count.min(cursor.remaining()));
		for _ in 0..count {
			groups.push(self.read_group(cursor)?);
			on_group(cursor.pos());
		}
		Ok(groups)
	}

	fn read_group(&self, cursor: &mut Cursor<'_>) -> Result<GameObjectGroup> {
		let prefab_name = read_identifier(cursor)?;
		let count = cursor.read_len("instance count")?;
		let declared = cursor.read_len("group data length")?;

		let start = cursor.pos();
		let mut objects = Vec::with_capacity(count.min(cursor.remaining()));
		for _ in 0..count {
			objects.push(self.read_object(cursor, 0)?);
		}

		let consumed = cursor.pos() - start;
		if consumed != declared {
			return Err(SaveError::DataLengthMismatch {
				what: prefab_name,
				declared,
				consumed,
				at: start,
			});
		}

		trace!(prefab = %prefab_name, objects = count, bytes = consumed, "read object group");
		Ok(GameObjectGroup { prefab_name, objects })
	}

	// `depth` counts storage nesting; stored items sit one level below their holder.
	fn read_object(&self, cursor: &mut Cursor<'_>, depth: u32) -> Result<GameObject> {
		if depth >= self.opt.max_depth {
			return Err(SaveError::DecodeDepthExceeded {
				max_depth: self.opt.max_depth,
				at: cursor.pos(),
			});
		}

		let position = read_vector3(cursor)?;
		let rotation = Quaternion {
			x: cursor.read_f32()?,
			y: cursor.read_f32()?,
			z: cursor.read_f32()?,
			w: cursor.read_f32()?,
		};
		let scale = read_vector3(cursor)?;
		let folder = cursor.read_u8()?;

		let count = cursor.read_len("behavior count")?;
		let mut behaviors = Vec::with_capacity(count.min(cursor.remaining()));
		for _ in 0..count {
			behaviors.push(self.read_behavior(cursor, depth)?);
		}

		Ok(GameObject {
			position,
			rotation,
			scale,
			folder,
			behaviors,
		})
	}

	fn read_behavior(&self, cursor: &mut Cursor<'_>, depth: u32) -> Result<Behavior> {
		let name = read_identifier(cursor)?;
		let declared = cursor.read_len("behavior data length")?;
		let start = cursor.pos();

		if !self.templates.contains(&name) {
			warn!(behavior = %name, offset = start, bytes = declared, "no template for behavior, keeping raw bytes");
			let extra_raw = cursor.read_exact(declared)?.to_vec();
			return Ok(Behavior {
				name,
				data: None,
				extra: BehaviorExtra::None,
				extra_raw,
			});
		}

		let data = decode_object(cursor, self.templates, &name, self.opt)?;

		let extra = if name == STORAGE_BEHAVIOR {
			let count = cursor.read_len("stored item count")?;
			let mut items = Vec::with_capacity(count.min(cursor.remaining()));
			for _ in 0..count {
				let prefab_name = read_identifier(cursor)?;
				let object = self.read_object(cursor, depth + 1)?;
				items.push(StoredItem { prefab_name, object });
			}
			BehaviorExtra::Storage(items)
		} else {
			BehaviorExtra::None
		};

		let consumed = cursor.pos() - start;
		let Some(remaining) = declared.checked_sub(consumed) else {
			return Err(SaveError::DataLengthMismatch {
				what: name,
				declared,
				consumed,
				at: start,
			});
		};
		let extra_raw = cursor.read_exact(remaining)?.to_vec();

		Ok(Behavior {
			name,
			data: Some(data),
			extra,
			extra_raw,
		})
	}
}

fn read_vector3(cursor: &mut Cursor<'_>) -> Result<Vector3> {
	Ok(Vector3 {
		x: cursor.read_f32()?,
		y: cursor.read_f32()?,
		z: cursor.read_f32()?,
	})
}

/// Write the object-group section; mirror of [`ObjectReader::read_groups`].
pub fn write_groups(writer: &mut Writer, templates: &TemplateTable, groups: &[GameObjectGroup]) -> Result<()> {
	writer.write_len(groups.len(), "groups")?;
	for group in groups {
		writer.write_string(Some(group.prefab_name.as_str()), &group.prefab_name)?;
		writer.write_len(group.objects.len(), &group.prefab_name)?;
		let mark = writer.reserve_len();
		for (idx, object) in group.objects.iter().enumerate() {
			write_object(writer, templates, object, &format!("{}[{idx}]", group.prefab_name))?;
		}
		writer.finish_len(mark, &group.prefab_name)?;
	}
	Ok(())
}

fn write_object(writer: &mut Writer, templates: &TemplateTable, object: &GameObject, path: &str) -> Result<()> {
	write_vector3(writer, object.position);
	let rotation = object.rotation;
	for component in [rotation.x, rotation.y, rotation.z, rotation.w] {
		writer.write_f32(component);
	}
	write_vector3(writer, object.scale);
	writer.write_u8(object.folder);

	writer.write_len(object.behaviors.len(), path)?;
	for behavior in &object.behaviors {
		write_behavior(writer, templates, behavior, &format!("{path}.{}", behavior.name))?;
	}
	Ok(())
}

fn write_behavior(writer: &mut Writer, templates: &TemplateTable, behavior: &Behavior, path: &str) -> Result<()> {
	writer.write_string(Some(behavior.name.as_str()), path)?;
	let mark = writer.reserve_len();

	if let Some(data) = &behavior.data {
		ValueEncoder::new(templates, path).encode_object(writer, &behavior.name, data)?;
	}

	if let BehaviorExtra::Storage(items) = &behavior.extra {
		writer.write_len(items.len(), path)?;
		for (idx, item) in items.iter().enumerate() {
			let item_path = format!("{path}.items[{idx}]");
			writer.write_string(Some(item.prefab_name.as_str()), &item_path)?;
			write_object(writer, templates, &item.object, &item_path)?;
		}
	}

	writer.write_bytes(&behavior.extra_raw);
	writer.finish_len(mark, path)?;
	Ok(())
}

fn write_vector3(writer: &mut Writer, vector: Vector3) {
	writer.write_f32(vector.x);
	writer.write_f32(vector.y);
	writer.write_f32(vector.z);
}

#[cfg(test)]
mod tests {
	use super::{Behavior, BehaviorExtra, GameObject, GameObjectGroup, ObjectReader, Quaternion, StoredItem, Vector3, write_groups};
	use crate::save::bytes::{Cursor, Writer};
	use crate::save::{ClassTemplate, DecodeOptions, ObjectValue, SaveError, TemplateMember, TemplateTable, TypeCode, TypeInfo, Value};

	fn table() -> TemplateTable {
		TemplateTable::new(vec![
			ClassTemplate {
				name: "Health".into(),
				fields: vec![TemplateMember::new("hp", TypeInfo::primitive(TypeCode::Single))],
				properties: Vec::new(),
			},
			ClassTemplate {
				name: "Storage".into(),
				fields: vec![TemplateMember::new("capacity", TypeInfo::primitive(TypeCode::Int32))],
				properties: Vec::new(),
			},
		])
	}

	fn object(behaviors: Vec<Behavior>) -> GameObject {
		GameObject {
			position: Vector3 { x: 10.5, y: 3.0, z: 0.0 },
			rotation: Quaternion { x: 0.0, y: 0.0, z: 0.0, w: 1.0 },
			scale: Vector3 { x: 1.0, y: 1.0, z: 1.0 },
			folder: 2,
			behaviors,
		}
	}

	fn health(hp: f32, extra_raw: Vec<u8>) -> Behavior {
		Behavior {
			name: "Health".to_owned(),
			data: Some(ObjectValue::new("Health").with("hp", Value::F32(hp))),
			extra: BehaviorExtra::None,
			extra_raw,
		}
	}

	fn groups() -> Vec<GameObjectGroup> {
		let stored = StoredItem {
			prefab_name: "Meal".to_owned(),
			object: object(vec![health(5.0, Vec::new())]),
		};
		let storage = Behavior {
			name: "Storage".to_owned(),
			data: Some(ObjectValue::new("Storage").with("capacity", Value::I32(2000))),
			extra: BehaviorExtra::Storage(vec![stored]),
			extra_raw: vec![0xAA],
		};
		let unknown = Behavior {
			name: "Mystery".to_owned(),
			data: None,
			extra: BehaviorExtra::None,
			extra_raw: vec![1, 2, 3],
		};
		vec![GameObjectGroup {
			prefab_name: "Tile".to_owned(),
			objects: vec![object(vec![health(100.0, vec![9, 9]), storage, unknown])],
		}]
	}

	fn encode(groups: &[GameObjectGroup]) -> Vec<u8> {
		let mut writer = Writer::new();
		write_groups(&mut writer, &table(), groups).expect("groups encode");
		writer.into_bytes()
	}

	fn decode(bytes: &[u8]) -> crate::save::Result<Vec<GameObjectGroup>> {
		decode_with(bytes, &DecodeOptions::default())
	}

	fn decode_with(bytes: &[u8], opt: &DecodeOptions) -> crate::save::Result<Vec<GameObjectGroup>> {
		let table = table();
		let mut cursor = Cursor::new(bytes);
		ObjectReader::new(&table, opt).read_groups(&mut cursor, &mut |_| {})
	}

	#[test]
	fn behaviors_keep_storage_items_and_trailing_bytes() {
		let bytes = encode(&groups());
		let decoded = decode(&bytes).expect("groups decode");
		assert_eq!(decoded, groups());

		let tile = &decoded[0].objects[0];
		let storage = tile.behavior("Storage").expect("storage behavior");
		let BehaviorExtra::Storage(items) = &storage.extra else {
			panic!("storage items not decoded");
		};
		assert_eq!(items[0].prefab_name, "Meal");
		assert_eq!(tile.behavior("Health").expect("health").extra_raw, [9, 9]);
		assert_eq!(encode(&decoded), bytes);
	}

	#[test]
	fn behavior_without_template_is_kept_raw() {
		let bytes = encode(&groups());
		let decoded = decode(&bytes).expect("groups decode");
		let mystery = decoded[0].objects[0].behavior("Mystery").expect("mystery behavior");
		assert!(mystery.data.is_none());
		assert_eq!(mystery.extra_raw, [1, 2, 3]);
	}

	#[test]
	fn group_length_is_validated() {
		let mut bytes = encode(&groups());
		// count(4) + "Tile"(8) + instances(4), then the group data length
		let declared = i32::from_le_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
		bytes[16..20].copy_from_slice(&(declared + 1).to_le_bytes());

		let err = decode(&bytes).expect_err("length mismatch");
		assert!(matches!(
			err,
			SaveError::DataLengthMismatch { ref what, declared: d, consumed: c, at: 20 }
				if what == "Tile" && d == c + 1
		));
	}

	#[test]
	fn behavior_shorter_than_its_data_fails() {
		let mut broken = groups();
		broken[0].objects[0].behaviors.truncate(1);
		let mut bytes = encode(&broken);
		// count, "Tile", instances, length, transform(40), folder, behavior count, "Health"(10)
		let at = 4 + 8 + 4 + 4 + 40 + 1 + 4 + 10;
		bytes[at..at + 4].copy_from_slice(&2_i32.to_le_bytes());

		let err = decode(&bytes).expect_err("behavior length too small");
		assert!(matches!(err, SaveError::DataLengthMismatch { declared: 2, consumed: 4, .. }));
	}

	fn nested_storage(levels: usize) -> Vec<GameObjectGroup> {
		let mut inner = object(Vec::new());
		for _ in 0..levels {
			let storage = Behavior {
				name: "Storage".to_owned(),
				data: Some(ObjectValue::new("Storage").with("capacity", Value::I32(1))),
				extra: BehaviorExtra::Storage(vec![StoredItem {
					prefab_name: "Crate".to_owned(),
					object: inner,
				}]),
				extra_raw: Vec::new(),
			};
			inner = object(vec![storage]);
		}
		vec![GameObjectGroup {
			prefab_name: "Crate".to_owned(),
			objects: vec![inner],
		}]
	}

	#[test]
	fn nested_storage_respects_max_depth() {
		let bytes = encode(&nested_storage(3));
		let shallow = DecodeOptions {
			max_depth: 2,
			..DecodeOptions::default()
		};

		let err = decode_with(&bytes, &shallow).expect_err("storage nesting exceeds depth");
		assert!(matches!(err, SaveError::DecodeDepthExceeded { max_depth: 2, .. }));

		let roomy = DecodeOptions {
			max_depth: 4,
			..DecodeOptions::default()
		};
		assert_eq!(decode_with(&bytes, &roomy).expect("nesting within depth"), nested_storage(3));
	}
}
