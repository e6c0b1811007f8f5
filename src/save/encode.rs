use std::fmt::Write as _;

use crate::save::bytes::{NULL_LEN, Writer};
use crate::save::value::{ObjectValue, Value};
use crate::save::{Result, SaveError, TemplateTable, TypeCode, TypeInfo};

/// Template-driven value writer; the structural mirror of the decoder.
///
/// Tracks the member path of the value being written so shape errors name the offending member.
pub struct ValueEncoder<'t> {
	templates: &'t TemplateTable,
	root: String,
	path: Vec<PathSeg<'t>>,
}

#[derive(Debug, Clone, Copy)]
enum PathSeg<'t> {
	Member(&'t str),
	Index(usize),
	Key(usize),
	Value(usize),
}

impl<'t> ValueEncoder<'t> {
	/// Create an encoder whose error paths start at `root`.
	pub fn new(templates: &'t TemplateTable, root: impl Into<String>) -> Self {
		Self {
			templates,
			root: root.into(),
			path: Vec::new(),
		}
	}

	/// Render the current member path.
	pub fn path(&self) -> String {
		let mut out = self.root.clone();
		for seg in &self.path {
			let _ = match seg {
				PathSeg::Member(name) => write!(out, ".{name}"),
				PathSeg::Index(idx) => write!(out, "[{idx}]"),
				PathSeg::Key(idx) => write!(out, "{{key {idx}}}"),
				PathSeg::Value(idx) => write!(out, "{{value {idx}}}"),
			};
		}
		out
	}

	/// Write the members of `object` laid out by the template named `name`.
	pub fn encode_object(&mut self, writer: &mut Writer, name: &str, object: &ObjectValue) -> Result<()> {
		let templates = self.templates;
		let template = templates.get(name).ok_or_else(|| SaveError::EncodeUnknownTemplate {
			path: self.path(),
			name: name.to_owned(),
		})?;

		for member in template.members() {
			let Some(value) = object.get(&member.name) else {
				return Err(SaveError::MissingMember {
					path: self.path(),
					member: member.name.to_string(),
				});
			};
			self.path.push(PathSeg::Member(&member.name));
			self.encode_value(writer, &member.ty, value)?;
			self.path.pop();
		}
		Ok(())
	}

	/// Write one value described by `ty`.
	pub fn encode_value(&mut self, writer: &mut Writer, ty: &'t TypeInfo, value: &Value) -> Result<()> {
		match (ty.code, value) {
			(TypeCode::SByte, Value::SByte(v)) => writer.write_i8(*v),
			(TypeCode::Byte, Value::Byte(v)) => writer.write_u8(*v),
			(TypeCode::Boolean, Value::Bool(v)) => writer.write_u8(*v),
			(TypeCode::Int16, Value::I16(v)) => writer.write_i16(*v),
			(TypeCode::UInt16, Value::U16(v)) => writer.write_u16(*v),
			(TypeCode::Int32, Value::I32(v)) => writer.write_i32(*v),
			(TypeCode::UInt32, Value::U32(v)) => writer.write_u32(*v),
			(TypeCode::Int64, Value::I64(v)) => writer.write_i64(*v),
			(TypeCode::UInt64, Value::U64(v)) => writer.write_u64(*v),
			(TypeCode::Single, Value::F32(v)) => writer.write_f32(*v),
			(TypeCode::Double, Value::F64(v)) => writer.write_f64(*v),
			(TypeCode::String, Value::String(v)) => writer.write_string(Some(v.as_str()), "").map_err(|err| self.with_path(err))?,
			(TypeCode::String, Value::Null) => writer.write_string(None, "")?,
			(TypeCode::Enumeration, Value::Enum(v)) => writer.write_i32(*v),
			(TypeCode::Vector2I, Value::Vector2I { x, y }) => {
				writer.write_i32(*x);
				writer.write_i32(*y);
			}
			(TypeCode::Vector2, Value::Vector2 { x, y }) => {
				writer.write_f32(*x);
				writer.write_f32(*y);
			}
			(TypeCode::Vector3, Value::Vector3 { x, y, z }) => {
				writer.write_f32(*x);
				writer.write_f32(*y);
				writer.write_f32(*z);
			}
			(TypeCode::Colour, Value::Colour { r, g, b, a }) => writer.write_bytes(&[*r, *g, *b, *a]),
			(TypeCode::Array | TypeCode::List | TypeCode::HashSet | TypeCode::Queue | TypeCode::Dictionary, Value::Null) => {
				writer.write_i32(4);
				writer.write_i32(NULL_LEN);
			}
			(TypeCode::Pair | TypeCode::UserDefined, Value::Null) => writer.write_i32(NULL_LEN),
			(TypeCode::Array | TypeCode::List | TypeCode::HashSet | TypeCode::Queue, _) => self.encode_sequence(writer, ty, value)?,
			(TypeCode::Dictionary, Value::Dictionary(entries)) => self.encode_dictionary(writer, ty, entries)?,
			(TypeCode::Pair, Value::Pair(pair)) => {
				let (key_ty, value_ty) = (self.sub_type(ty, 0)?, self.sub_type(ty, 1)?);
				let mark = writer.reserve_len();
				self.path.push(PathSeg::Key(0));
				self.encode_value(writer, key_ty, &pair.0)?;
				self.path.pop();
				self.path.push(PathSeg::Value(0));
				self.encode_value(writer, value_ty, &pair.1)?;
				self.path.pop();
				writer.finish_len(mark, "").map_err(|err| self.with_path(err))?;
			}
			(TypeCode::UserDefined, Value::Object(object)) => {
				let name = ty.template_name().unwrap_or_default();
				let mark = writer.reserve_len();
				self.encode_object(writer, name, object)?;
				writer.finish_len(mark, "").map_err(|err| self.with_path(err))?;
			}
			(code, other) => return Err(self.mismatch(code_label(code), other)),
		}
		Ok(())
	}

	fn encode_sequence(&mut self, writer: &mut Writer, ty: &'t TypeInfo, value: &Value) -> Result<()> {
		let element = self.sub_type(ty, 0)?;

		if element.code == TypeCode::Byte {
			let Value::Bytes(bytes) = value else {
				return Err(self.mismatch("bytes", value));
			};
			writer.write_len(bytes.len(), "").map_err(|err| self.with_path(err))?;
			writer.write_len(bytes.len(), "").map_err(|err| self.with_path(err))?;
			writer.write_bytes(bytes);
			return Ok(());
		}

		let items = match (ty.code, value) {
			(TypeCode::Array, Value::Array(items))
			| (TypeCode::List, Value::List(items))
			| (TypeCode::HashSet, Value::HashSet(items))
			| (TypeCode::Queue, Value::Queue(items)) => items,
			(code, other) => return Err(self.mismatch(code_label(code), other)),
		};

		if element.is_value_type && element.code != TypeCode::UserDefined {
			return Err(SaveError::InvalidTypeInfo {
				path: self.path(),
				reason: "only user-defined elements may be value types",
			});
		}

		let mark = writer.reserve_len();
		writer.write_len(items.len(), "").map_err(|err| self.with_path(err))?;
		let start = writer.position();
		for (idx, item) in items.iter().enumerate() {
			self.path.push(PathSeg::Index(idx));
			if element.is_value_type {
				let Value::Object(object) = item else {
					return Err(self.mismatch("object", item));
				};
				self.encode_object(writer, element.template_name().unwrap_or_default(), object)?;
			} else {
				self.encode_value(writer, element, item)?;
			}
			self.path.pop();
		}
		writer.finish_len_since(mark, start, "").map_err(|err| self.with_path(err))?;
		Ok(())
	}

	fn encode_dictionary(&mut self, writer: &mut Writer, ty: &'t TypeInfo, entries: &[(Value, Value)]) -> Result<()> {
		let (key_ty, value_ty) = (self.sub_type(ty, 0)?, self.sub_type(ty, 1)?);

		let mark = writer.reserve_len();
		writer.write_len(entries.len(), "").map_err(|err| self.with_path(err))?;
		let start = writer.position();
		for (idx, (_, value)) in entries.iter().enumerate() {
			self.path.push(PathSeg::Value(idx));
			self.encode_value(writer, value_ty, value)?;
			self.path.pop();
		}
		for (idx, (key, _)) in entries.iter().enumerate() {
			self.path.push(PathSeg::Key(idx));
			self.encode_value(writer, key_ty, key)?;
			self.path.pop();
		}
		writer.finish_len_since(mark, start, "").map_err(|err| self.with_path(err))?;
		Ok(())
	}

	fn sub_type(&self, ty: &'t TypeInfo, idx: usize) -> Result<&'t TypeInfo> {
		ty.sub_types.get(idx).ok_or_else(|| SaveError::InvalidTypeInfo {
			path: self.path(),
			reason: "container type is missing a sub-type",
		})
	}

	fn with_path(&self, err: SaveError) -> SaveError {
		match err {
			SaveError::LengthOverflow { len, .. } => SaveError::LengthOverflow { path: self.path(), len },
			other => other,
		}
	}

	fn mismatch(&self, expected: &'static str, got: &Value) -> SaveError {
		SaveError::ShapeMismatch {
			path: self.path(),
			expected,
			got: got.kind(),
		}
	}
}

fn code_label(code: TypeCode) -> &'static str {
	match code {
		TypeCode::UserDefined => "object",
		TypeCode::SByte => "sbyte",
		TypeCode::Byte => "byte",
		TypeCode::Boolean => "bool",
		TypeCode::Int16 => "int16",
		TypeCode::UInt16 => "uint16",
		TypeCode::Int32 => "int32",
		TypeCode::UInt32 => "uint32",
		TypeCode::Int64 => "int64",
		TypeCode::UInt64 => "uint64",
		TypeCode::Single => "single",
		TypeCode::Double => "double",
		TypeCode::String => "string",
		TypeCode::Enumeration => "enum",
		TypeCode::Vector2I => "vector2i",
		TypeCode::Vector2 => "vector2",
		TypeCode::Vector3 => "vector3",
		TypeCode::Array => "array",
		TypeCode::Pair => "pair",
		TypeCode::Dictionary => "dictionary",
		TypeCode::List => "list",
		TypeCode::HashSet => "hashset",
		TypeCode::Queue => "queue",
		TypeCode::Colour => "colour",
	}
}
