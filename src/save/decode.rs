use crate::save::bytes::Cursor;
use crate::save::value::{MemberValue, ObjectValue, Value};
use crate::save::{Result, SaveError, TemplateTable, TypeCode, TypeInfo};

/// Save body version pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct SaveVersion {
	/// Major version; must match exactly unless checks are skipped.
	pub major: i32,
	/// Minor version.
	pub minor: i32,
}

impl SaveVersion {
	/// Version written by the supported game build.
	pub const SUPPORTED: Self = Self { major: 7, minor: 35 };
}

/// How strictly the body version is compared against [`DecodeOptions::expected_version`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionPolicy {
	/// Major and minor must both match.
	#[default]
	Exact,
	/// Major must match; any minor is accepted.
	AllowMinorMismatch,
	/// No version check.
	Skip,
}

/// Runtime limits and behavior switches for save decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Four-byte literal expected before the body version.
	pub sentinel: [u8; 4],
	/// Supported body version.
	pub expected_version: SaveVersion,
	/// Version comparison policy.
	pub version_policy: VersionPolicy,
	/// Maximum recursive value nesting depth.
	pub max_depth: u32,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			sentinel: *b"KSAV",
			expected_version: SaveVersion::SUPPORTED,
			version_policy: VersionPolicy::Exact,
			max_depth: 64,
		}
	}
}

impl DecodeOptions {
	/// Preset accepting any minor version of the supported major.
	pub fn lenient() -> Self {
		Self {
			version_policy: VersionPolicy::AllowMinorMismatch,
			..Self::default()
		}
	}

	/// Preset expecting a specific body version.
	pub fn for_version(major: i32, minor: i32) -> Self {
		Self {
			expected_version: SaveVersion { major, minor },
			..Self::default()
		}
	}

	/// Validate a body version against the configured policy.
	pub fn check_version(&self, found: SaveVersion) -> Result<()> {
		let expected = self.expected_version;
		let ok = match self.version_policy {
			VersionPolicy::Skip => true,
			VersionPolicy::AllowMinorMismatch => found.major == expected.major,
			VersionPolicy::Exact => found == expected,
		};
		if ok {
			return Ok(());
		}
		Err(SaveError::VersionIncompatible {
			expected_major: expected.major,
			expected_minor: expected.minor,
			major: found.major,
			minor: found.minor,
		})
	}
}

/// Decode one value described by `ty`.
pub fn decode_value(cursor: &mut Cursor<'_>, templates: &TemplateTable, ty: &TypeInfo, opt: &DecodeOptions) -> Result<Value> {
	decode_value_impl(cursor, templates, ty, opt, 0)
}

/// Decode the members of one object laid out by the template named `name`.
pub fn decode_object(cursor: &mut Cursor<'_>, templates: &TemplateTable, name: &str, opt: &DecodeOptions) -> Result<ObjectValue> {
	decode_object_impl(cursor, templates, name, opt, 0)
}

fn decode_object_impl(cursor: &mut Cursor<'_>, templates: &TemplateTable, name: &str, opt: &DecodeOptions, depth: u32) -> Result<ObjectValue> {
	let at = cursor.pos();
	if depth >= opt.max_depth {
		return Err(SaveError::DecodeDepthExceeded { max_depth: opt.max_depth, at });
	}

	let template = templates.get(name).ok_or_else(|| SaveError::UnknownTemplate { name: name.to_owned(), at })?;

	let mut members = Vec::with_capacity(template.member_count());
	for member in template.members() {
		let value = decode_value_impl(cursor, templates, &member.ty, opt, depth + 1)?;
		members.push(MemberValue {
			name: member.name.clone(),
			value,
		});
	}

	Ok(ObjectValue {
		template: template.name.clone(),
		members,
	})
}

fn decode_value_impl(cursor: &mut Cursor<'_>, templates: &TemplateTable, ty: &TypeInfo, opt: &DecodeOptions, depth: u32) -> Result<Value> {
	let at = cursor.pos();
	if depth >= opt.max_depth {
		return Err(SaveError::DecodeDepthExceeded { max_depth: opt.max_depth, at });
	}

	let value = match ty.code {
		TypeCode::SByte => Value::SByte(cursor.read_i8()?),
		TypeCode::Byte => Value::Byte(cursor.read_u8()?),
		TypeCode::Boolean => Value::Bool(cursor.read_u8()?),
		TypeCode::Int16 => Value::I16(cursor.read_i16()?),
		TypeCode::UInt16 => Value::U16(cursor.read_u16()?),
		TypeCode::Int32 => Value::I32(cursor.read_i32()?),
		TypeCode::UInt32 => Value::U32(cursor.read_u32()?),
		TypeCode::Int64 => Value::I64(cursor.read_i64()?),
		TypeCode::UInt64 => Value::U64(cursor.read_u64()?),
		TypeCode::Single => Value::F32(cursor.read_f32()?),
		TypeCode::Double => Value::F64(cursor.read_f64()?),
		TypeCode::String => cursor.read_string()?.map_or(Value::Null, Value::String),
		TypeCode::Enumeration => Value::Enum(cursor.read_i32()?),
		TypeCode::Vector2I => Value::Vector2I {
			x: cursor.read_i32()?,
			y: cursor.read_i32()?,
		},
		TypeCode::Vector2 => Value::Vector2 {
			x: cursor.read_f32()?,
			y: cursor.read_f32()?,
		},
		TypeCode::Vector3 => Value::Vector3 {
			x: cursor.read_f32()?,
			y: cursor.read_f32()?,
			z: cursor.read_f32()?,
		},
		TypeCode::Colour => {
			let [r, g, b, a] = cursor.read_code4()?;
			Value::Colour { r, g, b, a }
		}
		TypeCode::Array | TypeCode::List | TypeCode::HashSet | TypeCode::Queue => decode_sequence(cursor, templates, ty, opt, depth)?,
		TypeCode::Dictionary => decode_dictionary(cursor, templates, ty, opt, depth)?,
		TypeCode::Pair => {
			let (key_ty, value_ty) = (sub_type(ty, 0, at)?, sub_type(ty, 1, at)?);
			if cursor.read_i32()? < 0 {
				return Ok(Value::Null);
			}
			let key = decode_value_impl(cursor, templates, key_ty, opt, depth + 1)?;
			let value = decode_value_impl(cursor, templates, value_ty, opt, depth + 1)?;
			Value::Pair(Box::new((key, value)))
		}
		TypeCode::UserDefined => decode_user_defined(cursor, templates, ty, opt, depth)?,
	};
	Ok(value)
}

fn decode_sequence(cursor: &mut Cursor<'_>, templates: &TemplateTable, ty: &TypeInfo, opt: &DecodeOptions, depth: u32) -> Result<Value> {
	let at = cursor.pos();
	let element = sub_type(ty, 0, at)?;

	// Data length is recomputed on write.
	let _ = cursor.read_i32()?;
	let Some(count) = cursor.read_nullable_len("element count")? else {
		return Ok(Value::Null);
	};

	if element.code == TypeCode::Byte {
		return Ok(Value::Bytes(cursor.read_exact(count)?.to_vec()));
	}

	let mut items = Vec::with_capacity(count.min(cursor.remaining()));
	if element.is_value_type {
		if element.code != TypeCode::UserDefined {
			return Err(SaveError::InvalidValueType { code: element.code, at });
		}
		let name = element.template_name().unwrap_or_default();
		// Memberless elements occupy no bytes, so the count is not bounded by the input.
		if count > cursor.remaining() && templates.get(name).is_some_and(|template| template.member_count() == 0) {
			return Err(SaveError::InvalidLength {
				what: "value-type element count",
				len: count as i64,
				at,
			});
		}
		for _ in 0..count {
			let item = decode_object_impl(cursor, templates, name, opt, depth + 1)?;
			items.push(Value::Object(item));
		}
	} else {
		for _ in 0..count {
			items.push(decode_value_impl(cursor, templates, element, opt, depth + 1)?);
		}
	}

	Ok(match ty.code {
		TypeCode::Array => Value::Array(items),
		TypeCode::List => Value::List(items),
		TypeCode::HashSet => Value::HashSet(items),
		_ => Value::Queue(items),
	})
}

fn decode_dictionary(cursor: &mut Cursor<'_>, templates: &TemplateTable, ty: &TypeInfo, opt: &DecodeOptions, depth: u32) -> Result<Value> {
	let at = cursor.pos();
	let (key_ty, value_ty) = (sub_type(ty, 0, at)?, sub_type(ty, 1, at)?);

	let _ = cursor.read_i32()?;
	let Some(count) = cursor.read_nullable_len("dictionary count")? else {
		return Ok(Value::Null);
	};

	// All values precede all keys.
	let capacity = count.min(cursor.remaining());
	let mut values = Vec::with_capacity(capacity);
	for _ in 0..count {
		values.push(decode_value_impl(cursor, templates, value_ty, opt, depth + 1)?);
	}
	let mut entries = Vec::with_capacity(capacity);
	for value in values {
		let key = decode_value_impl(cursor, templates, key_ty, opt, depth + 1)?;
		entries.push((key, value));
	}
	Ok(Value::Dictionary(entries))
}

fn decode_user_defined(cursor: &mut Cursor<'_>, templates: &TemplateTable, ty: &TypeInfo, opt: &DecodeOptions, depth: u32) -> Result<Value> {
	let name = ty.template_name().unwrap_or_default();
	let Ok(declared) = usize::try_from(cursor.read_i32()?) else {
		return Ok(Value::Null);
	};

	let start = cursor.pos();
	let object = decode_object_impl(cursor, templates, name, opt, depth + 1)?;
	let consumed = cursor.pos() - start;
	if consumed != declared {
		return Err(SaveError::DataLengthMismatch {
			what: name.to_owned(),
			declared,
			consumed,
			at: start,
		});
	}
	Ok(Value::Object(object))
}

fn sub_type(ty: &TypeInfo, idx: usize, at: usize) -> Result<&TypeInfo> {
	ty.sub_types.get(idx).ok_or(SaveError::GenericArity {
		code: ty.code,
		expected: idx + 1,
		got: ty.sub_types.len(),
		at,
	})
}
