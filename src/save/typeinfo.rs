use crate::save::bytes::{Cursor, Writer};
use crate::save::templates::read_identifier;
use crate::save::types::{GENERIC_TYPE_FLAG, TYPE_CODE_MASK, VALUE_TYPE_FLAG};
use crate::save::{Result, SaveError, TypeCode, TypeInfo};

/// Maximum nesting of generic arguments inside one descriptor.
pub const MAX_TYPE_DEPTH: u32 = 64;

/// Read one type descriptor, recursing into its sub-types.
pub fn read_type_info(cursor: &mut Cursor<'_>) -> Result<TypeInfo> {
	read_type_info_impl(cursor, 0)
}

fn read_type_info_impl(cursor: &mut Cursor<'_>, depth: u32) -> Result<TypeInfo> {
	let at = cursor.pos();
	if depth >= MAX_TYPE_DEPTH {
		return Err(SaveError::DecodeDepthExceeded { max_depth: MAX_TYPE_DEPTH, at });
	}

	let info = cursor.read_u8()?;
	let code = TypeCode::from_info(info).ok_or(SaveError::UnknownTypeCode {
		code: info & TYPE_CODE_MASK,
		info,
		at,
	})?;
	let is_generic = info & GENERIC_TYPE_FLAG != 0;

	let template_name = if code.has_template_name() {
		Some(read_identifier(cursor)?.into_boxed_str())
	} else {
		None
	};

	let mut sub_types = Vec::new();
	if is_generic {
		if !code.can_be_generic() {
			return Err(SaveError::NonGenericType { code, at });
		}
		let count_at = cursor.pos();
		let count = usize::from(cursor.read_u8()?);
		if let Some(expected) = code.generic_arity() {
			if count != expected {
				return Err(SaveError::GenericArity {
					code,
					expected,
					got: count,
					at: count_at,
				});
			}
		}
		sub_types.reserve(count);
		for _ in 0..count {
			sub_types.push(read_type_info_impl(cursor, depth + 1)?);
		}
	} else if code == TypeCode::Array {
		sub_types.push(read_type_info_impl(cursor, depth + 1)?);
	}

	Ok(TypeInfo {
		code,
		is_value_type: info & VALUE_TYPE_FLAG != 0,
		is_generic,
		template_name,
		sub_types,
	})
}

/// Write one type descriptor; the mirror of [`read_type_info`].
pub fn write_type_info(writer: &mut Writer, info: &TypeInfo, path: &str) -> Result<()> {
	writer.write_u8(info.info_byte());

	if info.code.has_template_name() {
		if info.template_name.is_none() {
			return Err(SaveError::InvalidTypeInfo {
				path: path.to_owned(),
				reason: "user-defined and enumeration types need a template name",
			});
		}
		writer.write_string(info.template_name(), path)?;
	}

	if info.is_generic {
		if !info.code.can_be_generic() {
			return Err(SaveError::InvalidTypeInfo {
				path: path.to_owned(),
				reason: "generic flag on a type that cannot be generic",
			});
		}
		if info.code.generic_arity().is_some_and(|arity| arity != info.sub_types.len()) {
			return Err(SaveError::InvalidTypeInfo {
				path: path.to_owned(),
				reason: "generic sub-type count does not match type code",
			});
		}
		let count = u8::try_from(info.sub_types.len()).map_err(|_| SaveError::InvalidTypeInfo {
			path: path.to_owned(),
			reason: "more than 255 generic sub-types",
		})?;
		writer.write_u8(count);
		for sub in &info.sub_types {
			write_type_info(writer, sub, path)?;
		}
	} else if info.code == TypeCode::Array {
		let [element] = info.sub_types.as_slice() else {
			return Err(SaveError::InvalidTypeInfo {
				path: path.to_owned(),
				reason: "array types need exactly one element type",
			});
		};
		write_type_info(writer, element, path)?;
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::{read_type_info, write_type_info};
	use crate::save::bytes::{Cursor, Writer};
	use crate::save::{SaveError, TypeCode, TypeInfo};

	fn roundtrip(info: &TypeInfo) -> (Vec<u8>, TypeInfo) {
		let mut writer = Writer::new();
		write_type_info(&mut writer, info, "t").expect("descriptor writes");
		let bytes = writer.into_bytes();
		let mut cursor = Cursor::new(&bytes);
		let parsed = read_type_info(&mut cursor).expect("descriptor reads");
		assert_eq!(cursor.remaining(), 0, "descriptor must be fully consumed");
		(bytes, parsed)
	}

	#[test]
	fn primitive_is_one_byte() {
		let (bytes, parsed) = roundtrip(&TypeInfo::primitive(TypeCode::Int32));
		assert_eq!(bytes, vec![6]);
		assert_eq!(parsed, TypeInfo::primitive(TypeCode::Int32));
	}

	#[test]
	fn non_generic_user_defined_reads_name_only() {
		let (bytes, parsed) = roundtrip(&TypeInfo::user_defined("Health"));
		assert_eq!(bytes[0], 0);
		assert_eq!(&bytes[1..5], &6_i32.to_le_bytes());
		assert_eq!(&bytes[5..], b"Health");
		assert!(parsed.sub_types.is_empty());
		assert_eq!(parsed.template_name(), Some("Health"));
	}

	#[test]
	fn array_subtype_has_no_count_byte() {
		let (bytes, parsed) = roundtrip(&TypeInfo::array(TypeInfo::primitive(TypeCode::Byte)));
		assert_eq!(bytes, vec![17, 2]);
		assert_eq!(parsed.sub_types, vec![TypeInfo::primitive(TypeCode::Byte)]);
	}

	#[test]
	fn nested_generics_roundtrip() {
		let inner = TypeInfo::generic(TypeCode::List, vec![TypeInfo::user_defined("Tag")]);
		let dict = TypeInfo::generic(TypeCode::Dictionary, vec![TypeInfo::primitive(TypeCode::String), inner]);
		let mut generic_user = TypeInfo::generic(TypeCode::UserDefined, vec![dict.clone(), TypeInfo::primitive(TypeCode::Single)]);
		generic_user.template_name = Some("Wrapper`2".into());
		generic_user.is_value_type = true;

		let (bytes, parsed) = roundtrip(&generic_user);
		assert_eq!(bytes[0], 0x80 | 0x40);
		assert_eq!(parsed, generic_user);
		assert_eq!(parsed.sub_types[0], dict);
	}

	#[test]
	fn generic_flag_on_primitive_is_rejected() {
		let bytes = [0x80 | 6_u8, 1, 6];
		let err = read_type_info(&mut Cursor::new(&bytes)).expect_err("int32 cannot be generic");
		assert!(matches!(err, SaveError::NonGenericType { code: TypeCode::Int32, at: 0 }));
	}

	#[test]
	fn dictionary_arity_is_checked() {
		let bytes = [0x80 | 19_u8, 1, 6];
		let err = read_type_info(&mut Cursor::new(&bytes)).expect_err("dictionary needs two sub-types");
		assert!(matches!(err, SaveError::GenericArity { expected: 2, got: 1, at: 1, .. }));
	}

	#[test]
	fn unknown_code_is_rejected() {
		let err = read_type_info(&mut Cursor::new(&[24])).expect_err("24 is not a type code");
		assert!(matches!(err, SaveError::UnknownTypeCode { code: 24, info: 24, at: 0 }));
	}

	#[test]
	fn truncated_descriptor_reports_out_of_data() {
		let bytes = [0x80 | 20_u8, 1];
		let err = read_type_info(&mut Cursor::new(&bytes)).expect_err("sub-type missing");
		assert!(matches!(err, SaveError::OutOfData { at: 2, need: 1, rem: 0 }));
	}

	#[test]
	fn writing_array_without_element_fails() {
		let info = TypeInfo::primitive(TypeCode::Array);
		let err = write_type_info(&mut Writer::new(), &info, "Foo.items").expect_err("array needs element");
		assert!(matches!(err, SaveError::InvalidTypeInfo { ref path, .. } if path == "Foo.items"));
	}
}
