use serde::Serialize;

/// Mask selecting the type code bits of a descriptor byte.
pub const TYPE_CODE_MASK: u8 = 0x3F;
/// Descriptor flag marking a value type.
pub const VALUE_TYPE_FLAG: u8 = 0x40;
/// Descriptor flag marking a generic type with sub-types.
pub const GENERIC_TYPE_FLAG: u8 = 0x80;

/// Serialization type code stored in the low six bits of a descriptor byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum TypeCode {
	/// Object laid out by a named class template.
	UserDefined = 0,
	/// Signed 8-bit integer.
	SByte = 1,
	/// Unsigned 8-bit integer.
	Byte = 2,
	/// One-byte boolean.
	Boolean = 3,
	/// Signed 16-bit integer.
	Int16 = 4,
	/// Unsigned 16-bit integer.
	UInt16 = 5,
	/// Signed 32-bit integer.
	Int32 = 6,
	/// Unsigned 32-bit integer.
	UInt32 = 7,
	/// Signed 64-bit integer.
	Int64 = 8,
	/// Unsigned 64-bit integer.
	UInt64 = 9,
	/// 32-bit float.
	Single = 10,
	/// 64-bit float.
	Double = 11,
	/// Length-prefixed UTF-8 string.
	String = 12,
	/// Named enumeration stored as `i32`.
	Enumeration = 13,
	/// Two `i32` components.
	Vector2I = 14,
	/// Two `f32` components.
	Vector2 = 15,
	/// Three `f32` components.
	Vector3 = 16,
	/// Fixed array of one element type.
	Array = 17,
	/// Key/value pair.
	Pair = 18,
	/// Key/value map.
	Dictionary = 19,
	/// Growable list.
	List = 20,
	/// Set of unique elements.
	HashSet = 21,
	/// FIFO queue.
	Queue = 22,
	/// RGBA colour, one byte per channel.
	Colour = 23,
}

impl TypeCode {
	/// Decode a type code from the low six bits of `info`.
	pub fn from_info(info: u8) -> Option<Self> {
		Self::from_u8(info & TYPE_CODE_MASK)
	}

	/// Map a raw code value to a type code.
	pub fn from_u8(code: u8) -> Option<Self> {
		let code = match code {
			0 => Self::UserDefined,
			1 => Self::SByte,
			2 => Self::Byte,
			3 => Self::Boolean,
			4 => Self::Int16,
			5 => Self::UInt16,
			6 => Self::Int32,
			7 => Self::UInt32,
			8 => Self::Int64,
			9 => Self::UInt64,
			10 => Self::Single,
			11 => Self::Double,
			12 => Self::String,
			13 => Self::Enumeration,
			14 => Self::Vector2I,
			15 => Self::Vector2,
			16 => Self::Vector3,
			17 => Self::Array,
			18 => Self::Pair,
			19 => Self::Dictionary,
			20 => Self::List,
			21 => Self::HashSet,
			22 => Self::Queue,
			23 => Self::Colour,
			_ => return None,
		};
		Some(code)
	}

	/// Raw code value.
	pub fn as_u8(self) -> u8 {
		self as u8
	}

	/// Whether descriptors of this code carry a template name.
	pub fn has_template_name(self) -> bool {
		matches!(self, Self::UserDefined | Self::Enumeration)
	}

	/// Whether this code may set the generic flag.
	pub fn can_be_generic(self) -> bool {
		matches!(self, Self::Pair | Self::Dictionary | Self::List | Self::HashSet | Self::Queue | Self::UserDefined)
	}

	/// Required generic sub-type count, or `None` when variable.
	pub fn generic_arity(self) -> Option<usize> {
		match self {
			Self::Pair | Self::Dictionary => Some(2),
			Self::List | Self::HashSet | Self::Queue => Some(1),
			_ => None,
		}
	}

	/// Whether values are encoded as `data-length, count, elements`.
	pub fn is_sequence(self) -> bool {
		matches!(self, Self::Array | Self::List | Self::HashSet | Self::Queue)
	}
}

/// Decoded type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeInfo {
	/// Primitive or container kind.
	pub code: TypeCode,
	/// Value-type flag (`0x40`).
	pub is_value_type: bool,
	/// Generic flag (`0x80`).
	pub is_generic: bool,
	/// Template or enum name for user-defined and enumeration codes.
	pub template_name: Option<Box<str>>,
	/// Element, key/value, or generic argument types.
	pub sub_types: Vec<TypeInfo>,
}

impl TypeInfo {
	/// Plain descriptor without flags, name, or sub-types.
	pub fn primitive(code: TypeCode) -> Self {
		Self {
			code,
			is_value_type: false,
			is_generic: false,
			template_name: None,
			sub_types: Vec::new(),
		}
	}

	/// Non-generic user-defined descriptor referencing `name`.
	pub fn user_defined(name: &str) -> Self {
		Self {
			template_name: Some(name.into()),
			..Self::primitive(TypeCode::UserDefined)
		}
	}

	/// Array descriptor with one element type.
	pub fn array(element: TypeInfo) -> Self {
		Self {
			sub_types: vec![element],
			..Self::primitive(TypeCode::Array)
		}
	}

	/// Generic descriptor such as `List<T>` or `Dictionary<K, V>`.
	pub fn generic(code: TypeCode, sub_types: Vec<TypeInfo>) -> Self {
		Self {
			is_generic: true,
			sub_types,
			..Self::primitive(code)
		}
	}

	/// Re-derive the on-disk descriptor byte from code and flags.
	pub fn info_byte(&self) -> u8 {
		let mut info = self.code.as_u8();
		if self.is_value_type {
			info |= VALUE_TYPE_FLAG;
		}
		if self.is_generic {
			info |= GENERIC_TYPE_FLAG;
		}
		info
	}

	/// Template name, if any.
	pub fn template_name(&self) -> Option<&str> {
		self.template_name.as_deref()
	}
}

/// One named field or property of a class template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateMember {
	/// Member name.
	pub name: Box<str>,
	/// Member type.
	#[serde(rename = "type")]
	pub ty: TypeInfo,
}

impl TemplateMember {
	/// Build a member from name and type.
	pub fn new(name: &str, ty: TypeInfo) -> Self {
		Self { name: name.into(), ty }
	}
}

/// Per-class schema embedded in a save file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassTemplate {
	/// Class name, short or namespace-qualified.
	pub name: Box<str>,
	/// Fields in serialization order.
	pub fields: Vec<TemplateMember>,
	/// Properties in serialization order, after all fields.
	pub properties: Vec<TemplateMember>,
}

impl ClassTemplate {
	/// All members in serialization order: fields, then properties.
	pub fn members(&self) -> impl Iterator<Item = &TemplateMember> {
		self.fields.iter().chain(&self.properties)
	}

	/// Number of fields and properties.
	pub fn member_count(&self) -> usize {
		self.fields.len() + self.properties.len()
	}
}

#[cfg(test)]
mod tests {
	use super::{GENERIC_TYPE_FLAG, TypeCode, TypeInfo, VALUE_TYPE_FLAG};

	#[test]
	fn every_code_fits_six_bits_and_maps_back() {
		let mut seen = 0;
		for raw in 0_u8..=u8::MAX {
			if let Some(code) = TypeCode::from_u8(raw) {
				assert!(code.as_u8() < 64);
				assert_eq!(code.as_u8(), raw);
				seen += 1;
			}
		}
		assert_eq!(seen, 24);
	}

	#[test]
	fn info_byte_combines_code_and_flags() {
		let mut info = TypeInfo::generic(TypeCode::List, vec![TypeInfo::primitive(TypeCode::Int32)]);
		assert_eq!(info.info_byte(), GENERIC_TYPE_FLAG | 20);
		info.is_value_type = true;
		assert_eq!(info.info_byte(), GENERIC_TYPE_FLAG | VALUE_TYPE_FLAG | 20);
		assert_eq!(TypeCode::from_info(info.info_byte()), Some(TypeCode::List));
	}

	#[test]
	fn array_is_not_generic_capable() {
		assert!(!TypeCode::Array.can_be_generic());
		assert!(TypeCode::Array.is_sequence());
		assert_eq!(TypeCode::Dictionary.generic_arity(), Some(2));
		assert_eq!(TypeCode::UserDefined.generic_arity(), None);
	}
}
