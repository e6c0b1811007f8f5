use serde::Serialize;

/// Dynamically decoded value; variants mirror [`TypeCode`](crate::save::TypeCode).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
	/// Null string, sequence, dictionary, pair, or object reference.
	Null,
	/// `SByte`.
	SByte(i8),
	/// `Byte`.
	Byte(u8),
	/// `Boolean` byte as stored; any non-zero byte is true.
	Bool(u8),
	/// `Int16`.
	I16(i16),
	/// `UInt16`.
	U16(u16),
	/// `Int32`.
	I32(i32),
	/// `UInt32`.
	U32(u32),
	/// `Int64`.
	I64(i64),
	/// `UInt64`.
	U64(u64),
	/// `Single`.
	F32(f32),
	/// `Double`.
	F64(f64),
	/// Non-null `String`.
	String(String),
	/// `Enumeration` underlying value.
	Enum(i32),
	/// `Vector2I`.
	Vector2I {
		/// X component.
		x: i32,
		/// Y component.
		y: i32,
	},
	/// `Vector2`.
	Vector2 {
		/// X component.
		x: f32,
		/// Y component.
		y: f32,
	},
	/// `Vector3`.
	Vector3 {
		/// X component.
		x: f32,
		/// Y component.
		y: f32,
		/// Z component.
		z: f32,
	},
	/// `Colour` channels as stored bytes.
	Colour {
		/// Red.
		r: u8,
		/// Green.
		g: u8,
		/// Blue.
		b: u8,
		/// Alpha.
		a: u8,
	},
	/// Any sequence whose element type is `Byte`.
	Bytes(Vec<u8>),
	/// `Array` elements.
	Array(Vec<Value>),
	/// `List` elements.
	List(Vec<Value>),
	/// `HashSet` elements in file order; uniqueness is not enforced.
	HashSet(Vec<Value>),
	/// `Queue` elements in file order.
	Queue(Vec<Value>),
	/// `Pair` key and value.
	Pair(Box<(Value, Value)>),
	/// `Dictionary` entries in file order, never sorted or deduplicated.
	Dictionary(Vec<(Value, Value)>),
	/// `UserDefined` object.
	Object(ObjectValue),
}

impl Value {
	/// Stable label for the variant, used in shape errors.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::SByte(_) => "sbyte",
			Self::Byte(_) => "byte",
			Self::Bool(_) => "bool",
			Self::I16(_) => "int16",
			Self::U16(_) => "uint16",
			Self::I32(_) => "int32",
			Self::U32(_) => "uint32",
			Self::I64(_) => "int64",
			Self::U64(_) => "uint64",
			Self::F32(_) => "single",
			Self::F64(_) => "double",
			Self::String(_) => "string",
			Self::Enum(_) => "enum",
			Self::Vector2I { .. } => "vector2i",
			Self::Vector2 { .. } => "vector2",
			Self::Vector3 { .. } => "vector3",
			Self::Colour { .. } => "colour",
			Self::Bytes(_) => "bytes",
			Self::Array(_) => "array",
			Self::List(_) => "list",
			Self::HashSet(_) => "hashset",
			Self::Queue(_) => "queue",
			Self::Pair(_) => "pair",
			Self::Dictionary(_) => "dictionary",
			Self::Object(_) => "object",
		}
	}

	/// Whether this is the null reference.
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	/// Widen any integer or enum variant to `i64`.
	pub fn as_i64(&self) -> Option<i64> {
		match *self {
			Self::SByte(v) => Some(i64::from(v)),
			Self::Byte(v) => Some(i64::from(v)),
			Self::I16(v) => Some(i64::from(v)),
			Self::U16(v) => Some(i64::from(v)),
			Self::I32(v) | Self::Enum(v) => Some(i64::from(v)),
			Self::U32(v) => Some(i64::from(v)),
			Self::I64(v) => Some(v),
			Self::U64(v) => i64::try_from(v).ok(),
			_ => None,
		}
	}

	/// Widen any float variant to `f64`.
	pub fn as_f64(&self) -> Option<f64> {
		match *self {
			Self::F32(v) => Some(f64::from(v)),
			Self::F64(v) => Some(v),
			_ => None,
		}
	}

	/// Boolean payload.
	pub fn as_bool(&self) -> Option<bool> {
		match *self {
			Self::Bool(v) => Some(v != 0),
			_ => None,
		}
	}

	/// String payload.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(v) => Some(v),
			_ => None,
		}
	}

	/// Object payload.
	pub fn as_object(&self) -> Option<&ObjectValue> {
		match self {
			Self::Object(v) => Some(v),
			_ => None,
		}
	}

	/// Mutable object payload.
	pub fn as_object_mut(&mut self) -> Option<&mut ObjectValue> {
		match self {
			Self::Object(v) => Some(v),
			_ => None,
		}
	}

	/// Elements of any non-byte sequence variant.
	pub fn as_seq(&self) -> Option<&[Value]> {
		match self {
			Self::Array(items) | Self::List(items) | Self::HashSet(items) | Self::Queue(items) => Some(items),
			_ => None,
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(u8::from(value))
	}
}

/// Object decoded through a class template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectValue {
	/// Name of the template that laid out this object.
	pub template: Box<str>,
	/// Fields then properties, in template order.
	pub members: Vec<MemberValue>,
}

/// One named member of an [`ObjectValue`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberValue {
	/// Member name.
	pub name: Box<str>,
	/// Member value.
	pub value: Value,
}

impl ObjectValue {
	/// Create an empty object for `template`.
	pub fn new(template: &str) -> Self {
		Self {
			template: template.into(),
			members: Vec::new(),
		}
	}

	/// Look up a member value by name.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.members.iter().find(|member| &*member.name == name).map(|member| &member.value)
	}

	/// Look up a member value by name for mutation.
	pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
		self.members.iter_mut().find(|member| &*member.name == name).map(|member| &mut member.value)
	}

	/// Replace a member value in place, or append it.
	pub fn set(&mut self, name: &str, value: Value) {
		match self.get_mut(name) {
			Some(slot) => *slot = value,
			None => self.members.push(MemberValue { name: name.into(), value }),
		}
	}

	/// Builder-style [`ObjectValue::set`].
	pub fn with(mut self, name: &str, value: Value) -> Self {
		self.set(name, value);
		self
	}
}
