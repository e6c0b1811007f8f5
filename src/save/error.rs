use thiserror::Error;

use crate::save::TypeCode;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, SaveError>;

/// Errors produced while decoding or encoding save data.
#[derive(Debug, Error)]
pub enum SaveError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Not enough bytes remained for a requested read.
	#[error("out of data at offset {at}, need {need} bytes, remaining {rem}")]
	OutOfData {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// A user-defined type referenced a template absent from the template table.
	#[error("unknown template {name:?} at offset {at}")]
	UnknownTemplate {
		/// Referenced template name.
		name: String,
		/// Cursor offset where the value started.
		at: usize,
	},
	/// Body sentinel did not match the expected literal.
	#[error("sentinel mismatch at {at}: expected {expected:?}, got {got:?}")]
	SentinelMismatch {
		/// Expected 4-byte literal.
		expected: [u8; 4],
		/// Bytes found in the stream.
		got: [u8; 4],
		/// Cursor offset of the sentinel read.
		at: usize,
	},
	/// Body version is outside the configured tolerance.
	#[error("save version {major}.{minor} is incompatible (expected {expected_major}.{expected_minor})")]
	VersionIncompatible {
		/// Supported major version.
		expected_major: i32,
		/// Supported minor version.
		expected_minor: i32,
		/// Major version found in the file.
		major: i32,
		/// Minor version found in the file.
		minor: i32,
	},
	/// Compressed body could not be inflated.
	#[error("failed to decompress save body at offset {at}: {source}")]
	DecompressionFailure {
		/// File offset where the compressed region starts.
		at: usize,
		/// Underlying inflate error.
		source: std::io::Error,
	},
	/// Type descriptor byte carried an unknown type code.
	#[error("unknown type code {code} (info byte 0x{info:02x}) at offset {at}")]
	UnknownTypeCode {
		/// Low six bits of the info byte.
		code: u8,
		/// Full info byte.
		info: u8,
		/// Offset of the info byte.
		at: usize,
	},
	/// Generic flag set on a type code that cannot carry sub-types.
	#[error("type {code:?} marked generic at offset {at}")]
	NonGenericType {
		/// Offending type code.
		code: TypeCode,
		/// Offset of the descriptor.
		at: usize,
	},
	/// Generic descriptor declared the wrong number of sub-types.
	#[error("type {code:?} expects {expected} sub-types, got {got} at offset {at}")]
	GenericArity {
		/// Generic type code.
		code: TypeCode,
		/// Required sub-type count.
		expected: usize,
		/// Declared sub-type count.
		got: usize,
		/// Offset of the count byte.
		at: usize,
	},
	/// Value-type flag on a sequence element that is not user-defined.
	#[error("type {code:?} cannot be decoded as a value type at offset {at}")]
	InvalidValueType {
		/// Element type code.
		code: TypeCode,
		/// Offset of the sequence.
		at: usize,
	},
	/// Template, member, prefab, or behavior name failed validation.
	#[error("invalid identifier at offset {at}: {reason}")]
	InvalidIdentifier {
		/// Offset just past the name.
		at: usize,
		/// Validation failure.
		reason: &'static str,
	},
	/// Count or length field held a negative value other than the null marker.
	#[error("invalid {what} {len} at offset {at}")]
	InvalidLength {
		/// Logical field being read.
		what: &'static str,
		/// Parsed signed value.
		len: i64,
		/// Offset of the field.
		at: usize,
	},
	/// Bytes consumed by a length-prefixed region differ from its declared length.
	#[error("{what} data length mismatch at offset {at}: declared {declared}, consumed {consumed}")]
	DataLengthMismatch {
		/// Region label (template, behavior, or prefab name).
		what: String,
		/// Declared byte length.
		declared: usize,
		/// Bytes actually consumed.
		consumed: usize,
		/// Offset where the region started.
		at: usize,
	},
	/// Literal string marker did not match.
	#[error("expected marker {expected:?} at offset {at}, got {got:?}")]
	UnexpectedMarker {
		/// Expected marker text.
		expected: &'static str,
		/// Text found in the stream.
		got: Option<String>,
		/// Offset just past the marker.
		at: usize,
	},
	/// String bytes were not valid UTF-8.
	#[error("invalid utf-8 string at offset {at}")]
	InvalidUtf8 {
		/// Offset of the string payload.
		at: usize,
	},
	/// Header game-info block was not valid JSON.
	#[error("invalid game info json at offset {at}: {source}")]
	GameInfoJson {
		/// Offset of the JSON block.
		at: usize,
		/// Underlying parser error.
		source: serde_json::Error,
	},
	/// Nested values exceeded the configured depth.
	#[error("decode depth exceeded (max={max_depth}) at offset {at}")]
	DecodeDepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
		/// Offset of the value that crossed the ceiling.
		at: usize,
	},
	/// In-memory value does not match the shape its type requires.
	#[error("shape mismatch at {path}: expected {expected}, got {got}")]
	ShapeMismatch {
		/// Member path of the offending value.
		path: String,
		/// Value kind required by the type.
		expected: &'static str,
		/// Value kind present.
		got: &'static str,
	},
	/// Object value lacks a member its template declares.
	#[error("missing member {member:?} at {path}")]
	MissingMember {
		/// Path of the object value.
		path: String,
		/// Template member name.
		member: String,
	},
	/// Encoding referenced a template absent from the table.
	#[error("unknown template {name:?} while encoding {path}")]
	EncodeUnknownTemplate {
		/// Member path being encoded.
		path: String,
		/// Referenced template name.
		name: String,
	},
	/// Type descriptor is structurally invalid for writing.
	#[error("invalid type info at {path}: {reason}")]
	InvalidTypeInfo {
		/// Path of the descriptor or value.
		path: String,
		/// Violated rule.
		reason: &'static str,
	},
	/// A length or count does not fit the on-disk `i32`.
	#[error("length {len} at {path} does not fit in i32")]
	LengthOverflow {
		/// Member path of the region.
		path: String,
		/// Offending length.
		len: usize,
	},
}
