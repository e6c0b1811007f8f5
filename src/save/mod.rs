mod bytes;
mod compression;
mod decode;
mod encode;
mod error;
mod file;
mod header;
mod objects;
mod query;
mod templates;
mod typeinfo;
mod types;
mod value;

/// Little-endian byte cursor and writer.
pub use bytes::{Cursor, LenMark, NULL_LEN, Writer};
/// Body compression mode and zlib helpers.
pub use compression::{Compression, DEFAULT_LEVEL, deflate, inflate};
/// Template-driven value decoding and options.
pub use decode::{DecodeOptions, SaveVersion, VersionPolicy, decode_object, decode_value};
/// Template-driven value encoding.
pub use encode::ValueEncoder;
/// Error and result aliases.
pub use error::{Result, SaveError};
/// Save container, progress reporting, and write options.
pub use file::{EncodeOptions, Progress, SaveGame, Stage, WORLD_MARKER};
/// Save header and game-info JSON.
pub use header::{GameInfo, SaveHeader};
/// Game object groups and behaviors.
pub use objects::{Behavior, BehaviorExtra, GameObject, GameObjectGroup, ObjectReader, Quaternion, STORAGE_BEHAVIOR, StoredItem, Vector3, write_groups};
/// Convenience projections over a decoded save.
pub use query::ColonyInfo;
/// Template table codec and identifier rules.
pub use templates::{MAX_IDENTIFIER_LEN, TemplateTable, read_identifier, read_templates, validate_identifier, write_templates};
/// Type descriptor codec.
pub use typeinfo::{MAX_TYPE_DEPTH, read_type_info, write_type_info};
/// Type codes, descriptors, and class templates.
pub use types::{ClassTemplate, GENERIC_TYPE_FLAG, TYPE_CODE_MASK, TemplateMember, TypeCode, TypeInfo, VALUE_TYPE_FLAG};
/// Dynamically decoded values.
pub use value::{MemberValue, ObjectValue, Value};
