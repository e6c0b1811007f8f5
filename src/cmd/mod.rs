/// Object dump command.
pub mod dump;
/// Object group listing command.
pub mod groups;
/// Header and colony summary command.
pub mod info;
/// Decoded value printer.
pub mod print;
/// Decode/encode verification command.
pub mod roundtrip;
/// Template table listing command.
pub mod templates;
/// Shared CLI helpers.
pub mod util;
