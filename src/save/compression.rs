use std::io::{Read, Write};

use flate2::Compression as Level;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::save::{Result, SaveError};

/// Compression level used by the game when writing saves.
pub const DEFAULT_LEVEL: u32 = 9;

/// Compression mode of a save body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Compression {
	/// Body stored as-is.
	None,
	/// Body stored as one zlib stream.
	Zlib,
}

impl Compression {
	/// Map the header flag to a compression mode.
	pub fn from_flag(compressed: bool) -> Self {
		if compressed { Self::Zlib } else { Self::None }
	}

	/// Whether the body is compressed.
	pub fn is_compressed(self) -> bool {
		self == Self::Zlib
	}

	/// Render compression mode as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Zlib => "zlib",
		}
	}
}

/// Inflate a zlib body; `at` is the file offset reported on failure.
pub fn inflate(raw: &[u8], at: usize) -> Result<Vec<u8>> {
	let mut decoder = ZlibDecoder::new(raw);
	let mut out = Vec::with_capacity(raw.len().saturating_mul(4));
	decoder
		.read_to_end(&mut out)
		.map_err(|source| SaveError::DecompressionFailure { at, source })?;
	Ok(out)
}

/// Deflate a body into one zlib stream.
pub fn deflate(body: &[u8], level: u32) -> Result<Vec<u8>> {
	let mut encoder = ZlibEncoder::new(Vec::with_capacity(body.len() / 2), Level::new(level));
	encoder.write_all(body)?;
	Ok(encoder.finish()?)
}
