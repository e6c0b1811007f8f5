use std::fs;

use onisave::save::{Cursor, Result, SaveError, SaveGame, SaveHeader, inflate, read_templates};

use crate::cmd::util::{LoadArgs, emit_json};

#[derive(clap::Args)]
pub struct Args {
	#[command(flatten)]
	pub load: LoadArgs,
	#[arg(long)]
	pub json: bool,
}

#[derive(serde::Serialize)]
struct RoundtripJson {
	path: String,
	compressed: bool,
	original_len: usize,
	encoded_len: usize,
	identical: bool,
}

/// Decode, re-encode, and verify the result matches the input.
///
/// Compressed saves are compared after inflating both bodies.
pub fn run(args: Args) -> Result<()> {
	let Args { load, json } = args;
	let original = fs::read(&load.path)?;
	let save = SaveGame::decode(&original, &load.options())?;
	let encoded = save.encode()?;

	let compressed = save.header.compression.is_compressed();
	let identical = same_content(&original, &encoded)?;

	if json {
		emit_json(&RoundtripJson {
			path: load.path.display().to_string(),
			compressed,
			original_len: original.len(),
			encoded_len: encoded.len(),
			identical,
		})?;
	} else {
		println!("path: {}", load.path.display());
		println!("compressed: {compressed}");
		println!("original_bytes: {}", original.len());
		println!("encoded_bytes: {}", encoded.len());
		println!("identical: {identical}");
	}

	if !identical {
		return Err(SaveError::Io(std::io::Error::other("re-encoded save differs from input")));
	}
	Ok(())
}

/// Compare two save files by header, template table, and inflated body bytes.
pub(crate) fn same_content(left: &[u8], right: &[u8]) -> Result<bool> {
	Ok(split_body(left)? == split_body(right)?)
}

fn split_body(bytes: &[u8]) -> Result<(&[u8], Vec<u8>)> {
	let mut cursor = Cursor::new(bytes);
	let header = SaveHeader::read(&mut cursor)?;
	read_templates(&mut cursor)?;

	let at = cursor.pos();
	let rest = cursor.read_rest();
	let body = if header.compression.is_compressed() { inflate(rest, at)? } else { rest.to_vec() };
	Ok((&bytes[..at], body))
}
