use std::path::PathBuf;

use onisave::save::{DecodeOptions, Result, SaveGame, VersionPolicy};

/// Input path and version-check flags shared by every command.
#[derive(clap::Args)]
pub struct LoadArgs {
	pub path: PathBuf,
	/// Accept any minor version of the supported major.
	#[arg(long)]
	pub lenient: bool,
	/// Skip the body version check entirely.
	#[arg(long = "no-version-check")]
	pub no_version_check: bool,
}

impl LoadArgs {
	/// Decode options selected by the flags.
	pub(crate) fn options(&self) -> DecodeOptions {
		let version_policy = if self.no_version_check {
			VersionPolicy::Skip
		} else if self.lenient {
			VersionPolicy::AllowMinorMismatch
		} else {
			VersionPolicy::Exact
		};
		DecodeOptions {
			version_policy,
			..DecodeOptions::default()
		}
	}

	/// Read and decode the save at `path`.
	pub(crate) fn load(&self) -> Result<SaveGame> {
		SaveGame::open(&self.path, &self.options())
	}
}

/// Print a serializable payload as pretty JSON on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) -> Result<()> {
	let text = serde_json::to_string_pretty(payload).map_err(std::io::Error::from)?;
	println!("{text}");
	Ok(())
}

/// Render a four-byte code as printable ASCII.
pub(crate) fn render_code(code: [u8; 4]) -> String {
	code.iter()
		.map(|&byte| if byte.is_ascii_graphic() || byte == b' ' { char::from(byte) } else { '.' })
		.collect()
}
