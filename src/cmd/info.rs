use onisave::save::{ColonyInfo, Result};

use crate::cmd::util::{LoadArgs, emit_json, render_code};

#[derive(clap::Args)]
pub struct Args {
	#[command(flatten)]
	pub load: LoadArgs,
	#[arg(long)]
	pub json: bool,
}

#[derive(serde::Serialize)]
struct InfoJson<'a> {
	path: String,
	header_version: u32,
	compression: &'static str,
	sentinel: String,
	sim_data_len: usize,
	game_data_len: usize,
	colony: ColonyInfo,
	game_info: &'a serde_json::Map<String, serde_json::Value>,
}

/// Print header fields and a colony summary.
pub fn run(args: Args) -> Result<()> {
	let Args { load, json } = args;
	let save = load.load()?;
	let colony = save.colony_info();

	if json {
		return emit_json(&InfoJson {
			path: load.path.display().to_string(),
			header_version: save.header.header_version,
			compression: save.header.compression.as_str(),
			sentinel: render_code(save.sentinel),
			sim_data_len: save.sim_data.len(),
			game_data_len: save.game_data.len(),
			colony,
			game_info: save.header.game_info.values(),
		});
	}

	println!("path: {}", load.path.display());
	println!("build_version: {}", colony.build_version);
	println!("header_version: {}", save.header.header_version);
	println!("compression: {}", save.header.compression.as_str());
	println!("save_version: {}.{}", colony.version.major, colony.version.minor);
	println!("sentinel: {}", render_code(save.sentinel));
	println!("base_name: {}", colony.base_name.as_deref().unwrap_or("-"));
	println!("cycles: {}", opt_label(colony.cycles));
	println!("duplicants: {}", opt_label(colony.duplicants));
	println!("dlc_id: {}", colony.dlc_id.as_deref().filter(|id| !id.is_empty()).unwrap_or("-"));
	println!("cluster_id: {}", colony.cluster_id.as_deref().unwrap_or("-"));
	println!("world_type: {}", save.world.template);
	println!("settings_type: {}", save.settings.template);
	println!("templates: {}", colony.template_count);
	println!("groups: {}", colony.group_count);
	println!("objects: {}", colony.object_count);
	println!("sim_data_bytes: {}", save.sim_data.len());
	println!("game_data_bytes: {}", save.game_data.len());
	Ok(())
}

fn opt_label(value: Option<i64>) -> String {
	value.map_or_else(|| "-".to_owned(), |item| item.to_string())
}
