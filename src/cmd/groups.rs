use onisave::save::Result;

use crate::cmd::util::{LoadArgs, emit_json};

#[derive(clap::Args)]
pub struct Args {
	#[command(flatten)]
	pub load: LoadArgs,
	#[arg(long)]
	pub json: bool,
}

#[derive(serde::Serialize)]
struct GroupJson<'a> {
	prefab: &'a str,
	objects: usize,
}

#[derive(serde::Serialize)]
struct GroupsJson<'a> {
	object_count: usize,
	groups: Vec<GroupJson<'a>>,
}

/// Print object counts per prefab.
pub fn run(args: Args) -> Result<()> {
	let Args { load, json } = args;
	let save = load.load()?;
	let counts = save.prefab_counts();

	if json {
		return emit_json(&GroupsJson {
			object_count: save.object_count(),
			groups: counts.into_iter().map(|(prefab, objects)| GroupJson { prefab, objects }).collect(),
		});
	}

	println!("groups: {}", save.groups.len());
	println!("objects: {}", save.object_count());
	for (prefab, objects) in counts {
		println!("  {prefab}: {objects}");
	}
	Ok(())
}
