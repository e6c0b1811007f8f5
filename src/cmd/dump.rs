use onisave::save::{Behavior, BehaviorExtra, GameObject, Result};

use crate::cmd::print::{PrintOptions, print_object};
use crate::cmd::util::{LoadArgs, emit_json};

#[derive(clap::Args)]
pub struct Args {
	#[command(flatten)]
	pub load: LoadArgs,
	#[arg(long)]
	pub prefab: String,
	#[arg(long)]
	pub limit: Option<usize>,
	#[arg(long)]
	pub json: bool,
}

#[derive(serde::Serialize)]
struct DumpJson<'a> {
	prefab: &'a str,
	total: usize,
	objects: Vec<&'a GameObject>,
}

/// Print the objects of one prefab with their behaviors.
pub fn run(args: Args) -> Result<()> {
	let Args { load, prefab, limit, json } = args;
	let save = load.load()?;

	let total = save.objects_by_prefab(&prefab).count();
	let objects: Vec<&GameObject> = save.objects_by_prefab(&prefab).take(limit.unwrap_or(usize::MAX)).collect();

	if json {
		return emit_json(&DumpJson {
			prefab: &prefab,
			total,
			objects,
		});
	}

	println!("prefab: {prefab}");
	println!("objects: {total}");
	let opt = PrintOptions::default();
	for (idx, object) in objects.iter().enumerate() {
		let p = object.position;
		println!("[{idx}] position=({}, {}, {}) folder={}", p.x, p.y, p.z, object.folder);
		for behavior in &object.behaviors {
			print_behavior(behavior, &opt);
		}
	}
	Ok(())
}

fn print_behavior(behavior: &Behavior, opt: &PrintOptions) {
	match &behavior.data {
		Some(data) => {
			println!("  {}:", behavior.name);
			print_object(data, 4, opt);
		}
		None => println!("  {}: <{} raw bytes, no template>", behavior.name, behavior.extra_raw.len()),
	}
	if let BehaviorExtra::Storage(items) = &behavior.extra {
		println!("    stored_items: {}", items.len());
		for item in items {
			println!("      {} ({} behaviors)", item.prefab_name, item.object.behaviors.len());
		}
	}
	if behavior.data.is_some() && !behavior.extra_raw.is_empty() {
		println!("    extra_raw: {} bytes", behavior.extra_raw.len());
	}
}
