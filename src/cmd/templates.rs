use onisave::save::{ClassTemplate, Result, SaveError, TemplateMember, TypeInfo};

use crate::cmd::util::{LoadArgs, emit_json};

#[derive(clap::Args)]
pub struct Args {
	#[command(flatten)]
	pub load: LoadArgs,
	#[arg(long)]
	pub name: Option<String>,
	#[arg(long)]
	pub json: bool,
}

/// List class templates, or print one template's members.
pub fn run(args: Args) -> Result<()> {
	let Args { load, name, json } = args;
	let save = load.load()?;

	let selected: Vec<&ClassTemplate> = match &name {
		Some(name) => {
			let template = save.template(name).ok_or_else(|| SaveError::UnknownTemplate { name: name.clone(), at: 0 })?;
			vec![template]
		}
		None => save.templates.iter().collect(),
	};

	if json {
		return emit_json(&selected);
	}

	if name.is_none() {
		println!("templates: {}", selected.len());
		for template in selected {
			println!("  {} fields={} properties={}", template.name, template.fields.len(), template.properties.len());
		}
		return Ok(());
	}

	for template in selected {
		println!("template: {}", template.name);
		print_members("fields", &template.fields);
		print_members("properties", &template.properties);
	}
	Ok(())
}

fn print_members(label: &str, members: &[TemplateMember]) {
	println!("{label}: {}", members.len());
	for member in members {
		println!("  {}: {}", member.name, type_label(&member.ty));
	}
}

/// Render a descriptor as `Code<Sub, ...>` with the template name where present.
pub(crate) fn type_label(ty: &TypeInfo) -> String {
	let mut out = match ty.template_name() {
		Some(name) => name.to_owned(),
		None => format!("{:?}", ty.code),
	};
	if !ty.sub_types.is_empty() {
		let subs: Vec<String> = ty.sub_types.iter().map(type_label).collect();
		out.push('<');
		out.push_str(&subs.join(", "));
		out.push('>');
	}
	if ty.is_value_type {
		out.push_str(" (value)");
	}
	out
}
