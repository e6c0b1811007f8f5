use std::collections::HashMap;

use tracing::{debug, warn};

use crate::save::bytes::{Cursor, Writer};
use crate::save::typeinfo::{read_type_info, write_type_info};
use crate::save::{ClassTemplate, Result, SaveError, TemplateMember};

/// Identifiers at or above this length indicate a misaligned read.
pub const MAX_IDENTIFIER_LEN: usize = 512;

/// Ordered class templates with a name lookup.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemplateTable {
	templates: Vec<ClassTemplate>,
	by_name: HashMap<Box<str>, usize>,
}

impl TemplateTable {
	/// Build a table, keeping file order; the first template wins on duplicate names.
	pub fn new(templates: Vec<ClassTemplate>) -> Self {
		let mut by_name = HashMap::with_capacity(templates.len());
		for (idx, template) in templates.iter().enumerate() {
			if by_name.contains_key(&template.name) {
				warn!(name = %template.name, index = idx, "duplicate template name, keeping first");
				continue;
			}
			by_name.insert(template.name.clone(), idx);
		}
		Self { templates, by_name }
	}

	/// Look up a template by class name.
	pub fn get(&self, name: &str) -> Option<&ClassTemplate> {
		self.by_name.get(name).map(|idx| &self.templates[*idx])
	}

	/// Whether a template named `name` exists.
	pub fn contains(&self, name: &str) -> bool {
		self.by_name.contains_key(name)
	}

	/// Templates in file order.
	pub fn iter(&self) -> std::slice::Iter<'_, ClassTemplate> {
		self.templates.iter()
	}

	/// Template count, duplicates included.
	pub fn len(&self) -> usize {
		self.templates.len()
	}

	/// Whether the table has no templates.
	pub fn is_empty(&self) -> bool {
		self.templates.is_empty()
	}

	/// Borrow templates in file order.
	pub fn as_slice(&self) -> &[ClassTemplate] {
		&self.templates
	}
}

impl<'a> IntoIterator for &'a TemplateTable {
	type Item = &'a ClassTemplate;
	type IntoIter = std::slice::Iter<'a, ClassTemplate>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

/// Read the template table at the cursor.
pub fn read_templates(cursor: &mut Cursor<'_>) -> Result<TemplateTable> {
	let start = cursor.pos();
	let count = cursor.read_len("template count")?;
	let mut templates = Vec::with_capacity(count.min(cursor.remaining()));
	for _ in 0..count {
		templates.push(read_template(cursor)?);
	}
	debug!(offset = start, count, "read template table");
	Ok(TemplateTable::new(templates))
}

/// Write the template table in its original order.
pub fn write_templates(writer: &mut Writer, table: &TemplateTable) -> Result<()> {
	writer.write_len(table.len(), "templates")?;
	for template in table {
		write_template(writer, template)?;
	}
	Ok(())
}

fn read_template(cursor: &mut Cursor<'_>) -> Result<ClassTemplate> {
	let name = read_identifier(cursor)?;
	let field_count = cursor.read_len("field count")?;
	let property_count = cursor.read_len("property count")?;

	let fields = read_members(cursor, field_count)?;
	let properties = read_members(cursor, property_count)?;

	Ok(ClassTemplate {
		name: name.into_boxed_str(),
		fields,
		properties,
	})
}

fn read_members(cursor: &mut Cursor<'_>, count: usize) -> Result<Vec<TemplateMember>> {
	let mut members = Vec::with_capacity(count.min(cursor.remaining()));
	for _ in 0..count {
		let name = read_identifier(cursor)?;
		let ty = read_type_info(cursor)?;
		members.push(TemplateMember {
			name: name.into_boxed_str(),
			ty,
		});
	}
	Ok(members)
}

fn write_template(writer: &mut Writer, template: &ClassTemplate) -> Result<()> {
	writer.write_string(Some(&*template.name), &template.name)?;
	writer.write_len(template.fields.len(), &template.name)?;
	writer.write_len(template.properties.len(), &template.name)?;
	for member in template.members() {
		let path = format!("{}.{}", template.name, member.name);
		writer.write_string(Some(&*member.name), &path)?;
		write_type_info(writer, &member.ty, &path)?;
	}
	Ok(())
}

/// Read a length-prefixed string that must be a valid class or member identifier.
pub fn read_identifier(cursor: &mut Cursor<'_>) -> Result<String> {
	let name = cursor.read_string()?;
	let at = cursor.pos();
	let Some(name) = name else {
		return Err(SaveError::InvalidIdentifier {
			at,
			reason: "identifier must not be null",
		});
	};
	validate_identifier(&name).map_err(|reason| SaveError::InvalidIdentifier { at, reason })?;
	Ok(name)
}

/// Check identifier shape, returning the violated rule on failure.
pub fn validate_identifier(name: &str) -> std::result::Result<(), &'static str> {
	if name.is_empty() {
		return Err("identifier must not be empty");
	}
	if name.chars().count() >= MAX_IDENTIFIER_LEN {
		return Err("identifier exceeds 511 characters");
	}
	if name.chars().any(|ch| u32::from(ch) < 0x20) {
		return Err("identifier contains control characters");
	}
	Ok(())
}
