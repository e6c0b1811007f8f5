use std::fmt::Write as _;

use onisave::save::{ObjectValue, Value};

/// Output truncation limits for decoded values.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
	/// Maximum number of elements printed for sequences and dictionaries.
	pub max_items: usize,
	/// Maximum number of characters printed for strings.
	pub max_string_len: usize,
	/// Maximum nesting printed before eliding.
	pub max_depth: u32,
}

impl Default for PrintOptions {
	fn default() -> Self {
		Self {
			max_items: 8,
			max_string_len: 120,
			max_depth: 4,
		}
	}
}

/// Print an object's members one per line, indented.
pub fn print_object(object: &ObjectValue, indent: usize, opt: &PrintOptions) {
	let pad = " ".repeat(indent);
	for member in &object.members {
		println!("{pad}{}: {}", member.name, render_value(&member.value, opt));
	}
}

/// Render a value on one line, eliding past the configured limits.
pub fn render_value(value: &Value, opt: &PrintOptions) -> String {
	let mut out = String::new();
	render_into(&mut out, value, opt, 0);
	out
}

fn render_into(out: &mut String, value: &Value, opt: &PrintOptions, depth: u32) {
	match value {
		Value::Null => out.push_str("null"),
		Value::SByte(v) => push_display(out, v),
		Value::Byte(v) => push_display(out, v),
		Value::Bool(0) => out.push_str("false"),
		Value::Bool(1) => out.push_str("true"),
		Value::Bool(v) => {
			let _ = write!(out, "true(0x{v:02x})");
		}
		Value::I16(v) => push_display(out, v),
		Value::U16(v) => push_display(out, v),
		Value::I32(v) => push_display(out, v),
		Value::U32(v) => push_display(out, v),
		Value::I64(v) => push_display(out, v),
		Value::U64(v) => push_display(out, v),
		Value::F32(v) => push_display(out, v),
		Value::F64(v) => push_display(out, v),
		Value::Enum(v) => {
			let _ = write!(out, "enum({v})");
		}
		Value::String(v) => {
			let clipped: String = v.chars().take(opt.max_string_len).collect();
			let _ = write!(out, "{clipped:?}");
			if clipped.len() < v.len() {
				out.push('…');
			}
		}
		Value::Vector2I { x, y } => {
			let _ = write!(out, "({x}, {y})");
		}
		Value::Vector2 { x, y } => {
			let _ = write!(out, "({x}, {y})");
		}
		Value::Vector3 { x, y, z } => {
			let _ = write!(out, "({x}, {y}, {z})");
		}
		Value::Colour { r, g, b, a } => {
			let _ = write!(out, "#{r:02x}{g:02x}{b:02x}{a:02x}");
		}
		Value::Bytes(bytes) => {
			let _ = write!(out, "<{} bytes>", bytes.len());
		}
		Value::Array(items) | Value::List(items) | Value::HashSet(items) | Value::Queue(items) => {
			if depth >= opt.max_depth {
				let _ = write!(out, "[… {} items]", items.len());
				return;
			}
			out.push('[');
			for (idx, item) in items.iter().take(opt.max_items).enumerate() {
				if idx > 0 {
					out.push_str(", ");
				}
				render_into(out, item, opt, depth + 1);
			}
			push_elided(out, items.len(), opt.max_items);
			out.push(']');
		}
		Value::Pair(pair) => {
			out.push('(');
			render_into(out, &pair.0, opt, depth + 1);
			out.push_str(", ");
			render_into(out, &pair.1, opt, depth + 1);
			out.push(')');
		}
		Value::Dictionary(entries) => {
			if depth >= opt.max_depth {
				let _ = write!(out, "{{… {} entries}}", entries.len());
				return;
			}
			out.push('{');
			for (idx, (key, item)) in entries.iter().take(opt.max_items).enumerate() {
				if idx > 0 {
					out.push_str(", ");
				}
				render_into(out, key, opt, depth + 1);
				out.push_str(": ");
				render_into(out, item, opt, depth + 1);
			}
			push_elided(out, entries.len(), opt.max_items);
			out.push('}');
		}
		Value::Object(object) => {
			if depth >= opt.max_depth {
				let _ = write!(out, "{} {{…}}", object.template);
				return;
			}
			let _ = write!(out, "{} {{", object.template);
			for (idx, member) in object.members.iter().enumerate() {
				if idx > 0 {
					out.push(',');
				}
				let _ = write!(out, " {}: ", member.name);
				render_into(out, &member.value, opt, depth + 1);
			}
			out.push_str(" }");
		}
	}
}

fn push_display(out: &mut String, value: impl std::fmt::Display) {
	let _ = write!(out, "{value}");
}

fn push_elided(out: &mut String, len: usize, shown: usize) {
	if len > shown {
		let _ = write!(out, ", … {} more", len - shown);
	}
}
