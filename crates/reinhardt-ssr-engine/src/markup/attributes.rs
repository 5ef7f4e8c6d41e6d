//! Host attribute serialization.

use std::borrow::Cow;

use reinhardt_ssr_types::Props;
use serde_json::Value;

use super::{escape, format_number, serialize_style};

/// Props that never become attributes.
const RESERVED_PROPS: &[&str] = &[
	"children",
	"dangerouslySetInnerHTML",
	"ref",
	"key",
	"suppressContentEditableWarning",
];

/// Returns `true` for `on` followed by an uppercase letter (`onClick`).
pub fn is_event_handler(name: &str) -> bool {
	name.strip_prefix("on")
		.is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_uppercase()))
}

/// Maps a namespaced prop (`xlinkHref`, `xmlLang`, `xmlnsXlink`) to its
/// qualified name.
fn namespaced(name: &str) -> Option<String> {
	["xmlns", "xlink", "xml"].iter().find_map(|ns| {
		let rest = name.strip_prefix(ns)?;
		let mut chars = rest.chars();
		let first = chars.next().filter(char::is_ascii_uppercase)?;
		Some(format!(
			"{}:{}{}",
			ns,
			first.to_ascii_lowercase(),
			chars.as_str()
		))
	})
}

/// Returns `true` if `name` can be emitted as an attribute name as is.
///
/// The first character must be an ASCII letter, `:` or `_`; the rest
/// letters, digits, `:`, `_`, `.` or `-`.
pub fn is_valid_attribute_name(name: &str) -> bool {
	let mut chars = name.chars();
	match chars.next() {
		Some(first) if first.is_ascii_alphabetic() || matches!(first, ':' | '_') => {
			chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '.' | '-'))
		}
		_ => false,
	}
}

/// Returns the attribute name for a prop, or `None` if the prop is not
/// rendered as an attribute on `tag`.
fn attribute_name<'a>(tag: &str, name: &'a str, props: &Props) -> Option<Cow<'a, str>> {
	if RESERVED_PROPS.contains(&name) || is_event_handler(name) {
		return None;
	}
	let attr = mapped_name(tag, name, props)?;
	if is_valid_attribute_name(&attr) {
		Some(attr)
	} else {
		tracing::trace!(prop = %name, "dropping prop with an unsafe attribute name");
		None
	}
}

fn mapped_name<'a>(tag: &str, name: &'a str, props: &Props) -> Option<Cow<'a, str>> {
	let form_value_tag = matches!(tag, "textarea" | "select");
	match name {
		"className" => Some(Cow::Borrowed("class")),
		"htmlFor" => Some(Cow::Borrowed("for")),
		"value" | "defaultValue" if form_value_tag => None,
		"defaultValue" if props.is_set("value") => None,
		"defaultValue" => Some(Cow::Borrowed("value")),
		"defaultChecked" if props.is_set("checked") => None,
		"defaultChecked" => Some(Cow::Borrowed("checked")),
		_ => Some(namespaced(name).map_or(Cow::Borrowed(name), Cow::Owned)),
	}
}

/// Stringifies a prop value for an attribute. `None` means omit.
pub fn stringify_value(value: &Value) -> Option<String> {
	match value {
		Value::Null | Value::Bool(_) | Value::Object(_) => None,
		Value::String(s) => Some(s.clone()),
		Value::Number(n) => n.as_f64().map(format_number),
		Value::Array(items) => Some(
			items
				.iter()
				.map(|item| match item {
					Value::Null => String::new(),
					Value::Bool(b) => b.to_string(),
					other => stringify_value(other).unwrap_or_default(),
				})
				.collect::<Vec<_>>()
				.join(","),
		),
	}
}

/// Serializes the attributes of a host element.
///
/// Each attribute is preceded by a space. Props named in `skip` are left
/// out; the caller uses this to take over attributes it computes itself
/// (for example `selected` on options inside a select).
pub fn serialize_attributes(tag: &str, props: &Props, skip: &[&str]) -> String {
	let mut out = String::new();
	for (name, value) in props.iter() {
		if skip.contains(&name) {
			continue;
		}
		let Some(attr) = attribute_name(tag, name, props) else {
			continue;
		};
		match value {
			Value::Bool(true) => {
				out.push(' ');
				out.push_str(&attr);
			}
			Value::Object(declarations) if name == "style" => {
				let css = serialize_style(declarations);
				if !css.is_empty() {
					push_pair(&mut out, &attr, &css);
				}
			}
			other => {
				if let Some(text) = stringify_value(other) {
					push_pair(&mut out, &attr, &text);
				}
			}
		}
	}
	out
}

fn push_pair(out: &mut String, name: &str, value: &str) {
	out.push(' ');
	out.push_str(name);
	out.push_str("=\"");
	out.push_str(&escape(value));
	out.push('"');
}
