//! Style object serialization.

use serde_json::{Map, Value};

use super::format_number;

/// Style properties whose numeric values carry no unit.
const UNITLESS_PROPERTIES: &[&str] = &[
	"animationIterationCount",
	"borderImageOutset",
	"borderImageSlice",
	"borderImageWidth",
	"boxFlex",
	"boxFlexGroup",
	"boxOrdinalGroup",
	"columnCount",
	"fillOpacity",
	"flex",
	"flexGrow",
	"flexNegative",
	"flexOrder",
	"flexPositive",
	"flexShrink",
	"floodOpacity",
	"fontWeight",
	"gridColumn",
	"gridRow",
	"lineClamp",
	"lineHeight",
	"opacity",
	"order",
	"orphans",
	"stopOpacity",
	"strokeDasharray",
	"strokeDashoffset",
	"strokeMiterlimit",
	"strokeOpacity",
	"strokeWidth",
	"tabSize",
	"widows",
	"zIndex",
	"zoom",
];

const VENDOR_PREFIXES: &[&str] = &["Webkit", "Moz", "ms", "O"];

fn is_unitless(name: &str) -> bool {
	if UNITLESS_PROPERTIES.contains(&name) {
		return true;
	}
	VENDOR_PREFIXES.iter().any(|prefix| {
		name.strip_prefix(prefix).is_some_and(|rest| {
			let mut chars = rest.chars();
			match chars.next() {
				Some(first) if first.is_ascii_uppercase() => {
					let unprefixed = format!("{}{}", first.to_ascii_lowercase(), chars.as_str());
					UNITLESS_PROPERTIES.contains(&unprefixed.as_str())
				}
				_ => false,
			}
		})
	})
}

/// Converts `camelCase` property names to `kebab-case`; the `ms` vendor
/// prefix becomes `-ms-`.
fn hyphenate(name: &str) -> String {
	let mut out = String::with_capacity(name.len() + 4);
	if name.starts_with("ms") && name[2..].starts_with(|c: char| c.is_ascii_uppercase()) {
		out.push('-');
	}
	for c in name.chars() {
		if c.is_ascii_uppercase() {
			out.push('-');
			out.push(c.to_ascii_lowercase());
		} else {
			out.push(c);
		}
	}
	out
}

fn declaration_value(name: &str, value: &Value) -> Option<String> {
	match value {
		Value::String(s) => {
			let trimmed = s.trim();
			(!trimmed.is_empty()).then(|| trimmed.to_string())
		}
		Value::Number(n) => {
			let n = n.as_f64()?;
			if n == 0.0 || is_unitless(name) {
				Some(format_number(n))
			} else {
				Some(format!("{}px", format_number(n)))
			}
		}
		_ => None,
	}
}

/// Serializes a style object to a CSS declaration string.
///
/// `null`, boolean and empty values are skipped. The result is unescaped;
/// the attribute serializer escapes it with the rest of the value.
///
/// # Example
///
/// ```
/// use reinhardt_ssr_engine::markup::serialize_style;
/// use serde_json::json;
///
/// let style = json!({"backgroundColor": "red", "fontSize": 12, "opacity": 0.5});
/// let css = serialize_style(style.as_object().unwrap());
/// assert_eq!(css, "background-color:red;font-size:12px;opacity:0.5;");
/// ```
pub fn serialize_style(declarations: &Map<String, Value>) -> String {
	let mut css = String::new();
	for (name, value) in declarations {
		if let Some(value) = declaration_value(name, value) {
			css.push_str(&hyphenate(name));
			css.push(':');
			css.push_str(&value);
			css.push(';');
		}
	}
	css
}
