//! Markup formatting for resolved host nodes.
//!
//! Pure functions only: escaping, tag classification, and the fragments
//! the tree walker stitches together (open tag, attributes, close tag,
//! text content).

pub mod attributes;
pub mod style;

use std::borrow::Cow;

pub use attributes::serialize_attributes;
pub use style::serialize_style;

/// Tags that never receive a closing tag and self-close when childless.
pub const VOID_TAGS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
	"source", "track", "wbr",
];

/// Tags whose parser drops a single leading newline of their content.
pub const NEWLINE_EATING_TAGS: &[&str] = &["listing", "pre", "textarea"];

/// Returns `true` for void tags.
pub fn is_void_tag(tag: &str) -> bool {
	VOID_TAGS.contains(&tag)
}

/// Returns `true` for tags that eat a leading newline.
pub fn eats_newline(tag: &str) -> bool {
	NEWLINE_EATING_TAGS.contains(&tag)
}

/// Returns `true` if `tag` is safe to emit as a tag name.
///
/// A tag must start with an ASCII letter followed by letters, digits,
/// `:`, `_`, `.` or `-`.
pub fn is_valid_tag(tag: &str) -> bool {
	let mut chars = tag.chars();
	match chars.next() {
		Some(first) if first.is_ascii_alphabetic() => {
			chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '.' | '-'))
		}
		_ => false,
	}
}

/// Escapes text content and double-quoted attribute values.
///
/// `&`, `<`, `>`, `"` and `'` are replaced by entities; anything else is
/// passed through, borrowed when nothing needed escaping.
pub fn escape(s: &str) -> Cow<'_, str> {
	html_escape::encode_quoted_attribute(s)
}

/// Formats a number the way it reads in markup: integral values without a
/// fractional part, non-finite values by name.
pub fn format_number(n: f64) -> String {
	if n.is_nan() {
		"NaN".to_string()
	} else if n.is_infinite() {
		if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
	} else if n == 0.0 {
		"0".to_string()
	} else if n.fract() == 0.0 && n.abs() < 1e21 {
		format!("{:.0}", n)
	} else {
		format!("{}", n)
	}
}

/// Returns `<tag` followed by the serialized attributes. The caller closes
/// it with `>` or `/>`.
pub fn open_tag(tag: &str, attributes: &str) -> String {
	let mut out = String::with_capacity(tag.len() + attributes.len() + 1);
	out.push('<');
	out.push_str(tag);
	out.push_str(attributes);
	out
}

/// Returns `</tag>`.
pub fn close_tag(tag: &str) -> String {
	format!("</{}>", tag)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("<script>", "&lt;script&gt;")]
	#[case("a&b", "a&amp;b")]
	#[case("\"quoted\"", "&quot;quoted&quot;")]
	#[case("it's", "it&#x27;s")]
	#[case("plain", "plain")]
	fn test_escape(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(escape(input), expected);
	}

	#[rstest]
	fn test_escape_borrows_when_clean() {
		assert!(matches!(escape("nothing to do"), Cow::Borrowed(_)));
	}

	#[rstest]
	#[case("img", true)]
	#[case("br", true)]
	#[case("keygen", true)]
	#[case("div", false)]
	#[case("textarea", false)]
	fn test_is_void_tag(#[case] tag: &str, #[case] expected: bool) {
		assert_eq!(is_void_tag(tag), expected);
	}

	#[rstest]
	#[case("div", true)]
	#[case("my-element", true)]
	#[case("svg:rect", true)]
	#[case("", false)]
	#[case("1div", false)]
	#[case("div onclick=x", false)]
	#[case("a>b", false)]
	fn test_is_valid_tag(#[case] tag: &str, #[case] expected: bool) {
		assert_eq!(is_valid_tag(tag), expected);
	}

	#[rstest]
	#[case(42.0, "42")]
	#[case(-3.0, "-3")]
	#[case(1.5, "1.5")]
	#[case(-0.0, "0")]
	#[case(f64::NAN, "NaN")]
	#[case(f64::NEG_INFINITY, "-Infinity")]
	fn test_format_number(#[case] n: f64, #[case] expected: &str) {
		assert_eq!(format_number(n), expected);
	}

	#[rstest]
	fn test_tags() {
		assert_eq!(open_tag("div", " class=\"x\""), "<div class=\"x\"");
		assert_eq!(close_tag("div"), "</div>");
	}
}
