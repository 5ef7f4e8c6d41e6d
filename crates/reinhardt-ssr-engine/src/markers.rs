//! Reconnection markers embedded in rendered markup.
//!
//! These markers let a client-side reconciler locate the server-rendered
//! root, dynamic text regions and empty render slots. None of them are
//! emitted in static mode.

use crate::markup::escape;

/// Attribute identifying the top-level rendered host node.
pub const ROOT_ATTR: &str = "data-reactroot";

/// Per-node identity attribute used in [`MarkerMode::Identity`](crate::MarkerMode::Identity).
pub const ID_ATTR: &str = "data-reactid";

/// Attribute carrying the checksum of the rendered markup.
pub const CHECKSUM_ATTR: &str = "data-react-checksum";

/// Opens a dynamic text region.
pub const TEXT_START: &str = "<!-- react-text -->";

/// Closes a dynamic text region.
pub const TEXT_END: &str = "<!-- /react-text -->";

/// Placeholder for a `null` render.
pub const EMPTY_PLACEHOLDER: &str = "<!-- react-empty -->";

/// Returns the root marker attribute, including its leading space.
pub fn root_attr() -> String {
	format!(" {}=\"\"", ROOT_ATTR)
}

/// Returns the identity attribute for host node `id`, including its
/// leading space.
pub fn identity_attr(id: u64) -> String {
	format!(" {}=\"{}\"", ID_ATTR, id)
}

/// Returns the markup for a `null` render.
pub fn empty_placeholder(static_markup: bool) -> &'static str {
	if static_markup { "" } else { EMPTY_PLACEHOLDER }
}

/// Escapes `text` and, outside static mode, wraps it in text-boundary
/// comments.
pub fn text_region(text: &str, static_markup: bool) -> String {
	let escaped = escape(text);
	if static_markup {
		escaped.into_owned()
	} else {
		let mut out = String::with_capacity(TEXT_START.len() + escaped.len() + TEXT_END.len());
		out.push_str(TEXT_START);
		out.push_str(&escaped);
		out.push_str(TEXT_END);
		out
	}
}

/// Inserts the checksum attribute into the first tag of `markup`.
///
/// Markup that does not start with an element (an empty placeholder or
/// text) is returned unchanged.
pub fn add_checksum(markup: &str, checksum: u32) -> String {
	if !markup.starts_with('<') || markup.starts_with("<!--") {
		return markup.to_string();
	}
	let Some(end) = markup.find('>') else {
		return markup.to_string();
	};
	let insert_at = if markup[..end].ends_with('/') { end - 1 } else { end };
	let mut out = String::with_capacity(markup.len() + 32);
	out.push_str(&markup[..insert_at]);
	out.push_str(&format!(" {}=\"{}\"", CHECKSUM_ATTR, checksum));
	out.push_str(&markup[insert_at..]);
	out
}

/// Returns the trailer script that attaches `checksum` to the rendered root
/// once the document has been received.
pub fn checksum_trailer(checksum: u32) -> String {
	format!(
		"<script>(function(){{var r=document.querySelector('[{}]');if(r){{r.setAttribute('{}','{}');}}}})();</script>",
		ROOT_ATTR, CHECKSUM_ATTR, checksum
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_root_and_identity_attrs() {
		assert_eq!(root_attr(), " data-reactroot=\"\"");
		assert_eq!(identity_attr(7), " data-reactid=\"7\"");
	}

	#[rstest]
	#[case(false, "<!-- react-text -->a &amp; b<!-- /react-text -->")]
	#[case(true, "a &amp; b")]
	fn test_text_region(#[case] static_markup: bool, #[case] expected: &str) {
		assert_eq!(text_region("a & b", static_markup), expected);
	}

	#[rstest]
	#[case(false, "<!-- react-empty -->")]
	#[case(true, "")]
	fn test_empty_placeholder(#[case] static_markup: bool, #[case] expected: &str) {
		assert_eq!(empty_placeholder(static_markup), expected);
	}

	#[rstest]
	#[case("<div data-reactroot=\"\">x</div>", "<div data-reactroot=\"\" data-react-checksum=\"42\">x</div>")]
	#[case("<img/>", "<img data-react-checksum=\"42\"/>")]
	#[case("<!-- react-empty -->", "<!-- react-empty -->")]
	#[case("plain", "plain")]
	fn test_add_checksum(#[case] markup: &str, #[case] expected: &str) {
		assert_eq!(add_checksum(markup, 42), expected);
	}

	#[rstest]
	fn test_checksum_trailer() {
		let script = checksum_trailer(123);
		assert!(script.starts_with("<script>"));
		assert!(script.contains("[data-reactroot]"));
		assert!(script.contains("'data-react-checksum','123'"));
		assert!(script.ends_with("</script>"));
	}
}
