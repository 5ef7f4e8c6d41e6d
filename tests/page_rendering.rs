//! Page Rendering Tests
//!
//! Full documents rendered through the facade crate.

use reinhardt_ssr::engine::markers::checksum_trailer;
use reinhardt_ssr::prelude::*;
use reinhardt_ssr::{LazyItem, LazyTree, PageShell, Produced, checksum};
use rstest::rstest;

struct Layout;

impl Component for Layout {
	fn create(_props: &Props, _context: &Context) -> Self {
		Layout
	}

	fn name() -> &'static str {
		"Layout"
	}

	fn child_context_types() -> Option<&'static [&'static str]> {
		Some(&["locale"])
	}

	fn child_context(&self) -> Option<Context> {
		Some(Context::new().with("locale", "fr"))
	}

	fn render(&self) -> Node {
		let footer = StatelessComponent::new("Footer", |_props, ctx| {
			let locale = ctx.get("locale").and_then(|v| v.as_str()).unwrap_or("?");
			Element::host("footer").child(locale.to_string()).into_node()
		})
		.with_context_types(&["locale"]);

		Element::host("main")
			.child(Element::host("pre").child("\ncode"))
			.child(Element::stateless(footer))
			.into_node()
	}
}

/// Tests a full page with the checksum trailer
#[rstest]
fn test_page_with_trailer() {
	let html = PageShell::new()
		.lang("fr")
		.title("Accueil")
		.render(Element::component::<Layout>())
		.unwrap();

	let body = "<main data-reactroot=\"\"><pre>\n\ncode</pre><footer>fr</footer></main>";
	assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"fr\">\n"));
	assert!(html.contains("<title>Accueil</title>"));
	assert!(html.contains(&format!(
		"<div id=\"app\">{}</div>\n{}\n</body>\n</html>",
		body,
		checksum_trailer(checksum(body))
	)));
}

/// Tests that the body of a page matches a plain render
#[rstest]
fn test_page_body_matches_string_render() {
	let html = PageShell::new()
		.mount_id("root")
		.options(RenderOptions::static_markup())
		.render(Element::component::<Layout>())
		.unwrap();
	let body = render_to_static_markup(Element::component::<Layout>()).unwrap();
	assert!(html.contains(&format!("<div id=\"root\">{}</div>", body)));
}

/// Tests composing sessions inside a lazy tree
#[rstest]
fn test_lazy_tree_of_sessions() {
	let mut tree = LazyTree::new();
	tree.enqueue("<ul>");
	for i in 0..3 {
		tree.enqueue(LazyItem::producer(move || {
			let item = Element::host("li").child(i);
			render_to_static_markup(item).map(Produced::Text)
		}));
	}
	tree.enqueue("</ul>");

	let mut out = String::new();
	loop {
		let chunk = tree.drain(Budget::bytes(2)).unwrap();
		out.push_str(&chunk.text);
		if chunk.done {
			break;
		}
	}
	assert_eq!(out, "<ul><li>0</li><li>1</li><li>2</li></ul>");
}

/// Tests the prelude stream entry point
#[rstest]
#[tokio::test]
async fn test_prelude_stream() {
	use futures::StreamExt;

	let mut stream = render_to_stream(
		Element::host("p").child("streamed"),
		RenderOptions::static_markup().with_chunk_size(3),
	)
	.unwrap();
	let mut out = Vec::new();
	while let Some(item) = stream.next().await {
		out.extend_from_slice(&item.unwrap());
	}
	assert_eq!(out, b"<p>streamed</p>");
}
