//! Full-document rendering.
//!
//! A [`PageShell`] describes the document around a rendered tree. The page
//! is built as a [`LazyTree`]: the head is plain text, and the body is a
//! producer that renders the tree when the drain first reaches it.

use reinhardt_ssr_types::IntoNode;

use crate::error::RenderResult;
use crate::lazy::{LazyItem, LazyTree, Produced};
use crate::markers;
use crate::markup::escape;
use crate::options::RenderOptions;
use crate::session::{RenderSession, checksum};

/// The document surrounding a rendered tree.
#[derive(Debug, Clone)]
pub struct PageShell {
	/// Language attribute for the `html` element.
	pub lang: String,
	pub title: Option<String>,
	/// `(name, content)` pairs rendered as `meta` tags.
	pub meta: Vec<(String, String)>,
	/// Raw markup appended to the head as is.
	pub head: Vec<String>,
	/// Id of the element the tree is mounted into.
	pub mount_id: String,
	pub options: RenderOptions,
}

impl Default for PageShell {
	fn default() -> Self {
		Self {
			lang: "en".to_string(),
			title: None,
			meta: Vec::new(),
			head: Vec::new(),
			mount_id: "app".to_string(),
			options: RenderOptions::default(),
		}
	}
}

impl PageShell {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the language.
	pub fn lang(mut self, lang: impl Into<String>) -> Self {
		self.lang = lang.into();
		self
	}

	/// Sets the title.
	pub fn title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	/// Adds a `meta` tag.
	pub fn meta(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
		self.meta.push((name.into(), content.into()));
		self
	}

	/// Adds raw head markup.
	pub fn head_markup(mut self, markup: impl Into<String>) -> Self {
		self.head.push(markup.into());
		self
	}

	pub fn mount_id(mut self, id: impl Into<String>) -> Self {
		self.mount_id = id.into();
		self
	}

	pub fn options(mut self, options: RenderOptions) -> Self {
		self.options = options;
		self
	}

	fn head_section(&self) -> String {
		let mut html = String::with_capacity(512);

		html.push_str("<!DOCTYPE html>\n");
		html.push_str(&format!("<html lang=\"{}\">\n", escape(&self.lang)));
		html.push_str("<head>\n");
		html.push_str("<meta charset=\"UTF-8\">\n");
		html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");

		if let Some(ref title) = self.title {
			html.push_str(&format!("<title>{}</title>\n", escape(title)));
		}
		for (name, content) in &self.meta {
			html.push_str(&format!(
				"<meta name=\"{}\" content=\"{}\">\n",
				escape(name),
				escape(content)
			));
		}
		for markup in &self.head {
			html.push_str(markup);
			html.push('\n');
		}

		html.push_str("</head>\n");
		html.push_str("<body>\n");
		html.push_str(&format!("<div id=\"{}\">", escape(&self.mount_id)));
		html
	}

	/// Builds the document for `root` without rendering it yet.
	///
	/// The root is validated here; the tree itself renders when the body is
	/// drained. Outside static mode with the trailer enabled, the checksum
	/// script follows the mount element.
	pub fn document(&self, root: impl IntoNode) -> RenderResult<LazyTree> {
		let mut session = RenderSession::new(root, self.options.clone())?;
		let trailer = self.options.emits_trailer();

		let mut page = LazyTree::new();
		page.enqueue(self.head_section());
		page.enqueue(LazyItem::producer(move || {
			let body = session.render_to_end()?;
			let mut tree = LazyTree::new();
			tree.enqueue("</div>\n");
			if trailer {
				tree.enqueue(markers::checksum_trailer(checksum(&body)));
				tree.enqueue("\n");
			}
			let mut section = LazyTree::new();
			section.enqueue(body).enqueue(tree);
			Ok(Produced::Tree(section))
		}));
		page.enqueue("</body>\n</html>");
		Ok(page)
	}

	/// Renders the full document for `root`.
	pub fn render(&self, root: impl IntoNode) -> RenderResult<String> {
		self.document(root)?.drain_to_completion()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::RenderError;
	use crate::walker::Budget;
	use reinhardt_ssr_types::{Element, Node};
	use rstest::rstest;

	#[rstest]
	fn test_static_page() {
		let page = PageShell::new()
			.title("Home & Away")
			.meta("description", "A \"test\"")
			.options(RenderOptions::static_markup())
			.render(Element::host("h1").child("Hello"))
			.unwrap();

		assert!(page.starts_with("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n"));
		assert!(page.contains("<title>Home &amp; Away</title>\n"));
		assert!(page.contains("<meta name=\"description\" content=\"A &quot;test&quot;\">\n"));
		assert!(page.contains("<div id=\"app\"><h1>Hello</h1></div>\n</body>\n</html>"));
		assert!(!page.contains("<script>"));
	}

	#[rstest]
	fn test_page_with_trailer() {
		let page = PageShell::new().render(Element::host("main")).unwrap();
		let body = "<main data-reactroot=\"\"></main>";
		let expected = format!(
			"<div id=\"app\">{}</div>\n{}\n</body>",
			body,
			markers::checksum_trailer(checksum(body))
		);
		assert!(page.contains(&expected));
	}

	#[rstest]
	fn test_body_renders_lazily() {
		let mut page = PageShell::new()
			.options(RenderOptions::static_markup())
			.document(Element::host("p"))
			.unwrap();
		let head = page.drain(Budget::bytes(1)).unwrap();
		assert!(head.text.ends_with("<div id=\"app\">"));
		assert!(!head.done);
		assert_eq!(page.drain(Budget::bytes(1)).unwrap().text, "<p></p>");
	}

	#[rstest]
	fn test_invalid_root_fails_early() {
		assert!(matches!(
			PageShell::new().document(Node::Null),
			Err(RenderError::InvalidElement { found: "null" })
		));
	}
}
