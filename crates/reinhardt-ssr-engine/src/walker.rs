//! Incremental tree walker.
//!
//! The walker owns a [`PositionArena`] and advances a depth-first,
//! pre-order traversal over it with an explicit work stack. Each call to
//! [`TreeWalker::advance`] appends markup until the budget is spent or the
//! tree is done. Remaining work stays in the arena, so the next call
//! resumes exactly where the previous one stopped.
//!
//! The budget is checked at child boundaries only. A position that starts
//! emitting (an open tag, a text region, a close tag) finishes that piece,
//! so one call may overshoot the budget by one piece. Concatenating the
//! chunks of any sequence of budgets yields the same markup as a single
//! unbudgeted call.

pub mod position;

use std::borrow::Cow;
use std::sync::Arc;

use reinhardt_ssr_types::{Context, Element, Node, Props};
use serde::Serialize;
use serde_json::Value;

pub use position::{OutputFilter, Phase, PositionArena, PositionId, PositionSnapshot};
use position::{Children, Position, Slot};

use crate::error::{RenderError, RenderResult};
use crate::markers;
use crate::markup::{
	self, attributes::stringify_value, close_tag, eats_newline, escape, format_number, is_valid_tag,
	is_void_tag, open_tag,
};
use crate::options::{MarkerMode, RenderOptions};
use crate::resolver::ComponentResolver;

/// How much output one advance may produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
	/// Run to completion.
	Unlimited,
	/// Stop at the first child boundary once this many bytes are emitted.
	Bytes(usize),
}

impl Budget {
	/// A byte budget. Zero is raised to one so every advance makes progress.
	pub fn bytes(n: usize) -> Self {
		Self::Bytes(n.max(1))
	}

	/// Returns `true` once `emitted` bytes use up the budget.
	pub fn is_exhausted(&self, emitted: usize) -> bool {
		match self {
			Self::Unlimited => false,
			Self::Bytes(n) => emitted >= *n,
		}
	}
}

/// Output of one advance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chunk {
	pub text: String,
	/// `true` once the whole tree has been emitted.
	pub done: bool,
}

/// Counters collected over a render session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderStats {
	/// Component elements resolved (stateful and stateless).
	pub components_resolved: usize,
	/// Queued state updates applied during mounting.
	pub updates_applied: usize,
	/// Tree positions created.
	pub positions: usize,
	/// Calls to advance.
	pub advance_calls: usize,
}

/// Drives the traversal of one tree.
#[derive(Debug)]
pub struct TreeWalker {
	arena: PositionArena,
	resolver: ComponentResolver,
	options: Arc<RenderOptions>,
	stats: RenderStats,
	next_identity: u64,
}

impl TreeWalker {
	pub fn new(options: Arc<RenderOptions>) -> Self {
		Self {
			arena: PositionArena::new(),
			resolver: ComponentResolver::new(options.max_component_depth),
			options,
			stats: RenderStats::default(),
			next_identity: 0,
		}
	}

	/// Creates the root position for `node`.
	pub fn root(&mut self, node: Node) -> PositionId {
		self.alloc(Position::new(node, true, Arc::new(Context::new()), None))
	}

	pub fn arena(&self) -> &PositionArena {
		&self.arena
	}

	pub fn stats(&self) -> RenderStats {
		self.stats
	}

	pub fn options(&self) -> &RenderOptions {
		&self.options
	}

	fn alloc(&mut self, position: Position) -> PositionId {
		self.stats.positions += 1;
		self.arena.alloc(position)
	}

	/// Emits markup for the subtree at `root` until `budget` is spent.
	pub fn advance(&mut self, root: PositionId, budget: Budget) -> RenderResult<Chunk> {
		self.stats.advance_calls += 1;
		let static_markup = self.options.static_markup;
		let mut out = String::new();
		let mut stack = vec![root];

		while let Some(&id) = stack.last() {
			if self.arena.get(id).phase == Phase::Unresolved {
				self.open(id, &mut out)?;
			}

			if self.arena.get(id).phase == Phase::Done {
				stack.pop();
				if let Some(&parent) = stack.last() {
					if let Children::Active { index, .. } = &mut self.arena.get_mut(parent).children {
						*index += 1;
					}
					self.arena.get_mut(id).retire();
				}
				continue;
			}

			let remaining = match &self.arena.get(id).children {
				Children::Active { slots, index } => slots.len().saturating_sub(*index),
				_ => 0,
			};
			if remaining == 0 {
				self.close(id, &mut out);
				continue;
			}

			if budget.is_exhausted(out.len()) {
				return Ok(Chunk { text: out, done: false });
			}

			let position = self.arena.get_mut(id);
			let Children::Active { slots, index } = &mut position.children else {
				continue;
			};
			let emitted = match &mut slots[*index] {
				Slot::Child(child) => {
					// Output below this point belongs to the child.
					position.filter = OutputFilter::Identity;
					stack.push(*child);
					continue;
				}
				// Text regions are never filtered, with or without markers.
				Slot::Text(text) => markers::text_region(text, static_markup),
				Slot::Markup(markup) => position.filter.apply(std::mem::take(markup)),
			};
			*index += 1;
			out.push_str(&emitted);
		}

		Ok(Chunk { text: out, done: true })
	}

	fn open(&mut self, id: PositionId, out: &mut String) -> RenderResult<()> {
		let static_markup = self.options.static_markup;
		let position = self.arena.get_mut(id);
		let node = std::mem::replace(&mut position.node, Node::Undefined);
		let context = Arc::clone(&position.context);

		let resolved = self.resolver.resolve(node, context, &mut self.stats)?;
		let position = self.arena.get_mut(id);
		position.context = resolved.context;

		match resolved.node {
			Node::Element(element) => {
				position.node = Node::Element(element.clone());
				return self.open_host(id, &element, out);
			}
			Node::Text(text) => out.push_str(&markers::text_region(&text, static_markup)),
			Node::Number(n) => out.push_str(&markers::text_region(&format_number(n), static_markup)),
			Node::Null => out.push_str(markers::empty_placeholder(static_markup)),
			Node::Bool(_) | Node::Undefined => {}
			Node::List(_) => {
				return Err(RenderError::UnsupportedElementType(
					"a list cannot be rendered as a single node".to_string(),
				));
			}
		}
		position.children = Children::Released;
		position.phase = Phase::Done;
		Ok(())
	}

	fn open_host(&mut self, id: PositionId, element: &Element, out: &mut String) -> RenderResult<()> {
		let Some(tag) = element.tag() else {
			return Err(RenderError::UnsupportedElementType(format!(
				"{:?} is not a host element",
				element.kind()
			)));
		};
		if !is_valid_tag(tag) {
			return Err(RenderError::UnsupportedElementType(format!(
				"invalid tag name \"{}\"",
				tag
			)));
		}
		let props = element.get_props();
		let static_markup = self.options.static_markup;
		let (is_root, inherited_select) = {
			let position = self.arena.get(id);
			(position.is_root, position.select.clone())
		};

		let mut attributes = match (&inherited_select, tag) {
			(Some(selected), "option") => {
				let mut attributes = markup::serialize_attributes(tag, props, &["selected"]);
				let value = option_value(props);
				if selected.iter().any(|s| *s == value) {
					attributes.push_str(" selected");
				}
				attributes
			}
			_ => markup::serialize_attributes(tag, props, &[]),
		};
		if !static_markup {
			if is_root {
				attributes.push_str(&markers::root_attr());
			}
			if self.options.marker_mode == MarkerMode::Identity {
				self.next_identity += 1;
				attributes.push_str(&markers::identity_attr(self.next_identity));
			}
		}

		out.push_str(&open_tag(tag, &attributes));

		if is_void_tag(tag) {
			if has_content(props) {
				return Err(RenderError::VoidElementChildren {
					tag: tag.to_string(),
				});
			}
			out.push_str("/>");
			let position = self.arena.get_mut(id);
			position.children = Children::Released;
			position.phase = Phase::Done;
			return Ok(());
		}
		out.push('>');

		let select = if tag == "select" {
			selected_values(props)
		} else {
			inherited_select
		};
		let slots = self.materialize(id, tag, props, select);

		let position = self.arena.get_mut(id);
		position.children = Children::Active { slots, index: 0 };
		position.phase = Phase::Opened;
		position.filter = if eats_newline(tag) {
			OutputFilter::LeadingNewline
		} else {
			OutputFilter::Identity
		};
		Ok(())
	}

	fn close(&mut self, id: PositionId, out: &mut String) {
		let position = self.arena.get_mut(id);
		if let Some(tag) = position.node.as_element().and_then(Element::tag) {
			out.push_str(&close_tag(tag));
		}
		position.children = Children::Released;
		position.phase = Phase::Done;
	}

	/// Turns the content of a host element into slots.
	fn materialize(
		&mut self,
		parent: PositionId,
		tag: &str,
		props: &Props,
		select: Option<Arc<[String]>>,
	) -> Vec<Slot> {
		if let Some(html) = inner_html(props) {
			return vec![Slot::Markup(html.to_string())];
		}
		if tag == "textarea" {
			return textarea_value(props)
				.map(|value| vec![Slot::Markup(escape(&value).into_owned())])
				.unwrap_or_default();
		}
		match props.children() {
			None => Vec::new(),
			Some(Node::Text(text)) => vec![Slot::Markup(escape(text).into_owned())],
			Some(Node::Number(n)) => vec![Slot::Markup(format_number(*n))],
			Some(children) => {
				let context = Arc::clone(&self.arena.get(parent).context);
				let mut slots = Vec::new();
				self.flatten(children, &context, &select, &mut slots);
				slots
			}
		}
	}

	fn flatten(
		&mut self,
		node: &Node,
		context: &Arc<Context>,
		select: &Option<Arc<[String]>>,
		slots: &mut Vec<Slot>,
	) {
		match node {
			Node::List(items) => {
				for item in items {
					self.flatten(item, context, select, slots);
				}
			}
			Node::Bool(_) | Node::Undefined => {}
			Node::Text(text) => slots.push(Slot::Text(text.clone())),
			Node::Number(n) => slots.push(Slot::Text(Cow::Owned(format_number(*n)))),
			Node::Null | Node::Element(_) => {
				let child = self.alloc(Position::new(
					node.clone(),
					false,
					Arc::clone(context),
					select.clone(),
				));
				slots.push(Slot::Child(child));
			}
		}
	}
}

fn is_set(value: Option<&Value>) -> Option<&Value> {
	value.filter(|v| !v.is_null())
}

fn inner_html(props: &Props) -> Option<&str> {
	props
		.get("dangerouslySetInnerHTML")
		.and_then(|v| v.get("__html"))
		.and_then(Value::as_str)
		.filter(|html| !html.is_empty())
}

/// Returns `true` if a void element was given anything to put inside it.
fn has_content(props: &Props) -> bool {
	let children = !matches!(props.children(), None | Some(Node::Null | Node::Undefined));
	let html = is_set(props.get("dangerouslySetInnerHTML")).is_some();
	children || html
}

fn primitive_text(node: &Node, out: &mut String) {
	match node {
		Node::Text(text) => out.push_str(text),
		Node::Number(n) => out.push_str(&format_number(*n)),
		Node::List(items) => items.iter().for_each(|item| primitive_text(item, out)),
		_ => {}
	}
}

fn textarea_value(props: &Props) -> Option<String> {
	if let Some(value) = is_set(props.get("value")).or_else(|| is_set(props.get("defaultValue"))) {
		return stringify_value(value);
	}
	let children = props.children()?;
	let mut text = String::new();
	primitive_text(children, &mut text);
	Some(text)
}

/// The value an option submits: its `value` prop, or its text content.
fn option_value(props: &Props) -> String {
	if let Some(value) = is_set(props.get("value")) {
		return stringify_value(value).unwrap_or_default();
	}
	let mut text = String::new();
	if let Some(children) = props.children() {
		primitive_text(children, &mut text);
	}
	text
}

/// The selected value set of a select, from `value` or `defaultValue`.
fn selected_values(props: &Props) -> Option<Arc<[String]>> {
	let value = is_set(props.get("value")).or_else(|| is_set(props.get("defaultValue")))?;
	let values: Vec<String> = match value {
		Value::Array(items) => items.iter().filter_map(stringify_value).collect(),
		other => stringify_value(other).into_iter().collect(),
	};
	Some(values.into())
}

#[cfg(test)]
mod tests {
	use super::*;
	use reinhardt_ssr_types::IntoNode;
	use rstest::rstest;
	use serde_json::json;

	fn walk(node: impl IntoNode, options: RenderOptions) -> RenderResult<String> {
		let mut walker = TreeWalker::new(Arc::new(options));
		let root = walker.root(node.into_node());
		walker.advance(root, Budget::Unlimited).map(|chunk| chunk.text)
	}

	fn walk_static(node: impl IntoNode) -> String {
		walk(node, RenderOptions::static_markup()).unwrap()
	}

	#[rstest]
	fn test_nested_static_markup() {
		let tree = Element::host("span").child(Element::host("div").child("inner text"));
		assert_eq!(walk_static(tree), "<span><div>inner text</div></span>");
	}

	#[rstest]
	fn test_root_marker_and_text_regions() {
		let tree = Element::host("p").children(["a", "b"]);
		assert_eq!(
			walk(tree, RenderOptions::new()).unwrap(),
			"<p data-reactroot=\"\"><!-- react-text -->a<!-- /react-text --><!-- react-text -->b<!-- /react-text --></p>"
		);
	}

	#[rstest]
	fn test_single_text_child_is_plain_content() {
		let tree = Element::host("div").child("x < y");
		assert_eq!(
			walk(tree, RenderOptions::new()).unwrap(),
			"<div data-reactroot=\"\">x &lt; y</div>"
		);
	}

	#[rstest]
	fn test_null_and_false_children() {
		let tree = Element::host("div").child(Node::Null);
		assert_eq!(
			walk(tree, RenderOptions::new()).unwrap(),
			"<div data-reactroot=\"\"><!-- react-empty --></div>"
		);
		let tree = Element::host("div").child(false);
		assert_eq!(
			walk(tree, RenderOptions::new()).unwrap(),
			"<div data-reactroot=\"\"></div>"
		);
	}

	#[rstest]
	fn test_void_tags() {
		assert_eq!(walk_static(Element::host("img").prop("src", "a.png")), "<img src=\"a.png\"/>");
		assert_eq!(
			walk(Element::host("br").child("x"), RenderOptions::static_markup()),
			Err(RenderError::VoidElementChildren {
				tag: "br".to_string()
			})
		);
	}

	#[rstest]
	#[case("\nHello", "<pre>\n\nHello</pre>")]
	#[case("Hello", "<pre>Hello</pre>")]
	fn test_pre_leading_newline(#[case] text: &'static str, #[case] expected: &str) {
		assert_eq!(walk_static(Element::host("pre").child(text)), expected);
	}

	#[rstest]
	fn test_textarea_value() {
		let tree = Element::host("textarea").prop("value", "\nfoo & bar");
		assert_eq!(walk_static(tree), "<textarea>\n\nfoo &amp; bar</textarea>");

		let tree = Element::host("textarea").child("from children");
		assert_eq!(walk_static(tree), "<textarea>from children</textarea>");
	}

	#[rstest]
	fn test_select_marks_selected_options() {
		let tree = Element::host("select").prop("value", json!(["b", "c"])).children([
			Element::host("option").prop("value", "a").child("A"),
			Element::host("option").prop("value", "b").child("B"),
			Element::host("option").child("c"),
		]);
		assert_eq!(
			walk_static(tree),
			"<select><option value=\"a\">A</option><option value=\"b\" selected>B</option><option selected>c</option></select>"
		);
	}

	#[rstest]
	fn test_inner_html_replaces_children() {
		let tree = Element::host("div")
			.inner_html("<b>raw</b>")
			.child("ignored");
		assert_eq!(walk_static(tree), "<div><b>raw</b></div>");
	}

	#[rstest]
	fn test_identity_markers_count_in_pre_order() {
		let tree = Element::host("ul").children([
			Element::host("li").child(Element::host("b")),
			Element::host("li"),
		]);
		let options = RenderOptions::new().with_marker_mode(MarkerMode::Identity);
		assert_eq!(
			walk(tree, options).unwrap(),
			"<ul data-reactroot=\"\" data-reactid=\"1\"><li data-reactid=\"2\"><b data-reactid=\"3\"></b></li><li data-reactid=\"4\"></li></ul>"
		);
	}

	#[rstest]
	fn test_invalid_tag_is_rejected() {
		let result = walk(Element::host("bad tag"), RenderOptions::new());
		assert!(matches!(result, Err(RenderError::UnsupportedElementType(_))));
	}

	#[rstest]
	fn test_budget_resumes_at_child_boundaries() {
		let tree = Element::host("ul").children((0..5).map(|i| Element::host("li").child(i)));
		let expected = walk_static(tree.clone());

		let mut walker = TreeWalker::new(Arc::new(RenderOptions::static_markup()));
		let root = walker.root(tree.into_node());
		let mut chunks = Vec::new();
		loop {
			let chunk = walker.advance(root, Budget::bytes(1)).unwrap();
			chunks.push(chunk.text);
			if chunk.done {
				break;
			}
		}

		assert!(chunks.len() > 5);
		assert_eq!(chunks.concat(), expected);
		assert_eq!(walker.stats().positions, 6);
		assert_eq!(walker.arena().phase(root), Some(Phase::Done));
	}

	#[rstest]
	fn test_budget_zero_is_raised() {
		assert_eq!(Budget::bytes(0), Budget::Bytes(1));
		assert!(!Budget::Unlimited.is_exhausted(usize::MAX));
	}
}
