//! Elements and render nodes.
//!
//! A [`Node`] is anything that can appear in a render tree: an [`Element`],
//! a primitive (text or number), a list of nodes, or one of the terminal
//! values `Null`, `Bool` and `Undefined`.
//!
//! Elements are immutable once shared. The builder methods take `self` by
//! value and copy on write, so an element that has been cloned into
//! another tree is never modified behind that tree's back.

use std::borrow::Cow;
use std::sync::Arc;

use serde_json::Value;

use crate::component::{Component, ComponentClass, StatelessComponent, class_of};
use crate::props::Props;

/// A node in an unresolved render tree.
#[derive(Debug, Clone)]
pub enum Node {
	/// A host element or a component reference.
	Element(Element),
	/// A text primitive.
	Text(Cow<'static, str>),
	/// A numeric primitive.
	Number(f64),
	/// A (possibly nested) list of nodes, flattened when rendered.
	List(Vec<Node>),
	/// The explicit empty value. Renders the empty placeholder.
	Null,
	/// A boolean. Renders nothing.
	Bool(bool),
	/// The absence of a value. Renders nothing as a child, but is an
	/// error when returned from a component.
	Undefined,
}

impl Node {
	/// Creates a text node.
	pub fn text(content: impl Into<Cow<'static, str>>) -> Self {
		Self::Text(content.into())
	}

	/// Creates a list node.
	pub fn list(children: impl IntoIterator<Item = impl IntoNode>) -> Self {
		Self::List(children.into_iter().map(IntoNode::into_node).collect())
	}

	/// Returns the element if this node is one.
	pub fn as_element(&self) -> Option<&Element> {
		match self {
			Self::Element(el) => Some(el),
			_ => None,
		}
	}

	/// Returns `true` for text and number nodes.
	pub fn is_primitive(&self) -> bool {
		matches!(self, Self::Text(_) | Self::Number(_))
	}
}

impl From<Element> for Node {
	fn from(el: Element) -> Self {
		Self::Element(el)
	}
}

impl From<&'static str> for Node {
	fn from(text: &'static str) -> Self {
		Self::Text(Cow::Borrowed(text))
	}
}

impl From<String> for Node {
	fn from(text: String) -> Self {
		Self::Text(Cow::Owned(text))
	}
}

/// What an element refers to.
#[derive(Clone)]
pub enum ElementKind {
	/// A markup tag such as `div`.
	Host(Cow<'static, str>),
	/// A stateful component class.
	Stateful(Arc<dyn ComponentClass>),
	/// A plain function component.
	Stateless(StatelessComponent),
}

impl ElementKind {
	/// Returns the tag name or the component's display name.
	pub fn name(&self) -> &str {
		match self {
			Self::Host(tag) => tag,
			Self::Stateful(class) => class.name(),
			Self::Stateless(component) => component.name(),
		}
	}
}

impl std::fmt::Debug for ElementKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Host(tag) => f.debug_tuple("Host").field(tag).finish(),
			Self::Stateful(class) => f.debug_tuple("Stateful").field(&class.name()).finish(),
			Self::Stateless(component) => f
				.debug_tuple("Stateless")
				.field(&component.name())
				.finish(),
		}
	}
}

#[derive(Debug, Clone)]
struct ElementInner {
	kind: ElementKind,
	props: Props,
	key: Option<Cow<'static, str>>,
}

/// An immutable description of something to render.
///
/// Cloning an element is cheap: clones share the same description.
#[derive(Debug, Clone)]
pub struct Element {
	inner: Arc<ElementInner>,
}

impl Element {
	/// Creates an element from a kind and its props.
	pub fn new(kind: ElementKind, props: Props) -> Self {
		Self {
			inner: Arc::new(ElementInner {
				kind,
				props,
				key: None,
			}),
		}
	}

	/// Creates a host element for a markup tag.
	pub fn host(tag: impl Into<Cow<'static, str>>) -> Self {
		Self::new(ElementKind::Host(tag.into()), Props::new())
	}

	/// Creates an element referring to a stateful component.
	///
	/// # Example
	///
	/// ```ignore
	/// let el = Element::component::<Greeting>().prop("name", "World");
	/// ```
	pub fn component<C: Component>() -> Self {
		Self::new(ElementKind::Stateful(class_of::<C>()), Props::new())
	}

	/// Creates an element referring to a stateless component.
	pub fn stateless(component: StatelessComponent) -> Self {
		Self::new(ElementKind::Stateless(component), Props::new())
	}

	/// Sets a property.
	pub fn prop(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.inner_mut().props.set(name, value);
		self
	}

	/// Replaces all props, keeping children already set unless `props`
	/// carries its own.
	pub fn props(mut self, props: Props) -> Self {
		let inner = self.inner_mut();
		let children = inner.props.children().cloned();
		inner.props = props;
		if inner.props.children().is_none() {
			inner.props.set_children(children);
		}
		self
	}

	/// Appends a child.
	pub fn child(mut self, child: impl IntoNode) -> Self {
		self.inner_mut().props.push_child(child.into_node());
		self
	}

	/// Replaces the children with a list.
	pub fn children(mut self, children: impl IntoIterator<Item = impl IntoNode>) -> Self {
		self.inner_mut()
			.props
			.set_children(Some(Node::list(children)));
		self
	}

	/// Sets the `style` property from a JSON object of declarations.
	pub fn style(self, declarations: Value) -> Self {
		self.prop("style", declarations)
	}

	/// Sets raw inner HTML, which replaces any children when rendered.
	pub fn inner_html(self, html: impl Into<String>) -> Self {
		let mut object = serde_json::Map::new();
		object.insert("__html".to_string(), Value::String(html.into()));
		self.prop("dangerouslySetInnerHTML", Value::Object(object))
	}

	/// Sets the reconciliation key.
	pub fn key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
		self.inner_mut().key = Some(key.into());
		self
	}

	/// Returns what this element refers to.
	pub fn kind(&self) -> &ElementKind {
		&self.inner.kind
	}

	/// Returns the element's props.
	pub fn get_props(&self) -> &Props {
		&self.inner.props
	}

	/// Returns the reconciliation key.
	pub fn get_key(&self) -> Option<&str> {
		self.inner.key.as_deref()
	}

	/// Returns the tag name if this is a host element.
	pub fn tag(&self) -> Option<&str> {
		match &self.inner.kind {
			ElementKind::Host(tag) => Some(tag),
			_ => None,
		}
	}

	/// Returns `true` if this element refers to a component.
	pub fn is_component(&self) -> bool {
		!matches!(self.inner.kind, ElementKind::Host(_))
	}

	fn inner_mut(&mut self) -> &mut ElementInner {
		Arc::make_mut(&mut self.inner)
	}
}

/// Trait for types that can be converted into a [`Node`].
pub trait IntoNode {
	/// Converts self into a node.
	fn into_node(self) -> Node;
}

impl IntoNode for Node {
	fn into_node(self) -> Node {
		self
	}
}

impl IntoNode for Element {
	fn into_node(self) -> Node {
		Node::Element(self)
	}
}

impl IntoNode for &'static str {
	fn into_node(self) -> Node {
		Node::Text(Cow::Borrowed(self))
	}
}

impl IntoNode for String {
	fn into_node(self) -> Node {
		Node::Text(Cow::Owned(self))
	}
}

impl IntoNode for &String {
	fn into_node(self) -> Node {
		Node::Text(Cow::Owned(self.clone()))
	}
}

impl IntoNode for bool {
	fn into_node(self) -> Node {
		Node::Bool(self)
	}
}

impl IntoNode for () {
	fn into_node(self) -> Node {
		Node::Undefined
	}
}

macro_rules! impl_into_node_for_number {
	($($ty:ty),*) => {
		$(
			impl IntoNode for $ty {
				fn into_node(self) -> Node {
					Node::Number(self as f64)
				}
			}
		)*
	};
}

impl_into_node_for_number!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64);

impl<T: IntoNode> IntoNode for Option<T> {
	fn into_node(self) -> Node {
		match self {
			Some(value) => value.into_node(),
			None => Node::Null,
		}
	}
}

impl<T: IntoNode> IntoNode for Vec<T> {
	fn into_node(self) -> Node {
		Node::list(self)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_host_element_builder() {
		let el = Element::host("div")
			.prop("id", "root")
			.child("a")
			.child(Element::host("span"));

		assert_eq!(el.tag(), Some("div"));
		assert!(!el.is_component());
		assert_eq!(el.get_props().get_str("id"), Some("root"));
		assert!(matches!(el.get_props().children(), Some(Node::List(list)) if list.len() == 2));
	}

	#[rstest]
	fn test_shared_element_is_not_mutated() {
		let shared = Element::host("p").prop("id", "one");
		let derived = shared.clone().prop("id", "two");

		assert_eq!(shared.get_props().get_str("id"), Some("one"));
		assert_eq!(derived.get_props().get_str("id"), Some("two"));
	}

	#[rstest]
	#[case(Some("x").into_node(), true)]
	#[case(None::<&str>.into_node(), false)]
	fn test_option_into_node(#[case] node: Node, #[case] is_text: bool) {
		assert_eq!(matches!(node, Node::Text(_)), is_text);
		if !is_text {
			assert!(matches!(node, Node::Null));
		}
	}

	#[rstest]
	fn test_numbers_into_node() {
		assert!(matches!(42u8.into_node(), Node::Number(n) if n == 42.0));
		assert!(matches!(1.5f64.into_node(), Node::Number(n) if n == 1.5));
	}

	#[rstest]
	fn test_props_replacement_keeps_children() {
		let el = Element::host("ul")
			.child("item")
			.props(Props::new().with("className", "list"));

		assert_eq!(el.get_props().get_str("className"), Some("list"));
		assert!(el.get_props().children().is_some());
	}

	#[rstest]
	fn test_inner_html_prop() {
		let el = Element::host("div").inner_html("<b>x</b>");
		let html = el
			.get_props()
			.get("dangerouslySetInnerHTML")
			.and_then(|v| v.get("__html"))
			.and_then(Value::as_str);
		assert_eq!(html, Some("<b>x</b>"));
	}
}
