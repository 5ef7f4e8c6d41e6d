//! Element properties.

use serde_json::{Map, Value};

use crate::element::{IntoNode, Node};

/// The properties of an [`Element`](crate::Element).
///
/// Property values are JSON values kept in insertion order, which is also
/// the order host attributes are serialized in. The `children` property is
/// held separately as a [`Node`] because children may contain elements.
#[derive(Debug, Clone, Default)]
pub struct Props {
	values: Map<String, Value>,
	children: Option<Node>,
}

impl Props {
	/// Creates an empty property set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets a property and returns the updated set.
	///
	/// # Example
	///
	/// ```
	/// use reinhardt_ssr_types::Props;
	///
	/// let props = Props::new().with("id", "main").with("hidden", true);
	/// assert_eq!(props.get_str("id"), Some("main"));
	/// ```
	pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.set(name, value);
		self
	}

	/// Sets the children and returns the updated set.
	pub fn with_children(mut self, children: impl IntoNode) -> Self {
		self.children = Some(children.into_node());
		self
	}

	/// Sets a property in place, replacing any previous value.
	pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
		self.values.insert(name.into(), value.into());
	}

	/// Replaces the children in place.
	pub fn set_children(&mut self, children: Option<Node>) {
		self.children = children;
	}

	/// Appends a child, turning a single child into a list when needed.
	pub fn push_child(&mut self, child: Node) {
		self.children = Some(match self.children.take() {
			None => child,
			Some(Node::List(mut list)) => {
				list.push(child);
				Node::List(list)
			}
			Some(existing) => Node::List(vec![existing, child]),
		});
	}

	/// Returns a property value.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.values.get(name)
	}

	/// Returns a property value if it is a string.
	pub fn get_str(&self, name: &str) -> Option<&str> {
		self.values.get(name).and_then(Value::as_str)
	}

	/// Returns `true` if the property is present and not `null`.
	pub fn is_set(&self, name: &str) -> bool {
		self.values.get(name).is_some_and(|v| !v.is_null())
	}

	/// Returns the children, if any.
	pub fn children(&self) -> Option<&Node> {
		self.children.as_ref()
	}

	/// Iterates over the non-children properties in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.values.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Returns the number of non-children properties.
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Returns `true` if there are no properties and no children.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty() && self.children.is_none()
	}
}
