//! Context propagated from ancestor components to descendants.
//!
//! A component only ever sees a *masked* view of the context: the keys it
//! declares through [`Component::context_types`](crate::Component::context_types).
//! Reading an undeclared key yields `None`; it never fails and never leaks a
//! value the component did not ask for.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A keyed set of context values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
	values: Map<String, Value>,
}

impl Context {
	/// Creates an empty context.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a value and returns the updated context.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.insert(key, value);
		self
	}

	/// Adds a value in place.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
		self.values.insert(key.into(), value.into());
	}

	/// Returns the value for `key`.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.values.get(key)
	}

	/// Returns `true` if `key` is present.
	pub fn contains_key(&self, key: &str) -> bool {
		self.values.contains_key(key)
	}

	/// Iterates over the keys in insertion order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.values.keys().map(String::as_str)
	}

	/// Returns the number of values.
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Returns `true` if there are no values.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Returns the view restricted to `keys`.
	///
	/// Keys that are declared but not provided are simply absent.
	///
	/// # Example
	///
	/// ```
	/// use reinhardt_ssr_types::Context;
	///
	/// let ctx = Context::new().with("text", "purple").with("other", "x");
	/// let masked = ctx.masked(&["text"]);
	/// assert_eq!(masked.get("text").and_then(|v| v.as_str()), Some("purple"));
	/// assert!(masked.get("other").is_none());
	/// ```
	pub fn masked(&self, keys: &[&str]) -> Context {
		let values = keys
			.iter()
			.filter_map(|key| {
				self.values
					.get(*key)
					.map(|value| ((*key).to_string(), value.clone()))
			})
			.collect();
		Context { values }
	}

	/// Returns this context with `other` layered on top.
	pub fn merged(&self, other: &Context) -> Context {
		let mut values = self.values.clone();
		for (key, value) in &other.values {
			values.insert(key.clone(), value.clone());
		}
		Context { values }
	}
}
