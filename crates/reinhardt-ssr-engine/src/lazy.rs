//! Lazily produced output.
//!
//! A [`LazyTree`] is an ordered list of text, deferred producers and
//! subtrees. Producers run the first time the drain reaches them and their
//! result replaces them, so each runs at most once. Draining follows the
//! same budget rule as the tree walker: the budget is checked before each
//! entry, and an entry that starts emitting is not split.

use std::fmt;

use crate::error::RenderResult;
use crate::walker::{Budget, Chunk, OutputFilter};

/// A deferred piece of output.
pub type Producer = Box<dyn FnOnce() -> RenderResult<Produced> + Send>;

/// What a [`Producer`] yields.
#[derive(Debug)]
pub enum Produced {
	Text(String),
	Tree(LazyTree),
}

impl From<String> for Produced {
	fn from(text: String) -> Self {
		Self::Text(text)
	}
}

impl From<LazyTree> for Produced {
	fn from(tree: LazyTree) -> Self {
		Self::Tree(tree)
	}
}

/// An item to enqueue on a [`LazyTree`].
pub enum LazyItem {
	Text(String),
	Producer(Producer),
	Tree(LazyTree),
}

impl LazyItem {
	/// Wraps a closure as a producer item.
	pub fn producer<F>(f: F) -> Self
	where
		F: FnOnce() -> RenderResult<Produced> + Send + 'static,
	{
		Self::Producer(Box::new(f))
	}
}

impl fmt::Debug for LazyItem {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
			Self::Producer(_) => f.write_str("Producer(..)"),
			Self::Tree(tree) => f.debug_tuple("Tree").field(tree).finish(),
		}
	}
}

impl From<String> for LazyItem {
	fn from(text: String) -> Self {
		Self::Text(text)
	}
}

impl From<&str> for LazyItem {
	fn from(text: &str) -> Self {
		Self::Text(text.to_string())
	}
}

impl From<LazyTree> for LazyItem {
	fn from(tree: LazyTree) -> Self {
		Self::Tree(tree)
	}
}

impl From<Produced> for LazyItem {
	fn from(produced: Produced) -> Self {
		match produced {
			Produced::Text(text) => Self::Text(text),
			Produced::Tree(tree) => Self::Tree(tree),
		}
	}
}

#[derive(Debug)]
struct Entry {
	item: LazyItem,
	filter: OutputFilter,
}

/// An ordered collection of lazily produced output.
///
/// # Example
///
/// ```
/// use reinhardt_ssr_engine::lazy::{LazyItem, LazyTree, Produced};
///
/// let mut tree = LazyTree::new();
/// tree.enqueue("<main>");
/// tree.enqueue(LazyItem::producer(|| Ok(Produced::Text("late".to_string()))));
/// tree.enqueue("</main>");
///
/// assert_eq!(tree.drain_to_completion().unwrap(), "<main>late</main>");
/// ```
#[derive(Debug, Default)]
pub struct LazyTree {
	entries: Vec<Entry>,
	next: usize,
}

impl LazyTree {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends an item.
	pub fn enqueue(&mut self, item: impl Into<LazyItem>) -> &mut Self {
		self.enqueue_filtered(item, OutputFilter::Identity)
	}

	/// Appends an item whose first non-empty output passes through `filter`.
	pub fn enqueue_filtered(&mut self, item: impl Into<LazyItem>, filter: OutputFilter) -> &mut Self {
		self.entries.push(Entry {
			item: item.into(),
			filter,
		});
		self
	}

	/// Returns `true` once every entry has been emitted.
	pub fn is_done(&self) -> bool {
		self.next >= self.entries.len()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Emits the next chunk of output.
	pub fn drain(&mut self, budget: Budget) -> RenderResult<Chunk> {
		let mut out = String::new();
		let done = self.drain_into(budget, &mut out)?;
		Ok(Chunk { text: out, done })
	}

	/// Emits everything that is left.
	pub fn drain_to_completion(&mut self) -> RenderResult<String> {
		self.drain(Budget::Unlimited).map(|chunk| chunk.text)
	}

	fn drain_into(&mut self, budget: Budget, out: &mut String) -> RenderResult<bool> {
		while let Some(entry) = self.entries.get_mut(self.next) {
			if budget.is_exhausted(out.len()) {
				return Ok(false);
			}

			let item = std::mem::replace(&mut entry.item, LazyItem::Text(String::new()));
			entry.item = match item {
				LazyItem::Producer(producer) => {
					tracing::trace!(entry = self.next, "running lazy producer");
					producer()?.into()
				}
				other => other,
			};

			match &mut entry.item {
				LazyItem::Text(text) => {
					let text = std::mem::take(text);
					out.push_str(&entry.filter.apply(text));
				}
				LazyItem::Tree(tree) => {
					let start = out.len();
					let done = tree.drain_into(budget, out)?;
					entry.filter.apply_from(out, start);
					if !done {
						return Ok(false);
					}
				}
				LazyItem::Producer(_) => {}
			}

			entry.item = LazyItem::Text(String::new());
			self.next += 1;
		}
		Ok(true)
	}
}
