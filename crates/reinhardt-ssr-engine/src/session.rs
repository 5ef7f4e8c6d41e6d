//! Render sessions and the one-shot render entry points.

use std::sync::Arc;

use adler2::Adler32;
use reinhardt_ssr_types::{IntoNode, Node};

use crate::error::{RenderError, RenderResult};
use crate::markers;
use crate::options::{MarkerMode, RenderOptions};
use crate::walker::{Budget, Chunk, PositionId, PositionSnapshot, RenderStats, TreeWalker};

/// One render of one tree.
///
/// A session is created from a root element and advanced in budgeted steps
/// until it reports `done`. Every session owns its own walk state, so any
/// number of sessions can be in flight at once. A failed advance aborts the
/// session: later calls return the same error.
///
/// # Example
///
/// ```
/// use reinhardt_ssr_engine::{Budget, RenderOptions, RenderSession};
/// use reinhardt_ssr_types::Element;
///
/// let tree = Element::host("ul").children(["a", "b", "c"]);
/// let mut session = RenderSession::new(tree, RenderOptions::static_markup()).unwrap();
///
/// let mut html = String::new();
/// loop {
///     let chunk = session.advance(Budget::bytes(8)).unwrap();
///     html.push_str(&chunk.text);
///     if chunk.done {
///         break;
///     }
/// }
/// assert_eq!(html, "<ul>abc</ul>");
/// ```
#[derive(Debug)]
pub struct RenderSession {
	walker: TreeWalker,
	root: PositionId,
	done: bool,
	failure: Option<RenderError>,
}

impl RenderSession {
	/// Starts a session. The root must be an element.
	pub fn new(root: impl IntoNode, options: RenderOptions) -> RenderResult<Self> {
		Self::with_shared_options(root, Arc::new(options))
	}

	/// Starts a session with options shared between sessions.
	pub fn with_shared_options(root: impl IntoNode, options: Arc<RenderOptions>) -> RenderResult<Self> {
		let root = root.into_node();
		if !matches!(root, Node::Element(_)) {
			return Err(RenderError::InvalidElement {
				found: node_kind(&root),
			});
		}

		tracing::debug!(
			static_markup = options.static_markup,
			marker_mode = ?options.marker_mode,
			"Starting render session"
		);
		let mut walker = TreeWalker::new(options);
		let root = walker.root(root);
		Ok(Self {
			walker,
			root,
			done: false,
			failure: None,
		})
	}

	/// Emits the next chunk of markup.
	///
	/// Once the session is done, further calls return an empty chunk with
	/// `done` set.
	pub fn advance(&mut self, budget: Budget) -> RenderResult<Chunk> {
		if let Some(err) = &self.failure {
			return Err(err.clone());
		}
		if self.done {
			return Ok(Chunk {
				text: String::new(),
				done: true,
			});
		}

		match self.walker.advance(self.root, budget) {
			Ok(chunk) => {
				if chunk.done {
					self.done = true;
					let stats = self.walker.stats();
					tracing::debug!(
						components = stats.components_resolved,
						positions = stats.positions,
						advances = stats.advance_calls,
						"Render session finished"
					);
				}
				Ok(chunk)
			}
			Err(err) => {
				tracing::debug!(error = %err, "Render session aborted");
				self.failure = Some(err.clone());
				Err(err)
			}
		}
	}

	/// Emits everything that is left.
	pub fn render_to_end(&mut self) -> RenderResult<String> {
		self.advance(Budget::Unlimited).map(|chunk| chunk.text)
	}

	pub fn is_done(&self) -> bool {
		self.done
	}

	pub fn stats(&self) -> RenderStats {
		self.walker.stats()
	}

	pub fn options(&self) -> &RenderOptions {
		self.walker.options()
	}

	/// Captures the walk state of every position created so far.
	pub fn snapshot(&self) -> Vec<PositionSnapshot> {
		self.walker.arena().snapshot()
	}
}

fn node_kind(node: &Node) -> &'static str {
	match node {
		Node::Element(_) => "element",
		Node::Text(_) => "text",
		Node::Number(_) => "number",
		Node::List(_) => "list",
		Node::Null => "null",
		Node::Bool(_) => "boolean",
		Node::Undefined => "undefined",
	}
}

/// Adler-32 checksum of `markup`'s UTF-8 bytes.
pub fn checksum(markup: &str) -> u32 {
	let mut hasher = Adler32::new();
	hasher.write_slice(markup.as_bytes());
	hasher.checksum()
}

/// Renders `root` to a string with reconnection markers.
pub fn render_to_string(root: impl IntoNode) -> RenderResult<String> {
	render_with_options(root, RenderOptions::new())
}

/// Renders `root` to plain markup with no markers.
pub fn render_to_static_markup(root: impl IntoNode) -> RenderResult<String> {
	render_with_options(root, RenderOptions::static_markup())
}

/// Renders `root` to a string with `options`.
///
/// In [`MarkerMode::Identity`] the checksum of the markup is added to the
/// first tag.
pub fn render_with_options(root: impl IntoNode, options: RenderOptions) -> RenderResult<String> {
	let identity = options.marker_mode == MarkerMode::Identity && !options.static_markup;
	let markup = RenderSession::new(root, options)?.render_to_end()?;
	if identity {
		Ok(markers::add_checksum(&markup, checksum(&markup)))
	} else {
		Ok(markup)
	}
}
