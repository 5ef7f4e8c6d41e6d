//! Tree positions and the arena that owns them.

use std::borrow::Cow;
use std::sync::Arc;

use reinhardt_ssr_types::{Context, ElementKind, Node};
use serde::Serialize;

/// Handle to a [`Position`] in a [`PositionArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PositionId(usize);

impl PositionId {
	/// Returns the arena index.
	pub fn index(self) -> usize {
		self.0
	}
}

/// Lifecycle of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
	/// Not resolved yet; no output emitted.
	Unresolved,
	/// Open tag emitted; children are being walked.
	Opened,
	/// All output emitted.
	Done,
}

/// Transformation applied to the first non-empty content a host position
/// emits directly: text content, a textarea value or inner HTML.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFilter {
	/// Output passes through unchanged.
	#[default]
	Identity,
	/// A leading `\n` is doubled so the parser's newline eating keeps one.
	LeadingNewline,
}

impl OutputFilter {
	/// Applies the filter to `text`. An armed filter disarms itself on the
	/// first non-empty text it sees.
	pub fn apply(&mut self, text: String) -> String {
		match self {
			Self::Identity => text,
			Self::LeadingNewline if text.is_empty() => text,
			Self::LeadingNewline => {
				*self = Self::Identity;
				if text.starts_with('\n') {
					let mut out = String::with_capacity(text.len() + 1);
					out.push('\n');
					out.push_str(&text);
					out
				} else {
					text
				}
			}
		}
	}

	/// Applies the filter in place to output appended to `out` after `start`.
	pub fn apply_from(&mut self, out: &mut String, start: usize) {
		if *self == Self::LeadingNewline && out.len() > start {
			if out[start..].starts_with('\n') {
				out.insert(start, '\n');
			}
			*self = Self::Identity;
		}
	}
}

/// One materialized child of an opened host position.
#[derive(Debug)]
pub(crate) enum Slot {
	/// A primitive from a child list; emitted as a text region.
	Text(Cow<'static, str>),
	/// Content emitted verbatim: escaped text content, textarea value or
	/// inner HTML.
	Markup(String),
	/// A child position.
	Child(PositionId),
}

/// Children of a position.
#[derive(Debug, Default)]
pub(crate) enum Children {
	/// Not materialized yet.
	#[default]
	Pending,
	/// Materialized; `index` is the next slot to emit.
	Active { slots: Vec<Slot>, index: usize },
	/// Fully emitted and dropped.
	Released,
}

/// Walk state for one node of the tree.
#[derive(Debug)]
pub(crate) struct Position {
	pub node: Node,
	pub is_root: bool,
	pub context: Arc<Context>,
	/// Selected values of the nearest enclosing `select`.
	pub select: Option<Arc<[String]>>,
	pub phase: Phase,
	pub children: Children,
	pub filter: OutputFilter,
}

impl Position {
	pub fn new(
		node: Node,
		is_root: bool,
		context: Arc<Context>,
		select: Option<Arc<[String]>>,
	) -> Self {
		Self {
			node,
			is_root,
			context,
			select,
			phase: Phase::Unresolved,
			children: Children::Pending,
			filter: OutputFilter::Identity,
		}
	}

	/// Drops everything a finished position no longer needs.
	pub fn retire(&mut self) {
		self.node = Node::Undefined;
		self.select = None;
		self.children = Children::Released;
		self.phase = Phase::Done;
	}

	fn label(&self) -> Cow<'static, str> {
		match &self.node {
			Node::Element(el) => match el.kind() {
				ElementKind::Host(tag) => tag.clone(),
				kind => Cow::Owned(kind.name().to_string()),
			},
			Node::Text(_) | Node::Number(_) => Cow::Borrowed("#text"),
			Node::List(_) => Cow::Borrowed("#list"),
			Node::Null => Cow::Borrowed("#null"),
			Node::Bool(_) => Cow::Borrowed("#bool"),
			Node::Undefined if self.phase == Phase::Done => Cow::Borrowed("#retired"),
			Node::Undefined => Cow::Borrowed("#undefined"),
		}
	}
}

/// Serializable view of a position, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionSnapshot {
	pub id: PositionId,
	pub label: String,
	pub phase: Phase,
	pub is_root: bool,
	/// `(next, total)` slots while the position is opened.
	pub progress: Option<(usize, usize)>,
}

/// Owns every position of a render session.
///
/// Positions refer to their children by [`PositionId`], so the tree has no
/// owning pointers between nodes. Finished positions are retired in place
/// and keep their slot so ids stay stable.
#[derive(Debug, Default)]
pub struct PositionArena {
	positions: Vec<Position>,
}

impl PositionArena {
	pub fn new() -> Self {
		Self::default()
	}

	pub(crate) fn alloc(&mut self, position: Position) -> PositionId {
		let id = PositionId(self.positions.len());
		self.positions.push(position);
		id
	}

	/// Number of positions allocated so far.
	pub fn len(&self) -> usize {
		self.positions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.positions.is_empty()
	}

	/// Returns the phase of `id`, or `None` for a foreign id.
	pub fn phase(&self, id: PositionId) -> Option<Phase> {
		self.positions.get(id.0).map(|p| p.phase)
	}

	pub(crate) fn get(&self, id: PositionId) -> &Position {
		&self.positions[id.0]
	}

	pub(crate) fn get_mut(&mut self, id: PositionId) -> &mut Position {
		&mut self.positions[id.0]
	}

	/// Captures the state of every position.
	pub fn snapshot(&self) -> Vec<PositionSnapshot> {
		self.positions
			.iter()
			.enumerate()
			.map(|(i, p)| PositionSnapshot {
				id: PositionId(i),
				label: p.label().into_owned(),
				phase: p.phase,
				is_root: p.is_root,
				progress: match &p.children {
					Children::Active { slots, index } => Some((*index, slots.len())),
					_ => None,
				},
			})
			.collect()
	}
}
