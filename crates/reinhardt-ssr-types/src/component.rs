//! Component definitions.
//!
//! Stateful components implement [`Component`]; the engine never sees the
//! concrete type and drives them through the object-safe
//! [`ComponentClass`] / [`ComponentInstance`] pair produced by
//! [`class_of`]. Stateless components are plain functions wrapped in a
//! [`StatelessComponent`].

use std::collections::VecDeque;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::context::Context;
use crate::element::Node;
use crate::props::Props;

/// Trait for stateful UI components.
///
/// A component is constructed once per render from its props and its
/// masked context, optionally mounts (queuing state updates through the
/// [`Updater`]), optionally provides child context, and renders to a
/// [`Node`].
///
/// # Example
///
/// ```
/// use reinhardt_ssr_types::{Component, Context, Element, IntoNode, Node, Props, Updater};
///
/// struct Counter {
///     count: i64,
/// }
///
/// impl Component for Counter {
///     fn create(props: &Props, _context: &Context) -> Self {
///         let count = props.get("start").and_then(|v| v.as_i64()).unwrap_or(0);
///         Self { count }
///     }
///
///     fn name() -> &'static str {
///         "Counter"
///     }
///
///     fn will_mount(&mut self, updater: &mut Updater<Self>) {
///         updater.set_state(|this| this.count += 1);
///     }
///
///     fn render(&self) -> Node {
///         Element::host("span").child(self.count).into_node()
///     }
/// }
/// ```
pub trait Component: 'static {
	/// Constructs the component from its props and masked context.
	fn create(props: &Props, context: &Context) -> Self
	where
		Self: Sized;

	/// Returns the component's name for diagnostics.
	fn name() -> &'static str
	where
		Self: Sized;

	/// Context keys this component may read.
	fn context_types() -> &'static [&'static str]
	where
		Self: Sized,
	{
		&[]
	}

	/// Context keys this component may provide to descendants.
	///
	/// Returning `None` while [`child_context`](Self::child_context)
	/// produces a value is a declaration error.
	fn child_context_types() -> Option<&'static [&'static str]>
	where
		Self: Sized,
	{
		None
	}

	/// Runs before the first render. State updates queued here are applied
	/// synchronously before [`render`](Self::render) is called.
	fn will_mount(&mut self, _updater: &mut Updater<Self>)
	where
		Self: Sized,
	{
	}

	/// Context contributed to descendants.
	fn child_context(&self) -> Option<Context> {
		None
	}

	/// Renders the component.
	fn render(&self) -> Node;
}

type StateUpdate<C> = Box<dyn FnOnce(&mut C)>;
type UpdateCallback<C> = Box<dyn FnOnce(&C)>;

/// Queue of state updates requested while a component mounts.
pub struct Updater<C> {
	pending: VecDeque<(StateUpdate<C>, Option<UpdateCallback<C>>)>,
}

impl<C> Default for Updater<C> {
	fn default() -> Self {
		Self {
			pending: VecDeque::new(),
		}
	}
}

impl<C> std::fmt::Debug for Updater<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Updater")
			.field("pending", &self.pending.len())
			.finish()
	}
}

impl<C> Updater<C> {
	/// Creates an empty queue.
	pub fn new() -> Self {
		Self::default()
	}

	/// Queues a state update.
	pub fn set_state(&mut self, update: impl FnOnce(&mut C) + 'static) {
		self.pending.push_back((Box::new(update), None));
	}

	/// Queues a state update followed by a callback observing the result.
	pub fn set_state_then(
		&mut self,
		update: impl FnOnce(&mut C) + 'static,
		callback: impl FnOnce(&C) + 'static,
	) {
		self.pending
			.push_back((Box::new(update), Some(Box::new(callback))));
	}

	/// Returns the number of queued updates.
	pub fn pending(&self) -> usize {
		self.pending.len()
	}

	/// Applies every queued update to `component` in order.
	///
	/// All updates are applied before any callback runs, so callbacks
	/// observe the final state. Returns the number of updates applied.
	pub fn drain(&mut self, component: &mut C) -> usize {
		let mut callbacks = Vec::new();
		let mut applied = 0;
		while let Some((update, callback)) = self.pending.pop_front() {
			update(component);
			applied += 1;
			callbacks.extend(callback);
		}
		for callback in callbacks {
			callback(component);
		}
		applied
	}
}

/// Object-safe handle on a stateful component type.
pub trait ComponentClass: Send + Sync {
	/// Returns the component's name.
	fn name(&self) -> &'static str;

	/// Context keys instances may read.
	fn context_types(&self) -> &'static [&'static str];

	/// Context keys instances may provide.
	fn child_context_types(&self) -> Option<&'static [&'static str]>;

	/// Constructs an instance.
	fn instantiate(&self, props: &Props, context: &Context) -> Box<dyn ComponentInstance>;
}

/// Object-safe handle on a constructed stateful component.
pub trait ComponentInstance {
	/// Runs the mount hook, which may queue state updates.
	fn will_mount(&mut self);

	/// Applies queued state updates, returning how many were applied.
	fn drain_pending(&mut self) -> usize;

	/// Context contributed to descendants.
	fn child_context(&self) -> Option<Context>;

	/// Renders the instance.
	fn render(&self) -> Node;
}

struct ClassOf<C>(PhantomData<fn() -> C>);

struct Instance<C> {
	component: C,
	updater: Updater<C>,
}

impl<C: Component> ComponentClass for ClassOf<C> {
	fn name(&self) -> &'static str {
		C::name()
	}

	fn context_types(&self) -> &'static [&'static str] {
		C::context_types()
	}

	fn child_context_types(&self) -> Option<&'static [&'static str]> {
		C::child_context_types()
	}

	fn instantiate(&self, props: &Props, context: &Context) -> Box<dyn ComponentInstance> {
		Box::new(Instance {
			component: C::create(props, context),
			updater: Updater::new(),
		})
	}
}

impl<C: Component> ComponentInstance for Instance<C> {
	fn will_mount(&mut self) {
		self.component.will_mount(&mut self.updater);
	}

	fn drain_pending(&mut self) -> usize {
		self.updater.drain(&mut self.component)
	}

	fn child_context(&self) -> Option<Context> {
		self.component.child_context()
	}

	fn render(&self) -> Node {
		self.component.render()
	}
}

/// Returns the class handle for a stateful component type.
pub fn class_of<C: Component>() -> Arc<dyn ComponentClass> {
	Arc::new(ClassOf::<C>(PhantomData))
}

type RenderFn = dyn Fn(&Props, &Context) -> Node + Send + Sync;

/// A plain function component.
///
/// Stateless components have no instance and no lifecycle; they receive
/// their props and masked context and return a node.
#[derive(Clone)]
pub struct StatelessComponent {
	name: &'static str,
	context_types: &'static [&'static str],
	render: Arc<RenderFn>,
}

impl StatelessComponent {
	/// Wraps a render function.
	pub fn new<F>(name: &'static str, render: F) -> Self
	where
		F: Fn(&Props, &Context) -> Node + Send + Sync + 'static,
	{
		Self {
			name,
			context_types: &[],
			render: Arc::new(render),
		}
	}

	/// Declares the context keys the function may read.
	pub fn with_context_types(mut self, keys: &'static [&'static str]) -> Self {
		self.context_types = keys;
		self
	}

	/// Returns the component's name.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Context keys the function may read.
	pub fn context_types(&self) -> &'static [&'static str] {
		self.context_types
	}

	/// Invokes the function.
	pub fn call(&self, props: &Props, context: &Context) -> Node {
		(self.render)(props, context)
	}
}

impl std::fmt::Debug for StatelessComponent {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StatelessComponent")
			.field("name", &self.name)
			.field("context_types", &self.context_types)
			.finish()
	}
}
