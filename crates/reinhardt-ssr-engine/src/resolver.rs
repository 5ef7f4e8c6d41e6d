//! Component resolution.
//!
//! The resolver expands a node until it is no longer a component: a host
//! element, a primitive or a terminal value. Each expansion either mounts a
//! stateful component (construct, mount hook, drain queued state updates,
//! validate and merge child context, render) or calls a stateless one.
//!
//! Resolution is a loop, not recursion, and is never budgeted: a node's
//! markup cannot be produced before its resolved identity is known.

use std::sync::Arc;

use reinhardt_ssr_types::{ComponentClass, Context, ElementKind, Node, Props};

use crate::error::{RenderError, RenderResult};
use crate::walker::RenderStats;

/// The result of resolving a node.
#[derive(Debug)]
pub struct Resolved {
	/// A host element, primitive or terminal value.
	pub node: Node,
	/// The context descendants of `node` see, including child context
	/// contributed along the way.
	pub context: Arc<Context>,
}

/// Expands component elements into their rendered output.
#[derive(Debug, Clone)]
pub struct ComponentResolver {
	max_depth: usize,
}

impl ComponentResolver {
	/// Creates a resolver that fails after `max_depth` chained components.
	pub fn new(max_depth: usize) -> Self {
		Self { max_depth }
	}

	/// Resolves `node` against `context`.
	pub fn resolve(
		&self,
		node: Node,
		context: Arc<Context>,
		stats: &mut RenderStats,
	) -> RenderResult<Resolved> {
		let mut node = node;
		let mut context = context;
		let mut depth = 0;

		loop {
			let element = match &node {
				Node::Element(el) if el.is_component() => el.clone(),
				_ => return Ok(Resolved { node, context }),
			};
			let name = element.kind().name().to_string();

			depth += 1;
			if depth > self.max_depth {
				return Err(RenderError::ResolutionDepthExceeded {
					component: name,
					limit: self.max_depth,
				});
			}

			tracing::trace!(component = %name, depth, "resolving component");
			stats.components_resolved += 1;

			let (output, child_context) = match element.kind() {
				ElementKind::Stateful(class) => {
					self.mount(class.as_ref(), element.get_props(), &context, stats)?
				}
				ElementKind::Stateless(component) => {
					let masked = context.masked(component.context_types());
					(component.call(element.get_props(), &masked), None)
				}
				ElementKind::Host(_) => return Ok(Resolved { node, context }),
			};

			match output {
				Node::Undefined => {
					return Err(RenderError::UnresolvableElement { component: name });
				}
				Node::List(_) => {
					return Err(RenderError::UnsupportedElementType(format!(
						"{} rendered a list; a component must render a single node",
						name
					)));
				}
				_ => {}
			}

			if let Some(child_context) = child_context {
				context = Arc::new(context.merged(&child_context));
			}
			node = output;
		}
	}

	fn mount(
		&self,
		class: &dyn ComponentClass,
		props: &Props,
		context: &Context,
		stats: &mut RenderStats,
	) -> RenderResult<(Node, Option<Context>)> {
		let masked = context.masked(class.context_types());
		let mut instance = class.instantiate(props, &masked);

		instance.will_mount();
		stats.updates_applied += instance.drain_pending();

		let child_context = match instance.child_context() {
			Some(child_context) => {
				validate_child_context(class, &child_context)?;
				Some(child_context)
			}
			None => None,
		};

		Ok((instance.render(), child_context))
	}
}

fn validate_child_context(class: &dyn ComponentClass, child_context: &Context) -> RenderResult<()> {
	let Some(declared) = class.child_context_types() else {
		return Err(RenderError::ContextDeclaration {
			component: class.name().to_string(),
			reason: "child_context() returned a value but child_context_types() is not declared"
				.to_string(),
		});
	};
	if let Some(key) = child_context.keys().find(|key| !declared.contains(key)) {
		return Err(RenderError::ContextDeclaration {
			component: class.name().to_string(),
			reason: format!("key \"{}\" is not defined in child_context_types()", key),
		});
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use reinhardt_ssr_types::{Component, Element, IntoNode, StatelessComponent, Updater};
	use rstest::rstest;

	struct Provider;

	impl Component for Provider {
		fn create(_props: &Props, _context: &Context) -> Self {
			Provider
		}

		fn name() -> &'static str {
			"Provider"
		}

		fn child_context_types() -> Option<&'static [&'static str]> {
			Some(&["text"])
		}

		fn child_context(&self) -> Option<Context> {
			Some(Context::new().with("text", "purple"))
		}

		fn render(&self) -> Node {
			Element::host("section").into_node()
		}
	}

	struct Undeclared;

	impl Component for Undeclared {
		fn create(_props: &Props, _context: &Context) -> Self {
			Undeclared
		}

		fn name() -> &'static str {
			"Undeclared"
		}

		fn child_context(&self) -> Option<Context> {
			Some(Context::new().with("text", "purple"))
		}

		fn render(&self) -> Node {
			Node::Null
		}
	}

	struct ExtraKey;

	impl Component for ExtraKey {
		fn create(_props: &Props, _context: &Context) -> Self {
			ExtraKey
		}

		fn name() -> &'static str {
			"ExtraKey"
		}

		fn child_context_types() -> Option<&'static [&'static str]> {
			Some(&["text"])
		}

		fn child_context(&self) -> Option<Context> {
			Some(Context::new().with("text", "a").with("other", "b"))
		}

		fn render(&self) -> Node {
			Node::Null
		}
	}

	struct Silent;

	impl Component for Silent {
		fn create(_props: &Props, _context: &Context) -> Self {
			Silent
		}

		fn name() -> &'static str {
			"Silent"
		}

		fn render(&self) -> Node {
			Node::Undefined
		}
	}

	struct Mounting {
		label: String,
	}

	impl Component for Mounting {
		fn create(_props: &Props, _context: &Context) -> Self {
			Mounting {
				label: "initial".to_string(),
			}
		}

		fn name() -> &'static str {
			"Mounting"
		}

		fn will_mount(&mut self, updater: &mut Updater<Self>) {
			updater.set_state(|this| this.label = "first".to_string());
			updater.set_state(|this| this.label.push_str("+second"));
		}

		fn render(&self) -> Node {
			Node::from(self.label.clone())
		}
	}

	fn resolve(node: impl IntoNode) -> (RenderResult<Resolved>, RenderStats) {
		let mut stats = RenderStats::default();
		let resolver = ComponentResolver::new(16);
		let result = resolver.resolve(node.into_node(), Arc::new(Context::new()), &mut stats);
		(result, stats)
	}

	#[rstest]
	fn test_host_element_resolves_to_itself() {
		let (resolved, stats) = resolve(Element::host("div"));
		let resolved = resolved.unwrap();
		assert_eq!(resolved.node.as_element().and_then(|el| el.tag()), Some("div"));
		assert_eq!(stats.components_resolved, 0);
	}

	#[rstest]
	fn test_child_context_is_merged() {
		let (resolved, stats) = resolve(Element::component::<Provider>());
		let resolved = resolved.unwrap();
		assert_eq!(
			resolved.context.get("text").and_then(|v| v.as_str()),
			Some("purple")
		);
		assert_eq!(stats.components_resolved, 1);
	}

	#[rstest]
	fn test_child_context_without_declaration_fails() {
		let (resolved, _) = resolve(Element::component::<Undeclared>());
		assert!(matches!(
			resolved,
			Err(RenderError::ContextDeclaration { ref component, .. }) if component == "Undeclared"
		));
	}

	#[rstest]
	fn test_child_context_with_undeclared_key_fails() {
		let (resolved, _) = resolve(Element::component::<ExtraKey>());
		match resolved {
			Err(RenderError::ContextDeclaration { reason, .. }) => assert!(reason.contains("\"other\"")),
			other => panic!("expected context declaration error, got {other:?}"),
		}
	}

	#[rstest]
	fn test_undefined_render_fails() {
		let (resolved, _) = resolve(Element::component::<Silent>());
		assert_eq!(
			resolved.unwrap_err(),
			RenderError::UnresolvableElement {
				component: "Silent".to_string()
			}
		);
	}

	#[rstest]
	fn test_pending_updates_are_drained_before_render() {
		let (resolved, stats) = resolve(Element::component::<Mounting>());
		assert!(matches!(resolved.unwrap().node, Node::Text(t) if t == "first+second"));
		assert_eq!(stats.updates_applied, 2);
	}

	#[rstest]
	fn test_stateless_chain_and_masked_context() {
		let inner = StatelessComponent::new("Inner", |_props, ctx| {
			let keys: Vec<_> = ctx.keys().map(str::to_string).collect();
			Node::from(keys.join(","))
		})
		.with_context_types(&["text", "missing"]);
		let outer = StatelessComponent::new("Outer", move |_props, _ctx| {
			Element::stateless(inner.clone()).into_node()
		});

		let mut stats = RenderStats::default();
		let context = Arc::new(Context::new().with("text", "t").with("other", "o"));
		let resolved = ComponentResolver::new(16)
			.resolve(Element::stateless(outer).into_node(), context, &mut stats)
			.unwrap();

		assert!(matches!(resolved.node, Node::Text(t) if t == "text"));
		assert_eq!(stats.components_resolved, 2);
	}

	#[rstest]
	fn test_list_render_is_unsupported() {
		let listing = StatelessComponent::new("Listing", |_props, _ctx| Node::list(["a", "b"]));
		let (resolved, _) = resolve(Element::stateless(listing));
		assert!(matches!(resolved, Err(RenderError::UnsupportedElementType(_))));
	}

	#[rstest]
	fn test_depth_limit() {
		fn looping() -> StatelessComponent {
			StatelessComponent::new("Looping", |_props, _ctx| {
				Element::stateless(looping()).into_node()
			})
		}

		let mut stats = RenderStats::default();
		let result = ComponentResolver::new(5).resolve(
			Element::stateless(looping()).into_node(),
			Arc::new(Context::new()),
			&mut stats,
		);
		assert!(matches!(
			result,
			Err(RenderError::ResolutionDepthExceeded { limit: 5, .. })
		));
		assert_eq!(stats.components_resolved, 5);
	}
}
