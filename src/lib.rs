//! # Reinhardt SSR
//!
//! Incremental, resumable server-side rendering of component trees.
//!
//! A tree is built from [`Element`]s: host tags, stateful [`Component`]s and
//! plain [`StatelessComponent`] functions. The engine resolves components,
//! walks the result in budgeted steps and emits markup that a client-side
//! reconciler can attach to.
//!
//! ## Crates
//!
//! - [`types`] (`reinhardt-ssr-types`): elements, props, context and the
//!   component traits.
//! - [`engine`] (`reinhardt-ssr-engine`): resolver, tree walker, markup
//!   formatter, lazy output trees and streaming adapters.
//!
//! ## Feature Flags
//!
//! - `stream` (default): the async [`RenderStream`] and its
//!   [`ChecksumHandle`].
//!
//! ## Quick Example
//!
//! ```
//! use reinhardt_ssr::prelude::*;
//!
//! struct Greeting {
//!     name: String,
//! }
//!
//! impl Component for Greeting {
//!     fn create(props: &Props, _context: &Context) -> Self {
//!         Greeting {
//!             name: props.get_str("name").unwrap_or("world").to_string(),
//!         }
//!     }
//!
//!     fn name() -> &'static str {
//!         "Greeting"
//!     }
//!
//!     fn render(&self) -> Node {
//!         Element::host("h1").child(format!("Hello, {}!", self.name)).into_node()
//!     }
//! }
//!
//! let html = render_to_static_markup(Element::component::<Greeting>().prop("name", "Ada")).unwrap();
//! assert_eq!(html, "<h1>Hello, Ada!</h1>");
//! ```

pub use reinhardt_ssr_engine as engine;
pub use reinhardt_ssr_types as types;

pub use reinhardt_ssr_engine::{
	Budget, Chunk, ConfigError, LazyItem, LazyTree, MarkerMode, PageShell, Produced, RenderError,
	RenderOptions, RenderReader, RenderResult, RenderSession, RenderStats, checksum,
	render_to_reader, render_to_static_markup, render_to_string, render_with_options,
};
#[cfg(feature = "stream")]
pub use reinhardt_ssr_engine::{ChecksumHandle, RenderStream, render_to_stream};
pub use reinhardt_ssr_types::{
	Component, Context, Element, ElementKind, IntoNode, Node, Props, StatelessComponent, Updater,
};

/// Common imports for building and rendering trees.
pub mod prelude {
	pub use reinhardt_ssr_engine::{
		Budget, RenderError, RenderOptions, RenderSession, render_to_static_markup, render_to_string,
	};
	#[cfg(feature = "stream")]
	pub use reinhardt_ssr_engine::{RenderStream, render_to_stream};
	pub use reinhardt_ssr_types::{
		Component, Context, Element, IntoNode, Node, Props, StatelessComponent, Updater,
	};
}
