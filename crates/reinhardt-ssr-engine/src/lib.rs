//! Server-side rendering engine for reinhardt component trees.
//!
//! The engine turns a tree of [`Element`](reinhardt_ssr_types::Element)s
//! into markup:
//!
//! - [`resolver`] expands components into host elements and primitives.
//! - [`walker`] walks the resolved tree incrementally under a byte budget.
//! - [`markup`] and [`markers`] produce the text of each node.
//! - [`session`] wraps one walk in a [`RenderSession`].
//! - [`stream`] adapts a session to `io::Read` and `futures::Stream`, with a
//!   rolling checksum and trailer.
//! - [`lazy`] and [`page`] compose deferred output into full documents.
//!
//! ## Example
//!
//! ```
//! use reinhardt_ssr_engine::{render_to_static_markup, render_to_string};
//! use reinhardt_ssr_types::Element;
//!
//! let tree = Element::host("div").prop("className", "greeting").child("Hello");
//!
//! assert_eq!(
//!     render_to_string(tree.clone()).unwrap(),
//!     "<div class=\"greeting\" data-reactroot=\"\">Hello</div>"
//! );
//! assert_eq!(
//!     render_to_static_markup(tree).unwrap(),
//!     "<div class=\"greeting\">Hello</div>"
//! );
//! ```

pub mod error;
pub mod lazy;
pub mod markers;
pub mod markup;
pub mod options;
pub mod page;
pub mod resolver;
pub mod session;
pub mod stream;
pub mod walker;

pub use error::{ConfigError, RenderError, RenderResult};
pub use lazy::{LazyItem, LazyTree, Produced};
pub use options::{MarkerMode, RenderOptions};
pub use page::PageShell;
pub use session::{
	RenderSession, checksum, render_to_static_markup, render_to_string, render_with_options,
};
pub use stream::{RenderReader, StreamCore, render_to_reader};
#[cfg(feature = "stream")]
pub use stream::{ChecksumHandle, RenderStream, render_to_stream};
pub use walker::{Budget, Chunk, OutputFilter, RenderStats};
