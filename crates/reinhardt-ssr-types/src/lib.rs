//! Tree-authoring types for reinhardt server-side rendering.
//!
//! This crate describes *what* to render: immutable [`Element`] values,
//! their [`Props`], the [`Context`] that flows from ancestors to
//! descendants, and the two component flavours the engine resolves:
//!
//! - **Stateful components** implement [`Component`]. They are constructed
//!   per render, may queue state updates while mounting, and may contribute
//!   child context.
//! - **Stateless components** are plain functions wrapped in a
//!   [`StatelessComponent`].
//!
//! ## Example
//!
//! ```
//! use reinhardt_ssr_types::{Element, IntoNode, Node};
//!
//! let tree = Element::host("div")
//!     .prop("className", "greeting")
//!     .child("Hello, World!")
//!     .into_node();
//!
//! assert!(matches!(tree, Node::Element(_)));
//! ```

pub mod component;
pub mod context;
pub mod element;
pub mod props;

pub use component::{
	Component, ComponentClass, ComponentInstance, StatelessComponent, Updater, class_of,
};
pub use context::Context;
pub use element::{Element, ElementKind, IntoNode, Node};
pub use props::Props;
