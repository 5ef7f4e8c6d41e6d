//! Error types for the rendering engine.
//!
//! Every [`RenderError`] aborts the render session it occurs in. Output that
//! was already handed to a consumer before the failure stays delivered;
//! nothing is retried and no partial-render fallback is attempted.

/// Errors raised while rendering a tree.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
	/// The top-level render entry point was not given an element.
	#[error("Invalid element: render expects an element at the root, got {found}")]
	InvalidElement { found: &'static str },

	/// A component rendered `Undefined`.
	#[error("Unresolvable element: {component}.render() returned nothing; return Node::Null to render nothing")]
	UnresolvableElement { component: String },

	/// Child context was produced without a matching declaration.
	#[error("Context declaration error in {component}: {reason}")]
	ContextDeclaration { component: String, reason: String },

	/// An element's type cannot be rendered.
	#[error("Unsupported element type: {0}")]
	UnsupportedElementType(String),

	/// A void tag was given children or inner HTML.
	#[error("<{tag}> is a void element tag and must neither have children nor use inner HTML")]
	VoidElementChildren { tag: String },

	/// A chain of components exceeded the configured depth.
	#[error("Component resolution exceeded the maximum depth of {limit} at {component}")]
	ResolutionDepthExceeded { component: String, limit: usize },
}

impl From<RenderError> for std::io::Error {
	fn from(err: RenderError) -> Self {
		std::io::Error::other(err)
	}
}

/// Errors raised while loading [`RenderOptions`](crate::RenderOptions).
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("Invalid value for environment variable '{key}': {reason}")]
	Env { key: String, reason: String },
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
