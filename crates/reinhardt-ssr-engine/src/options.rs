//! Render options.
//!
//! Options are an explicit value threaded into every
//! [`RenderSession`](crate::RenderSession). There is no process-wide
//! rendering switch, so sessions with different options may run side by
//! side without observing each other.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How much reconnection metadata is written into host nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerMode {
	/// Only the root host node carries the root marker attribute.
	#[default]
	Root,
	/// Every host node carries a sequential identity attribute, and whole
	/// string renders carry a checksum attribute on the root.
	Identity,
}

impl std::str::FromStr for MarkerMode {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"root" => Ok(Self::Root),
			"identity" => Ok(Self::Identity),
			other => Err(format!("unknown marker mode '{}'", other)),
		}
	}
}

/// Options for a render session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
	/// Omit every reconnection marker (root attribute, text-boundary
	/// comments, empty placeholders, trailer) for immutable output.
	pub static_markup: bool,
	/// Which reconnection markers host nodes receive.
	pub marker_mode: MarkerMode,
	/// Append the checksum trailer script after streamed output.
	pub checksum_trailer: bool,
	/// Bytes requested per item by the async stream adapter.
	pub chunk_size: usize,
	/// Synchronous `advance` calls allowed within one poll before the
	/// stream adapter yields back to the executor.
	pub yield_after: usize,
	/// Maximum length of a chain of components resolving into each other.
	pub max_component_depth: usize,
}

impl Default for RenderOptions {
	fn default() -> Self {
		Self {
			static_markup: false,
			marker_mode: MarkerMode::Root,
			checksum_trailer: true,
			chunk_size: 16 * 1024,
			yield_after: 64,
			max_component_depth: 1024,
		}
	}
}

impl RenderOptions {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Options for static markup.
	pub fn static_markup() -> Self {
		Self::default().with_static_markup(true)
	}

	/// Enables or disables static markup.
	pub fn with_static_markup(mut self, enabled: bool) -> Self {
		self.static_markup = enabled;
		self
	}

	/// Sets the marker mode.
	pub fn with_marker_mode(mut self, mode: MarkerMode) -> Self {
		self.marker_mode = mode;
		self
	}

	/// Enables or disables the checksum trailer.
	pub fn with_checksum_trailer(mut self, enabled: bool) -> Self {
		self.checksum_trailer = enabled;
		self
	}

	/// Sets the stream chunk size. Zero is treated as one.
	pub fn with_chunk_size(mut self, size: usize) -> Self {
		self.chunk_size = size.max(1);
		self
	}

	/// Sets how many `advance` calls run before the stream yields.
	pub fn with_yield_after(mut self, calls: usize) -> Self {
		self.yield_after = calls.max(1);
		self
	}

	/// Sets the maximum component chain depth.
	pub fn with_max_component_depth(mut self, depth: usize) -> Self {
		self.max_component_depth = depth;
		self
	}

	/// Returns `true` if the trailer script should be emitted.
	pub fn emits_trailer(&self) -> bool {
		self.checksum_trailer && !self.static_markup
	}

	/// Parses options from TOML. Missing keys keep their defaults.
	///
	/// # Example
	///
	/// ```
	/// use reinhardt_ssr_engine::RenderOptions;
	///
	/// let opts = RenderOptions::from_toml("static_markup = true\nchunk_size = 512").unwrap();
	/// assert!(opts.static_markup);
	/// assert_eq!(opts.chunk_size, 512);
	/// ```
	pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(source)?)
	}

	/// Overrides options from environment variables named
	/// `{prefix}STATIC_MARKUP`, `{prefix}MARKER_MODE`, `{prefix}CHUNK_SIZE`
	/// and `{prefix}YIELD_AFTER`. Unset variables leave options unchanged.
	pub fn apply_env(mut self, prefix: &str) -> Result<Self, ConfigError> {
		if let Some(value) = read_env(prefix, "STATIC_MARKUP") {
			self.static_markup = parse_bool(&value).ok_or_else(|| ConfigError::Env {
				key: format!("{prefix}STATIC_MARKUP"),
				reason: format!("expected a boolean, got '{}'", value),
			})?;
		}
		if let Some(value) = read_env(prefix, "MARKER_MODE") {
			self.marker_mode = value.parse().map_err(|reason| ConfigError::Env {
				key: format!("{prefix}MARKER_MODE"),
				reason,
			})?;
		}
		if let Some(value) = read_env(prefix, "CHUNK_SIZE") {
			self = self.with_chunk_size(parse_usize(prefix, "CHUNK_SIZE", &value)?);
		}
		if let Some(value) = read_env(prefix, "YIELD_AFTER") {
			self = self.with_yield_after(parse_usize(prefix, "YIELD_AFTER", &value)?);
		}
		Ok(self)
	}
}

fn read_env(prefix: &str, name: &str) -> Option<String> {
	std::env::var(format!("{prefix}{name}")).ok()
}

fn parse_bool(value: &str) -> Option<bool> {
	match value.trim().to_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Some(true),
		"false" | "0" | "no" | "off" => Some(false),
		_ => None,
	}
}

fn parse_usize(prefix: &str, name: &str, value: &str) -> Result<usize, ConfigError> {
	value.trim().parse().map_err(|e| ConfigError::Env {
		key: format!("{prefix}{name}"),
		reason: format!("{}", e),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serial_test::serial;

	#[rstest]
	fn test_render_options_default() {
		let opts = RenderOptions::default();
		assert!(!opts.static_markup);
		assert_eq!(opts.marker_mode, MarkerMode::Root);
		assert!(opts.emits_trailer());
		assert_eq!(opts.chunk_size, 16384);
	}

	#[rstest]
	fn test_static_markup_suppresses_trailer() {
		let opts = RenderOptions::static_markup();
		assert!(opts.static_markup);
		assert!(!opts.emits_trailer());
	}

	#[rstest]
	fn test_builder_clamps_zero_sizes() {
		let opts = RenderOptions::new().with_chunk_size(0).with_yield_after(0);
		assert_eq!(opts.chunk_size, 1);
		assert_eq!(opts.yield_after, 1);
	}

	#[rstest]
	fn test_from_toml_partial() {
		let opts = RenderOptions::from_toml("marker_mode = \"identity\"\nyield_after = 8").unwrap();
		assert_eq!(opts.marker_mode, MarkerMode::Identity);
		assert_eq!(opts.yield_after, 8);
		assert!(!opts.static_markup);
	}

	#[rstest]
	fn test_from_toml_rejects_bad_types() {
		let result = RenderOptions::from_toml("chunk_size = \"big\"");
		assert!(matches!(result, Err(ConfigError::Toml(_))));
	}

	#[rstest]
	#[case("root", MarkerMode::Root)]
	#[case(" Identity ", MarkerMode::Identity)]
	fn test_marker_mode_from_str(#[case] input: &str, #[case] expected: MarkerMode) {
		assert_eq!(input.parse::<MarkerMode>().unwrap(), expected);
	}

	#[rstest]
	#[serial]
	fn test_apply_env_overrides() {
		// SAFETY: Setting environment variables is unsafe in multi-threaded programs.
		// This test uses #[serial] to ensure exclusive access to environment variables.
		unsafe {
			std::env::set_var("SSR_TEST_STATIC_MARKUP", "yes");
			std::env::set_var("SSR_TEST_CHUNK_SIZE", "2048");
		}
		let opts = RenderOptions::new().apply_env("SSR_TEST_").unwrap();
		assert!(opts.static_markup);
		assert_eq!(opts.chunk_size, 2048);
		assert_eq!(opts.marker_mode, MarkerMode::Root);
		// SAFETY: Removing environment variables is unsafe in multi-threaded programs.
		// This test uses #[serial] to ensure exclusive access to environment variables.
		unsafe {
			std::env::remove_var("SSR_TEST_STATIC_MARKUP");
			std::env::remove_var("SSR_TEST_CHUNK_SIZE");
		}
	}

	#[rstest]
	#[serial]
	fn test_apply_env_invalid_value() {
		// SAFETY: Setting environment variables is unsafe in multi-threaded programs.
		// This test uses #[serial] to ensure exclusive access to environment variables.
		unsafe {
			std::env::set_var("SSR_BAD_YIELD_AFTER", "many");
		}
		let result = RenderOptions::new().apply_env("SSR_BAD_");
		assert!(matches!(result, Err(ConfigError::Env { ref key, .. }) if key == "SSR_BAD_YIELD_AFTER"));
		// SAFETY: Removing environment variables is unsafe in multi-threaded programs.
		// This test uses #[serial] to ensure exclusive access to environment variables.
		unsafe {
			std::env::remove_var("SSR_BAD_YIELD_AFTER");
		}
	}
}
