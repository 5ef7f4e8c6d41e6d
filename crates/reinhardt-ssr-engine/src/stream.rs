//! Streaming output.
//!
//! [`StreamCore`] turns a [`RenderSession`] into a pull-based byte source:
//! it advances the session until enough bytes are buffered, hands out
//! slices, and keeps a rolling Adler-32 checksum over every byte delivered.
//! When the tree is exhausted it finalizes the checksum and, unless disabled,
//! delivers the trailer script as one last chunk.
//!
//! Two adapters sit on top of it:
//!
//! - [`RenderReader`] implements [`std::io::Read`] for blocking consumers.
//! - [`RenderStream`] implements [`futures::Stream`] for async consumers.
//!   It yields back to the executor after a bounded number of session
//!   advances. Its [`ChecksumHandle`] resolves once the checksum is known.

use std::io::{self, Read};

use adler2::Adler32;
use bytes::{Buf, Bytes, BytesMut};
use reinhardt_ssr_types::IntoNode;

use crate::error::RenderResult;
use crate::markers;
use crate::options::RenderOptions;
use crate::session::RenderSession;
use crate::walker::Budget;

/// Outcome of buffering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fill {
	/// The buffer holds the requested bytes, or the tree is done.
	Ready,
	/// The advance allowance ran out first.
	Yield,
}

/// Pull-based byte source over a render session.
#[derive(Debug)]
pub struct StreamCore {
	session: RenderSession,
	buffer: BytesMut,
	hasher: Adler32,
	tree_done: bool,
	finished: bool,
	checksum: Option<u32>,
	delivered: usize,
}

impl StreamCore {
	pub fn new(session: RenderSession) -> Self {
		Self {
			session,
			buffer: BytesMut::new(),
			hasher: Adler32::new(),
			tree_done: false,
			finished: false,
			checksum: None,
			delivered: 0,
		}
	}

	/// Returns the next chunk of at most `n` bytes, or `None` once
	/// everything (trailer included) has been delivered.
	///
	/// The trailer is delivered whole, even when it is longer than `n`.
	pub fn pull(&mut self, n: usize) -> RenderResult<Option<Bytes>> {
		if self.finished {
			return Ok(None);
		}
		self.fill(n.max(1), None)?;
		Ok(self.take(n.max(1)))
	}

	/// Checksum of the delivered content, once the tree is exhausted.
	pub fn checksum(&self) -> Option<u32> {
		self.checksum
	}

	/// Returns `true` once [`pull`](Self::pull) has nothing left to return.
	pub fn is_finished(&self) -> bool {
		self.finished
	}

	/// Content bytes delivered so far, excluding the trailer.
	pub fn delivered(&self) -> usize {
		self.delivered
	}

	pub fn session(&self) -> &RenderSession {
		&self.session
	}

	/// Advances the session until `n` bytes are buffered or the tree is done.
	/// Each advance spends one unit of `allowance`; an empty allowance stops
	/// the fill with [`Fill::Yield`].
	pub(crate) fn fill(&mut self, n: usize, mut allowance: Option<&mut usize>) -> RenderResult<Fill> {
		while self.buffer.len() < n && !self.tree_done {
			if let Some(left) = allowance.as_deref_mut() {
				if *left == 0 {
					return Ok(Fill::Yield);
				}
				*left -= 1;
			}
			let chunk = self.session.advance(Budget::bytes(n - self.buffer.len()))?;
			self.buffer.extend_from_slice(chunk.text.as_bytes());
			self.tree_done = chunk.done;
		}
		Ok(Fill::Ready)
	}

	/// Hands out up to `n` buffered bytes. Must follow a [`Fill::Ready`].
	pub(crate) fn take(&mut self, n: usize) -> Option<Bytes> {
		if !self.buffer.is_empty() {
			let len = n.min(self.buffer.len());
			let bytes = self.buffer.split_to(len).freeze();
			self.hasher.write_slice(&bytes);
			self.delivered += bytes.len();
			return Some(bytes);
		}
		if self.finished || !self.tree_done {
			return None;
		}

		self.finished = true;
		let checksum = self.hasher.checksum();
		self.checksum = Some(checksum);
		tracing::debug!(checksum, bytes = self.delivered, "Render stream finished");

		self.session
			.options()
			.emits_trailer()
			.then(|| Bytes::from(markers::checksum_trailer(checksum)))
	}
}

/// Blocking reader over a render session.
///
/// # Example
///
/// ```
/// use std::io::Read;
/// use reinhardt_ssr_engine::{RenderOptions, RenderReader, RenderSession};
/// use reinhardt_ssr_types::Element;
///
/// let session = RenderSession::new(Element::host("p").child("hi"), RenderOptions::static_markup()).unwrap();
/// let mut html = String::new();
/// RenderReader::new(session).read_to_string(&mut html).unwrap();
/// assert_eq!(html, "<p>hi</p>");
/// ```
#[derive(Debug)]
pub struct RenderReader {
	core: StreamCore,
	pending: Bytes,
}

impl RenderReader {
	pub fn new(session: RenderSession) -> Self {
		Self {
			core: StreamCore::new(session),
			pending: Bytes::new(),
		}
	}

	/// Checksum of the rendered content, once it has all been read.
	pub fn checksum(&self) -> Option<u32> {
		self.core.checksum()
	}
}

impl Read for RenderReader {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		if buf.is_empty() {
			return Ok(0);
		}
		if self.pending.is_empty() {
			match self.core.pull(buf.len())? {
				Some(bytes) => self.pending = bytes,
				None => return Ok(0),
			}
		}
		let n = buf.len().min(self.pending.len());
		buf[..n].copy_from_slice(&self.pending[..n]);
		self.pending.advance(n);
		Ok(n)
	}
}

/// Renders `root` into a blocking reader.
pub fn render_to_reader(root: impl IntoNode, options: RenderOptions) -> RenderResult<RenderReader> {
	RenderSession::new(root, options).map(RenderReader::new)
}

#[cfg(feature = "stream")]
pub use async_stream::{ChecksumHandle, RenderStream, render_to_stream};

#[cfg(feature = "stream")]
mod async_stream {
	use std::future::Future;
	use std::pin::Pin;
	use std::task::{Context, Poll};

	use bytes::Bytes;
	use futures::channel::oneshot;
	use futures::stream::{FusedStream, Stream};
	use reinhardt_ssr_types::IntoNode;

	use super::{Fill, StreamCore};
	use crate::error::{RenderError, RenderResult};
	use crate::options::RenderOptions;
	use crate::session::RenderSession;

	/// Async byte stream over a render session.
	///
	/// Each item holds at most `chunk_size` bytes, except the trailer which
	/// is delivered whole. After `yield_after` session advances the stream
	/// wakes itself and returns `Pending` once before advancing further.
	#[derive(Debug)]
	pub struct RenderStream {
		core: StreamCore,
		chunk_size: usize,
		yield_after: usize,
		allowance: usize,
		sender: Option<oneshot::Sender<u32>>,
		receiver: Option<oneshot::Receiver<u32>>,
		done: bool,
	}

	impl RenderStream {
		pub fn new(session: RenderSession) -> Self {
			let options = session.options();
			let chunk_size = options.chunk_size.max(1);
			let yield_after = options.yield_after.max(1);
			let (sender, receiver) = oneshot::channel();
			Self {
				core: StreamCore::new(session),
				chunk_size,
				yield_after,
				allowance: yield_after,
				sender: Some(sender),
				receiver: Some(receiver),
				done: false,
			}
		}

		/// Takes the handle that resolves to the checksum when the content
		/// is exhausted. Returns `None` if it was already taken.
		pub fn checksum_handle(&mut self) -> Option<ChecksumHandle> {
			self.receiver.take().map(|receiver| ChecksumHandle { receiver })
		}

		/// Checksum of the delivered content, once it is known.
		pub fn checksum(&self) -> Option<u32> {
			self.core.checksum()
		}

		fn notify(&mut self) {
			if let (Some(checksum), Some(sender)) = (self.core.checksum(), self.sender.take()) {
				let _ = sender.send(checksum);
			}
		}
	}

	impl Stream for RenderStream {
		type Item = RenderResult<Bytes>;

		fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
			let this = self.get_mut();
			if this.done {
				return Poll::Ready(None);
			}

			match this.core.fill(this.chunk_size, Some(&mut this.allowance)) {
				Ok(Fill::Ready) => {}
				Ok(Fill::Yield) => {
					this.allowance = this.yield_after;
					tracing::trace!(yield_after = this.yield_after, "Render stream yielding");
					cx.waker().wake_by_ref();
					return Poll::Pending;
				}
				Err(err) => {
					this.done = true;
					this.sender = None;
					return Poll::Ready(Some(Err(err)));
				}
			}

			let item = this.core.take(this.chunk_size);
			this.notify();
			match item {
				Some(bytes) => Poll::Ready(Some(Ok(bytes))),
				None => {
					this.done = true;
					Poll::Ready(None)
				}
			}
		}
	}

	impl FusedStream for RenderStream {
		fn is_terminated(&self) -> bool {
			self.done
		}
	}

	/// Resolves to the stream's checksum, or `None` if the stream failed or
	/// was dropped before its content was exhausted.
	#[derive(Debug)]
	pub struct ChecksumHandle {
		receiver: oneshot::Receiver<u32>,
	}

	impl Future for ChecksumHandle {
		type Output = Option<u32>;

		fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
			Pin::new(&mut self.receiver).poll(cx).map(Result::ok)
		}
	}

	/// Renders `root` into an async byte stream.
	pub fn render_to_stream(root: impl IntoNode, options: RenderOptions) -> Result<RenderStream, RenderError> {
		RenderSession::new(root, options).map(RenderStream::new)
	}
}
