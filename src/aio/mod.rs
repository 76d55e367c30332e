//! Asynchronous descriptor I/O engine.
//!
//! [`AioFd`] wraps a pair of non-blocking file descriptors (commonly the
//! same descriptor twice) and turns event-loop readiness into:
//! - a drained FIFO write queue on the write side, with completion
//!   callbacks as each request finishes;
//! - an availability report on the read side, leaving the actual read to
//!   the owner.
//!
//! The engine holds a handle to the loop ([`EventLoop`](crate::EventLoop))
//! for subscription control but receives readiness through its `handle_*`
//! entry points, which the owner wires to the loop's dispatch. Callbacks
//! are a capability trait ([`AioOps`]) the owner implements; the engine
//! is passed back into every callback so owners can enqueue, read, or
//! reconfigure from inside them.
//!
//! The engine never closes the descriptors it is given. Descriptor
//! lifetime, and bounding the (unbounded) write queue, belong to the
//! owner.

mod core;
mod request;

pub use self::core::{AioFd, AioOps};

/// A caller-supplied buffer queued for writing.
///
/// The engine takes exclusive ownership at enqueue and hands the payload
/// back through the completion callback once every byte has been
/// accepted by the descriptor. Payloads still queued when the engine is
/// dropped go to the teardown hook instead, with no callback.
pub enum WritePayload {
    /// One contiguous buffer.
    Single(Vec<u8>),
    /// A gathered write: discontiguous segments submitted together and
    /// completed as one request.
    Vectored(Vec<Vec<u8>>),
}

impl WritePayload {
    /// Total number of payload bytes across all segments.
    pub fn len(&self) -> usize {
        match self {
            WritePayload::Single(buf) => buf.len(),
            WritePayload::Vectored(segments) => segments.iter().map(Vec::len).sum(),
        }
    }

    /// `true` when the payload carries no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
