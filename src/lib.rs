//! # Alveus
//!
//! **Alveus** is a low-level library of building blocks for
//! event-driven network daemons: non-blocking descriptor I/O, OS-process
//! hygiene, and handle-addressed containers.
//!
//! Unlike a runtime, Alveus does not ship an event loop. The I/O engine
//! consumes a minimal registration contract ([`EventLoop`]) so it runs
//! unchanged under any single-threaded reactor that can report
//! descriptor readiness. Everything executes on the loop thread; there
//! are no locks, no atomics, and no blocking suspension points.
//!
//! The library offers:
//!
//! - [`IndexedList`] — an array-backed, handle-addressed doubly-linked
//!   list; handles are plain integers, growth preserves logical order
//! - [`AioFd`] — a queued-write / reported-read engine over a pair of
//!   non-blocking descriptors, driven by readiness notifications
//! - [`BitSet`] — a fixed-size bit array over packed words
//! - [`sanitize_files`] / [`build_clean_environ`] — descriptor and
//!   environment hygiene for daemon startup
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use alveus::{AioFd, AioOps, EventLoop, Readiness, WritePayload};
//!
//! // Bind an engine to a connected, non-blocking socket.
//! let mut engine = AioFd::new(sock, sock, my_loop.clone())?;
//! engine.enable_read_events(true);
//!
//! // Queue a write; the engine subscribes itself for writability.
//! engine.write(b"hello".to_vec())?;
//!
//! // In the loop's dispatch for this descriptor:
//! engine.handle_ready(Readiness { readable, writable }, &mut my_ops);
//! ```
//!
//! ## Modules
//!
//! - [`list`](IndexedList) — ordered container primitive
//! - [`aio`](AioFd) — asynchronous descriptor I/O
//! - [`event`](EventLoop) — the consumed event-loop contract
//! - [`bits`](BitSet), [`sanitize`](sanitize_files) — daemon utilities

mod bits;
mod error;
mod event;
mod list;

#[cfg(unix)]
mod aio;
#[cfg(unix)]
mod sanitize;
#[cfg(unix)]
mod sys;

pub use bits::BitSet;
pub use error::Error;
pub use event::{EventLoop, Interest, Readiness};
pub use list::{Handle, IndexedList, Iter};

#[cfg(unix)]
pub use aio::{AioFd, AioOps, WritePayload};
#[cfg(unix)]
pub use sanitize::{build_clean_environ, sanitize_files};
