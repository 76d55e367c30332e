//! Event loop contract.
//!
//! Alveus does not implement a reactor. The engine consumes readiness
//! notification through this minimal registration interface so it runs
//! unchanged under any single-threaded event loop that can watch file
//! descriptors:
//! - register a descriptor with an interest mask,
//! - start and stop the resulting subscription (both idempotent),
//! - deliver readiness back to the owner, who routes it into the
//!   engine's `handle_*` entry points.
//!
//! Implementations are expected to be cheap handles (a token table
//! index, a command channel, an `Rc` around loop state); the engine
//! clones its handle freely and calls it from the loop thread only.

use std::os::fd::RawFd;

use crate::error::Error;

/// The readiness conditions a subscription watches for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Interest {
    pub read: bool,
    pub write: bool,
}

impl Interest {
    /// Read readiness only.
    pub const READ: Interest = Interest {
        read: true,
        write: false,
    };

    /// Write readiness only.
    pub const WRITE: Interest = Interest {
        read: false,
        write: true,
    };
}

/// Readiness reported by the loop for one subscription.
///
/// Both flags may be set on a single notification; the engine processes
/// the write side first so completed queue entries free their slots
/// before the owner reacts to inbound data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Readiness {
    pub readable: bool,
    pub writable: bool,
}

/// Registration interface of an external event loop.
///
/// A type implementing `EventLoop` is a *handle* to the loop: cloning it
/// is cheap and every clone addresses the same loop. All methods take
/// `&self`; interior mutability is the implementor's concern.
///
/// # Contract
///
/// - [`register`](Self::register) creates a subscription in the stopped
///   state; no readiness is delivered until [`start`](Self::start).
/// - [`start`](Self::start) and [`stop`](Self::stop) are idempotent:
///   starting an active subscription or stopping an inactive one is a
///   no-op.
/// - [`deregister`](Self::deregister) removes the subscription entirely;
///   the loop must not deliver readiness for it afterwards.
/// - Readiness delivery is the loop's side of the contract: when a
///   started subscription's descriptor becomes ready, the loop reports a
///   [`Readiness`] for it to whatever dispatch the owner wired up.
pub trait EventLoop: Clone {
    /// The loop's subscription record for one descriptor + interest.
    type Subscription;

    /// Registers `fd` for the given interest; the subscription starts
    /// stopped.
    fn register(&self, fd: RawFd, interest: Interest) -> Result<Self::Subscription, Error>;

    /// Begins readiness delivery for `sub`. Idempotent.
    fn start(&self, sub: &Self::Subscription);

    /// Pauses readiness delivery for `sub`. Idempotent.
    fn stop(&self, sub: &Self::Subscription);

    /// Removes `sub` from the loop.
    fn deregister(&self, sub: &Self::Subscription);
}
