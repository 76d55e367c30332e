use libc::iovec;
use log::{debug, warn};

use std::io;
use std::os::fd::RawFd;

use crate::aio::WritePayload;
use crate::aio::request::WriteRequest;
use crate::error::Error;
use crate::event::{EventLoop, Interest, Readiness};
use crate::list::IndexedList;
use crate::sys;

/// Write queue slots preallocated per engine.
const INITIAL_QUEUE_CAPACITY: usize = 8;

/// Callbacks an [`AioFd`] owner implements.
///
/// The engine is handed back into every callback so the owner can act
/// on it from inside, such as enqueueing another write or consuming
/// available bytes with [`AioFd::read`]. State that would otherwise
/// travel as an opaque context pointer lives in the implementor's own
/// fields.
pub trait AioOps<L: EventLoop> {
    /// The read descriptor is ready with `available` unread bytes. The
    /// engine has consumed nothing; call [`AioFd::read`] to take bytes.
    ///
    /// Return `false` to stop the read subscription.
    fn on_readable(&mut self, fd: &mut AioFd<L>, available: usize) -> bool;

    /// A queued write finished (`payload` is `Some`, ownership returns
    /// to the caller), or the queue just drained completely (`payload`
    /// is `None`).
    ///
    /// The return value is consulted on the queue-empty call: `false`
    /// stops the write subscription until the next enqueue restarts it.
    /// Returns from payload-carrying calls are not inspected, since the
    /// queue-empty call always follows them on the same drain.
    fn on_write_complete(&mut self, fd: &mut AioFd<L>, payload: Option<WritePayload>) -> bool;

    /// The descriptor reported an error other than would-block. The
    /// engine has stopped processing the current readiness event;
    /// queued writes and the descriptor itself are untouched.
    fn on_error(&mut self, fd: &mut AioFd<L>, err: io::Error);
}

/// A non-blocking read/write engine over a pair of descriptors.
///
/// Writes are queued and drained in FIFO order whenever the loop
/// reports write-readiness; reads are left to the owner, who is told
/// how many bytes are waiting. Both descriptors **must** be
/// non-blocking, may be the same descriptor, and are never closed by
/// the engine.
///
/// Each direction is independently either idle (registered with the
/// loop, not subscribed) or active (subscribed). The write direction
/// activates itself on every enqueue and goes idle only when the queue
/// drains *and* the completion callback asks to stop; the read
/// direction moves only on [`enable_read_events`](Self::enable_read_events)
/// and the readable callback's return.
///
/// Dropping the engine stops and removes both subscriptions and frees
/// any queued requests through the teardown hook, with no completion
/// callbacks.
pub struct AioFd<L: EventLoop> {
    wfd: RawFd,
    rfd: RawFd,
    queue: IndexedList<WriteRequest>,
    wsub: L::Subscription,
    rsub: L::Subscription,
    evloop: L,
}

impl<L: EventLoop> AioFd<L> {
    /// Binds an engine to a write descriptor and a read descriptor
    /// (which may be equal) and registers both with the loop.
    ///
    /// Neither subscription is started: the write side starts itself on
    /// the first enqueue, the read side on
    /// [`enable_read_events`](Self::enable_read_events).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when either descriptor is negative.
    pub fn new(write_fd: RawFd, read_fd: RawFd, evloop: L) -> Result<Self, Error> {
        Self::build(write_fd, read_fd, evloop, None)
    }

    /// Like [`new`](Self::new), with a hook that receives each payload
    /// still queued when the engine is dropped.
    ///
    /// The hook is the teardown policy for unsent buffers, e.g.
    /// returning them to a pool instead of dropping them. It never runs
    /// for payloads that completed normally.
    pub fn with_teardown(
        write_fd: RawFd,
        read_fd: RawFd,
        evloop: L,
        hook: impl FnMut(WritePayload) + 'static,
    ) -> Result<Self, Error> {
        Self::build(write_fd, read_fd, evloop, Some(Box::new(hook)))
    }

    fn build(
        write_fd: RawFd,
        read_fd: RawFd,
        evloop: L,
        hook: Option<Box<dyn FnMut(WritePayload)>>,
    ) -> Result<Self, Error> {
        if write_fd < 0 || read_fd < 0 {
            return Err(Error::InvalidArgument);
        }

        let queue = match hook {
            Some(mut hook) => {
                IndexedList::with_disposer(INITIAL_QUEUE_CAPACITY, move |req: WriteRequest| {
                    hook(req.payload)
                })
            }
            None => IndexedList::new(INITIAL_QUEUE_CAPACITY),
        };

        let wsub = evloop.register(write_fd, Interest::WRITE)?;
        let rsub = evloop.register(read_fd, Interest::READ)?;

        Ok(Self {
            wfd: write_fd,
            rfd: read_fd,
            queue,
            wsub,
            rsub,
            evloop,
        })
    }

    /// The write descriptor this engine drains into.
    pub fn write_fd(&self) -> RawFd {
        self.wfd
    }

    /// The read descriptor this engine reports readiness for.
    pub fn read_fd(&self) -> RawFd {
        self.rfd
    }

    /// Number of write requests queued and not yet completed.
    ///
    /// The engine imposes no ceiling; owners that need bounded memory
    /// watch this and stop enqueueing.
    pub fn pending(&self) -> usize {
        self.queue.count()
    }

    /// Queues `buffer` for writing.
    ///
    /// Ownership moves to the engine until the completion callback
    /// hands it back. The write subscription is started (idempotently)
    /// so a non-empty queue is always being listened for.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] on an empty buffer;
    /// [`Error::AllocationFailure`] when the queue cannot grow. The
    /// request is not queued in either case.
    pub fn write(&mut self, buffer: Vec<u8>) -> Result<(), Error> {
        if buffer.is_empty() {
            return Err(Error::InvalidArgument);
        }
        self.enqueue(WritePayload::Single(buffer))
    }

    /// Queues a gathered write of several segments, completed as one
    /// request.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when there are no segments or no
    /// bytes across all of them; [`Error::AllocationFailure`] when the
    /// queue cannot grow.
    pub fn write_vectored(&mut self, segments: Vec<Vec<u8>>) -> Result<(), Error> {
        if segments.is_empty() || segments.iter().all(Vec::is_empty) {
            return Err(Error::InvalidArgument);
        }
        self.enqueue(WritePayload::Vectored(segments))
    }

    fn enqueue(&mut self, payload: WritePayload) -> Result<(), Error> {
        self.queue.push_tail(WriteRequest::new(payload))?;
        // A non-empty queue must be listening for writability; starting
        // an already-active subscription is a no-op.
        self.evloop.start(&self.wsub);
        Ok(())
    }

    /// Drains the write queue as far as the descriptor will allow.
    ///
    /// Call on every write-readiness notification. Each completed
    /// request is handed to `ops.on_write_complete` with its payload;
    /// when the queue empties the same callback fires once more with
    /// `None`, and its return decides whether the subscription stays
    /// active. A would-block pauses the drain silently; any other error
    /// is reported once through `ops.on_error` and ends processing of
    /// this event.
    pub fn handle_writable<O: AioOps<L>>(&mut self, ops: &mut O) {
        debug!("write event on fd {}", self.wfd);

        while let Some(head) = self.queue.head() {
            let written = match self.queue.get(head) {
                Some(req) => write_some(self.wfd, req),
                None => return,
            };

            if written < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::WouldBlock {
                    debug!("write would block; waiting for the next write event");
                    return;
                }
                warn!("write error on fd {}: {}", self.wfd, err);
                ops.on_error(self, err);
                return;
            }

            let complete = match self.queue.get_mut(head) {
                Some(req) => {
                    req.advance(written as usize);
                    req.is_complete()
                }
                None => return,
            };

            if complete {
                if let Some((req, _)) = self.queue.pop(Some(head)) {
                    debug!("write request complete; calling write callback");
                    // The queue-empty call below has the final say on
                    // the subscription.
                    let _ = ops.on_write_complete(self, Some(req.payload));
                }
            }
        }

        debug!("write queue drained; calling write callback with no buffer");
        if !ops.on_write_complete(self, None) {
            self.evloop.stop(&self.wsub);
        }
    }

    /// Reports read availability to the owner.
    ///
    /// Call on every read-readiness notification. Queries how many
    /// bytes are waiting without consuming any, then invokes
    /// `ops.on_readable`; a `false` return stops the read subscription.
    /// A failed availability query is reported through `ops.on_error`
    /// instead.
    pub fn handle_readable<O: AioOps<L>>(&mut self, ops: &mut O) {
        debug!("read event on fd {}", self.rfd);

        let available = match sys::sys_available(self.rfd) {
            Ok(n) => n,
            Err(err) => {
                ops.on_error(self, err);
                return;
            }
        };

        debug!("calling read callback; {available} bytes available");
        if !ops.on_readable(self, available) {
            self.evloop.stop(&self.rsub);
        }
    }

    /// Routes a combined readiness report into the per-direction
    /// handlers, write side first so completed requests free their
    /// queue slots before the owner reacts to inbound data.
    pub fn handle_ready<O: AioOps<L>>(&mut self, ready: Readiness, ops: &mut O) {
        if ready.writable {
            self.handle_writable(ops);
        }
        if ready.readable {
            self.handle_readable(ops);
        }
    }

    /// Reads up to `buffer.len()` bytes from the read descriptor.
    ///
    /// The engine never reads on its own; owners call this from (or
    /// after) their readable callback.
    ///
    /// # Errors
    ///
    /// `InvalidInput` on an empty buffer, `UnexpectedEof` when the
    /// descriptor reports end-of-stream, otherwise the OS error.
    pub fn read(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
        if buffer.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "empty read buffer",
            ));
        }

        match sys::sys_read(self.rfd, buffer) {
            n @ 1.. => Ok(n as usize),
            0 => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "end of stream",
            )),
            _ => Err(io::Error::last_os_error()),
        }
    }

    /// Starts or stops read-readiness delivery. The engine never flips
    /// this on its own; only the readable callback's `false` return
    /// also stops it.
    pub fn enable_read_events(&self, enable: bool) {
        if enable {
            self.evloop.start(&self.rsub);
        } else {
            self.evloop.stop(&self.rsub);
        }
    }

    /// Starts or stops write-readiness delivery. Rarely needed
    /// directly: enqueueing starts the subscription and the drained
    /// callback can stop it.
    pub fn enable_write_events(&self, enable: bool) {
        if enable {
            self.evloop.start(&self.wsub);
        } else {
            self.evloop.stop(&self.wsub);
        }
    }

    /// Best-effort durability request on both descriptors. Independent
    /// of the drain: queued requests are not flushed by this call.
    pub fn flush(&self) -> io::Result<()> {
        let write_side = sys::sys_fsync(self.wfd);
        let read_side = sys::sys_fsync(self.rfd);
        write_side.and(read_side)
    }
}

impl<L: EventLoop> Drop for AioFd<L> {
    fn drop(&mut self) {
        self.evloop.stop(&self.wsub);
        self.evloop.stop(&self.rsub);
        self.evloop.deregister(&self.wsub);
        self.evloop.deregister(&self.rsub);
        // Queued payloads go to the teardown hook; completion callbacks
        // never fire for dropped requests.
        self.queue.clear();
    }
}

/// One non-blocking write attempt from the request's resume position.
///
/// Returns the raw syscall result; negative means inspect
/// `io::Error::last_os_error()`.
fn write_some(fd: RawFd, req: &WriteRequest) -> isize {
    match &req.payload {
        WritePayload::Single(buf) => sys::sys_write(fd, &buf[req.offset..]),
        WritePayload::Vectored(segments) => {
            let iov = gather(segments, req.seg, req.offset);
            if iov.is_empty() {
                0
            } else {
                sys::sys_writev(fd, &iov)
            }
        }
    }
}

/// Builds the iovec array for the unaccepted remainder of a vectored
/// request: the current segment from its offset, then every later
/// segment whole. Empty slices are skipped.
fn gather(segments: &[Vec<u8>], seg: usize, offset: usize) -> Vec<iovec> {
    let mut iov = Vec::with_capacity(segments.len().saturating_sub(seg));
    for (i, segment) in segments.iter().enumerate().skip(seg) {
        let slice = if i == seg {
            &segment[offset..]
        } else {
            &segment[..]
        };
        if slice.is_empty() {
            continue;
        }
        iov.push(iovec {
            iov_base: slice.as_ptr() as *mut _,
            iov_len: slice.len(),
        });
    }
    iov
}
