use thiserror::Error;

/// Errors reported by the containers and by engine entry points.
///
/// OS-level I/O failures are not folded into this enum; they travel as
/// [`std::io::Error`], either through an `io::Result` return or through
/// the owner's error callback.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Growing a container could not obtain memory.
    ///
    /// The operation that triggered growth leaves no partial mutation
    /// behind: the container is exactly as it was before the call.
    #[error("allocation failed")]
    AllocationFailure,

    /// An argument failed boundary validation: an empty buffer, a zero
    /// segment count, a negative descriptor, or a handle that is out of
    /// range or no longer refers to a live slot.
    ///
    /// Rejected calls have strictly no side effect.
    #[error("invalid argument")]
    InvalidArgument,
}
