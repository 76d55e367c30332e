use crate::aio::WritePayload;

/// A queued write and its resume position.
///
/// `seg` and `offset` mark the first byte the descriptor has not yet
/// accepted, so a partially-written request resumes exactly where it
/// stopped. Earlier designs resubmitted the whole segment vector after a
/// partial vectored write and tracked only the aggregate byte count,
/// which resends accepted bytes unless the write primitive is itself
/// resumable; the per-segment position closes that hole.
pub(crate) struct WriteRequest {
    pub(crate) payload: WritePayload,
    /// Index of the segment holding the next unaccepted byte.
    pub(crate) seg: usize,
    /// Byte offset of that byte within `seg`.
    pub(crate) offset: usize,
    /// Total bytes the descriptor has not yet accepted.
    pub(crate) remaining: usize,
}

impl WriteRequest {
    pub(crate) fn new(payload: WritePayload) -> Self {
        let remaining = payload.len();
        Self {
            payload,
            seg: 0,
            offset: 0,
            remaining,
        }
    }

    /// Advances the resume position past `accepted` bytes.
    ///
    /// Clamped to the bytes actually outstanding, so `remaining` cannot
    /// underflow even if the descriptor reports more than was submitted.
    pub(crate) fn advance(&mut self, accepted: usize) {
        let accepted = accepted.min(self.remaining);
        self.remaining -= accepted;

        match &self.payload {
            WritePayload::Single(_) => {
                self.offset += accepted;
            }
            WritePayload::Vectored(segments) => {
                let mut left = accepted;
                while left > 0 {
                    let in_segment = segments[self.seg].len() - self.offset;
                    if left < in_segment {
                        self.offset += left;
                        break;
                    }
                    left -= in_segment;
                    self.seg += 1;
                    self.offset = 0;
                }
            }
        }
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}
