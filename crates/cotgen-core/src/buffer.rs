//! Streaming buffers of correlated randomness.
//!
//! A buffer is an ordered sequence of entries which may be produced over
//! several rounds. Entries are ordered from oldest to newest: index `0` is the
//! most significant end of the buffer and the newest entry is the least
//! significant.
//!
//! - [`Buffer::merge`] appends another buffer after the newest entry.
//! - [`Buffer::split`] removes and returns the `length` newest entries.
//! - [`Buffer::reduce`] keeps only the `length` newest entries.
//! - [`Buffer::take`] removes and returns the `count` oldest entries.

/// Errors that can occur when operating on a [`Buffer`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    /// The requested length is outside of `(0, available]`.
    #[error("invalid length {length}, must be in (0, {available}]")]
    InvalidLength {
        /// Requested length.
        length: usize,
        /// Number of entries in the buffer.
        available: usize,
    },
    /// The buffers are not compatible and can not be merged.
    #[error("buffer mismatch: {0}")]
    Mismatch(String),
}

/// Checks that `length` is in `(0, available]`.
#[inline]
pub fn check_length(length: usize, available: usize) -> Result<(), BufferError> {
    if length == 0 || length > available {
        return Err(BufferError::InvalidLength { length, available });
    }

    Ok(())
}

/// A buffer of correlated randomness which supports streaming operations.
pub trait Buffer: Sized {
    /// Returns the number of entries in the buffer.
    fn len(&self) -> usize;

    /// Returns `true` if the buffer is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends `other` to the buffer.
    fn merge(&mut self, other: Self) -> Result<(), BufferError>;

    /// Removes and returns the `length` newest entries.
    ///
    /// Returns an error if `length` is outside of `(0, len]`, in which case the
    /// buffer is left unchanged.
    fn split(&mut self, length: usize) -> Result<Self, BufferError>;

    /// Truncates the buffer to its `length` newest entries.
    ///
    /// Returns an error if `length` is outside of `(0, len]`, in which case the
    /// buffer is left unchanged.
    fn reduce(&mut self, length: usize) -> Result<(), BufferError>;

    /// Removes and returns the `count` oldest entries.
    ///
    /// Returns an error if `count` is outside of `(0, len]`, in which case the
    /// buffer is left unchanged.
    fn take(&mut self, count: usize) -> Result<Self, BufferError> {
        let len = self.len();
        check_length(count, len)?;

        let mut head = self.split(len)?;
        if count < len {
            let rest = head.split(len - count)?;
            self.merge(rest)?;
        }

        Ok(head)
    }
}

impl<T> Buffer for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn merge(&mut self, mut other: Self) -> Result<(), BufferError> {
        self.append(&mut other);
        Ok(())
    }

    fn split(&mut self, length: usize) -> Result<Self, BufferError> {
        check_length(length, Vec::len(self))?;
        Ok(self.split_off(Vec::len(self) - length))
    }

    fn reduce(&mut self, length: usize) -> Result<(), BufferError> {
        check_length(length, Vec::len(self))?;
        self.drain(..Vec::len(self) - length);
        Ok(())
    }
}
