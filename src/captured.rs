use std::fmt::Debug;

use thiserror::Error;

/// The single failure produced when a [`Capturer`] finishes holding one or more errors.
///
/// The message is always the same; the interesting part is the ordered list of underlying errors,
/// which keep their original types. With the default [`anyhow::Error`] the original kind is still
/// reachable through [`anyhow::Error::downcast_ref`].
///
/// ```
/// # use capturer::Capturer;
/// let mut capturer: Capturer = Capturer::new();
/// capturer.capture(|| "one".parse::<u32>());
///
/// let captured = capturer.finish().unwrap_err();
/// assert_eq!(captured.to_string(), "multiple failures were captured");
/// assert!(captured.errors()[0].downcast_ref::<std::num::ParseIntError>().is_some());
/// ```
///
/// A `CapturedErrors` is never empty.
///
/// [`Capturer`]: crate::Capturer
#[derive(Debug, Error)]
#[error("multiple failures were captured")]
pub struct CapturedErrors<E: Debug = anyhow::Error> {
    errors: Vec<E>,
}

impl<E: Debug> CapturedErrors<E> {
    /// Wraps errors which the caller guarantees to be non-empty.
    pub(crate) fn new(errors: Vec<E>) -> Self {
        debug_assert!(!errors.is_empty());
        Self { errors }
    }

    /// The captured errors, in the order they were captured.
    pub fn errors(&self) -> &[E] {
        &self.errors
    }

    /// Consumes the aggregate, returning the captured errors in order.
    pub fn into_errors(self) -> Vec<E> {
        self.errors
    }

    /// The number of captured errors. Always at least one.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.errors.iter()
    }
}

impl<E: Debug> IntoIterator for CapturedErrors<E> {
    type Item = E;
    type IntoIter = std::vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a, E: Debug> IntoIterator for &'a CapturedErrors<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Shorthand for a [`Result`](std::result::Result) whose error is a [`CapturedErrors`].
pub type Result<T, E = anyhow::Error> = std::result::Result<T, CapturedErrors<E>>;
