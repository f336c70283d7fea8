use std::{fmt::Debug, mem, thread::panicking};

use tracing::{debug, error, trace};

use crate::{CapturedErrors, ErrorCollector};

/// Collects errors from a series of operations without stopping at the first one, then surfaces
/// them all together as a single [`CapturedErrors`].
///
/// The easiest way to use a `Capturer` is through [`scope`], which runs a closure and performs the
/// final check for you. Errors from individually wrapped operations are captured and execution
/// continues; an error which escapes the closure itself (e.g. via `?`) is captured last.
///
/// ```
/// # use capturer::Capturer;
/// let result = Capturer::<anyhow::Error>::scope(|capturer| {
///     for value in ["one", "2", "three"] {
///         capturer.capture(|| value.parse::<u32>());
///     }
///     "four".parse::<u32>()?;
///     Ok(())
/// });
///
/// let captured = result.unwrap_err();
/// assert_eq!(captured.len(), 3);
/// ```
///
/// `Capturer` can also be driven by hand, finishing with [`finish`] or [`exit`]. Both consume the
/// capturer, so the same errors can never be surfaced twice, and a capturer can't be reused for an
/// unrelated scope.
///
/// Like an error sentinel, `Capturer` has a custom implementation of [`Drop`] which checks that the
/// captured errors were surfaced, and panics if not:
///
/// ```should_panic
/// # use capturer::Capturer;
/// {
///     let mut capturer: Capturer = Capturer::new();
///     capturer.capture(|| "one".parse::<u32>());
///     // Panic occurs here!
/// }
/// ```
///
/// A capturer that never captured anything can be dropped freely.
///
/// [`scope`]: Capturer::scope
/// [`finish`]: Capturer::finish
/// [`exit`]: Capturer::exit
#[derive(Debug)]
pub struct Capturer<E = anyhow::Error> {
    /// The captured errors, in capture order. Only ever pushed to until the capturer is consumed.
    errors: Vec<E>,
}

impl<E> Capturer<E> {
    /// Constructs a new `Capturer` with no errors.
    pub fn new() -> Self {
        Self { errors: vec![] }
    }

    /// Constructs a new `Capturer` with room for `capacity` errors before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { errors: Vec::with_capacity(capacity) }
    }

    /// Runs a single operation, capturing its error if it fails.
    ///
    /// If the operation succeeds its value is returned. If it fails, the error is recorded and
    /// `None` is returned instead, so the caller can carry on with the next operation.
    ///
    /// ```
    /// # use capturer::Capturer;
    /// let mut capturer: Capturer = Capturer::new();
    ///
    /// assert_eq!(capturer.capture(|| "2".parse::<u32>()), Some(2));
    /// assert_eq!(capturer.capture(|| "three".parse::<u32>()), None);
    /// assert_eq!(capturer.len(), 1);
    /// # capturer.finish().unwrap_err();
    /// ```
    ///
    /// Blocks of several fallible steps can be captured as one unit:
    ///
    /// ```
    /// # use capturer::Capturer;
    /// let mut capturer: Capturer = Capturer::new();
    /// capturer.capture(|| -> anyhow::Result<()> {
    ///     let a: u32 = "1".parse()?;
    ///     let b: u32 = "b".parse()?;
    ///     println!("{}", a + b); // never reached
    ///     Ok(())
    /// });
    /// assert_eq!(capturer.len(), 1);
    /// # capturer.finish().unwrap_err();
    /// ```
    pub fn capture<T, F>(&mut self, op: impl FnOnce() -> Result<T, F>) -> Option<T>
    where
        F: Into<E>,
    {
        self.record(op())
    }

    /// Invokes `func` with `args`, capturing its error if it fails.
    ///
    /// This is [`capture`](Capturer::capture) for an existing function, where the arguments are
    /// passed alongside it rather than closed over.
    ///
    /// ```
    /// # use capturer::Capturer;
    /// fn divide((a, b): (u32, u32)) -> anyhow::Result<u32> {
    ///     a.checked_div(b).ok_or_else(|| anyhow::anyhow!("division of {a} by zero"))
    /// }
    ///
    /// let mut capturer: Capturer = Capturer::new();
    /// assert_eq!(capturer.call(divide, (10, 2)), Some(5));
    /// assert_eq!(capturer.call(divide, (10, 0)), None);
    ///
    /// let captured = capturer.finish().unwrap_err();
    /// assert_eq!(captured.errors()[0].to_string(), "division of 10 by zero");
    /// ```
    pub fn call<A, T, F>(&mut self, func: impl FnOnce(A) -> Result<T, F>, args: A) -> Option<T>
    where
        F: Into<E>,
    {
        self.record(func(args))
    }

    /// Inspect the captured errors, without surfacing them.
    pub fn peek(&self) -> &[E] {
        &self.errors
    }

    /// The number of errors captured so far.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns `true` if nothing has been captured.
    ///
    /// Opposite of [`has_errors`](#method.has_errors).
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns `true` if at least one error has been captured.
    ///
    /// Opposite of [`is_empty`](#method.is_empty).
    pub fn has_errors(&self) -> bool {
        !self.is_empty()
    }
}

impl<E: Debug> Capturer<E> {
    /// Runs `body` inside a new capture scope, then surfaces everything that was captured.
    ///
    /// `body` receives the capturer to wrap individual operations with. Whatever `body` returns is
    /// passed to [`exit`](Capturer::exit): an error escaping the body is captured after all the
    /// others, and if anything at all was captured the result is a single [`CapturedErrors`].
    ///
    /// ```
    /// # use capturer::Capturer;
    /// let result = Capturer::<anyhow::Error>::scope(|_| {
    ///     let n: u32 = "four".parse()?;
    ///     Ok(n)
    /// });
    ///
    /// let captured = result.unwrap_err();
    /// assert_eq!(captured.errors()[0].to_string(), "invalid digit found in string");
    /// ```
    ///
    /// If nothing fails, the body's value is returned:
    ///
    /// ```
    /// # use capturer::Capturer;
    /// let result = Capturer::<anyhow::Error>::scope(|capturer| {
    ///     let n = capturer.capture(|| "2".parse::<u32>());
    ///     Ok(n)
    /// });
    /// assert_eq!(result.unwrap(), Some(2));
    /// ```
    pub fn scope<R>(
        body: impl FnOnce(&mut Self) -> Result<R, E>,
    ) -> Result<R, CapturedErrors<E>> {
        trace!("entering capture scope");

        let mut capturer = Self::new();
        let outcome = body(&mut capturer);
        capturer.exit(outcome)
    }

    /// Ends the capture scope with the outcome of its body.
    ///
    /// If `outcome` is an error it is captured last, after anything captured earlier. Then, as
    /// with [`finish`](Capturer::finish), all captured errors are surfaced together. The body's
    /// value is only returned when nothing was captured at all.
    ///
    /// ```
    /// # use capturer::Capturer;
    /// let mut capturer: Capturer = Capturer::new();
    /// capturer.capture(|| "one".parse::<u32>());
    ///
    /// let outcome = Err(anyhow::anyhow!("body failed"));
    /// let captured = capturer.exit::<(), _>(outcome).unwrap_err();
    ///
    /// assert_eq!(captured.len(), 2);
    /// assert_eq!(captured.errors()[1].to_string(), "body failed");
    /// ```
    pub fn exit<R, F>(mut self, outcome: Result<R, F>) -> Result<R, CapturedErrors<E>>
    where
        F: Into<E>,
    {
        match outcome {
            Ok(value) => self.finish().map(|()| value),
            Err(error) => {
                self.push_error(error.into());
                Err(self.surface())
            }
        }
    }

    /// Surfaces the captured errors, if there are any.
    ///
    /// Returns a [`CapturedErrors`] holding every captured error in capture order, or `Ok(())` if
    /// there were none.
    ///
    /// ```
    /// # use capturer::Capturer;
    /// let capturer: Capturer = Capturer::new();
    /// assert!(capturer.finish().is_ok());
    /// ```
    pub fn finish(mut self) -> Result<(), CapturedErrors<E>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.surface())
        }
    }

    /// Moves the errors out into an aggregate. Must only be called with at least one error.
    fn surface(&mut self) -> CapturedErrors<E> {
        debug!(captured = self.errors.len(), "capture scope finished with errors");
        CapturedErrors::new(mem::take(&mut self.errors))
    }
}

impl<E> Default for Capturer<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> ErrorCollector<E> for Capturer<E> {
    fn push_error(&mut self, error: E) {
        self.errors.push(error);
        debug!(captured = self.errors.len(), "captured error");
    }
}

impl<E> Drop for Capturer<E> {
    fn drop(&mut self) {
        // Let's not add on our own panic if the thread's already panicking. Things are bad enough!
        if !panicking() && !self.errors.is_empty() {
            error!(captured = self.errors.len(), "capturer dropped without surfacing errors");
            panic!(
                "capturer dropped without surfacing errors: {} error(s) captured",
                self.errors.len(),
            );
        }
    }
}
