/// Something which failures can be recorded into.
///
/// This generalizes [`Capturer::capture`] so that helpers can record failures without knowing
/// where they end up.
///
/// [`Capturer::capture`]: crate::Capturer::capture
pub trait ErrorCollector<E> {
    /// Add a new error to the collection of errors.
    fn push_error(&mut self, error: E);

    /// Records the error of a [`Result`] if it has one, returning the success value otherwise.
    ///
    /// ```
    /// # use capturer::ErrorCollector;
    /// let mut errors: Vec<String> = vec![];
    ///
    /// assert_eq!(errors.record(Ok::<_, String>(1)), Some(1));
    /// assert_eq!(errors.record(Err::<u32, _>("oh no!")), None);
    /// assert_eq!(errors, vec!["oh no!".to_owned()]);
    /// ```
    fn record<T, F>(&mut self, result: Result<T, F>) -> Option<T>
    where
        F: Into<E>,
    {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.push_error(error.into());
                None
            }
        }
    }
}

impl<E> ErrorCollector<E> for Vec<E> {
    fn push_error(&mut self, error: E) {
        self.push(error);
    }
}
