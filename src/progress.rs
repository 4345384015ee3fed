use tokio_util::sync::CancellationToken;

/// Receives the cumulative digit count after every computed block.
///
/// Returning `false` asks the driver to stop; it is honored before the next
/// block starts.
pub trait Progress {
    fn report(&mut self, produced: u64) -> bool;
}

impl<F> Progress for F
where
    F: FnMut(u64) -> bool,
{
    fn report(&mut self, produced: u64) -> bool {
        self(produced)
    }
}

/// A reporter that only observes and never asks to stop.
pub struct Observe<F>(F);

/// Wraps a closure that cannot cancel into a [`Progress`].
pub fn observe<F: FnMut(u64)>(f: F) -> Observe<F> {
    Observe(f)
}

impl<F: FnMut(u64)> Progress for Observe<F> {
    fn report(&mut self, produced: u64) -> bool {
        (self.0)(produced);
        true
    }
}

/// Forwards to an inner reporter, then stops once the token is cancelled.
pub struct Cancellable<P> {
    token: CancellationToken,
    inner: P,
}

impl<P> Cancellable<P> {
    /// Creates a new `Cancellable` reporter.
    ///
    /// # Args
    /// * `token` - Shared cancellation signal, set by the consumer.
    /// * `inner` - The reporter that sees every block, including the last one.
    ///
    /// # Returns
    /// A new `Cancellable` instance.
    pub fn new(token: CancellationToken, inner: P) -> Self {
        Self { token, inner }
    }
}

impl<P: Progress> Progress for Cancellable<P> {
    fn report(&mut self, produced: u64) -> bool {
        let keep_going = self.inner.report(produced);
        keep_going && !self.token.is_cancelled()
    }
}
