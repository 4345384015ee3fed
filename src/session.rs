use std::{
    num::NonZeroU64,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use log::{debug, info, warn};
use tokio::{
    sync::mpsc::{self, error::TryRecvError},
    task::{self, JoinHandle},
};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::{
    config::CalcConfig,
    driver::{self, Cancelled},
    error::{PiErr, Result},
    progress::{Cancellable, Progress},
};

/// A progress snapshot published after every computed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub produced: u64,
    pub total: u64,
}

impl ProgressEvent {
    /// Completed share of the request, in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.produced as f64 / self.total as f64
    }
}

/// Starts background computations, at most one at a time.
#[derive(Debug)]
pub struct Calculator {
    cfg: CalcConfig,
    busy: Arc<AtomicBool>,
}

impl Calculator {
    pub fn new(cfg: CalcConfig) -> Self {
        Self {
            cfg,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &CalcConfig {
        &self.cfg
    }

    /// Returns `true` while a worker started by this calculator has not exited.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Starts computing `digits` decimals of π on Tokio's blocking pool.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Args
    /// * `digits` - Number of decimals, in `1..=max_digits`.
    ///
    /// # Returns
    /// A handle to the running computation.
    ///
    /// # Errors
    /// `PiErr::DigitsOutOfRange` for a bad count, `PiErr::Busy` if a previous
    /// computation is still running.
    pub fn start(&self, digits: u64) -> Result<Session> {
        if let Err(e) = self.cfg.check_digits(digits) {
            warn!("rejecting request: {e}");
            return Err(e);
        }

        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("rejecting request for {digits} digits: a computation is in flight");
            return Err(PiErr::Busy);
        }

        let guard = BusyGuard(Arc::clone(&self.busy));
        Ok(Session::spawn(digits, self.cfg.log_every, guard))
    }
}

/// Releases the calculator when the worker exits, whatever the outcome.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Publishes every block to the session channel and logs every `log_every` blocks.
struct Reporter {
    tx: mpsc::UnboundedSender<ProgressEvent>,
    total: u64,
    log_every: NonZeroU64,
    blocks: u64,
}

impl Progress for Reporter {
    fn report(&mut self, produced: u64) -> bool {
        self.blocks += 1;
        if self.blocks % self.log_every.get() == 0 {
            info!("computed {produced}/{} digits", self.total);
        }

        // A consumer that dropped its receiver still owns the cancellation token.
        let _ = self.tx.send(ProgressEvent {
            produced,
            total: self.total,
        });
        true
    }
}

/// A computation running in the background.
///
/// Dropping the session cancels it; the worker exits after its current block.
#[derive(Debug)]
pub struct Session {
    total: u64,
    token: CancellationToken,
    events: mpsc::UnboundedReceiver<ProgressEvent>,
    handle: JoinHandle<std::result::Result<String, Cancelled>>,
    cancel_on_drop: DropGuard,
}

impl Session {
    fn spawn(total: u64, log_every: NonZeroU64, guard: BusyGuard) -> Self {
        let token = CancellationToken::new();
        let (tx, events) = mpsc::unbounded_channel();

        let reporter = Reporter {
            tx,
            total,
            log_every,
            blocks: 0,
        };
        let progress = Cancellable::new(token.clone(), reporter);

        info!("computing {total} digits of pi");
        let handle = task::spawn_blocking(move || {
            let _guard = guard;
            driver::compute(total, progress)
        });

        Self {
            total,
            cancel_on_drop: token.clone().drop_guard(),
            token,
            events,
            handle,
        }
    }

    /// Number of digits requested.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Returns a handle that cancels this session when triggered.
    pub fn cancel_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Asks the worker to stop after its current block. Idempotent.
    pub fn cancel(&self) {
        debug!("cancellation requested");
        self.token.cancel();
    }

    /// Returns `true` once the worker has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the next progress event.
    ///
    /// # Returns
    /// `None` once the worker has exited and every event has been consumed.
    pub async fn progress(&mut self) -> Option<ProgressEvent> {
        self.events.recv().await
    }

    /// Drains the events that are ready without blocking.
    ///
    /// # Returns
    /// The most recent one, if any.
    pub fn try_progress(&mut self) -> Option<ProgressEvent> {
        let mut latest = None;
        loop {
            match self.events.try_recv() {
                Ok(event) => latest = Some(event),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return latest,
            }
        }
    }

    /// Waits for the worker to exit and returns the digit string.
    ///
    /// # Errors
    /// `PiErr::Cancelled` if the session was cancelled, `PiErr::Join` if the
    /// worker panicked.
    pub async fn wait(self) -> Result<String> {
        let Session {
            total,
            handle,
            cancel_on_drop,
            ..
        } = self;

        // Held across the await so that dropping this future still cancels.
        let joined = handle.await;
        cancel_on_drop.disarm();

        match joined {
            Ok(Ok(pi)) => {
                info!("computed {total} digits of pi");
                Ok(pi)
            }
            Ok(Err(cancelled)) => {
                info!("computation of {total} digits cancelled");
                Err(cancelled.into())
            }
            Err(e) => Err(PiErr::Join(e.to_string())),
        }
    }

    /// Cancels the session and waits until the worker has exited.
    pub async fn shutdown(self) -> Result<()> {
        self.cancel();
        match self.wait().await {
            Ok(_) | Err(PiErr::Cancelled) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
