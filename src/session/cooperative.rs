use crate::foundation::error::{ChromaError, ChromaResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Hook through which a run hands control back to its host between units of work.
pub trait HostYield {
    /// Give the host a chance to process its own events; returns when the run may continue.
    fn yield_to_host(&mut self);
}

impl<T: HostYield + ?Sized> HostYield for &mut T {
    fn yield_to_host(&mut self) {
        (**self).yield_to_host();
    }
}

/// Default host: yields the current OS thread time slice.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadYield;

impl HostYield for ThreadYield {
    fn yield_to_host(&mut self) {
        std::thread::yield_now();
    }
}

/// Cloneable flag used to abort a run from outside (another thread or a host callback).
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// A fresh, un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; observed at the next checkpoint.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// `true` once [`CancellationToken::cancel`] has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Cooperative scheduler threaded through every stage of a run.
///
/// Stages call [`Cooperative::checkpoint`] between levels and after each processing chunk, so the
/// host is never starved for longer than one chunk of work.
pub struct Cooperative<'h> {
    host: Box<dyn HostYield + 'h>,
    token: CancellationToken,
    yields: u64,
}

impl<'h> Cooperative<'h> {
    /// Scheduler yielding through `host` and observing `token`.
    pub fn new(host: impl HostYield + 'h, token: CancellationToken) -> Self {
        Self {
            host: Box::new(host),
            token,
            yields: 0,
        }
    }

    /// Scheduler with the [`ThreadYield`] host and a private token.
    pub fn detached() -> Cooperative<'static> {
        Cooperative::new(ThreadYield, CancellationToken::new())
    }

    /// Yield to the host, then fail with [`ChromaError::Cancelled`] if cancellation was requested.
    pub fn checkpoint(&mut self) -> ChromaResult<()> {
        self.host.yield_to_host();
        self.yields += 1;
        if self.token.is_cancelled() {
            tracing::debug!(yields = self.yields, "run cancelled at checkpoint");
            return Err(ChromaError::Cancelled);
        }
        Ok(())
    }

    /// Number of checkpoints passed so far.
    pub fn yields(&self) -> u64 {
        self.yields
    }

    /// The token observed by this scheduler.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/cooperative.rs"]
mod tests;
