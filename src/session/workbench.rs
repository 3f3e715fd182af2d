use std::sync::{Mutex, MutexGuard, TryLockError};

use crate::encode::sink::VideoEncoder;
use crate::foundation::error::ChromaError;
use crate::session::cooperative::Cooperative;
use crate::session::run_session::{Progress, RunFailure, RunOutput, RunSession};

/// Single-slot owner that serializes runs and keeps the latest output.
///
/// Starting a run while another one holds the slot fails with [`ChromaError::Busy`]. Starting a
/// run releases the previous output before any work begins.
#[derive(Debug, Default)]
pub struct Workbench {
    slot: Mutex<Option<RunOutput>>,
}

impl Workbench {
    /// An empty workbench.
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute `session` and store its output in the slot.
    pub fn run<E: VideoEncoder + ?Sized>(
        &self,
        session: RunSession,
        encoder: &mut E,
        coop: &mut Cooperative<'_>,
        progress: &mut dyn FnMut(Progress),
    ) -> Result<(), RunFailure> {
        let mut slot = self.try_slot().map_err(|error| RunFailure {
            error,
            frames: Vec::new(),
        })?;
        if slot.take().is_some() {
            tracing::debug!("released previous run output");
        }
        let out = session.run(encoder, coop, progress)?;
        *slot = Some(out);
        Ok(())
    }

    /// `true` while a run holds the slot.
    pub fn is_busy(&self) -> bool {
        matches!(self.slot.try_lock(), Err(TryLockError::WouldBlock))
    }

    /// Apply `f` to the latest output, if any. Fails with `Busy` while a run is active.
    pub fn with_latest<T>(
        &self,
        f: impl FnOnce(Option<&RunOutput>) -> T,
    ) -> Result<T, ChromaError> {
        let slot = self.try_slot()?;
        Ok(f(slot.as_ref()))
    }

    /// Move the latest output out of the slot.
    pub fn take_latest(&self) -> Result<Option<RunOutput>, ChromaError> {
        Ok(self.try_slot()?.take())
    }

    fn try_slot(&self) -> Result<MutexGuard<'_, Option<RunOutput>>, ChromaError> {
        match self.slot.try_lock() {
            Ok(guard) => Ok(guard),
            Err(TryLockError::WouldBlock) => Err(ChromaError::Busy),
            // A panicked run leaves no usable output behind.
            Err(TryLockError::Poisoned(poisoned)) => {
                let mut guard = poisoned.into_inner();
                *guard = None;
                self.slot.clear_poison();
                Ok(guard)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/workbench.rs"]
mod tests;
