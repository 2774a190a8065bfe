//! Background transform with an explicit completion signal.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use common::ready_state::ReadyState;
use tracing::{debug, warn};

use crate::config::SepiaConfig;
use crate::error::{Error, Result};
use crate::raster::Raster;
use crate::strategy::{Strategy, TransformReport, apply};

/// A transform running on its own thread.
///
/// Completion is observed through [`is_finished`](Self::is_finished) or
/// [`wait`](Self::wait); [`join`](Self::join) hands the raster back.
#[derive(Debug)]
pub struct TransformTask {
    strategy: Strategy,
    done: ReadyState,
    handle: JoinHandle<Result<(Raster, TransformReport)>>,
}

/// Signals the latch when dropped, so a panicking transform still completes.
struct SignalOnDrop(ReadyState);

impl Drop for SignalOnDrop {
    fn drop(&mut self) {
        self.0.signal();
    }
}

/// Moves `raster` to a background thread and transforms it there.
///
/// The configuration is validated before the thread is started.
pub fn spawn_transform(
    mut raster: Raster,
    strategy: Strategy,
    config: SepiaConfig,
) -> Result<TransformTask> {
    config.validate()?;

    let done = ReadyState::new(1);
    let signal = SignalOnDrop(done.clone());

    let handle = thread::Builder::new()
        .name(format!("sepia-{strategy}"))
        .spawn(move || -> Result<(Raster, TransformReport)> {
            let _signal = signal;
            let report = apply(&mut raster, strategy, &config)?;
            Ok((raster, report))
        })
        .map_err(|source| {
            warn!(%strategy, error = %source, "Failed to spawn transform thread");
            Error::WorkerSpawn { index: 0, source }
        })?;

    debug!(%strategy, "Transform task started");

    Ok(TransformTask {
        strategy,
        done,
        handle,
    })
}

impl TransformTask {
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn is_finished(&self) -> bool {
        self.done.is_ready()
    }

    /// Blocks until the transform has finished.
    pub fn wait(&self) {
        self.done.wait();
    }

    /// Returns `true` if the transform finished within `timeout`.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        self.done.wait_timeout(timeout)
    }

    /// Waits for the transform and returns the transformed raster.
    pub fn join(self) -> Result<(Raster, TransformReport)> {
        match self.handle.join() {
            Ok(result) => result,
            Err(_) => {
                warn!(strategy = %self.strategy, "Transform thread panicked");
                Err(Error::WorkerPanicked { index: 0 })
            }
        }
    }
}
