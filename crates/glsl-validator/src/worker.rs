//! Running validation jobs off the host's event thread.

use crate::error::ValidatorError;
use crate::pipeline::{ValidationJob, ValidationOutcome, ValidationPipeline};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Runs each submitted job on its own thread and hands outcomes back through a channel.
///
/// The host polls [`Self::try_recv`] (or blocks in [`Self::recv_timeout`]) from its event
/// thread and passes every outcome to the owning session, which discards stale ones.
pub struct ValidationWorker {
    pipeline: Arc<ValidationPipeline>,
    tx: mpsc::Sender<ValidationOutcome>,
    rx: mpsc::Receiver<ValidationOutcome>,
    in_flight: usize,
}

impl ValidationWorker {
    /// Create a worker around `pipeline`.
    pub fn new(pipeline: ValidationPipeline) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            pipeline: Arc::new(pipeline),
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Start running `job` in the background.
    pub fn submit(&mut self, job: ValidationJob) -> Result<(), ValidatorError> {
        let pipeline = Arc::clone(&self.pipeline);
        let tx = self.tx.clone();
        let name = format!("glsl-validate-{}", job.generation);

        thread::Builder::new().name(name).spawn(move || {
            let outcome = pipeline.run(job);
            let _ = tx.send(outcome);
        })?;

        self.in_flight += 1;
        Ok(())
    }

    /// Number of submitted jobs whose outcome has not been received yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Receive a finished outcome without blocking.
    pub fn try_recv(&mut self) -> Option<ValidationOutcome> {
        let outcome = self.rx.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(outcome)
    }

    /// Wait up to `timeout` for the next finished outcome.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<ValidationOutcome> {
        let outcome = self.rx.recv_timeout(timeout).ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(outcome)
    }

    /// Receive every outcome that has already finished.
    pub fn drain(&mut self) -> Vec<ValidationOutcome> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}
