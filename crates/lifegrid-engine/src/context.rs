//! Computation contexts: where the stepper runs.
//!
//! The coordinator talks to a [`ComputeContext`] purely through
//! [`ToWorker`]/[`FromWorker`] messages. Two implementations ship:
//!
//! - [`ThreadedContext`]: a named worker thread connected by unbounded
//!   crossbeam channels. Dropping the context shuts the thread down and
//!   joins it.
//! - [`InlineContext`]: no thread. Each message is handled during
//!   `send`, and replies wait in a queue until the coordinator pumps.

use std::collections::VecDeque;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use lifegrid_core::EngineError;

use crate::config::ConfigError;
use crate::protocol::{FromWorker, ToWorker};
use crate::worker::{self, Reply, Worker};

/// Message transport between the coordinator and a stepper.
///
/// Every method returns [`EngineError::ComputationUnavailable`] once the
/// other side is gone. Implementations must deliver replies in the order
/// the requests that produced them were sent.
pub trait ComputeContext: Send {
    /// Hand a message to the stepper.
    fn send(&mut self, msg: ToWorker) -> Result<(), EngineError>;

    /// Next reply if one is ready, without blocking.
    fn try_recv(&mut self) -> Result<Option<FromWorker>, EngineError>;

    /// Next reply, waiting up to `timeout` for one to arrive.
    fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<FromWorker>, EngineError>;
}

fn unavailable(reason: &str) -> EngineError {
    EngineError::ComputationUnavailable {
        reason: reason.to_string(),
    }
}

// ── ThreadedContext ────────────────────────────────────────────────

/// Stepper on a dedicated `lifegrid-step` thread.
pub struct ThreadedContext {
    to_worker: Sender<ToWorker>,
    from_worker: Receiver<FromWorker>,
    thread: Option<JoinHandle<()>>,
}

impl ThreadedContext {
    /// Spawn the worker thread.
    pub fn spawn() -> Result<Self, ConfigError> {
        let (to_worker, worker_rx) = crossbeam_channel::unbounded();
        let (worker_tx, from_worker) = crossbeam_channel::unbounded();
        let thread = thread::Builder::new()
            .name("lifegrid-step".into())
            .spawn(move || worker::run(worker_rx, worker_tx))
            .map_err(|e| ConfigError::ThreadSpawnFailed {
                reason: e.to_string(),
            })?;
        Ok(Self {
            to_worker,
            from_worker,
            thread: Some(thread),
        })
    }

    /// Stop the worker and join it. Idempotent.
    pub fn shutdown(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        // A send error means the worker already exited.
        let _ = self.to_worker.send(ToWorker::Shutdown);
        if thread.join().is_err() {
            tracing::warn!("step worker panicked");
        }
    }
}

impl ComputeContext for ThreadedContext {
    fn send(&mut self, msg: ToWorker) -> Result<(), EngineError> {
        self.to_worker
            .send(msg)
            .map_err(|_| unavailable("step worker disconnected"))
    }

    fn try_recv(&mut self) -> Result<Option<FromWorker>, EngineError> {
        match self.from_worker.try_recv() {
            Ok(msg) => Ok(Some(msg)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(unavailable("step worker disconnected")),
        }
    }

    fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<FromWorker>, EngineError> {
        match self.from_worker.recv_timeout(timeout) {
            Ok(msg) => Ok(Some(msg)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(unavailable("step worker disconnected")),
        }
    }
}

impl Drop for ThreadedContext {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ── InlineContext ──────────────────────────────────────────────────

/// Stepper on the caller's thread.
///
/// Work happens inside [`send`](ComputeContext::send); replies are
/// queued, so the coordinator still observes them only when it pumps and
/// keeps its single-in-flight and stale-discard bookkeeping.
pub struct InlineContext {
    worker: Worker,
    outbox: VecDeque<FromWorker>,
    closed: bool,
}

impl InlineContext {
    /// Create an idle inline context.
    pub fn new() -> Self {
        Self {
            worker: Worker::new(),
            outbox: VecDeque::new(),
            closed: false,
        }
    }

    /// Number of replies waiting to be pumped.
    pub fn queued(&self) -> usize {
        self.outbox.len()
    }
}

impl Default for InlineContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ComputeContext for InlineContext {
    fn send(&mut self, msg: ToWorker) -> Result<(), EngineError> {
        if self.closed {
            return Err(unavailable("inline context shut down"));
        }
        match self.worker.handle(msg) {
            Reply::Send(replies) => self.outbox.extend(replies),
            Reply::Shutdown => self.closed = true,
        }
        Ok(())
    }

    fn try_recv(&mut self) -> Result<Option<FromWorker>, EngineError> {
        match self.outbox.pop_front() {
            Some(msg) => Ok(Some(msg)),
            None if self.closed => Err(unavailable("inline context shut down")),
            None => Ok(None),
        }
    }

    fn recv_timeout(&mut self, _timeout: Duration) -> Result<Option<FromWorker>, EngineError> {
        // Nothing can arrive later than now.
        self.try_recv()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifegrid_core::{Dims, Epoch, LifeRule, Topology};

    fn init_msg() -> ToWorker {
        ToWorker::Init {
            epoch: Epoch(0),
            dims: Dims::new(3, 3),
            state: vec![0; 9],
            topology: Topology::Bounded,
            rule: LifeRule::CONWAY,
        }
    }

    #[test]
    fn inline_queues_until_received() {
        let mut ctx = InlineContext::new();
        ctx.send(init_msg()).unwrap();
        assert_eq!(ctx.queued(), 1);
        assert!(matches!(
            ctx.try_recv().unwrap(),
            Some(FromWorker::Ready { .. })
        ));
        assert!(ctx.try_recv().unwrap().is_none());
    }

    #[test]
    fn inline_shutdown_is_terminal() {
        let mut ctx = InlineContext::new();
        ctx.send(ToWorker::Shutdown).unwrap();
        assert!(ctx.send(init_msg()).is_err());
        assert!(matches!(
            ctx.try_recv(),
            Err(EngineError::ComputationUnavailable { .. })
        ));
    }

    #[test]
    fn threaded_round_trip_and_shutdown() {
        let mut ctx = ThreadedContext::spawn().unwrap();
        ctx.send(init_msg()).unwrap();
        let reply = ctx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(reply, Some(FromWorker::Ready { .. })));

        ctx.shutdown();
        ctx.shutdown();
        assert!(matches!(
            ctx.send(init_msg()),
            Err(EngineError::ComputationUnavailable { .. })
        ));
        assert!(ctx.try_recv().is_err());
    }
}
