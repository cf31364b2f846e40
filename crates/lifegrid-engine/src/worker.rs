//! The computation side of the protocol.
//!
//! [`Worker`] owns a [`GridStepper`] and turns each [`ToWorker`] message
//! into zero or more [`FromWorker`] replies. It never touches channels
//! or rules. [`run`] drives a worker over crossbeam channels on a
//! dedicated thread; the inline context calls [`Worker::handle`]
//! directly.

use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};
use lifegrid_core::{Dims, Topology};
use lifegrid_stepper::GridStepper;
use smallvec::{smallvec, SmallVec};

use crate::protocol::{FromWorker, ToWorker};

/// Replies produced by one message.
pub(crate) type Replies = SmallVec<[FromWorker; 2]>;

/// What the loop should do after handling a message.
pub(crate) enum Reply {
    /// Forward these replies, then keep going.
    Send(Replies),
    /// Stop the loop.
    Shutdown,
}

/// Stepper state mirrored from the coordinator.
#[derive(Debug)]
pub(crate) struct Worker {
    stepper: GridStepper,
}

impl Worker {
    pub fn new() -> Self {
        Self {
            stepper: GridStepper::new(Dims::default(), Topology::Bounded),
        }
    }

    pub fn handle(&mut self, msg: ToWorker) -> Reply {
        let replies: Replies = match msg {
            ToWorker::Init {
                epoch,
                dims,
                state,
                topology,
                rule,
            } => {
                self.stepper.set_topology(topology);
                self.stepper.set_rule(rule);
                if let Err(e) = self.stepper.reinit(dims, state) {
                    // The coordinator sizes state from dims; a mismatch
                    // means the grid stays empty rather than misaligned.
                    tracing::warn!(error = %e, "init state rejected");
                    self.stepper.resize(Dims::default());
                }
                smallvec![FromWorker::Ready { epoch }]
            }
            ToWorker::Resize { epoch, dims, state } => {
                if let Err(e) = self.stepper.reinit(dims, state) {
                    tracing::warn!(error = %e, "resized state rejected");
                    self.stepper.resize(dims);
                }
                let state = self.stepper.state().to_vec();
                smallvec![FromWorker::Resized { epoch, state }, FromWorker::Ready { epoch }]
            }
            ToWorker::SetState { state } => {
                if let Err(e) = self.stepper.load(&state) {
                    tracing::warn!(error = %e, "state update rejected");
                }
                SmallVec::new()
            }
            ToWorker::SetCell { index, value } => {
                self.stepper.set_cell(index, value);
                SmallVec::new()
            }
            ToWorker::SetWrap(wrap) => {
                self.stepper.set_topology(Topology::from_wrap(wrap));
                SmallVec::new()
            }
            ToWorker::SetLifeRule(rule) => {
                self.stepper.set_rule(rule);
                SmallVec::new()
            }
            ToWorker::Step {
                epoch,
                mut spare_state,
                mut spare_changes,
            } => {
                let start = Instant::now();
                let out = self.stepper.step();
                spare_state.clear();
                spare_state.extend_from_slice(out.state);
                spare_changes.clear();
                spare_changes.extend_from_slice(out.changes);
                let compute_us = start.elapsed().as_micros() as u64;
                smallvec![FromWorker::StepResult {
                    epoch,
                    state: spare_state,
                    changes: spare_changes,
                    compute_us,
                }]
            }
            ToWorker::Shutdown => return Reply::Shutdown,
        };
        Reply::Send(replies)
    }
}

/// Worker thread body. Returns when told to shut down or when either
/// channel disconnects.
pub(crate) fn run(rx: Receiver<ToWorker>, tx: Sender<FromWorker>) {
    let mut worker = Worker::new();
    tracing::debug!("step worker started");
    while let Ok(msg) = rx.recv() {
        match worker.handle(msg) {
            Reply::Send(replies) => {
                for reply in replies {
                    if tx.send(reply).is_err() {
                        tracing::debug!("coordinator gone, step worker exiting");
                        return;
                    }
                }
            }
            Reply::Shutdown => break,
        }
    }
    tracing::debug!("step worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifegrid_core::{Epoch, LifeRule};

    fn replies(worker: &mut Worker, msg: ToWorker) -> Replies {
        match worker.handle(msg) {
            Reply::Send(r) => r,
            Reply::Shutdown => panic!("unexpected shutdown"),
        }
    }

    fn init(worker: &mut Worker, dims: Dims, state: Vec<u8>) {
        let r = replies(
            worker,
            ToWorker::Init {
                epoch: Epoch(1),
                dims,
                state,
                topology: Topology::Bounded,
                rule: LifeRule::CONWAY,
            },
        );
        assert!(matches!(r[..], [FromWorker::Ready { epoch: Epoch(1) }]));
    }

    #[test]
    fn step_fills_spare_buffers_and_echoes_epoch() {
        let mut w = Worker::new();
        // Horizontal blinker in a 5x5 grid.
        let mut state = vec![0; 25];
        state[11] = 1;
        state[12] = 1;
        state[13] = 1;
        init(&mut w, Dims::new(5, 5), state);

        let r = replies(
            &mut w,
            ToWorker::Step {
                epoch: Epoch(7),
                spare_state: Vec::with_capacity(25),
                spare_changes: vec![99, 99],
            },
        );
        match &r[..] {
            [FromWorker::StepResult {
                epoch,
                state,
                changes,
                ..
            }] => {
                assert_eq!(*epoch, Epoch(7));
                assert_eq!(state.len(), 25);
                assert_eq!(changes, &[7, 11, 13, 17]);
                assert_eq!(state[7], 1);
                assert_eq!(state[11], 0);
            }
            other => panic!("unexpected replies: {other:?}"),
        }
    }

    #[test]
    fn resize_echoes_state_then_ready() {
        let mut w = Worker::new();
        init(&mut w, Dims::new(2, 2), vec![1, 0, 0, 1]);
        let r = replies(
            &mut w,
            ToWorker::Resize {
                epoch: Epoch(2),
                dims: Dims::new(3, 1),
                state: vec![1, 0, 0],
            },
        );
        match &r[..] {
            [FromWorker::Resized { epoch, state }, FromWorker::Ready { epoch: ready }] => {
                assert_eq!(*epoch, Epoch(2));
                assert_eq!(*ready, Epoch(2));
                assert_eq!(state, &[1, 0, 0]);
            }
            other => panic!("unexpected replies: {other:?}"),
        }
    }

    #[test]
    fn resize_adopts_carried_state_after_a_step() {
        let mut w = Worker::new();
        let mut state = vec![0; 25];
        state[11] = 1;
        state[12] = 1;
        state[13] = 1;
        init(&mut w, Dims::new(5, 5), state.clone());
        replies(
            &mut w,
            ToWorker::Step {
                epoch: Epoch(1),
                spare_state: Vec::new(),
                spare_changes: Vec::new(),
            },
        );

        // The coordinator still holds the horizontal blinker.
        let mut carried = vec![0; 30];
        carried[..25].copy_from_slice(&state);
        replies(
            &mut w,
            ToWorker::Resize {
                epoch: Epoch(2),
                dims: Dims::new(5, 6),
                state: carried.clone(),
            },
        );
        assert_eq!(w.stepper.state(), carried.as_slice());
    }

    #[test]
    fn edits_are_silent() {
        let mut w = Worker::new();
        init(&mut w, Dims::new(2, 1), vec![0, 0]);
        assert!(replies(&mut w, ToWorker::SetCell { index: 1, value: 1 }).is_empty());
        assert!(replies(&mut w, ToWorker::SetCell { index: 9, value: 1 }).is_empty());
        assert!(replies(&mut w, ToWorker::SetWrap(true)).is_empty());
        assert!(replies(&mut w, ToWorker::SetState { state: vec![1] }).is_empty());
        assert_eq!(w.stepper.state(), &[0, 1]);
        assert_eq!(w.stepper.topology(), Topology::Toroidal);
    }

    #[test]
    fn shutdown_stops() {
        let mut w = Worker::new();
        assert!(matches!(w.handle(ToWorker::Shutdown), Reply::Shutdown));
    }

    #[test]
    fn thread_loop_round_trip() {
        let (to_tx, to_rx) = crossbeam_channel::unbounded();
        let (from_tx, from_rx) = crossbeam_channel::unbounded();
        let handle = std::thread::spawn(move || run(to_rx, from_tx));
        to_tx
            .send(ToWorker::Init {
                epoch: Epoch(3),
                dims: Dims::new(1, 1),
                state: vec![1],
                topology: Topology::Bounded,
                rule: LifeRule::CONWAY,
            })
            .unwrap();
        assert!(matches!(
            from_rx.recv().unwrap(),
            FromWorker::Ready { epoch: Epoch(3) }
        ));
        to_tx.send(ToWorker::Shutdown).unwrap();
        handle.join().unwrap();
    }
}
