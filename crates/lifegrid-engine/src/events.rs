//! Lifecycle notifications and their subscribers.

use crossbeam_channel::{Receiver, Sender};
use indexmap::IndexMap;
use lifegrid_core::{Dims, Epoch, Generation};

/// A notification emitted by the coordinator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineEvent {
    /// The computation context holds buffers for `dims` and is idle.
    Ready {
        /// Epoch the context confirmed.
        epoch: Epoch,
        /// Grid dimensions now in effect.
        dims: Dims,
    },
    /// A generation was committed and the counters updated.
    Step {
        /// The new generation number.
        generation: Generation,
        /// Live cells after the step.
        alive: usize,
        /// Length of the change list.
        changed: usize,
    },
}

/// Handle returned by [`Coordinator::subscribe`](crate::Coordinator::subscribe).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

enum Observer {
    Callback(Box<dyn FnMut(&EngineEvent) + Send>),
    Channel(Sender<EngineEvent>),
}

/// Subscribers in subscription order.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    observers: IndexMap<SubscriptionId, Observer>,
}

impl Observers {
    pub fn subscribe(&mut self, callback: Box<dyn FnMut(&EngineEvent) + Send>) -> SubscriptionId {
        self.insert(Observer::Callback(callback))
    }

    pub fn subscribe_channel(&mut self) -> (SubscriptionId, Receiver<EngineEvent>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (self.insert(Observer::Channel(tx)), rx)
    }

    fn insert(&mut self, observer: Observer) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.insert(id, observer);
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.shift_remove(&id).is_some()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Deliver `event` to every observer. Channel observers whose
    /// receiver was dropped are unsubscribed.
    pub fn emit(&mut self, event: &EngineEvent) {
        self.observers.retain(|_, observer| match observer {
            Observer::Callback(f) => {
                f(event);
                true
            }
            Observer::Channel(tx) => tx.send(event.clone()).is_ok(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn step(n: u64) -> EngineEvent {
        EngineEvent::Step {
            generation: Generation(n),
            alive: 0,
            changed: 0,
        }
    }

    #[test]
    fn callbacks_and_channels_receive_in_order() {
        let mut obs = Observers::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        obs.subscribe(Box::new(move |e| sink.lock().unwrap().push(e.clone())));
        let (_, rx) = obs.subscribe_channel();

        obs.emit(&step(1));
        obs.emit(&step(2));
        assert_eq!(*seen.lock().unwrap(), vec![step(1), step(2)]);
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![step(1), step(2)]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut obs = Observers::default();
        let count = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&count);
        let id = obs.subscribe(Box::new(move |_| *sink.lock().unwrap() += 1));
        obs.emit(&step(1));
        assert!(obs.unsubscribe(id));
        assert!(!obs.unsubscribe(id));
        obs.emit(&step(2));
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn dropped_receiver_is_pruned() {
        let mut obs = Observers::default();
        let (_, rx) = obs.subscribe_channel();
        drop(rx);
        obs.emit(&step(1));
        assert_eq!(obs.len(), 0);
    }
}
