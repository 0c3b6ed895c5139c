//! The `subjects` module provides various types of subjects for handling and observing
//! data streams. Subjects serve both as observers and observables, allowing multiple
//! observers to subscribe to a single source and receive the same updates.
//!
//! A subject is a cheap, clonable handle to shared state. Every clone can emit with
//! `next()`, `error()` and `complete()` and every clone can be subscribed to, so a
//! subject can be handed to producers and consumers alike and every operator of
//! [`ObservableExt`](crate::ObservableExt) applies to it.
//!
//! There are three varieties of subject plus a convenience wrapper: the plain
//! `PublishSubject`, the `BehaviorSubject` that remembers the latest value, the
//! `ReplaySubject` that remembers a bounded (or unbounded) history, and `Variable`,
//! a `BehaviorSubject` that can only be set and completes when dropped.
//!
//! Observers are notified in subscription order. Events are delivered to a snapshot
//! of the observer list taken under the subject's lock, and the lock is released
//! before delivery.
//!
//! Delivery is serialized per subject. An event emitted while the subject is
//! delivering, from inside an observer's handler or from another thread, is queued
//! and delivered by the emitting call that is already running, once the current
//! event reached every observer. Replays to new subscribers go through the same
//! queue.

mod behavior_subject;
mod publish_subject;
mod replay_subject;
mod variable;

pub use behavior_subject::*;
pub use publish_subject::*;
pub use replay_subject::*;
pub use variable::*;

use std::{
    collections::VecDeque,
    marker::PhantomData,
    mem,
    sync::{Arc, Weak},
    thread,
};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::observer::Observer;
use crate::subscription::subscribe::{Subscriber, Subscription, UnsubscribeLogic};
use crate::ObservableError;

type SharedSubscriber<T> = Arc<Mutex<Subscriber<T>>>;

#[derive(Clone)]
enum Terminal {
    Completed,
    Errored(ObservableError),
}

impl Terminal {
    fn deliver<T>(&self, s: &mut Subscriber<T>) {
        match self {
            Terminal::Completed => s.complete(),
            Terminal::Errored(e) => s.error(Arc::clone(e)),
        }
    }
}

/// Work waiting in a subject's delivery queue.
enum Delivery<T> {
    Replay(Vec<T>, SharedSubscriber<T>),
    Next(T, Vec<SharedSubscriber<T>>),
    Terminal(Terminal, Vec<SharedSubscriber<T>>),
}

impl<T: Clone> Delivery<T> {
    fn deliver(self) {
        match self {
            Delivery::Replay(values, s) => {
                let mut s = s.lock();
                for v in values {
                    s.next(v);
                }
            }
            Delivery::Next(v, observers) => {
                for o in observers {
                    o.lock().next(v.clone());
                }
            }
            Delivery::Terminal(terminal, observers) => {
                for o in observers {
                    terminal.deliver(&mut o.lock());
                }
            }
        }
    }
}

struct SubjectCore<T> {
    observers: Vec<(u64, SharedSubscriber<T>)>,
    next_key: u64,
    terminal: Option<Terminal>,
    pending: VecDeque<Delivery<T>>,
    delivering: bool,
}

impl<T> SubjectCore<T> {
    fn new() -> Self {
        SubjectCore {
            observers: Vec::new(),
            next_key: 0,
            terminal: None,
            pending: VecDeque::new(),
            delivering: false,
        }
    }

    fn push(&mut self, s: SharedSubscriber<T>) -> u64 {
        let key = self.next_key;
        self.next_key += 1;
        self.observers.push((key, s));
        key
    }

    fn remove(&mut self, key: u64) {
        self.observers.retain(|(k, _)| *k != key);
    }

    fn snapshot(&self) -> Vec<SharedSubscriber<T>> {
        self.observers.iter().map(|(_, s)| Arc::clone(s)).collect()
    }

    /// Queues `delivery`. Returns `true` if the caller has to drain the queue.
    fn enqueue(&mut self, delivery: Delivery<T>) -> bool {
        self.pending.push_back(delivery);
        if self.delivering {
            trace!(queued = self.pending.len(), "subject delivery queued");
            return false;
        }
        self.delivering = true;
        true
    }
}

/// State shared by all handles of one subject.
trait SubjectState<T> {
    fn core(&mut self) -> &mut SubjectCore<T>;

    /// Records a value about to be emitted.
    fn record(&mut self, _v: &T) {}

    /// Values a new subscriber receives before live events.
    fn replay(&mut self) -> Vec<T> {
        Vec::new()
    }
}

/// Releases the delivery queue if a handler panics while it is drained.
struct DrainGuard<'a, T, S: SubjectState<T>> {
    state: &'a Mutex<S>,
    _marker: PhantomData<fn() -> T>,
}

impl<T, S: SubjectState<T>> Drop for DrainGuard<'_, T, S> {
    fn drop(&mut self) {
        if thread::panicking() {
            let mut guard = self.state.lock();
            let core = guard.core();
            core.pending.clear();
            core.delivering = false;
        }
    }
}

fn drain<T, S>(state: &Mutex<S>)
where
    T: Clone,
    S: SubjectState<T>,
{
    let _guard = DrainGuard::<T, S> {
        state,
        _marker: PhantomData,
    };
    loop {
        let delivery = {
            let mut guard = state.lock();
            let core = guard.core();
            match core.pending.pop_front() {
                Some(delivery) => delivery,
                None => {
                    core.delivering = false;
                    return;
                }
            }
        };
        delivery.deliver();
    }
}

fn subscribe_to_state<T, S>(state: &Arc<Mutex<S>>, mut subscriber: Subscriber<T>) -> Subscription
where
    T: Clone + 'static,
    S: SubjectState<T> + Send + 'static,
{
    let handle = subscriber.subscription().clone();
    if subscriber.is_closed() {
        return handle;
    }

    let mut guard = state.lock();
    let replay = guard.replay();
    if let Some(terminal) = guard.core().terminal.clone() {
        drop(guard);
        for v in replay {
            subscriber.next(v);
        }
        terminal.deliver(&mut subscriber);
        return handle;
    }

    let entry = Arc::new(Mutex::new(subscriber));
    let core = guard.core();
    let key = core.push(Arc::clone(&entry));
    trace!(key, observers = core.observers.len(), "subject observer registered");
    // The replay is queued like any event, so it reaches the new observer before
    // everything emitted after this point.
    let must_drain = core.enqueue(Delivery::Replay(replay, entry));
    drop(guard);

    handle.add(removal_logic(Arc::downgrade(state), key));
    if must_drain {
        drain(state);
    }
    handle
}

fn removal_logic<T, S>(state: Weak<Mutex<S>>, key: u64) -> UnsubscribeLogic
where
    T: 'static,
    S: SubjectState<T> + Send + 'static,
{
    UnsubscribeLogic::Logic(Box::new(move || {
        if let Some(state) = state.upgrade() {
            state.lock().core().remove(key);
            trace!(key, "subject observer removed");
        }
    }))
}

fn emit_next<T, S>(state: &Mutex<S>, v: T)
where
    T: Clone,
    S: SubjectState<T>,
{
    let must_drain = {
        let mut guard = state.lock();
        if guard.core().terminal.is_some() {
            return;
        }
        guard.record(&v);
        let core = guard.core();
        let observers = core.snapshot();
        core.enqueue(Delivery::Next(v, observers))
    };
    if must_drain {
        drain(state);
    }
}

fn emit_terminal<T, S>(state: &Mutex<S>, terminal: Terminal)
where
    T: Clone,
    S: SubjectState<T>,
{
    let must_drain = {
        let mut guard = state.lock();
        let core = guard.core();
        if core.terminal.is_some() {
            return;
        }
        core.terminal = Some(terminal.clone());
        let observers: Vec<_> = mem::take(&mut core.observers)
            .into_iter()
            .map(|(_, o)| o)
            .collect();
        debug!(
            observers = observers.len(),
            errored = matches!(terminal, Terminal::Errored(_)),
            "subject terminated"
        );
        core.enqueue(Delivery::Terminal(terminal, observers))
    };
    if must_drain {
        drain(state);
    }
}

fn observer_count<T, S>(state: &Mutex<S>) -> usize
where
    S: SubjectState<T>,
{
    state.lock().core().observers.len()
}
