use std::sync::Arc;

use parking_lot::Mutex;

use super::{
    emit_next, emit_terminal, observer_count, subscribe_to_state, SubjectCore, SubjectState,
    Terminal,
};
use crate::observer::Observer;
use crate::subscription::subscribe::{Subscribeable, Subscriber, Subscription};
use crate::ObservableError;

struct BehaviorState<T> {
    value: T,
    core: SubjectCore<T>,
}

impl<T: Clone> SubjectState<T> for BehaviorState<T> {
    fn core(&mut self) -> &mut SubjectCore<T> {
        &mut self.core
    }

    fn record(&mut self, v: &T) {
        self.value = v.clone();
    }

    // A terminated subject only hands out the terminal event.
    fn replay(&mut self) -> Vec<T> {
        if self.core.terminal.is_some() {
            return Vec::new();
        }
        vec![self.value.clone()]
    }
}

/// A subject that always holds a current value.
///
/// `BehaviorSubject` is seeded at creation and remembers the latest value it
/// emitted. Every new subscriber receives that value right away, followed by live
/// values. After completion or an error new subscribers receive only the terminal
/// event.
///
/// # Example
///
/// ```no_run
/// use rxplay::subjects::BehaviorSubject;
/// use rxplay::{Observer, Subscribeable, Subscriber};
///
/// let mut subject = BehaviorSubject::new("Initial value");
///
/// // Receives "Initial value" immediately.
/// subject.subscribe(Subscriber::on_next(|v| println!("1) {}", v)));
///
/// subject.next("X");
///
/// // Receives "X" immediately.
/// subject.subscribe(Subscriber::on_next(|v| println!("2) {}", v)));
///
/// assert_eq!(subject.value(), "X");
/// ```
pub struct BehaviorSubject<T> {
    state: Arc<Mutex<BehaviorState<T>>>,
}

impl<T> Clone for BehaviorSubject<T> {
    fn clone(&self) -> Self {
        BehaviorSubject {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Clone> BehaviorSubject<T> {
    pub fn new(value: T) -> Self {
        BehaviorSubject {
            state: Arc::new(Mutex::new(BehaviorState {
                value,
                core: SubjectCore::new(),
            })),
        }
    }

    /// Returns a copy of the latest value.
    pub fn value(&self) -> T {
        self.state.lock().value.clone()
    }

    /// Returns the number of registered observers.
    pub fn len(&self) -> usize {
        observer_count::<T, _>(&self.state)
    }

    /// Returns `true` if no observers are registered, `false` otherwise.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + 'static> Subscribeable for BehaviorSubject<T> {
    type ObsType = T;

    fn subscribe(&self, s: Subscriber<Self::ObsType>) -> Subscription {
        subscribe_to_state(&self.state, s)
    }
}

impl<T: Clone> Observer for BehaviorSubject<T> {
    type NextFnType = T;

    fn next(&mut self, v: Self::NextFnType) {
        emit_next(&self.state, v);
    }

    fn error(&mut self, e: ObservableError) {
        emit_terminal::<T, _>(&self.state, Terminal::Errored(e));
    }

    fn complete(&mut self) {
        emit_terminal::<T, _>(&self.state, Terminal::Completed);
    }
}

impl<T: Clone + Send + 'static> From<BehaviorSubject<T>> for Subscriber<T> {
    fn from(value: BehaviorSubject<T>) -> Self {
        let mut vn = value.clone();
        let mut ve = value.clone();
        let mut vc = value;
        Subscriber::new(move |v| vn.next(v), move |e| ve.error(e), move || vc.complete())
    }
}
