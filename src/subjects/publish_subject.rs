use std::sync::Arc;

use parking_lot::Mutex;

use super::{
    emit_next, emit_terminal, observer_count, subscribe_to_state, SubjectCore, SubjectState,
    Terminal,
};
use crate::observer::Observer;
use crate::subscription::subscribe::{Subscribeable, Subscriber, Subscription};
use crate::ObservableError;

struct PublishState<T> {
    core: SubjectCore<T>,
}

impl<T> SubjectState<T> for PublishState<T> {
    fn core(&mut self) -> &mut SubjectCore<T> {
        &mut self.core
    }
}

/// A subject that multicasts every event to the observers registered at the time of
/// the event.
///
/// Subscribers only see what is emitted after they subscribed. Once the subject
/// completes or errors, later subscribers immediately receive that terminal event
/// and further `next` calls are ignored.
///
/// # Example
///
/// ```no_run
/// use rxplay::subjects::PublishSubject;
/// use rxplay::{Disposable, Observer, Subscribeable, Subscriber};
///
/// let mut subject = PublishSubject::new();
///
/// subject.next("Is anyone listening?"); // Nobody is, the value is lost.
///
/// let subscription = subject.subscribe(Subscriber::on_next(|v| println!("1) {}", v)));
/// subject.next("1");
///
/// subscription.dispose();
/// subject.next("3"); // Not delivered, the only subscription is gone.
/// ```
pub struct PublishSubject<T> {
    state: Arc<Mutex<PublishState<T>>>,
}

impl<T> Clone for PublishSubject<T> {
    fn clone(&self) -> Self {
        PublishSubject {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Default for PublishSubject<T> {
    fn default() -> Self {
        PublishSubject::new()
    }
}

impl<T> PublishSubject<T> {
    pub fn new() -> Self {
        PublishSubject {
            state: Arc::new(Mutex::new(PublishState {
                core: SubjectCore::new(),
            })),
        }
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

impl<T: Clone + Send + 'static> Subscribeable for PublishSubject<T> {
    type ObsType = T;

    fn subscribe(&self, s: Subscriber<Self::ObsType>) -> Subscription {
        subscribe_to_state(&self.state, s)
    }
}

impl<T: Clone> Observer for PublishSubject<T> {
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

impl<T: Clone + Send + 'static> From<PublishSubject<T>> for Subscriber<T> {
    fn from(value: PublishSubject<T>) -> Self {
        let mut vn = value.clone();
        let mut ve = value.clone();
        let mut vc = value;
        Subscriber::new(move |v| vn.next(v), move |e| ve.error(e), move || vc.complete())
    }
}
