use std::{
    collections::VecDeque,
    sync::Arc,
    time::{Duration, Instant},
};

use parking_lot::Mutex;

use super::{
    emit_next, emit_terminal, observer_count, subscribe_to_state, SubjectCore, SubjectState,
    Terminal,
};
use crate::observer::Observer;
use crate::subscription::subscribe::{Subscribeable, Subscriber, Subscription};
use crate::ObservableError;

struct EmittedValueEntry<T>(T, Instant);

impl<T> EmittedValueEntry<T> {
    fn new(v: T) -> Self {
        EmittedValueEntry(v, Instant::now())
    }

    fn is_fresh(&self, window: Duration) -> bool {
        self.1.elapsed() <= window
    }
}

/// Specifies the buffer size for replaying previous emissions in `ReplaySubject`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufSize {
    /// Specifies an infinite buffer size, allowing all emitted values to be replayed.
    Unbounded,

    /// Specifies a limited buffer size with the maximum number of values to be replayed.
    Bounded(usize),
}

struct ReplayState<T> {
    buf_size: BufSize,
    window: Option<Duration>,
    values: VecDeque<EmittedValueEntry<T>>,
    core: SubjectCore<T>,
}

impl<T> ReplayState<T> {
    // Entries are time ordered, so stale ones sit at the front.
    fn drop_stale(&mut self) {
        if let Some(window) = self.window {
            while self.values.front().is_some_and(|e| !e.is_fresh(window)) {
                self.values.pop_front();
            }
        }
    }
}

impl<T: Clone> SubjectState<T> for ReplayState<T> {
    fn core(&mut self) -> &mut SubjectCore<T> {
        &mut self.core
    }

    fn record(&mut self, v: &T) {
        self.drop_stale();
        match self.buf_size {
            BufSize::Unbounded => self.values.push_back(EmittedValueEntry::new(v.clone())),
            BufSize::Bounded(0) => {}
            BufSize::Bounded(buf_size) => {
                if self.values.len() == buf_size {
                    self.values.pop_front();
                }
                self.values.push_back(EmittedValueEntry::new(v.clone()));
            }
        }
    }

    fn replay(&mut self) -> Vec<T> {
        self.drop_stale();
        self.values.iter().map(|e| e.0.clone()).collect()
    }
}

/// Replaying old values to new subscribers, this variant of subject emits these
/// values upon subscription.
///
/// `ReplaySubject` keeps a buffer of the values it emitted and hands the buffer to
/// every new subscriber before live values. The buffer keeps the last N values
/// (`BufSize::Bounded(N)`) or everything (`BufSize::Unbounded`), and can
/// additionally forget values older than a time window.
///
/// Even after completion or an error `ReplaySubject` replays its buffer to new
/// subscribers before notifying them of the terminal event.
///
/// # Example
///
/// ```no_run
/// use rxplay::subjects::{BufSize, ReplaySubject};
/// use rxplay::{Observer, Subscribeable, Subscriber};
///
/// let mut subject = ReplaySubject::new(BufSize::Bounded(2));
///
/// subject.next(1);
/// subject.next(2);
/// subject.next(3);
///
/// // Receives 2 and 3.
/// subject.subscribe(Subscriber::on_next(|v| println!("{}", v)));
/// ```
pub struct ReplaySubject<T> {
    state: Arc<Mutex<ReplayState<T>>>,
}

impl<T> Clone for ReplaySubject<T> {
    fn clone(&self) -> Self {
        ReplaySubject {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Clone> ReplaySubject<T> {
    /// Creates a `ReplaySubject` replaying up to `buf_size` values.
    pub fn new(buf_size: BufSize) -> Self {
        Self::build(buf_size, None)
    }

    /// Creates a `ReplaySubject` that additionally drops buffered values older than
    /// `window` before replaying.
    pub fn with_window(buf_size: BufSize, window: Duration) -> Self {
        Self::build(buf_size, Some(window))
    }

    fn build(buf_size: BufSize, window: Option<Duration>) -> Self {
        let values = match buf_size {
            BufSize::Unbounded => VecDeque::with_capacity(16),
            BufSize::Bounded(size) => VecDeque::with_capacity(size),
        };
        ReplaySubject {
            state: Arc::new(Mutex::new(ReplayState {
                buf_size,
                window,
                values,
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

impl<T: Clone + Send + 'static> Subscribeable for ReplaySubject<T> {
    type ObsType = T;

    fn subscribe(&self, s: Subscriber<Self::ObsType>) -> Subscription {
        subscribe_to_state(&self.state, s)
    }
}

impl<T: Clone> Observer for ReplaySubject<T> {
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

impl<T: Clone + Send + 'static> From<ReplaySubject<T>> for Subscriber<T> {
    fn from(value: ReplaySubject<T>) -> Self {
        let mut vn = value.clone();
        let mut ve = value.clone();
        let mut vc = value;
        Subscriber::new(move |v| vn.next(v), move |e| ve.error(e), move || vc.complete())
    }
}
